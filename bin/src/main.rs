#[macro_use]
extern crate log;

use closures::bsdf::*;
use closures::closure::*;
use closures::common::*;
use closures::estimate::*;
use closures::registry::*;
use core::app::*;
use core::geometry::*;
use core::math::*;
use core::paramset::*;
use core::rng::*;
use core::spectrum::*;
use std::process::ExitCode;

fn main() -> ExitCode {
    // Initialize `env_logger`.
    env_logger::init();

    let options = &*OPTIONS;
    let registry = ClosureRegistry::new();

    let result = match &options.command {
        Command::List => list(&registry),
        Command::Furnace {
            closure,
            params,
            theta,
            samples,
            seed,
        } => furnace(&registry, closure, params, *theta, *samples, *seed),
        Command::Bssrdf {
            profile,
            params,
            steps,
        } => bssrdf(&registry, *profile, params, *steps),
        Command::Blackbody { min, max, steps } => blackbody_table(*min, *max, *steps),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn list(registry: &ClosureRegistry) -> Result<(), String> {
    for d in registry.descriptors() {
        println!("{d}");
    }
    Ok(())
}

/// Builds a closure from its defaults overlaid with `NAME=VALUE` arguments.
fn instantiate(registry: &ClosureRegistry, name: &str, args: &[String]) -> Result<Closure, String> {
    let desc = registry
        .get(name)
        .ok_or_else(|| format!("Unknown closure '{name}'"))?;

    let mut ps: ParamSet = desc.default_params();
    for arg in args.iter() {
        let (param, value) = split_param(arg)?;
        desc.parse_param(param, value, &mut ps)?;
    }
    debug!("{name} parameters:\n{ps}");

    registry.instantiate(name, &ps)
}

fn furnace(
    registry: &ClosureRegistry,
    name: &str,
    args: &[String],
    theta: Float,
    samples: usize,
    seed: u64,
) -> Result<(), String> {
    let closure = instantiate(registry, name, args)?;
    let bsdf = match closure {
        Closure::Bsdf(b) => b,
        Closure::Bssrdf(s) => {
            info!("Using the diffuse fallback of '{name}'");
            Bsdf::from(s.as_diffuse())
        }
        Closure::Volume(_) => {
            return Err(format!("'{name}' is a volume closure; furnace tests surfaces"))
        }
    };

    let ng = bsdf.normal().unwrap_or(Vector3f::new(0.0, 0.0, 1.0));
    let (t, b) = coordinate_system(&ng);
    let (sin_t, cos_t) = theta.to_radians().sin_cos();
    let omega_out = spherical_direction_in_frame(sin_t, cos_t, 0.0, 1.0, &t, &b, &ng);
    let sp = ShadingPoint::new(ng, omega_out);

    info!("Running {samples} samples for '{name}' at {theta} degrees");

    let mut rng = RNG::new(seed);
    let sampled = estimate_albedo(&bsdf, &sp, samples, &mut rng);
    let uniform = estimate_albedo_uniform(&bsdf, &sp, samples, &mut rng);
    let worst = check_consistency(&bsdf, &sp, samples, &mut rng);

    println!("closure       {}", bsdf.name());
    println!("label         {:?}", bsdf.label());
    println!("albedo        {}", sampled);
    println!("luminance     {}", sampled.y());
    println!("uniform       {}", uniform);
    println!("pdf mismatch  {}", worst);

    if sampled.max_component_value() > 1.0 + 1e-2 {
        warn!("'{name}' reflects more energy than it receives");
    }
    Ok(())
}

fn bssrdf(
    registry: &ClosureRegistry,
    profile: Profile,
    args: &[String],
    steps: usize,
) -> Result<(), String> {
    let name = profile.closure_name();
    let sss = match instantiate(registry, name, args)? {
        Closure::Bssrdf(s) => s,
        c => return Err(format!("'{}' is not a subsurface closure", c.name())),
    };

    if sss.is_diffuse() {
        println!("all radii below threshold; shaded as diffuse");
        return Ok(());
    }

    let steps = max(steps, 2);
    for c in sss.channels() {
        let rmax = sss.max_radius(c);
        println!("channel {c} max radius {rmax}");
        for i in 0..steps {
            let r = rmax * i as Float / (steps - 1) as Float;
            println!("  {:>10.5} {:>12.6} {:>12.6}", r, sss.eval(r)[c], sss.pdf(r));
        }
    }

    let mut rng = RNG::new(0);
    if let Some(probe) = sss.probe(rng.uniform_float(), rng.uniform_float()) {
        println!(
            "probe channel {} r {} length {}",
            probe.channel, probe.r, probe.length
        );
    }
    Ok(())
}

fn blackbody_table(min_t: Float, max_t: Float, steps: usize) -> Result<(), String> {
    if !(min_t > 0.0 && max_t >= min_t) {
        return Err(format!("Invalid temperature range [{min_t}, {max_t}]"));
    }

    let steps = max(steps, 2);
    for i in 0..steps {
        let t = lerp(i as Float / (steps - 1) as Float, min_t, max_t);
        let c: Spectrum = blackbody(t);
        let srgb = [c[0], c[1], c[2]].map(linear_to_srgb);
        println!("{:>8.1} K  {}  srgb {:.4?}", t, c, srgb);
    }
    Ok(())
}
