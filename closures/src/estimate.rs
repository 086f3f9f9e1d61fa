//! Monte-Carlo estimators used to validate closures.

use crate::bsdf::*;
use crate::common::*;
use pbrt_core::math::*;
use pbrt_core::rng::*;
use pbrt_core::sampling::*;
use pbrt_core::spectrum::*;

/// Estimates the directional albedo of a BSDF by averaging `eval / pdf` over
/// its own importance sampler. Rejected samples contribute zero.
///
/// * `bsdf` - The BSDF.
/// * `sp`   - Shading point.
/// * `n`    - Number of samples.
/// * `rng`  - Random number generator.
pub fn estimate_albedo(bsdf: &Bsdf, sp: &ShadingPoint, n: usize, rng: &mut RNG) -> Spectrum {
    if n == 0 {
        return Spectrum::ZERO;
    }

    let mut sum = Spectrum::ZERO;
    for _ in 0..n {
        let u = rng.uniform_point2f();
        let s = bsdf.sample(sp, &u);
        if s.is_valid() {
            sum += s.weight();
        }
    }
    sum / n as Float
}

/// Estimates the directional reflectance of a BSDF by integrating
/// `eval_reflect` over the hemisphere about the geometric normal with
/// uniform samples. Singular lobes integrate to zero.
///
/// * `bsdf` - The BSDF.
/// * `sp`   - Shading point.
/// * `n`    - Number of samples.
/// * `rng`  - Random number generator.
pub fn estimate_albedo_uniform(
    bsdf: &Bsdf,
    sp: &ShadingPoint,
    n: usize,
    rng: &mut RNG,
) -> Spectrum {
    if n == 0 {
        return Spectrum::ZERO;
    }

    let mut sum = Spectrum::ZERO;
    for _ in 0..n {
        let u = rng.uniform_point2f();
        let (omega_in, pdf) = sample_uniform_hemisphere(&sp.ng, &u);
        let e = bsdf.eval_reflect(&sp.omega_out, &omega_in);
        sum += e.value * (1.0 / pdf);
    }
    sum / n as Float
}

/// Returns the largest relative difference between the PDF a sample reports
/// and the PDF evaluation reports for the same direction. Rejected and
/// singular samples are skipped.
///
/// * `bsdf` - The BSDF.
/// * `sp`   - Shading point.
/// * `n`    - Number of samples.
/// * `rng`  - Random number generator.
pub fn check_consistency(bsdf: &Bsdf, sp: &ShadingPoint, n: usize, rng: &mut RNG) -> Float {
    let mut worst: Float = 0.0;
    for _ in 0..n {
        let u = rng.uniform_point2f();
        let s = bsdf.sample(sp, &u);
        if !s.is_valid() || s.label.intersects(ClosureLabel::SINGULAR | ClosureLabel::TRANSPARENT) {
            continue;
        }

        let e = bsdf.eval(&sp.omega_out, &s.omega_in, &sp.ng);
        let scale = max(s.pdf, e.pdf);
        if scale > 0.0 {
            worst = max(worst, abs(s.pdf - e.pdf) / scale);
        }
    }
    worst
}

#[cfg(test)]
mod tests {
    use super::*;
    use pbrt_core::geometry::*;
    use float_cmp::approx_eq;

    fn normal_view() -> ShadingPoint {
        ShadingPoint::new(Vector3f::new(0.0, 0.0, 1.0), Vector3f::new(0.0, 0.0, 1.0))
    }

    #[test]
    fn diffuse_furnace() {
        let bsdf = Bsdf::from(Diffuse::new(Vector3f::new(0.0, 0.0, 1.0)));
        let mut rng = RNG::new(7);
        let a = estimate_albedo(&bsdf, &normal_view(), 1024, &mut rng);
        for c in 0..RGB_SAMPLES {
            assert!(approx_eq!(f32, a[c], 1.0, epsilon = 1e-4));
        }
    }

    #[test]
    fn uniform_estimate_matches_sampled_estimate() {
        let bsdf = Bsdf::from(Diffuse::new(Vector3f::new(0.0, 0.0, 1.0)));
        let mut rng = RNG::new(11);
        let a = estimate_albedo_uniform(&bsdf, &normal_view(), 20000, &mut rng);
        assert!((a[0] - 1.0).abs() < 0.05, "{}", a);
    }

    #[test]
    fn mirror_has_unit_albedo() {
        let bsdf = Bsdf::from(Reflection::new(Vector3f::new(0.0, 0.0, 1.0)));
        let mut rng = RNG::new(3);
        let a = estimate_albedo(&bsdf, &normal_view(), 16, &mut rng);
        assert_eq!(a, Spectrum::ONE);
        assert_eq!(check_consistency(&bsdf, &normal_view(), 16, &mut rng), 0.0);
    }

    #[test]
    fn zero_samples() {
        let bsdf = Bsdf::from(Diffuse::new(Vector3f::new(0.0, 0.0, 1.0)));
        let mut rng = RNG::new(1);
        assert_eq!(estimate_albedo(&bsdf, &normal_view(), 0, &mut rng), Spectrum::ZERO);
        assert_eq!(check_consistency(&bsdf, &normal_view(), 0, &mut rng), 0.0);
    }
}
