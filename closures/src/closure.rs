//! Closures

use crate::bsdf::*;
use crate::common::*;
use crate::subsurface::*;
use crate::volume::*;
use pbrt_core::geometry::*;
use pbrt_core::spectrum::*;

/// Any closure a shader can emit.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Closure {
    Bsdf(Bsdf),
    Bssrdf(SubsurfaceClosure),
    Volume(VolumeClosure),
}

impl Closure {
    /// Returns the registry name of the closure.
    pub fn name(&self) -> &'static str {
        match self {
            Closure::Bsdf(c) => c.name(),
            Closure::Bssrdf(c) => match c.profile() {
                SubsurfaceProfile::Cubic => "bssrdf_cubic",
                SubsurfaceProfile::Dipole => "bssrdf_dipole",
            },
            Closure::Volume(c) => c.name(),
        }
    }

    /// Returns the closure label.
    pub fn label(&self) -> ClosureLabel {
        match self {
            Closure::Bsdf(c) => c.label(),
            Closure::Bssrdf(c) => c.label(),
            Closure::Volume(c) => c.label(),
        }
    }

    /// Returns the shading normal, if the closure has one.
    pub fn normal(&self) -> Option<Vector3f> {
        match self {
            Closure::Bsdf(c) => c.normal(),
            Closure::Bssrdf(c) => Some(c.n),
            Closure::Volume(_) => None,
        }
    }

    /// Returns true if the host may merge this closure with `other` by
    /// summing their weights. That requires the same closure type with
    /// identical parameters.
    ///
    /// * `other` - The other closure.
    pub fn mergeable(&self, other: &Closure) -> bool {
        self == other
    }

    /// Returns the nominal albedo of the closure.
    pub fn albedo(&self) -> Spectrum {
        match self {
            Closure::Bsdf(c) => c.albedo(),
            Closure::Bssrdf(c) => c.albedo(),
            Closure::Volume(_) => Spectrum::ONE,
        }
    }

    /// Evaluates reflection for a pair of directions. Volume closures
    /// evaluate their phase function; subsurface closures return zero.
    ///
    /// * `omega_out` - Direction towards the viewer.
    /// * `omega_in`  - Direction towards the light.
    pub fn eval_reflect(&self, omega_out: &Vector3f, omega_in: &Vector3f) -> BsdfEval {
        match self {
            Closure::Bsdf(c) => c.eval_reflect(omega_out, omega_in),
            Closure::Bssrdf(_) => BsdfEval::ZERO,
            Closure::Volume(c) => c.eval_phase(omega_out, omega_in),
        }
    }

    /// Evaluates transmission for a pair of directions. Volume closures
    /// evaluate their phase function; subsurface closures return zero.
    ///
    /// * `omega_out` - Direction towards the viewer.
    /// * `omega_in`  - Direction towards the light.
    pub fn eval_transmit(&self, omega_out: &Vector3f, omega_in: &Vector3f) -> BsdfEval {
        match self {
            Closure::Bsdf(c) => c.eval_transmit(omega_out, omega_in),
            Closure::Bssrdf(_) => BsdfEval::ZERO,
            Closure::Volume(c) => c.eval_phase(omega_out, omega_in),
        }
    }

    /// Importance samples an incident direction. Subsurface closures sample
    /// their diffuse fallback.
    ///
    /// * `sp` - Shading point.
    /// * `u`  - Uniform random sample.
    pub fn sample(&self, sp: &ShadingPoint, u: &Point2f) -> BsdfSample {
        match self {
            Closure::Bsdf(c) => c.sample(sp, u),
            Closure::Bssrdf(c) => c.as_diffuse().sample(sp, u),
            Closure::Volume(c) => c.sample(sp, u),
        }
    }
}

impl From<Bsdf> for Closure {
    fn from(c: Bsdf) -> Self {
        Closure::Bsdf(c)
    }
}

impl From<SubsurfaceClosure> for Closure {
    fn from(c: SubsurfaceClosure) -> Self {
        Closure::Bssrdf(c)
    }
}

impl From<VolumeClosure> for Closure {
    fn from(c: VolumeClosure) -> Self {
        Closure::Volume(c)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const Z: Vector3f = Vector3f {
        x: 0.0,
        y: 0.0,
        z: 1.0,
    };

    #[test]
    fn mergeable_requires_identical_parameters() {
        let a: Closure = Bsdf::from(OrenNayar::new(Z, 0.3)).into();
        let b: Closure = Bsdf::from(OrenNayar::new(Z, 0.3)).into();
        let c: Closure = Bsdf::from(OrenNayar::new(Z, 0.4)).into();
        let d: Closure = Bsdf::from(Diffuse::new(Z)).into();
        assert!(a.mergeable(&b));
        assert!(!a.mergeable(&c));
        assert!(!a.mergeable(&d));
    }

    #[test]
    fn names() {
        let g: Closure = Bsdf::from(MicrofacetGgx::refraction(Z, 0.2, 1.5)).into();
        assert_eq!(g.name(), "microfacet_ggx_refraction");
        let s: Closure = SubsurfaceClosure::dipole(Z, Spectrum::ONE, 0.0, Spectrum::ONE).into();
        assert_eq!(s.name(), "bssrdf_dipole");
        assert_eq!(Closure::from(VolumeClosure::Isotropic).name(), "isotropic");
    }

    #[test]
    fn albedo() {
        let albedo = Spectrum::from_rgb(0.2, 0.4, 0.6);
        let s: Closure = SubsurfaceClosure::cubic(Z, Spectrum::ONE, 0.0, 0.0, albedo).into();
        assert_eq!(s.albedo(), albedo);
        assert_eq!(Closure::from(Bsdf::from(Diffuse::new(Z))).albedo(), Spectrum::ONE);
    }
}
