//! Singular Closures

use super::*;

/// Perfect mirror reflection.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Reflection {
    /// Shading normal.
    pub(crate) n: Vector3f,
}

impl Reflection {
    /// Create a new `Reflection` closure.
    ///
    /// * `n` - Shading normal.
    pub fn new(n: Vector3f) -> Self {
        Self {
            n: n.safe_normalize(),
        }
    }

    /// Returns the closure label.
    pub fn label(&self) -> ClosureLabel {
        ClosureLabel::REFLECT | ClosureLabel::SINGULAR
    }

    /// Samples the mirror direction.
    ///
    /// * `sp` - Shading point.
    pub fn sample(&self, sp: &ShadingPoint) -> BsdfSample {
        let label = self.label();
        let cos_no = self.n.dot(&sp.omega_out);
        if cos_no <= 0.0 {
            return BsdfSample::invalid(label);
        }

        let omega_in = (2.0 * cos_no) * self.n - sp.omega_out;
        if sp.ng.dot(&omega_in) <= 0.0 {
            return BsdfSample::invalid(label);
        }

        let (dx, dy) = sp.reflect_differentials(&self.n, 1.0);
        BsdfSample {
            omega_in,
            domega_in_dx: dx,
            domega_in_dy: dy,
            eval: Spectrum::new(SINGULAR_PDF),
            pdf: SINGULAR_PDF,
            label,
        }
    }
}

/// Smooth dielectric refraction.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Refraction {
    /// Shading normal.
    pub(crate) n: Vector3f,

    /// Relative index of refraction.
    pub(crate) eta: Float,
}

impl Refraction {
    /// Create a new `Refraction` closure.
    ///
    /// * `n`   - Shading normal.
    /// * `eta` - Relative index of refraction.
    pub fn new(n: Vector3f, eta: Float) -> Self {
        Self {
            n: n.safe_normalize(),
            eta: max(eta, 1e-5),
        }
    }

    /// Returns the closure label.
    pub fn label(&self) -> ClosureLabel {
        ClosureLabel::TRANSMIT | ClosureLabel::SINGULAR
    }

    /// Samples the refracted direction. Total internal reflection yields an
    /// invalid sample.
    ///
    /// * `sp` - Shading point.
    pub fn sample(&self, sp: &ShadingPoint) -> BsdfSample {
        let label = self.label();
        let f = fresnel_dielectric(self.eta, &self.n, sp);
        if f.is_inside || f.fresnel == 1.0 {
            return BsdfSample::invalid(label);
        }

        if sp.ng.dot(&f.t) >= 0.0 {
            return BsdfSample::invalid(label);
        }

        BsdfSample {
            omega_in: f.t,
            domega_in_dx: f.dt_dx,
            domega_in_dy: f.dt_dy,
            eval: Spectrum::new(SINGULAR_PDF),
            pdf: SINGULAR_PDF,
            label,
        }
    }
}

/// Straight pass-through.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Transparent;

impl Transparent {
    /// Returns the closure label.
    pub fn label(&self) -> ClosureLabel {
        ClosureLabel::TRANSMIT | ClosureLabel::TRANSPARENT
    }

    /// Continues the ray unchanged.
    ///
    /// * `sp` - Shading point.
    pub fn sample(&self, sp: &ShadingPoint) -> BsdfSample {
        BsdfSample {
            omega_in: -sp.omega_out,
            domega_in_dx: -sp.domega_out_dx,
            domega_in_dy: -sp.domega_out_dy,
            eval: Spectrum::ONE,
            pdf: 1.0,
            label: self.label(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::approx_eq;

    const Z: Vector3f = Vector3f {
        x: 0.0,
        y: 0.0,
        z: 1.0,
    };

    #[test]
    fn mirror() {
        let wo = Vector3f::new(0.0, 0.6, 0.8);
        let s = Reflection::new(Z).sample(&ShadingPoint::new(Z, wo));
        assert!(approx_eq!(f32, s.omega_in.y, -0.6, epsilon = 1e-6));
        assert!(approx_eq!(f32, s.omega_in.z, 0.8, epsilon = 1e-6));
        assert_eq!(s.pdf, SINGULAR_PDF);
        assert_eq!(s.weight(), Spectrum::ONE);
    }

    #[test]
    fn mirror_below_geometric_normal_is_rejected() {
        let ng = Vector3f::new(0.0, 0.8, 0.6);
        let wo = Vector3f::new(0.0, 0.6, 0.8);
        assert!(!Reflection::new(Z).sample(&ShadingPoint::new(ng, wo)).is_valid());
    }

    #[test]
    fn refraction_bends_towards_normal() {
        let wo = Vector3f::new(0.6, 0.0, 0.8);
        let s = Refraction::new(Z, 1.5).sample(&ShadingPoint::new(Z, wo));
        assert!(s.is_valid());
        assert!(s.omega_in.z < 0.0);
        assert!(approx_eq!(f32, s.omega_in.x, -0.4, epsilon = 1e-5));
    }

    #[test]
    fn transparent_passes_through() {
        let wo = Vector3f::new(0.6, 0.0, 0.8);
        let s = Transparent.sample(&ShadingPoint::new(Z, wo));
        assert_eq!(s.omega_in, -wo);
        assert_eq!(s.weight(), Spectrum::ONE);
        assert!(s.label.contains(ClosureLabel::TRANSPARENT));
    }
}
