//! Diffuse and Translucent

use super::*;

/// Lambertian reflection.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Diffuse {
    /// Shading normal.
    pub(crate) n: Vector3f,
}

impl Diffuse {
    /// Create a new `Diffuse` closure.
    ///
    /// * `n` - Shading normal.
    pub fn new(n: Vector3f) -> Self {
        Self {
            n: n.safe_normalize(),
        }
    }

    /// Returns the closure label.
    pub fn label(&self) -> ClosureLabel {
        ClosureLabel::REFLECT | ClosureLabel::DIFFUSE
    }

    /// Evaluates reflection for a pair of directions.
    ///
    /// * `omega_out` - Direction towards the viewer.
    /// * `omega_in`  - Direction towards the light.
    pub fn eval_reflect(&self, omega_out: &Vector3f, omega_in: &Vector3f) -> BsdfEval {
        if self.n.dot(omega_out) <= 0.0 {
            return BsdfEval::ZERO;
        }

        let cos_pi = max(self.n.dot(omega_in), 0.0) * INV_PI;
        BsdfEval::gray(cos_pi, cos_pi)
    }

    /// Importance samples the cosine lobe.
    ///
    /// * `sp` - Shading point.
    /// * `u`  - Uniform random sample.
    pub fn sample(&self, sp: &ShadingPoint, u: &Point2f) -> BsdfSample {
        let label = self.label();
        if self.n.dot(&sp.omega_out) <= 0.0 {
            return BsdfSample::invalid(label);
        }

        let (omega_in, pdf) = sample_cos_hemisphere(&self.n, u);
        if sp.ng.dot(&omega_in) <= 0.0 {
            return BsdfSample::invalid(label);
        }

        let (dx, dy) = sp.reflect_differentials(&self.n, DIFFUSE_DIFFERENTIAL_SCALE);
        BsdfSample {
            omega_in,
            domega_in_dx: dx,
            domega_in_dy: dy,
            eval: Spectrum::new(pdf),
            pdf,
            label,
        }
    }
}

/// Lambertian transmission into the opposite hemisphere.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Translucent {
    /// Shading normal.
    pub(crate) n: Vector3f,
}

impl Translucent {
    /// Create a new `Translucent` closure.
    ///
    /// * `n` - Shading normal.
    pub fn new(n: Vector3f) -> Self {
        Self {
            n: n.safe_normalize(),
        }
    }

    /// Returns the closure label.
    pub fn label(&self) -> ClosureLabel {
        ClosureLabel::TRANSMIT | ClosureLabel::DIFFUSE
    }

    /// Evaluates transmission for a pair of directions.
    ///
    /// * `omega_out` - Direction towards the viewer.
    /// * `omega_in`  - Direction towards the light.
    pub fn eval_transmit(&self, omega_out: &Vector3f, omega_in: &Vector3f) -> BsdfEval {
        if self.n.dot(omega_out) <= 0.0 {
            return BsdfEval::ZERO;
        }

        let cos_pi = max(-self.n.dot(omega_in), 0.0) * INV_PI;
        BsdfEval::gray(cos_pi, cos_pi)
    }

    /// Importance samples the cosine lobe below the surface.
    ///
    /// * `sp` - Shading point.
    /// * `u`  - Uniform random sample.
    pub fn sample(&self, sp: &ShadingPoint, u: &Point2f) -> BsdfSample {
        let label = self.label();
        if self.n.dot(&sp.omega_out) <= 0.0 {
            return BsdfSample::invalid(label);
        }

        let (omega_in, pdf) = sample_cos_hemisphere(&-self.n, u);
        if sp.ng.dot(&omega_in) >= 0.0 {
            return BsdfSample::invalid(label);
        }

        let (dx, dy) = sp.reflect_differentials(&self.n, DIFFUSE_DIFFERENTIAL_SCALE);
        BsdfSample {
            omega_in,
            domega_in_dx: -dx,
            domega_in_dy: -dy,
            eval: Spectrum::new(pdf),
            pdf,
            label,
        }
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

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
    fn center_sample_is_normal() {
        let d = Diffuse::new(Z);
        let s = d.sample(&ShadingPoint::new(Z, Z), &Point2f::new(0.5, 0.5));
        assert!(approx_eq!(f32, s.omega_in.z, 1.0, epsilon = 1e-6));
        assert!(approx_eq!(f32, s.pdf, INV_PI, epsilon = 1e-6));
        assert!(approx_eq!(f32, s.eval[0], s.pdf, epsilon = 1e-6));
    }

    #[test]
    fn below_horizon_is_zero() {
        let d = Diffuse::new(Z);
        let below = Vector3f::new(0.0, 0.6, -0.8);
        assert_eq!(d.eval_reflect(&below, &Z), BsdfEval::ZERO);
        assert_eq!(d.eval_reflect(&Z, &below).value, Spectrum::ZERO);
        assert!(!d.sample(&ShadingPoint::new(Z, below), &Point2f::new(0.3, 0.3)).is_valid());
    }

    #[test]
    fn translucent_transmits_below() {
        let t = Translucent::new(Z);
        let s = t.sample(&ShadingPoint::new(Z, Z), &Point2f::new(0.2, 0.7));
        assert!(s.is_valid());
        assert!(s.omega_in.z < 0.0);
        let e = t.eval_transmit(&Z, &s.omega_in);
        assert!(approx_eq!(f32, e.pdf, s.pdf, epsilon = 1e-5));
        assert_eq!(t.eval_transmit(&Z, &Z), BsdfEval::ZERO);
    }

    #[test]
    fn differentials_are_widened() {
        let d = Diffuse::new(Z);
        let sp = ShadingPoint::new(Z, Z)
            .with_differentials(Vector3f::new(0.01, 0.0, 0.0), Vector3f::new(0.0, 0.01, 0.0));
        let s = d.sample(&sp, &Point2f::new(0.5, 0.5));
        assert!(approx_eq!(f32, s.domega_in_dx.x, -1.25, epsilon = 1e-5));
        assert!(approx_eq!(f32, s.domega_in_dy.y, -1.25, epsilon = 1e-5));
    }
}
