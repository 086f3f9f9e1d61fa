//! Ward

use super::*;
use pbrt_core::fast_math::fast_expf;

/// Anisotropic Ward model with the lobe aligned to a tangent.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Ward {
    /// Shading normal.
    pub(crate) n: Vector3f,

    /// Tangent giving the direction of `ax`.
    pub(crate) t: Vector3f,

    /// Roughness along the tangent.
    pub(crate) ax: Float,

    /// Roughness along the bitangent.
    pub(crate) ay: Float,
}

impl Ward {
    /// Create a new `Ward` closure.
    ///
    /// * `n`  - Shading normal.
    /// * `t`  - Tangent; projected onto the plane of `n`. A tangent parallel
    ///          to `n` is replaced by an arbitrary one.
    /// * `ax` - Roughness along the tangent; clamped to [1e-5, 1].
    /// * `ay` - Roughness along the bitangent; clamped to [1e-5, 1].
    pub fn new(n: Vector3f, t: Vector3f, ax: Float, ay: Float) -> Self {
        let n = n.safe_normalize();
        let tp = t.reject(&n);
        let t = if tp.length_squared() > 1e-12 {
            tp.normalize()
        } else {
            coordinate_system(&n).0
        };
        Self {
            n,
            t,
            ax: clamp(ax, 1e-5, 1.0),
            ay: clamp(ay, 1e-5, 1.0),
        }
    }

    /// Returns the closure label.
    pub fn label(&self) -> ClosureLabel {
        ClosureLabel::REFLECT | ClosureLabel::GLOSSY
    }

    /// Returns the value and PDF for the half vector `h`.
    fn eval_half(&self, h: &Vector3f, cos_no: Float, cos_ni: Float, cos_ho: Float) -> BsdfEval {
        let (x, y) = coordinate_system_tangent(&self.n, &self.t);
        let dotx = h.dot(&x) / self.ax;
        let doty = h.dot(&y) / self.ay;
        let dotn = h.dot(&self.n);
        if dotn <= 0.0 || cos_ho <= 0.0 {
            return BsdfEval::ZERO;
        }

        let exp_val = fast_expf(-(dotx * dotx + doty * doty) / (dotn * dotn));
        let norm = FOUR_PI * self.ax * self.ay;

        let value = cos_ni * exp_val / (norm * (cos_no * cos_ni).sqrt());
        let pdf = exp_val / (norm * cos_ho * dotn * dotn * dotn);
        BsdfEval::gray(value, pdf)
    }

    /// Evaluates reflection for a pair of directions.
    ///
    /// * `omega_out` - Direction towards the viewer.
    /// * `omega_in`  - Direction towards the light.
    pub fn eval_reflect(&self, omega_out: &Vector3f, omega_in: &Vector3f) -> BsdfEval {
        let cos_no = self.n.dot(omega_out);
        let cos_ni = self.n.dot(omega_in);
        if cos_no <= 0.0 || cos_ni <= 0.0 {
            return BsdfEval::ZERO;
        }

        let h = (*omega_in + *omega_out).normalize();
        self.eval_half(&h, cos_no, cos_ni, h.dot(omega_out))
    }

    /// Samples the half vector from the anisotropic Gaussian.
    ///
    /// * `sp` - Shading point.
    /// * `u`  - Uniform random sample.
    pub fn sample(&self, sp: &ShadingPoint, u: &Point2f) -> BsdfSample {
        let label = self.label();
        let cos_no = self.n.dot(&sp.omega_out);
        if cos_no <= 0.0 {
            return BsdfSample::invalid(label);
        }

        // Azimuth: invert the CDF in the first quadrant, then mirror.
        let (randu, randv) = (u[0], u[1]);
        let ratio = self.ay / self.ax;
        let (val, flip_cos, flip_sin) = if randu < 0.25 {
            (4.0 * randu, false, false)
        } else if randu < 0.5 {
            (1.0 - 4.0 * (0.5 - randu), true, false)
        } else if randu < 0.75 {
            (4.0 * (randu - 0.5), true, true)
        } else {
            (1.0 - 4.0 * (1.0 - randu), false, true)
        };

        let phi = (ratio * (PI_OVER_TWO * min(val, ONE_MINUS_EPSILON)).tan()).atan();
        let cos_phi = if flip_cos { -phi.cos() } else { phi.cos() };
        let sin_phi = if flip_sin { -phi.sin() } else { phi.sin() };

        let theta_denom = (cos_phi * cos_phi) / (self.ax * self.ax)
            + (sin_phi * sin_phi) / (self.ay * self.ay);
        let tan_theta2 = -(1.0 - min(randv, ONE_MINUS_EPSILON)).ln() / theta_denom;
        let cos_theta = 1.0 / (1.0 + tan_theta2).sqrt();
        let sin_theta = cos_theta * tan_theta2.sqrt();

        let (x, y) = coordinate_system_tangent(&self.n, &self.t);
        let h = spherical_direction_in_frame(sin_theta, cos_theta, sin_phi, cos_phi, &x, &y, &self.n);

        let cos_ho = h.dot(&sp.omega_out);
        if cos_ho <= 0.0 {
            return BsdfSample::invalid(label);
        }

        let omega_in = (2.0 * cos_ho) * h - sp.omega_out;
        if sp.ng.dot(&omega_in) <= 0.0 {
            return BsdfSample::invalid(label);
        }

        let cos_ni = self.n.dot(&omega_in);
        if cos_ni <= 0.0 {
            return BsdfSample::invalid(label);
        }

        let e = self.eval_half(&h, cos_no, cos_ni, cos_ho);
        let (dx, dy) = sp.reflect_differentials(&self.n, 1.0);
        BsdfSample {
            omega_in,
            domega_in_dx: dx,
            domega_in_dy: dy,
            eval: e.value,
            pdf: e.pdf,
            label,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pbrt_core::rng::RNG;
    use float_cmp::approx_eq;

    const Z: Vector3f = Vector3f {
        x: 0.0,
        y: 0.0,
        z: 1.0,
    };

    const X: Vector3f = Vector3f {
        x: 1.0,
        y: 0.0,
        z: 0.0,
    };

    #[test]
    fn sample_pdf_matches_eval() {
        let w = Ward::new(Z, X, 0.2, 0.5);
        let wo = Vector3f::new(0.2, -0.3, 0.9).normalize();
        let sp = ShadingPoint::new(Z, wo);
        let mut rng = RNG::new(3);
        for _ in 0..256 {
            let s = w.sample(&sp, &rng.uniform_point2f());
            if s.is_valid() {
                let e = w.eval_reflect(&wo, &s.omega_in);
                assert!((e.pdf - s.pdf).abs() < 1e-3 * max(1.0, s.pdf));
            }
        }
    }

    #[test]
    fn anisotropy_follows_tangent() {
        let w = Ward::new(Z, X, 0.1, 0.5);
        let wo = Z;
        let along_x = Vector3f::new(0.3, 0.0, 1.0).normalize();
        let along_y = Vector3f::new(0.0, 0.3, 1.0).normalize();
        let ex = w.eval_reflect(&wo, &along_x).value[0];
        let ey = w.eval_reflect(&wo, &along_y).value[0];
        assert!(ey > ex);
    }

    #[test]
    fn azimuth_quadrants() {
        let w = Ward::new(Z, X, 0.3, 0.3);
        let sp = ShadingPoint::new(Z, Z);
        let quadrant = |u: Float| {
            let s = w.sample(&sp, &Point2f::new(u, 0.5));
            // The half vector has the same azimuth as omega_in.
            (s.omega_in.x > 0.0, s.omega_in.y > 0.0)
        };
        assert_eq!(quadrant(0.1), (true, true));
        assert_eq!(quadrant(0.4), (false, true));
        assert_eq!(quadrant(0.6), (false, false));
        assert_eq!(quadrant(0.9), (true, false));
    }

    #[test]
    fn isotropic_azimuth_is_uniform() {
        let w = Ward::new(Z, X, 0.3, 0.3);
        let s = w.sample(&ShadingPoint::new(Z, Z), &Point2f::new(0.125, 0.5));
        // u = 1/8 maps to φ = π/4.
        assert!(approx_eq!(f32, s.omega_in.x, s.omega_in.y, epsilon = 1e-4));
    }

    #[test]
    fn tangent_parallel_to_normal() {
        let n = X;
        let w = Ward::new(n, X, 0.2, 0.2);
        assert!(w.t.dot(&n).abs() < 1e-6);
        assert!(approx_eq!(f32, w.t.length(), 1.0, epsilon = 1e-5));

        let wo = Vector3f::new(0.8, 0.6, 0.0);
        let wi = Vector3f::new(0.8, -0.6, 0.0);
        let e = w.eval_reflect(&wo, &wi);
        assert!(e.value[0].is_finite() && e.value[0] > 0.0);
        assert!(e.pdf.is_finite() && e.pdf > 0.0);

        let sp = ShadingPoint::new(n, wo);
        let mut rng = RNG::new(5);
        let mut valid = 0;
        for _ in 0..64 {
            let s = w.sample(&sp, &rng.uniform_point2f());
            if s.is_valid() {
                valid += 1;
                assert!(s.pdf.is_finite());
                assert!(s.omega_in.x.is_finite() && s.omega_in.y.is_finite() && s.omega_in.z.is_finite());
            }
        }
        assert!(valid > 0);
    }

    #[test]
    fn tangent_is_orthogonalized() {
        let w = Ward::new(Z, Vector3f::new(1.0, 0.0, 1.0), 0.2, 0.2);
        assert!(approx_eq!(f32, w.t.x, 1.0, epsilon = 1e-6));
        assert!(approx_eq!(f32, w.t.z, 0.0, epsilon = 1e-6));
    }
}
