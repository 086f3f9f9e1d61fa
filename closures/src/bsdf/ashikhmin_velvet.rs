//! Ashikhmin Velvet

use super::*;

/// Ashikhmin-Premoze velvet model for cloth-like retro-reflection at grazing
/// angles.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct AshikhminVelvet {
    /// Shading normal.
    pub(crate) n: Vector3f,

    /// Width of the inverted Gaussian; at least 0.01.
    pub(crate) sigma: Float,

    /// `1 / sigma^2`.
    invsigma2: Float,
}

impl AshikhminVelvet {
    /// Create a new `AshikhminVelvet` closure.
    ///
    /// * `n`     - Shading normal.
    /// * `sigma` - Roughness; clamped to at least 0.01.
    pub fn new(n: Vector3f, sigma: Float) -> Self {
        let sigma = max(sigma, 0.01);
        Self {
            n: n.safe_normalize(),
            sigma,
            invsigma2: 1.0 / (sigma * sigma),
        }
    }

    /// Returns the closure label.
    pub fn label(&self) -> ClosureLabel {
        ClosureLabel::REFLECT | ClosureLabel::DIFFUSE
    }

    fn value(&self, omega_out: &Vector3f, omega_in: &Vector3f, cos_no: Float, cos_ni: Float) -> Option<Float> {
        let h = (*omega_in + *omega_out).normalize();
        let cos_nh = self.n.dot(&h);
        let cos_ho = abs(omega_out.dot(&h));

        if !(abs(cos_nh) < 1.0 - 1e-5 && cos_ho > 1e-5) {
            return None;
        }

        let cos_nh_div_ho = max(cos_nh / cos_ho, 1e-5);
        let fac1 = 2.0 * abs(cos_nh_div_ho * cos_no);
        let fac2 = 2.0 * abs(cos_nh_div_ho * cos_ni);

        let sin_nh2 = 1.0 - cos_nh * cos_nh;
        let sin_nh4 = sin_nh2 * sin_nh2;
        let cotangent2 = (cos_nh * cos_nh) / sin_nh2;

        let d = (-cotangent2 * self.invsigma2).exp() * self.invsigma2 * INV_PI / sin_nh4;
        let g = min(1.0, min(fac1, fac2));

        Some(0.25 * (d * g) / cos_no)
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

        self.value(omega_out, omega_in, cos_no, cos_ni)
            .map_or(BsdfEval::ZERO, |v| BsdfEval::gray(v, uniform_hemisphere_pdf()))
    }

    /// Samples the hemisphere uniformly.
    ///
    /// * `sp` - Shading point.
    /// * `u`  - Uniform random sample.
    pub fn sample(&self, sp: &ShadingPoint, u: &Point2f) -> BsdfSample {
        let label = self.label();
        let cos_no = self.n.dot(&sp.omega_out);
        if cos_no <= 0.0 {
            return BsdfSample::invalid(label);
        }

        let (omega_in, pdf) = sample_uniform_hemisphere(&self.n, u);
        if sp.ng.dot(&omega_in) <= 0.0 {
            return BsdfSample::invalid(label);
        }

        let cos_ni = self.n.dot(&omega_in);
        match self.value(&sp.omega_out, &omega_in, cos_no, cos_ni) {
            Some(v) => {
                let (dx, dy) = sp.reflect_differentials(&self.n, DIFFUSE_DIFFERENTIAL_SCALE);
                BsdfSample {
                    omega_in,
                    domega_in_dx: dx,
                    domega_in_dy: dy,
                    eval: Spectrum::new(v),
                    pdf,
                    label,
                }
            }
            None => BsdfSample::invalid(label),
        }
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
    fn sigma_is_clamped() {
        assert_eq!(AshikhminVelvet::new(Z, 0.0).sigma, 0.01);
        assert_eq!(AshikhminVelvet::new(Z, 0.5).sigma, 0.5);
    }

    #[test]
    fn brighter_at_grazing() {
        let v = AshikhminVelvet::new(Z, 0.3);
        let grazing = Vector3f::new(0.0, 0.95, 0.312).normalize();
        let near = Vector3f::new(0.0, 0.3, 0.954).normalize();
        // Retro-reflection.
        assert!(v.eval_reflect(&grazing, &grazing).value[0] > v.eval_reflect(&near, &near).value[0]);
    }

    #[test]
    fn half_vector_along_normal_is_zero() {
        let v = AshikhminVelvet::new(Z, 0.3);
        assert_eq!(v.eval_reflect(&Z, &Z), BsdfEval::ZERO);
    }
}
