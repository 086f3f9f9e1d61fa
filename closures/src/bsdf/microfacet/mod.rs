//! Microfacet Closures

use super::*;
use std::fmt;
use std::marker::PhantomData;

mod beckmann;
mod ggx;

// Re-exports
pub use beckmann::*;
pub use ggx::*;

/// Roughness at or below which the closures degenerate to a perfect mirror
/// or a smooth dielectric.
pub const MICROFACET_SINGULAR_ALPHA: Float = 1e-4;

/// Interface for isotropic microfacet normal distributions.
pub trait MicrofacetDistribution: Copy + Clone + fmt::Debug + Default + PartialEq {
    /// Returns the differential area of microfacets at angle θm to the
    /// normal.
    ///
    /// * `alpha`       - Roughness.
    /// * `cos_theta_m` - Cosine of the microfacet normal to the normal.
    fn d(alpha: Float, cos_theta_m: Float) -> Float;

    /// Evaluates Smith's monodirectional shadowing term.
    ///
    /// * `alpha`     - Roughness.
    /// * `cos_theta` - Cosine of the direction to the normal.
    fn g1(alpha: Float, cos_theta: Float) -> Float;

    /// Returns tan²θm of a microfacet normal sampled proportional to
    /// `D cosθm`.
    ///
    /// * `alpha` - Roughness.
    /// * `u`     - Uniform random value.
    fn sample_tan2(alpha: Float, u: Float) -> Float;
}

/// Selects between the reflective and the refractive variant.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum MicrofacetMode {
    Reflect,
    Refract,
}

/// Walter et al. 2007 microfacet closure over a normal distribution `D`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct MicrofacetClosure<D: MicrofacetDistribution> {
    /// Shading normal.
    pub(crate) n: Vector3f,

    /// Roughness in [1e-5, 1].
    pub(crate) alpha: Float,

    /// Relative index of refraction.
    pub(crate) eta: Float,

    /// Reflective or refractive.
    mode: MicrofacetMode,

    _distribution: PhantomData<D>,
}

impl<D: MicrofacetDistribution> MicrofacetClosure<D> {
    /// Create a new reflective microfacet closure.
    ///
    /// * `n`     - Shading normal.
    /// * `alpha` - Roughness; clamped to [1e-5, 1].
    pub fn reflection(n: Vector3f, alpha: Float) -> Self {
        Self::new(n, alpha, 1.0, MicrofacetMode::Reflect)
    }

    /// Create a new refractive microfacet closure.
    ///
    /// * `n`     - Shading normal.
    /// * `alpha` - Roughness; clamped to [1e-5, 1].
    /// * `eta`   - Relative index of refraction.
    pub fn refraction(n: Vector3f, alpha: Float, eta: Float) -> Self {
        Self::new(n, alpha, eta, MicrofacetMode::Refract)
    }

    /// Create a new microfacet closure.
    ///
    /// * `n`     - Shading normal.
    /// * `alpha` - Roughness; clamped to [1e-5, 1].
    /// * `eta`   - Relative index of refraction.
    /// * `mode`  - Reflective or refractive.
    pub fn new(n: Vector3f, alpha: Float, eta: Float, mode: MicrofacetMode) -> Self {
        Self {
            n: n.safe_normalize(),
            alpha: clamp(alpha, 1e-5, 1.0),
            eta: max(eta, 1e-5),
            mode,
            _distribution: PhantomData,
        }
    }

    /// Returns the variant.
    pub fn mode(&self) -> MicrofacetMode {
        self.mode
    }

    /// Returns true if the closure degenerates to a singular lobe.
    pub fn is_singular(&self) -> bool {
        self.alpha <= MICROFACET_SINGULAR_ALPHA
    }

    /// Returns the closure label.
    pub fn label(&self) -> ClosureLabel {
        let lobe = if self.is_singular() {
            ClosureLabel::SINGULAR
        } else {
            ClosureLabel::GLOSSY
        };

        match self.mode {
            MicrofacetMode::Reflect => ClosureLabel::REFLECT | lobe,
            MicrofacetMode::Refract => ClosureLabel::TRANSMIT | lobe,
        }
    }

    /// Evaluates reflection for a pair of directions.
    ///
    /// * `omega_out` - Direction towards the viewer.
    /// * `omega_in`  - Direction towards the light.
    pub fn eval_reflect(&self, omega_out: &Vector3f, omega_in: &Vector3f) -> BsdfEval {
        if self.mode == MicrofacetMode::Refract || self.is_singular() {
            return BsdfEval::ZERO;
        }

        let cos_no = self.n.dot(omega_out);
        let cos_ni = self.n.dot(omega_in);
        if cos_no <= 0.0 || cos_ni <= 0.0 {
            return BsdfEval::ZERO;
        }

        let hr = (*omega_in + *omega_out).normalize();
        let cos_theta_m = self.n.dot(&hr);
        let cos_ho = hr.dot(omega_out);
        if cos_theta_m <= 0.0 || cos_ho <= 0.0 {
            return BsdfEval::ZERO;
        }

        let d = D::d(self.alpha, cos_theta_m);
        let g = D::g1(self.alpha, cos_no) * D::g1(self.alpha, cos_ni);

        let value = (g * d) * 0.25 / cos_no;
        let pdf = d * cos_theta_m * 0.25 / cos_ho;
        BsdfEval::gray(value, pdf)
    }

    /// Evaluates transmission for a pair of directions.
    ///
    /// * `omega_out` - Direction towards the viewer.
    /// * `omega_in`  - Direction towards the light.
    pub fn eval_transmit(&self, omega_out: &Vector3f, omega_in: &Vector3f) -> BsdfEval {
        if self.mode == MicrofacetMode::Reflect || self.is_singular() {
            return BsdfEval::ZERO;
        }

        let cos_no = self.n.dot(omega_out);
        let cos_ni = self.n.dot(omega_in);
        if cos_no <= 0.0 || cos_ni >= 0.0 {
            return BsdfEval::ZERO;
        }

        // Half vector for refraction.
        let ht = -(self.eta * *omega_in + *omega_out);
        let ht2 = ht.length_squared();
        if ht2 <= 0.0 {
            return BsdfEval::ZERO;
        }

        // Orient the microfacet normal with the shading normal.
        let mut m = ht / ht2.sqrt();
        if self.n.dot(&m) < 0.0 {
            m = -m;
        }

        let cos_theta_m = self.n.dot(&m);
        if cos_theta_m <= 0.0 {
            return BsdfEval::ZERO;
        }

        let cos_ho = m.dot(omega_out);
        let cos_hi = m.dot(omega_in);

        let d = D::d(self.alpha, cos_theta_m);
        let g = D::g1(self.alpha, cos_no) * D::g1(self.alpha, cos_ni);
        let eta2 = self.eta * self.eta;

        let value = (abs(cos_hi * cos_ho) * eta2 * (g * d)) / (cos_no * ht2);
        let pdf = d * cos_theta_m * eta2 * abs(cos_hi) / ht2;
        BsdfEval::gray(value, pdf)
    }

    /// Samples a microfacet normal proportional to `D cosθm` and reflects or
    /// refracts the view direction about it.
    ///
    /// * `sp` - Shading point.
    /// * `u`  - Uniform random sample.
    pub fn sample(&self, sp: &ShadingPoint, u: &Point2f) -> BsdfSample {
        let label = self.label();
        let cos_no = self.n.dot(&sp.omega_out);
        if cos_no <= 0.0 {
            return BsdfSample::invalid(label);
        }

        let (x, y) = coordinate_system(&self.n);
        let tan2 = D::sample_tan2(self.alpha, u[0]);
        let cos_theta_m = 1.0 / (1.0 + tan2).sqrt();
        let sin_theta_m = safe_sqrt(1.0 - cos_theta_m * cos_theta_m);
        let phi_m = TWO_PI * u[1];
        let m = spherical_direction_in_frame(
            sin_theta_m,
            cos_theta_m,
            phi_m.sin(),
            phi_m.cos(),
            &x,
            &y,
            &self.n,
        );

        match self.mode {
            MicrofacetMode::Reflect => self.sample_reflect(sp, &m, cos_no, cos_theta_m, label),
            MicrofacetMode::Refract => self.sample_refract(sp, &m, cos_no, cos_theta_m, label),
        }
    }

    fn sample_reflect(
        &self,
        sp: &ShadingPoint,
        m: &Vector3f,
        cos_no: Float,
        cos_theta_m: Float,
        label: ClosureLabel,
    ) -> BsdfSample {
        let cos_mo = m.dot(&sp.omega_out);
        if cos_mo <= 0.0 {
            return BsdfSample::invalid(label);
        }

        let omega_in = (2.0 * cos_mo) * *m - sp.omega_out;
        if sp.ng.dot(&omega_in) <= 0.0 {
            return BsdfSample::invalid(label);
        }

        let (dx, dy) = sp.reflect_differentials(m, 1.0);
        let (eval, pdf) = if self.is_singular() {
            (SINGULAR_PDF, SINGULAR_PDF)
        } else {
            let cos_ni = self.n.dot(&omega_in);
            if cos_ni <= 0.0 {
                return BsdfSample::invalid(label);
            }

            let d = D::d(self.alpha, cos_theta_m);
            let g = D::g1(self.alpha, cos_no) * D::g1(self.alpha, cos_ni);
            ((g * d) * 0.25 / cos_no, d * cos_theta_m / (4.0 * cos_mo))
        };

        BsdfSample {
            omega_in,
            domega_in_dx: dx,
            domega_in_dy: dy,
            eval: Spectrum::new(eval),
            pdf,
            label,
        }
    }

    fn sample_refract(
        &self,
        sp: &ShadingPoint,
        m: &Vector3f,
        cos_no: Float,
        cos_theta_m: Float,
        label: ClosureLabel,
    ) -> BsdfSample {
        let f = fresnel_dielectric(self.eta, m, sp);
        if f.is_inside || f.fresnel == 1.0 {
            return BsdfSample::invalid(label);
        }

        let omega_in = f.t;
        if sp.ng.dot(&omega_in) >= 0.0 {
            return BsdfSample::invalid(label);
        }

        let (eval, pdf) = if self.is_singular() {
            (SINGULAR_PDF, SINGULAR_PDF)
        } else {
            let cos_ni = self.n.dot(&omega_in);
            if cos_ni >= 0.0 {
                return BsdfSample::invalid(label);
            }

            let d = D::d(self.alpha, cos_theta_m);
            let g = D::g1(self.alpha, cos_no) * D::g1(self.alpha, cos_ni);

            let cos_hi = m.dot(&omega_in);
            let cos_ho = m.dot(&sp.omega_out);
            let ht2 = self.eta * cos_hi + cos_ho;
            let ht2 = ht2 * ht2;
            let eta2 = self.eta * self.eta;

            (
                (abs(cos_hi * cos_ho) * eta2 * (g * d)) / (cos_no * ht2),
                d * cos_theta_m * eta2 * abs(cos_hi) / ht2,
            )
        };

        BsdfSample {
            omega_in,
            domega_in_dx: f.dt_dx,
            domega_in_dy: f.dt_dy,
            eval: Spectrum::new(eval),
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
    use pbrt_core::rng::RNG;
    use float_cmp::approx_eq;

    const Z: Vector3f = Vector3f {
        x: 0.0,
        y: 0.0,
        z: 1.0,
    };

    fn check_pdf<D: MicrofacetDistribution>(c: &MicrofacetClosure<D>, wo: Vector3f) {
        let sp = ShadingPoint::new(Z, wo);
        let mut rng = RNG::new(7);
        let mut valid = 0;
        for _ in 0..256 {
            let s = c.sample(&sp, &rng.uniform_point2f());
            if !s.is_valid() {
                continue;
            }
            valid += 1;
            let e = match c.mode() {
                MicrofacetMode::Reflect => c.eval_reflect(&wo, &s.omega_in),
                MicrofacetMode::Refract => c.eval_transmit(&wo, &s.omega_in),
            };
            let tol = 1e-3 * max(1.0, s.pdf);
            assert!((e.pdf - s.pdf).abs() < tol, "{} vs {}", e.pdf, s.pdf);
            assert!((e.value[0] - s.eval[0]).abs() < 1e-3 * max(1.0, s.eval[0]));
        }
        assert!(valid > 0);
    }

    #[test]
    fn ggx_sample_matches_eval() {
        let wo = Vector3f::new(0.4, 0.2, 0.8).normalize();
        check_pdf(&MicrofacetGgx::reflection(Z, 0.3), wo);
        check_pdf(&MicrofacetGgx::refraction(Z, 0.3, 1.5), wo);
    }

    #[test]
    fn beckmann_sample_matches_eval() {
        let wo = Vector3f::new(-0.3, 0.5, 0.7).normalize();
        check_pdf(&MicrofacetBeckmann::reflection(Z, 0.4), wo);
        check_pdf(&MicrofacetBeckmann::refraction(Z, 0.4, 1.33), wo);
    }

    #[test]
    fn singular_mirror() {
        let c = MicrofacetGgx::reflection(Z, 0.0);
        assert!(c.is_singular());
        assert!(c.label().contains(ClosureLabel::SINGULAR));

        let wo = Vector3f::new(0.6, 0.0, 0.8);
        let s = c.sample(&ShadingPoint::new(Z, wo), &Point2f::new(0.5, 0.5));
        assert_eq!(s.pdf, SINGULAR_PDF);
        assert!(approx_eq!(f32, s.omega_in.x, -0.6, epsilon = 1e-4));
        assert_eq!(c.eval_reflect(&wo, &s.omega_in), BsdfEval::ZERO);
    }

    #[test]
    fn modes_do_not_cross() {
        let wo = Vector3f::new(0.0, 0.6, 0.8);
        let below = Vector3f::new(0.0, -0.6, -0.8);
        let r = MicrofacetGgx::reflection(Z, 0.5);
        let t = MicrofacetGgx::refraction(Z, 0.5, 1.5);
        assert_eq!(r.eval_transmit(&wo, &below), BsdfEval::ZERO);
        assert_eq!(t.eval_reflect(&wo, &wo), BsdfEval::ZERO);
        assert!(t.eval_transmit(&wo, &below).pdf > 0.0);
    }
}
