//! Westin Backscatter and Sheen

use super::*;

/// Glossy lobe around the view direction.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct WestinBackscatter {
    /// Shading normal.
    pub(crate) n: Vector3f,

    /// Roughness in [1e-5, 1].
    pub(crate) roughness: Float,

    /// Lobe exponent `1 / roughness`.
    invroughness: Float,
}

impl WestinBackscatter {
    /// Create a new `WestinBackscatter` closure.
    ///
    /// * `n`         - Shading normal.
    /// * `roughness` - Roughness; clamped to [1e-5, 1].
    pub fn new(n: Vector3f, roughness: Float) -> Self {
        let roughness = clamp(roughness, 1e-5, 1.0);
        Self {
            n: n.safe_normalize(),
            roughness,
            invroughness: 1.0 / roughness,
        }
    }

    /// Returns the closure label.
    pub fn label(&self) -> ClosureLabel {
        ClosureLabel::REFLECT | ClosureLabel::GLOSSY
    }

    /// Evaluates reflection for a pair of directions.
    ///
    /// * `omega_out` - Direction towards the viewer.
    /// * `omega_in`  - Direction towards the light.
    pub fn eval_reflect(&self, omega_out: &Vector3f, omega_in: &Vector3f) -> BsdfEval {
        if self.n.dot(omega_out) <= 0.0 || self.n.dot(omega_in) <= 0.0 {
            return BsdfEval::ZERO;
        }

        let pdf = power_cosine_lobe_pdf(self.invroughness, omega_out.dot(omega_in));
        BsdfEval::gray(pdf, pdf)
    }

    /// Samples the lobe around the view direction.
    ///
    /// * `sp` - Shading point.
    /// * `u`  - Uniform random sample.
    pub fn sample(&self, sp: &ShadingPoint, u: &Point2f) -> BsdfSample {
        let label = self.label();
        if self.n.dot(&sp.omega_out) <= 0.0 {
            return BsdfSample::invalid(label);
        }

        let (omega_in, cos_theta) = sample_power_cosine_lobe(&sp.omega_out, self.invroughness, u);
        if sp.ng.dot(&omega_in) <= 0.0 || self.n.dot(&omega_in) <= 0.0 {
            return BsdfSample::invalid(label);
        }

        let pdf = power_cosine_lobe_pdf(self.invroughness, cos_theta);
        BsdfSample {
            omega_in,
            domega_in_dx: GLOSSY_DIFFERENTIAL_SCALE * sp.domega_out_dx,
            domega_in_dy: GLOSSY_DIFFERENTIAL_SCALE * sp.domega_out_dy,
            eval: Spectrum::new(pdf),
            pdf,
            label,
        }
    }
}

/// Diffuse sheen that brightens towards grazing view angles.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct WestinSheen {
    /// Shading normal.
    pub(crate) n: Vector3f,

    /// Strength of the grazing boost.
    pub(crate) edginess: Float,
}

impl WestinSheen {
    /// Create a new `WestinSheen` closure.
    ///
    /// * `n`        - Shading normal.
    /// * `edginess` - Grazing boost; clamped to non-negative values.
    pub fn new(n: Vector3f, edginess: Float) -> Self {
        Self {
            n: n.safe_normalize(),
            edginess: max(edginess, 0.0),
        }
    }

    /// Returns the closure label.
    pub fn label(&self) -> ClosureLabel {
        ClosureLabel::REFLECT | ClosureLabel::DIFFUSE
    }

    fn westin(&self, cos_no: Float, pdf: Float) -> Float {
        let sin_no2 = 1.0 - cos_no * cos_no;
        if sin_no2 > 0.0 {
            sin_no2.powf(0.5 * self.edginess) * pdf
        } else {
            0.0
        }
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

        let pdf = cos_ni * INV_PI;
        BsdfEval::gray(self.westin(cos_no, pdf), pdf)
    }

    /// Importance samples the cosine lobe.
    ///
    /// * `sp` - Shading point.
    /// * `u`  - Uniform random sample.
    pub fn sample(&self, sp: &ShadingPoint, u: &Point2f) -> BsdfSample {
        let label = self.label();
        let cos_no = self.n.dot(&sp.omega_out);
        if cos_no <= 0.0 {
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
            eval: Spectrum::new(self.westin(cos_no, pdf)),
            pdf,
            label,
        }
    }
}
