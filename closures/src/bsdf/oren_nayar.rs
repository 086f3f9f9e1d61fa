//! Oren-Nayar

use super::*;

/// Normalized qualitative Oren-Nayar model for rough diffuse surfaces.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct OrenNayar {
    /// Shading normal.
    pub(crate) n: Vector3f,

    /// Roughness in [0, 1].
    pub(crate) roughness: Float,

    /// Constant term.
    a: Float,

    /// Retro-reflective term.
    b: Float,
}

impl OrenNayar {
    /// Create a new `OrenNayar` closure.
    ///
    /// * `n`     - Shading normal.
    /// * `sigma` - Roughness; clamped to [0, 1].
    pub fn new(n: Vector3f, sigma: Float) -> Self {
        let sigma = saturate(sigma);
        let div = 1.0 / (PI + ((3.0 * PI - 4.0) / 6.0) * sigma);

        Self {
            n: n.safe_normalize(),
            roughness: sigma,
            a: div,
            b: sigma * div,
        }
    }

    /// Returns the closure label.
    pub fn label(&self) -> ClosureLabel {
        ClosureLabel::REFLECT | ClosureLabel::DIFFUSE
    }

    /// Returns the cosine weighted intensity for view `v` and light `l`.
    fn intensity(&self, v: &Vector3f, l: &Vector3f) -> Float {
        let nl = max(self.n.dot(l), 0.0);
        let nv = max(self.n.dot(v), 0.0);

        let mut t = l.dot(v) - nl * nv;
        if t > 0.0 {
            t /= max(nl, nv) + FLOAT_MIN;
        }

        nl * (self.a + self.b * t)
    }

    /// Evaluates reflection for a pair of directions.
    ///
    /// * `omega_out` - Direction towards the viewer.
    /// * `omega_in`  - Direction towards the light.
    pub fn eval_reflect(&self, omega_out: &Vector3f, omega_in: &Vector3f) -> BsdfEval {
        if self.n.dot(omega_out) <= 0.0 || self.n.dot(omega_in) <= 0.0 {
            return BsdfEval::ZERO;
        }

        BsdfEval::gray(
            self.intensity(omega_out, omega_in),
            uniform_hemisphere_pdf(),
        )
    }

    /// Samples the hemisphere uniformly.
    ///
    /// * `sp` - Shading point.
    /// * `u`  - Uniform random sample.
    pub fn sample(&self, sp: &ShadingPoint, u: &Point2f) -> BsdfSample {
        let label = self.label();
        if self.n.dot(&sp.omega_out) <= 0.0 {
            return BsdfSample::invalid(label);
        }

        let (omega_in, pdf) = sample_uniform_hemisphere(&self.n, u);
        if sp.ng.dot(&omega_in) <= 0.0 {
            return BsdfSample::invalid(label);
        }

        let (dx, dy) = sp.reflect_differentials(&self.n, DIFFUSE_DIFFERENTIAL_SCALE);
        BsdfSample {
            omega_in,
            domega_in_dx: dx,
            domega_in_dy: dy,
            eval: Spectrum::new(self.intensity(&sp.omega_out, &omega_in)),
            pdf,
            label,
        }
    }
}
