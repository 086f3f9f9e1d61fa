//! Volume Phase Closures

use crate::common::*;
use pbrt_core::geometry::*;
use pbrt_core::math::*;
use pbrt_core::sampling::*;
use pbrt_core::spectrum::*;

/// Henyey-Greenstein phase function.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct HenyeyGreenstein {
    /// The asymmetry parameter. Positive values favour forward scattering.
    pub(crate) g: Float,
}

impl HenyeyGreenstein {
    /// Largest magnitude of the asymmetry parameter.
    pub const MAX_G: Float = 1.0 - 1e-3;

    /// Returns a new `HenyeyGreenstein`.
    ///
    /// * `g` - The asymmetry parameter; clamped to (-1, 1).
    pub fn new(g: Float) -> Self {
        Self {
            g: clamp(g, -Self::MAX_G, Self::MAX_G),
        }
    }

    /// Returns the asymmetry parameter.
    pub fn g(&self) -> Float {
        self.g
    }
}

/// Volume scattering closures.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum VolumeClosure {
    Isotropic,
    HenyeyGreenstein(HenyeyGreenstein),
}

impl VolumeClosure {
    /// Returns the registry name of the closure.
    pub fn name(&self) -> &'static str {
        match self {
            VolumeClosure::Isotropic => "isotropic",
            VolumeClosure::HenyeyGreenstein(_) => "henyey_greenstein",
        }
    }

    /// Returns the closure label.
    pub fn label(&self) -> ClosureLabel {
        ClosureLabel::VOLUME_SCATTER
    }

    /// Returns the phase function value for a pair of directions. The value
    /// equals the PDF of `sample()`.
    ///
    /// * `omega_out` - Direction towards the viewer.
    /// * `omega_in`  - Direction towards the light.
    pub fn eval_phase(&self, omega_out: &Vector3f, omega_in: &Vector3f) -> BsdfEval {
        let p = match self {
            VolumeClosure::Isotropic => uniform_sphere_pdf(),
            VolumeClosure::HenyeyGreenstein(hg) => phase_hg(omega_out.dot(omega_in), hg.g),
        };
        BsdfEval::gray(p, p)
    }

    /// Samples an incident direction from the phase function.
    ///
    /// * `sp` - Shading point.
    /// * `u`  - Uniform random sample.
    pub fn sample(&self, sp: &ShadingPoint, u: &Point2f) -> BsdfSample {
        let (omega_in, p) = match self {
            VolumeClosure::Isotropic => (uniform_sample_sphere(u), uniform_sphere_pdf()),
            VolumeClosure::HenyeyGreenstein(hg) => sample_hg(&sp.omega_out, hg.g, u),
        };

        BsdfSample {
            omega_in,
            domega_in_dx: Vector3f::zero(),
            domega_in_dy: Vector3f::zero(),
            eval: Spectrum::new(p),
            pdf: p,
            label: self.label(),
        }
    }
}

/// Computes the Henyey-Greenstein phase function.
///
/// * `cos_theta` - Cosine of the angle between the two directions.
/// * `g`         - Asymmetry parameter.
#[inline]
pub fn phase_hg(cos_theta: Float, g: Float) -> Float {
    let denom = 1.0 + g * g + 2.0 * g * cos_theta;
    INV_FOUR_PI * (1.0 - g * g) / (denom * denom.sqrt())
}

/// Samples the Henyey-Greenstein phase function about `wo`. Returns the
/// direction and its PDF.
///
/// * `wo` - Direction towards the viewer.
/// * `g`  - Asymmetry parameter.
/// * `u`  - Uniform random sample.
fn sample_hg(wo: &Vector3f, g: Float, u: &Point2f) -> (Vector3f, Float) {
    let cos_theta = if abs(g) < 1e-3 {
        1.0 - 2.0 * u[0]
    } else {
        let sqr_term = (1.0 - g * g) / (1.0 + g - 2.0 * g * u[0]);
        -(1.0 + g * g - sqr_term * sqr_term) / (2.0 * g)
    };
    let cos_theta = clamp(cos_theta, -1.0, 1.0);

    let sin_theta = safe_sqrt(1.0 - cos_theta * cos_theta);
    let phi = TWO_PI * u[1];
    let (v1, v2) = coordinate_system(wo);
    let wi = spherical_direction_in_frame(sin_theta, cos_theta, phi.sin(), phi.cos(), &v1, &v2, wo);
    (wi, phase_hg(cos_theta, g))
}
