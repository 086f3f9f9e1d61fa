//! Common closure types.

use bitflags::bitflags;
use pbrt_core::geometry::*;
use pbrt_core::math::*;
use pbrt_core::spectrum::*;

/// PDF and weight reported for singular (delta) lobes.
pub const SINGULAR_PDF: Float = 1e6;

/// Ray differential widening for diffuse-like lobes.
pub const DIFFUSE_DIFFERENTIAL_SCALE: Float = 125.0;

/// Ray differential widening for blurry glossy lobes.
pub const GLOSSY_DIFFERENTIAL_SCALE: Float = 10.0;

bitflags! {
    /// Describes the kind of scattering event a sample represents.
    #[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
    pub struct ClosureLabel: u8 {
        const REFLECT = 1;
        const TRANSMIT = 2;
        const DIFFUSE = 4;
        const GLOSSY = 8;
        const SINGULAR = 16;
        const TRANSPARENT = 32;
        const VOLUME_SCATTER = 64;
    }
}

impl ClosureLabel {
    /// Tests a label flag and returns whether it is set or not.
    ///
    /// * `other` - Label flags to match.
    pub fn matches(&self, other: Self) -> bool {
        self.intersects(other)
    }
}

/// Result of evaluating a closure for a pair of directions.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct BsdfEval {
    /// Closure value including the cosine foreshortening term.
    pub value: Spectrum,

    /// PDF of sampling `omega_in` with the closure's own sampler.
    pub pdf: Float,
}

impl BsdfEval {
    /// Zero value and PDF.
    pub const ZERO: Self = Self {
        value: Spectrum::ZERO,
        pdf: 0.0,
    };

    /// Create a new `BsdfEval`.
    ///
    /// * `value` - Closure value.
    /// * `pdf`   - PDF.
    pub fn new(value: Spectrum, pdf: Float) -> Self {
        Self { value, pdf }
    }

    /// Create a new `BsdfEval` with the same value in all channels.
    ///
    /// * `value` - Closure value.
    /// * `pdf`   - PDF.
    pub fn gray(value: Float, pdf: Float) -> Self {
        Self::new(Spectrum::new(value), pdf)
    }
}

/// Result of importance sampling a closure.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct BsdfSample {
    /// Sampled incident direction.
    pub omega_in: Vector3f,

    /// Differential of `omega_in` along screen x.
    pub domega_in_dx: Vector3f,

    /// Differential of `omega_in` along screen y.
    pub domega_in_dy: Vector3f,

    /// Closure value for the sampled direction.
    pub eval: Spectrum,

    /// PDF of the sampled direction. Zero means the sample is invalid.
    pub pdf: Float,

    /// Kind of scattering event.
    pub label: ClosureLabel,
}

impl BsdfSample {
    /// Returns an invalid sample carrying only a label.
    ///
    /// * `label` - Kind of scattering event.
    pub fn invalid(label: ClosureLabel) -> Self {
        Self {
            label,
            ..Default::default()
        }
    }

    /// Returns true if the sample has a non-zero PDF.
    pub fn is_valid(&self) -> bool {
        self.pdf > 0.0
    }

    /// Returns the Monte-Carlo weight `eval / pdf`.
    pub fn weight(&self) -> Spectrum {
        if self.pdf > 0.0 {
            self.eval / Spectrum::new(self.pdf)
        } else {
            Spectrum::ZERO
        }
    }
}

/// Geometric context for sampling a closure.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct ShadingPoint {
    /// Geometric normal.
    pub ng: Vector3f,

    /// Direction towards the viewer (`I`).
    pub omega_out: Vector3f,

    /// Differential of `omega_out` along screen x.
    pub domega_out_dx: Vector3f,

    /// Differential of `omega_out` along screen y.
    pub domega_out_dy: Vector3f,
}

impl ShadingPoint {
    /// Create a new `ShadingPoint` without ray differentials.
    ///
    /// * `ng`        - Geometric normal.
    /// * `omega_out` - Direction towards the viewer.
    pub fn new(ng: Vector3f, omega_out: Vector3f) -> Self {
        Self {
            ng,
            omega_out,
            domega_out_dx: Vector3f::zero(),
            domega_out_dy: Vector3f::zero(),
        }
    }

    /// Returns a copy with the given ray differentials.
    ///
    /// * `dx` - Differential along screen x.
    /// * `dy` - Differential along screen y.
    pub fn with_differentials(self, dx: Vector3f, dy: Vector3f) -> Self {
        Self {
            domega_out_dx: dx,
            domega_out_dy: dy,
            ..self
        }
    }

    /// Returns the differentials of `omega_out` reflected about `n` and
    /// scaled by `scale`.
    ///
    /// * `n`     - The (micro)normal.
    /// * `scale` - Widening factor.
    pub fn reflect_differentials(&self, n: &Vector3f, scale: Float) -> (Vector3f, Vector3f) {
        (
            scale * reflect(&self.domega_out_dx, n),
            scale * reflect(&self.domega_out_dy, n),
        )
    }
}

/// Result of `fresnel_dielectric()`.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct FresnelRefraction {
    /// Fresnel reflectance; 1 on total internal reflection.
    pub fresnel: Float,

    /// Reflected direction.
    pub r: Vector3f,

    /// Differentials of the reflected direction.
    pub dr_dx: Vector3f,
    pub dr_dy: Vector3f,

    /// Refracted direction; zero on total internal reflection.
    pub t: Vector3f,

    /// Differentials of the refracted direction.
    pub dt_dx: Vector3f,
    pub dt_dy: Vector3f,

    /// True when `I` arrives from the inside of the surface.
    pub is_inside: bool,
}

/// Computes reflected and refracted directions of `I` about `n` along with
/// their ray differentials and the unpolarized dielectric Fresnel term.
///
/// * `eta` - Relative index of refraction (inside over outside).
/// * `n`   - The (micro)normal.
/// * `sp`  - Shading point providing `I` and its differentials.
pub fn fresnel_dielectric(eta: Float, n: &Vector3f, sp: &ShadingPoint) -> FresnelRefraction {
    let i = &sp.omega_out;
    let d_idx = &sp.domega_out_dx;
    let d_idy = &sp.domega_out_dy;

    let mut cos = n.dot(i);
    let (neta, nn, is_inside) = if cos > 0.0 {
        (1.0 / eta, *n, false)
    } else {
        cos = -cos;
        (eta, -*n, true)
    };

    let r = (2.0 * cos) * nn - *i;
    let dr_dx = reflect(d_idx, n);
    let dr_dy = reflect(d_idy, n);

    let arg = 1.0 - (neta * neta * (1.0 - (cos * cos)));
    if arg < 0.0 {
        // Total internal reflection.
        return FresnelRefraction {
            fresnel: 1.0,
            r,
            dr_dx,
            dr_dy,
            is_inside,
            ..Default::default()
        };
    }

    let dnp = arg.sqrt();
    let nk = (neta * cos) - dnp;
    let t = -(neta * *i) + (nk * nn);

    let dt = |d: &Vector3f| -(neta * *d) + ((neta - neta * neta * cos / dnp) * d.dot(&nn)) * nn;
    let dt_dx = dt(d_idx);
    let dt_dy = dt(d_idy);

    let cos_theta1 = cos;
    let cos_theta2 = -nn.dot(&t);
    let p_para = (cos_theta1 - eta * cos_theta2) / (cos_theta1 + eta * cos_theta2);
    let p_perp = (eta * cos_theta1 - cos_theta2) / (eta * cos_theta1 + cos_theta2);

    FresnelRefraction {
        fresnel: 0.5 * (p_para * p_para + p_perp * p_perp),
        r,
        dr_dx,
        dr_dy,
        t,
        dt_dx,
        dt_dy,
        is_inside,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::approx_eq;

    #[test]
    fn refraction_at_normal_incidence() {
        let n = Vector3f::new(0.0, 0.0, 1.0);
        let sp = ShadingPoint::new(n, n);
        let f = fresnel_dielectric(1.5, &n, &sp);
        assert!(!f.is_inside);
        assert!(approx_eq!(f32, f.t.z, -1.0, epsilon = 1e-6));
        // ((1 - 1.5) / (1 + 1.5))^2
        assert!(approx_eq!(f32, f.fresnel, 0.04, epsilon = 1e-5));
    }

    #[test]
    fn total_internal_reflection_from_inside() {
        let n = Vector3f::new(0.0, 0.0, 1.0);
        let i = Vector3f::new(0.9, 0.0, -0.2).normalize();
        let f = fresnel_dielectric(1.5, &n, &ShadingPoint::new(n, i));
        assert!(f.is_inside);
        assert_eq!(f.fresnel, 1.0);
        assert_eq!(f.t, Vector3f::zero());
    }

    #[test]
    fn snell_law_holds() {
        let n = Vector3f::new(0.0, 0.0, 1.0);
        let i = Vector3f::new(0.5, 0.0, 0.8).normalize();
        let f = fresnel_dielectric(1.33, &n, &ShadingPoint::new(n, i));
        let sin_i = (1.0 - i.z * i.z).sqrt();
        let sin_t = (1.0 - f.t.z * f.t.z).sqrt();
        assert!(approx_eq!(f32, sin_i, 1.33 * sin_t, epsilon = 1e-5));
        assert!(approx_eq!(f32, f.t.length(), 1.0, epsilon = 1e-5));
    }

    #[test]
    fn labels() {
        let l = ClosureLabel::REFLECT | ClosureLabel::GLOSSY;
        assert!(l.matches(ClosureLabel::GLOSSY));
        assert!(!l.matches(ClosureLabel::TRANSMIT));
        assert_eq!(ClosureLabel::default(), ClosureLabel::empty());
    }
}
