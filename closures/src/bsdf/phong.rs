//! Phong and Phong Ramp

use super::*;

/// Number of colours in a Phong ramp.
pub const PHONG_RAMP_COLORS: usize = 8;

/// Modified Phong lobe around the mirror direction.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Phong {
    /// Shading normal.
    pub(crate) n: Vector3f,

    /// Lobe exponent.
    pub(crate) exponent: Float,
}

/// Phong lobe tinted by a colour ramp indexed with the lobe value.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PhongRamp {
    /// Shading normal.
    pub(crate) n: Vector3f,

    /// Lobe exponent.
    pub(crate) exponent: Float,

    /// Ramp colours from the lobe edge to its peak.
    pub(crate) colors: [Spectrum; PHONG_RAMP_COLORS],
}

/// Lobe value `cos^n` of the angle to the mirror direction, the cosine
/// weighted closure value and the PDF.
struct PhongLobe {
    cosp: Float,
    value: Float,
    pdf: Float,
}

impl PhongLobe {
    fn new(exponent: Float, cos_ri: Float, cos_ni: Float) -> Self {
        let cosp = cos_ri.powf(exponent);
        let common = 0.5 * INV_PI * cosp;
        Self {
            cosp,
            value: cos_ni * (exponent + 2.0) * common,
            pdf: (exponent + 1.0) * common,
        }
    }

    fn eval(
        n: &Vector3f,
        exponent: Float,
        omega_out: &Vector3f,
        omega_in: &Vector3f,
    ) -> Option<Self> {
        let cos_no = n.dot(omega_out);
        let cos_ni = n.dot(omega_in);
        if cos_no <= 0.0 || cos_ni <= 0.0 {
            return None;
        }

        let r = (2.0 * cos_no) * n - *omega_out;
        let cos_ri = r.dot(omega_in);
        if cos_ri <= 0.0 {
            return None;
        }

        Some(Self::new(exponent, cos_ri, cos_ni))
    }

    fn sample(
        n: &Vector3f,
        exponent: Float,
        sp: &ShadingPoint,
        u: &Point2f,
    ) -> Option<(Vector3f, Self)> {
        let cos_no = n.dot(&sp.omega_out);
        if cos_no <= 0.0 {
            return None;
        }

        let r = (2.0 * cos_no) * n - sp.omega_out;
        let (omega_in, cos_theta) = sample_power_cosine_lobe(&r, exponent, u);
        if sp.ng.dot(&omega_in) <= 0.0 {
            return None;
        }

        let cos_ni = n.dot(&omega_in);
        if cos_ni <= 0.0 || cos_theta <= 0.0 {
            return None;
        }

        Some((omega_in, Self::new(exponent, cos_theta, cos_ni)))
    }
}

impl Phong {
    /// Create a new `Phong` closure.
    ///
    /// * `n`        - Shading normal.
    /// * `exponent` - Lobe exponent; clamped to non-negative values.
    pub fn new(n: Vector3f, exponent: Float) -> Self {
        Self {
            n: n.safe_normalize(),
            exponent: max(exponent, 0.0),
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
        PhongLobe::eval(&self.n, self.exponent, omega_out, omega_in)
            .map_or(BsdfEval::ZERO, |l| BsdfEval::gray(l.value, l.pdf))
    }

    /// Samples the lobe around the mirror direction.
    ///
    /// * `sp` - Shading point.
    /// * `u`  - Uniform random sample.
    pub fn sample(&self, sp: &ShadingPoint, u: &Point2f) -> BsdfSample {
        let label = self.label();
        match PhongLobe::sample(&self.n, self.exponent, sp, u) {
            Some((omega_in, l)) => {
                let (dx, dy) = sp.reflect_differentials(&self.n, 1.0);
                BsdfSample {
                    omega_in,
                    domega_in_dx: dx,
                    domega_in_dy: dy,
                    eval: Spectrum::new(l.value),
                    pdf: l.pdf,
                    label,
                }
            }
            None => BsdfSample::invalid(label),
        }
    }
}

impl PhongRamp {
    /// Create a new `PhongRamp` closure.
    ///
    /// * `n`        - Shading normal.
    /// * `exponent` - Lobe exponent; clamped to non-negative values.
    /// * `colors`   - Ramp colours.
    pub fn new(n: Vector3f, exponent: Float, colors: [Spectrum; PHONG_RAMP_COLORS]) -> Self {
        Self {
            n: n.safe_normalize(),
            exponent: max(exponent, 0.0),
            colors,
        }
    }

    /// Returns the closure label.
    pub fn label(&self) -> ClosureLabel {
        ClosureLabel::REFLECT | ClosureLabel::GLOSSY
    }

    /// Returns the mean ramp colour.
    pub fn mean_color(&self) -> Spectrum {
        self.colors.iter().fold(Spectrum::ZERO, |acc, c| acc + *c) / PHONG_RAMP_COLORS as Float
    }

    /// Returns the ramp colour at a position in [0, 1].
    ///
    /// * `pos` - Ramp position.
    pub fn color(&self, pos: Float) -> Spectrum {
        let last = PHONG_RAMP_COLORS - 1;
        let npos = pos * last as Float;
        if !(npos >= 0.0) {
            return self.colors[0];
        }

        let ipos = npos as usize;
        if ipos >= last {
            return self.colors[last];
        }

        let offset = npos - ipos as Float;
        lerp(offset, self.colors[ipos], self.colors[ipos + 1])
    }

    /// Evaluates reflection for a pair of directions.
    ///
    /// * `omega_out` - Direction towards the viewer.
    /// * `omega_in`  - Direction towards the light.
    pub fn eval_reflect(&self, omega_out: &Vector3f, omega_in: &Vector3f) -> BsdfEval {
        PhongLobe::eval(&self.n, self.exponent, omega_out, omega_in)
            .map_or(BsdfEval::ZERO, |l| {
                BsdfEval::new(self.color(l.cosp) * l.value, l.pdf)
            })
    }

    /// Samples the lobe around the mirror direction.
    ///
    /// * `sp` - Shading point.
    /// * `u`  - Uniform random sample.
    pub fn sample(&self, sp: &ShadingPoint, u: &Point2f) -> BsdfSample {
        let label = self.label();
        match PhongLobe::sample(&self.n, self.exponent, sp, u) {
            Some((omega_in, l)) => {
                let (dx, dy) = sp.reflect_differentials(&self.n, 1.0);
                BsdfSample {
                    omega_in,
                    domega_in_dx: dx,
                    domega_in_dy: dy,
                    eval: self.color(l.cosp) * l.value,
                    pdf: l.pdf,
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
    use float_cmp::approx_eq;

    const Z: Vector3f = Vector3f {
        x: 0.0,
        y: 0.0,
        z: 1.0,
    };

    fn ramp() -> PhongRamp {
        let mut colors = [Spectrum::ZERO; PHONG_RAMP_COLORS];
        for (i, c) in colors.iter_mut().enumerate() {
            *c = Spectrum::new(i as Float / 7.0);
        }
        PhongRamp::new(Z, 20.0, colors)
    }

    #[test]
    fn peak_at_mirror_direction() {
        let p = Phong::new(Z, 50.0);
        let wo = Vector3f::new(0.0, 0.6, 0.8);
        let mirror = Vector3f::new(0.0, -0.6, 0.8);
        let off = Vector3f::new(0.1, -0.6, 0.8).normalize();
        let peak = p.eval_reflect(&wo, &mirror);
        assert!(peak.value[0] > p.eval_reflect(&wo, &off).value[0]);
        assert!(approx_eq!(f32, peak.pdf, 51.0 * 0.5 * INV_PI, epsilon = 1e-3));
    }

    #[test]
    fn ramp_interpolates_and_clamps() {
        let r = ramp();
        assert_eq!(r.color(-1.0), Spectrum::ZERO);
        assert_eq!(r.color(2.0), Spectrum::ONE);
        assert!(approx_eq!(f32, r.color(0.5)[0], 0.5, epsilon = 1e-6));
        assert!(approx_eq!(f32, r.mean_color()[1], 0.5, epsilon = 1e-6));
    }

    #[test]
    fn ramp_tints_phong() {
        let r = ramp();
        let p = Phong::new(Z, 20.0);
        let wo = Vector3f::new(0.0, 0.6, 0.8);
        let wi = Vector3f::new(0.05, -0.6, 0.8).normalize();
        let er = r.eval_reflect(&wo, &wi);
        let ep = p.eval_reflect(&wo, &wi);
        assert_eq!(er.pdf, ep.pdf);
        assert!(er.value[0] <= ep.value[0]);
    }

    #[test]
    fn sample_matches_eval() {
        let p = Phong::new(Z, 10.0);
        let wo = Vector3f::new(0.0, 0.3, 0.9).normalize();
        let sp = ShadingPoint::new(Z, wo);
        let s = p.sample(&sp, &Point2f::new(0.3, 0.6));
        assert!(s.is_valid());
        let e = p.eval_reflect(&wo, &s.omega_in);
        assert!(approx_eq!(f32, e.pdf, s.pdf, epsilon = 1e-3));
    }
}
