//! Diffusion profiles.

use crate::math::*;

/// Returns the normalized cubic kernel (area density) at distance `r`.
///
/// With zero sharpness this is `10 (R - r)^3 / (π R^5)` on `[0, R]`. A
/// positive sharpness stretches the support to `R (1 + s)` and concentrates
/// energy near the origin. The kernel integrates to 1 over the disk.
///
/// * `radius`    - Radius `R`.
/// * `sharpness` - Sharpness in [0, 1].
/// * `r`         - Distance from the entry point.
pub fn bssrdf_cubic(radius: Float, sharpness: Float, r: Float) -> Float {
    let rm = radius * (1.0 + sharpness);
    if r >= rm || rm <= 0.0 {
        return 0.0;
    }

    if sharpness == 0.0 {
        let rm5 = (rm * rm) * (rm * rm) * rm;
        let f = rm - r;
        let num = f * f * f;
        (10.0 * num) / (rm5 * PI)
    } else {
        let y = 1.0 / (1.0 + sharpness);
        let rmy = rm.powf(y);
        let ry = r.powf(y);
        let ryinv = if r > 0.0 { r.powf(2.0 * y - 2.0) } else { 0.0 };

        let rmy5 = (rmy * rmy) * (rmy * rmy) * rmy;
        let f = rmy - ry;
        let num = f * (f * f) * (y * ryinv);

        (10.0 * num) / (rmy5 * PI)
    }
}

/// Radial CDF of the cubic kernel in normalized distance `x = (r / R)^y`.
///
/// * `x` - Normalized distance in [0, 1].
#[inline]
pub fn bssrdf_cubic_cdf(x: Float) -> Float {
    let x2 = x * x;
    let x3 = x2 * x;
    10.0 * x2 - 20.0 * x3 + 15.0 * x2 * x2 - 4.0 * x2 * x3
}

/// Inverts `bssrdf_cubic_cdf` by Newton-Raphson iteration.
///
/// * `xi` - Uniform random value.
fn cubic_quintic_root_find(xi: Float) -> Float {
    const TOLERANCE: Float = 1e-6;
    const MAX_ITERATIONS: usize = 10;

    let mut x = 0.25;
    for _ in 0..MAX_ITERATIONS {
        let nx = 1.0 - x;
        let f = bssrdf_cubic_cdf(x) - xi;
        let f_ = 20.0 * (x * nx) * (nx * nx);

        if abs(f) < TOLERANCE || f_ == 0.0 {
            break;
        }
        x = saturate(x - f / f_);
    }
    x
}

/// Samples a distance from the cubic kernel. Returns the distance `r` and
/// the half-length `h` of the probe segment so that `h^2 + r^2 = Rm^2`.
///
/// * `radius`    - Radius `R`.
/// * `sharpness` - Sharpness in [0, 1].
/// * `xi`        - Uniform random value.
pub fn bssrdf_cubic_sample(radius: Float, sharpness: Float, xi: Float) -> (Float, Float) {
    let mut rm = radius;
    let mut r = cubic_quintic_root_find(xi);

    if sharpness != 0.0 {
        r = r.powf(1.0 + sharpness);
        rm *= 1.0 + sharpness;
    }

    r *= rm;
    (r, safe_sqrt(rm * rm - r * r))
}

/// Parameters of the classical dipole diffusion profile.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct DipoleParams {
    /// Reduced scattering albedo.
    pub alpha_prime: Float,

    /// Effective transport coefficient.
    pub sigma_tr: Float,

    /// Depth of the real source.
    pub zr: Float,

    /// Height of the virtual source.
    pub zv: Float,
}

impl DipoleParams {
    /// Derives dipole parameters that produce a given total diffuse
    /// reflectance.
    ///
    /// * `reflectance` - Target diffuse reflectance in [0, 1].
    /// * `radius`      - Mean free path; the transport coefficient is `1 / radius`.
    /// * `ior`         - Index of refraction of the medium.
    pub fn new(reflectance: Float, radius: Float, ior: Float) -> Self {
        let a = dipole_a(ior);
        let alpha_prime = if reflectance > 0.0 {
            clamp(
                dipole_reduced_albedo(a, saturate(reflectance)),
                0.0,
                1.0 - 1e-4,
            )
        } else {
            0.0
        };

        let sigma_tr = 1.0 / max(radius, FLOAT_MIN);
        let sigma_t_prime = sigma_tr / (3.0 * (1.0 - alpha_prime)).sqrt();
        let zr = 1.0 / sigma_t_prime;
        let zv = zr * (1.0 + (4.0 / 3.0) * a);

        Self {
            alpha_prime,
            sigma_tr,
            zr,
            zv,
        }
    }

    /// Evaluates the diffuse reflectance profile (area density) at `r`.
    ///
    /// * `r` - Distance from the entry point.
    pub fn profile(&self, r: Float) -> Float {
        let source = |z: Float| {
            let d = (r * r + z * z).sqrt();
            z * (1.0 + self.sigma_tr * d) * (-self.sigma_tr * d).exp() / (d * d * d)
        };

        self.alpha_prime * INV_FOUR_PI * (source(self.zr) + source(self.zv))
    }
}

/// Diffuse Fresnel reflectance approximation.
///
/// * `eta` - Relative index of refraction.
pub fn fresnel_diffuse_reflectance(eta: Float) -> Float {
    -1.440 / (eta * eta) + 0.710 / eta + 0.668 + 0.0636 * eta
}

/// Boundary condition term `A = (1 + Fdr) / (1 - Fdr)`.
fn dipole_a(eta: Float) -> Float {
    let fdr = fresnel_diffuse_reflectance(eta);
    (1.0 + fdr) / (1.0 - fdr)
}

/// Total diffuse reflectance of the dipole for a reduced albedo.
///
/// * `a`           - Boundary condition term.
/// * `alpha_prime` - Reduced albedo.
pub fn dipole_total_reflectance(a: Float, alpha_prime: Float) -> Float {
    let s = (3.0 * (1.0 - alpha_prime)).sqrt();
    0.5 * alpha_prime * (1.0 + (-(4.0 / 3.0) * a * s).exp()) * (-s).exp()
}

/// Finds the reduced albedo whose total reflectance matches `reflectance`.
///
/// Total reflectance is smooth and decreasing in `s = sqrt(3 (1 - α'))` on
/// `[0, √3]`, so the root is bracketed there and refined with the Illinois
/// variant of the secant method.
fn dipole_reduced_albedo(a: Float, reflectance: Float) -> Float {
    const MAX_ITERATIONS: usize = 30;
    const TOLERANCE: Float = 1e-8;

    let f = |s: Float| {
        0.5 * (1.0 - s * s / 3.0) * (1.0 + (-(4.0 / 3.0) * a * s).exp()) * (-s).exp()
            - reflectance
    };

    let (mut s0, mut s1) = (0.0, Float::sqrt(3.0));
    let (mut f0, mut f1) = (f(s0), f(s1));

    for _ in 0..MAX_ITERATIONS {
        if abs(f1) < TOLERANCE || f1 == f0 {
            break;
        }

        let s2 = clamp(s1 - f1 * (s1 - s0) / (f1 - f0), 0.0, Float::sqrt(3.0));
        let f2 = f(s2);

        if f2 * f1 < 0.0 {
            s0 = s1;
            f0 = f1;
        } else {
            f0 *= 0.5;
        }
        s1 = s2;
        f1 = f2;
    }

    1.0 - s1 * s1 / 3.0
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::approx_eq;
    use proptest::prelude::*;

    /// Trapezoid integral of `kernel(r) 2πr` over [0, rmax].
    fn integrate(kernel: impl Fn(Float) -> Float, rmax: Float) -> Float {
        let n = 20000;
        let dr = rmax / n as Float;
        let f = |i: usize| {
            let r = i as Float * dr;
            kernel(r) * TWO_PI * r
        };
        (0..n).map(|i| 0.5 * (f(i) + f(i + 1)) * dr).sum()
    }

    #[test]
    fn cubic_integrates_to_one() {
        let total = integrate(|r| bssrdf_cubic(2.0, 0.0, r), 2.0);
        assert!(approx_eq!(f32, total, 1.0, epsilon = 1e-3));
    }

    #[test]
    fn cubic_sharp_integrates_to_one() {
        let total = integrate(|r| bssrdf_cubic(1.0, 0.5, r), 1.5);
        assert!(approx_eq!(f32, total, 1.0, epsilon = 2e-2));
    }

    #[test]
    fn cubic_outside_support_is_zero() {
        assert_eq!(bssrdf_cubic(1.0, 0.0, 1.0), 0.0);
        assert_eq!(bssrdf_cubic(1.0, 0.0, 3.0), 0.0);
        assert_eq!(bssrdf_cubic(0.0, 0.0, 0.0), 0.0);
    }

    #[test]
    fn cubic_cdf_endpoints() {
        assert_eq!(bssrdf_cubic_cdf(0.0), 0.0);
        assert!(approx_eq!(f32, bssrdf_cubic_cdf(1.0), 1.0, ulps = 2));
    }

    #[test]
    fn dipole_matches_reflectance() {
        let a = dipole_a(1.3);
        for &rho in &[0.1, 0.5, 0.8] {
            let p = DipoleParams::new(rho, 1.0, 1.3);
            let rd = dipole_total_reflectance(a, p.alpha_prime);
            assert!((rd - rho).abs() < 1e-4, "rho {} rd {}", rho, rd);
        }
    }

    #[test]
    fn dipole_zero_reflectance_is_black() {
        let p = DipoleParams::new(0.0, 1.0, 1.3);
        assert_eq!(p.alpha_prime, 0.0);
        assert_eq!(p.profile(0.5), 0.0);
    }

    #[test]
    fn dipole_profile_decreases() {
        let p = DipoleParams::new(0.6, 1.0, 1.3);
        let mut prev = p.profile(0.01);
        for i in 2..50 {
            let v = p.profile(i as Float * 0.1);
            assert!(v <= prev);
            prev = v;
        }
    }

    proptest! {
        #[test]
        fn cubic_sample_in_support(r in 0.01..4.0f32, s in 0.0..1.0f32, xi in 0.0..1.0f32) {
            let (d, h) = bssrdf_cubic_sample(r, s, xi);
            let rm = r * (1.0 + s);
            prop_assert!(d >= 0.0 && d <= rm * (1.0 + 1e-5));
            prop_assert!((d * d + h * h - rm * rm).abs() <= 1e-3 * rm * rm);
        }

        #[test]
        fn cubic_root_find_inverts_cdf(xi in 0.02..0.98f32) {
            let x = cubic_quintic_root_find(xi);
            prop_assert!((bssrdf_cubic_cdf(x) - xi).abs() < 1e-4);
        }
    }
}
