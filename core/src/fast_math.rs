//! Fast approximate math
//!
//! Polynomial and bit-manipulation approximations of transcendental functions
//! used where shading evaluation is hot and a bounded error is acceptable.
//! None of these signal errors: out-of-domain inputs are clamped.

#![allow(clippy::excessive_precision)]

use crate::math::*;

/// Rounds to the nearest integer, halfway cases away from zero.
///
/// * `x` - The value.
#[inline(always)]
fn fast_rint(x: Float) -> Int {
    (x + copysign(0.5, x)) as Int
}

/// Reduces `x` by `q * π / k` using a four part split of π.
///
/// * `x` - The angle in radians.
/// * `q` - Number of periods to remove.
/// * `k` - Period scale (4 for π, 2 for π/2).
#[inline(always)]
fn reduce_pi(x: Float, q: Float, k: Float) -> Float {
    let x = madd(q, -0.78515625 * k, x);
    let x = madd(q, -0.00024187564849853515625 * k, x);
    let x = madd(q, -3.7747668102383613586e-08 * k, x);
    madd(q, -1.2816720341285448015e-12 * k, x)
}

/// Returns an approximation of `sin(x)`.
///
/// Max absolute error is about 1.4e-7 (about 1 ulp) on [-2π, 2π]. Argument
/// reduction starts to break down around |x| = 262000 where the result is
/// clamped to 0.
///
/// * `x` - The angle in radians.
pub fn fast_sinf(x: Float) -> Float {
    let q = fast_rint(x * INV_PI);
    let mut x = reduce_pi(x, q as Float, 4.0);
    x = PI_OVER_TWO - (PI_OVER_TWO - x); // Crush denormals.
    let s = x * x;
    if q & 1 != 0 {
        x = -x;
    }

    let mut u = 2.6083159809786593541503e-06;
    u = madd(u, s, -0.0001981069071916863322258);
    u = madd(u, s, 0.00833307858556509017944336);
    u = madd(u, s, -0.166666597127914428710938);
    u = madd(s, u * x, x);

    if u.abs() > 1.0 {
        0.0
    } else {
        u
    }
}

/// Returns an approximation of `cos(x)`.
///
/// Max absolute error is 4.4e-7 on [-2π, 2π].
///
/// * `x` - The angle in radians.
pub fn fast_cosf(x: Float) -> Float {
    let q = fast_rint(x * INV_PI);
    let mut x = reduce_pi(x, q as Float, 4.0);
    x = PI_OVER_TWO - (PI_OVER_TWO - x); // Crush denormals.
    let s = x * x;

    let mut u = -2.71811842367242206819355e-07;
    u = madd(u, s, 2.47990446951007470488548e-05);
    u = madd(u, s, -0.00138888787478208541870117);
    u = madd(u, s, 0.0416666641831398010253906);
    u = madd(u, s, -0.5);
    u = madd(u, s, 1.0);
    if q & 1 != 0 {
        u = -u;
    }

    if u.abs() > 1.0 {
        0.0
    } else {
        u
    }
}

/// Returns approximations of `(sin(x), cos(x))` sharing one argument
/// reduction. Same error bounds as `fast_sinf()` and `fast_cosf()`.
///
/// * `x` - The angle in radians.
pub fn fast_sincosf(x: Float) -> (Float, Float) {
    let q = fast_rint(x * INV_PI);
    let mut x = reduce_pi(x, q as Float, 4.0);
    x = PI_OVER_TWO - (PI_OVER_TWO - x); // Crush denormals.
    let s = x * x;
    if q & 1 != 0 {
        x = -x;
    }

    let mut su = 2.6083159809786593541503e-06;
    su = madd(su, s, -0.0001981069071916863322258);
    su = madd(su, s, 0.00833307858556509017944336);
    su = madd(su, s, -0.166666597127914428710938);
    su = madd(s, su * x, x);

    let mut cu = -2.71811842367242206819355e-07;
    cu = madd(cu, s, 2.47990446951007470488548e-05);
    cu = madd(cu, s, -0.00138888787478208541870117);
    cu = madd(cu, s, 0.0416666641831398010253906);
    cu = madd(cu, s, -0.5);
    cu = madd(cu, s, 1.0);
    if q & 1 != 0 {
        cu = -cu;
    }

    let su = if su.abs() > 1.0 { 0.0 } else { su };
    let cu = if cu.abs() > 1.0 { 0.0 } else { cu };
    (su, cu)
}

/// Returns an approximation of `tan(x)`.
///
/// Max relative error is about 2e-6 on (-π/2, π/2) away from the poles.
///
/// * `x` - The angle in radians.
pub fn fast_tanf(x: Float) -> Float {
    let q = fast_rint(x * 2.0 * INV_PI);
    let mut x = reduce_pi(x, q as Float, 2.0);
    if q & 1 == 0 {
        // Crush denormals only if the result is not inverted later.
        x = PI_OVER_FOUR - (PI_OVER_FOUR - x);
    }
    let s = x * x;

    let mut u = 0.00927245803177356719970703;
    u = madd(u, s, 0.00331984995864331722259521);
    u = madd(u, s, 0.0242998078465461730957031);
    u = madd(u, s, 0.0534495301544666290283203);
    u = madd(u, s, 0.133383005857467651367188);
    u = madd(u, s, 0.333331853151321411132812);
    u = madd(s, u * x, x);
    if q & 1 != 0 {
        u = -1.0 / u;
    }
    u
}

/// Returns an approximation of `acos(x)`. Input is clamped to [-1, 1].
///
/// Max absolute error is 4.6e-5.
///
/// * `x` - The cosine value.
pub fn fast_acosf(x: Float) -> Float {
    let f = x.abs();
    let m = if f < 1.0 { 1.0 - (1.0 - f) } else { 1.0 };
    let a = (1.0 - m).sqrt() * (1.5707963267 + m * (-0.213300989 + m * (0.077980478 + m * -0.02164095)));
    if x < 0.0 {
        PI - a
    } else {
        a
    }
}

/// Returns an approximation of `asin(x)`. Input is clamped to [-1, 1].
///
/// Max absolute error is 4.6e-5.
///
/// * `x` - The sine value.
pub fn fast_asinf(x: Float) -> Float {
    let f = x.abs();
    let m = if f < 1.0 { 1.0 - (1.0 - f) } else { 1.0 };
    let a = PI_OVER_TWO
        - (1.0 - m).sqrt() * (1.5707963267 + m * (-0.213300989 + m * (0.077980478 + m * -0.02164095)));
    copysign(a, x)
}

/// Returns an approximation of `atan(x)`.
///
/// Max absolute error is 6.6e-6 over the whole real line.
///
/// * `x` - The value.
pub fn fast_atanf(x: Float) -> Float {
    let a = x.abs();
    let k = if a > 1.0 { 1.0 / a } else { a };
    let s = 1.0 - (1.0 - k); // Crush denormals.
    let t = s * s;
    let mut r = s * madd(0.43157974, t, 1.0) / madd(madd(0.05831938, t, 0.76443945), t, 1.0);
    if a > 1.0 {
        r = PI_OVER_TWO - r;
    }
    copysign(r, x)
}

/// Returns an approximation of `atan2(y, x)`.
///
/// Max absolute error is 6.6e-6. The one case not handled like libm is
/// `x = NaN, y = 0` which returns 0.
///
/// * `y` - Proportion of y-coordinate.
/// * `x` - Proportion of x-coordinate.
pub fn fast_atan2f(y: Float, x: Float) -> Float {
    let a = x.abs();
    let b = y.abs();
    let k = if b == 0.0 {
        0.0
    } else if a == b {
        1.0
    } else if b > a {
        a / b
    } else {
        b / a
    };
    let s = 1.0 - (1.0 - k); // Crush denormals.
    let t = s * s;
    let mut r = s * madd(0.43157974, t, 1.0) / madd(madd(0.05831938, t, 0.76443945), t, 1.0);
    if b > a {
        r = PI_OVER_TWO - r;
    }
    if copysign(1.0, x) < 0.0 {
        r = PI - r;
    }
    copysign(r, y)
}

/// Returns an approximation of `log2(x)`. Input is clamped to
/// [FLOAT_MIN, FLOAT_MAX], so zero, negative values and NaN never produce
/// non-finite results.
///
/// Max absolute error is 7.6e-6 over the clamped domain.
///
/// * `x` - The value.
pub fn fast_log2f(x: Float) -> Float {
    let x = if x >= FLOAT_MIN { min(x, FLOAT_MAX) } else { FLOAT_MIN };
    let bits = float_to_bits(x);
    let exponent = (bits >> 23) as Int - 127;
    let f = bits_to_float((bits & 0x007fffff) | 0x3f800000) - 1.0;

    let f2 = f * f;
    let f4 = f2 * f2;
    let mut hi = madd(f, -0.00931049621349, 0.05206469089414);
    let mut lo = madd(f, 0.47868480909345, -0.72116591947498);
    hi = madd(f, hi, -0.13753123777116);
    hi = madd(f, hi, 0.24187369696082);
    hi = madd(f, hi, -0.34730547155299);
    lo = madd(f, lo, 1.442689881667200);
    ((f4 * hi) + (f * lo)) + exponent as Float
}

/// Returns an approximation of `ln(x)`. Same domain as `fast_log2f()`.
///
/// * `x` - The value.
#[inline]
pub fn fast_logf(x: Float) -> Float {
    fast_log2f(x) * LN_2
}

/// Returns an approximation of `log10(x)`. Same domain as `fast_log2f()`.
///
/// Max absolute error is 5e-7 on [1e-3, 1e3] and 5e-6 over the clamped
/// domain, where rounding of the large result dominates.
///
/// * `x` - The value.
#[inline]
pub fn fast_log10(x: Float) -> Float {
    fast_log2f(x) * LN_2 / LN_10
}

/// Returns the unbiased exponent of `|x|`. Denormals are treated as
/// `FLOAT_MIN`.
///
/// * `x` - The value.
pub fn fast_logb(x: Float) -> Float {
    let x = clamp(x.abs(), FLOAT_MIN, FLOAT_MAX);
    let bits = float_to_bits(x);
    ((bits >> 23) as Int - 127) as Float
}

/// Returns an approximation of `2^x`. Input is clamped to [-126, 126].
///
/// Max relative error is about 2.8e-5 (232 ulp).
///
/// * `x` - The exponent.
pub fn fast_exp2f(x: Float) -> Float {
    let x = clamp(x, -126.0, 126.0);

    // Range reduction.
    let m = x as Int;
    let x = x - m as Float;
    let x = 1.0 - (1.0 - x); // Crush denormals.

    let mut r = 1.33336498402e-3;
    r = madd(x, r, 9.810352697968e-3);
    r = madd(x, r, 5.551834031939e-2);
    r = madd(x, r, 0.2401793301105);
    r = madd(x, r, 0.693144857883);
    r = madd(x, r, 1.0);

    // Multiply by 2^m by adding in the exponent.
    bits_to_float(float_to_bits(r).wrapping_add((m as u32) << 23))
}

/// Returns an approximation of `e^x`. Same bounds as `fast_exp2f()` after
/// scaling by 1/ln(2).
///
/// * `x` - The exponent.
#[inline]
pub fn fast_expf(x: Float) -> Float {
    fast_exp2f(x / LN_2)
}

/// Returns an approximation of `10^x`. Input is clamped like
/// `fast_exp2f()` after scaling by log2(10), so |x| beyond about 37.9 saturates.
///
/// Max relative error is about 2.8e-5, the same as `fast_exp2f()`.
///
/// * `x` - The exponent.
#[inline]
pub fn fast_exp10(x: Float) -> Float {
    fast_exp2f(x * LN_10 / LN_2)
}

/// Returns an approximation of `e^x - 1` that stays accurate near zero.
///
/// * `x` - The exponent.
pub fn fast_expm1f(x: Float) -> Float {
    if x.abs() < 1e-5 {
        let x = 1.0 - (1.0 - x); // Crush denormals.
        madd(0.5, x * x, x)
    } else {
        fast_expf(x) - 1.0
    }
}

/// Returns an approximation of `sinh(x)`.
///
/// Max absolute error is 1.2e-7 on [-1, 1]; relative error follows
/// `fast_expf()` elsewhere.
///
/// * `x` - The value.
pub fn fast_sinhf(x: Float) -> Float {
    let a = x.abs();
    if a > 1.0 {
        let e = fast_expf(a);
        copysign(0.5 * e - 0.5 / e, x)
    } else {
        let a = 1.0 - (1.0 - a); // Crush denormals.
        let a2 = a * a;
        let mut r = 2.03945513931e-4;
        r = madd(r, a2, 8.32990277558e-3);
        r = madd(r, a2, 0.1666673421859);
        r = madd(r * a, a2, a);
        copysign(r, x)
    }
}

/// Returns an approximation of `cosh(x)`.
///
/// * `x` - The value.
#[inline]
pub fn fast_coshf(x: Float) -> Float {
    let e = fast_expf(x.abs());
    0.5 * e + 0.5 / e
}

/// Returns an approximation of `tanh(x)`.
///
/// Max absolute error is 3.2e-6 over the whole real line.
///
/// * `x` - The value.
#[inline]
pub fn fast_tanhf(x: Float) -> Float {
    let e = fast_expf(2.0 * x.abs());
    copysign(1.0 - 2.0 / (1.0 + e), x)
}

/// Returns an approximation of `x^y` that never produces NaN.
///
/// A negative base is only raised to integer powers; for a non-integer
/// exponent the result is 0 instead of NaN.
///
/// * `x` - The base.
/// * `y` - The exponent.
pub fn fast_safe_powf(x: Float, y: Float) -> Float {
    if y == 0.0 {
        return 1.0;
    }
    if x == 0.0 {
        return 0.0;
    }

    let mut sign = 1.0;
    if x < 0.0 {
        let ybits = float_to_bits(y) & 0x7fffffff;
        if ybits >= 0x4b800000 {
            // Always an even integer, keep positive.
        } else if ybits >= 0x3f800000 {
            // Bigger than 1, check for fractional bits.
            let k = (ybits >> 23) as Int - 127;
            let j = ybits >> (23 - k);
            if (j << (23 - k)) == ybits {
                sign = if j & 1 == 0 { 1.0 } else { -1.0 };
            } else {
                return 0.0;
            }
        } else {
            return 0.0;
        }
    }

    sign * fast_exp2f(y * fast_log2f(x.abs()))
}

/// Returns an approximation of the error function.
///
/// Max absolute error is 1.9e-6 (Abramowitz and Stegun 7.1.28).
///
/// * `x` - The value.
pub fn fast_erff(x: Float) -> Float {
    const A1: Float = 0.0705230784;
    const A2: Float = 0.0422820123;
    const A3: Float = 0.0092705272;
    const A4: Float = 0.0001520143;
    const A5: Float = 0.0002765672;
    const A6: Float = 0.0000430638;

    let a = x.abs();
    if a >= 12.3 {
        return copysign(1.0, x);
    }

    let b = 1.0 - (1.0 - a); // Crush denormals.
    let r = madd(madd(madd(madd(madd(madd(A6, b, A5), b, A4), b, A3), b, A2), b, A1), b, 1.0);
    let s = r * r; // ^2
    let t = s * s; // ^4
    let u = t * t; // ^8
    let v = u * u; // ^16
    copysign(1.0 - 1.0 / v, x)
}

/// Returns an approximation of the complementary error function.
///
/// Max absolute error is 1.9e-6.
///
/// * `x` - The value.
#[inline]
pub fn fast_erfcf(x: Float) -> Float {
    1.0 - fast_erff(x)
}

/// Returns an approximation of the inverse error function (Giles). Input is
/// clamped to |x| <= 1 - ε.
///
/// * `x` - The value in (-1, 1).
pub fn fast_ierff(x: Float) -> Float {
    let a = min(x.abs(), ONE_MINUS_EPSILON);
    let mut w = -fast_logf((1.0 - a) * (1.0 + a));
    let p = if w < 5.0 {
        w -= 2.5;
        let mut p = 2.81022636e-08;
        p = madd(p, w, 3.43273939e-07);
        p = madd(p, w, -3.5233877e-06);
        p = madd(p, w, -4.39150654e-06);
        p = madd(p, w, 0.00021858087);
        p = madd(p, w, -0.00125372503);
        p = madd(p, w, -0.00417768164);
        p = madd(p, w, 0.246640727);
        madd(p, w, 1.50140941)
    } else {
        w = w.sqrt() - 3.0;
        let mut p = -0.000200214257;
        p = madd(p, w, 0.000100950558);
        p = madd(p, w, 0.00134934322);
        p = madd(p, w, -0.00367342844);
        p = madd(p, w, 0.00573950773);
        p = madd(p, w, -0.0076224613);
        p = madd(p, w, 0.00943887047);
        p = madd(p, w, 1.00167406);
        madd(p, w, 2.83297682)
    };
    p * x
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::approx_eq;
    use proptest::prelude::*;

    /// Absolute error against a double precision reference.
    fn err(approx: Float, expected: f64) -> f64 {
        (approx as f64 - expected).abs()
    }

    /// Reference error function from its Maclaurin series, evaluated in
    /// double precision.
    fn erf_reference(x: f64) -> f64 {
        let mut sum = 0.0;
        let mut term = x;
        for n in 0..80 {
            sum += term / (2 * n + 1) as f64;
            term *= -x * x / (n + 1) as f64;
        }
        sum * 2.0 / std::f64::consts::PI.sqrt()
    }

    fn sweep(lo: Float, hi: Float, n: usize) -> impl Iterator<Item = Float> {
        (0..=n).map(move |i| lo + (hi - lo) * i as Float / n as Float)
    }

    #[test]
    fn sin_cos_within_bounds() {
        for x in sweep(-TWO_PI, TWO_PI, 100_000) {
            assert!(err(fast_sinf(x), (x as f64).sin()) <= 1.4e-7, "sin({x})");
            assert!(err(fast_cosf(x), (x as f64).cos()) <= 4.4e-7, "cos({x})");
            let (s, c) = fast_sincosf(x);
            assert_eq!(s, fast_sinf(x));
            assert_eq!(c, fast_cosf(x));
        }
    }

    #[test]
    fn sin_clamps_huge_arguments() {
        let s = fast_sinf(1e30);
        assert!((-1.0..=1.0).contains(&s));
    }

    #[test]
    fn tan_within_bounds() {
        for x in sweep(-1.4, 1.4, 10_000) {
            let t = x.tan();
            assert!((fast_tanf(x) - t).abs() <= 1e-5 * max(1.0, t.abs()), "tan({x})");
        }
    }

    #[test]
    fn inverse_trig_within_bounds() {
        for x in sweep(-1.0, 1.0, 10_000) {
            assert!((fast_acosf(x) - x.acos()).abs() < 5e-5, "acos({x})");
            assert!((fast_asinf(x) - x.asin()).abs() < 5e-5, "asin({x})");
        }
        for x in sweep(-50.0, 50.0, 10_000) {
            assert!((fast_atanf(x) - x.atan()).abs() < 1e-5, "atan({x})");
        }
        assert_eq!(fast_acosf(2.0), 0.0);
        assert!((fast_acosf(-2.0) - PI).abs() < 1e-6);
    }

    #[test]
    fn atan2_quadrants() {
        for (y, x) in [(1.0, 1.0), (1.0, -1.0), (-1.0, -1.0), (-1.0, 1.0), (0.3, 2.0), (2.0, 0.0)] {
            let expected: Float = Float::atan2(y, x);
            assert!((fast_atan2f(y, x) - expected).abs() < 1e-5, "atan2({y}, {x})");
        }
        assert_eq!(fast_atan2f(0.0, 1.0), 0.0);
    }

    #[test]
    fn log_within_bounds() {
        for x in sweep(1e-3, 1e3, 100_000) {
            assert!((fast_log2f(x) - x.log2()).abs() < 1e-5, "log2({x})");
            assert!((fast_logf(x) - x.ln()).abs() < 1e-5, "ln({x})");
        }
        assert!(fast_log2f(0.0).is_finite());
        assert!(fast_log2f(-1.0).is_finite());
        assert_eq!(fast_logb(8.0), 3.0);
        assert_eq!(fast_logb(-0.25), -2.0);
    }

    #[test]
    fn log10_within_bounds() {
        for x in sweep(1e-3, 1e3, 100_000) {
            assert!(err(fast_log10(x), (x as f64).log10()) <= 5e-7, "log10({x})");
        }
        for e in -120..120 {
            for j in 0..64 {
                let x = (e as Float).exp2() * (1.0 + j as Float / 64.0);
                assert!(err(fast_log10(x), (x as f64).log10()) <= 5e-6, "log10({x})");
            }
        }
        assert!(approx_eq!(f32, fast_log10(100.0), 2.0, epsilon = 5e-7));
        assert!(fast_log10(0.0).is_finite());
    }

    #[test]
    fn exp10_within_bounds() {
        for x in sweep(-30.0, 30.0, 100_000) {
            let expected = 10f64.powf(x as f64);
            assert!(err(fast_exp10(x), expected) <= 2.8e-5 * expected, "exp10({x})");
        }
        assert!(approx_eq!(f32, fast_exp10(2.0), 100.0, epsilon = 3e-3));
        assert!(fast_exp10(100.0).is_finite());
        assert!(fast_exp10(-100.0) > 0.0);
    }

    #[test]
    fn exp_within_bounds() {
        for x in sweep(-10.0, 10.0, 100_000) {
            let e2 = x.exp2();
            assert!((fast_exp2f(x) - e2).abs() <= 5e-5 * e2, "exp2({x})");
            let e = x.exp();
            assert!((fast_expf(x) - e).abs() <= 1e-4 * e, "exp({x})");
        }
        assert!(fast_exp2f(1000.0).is_finite());
        assert!(fast_exp2f(-1000.0) > 0.0);
        assert!((fast_expm1f(1e-7) - 1e-7).abs() < 1e-12);
    }

    #[test]
    fn hyperbolic_within_bounds() {
        for x in sweep(-5.0, 5.0, 10_000) {
            assert!((fast_sinhf(x) - x.sinh()).abs() <= 1e-4 * max(1.0, x.sinh().abs()));
            assert!((fast_coshf(x) - x.cosh()).abs() <= 1e-4 * x.cosh());
            assert!(err(fast_tanhf(x), (x as f64).tanh()) <= 3.2e-6, "tanh({x})");
        }
    }

    #[test]
    fn safe_pow_handles_negative_base() {
        assert!((fast_safe_powf(-2.0, 3.0) + 8.0).abs() < 1e-3);
        assert!((fast_safe_powf(-2.0, 2.0) - 4.0).abs() < 1e-3);
        assert_eq!(fast_safe_powf(-2.0, 0.5), 0.0);
        assert_eq!(fast_safe_powf(5.0, 0.0), 1.0);
        assert_eq!(fast_safe_powf(0.0, 3.0), 0.0);
        assert!((fast_safe_powf(2.0, 0.5) - 2.0_f32.sqrt()).abs() < 1e-4);
    }

    #[test]
    fn erf_within_bounds() {
        for x in sweep(-4.0, 4.0, 10_000) {
            let expected = erf_reference(x as f64);
            assert!(err(fast_erff(x), expected) <= 1.9e-6, "erf({x})");
            assert!(err(fast_erfcf(x), 1.0 - expected) <= 1.9e-6, "erfc({x})");
        }
        assert_eq!(fast_erff(20.0), 1.0);
        assert_eq!(fast_erff(-20.0), -1.0);
    }

    proptest! {
        #[test]
        fn ierf_inverts_erf(x in -0.99f32..0.99f32) {
            prop_assert!((fast_erff(fast_ierff(x)) - x).abs() < 1e-4);
        }

        #[test]
        fn sin_squared_plus_cos_squared(x in -100.0f32..100.0f32) {
            let (s, c) = fast_sincosf(x);
            prop_assert!((s * s + c * c - 1.0).abs() < 1e-5);
        }
    }
}
