//! Common

#![allow(dead_code)]

use super::clamp::*;
use num_traits::Num;
use std::ops::{Add, Mul, Neg};

/// Use 32-bit precision for floating point numbers.
pub type Float = f32;

/// Default signed integer to 32-bit.
pub type Int = i32;

/// Infinty (∞)
pub const INFINITY: Float = Float::INFINITY;

/// PI (π)
pub const PI: Float = std::f32::consts::PI;

/// 1/PI (1/π)
pub const INV_PI: Float = 1.0 / PI;

/// PI/2 (π/2)
pub const PI_OVER_TWO: Float = PI * 0.5;

/// PI/4 (π/4)
pub const PI_OVER_FOUR: Float = PI * 0.25;

/// 2*PI (2π)
pub const TWO_PI: Float = PI * 2.0;

/// 1/2*PI (1/2π)
pub const INV_TWO_PI: Float = 1.0 / TWO_PI;

/// 4*PI (4π)
pub const FOUR_PI: Float = PI * 4.0;

/// 1/4*PI (1/4π)
pub const INV_FOUR_PI: Float = 1.0 / FOUR_PI;

/// ln(2)
pub const LN_2: Float = std::f32::consts::LN_2;

/// ln(10)
pub const LN_10: Float = std::f32::consts::LN_10;

/// Smallest positive normal value.
pub const FLOAT_MIN: Float = Float::MIN_POSITIVE;

/// Largest finite value.
pub const FLOAT_MAX: Float = Float::MAX;

/// Machine Epsilon
pub const MACHINE_EPSILON: Float = std::f32::EPSILON * 0.5;

/// 1 - epsilon in the precision we've selected for `Float`.
pub const ONE_MINUS_EPSILON: Float = hexf32!("0x1.fffffep-1"); // 0.99999994

/// Returns the absolute value of a number.
///
/// * `n` - The number.
#[inline(always)]
pub fn abs<T>(n: T) -> T
where
    T: Num + Neg<Output = T> + PartialOrd + Copy,
{
    if n < T::zero() {
        -n
    } else {
        n
    }
}

/// Returns the minimum of 2 numbers.
///
/// * `a` - First number.
/// * `b` - Second number.
#[inline(always)]
pub fn min<T>(a: T, b: T) -> T
where
    T: Num + PartialOrd + Copy,
{
    if a < b {
        a
    } else {
        b
    }
}

/// Returns the maximum of 2 numbers.
///
/// * `a` - First number.
/// * `b` - Second number.
#[inline(always)]
pub fn max<T>(a: T, b: T) -> T
where
    T: Num + PartialOrd + Copy,
{
    if a > b {
        a
    } else {
        b
    }
}

/// Linearly interpolate between two points for parameters in [0, 1] and
/// extrapolate for parameters outside that interval.
///
/// * `t` - Parameter.
/// * `p0` - Point at t=0.
/// * `p1` - Point at t=1.
#[inline(always)]
pub fn lerp<P>(t: Float, p0: P, p1: P) -> P
where
    Float: Mul<P, Output = P>,
    P: Add<P, Output = P>,
{
    (1.0 - t) * p0 + t * p1
}

/// Returns `a * b + c`.
///
/// * `a` - Multiplicand.
/// * `b` - Multiplier.
/// * `c` - Addend.
#[inline(always)]
pub fn madd(a: Float, b: Float, c: Float) -> Float {
    a * b + c
}

/// Square root clamped to zero for negative inputs.
///
/// * `x` - The value.
#[inline(always)]
pub fn safe_sqrt(x: Float) -> Float {
    max(x, 0.0).sqrt()
}

/// Returns the 32-bit representation of a floating point value.
///
/// * `f` - The 32-bit floating point number.
#[inline(always)]
pub fn float_to_bits(f: f32) -> u32 {
    f.to_bits()
}

/// Returns the floating point value of a 32-bit representation.
///
/// * `i` - The 32-bit unsigned interger.
#[inline(always)]
pub fn bits_to_float(i: u32) -> f32 {
    f32::from_bits(i)
}

/// Returns `x` with the sign of `y`.
///
/// * `x` - The magnitude.
/// * `y` - The value providing the sign.
#[inline(always)]
pub fn copysign(x: Float, y: Float) -> Float {
    x.copysign(y)
}

/// Emulates the behavior of `upper_bound` but uses a function object to get
/// values at various indices instead of requiring access to an actual array.
/// It is used to bisect arrays that are procedurally generated such as those
/// interpolated from point samples.
///
/// * `size` - Size of array.
/// * `pred` - Function that returns a value at a given index.
pub fn find_interval<Predicate>(size: usize, pred: Predicate) -> usize
where
    Predicate: Fn(usize) -> bool,
{
    let (mut first, mut len) = (0, size);

    while len > 0 {
        let half = len >> 1;
        let middle = first + half;

        // Bisect range based on value of `pred` at `middle`.
        if pred(middle) {
            first = middle + 1;
            len -= half + 1;
        } else {
            len = half;
        }
    }

    clamp(first as isize - 1, 0, size as isize - 2) as usize
}

/// Returns the index of the first element in a sorted slice that is strictly
/// greater than `value`, or `values.len()` if there is none.
///
/// * `values` - Sorted values.
/// * `value`  - The value to search for.
pub fn upper_bound(values: &[Float], value: Float) -> usize {
    values.partition_point(|v| *v <= value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upper_bound_matches_first_greater() {
        let v = [0.0, 0.25, 0.25, 0.5, 1.0];
        assert_eq!(upper_bound(&v, -1.0), 0);
        assert_eq!(upper_bound(&v, 0.0), 1);
        assert_eq!(upper_bound(&v, 0.25), 3);
        assert_eq!(upper_bound(&v, 0.3), 3);
        assert_eq!(upper_bound(&v, 1.0), 5);
    }

    #[test]
    fn find_interval_brackets_value() {
        let v = [0.0, 1.0, 2.0, 3.0];
        assert_eq!(find_interval(v.len(), |i| v[i] <= 1.5), 1);
        assert_eq!(find_interval(v.len(), |i| v[i] <= -1.0), 0);
        assert_eq!(find_interval(v.len(), |i| v[i] <= 10.0), 2);
    }

    #[test]
    fn bits_roundtrip() {
        assert_eq!(float_to_bits(1.0), 0x3f800000);
        assert_eq!(bits_to_float(0x3f800000), 1.0);
    }

    #[test]
    fn one_minus_epsilon_is_below_one() {
        assert!(ONE_MINUS_EPSILON < 1.0);
        assert_eq!(ONE_MINUS_EPSILON, 0.99999994);
    }
}
