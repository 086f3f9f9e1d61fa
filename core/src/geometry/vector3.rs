//! 3-D Vectors

use crate::math::Float;
use num_traits::{Num, Zero};
use std::fmt;
use std::ops::{Add, Div, Mul, Neg, Sub};

/// A 3-D vector. Shading directions, normals and tangents all use it.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Vector3<T> {
    pub x: T,
    pub y: T,
    pub z: T,
}

/// 3-D vector containing `Float` values.
pub type Vector3f = Vector3<Float>;

impl<T: Num + Copy> Vector3<T> {
    /// Creates a new 3-D vector.
    ///
    /// * `x` - X-coordinate.
    /// * `y` - Y-coordinate.
    /// * `z` - Z-coordinate.
    pub fn new(x: T, y: T, z: T) -> Self {
        Self { x, y, z }
    }

    /// Creates a new 3-D zero vector.
    pub fn zero() -> Self
    where
        T: Zero,
    {
        Self::new(T::zero(), T::zero(), T::zero())
    }

    /// Returns the dot product with another vector.
    ///
    /// * `other` - The other vector.
    pub fn dot(&self, other: &Self) -> T {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    /// Returns the cross product with another vector.
    ///
    /// * `other` - The other vector.
    pub fn cross(&self, other: &Self) -> Self {
        Self::new(
            self.y * other.z - self.z * other.y,
            self.z * other.x - self.x * other.z,
            self.x * other.y - self.y * other.x,
        )
    }

    /// Returns the square of the vector's length.
    pub fn length_squared(&self) -> T {
        self.dot(self)
    }

    /// Returns the part of the vector perpendicular to a unit axis.
    ///
    /// * `axis` - Unit vector to remove.
    pub fn reject(&self, axis: &Self) -> Self {
        *self - *axis * self.dot(axis)
    }
}

impl<T: num_traits::Float> Vector3<T> {
    /// Returns the vector's length.
    pub fn length(&self) -> T {
        self.length_squared().sqrt()
    }

    /// Returns the unit vector.
    pub fn normalize(&self) -> Self {
        *self / self.length()
    }

    /// Returns the unit vector, or the vector unchanged when its length is
    /// zero.
    pub fn safe_normalize(&self) -> Self {
        let l = self.length();
        if l > T::zero() {
            *self / l
        } else {
            *self
        }
    }
}

macro_rules! vector_op {
    ($trait: ident, $f: ident, $op: tt) => {
        impl<T: Num + Copy> $trait for Vector3<T> {
            type Output = Self;

            fn $f(self, other: Self) -> Self {
                Self::new(self.x $op other.x, self.y $op other.y, self.z $op other.z)
            }
        }
    };
}

vector_op!(Add, add, +);
vector_op!(Sub, sub, -);

impl<T: Num + Copy> Mul<T> for Vector3<T> {
    type Output = Self;

    fn mul(self, f: T) -> Self {
        Self::new(self.x * f, self.y * f, self.z * f)
    }
}

impl Mul<Vector3f> for Float {
    type Output = Vector3f;

    fn mul(self, v: Vector3f) -> Vector3f {
        v * self
    }
}

impl Mul<&Vector3f> for Float {
    type Output = Vector3f;

    fn mul(self, v: &Vector3f) -> Vector3f {
        *v * self
    }
}

impl<T: Num + Copy> Div<T> for Vector3<T> {
    type Output = Self;

    /// Scale the vector by 1/f.
    ///
    /// * `f` -  The scaling factor.
    fn div(self, f: T) -> Self {
        debug_assert!(!f.is_zero());
        self * (T::one() / f)
    }
}

impl<T: Num + Copy + Neg<Output = T>> Neg for Vector3<T> {
    type Output = Self;

    fn neg(self) -> Self {
        Self::new(-self.x, -self.y, -self.z)
    }
}

impl<T: fmt::Display> fmt::Display for Vector3<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}, {}]", self.x, self.y, self.z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn safe_normalize_zero() {
        assert_eq!(Vector3f::zero().safe_normalize(), Vector3f::zero());
    }

    #[test]
    fn right_handed_cross() {
        let x = Vector3f::new(1.0, 0.0, 0.0);
        let y = Vector3f::new(0.0, 1.0, 0.0);
        let z = Vector3f::new(0.0, 0.0, 1.0);
        assert_eq!(x.cross(&y), z);
        assert_eq!(y.cross(&z), x);
        assert_eq!(z.cross(&x), y);
        assert_eq!(y.cross(&x), -z);
    }

    #[test]
    fn reject_removes_axis() {
        let n = Vector3f::new(0.0, 0.0, 1.0);
        let t = Vector3f::new(0.5, -2.0, 3.0).reject(&n);
        assert_eq!(t, Vector3f::new(0.5, -2.0, 0.0));
        assert_eq!(n.reject(&n), Vector3f::zero());
    }

    #[test]
    fn scalar_products_commute() {
        let v = Vector3f::new(1.0, -2.0, 0.5);
        assert_eq!(2.0 * v, v * 2.0);
        assert_eq!(2.0 * &v, v + v);
        assert_eq!(v / 2.0, v * 0.5);
    }

    prop_vector3!(
        vector3_f32,
        f32,
        -100.0..100.0f32,
        -100.0..100.0f32,
        -100.0..100.0f32
    );

    proptest! {
        #[test]
        fn normalize_has_unit_length(v in vector3_f32()) {
            prop_assume!(v.length_squared() > 1e-6);
            prop_assert!((v.normalize().length() - 1.0).abs() < 1e-5);
        }

        #[test]
        fn cross_is_perpendicular(a in vector3_f32(), b in vector3_f32()) {
            let c = a.cross(&b);
            let scale = 1.0 + a.length_squared() * b.length() + b.length_squared() * a.length();
            prop_assert!(c.dot(&a).abs() <= 1e-4 * scale);
            prop_assert!(c.dot(&b).abs() <= 1e-4 * scale);
        }

        #[test]
        fn reject_is_perpendicular(v in vector3_f32(), n in vector3_f32()) {
            prop_assume!(n.length_squared() > 1e-2);
            let n = n.normalize();
            prop_assert!(v.reject(&n).dot(&n).abs() <= 1e-4 * (1.0 + v.length()));
        }
    }
}
