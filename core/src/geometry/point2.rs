//! 2-D Points

use crate::math::*;
use num_traits::{Num, Zero};
use std::ops::{Add, Index, IndexMut, Mul, Sub};

/// A 2-D point containing numeric values.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Point2<T> {
    /// X-coordinate.
    pub x: T,

    /// Y-coordinate.
    pub y: T,
}

/// 2-D point containing `Float` values.
pub type Point2f = Point2<Float>;

impl<T: Num> Point2<T> {
    /// Creates a new 2-D point.
    ///
    /// * `x` - X-coordinate.
    /// * `y` - Y-coordinate.
    pub fn new(x: T, y: T) -> Self {
        Self { x, y }
    }

    /// Creates a new 2-D zero point.
    pub fn zero() -> Self
    where
        T: Zero,
    {
        Self::new(T::zero(), T::zero())
    }
}

impl<T: Num> Add for Point2<T> {
    type Output = Self;

    /// Adds the given point and returns the result.
    ///
    /// * `other` -  The point to add.
    fn add(self, other: Self) -> Self::Output {
        Self::new(self.x + other.x, self.y + other.y)
    }
}

impl<T: Num> Sub for Point2<T> {
    type Output = Self;

    /// Subtracts the given point and returns the result.
    ///
    /// * `other` -  The point to subtract.
    fn sub(self, other: Self) -> Self::Output {
        Self::new(self.x - other.x, self.y - other.y)
    }
}

impl Mul<Point2f> for Float {
    type Output = Point2f;

    /// Scale the point.
    ///
    /// * `p` -  The point.
    fn mul(self, p: Point2f) -> Point2f {
        Point2f::new(self * p.x, self * p.y)
    }
}

impl<T> Index<usize> for Point2<T> {
    type Output = T;

    /// Index the point by coordinate (0 = x, 1 = y).
    ///
    /// * `i` -  The coordinate index.
    fn index(&self, i: usize) -> &Self::Output {
        match i {
            0 => &self.x,
            1 => &self.y,
            _ => panic!("Invalid index {} for Point2", i),
        }
    }
}

impl<T> IndexMut<usize> for Point2<T> {
    /// Index the point by coordinate (0 = x, 1 = y).
    ///
    /// * `i` -  The coordinate index.
    fn index_mut(&mut self, i: usize) -> &mut Self::Output {
        match i {
            0 => &mut self.x,
            1 => &mut self.y,
            _ => panic!("Invalid index {} for Point2", i),
        }
    }
}

impl From<(Float, Float)> for Point2f {
    /// Create a point from a pair of values.
    ///
    /// * `p` - The (x, y) pair.
    fn from(p: (Float, Float)) -> Self {
        Self::new(p.0, p.1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_coordinates() {
        let mut p = Point2f::new(0.25, 0.75);
        assert_eq!(p[0], 0.25);
        assert_eq!(p[1], 0.75);
        p[0] = 0.5;
        assert_eq!(p, Point2f::from((0.5, 0.75)));
    }

    #[test]
    #[should_panic]
    fn index_out_of_range() {
        let p = Point2f::zero();
        let _ = p[2];
    }

    #[test]
    fn scale_and_offset() {
        let p = 2.0 * Point2f::new(0.5, 0.25) - Point2f::new(1.0, 1.0);
        assert_eq!(p, Point2f::new(0.0, -0.5));
    }
}
