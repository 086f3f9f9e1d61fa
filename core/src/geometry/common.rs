//! Common

use super::Vector3f;
use crate::math::{abs, Float};

/// Create a new coordinate system from a single unit vector and return
/// the two other unit vectors.
///
/// A second vector is constructing from the first by zeroing one of the
/// coordinates and swapping the remaining 2 and negating one of them. This
/// vector is also normalized.
///
/// The third vector is the cross product of the give vector and the second
/// vector. Since both these are normalized, the third vector will be a unit
/// vector.
///
/// * `v1` - The first unit vector to form part of the coordinate system.
pub fn coordinate_system(v1: &Vector3f) -> (Vector3f, Vector3f) {
    let v2 = if abs(v1.x) > abs(v1.y) {
        Vector3f::new(-v1.z, 0.0, v1.x) / (v1.x * v1.x + v1.z * v1.z).sqrt()
    } else {
        Vector3f::new(0.0, v1.z, -v1.y) / (v1.y * v1.y + v1.z * v1.z).sqrt()
    };

    let v3 = v1.cross(&v2);

    (v2, v3)
}

/// Create a coordinate system around a normal whose first axis follows a
/// tangent direction projected onto the plane of the normal.
///
/// * `n` - The unit normal.
/// * `t` - The tangent direction; need not be perpendicular to `n`. When it
///         is parallel to `n` an arbitrary frame around `n` is returned.
pub fn coordinate_system_tangent(n: &Vector3f, t: &Vector3f) -> (Vector3f, Vector3f) {
    let c = n.cross(t);
    if c.length_squared() <= 1e-12 {
        return coordinate_system(n);
    }
    let y = c.normalize();
    let x = y.cross(n);
    (x, y)
}

/// Returns a direction expressed in the frame `(x, y, z)`.
///
/// * `sin_theta` - Sine of the angle to `z`.
/// * `cos_theta` - Cosine of the angle to `z`.
/// * `sin_phi`   - Sine of the azimuth.
/// * `cos_phi`   - Cosine of the azimuth.
/// * `x`         - First tangent axis.
/// * `y`         - Second tangent axis.
/// * `z`         - Pole axis.
#[inline]
pub fn spherical_direction_in_frame(
    sin_theta: Float,
    cos_theta: Float,
    sin_phi: Float,
    cos_phi: Float,
    x: &Vector3f,
    y: &Vector3f,
    z: &Vector3f,
) -> Vector3f {
    (cos_phi * sin_theta) * x + (sin_phi * sin_theta) * y + cos_theta * z
}

/// Mirrors `w` about `n`. Both point away from the surface.
///
/// * `w` - The direction to reflect.
/// * `n` - The (micro)normal.
#[inline]
pub fn reflect(w: &Vector3f, n: &Vector3f) -> Vector3f {
    (2.0 * n.dot(w)) * n - *w
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Vector3;
    use proptest::prelude::*;

    crate::prop_unit_vector3!(unit_vector3);

    #[test]
    fn from_unit_z_axis() {
        let z = Vector3f::new(0.0, 0.0, 1.0);
        let (x, y) = coordinate_system(&z);
        assert_eq!(x.dot(&z), 0.0);
        assert_eq!(y.dot(&z), 0.0);
        assert_eq!(x.dot(&y), 0.0);
    }

    #[test]
    fn tangent_frame_follows_tangent() {
        let n = Vector3f::new(0.0, 0.0, 1.0);
        let (x, y) = coordinate_system_tangent(&n, &Vector3f::new(1.0, 0.0, 0.5));
        assert!((x.x - 1.0).abs() < 1e-6);
        assert!((y.y - 1.0).abs() < 1e-6);
    }

    #[test]
    fn tangent_frame_parallel_tangent_is_finite() {
        let n = Vector3f::new(1.0, 0.0, 0.0);
        let (x, y) = coordinate_system_tangent(&n, &n);
        for v in [x, y] {
            assert!(v.x.is_finite() && v.y.is_finite() && v.z.is_finite());
            assert!((v.length() - 1.0).abs() < 1e-5);
            assert!(v.dot(&n).abs() < 1e-5);
        }
        assert!(x.dot(&y).abs() < 1e-5);
    }

    #[test]
    fn reflect_about_normal() {
        let n = Vector3f::new(0.0, 0.0, 1.0);
        let w = Vector3f::new(1.0, 0.0, 1.0).normalize();
        let r = reflect(&w, &n);
        assert!((r.x + w.x).abs() < 1e-6);
        assert!((r.z - w.z).abs() < 1e-6);
    }

    proptest! {
        #[test]
        fn coordinate_system_is_orthonormal(v in unit_vector3()) {
            let (a, b) = coordinate_system(&v);
            prop_assert!(a.dot(&v).abs() < 1e-5);
            prop_assert!(b.dot(&v).abs() < 1e-5);
            prop_assert!(a.dot(&b).abs() < 1e-5);
            prop_assert!((a.length() - 1.0).abs() < 1e-5);
            prop_assert!((b.length() - 1.0).abs() < 1e-5);
        }

        #[test]
        fn reflect_preserves_angle(w in unit_vector3(), n in unit_vector3()) {
            let r = reflect(&w, &n);
            prop_assert!((r.dot(&n) - w.dot(&n)).abs() < 1e-5);
            prop_assert!((r.length() - 1.0).abs() < 1e-4);
        }
    }
}
