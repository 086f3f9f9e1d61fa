//! Common sampling functions.

use crate::geometry::*;
use crate::math::*;

/// Uniformly sample a direction on a hemisphere about `(0, 0, 1)`.
///
/// * `u` - The random sample point.
pub fn uniform_sample_hemisphere(u: &Point2f) -> Vector3f {
    let z = u[0];
    let r = max(0.0, 1.0 - z * z).sqrt();
    let phi = TWO_PI * u[1];
    Vector3f::new(r * phi.cos(), r * phi.sin(), z)
}

/// Returns the PDF for uniformly sampling a direction from a hemisphere.
#[inline]
pub fn uniform_hemisphere_pdf() -> Float {
    INV_TWO_PI
}

/// Uniformly sample a direction from a sphere.
///
/// * `u` - The random sample point.
pub fn uniform_sample_sphere(u: &Point2f) -> Vector3f {
    let z = 1.0 - 2.0 * u[0];
    let r = max(0.0, 1.0 - z * z).sqrt();
    let phi = TWO_PI * u[1];
    Vector3f::new(r * phi.cos(), r * phi.sin(), z)
}

/// Returns the PDF for uniformly sampling a direction from a sphere.
#[inline]
pub fn uniform_sphere_pdf() -> Float {
    INV_FOUR_PI
}

/// Sample a point on a unit disk by mapping from a unit square to the unit
/// circle. The concentric mapping takes points in [-1, 1]^2 to unit disk by
/// uniformly mapping concentric squares to concentric circles.
///
/// * `u` - The random sample point.
pub fn concentric_sample_disk(u: &Point2f) -> Point2f {
    // Map uniform random numbers to [-1,1]^2.
    let u_offset = 2.0 * *u - Point2f::new(1.0, 1.0);

    // Handle degeneracy at the origin.
    if u_offset.x == 0.0 && u_offset.y == 0.0 {
        return Point2f::zero();
    }

    // Apply concentric mapping to point
    let (r, theta) = if abs(u_offset.x) > abs(u_offset.y) {
        (u_offset.x, PI_OVER_FOUR * (u_offset.y / u_offset.x))
    } else {
        (
            u_offset.y,
            PI_OVER_TWO - PI_OVER_FOUR * (u_offset.x / u_offset.y),
        )
    };

    r * Point2f::new(theta.cos(), theta.sin())
}

/// Sample a direction on a hemisphere about `(0, 0, 1)` using cosine-weighted
/// sampling.
///
/// * `u` - The random sample point.
#[inline]
pub fn cosine_sample_hemisphere(u: &Point2f) -> Vector3f {
    let d = concentric_sample_disk(u);
    let z = max(0.0, 1.0 - d.x * d.x - d.y * d.y).sqrt();
    Vector3f::new(d.x, d.y, z)
}

/// Returns the PDF for cosine-weighted sampling a direction from a hemisphere.
///
/// * `cos_theta` - Cosine term of incident radiance.
#[inline]
pub fn cosine_hemisphere_pdf(cos_theta: Float) -> Float {
    cos_theta * INV_PI
}

/// Cosine-weighted sample of the hemisphere around an arbitrary normal.
/// Returns the direction and its PDF.
///
/// * `n` - The unit normal.
/// * `u` - The random sample point.
pub fn sample_cos_hemisphere(n: &Vector3f, u: &Point2f) -> (Vector3f, Float) {
    let local = cosine_sample_hemisphere(u);
    let (t, b) = coordinate_system(n);
    let omega = local.x * t + local.y * b + local.z * n;
    (omega, cosine_hemisphere_pdf(local.z))
}

/// Uniform sample of the hemisphere around an arbitrary normal. Returns the
/// direction and its PDF.
///
/// * `n` - The unit normal.
/// * `u` - The random sample point.
pub fn sample_uniform_hemisphere(n: &Vector3f, u: &Point2f) -> (Vector3f, Float) {
    let local = uniform_sample_hemisphere(u);
    let (t, b) = coordinate_system(n);
    let omega = local.x * t + local.y * b + local.z * n;
    (omega, uniform_hemisphere_pdf())
}

/// Sample a direction from a `cos^exponent` lobe about `axis`. Returns the
/// direction and the cosine to the axis.
///
/// * `axis`     - The lobe axis.
/// * `exponent` - Lobe exponent; zero gives a uniform hemisphere.
/// * `u`        - The random sample point.
pub fn sample_power_cosine_lobe(axis: &Vector3f, exponent: Float, u: &Point2f) -> (Vector3f, Float) {
    let cos_theta = u[1].powf(1.0 / (exponent + 1.0));
    let sin_theta = safe_sqrt(1.0 - cos_theta * cos_theta);
    let phi = TWO_PI * u[0];
    let (t, b) = coordinate_system(axis);
    let omega = spherical_direction_in_frame(sin_theta, cos_theta, phi.sin(), phi.cos(), &t, &b, axis);
    (omega, cos_theta)
}

/// Returns the PDF of sampling a `cos^exponent` lobe.
///
/// * `exponent`  - Lobe exponent.
/// * `cos_theta` - Cosine to the lobe axis.
#[inline]
pub fn power_cosine_lobe_pdf(exponent: Float, cos_theta: Float) -> Float {
    if cos_theta > 0.0 {
        (exponent + 1.0) * INV_TWO_PI * cos_theta.powf(exponent)
    } else {
        0.0
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::approx_eq;
    use proptest::prelude::*;

    crate::prop_unit_vector3!(unit_vector3);

    #[test]
    fn concentric_disk_center() {
        assert_eq!(concentric_sample_disk(&Point2f::new(0.5, 0.5)), Point2f::zero());
    }

    #[test]
    fn cosine_hemisphere_center_is_normal() {
        let n = Vector3f::new(0.0, 0.0, 1.0);
        let (w, pdf) = sample_cos_hemisphere(&n, &Point2f::new(0.5, 0.5));
        assert_eq!(w, n);
        assert!(approx_eq!(f32, pdf, INV_PI, epsilon = 1e-6));
    }

    proptest! {
        #[test]
        fn concentric_disk_inside(x in 0.0..1.0f32, y in 0.0..1.0f32) {
            let p = concentric_sample_disk(&Point2f::new(x, y));
            prop_assert!(p.x * p.x + p.y * p.y <= 1.0 + 1e-5);
        }

        #[test]
        fn cosine_samples_above_normal(n in unit_vector3(), x in 0.0..1.0f32, y in 0.0..1.0f32) {
            let (w, pdf) = sample_cos_hemisphere(&n, &Point2f::new(x, y));
            let c = w.dot(&n);
            prop_assert!(c >= -1e-5);
            prop_assert!((pdf - c * INV_PI).abs() < 1e-4);
            prop_assert!((w.length() - 1.0).abs() < 1e-4);
        }

        #[test]
        fn uniform_samples_above_normal(n in unit_vector3(), x in 0.0..1.0f32, y in 0.0..1.0f32) {
            let (w, _) = sample_uniform_hemisphere(&n, &Point2f::new(x, y));
            prop_assert!(w.dot(&n) >= -1e-5);
        }

        #[test]
        fn power_lobe_cosine_matches(n in unit_vector3(), e in 0.0..200.0f32, x in 0.0..1.0f32, y in 0.0..1.0f32) {
            let (w, c) = sample_power_cosine_lobe(&n, e, &Point2f::new(x, y));
            prop_assert!((w.dot(&n) - c).abs() < 1e-4);
        }
    }
}
