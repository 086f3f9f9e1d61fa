//! GGX

use super::*;

/// GGX (Trowbridge-Reitz) distribution of microfacet normals.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct GgxDistribution;

/// GGX microfacet closure.
pub type MicrofacetGgx = MicrofacetClosure<GgxDistribution>;

impl MicrofacetDistribution for GgxDistribution {
    /// Returns the differential area of microfacets at angle θm to the
    /// normal.
    ///
    /// * `alpha`       - Roughness.
    /// * `cos_theta_m` - Cosine of the microfacet normal to the normal.
    fn d(alpha: Float, cos_theta_m: Float) -> Float {
        if cos_theta_m <= 0.0 {
            return 0.0;
        }

        let alpha2 = alpha * alpha;
        let cos_theta_m2 = cos_theta_m * cos_theta_m;
        let cos_theta_m4 = cos_theta_m2 * cos_theta_m2;
        let tan_theta_m2 = (1.0 - cos_theta_m2) / cos_theta_m2;
        let e = alpha2 + tan_theta_m2;

        alpha2 / (PI * cos_theta_m4 * e * e)
    }

    /// Evaluates Smith's monodirectional shadowing term.
    ///
    /// * `alpha`     - Roughness.
    /// * `cos_theta` - Cosine of the direction to the normal.
    fn g1(alpha: Float, cos_theta: Float) -> Float {
        let cos2 = cos_theta * cos_theta;
        if cos2 <= 0.0 {
            return 0.0;
        }
        2.0 / (1.0 + safe_sqrt(1.0 + alpha * alpha * (1.0 - cos2) / cos2))
    }

    /// Returns tan²θm of a sampled microfacet normal.
    ///
    /// * `alpha` - Roughness.
    /// * `u`     - Uniform random value.
    fn sample_tan2(alpha: Float, u: Float) -> Float {
        let u = min(u, ONE_MINUS_EPSILON);
        alpha * alpha * u / (1.0 - u)
    }
}
