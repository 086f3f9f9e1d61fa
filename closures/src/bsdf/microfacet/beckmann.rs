//! Beckmann

use super::*;

/// Beckmann-Spizzichino distribution of microfacet normals.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct BeckmannDistribution;

/// Beckmann microfacet closure.
pub type MicrofacetBeckmann = MicrofacetClosure<BeckmannDistribution>;

impl MicrofacetDistribution for BeckmannDistribution {
    fn d(alpha: Float, cos_theta_m: Float) -> Float {
        if cos_theta_m <= 0.0 {
            return 0.0;
        }

        let alpha2 = alpha * alpha;
        let cos_theta_m2 = cos_theta_m * cos_theta_m;
        let cos_theta_m4 = cos_theta_m2 * cos_theta_m2;
        let tan_theta_m2 = (1.0 - cos_theta_m2) / cos_theta_m2;

        (-tan_theta_m2 / alpha2).exp() / (PI * alpha2 * cos_theta_m4)
    }

    /// Uses the rational approximation from Walter et al. 2007.
    fn g1(alpha: Float, cos_theta: Float) -> Float {
        let cos2 = cos_theta * cos_theta;
        if cos2 <= 0.0 {
            return 0.0;
        }

        let tan_theta = safe_sqrt(1.0 - cos2) / abs(cos_theta);
        if tan_theta == 0.0 {
            return 1.0;
        }

        let a = 1.0 / (alpha * tan_theta);
        if a < 1.6 {
            (3.535 * a + 2.181 * a * a) / (1.0 + 2.276 * a + 2.577 * a * a)
        } else {
            1.0
        }
    }

    fn sample_tan2(alpha: Float, u: Float) -> Float {
        let u = min(u, ONE_MINUS_EPSILON);
        max(-alpha * alpha * (1.0 - u).ln(), 0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::approx_eq;

    #[test]
    fn projected_area_is_one() {
        let alpha = 0.3;
        let n = 4096;
        let mut sum = 0.0;
        for i in 0..n {
            let theta = (i as Float + 0.5) / n as Float * PI_OVER_TWO;
            let c = theta.cos();
            sum += BeckmannDistribution::d(alpha, c)
                * c
                * theta.sin()
                * TWO_PI
                * (PI_OVER_TWO / n as Float);
        }
        assert!(approx_eq!(f32, sum, 1.0, epsilon = 1e-2));
    }

    #[test]
    fn g1_is_continuous_at_cutoff() {
        // a = 1.6 at tanθ = 1 / (1.6 α)
        let alpha: Float = 0.5;
        let tan = 1.0 / (1.6 * alpha);
        let cos = 1.0 / (1.0 + tan * tan).sqrt();
        let g = BeckmannDistribution::g1(alpha, cos * 1.001);
        assert!((g - 1.0).abs() < 2e-3);
    }

    #[test]
    fn sampled_tangent_grows_with_u() {
        let a = BeckmannDistribution::sample_tan2(0.3, 0.2);
        let b = BeckmannDistribution::sample_tan2(0.3, 0.8);
        assert!(a < b);
        assert_eq!(BeckmannDistribution::sample_tan2(0.3, 0.0), 0.0);
    }
}
