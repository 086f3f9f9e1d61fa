//! Radius sampling tables.

use super::*;
use crate::math::*;
use itertools::Itertools;

/// Importance sampling table for a radially symmetric kernel.
///
/// `pdf` holds the normalized radial density `2πr kernel(r)` on a uniform grid
/// over `[0, max_radius]`. `sample_radii` holds the inverse CDF on a uniform
/// grid over `[0, 1]`.
#[derive(Clone, Debug)]
pub struct RadiusTable {
    /// Inverse CDF; radii are non-decreasing.
    pub sample_radii: Vec<Float>,

    /// Normalized radial density.
    pub pdf: Vec<Float>,

    /// Largest tabulated radius.
    pub max_radius: Float,

    /// Integral of the kernel over the disk before normalization.
    pub integral: Float,
}

impl RadiusTable {
    /// Builds a table for a kernel given as area density.
    ///
    /// A kernel that integrates to zero yields an all-zero table.
    ///
    /// * `kernel`     - The kernel.
    /// * `size`       - Number of entries (at least 2).
    /// * `max_radius` - Support of the kernel.
    pub fn build<F>(kernel: F, size: usize, max_radius: Float) -> Self
    where
        F: Fn(Float) -> Float,
    {
        debug_assert!(size >= 2);

        let dr = max_radius / (size - 1) as Float;
        let radii: Vec<Float> = (0..size).map(|i| i as Float * dr).collect();
        let mut pdf: Vec<Float> = radii.iter().map(|&r| kernel(r) * TWO_PI * r).collect();

        // Trapezoid rule.
        let mut cdf = Vec::with_capacity(size);
        cdf.push(0.0);
        for (p0, p1) in pdf.iter().tuple_windows() {
            let last = cdf[cdf.len() - 1];
            cdf.push(last + 0.5 * (p0 + p1) * dr);
        }

        let integral = cdf[size - 1];
        if !(integral > 0.0) {
            return Self {
                sample_radii: vec![0.0; size],
                pdf: vec![0.0; size],
                max_radius,
                integral: 0.0,
            };
        }

        let inv_integral = 1.0 / integral;
        pdf.iter_mut().for_each(|p| *p *= inv_integral);
        cdf.iter_mut().for_each(|c| *c *= inv_integral);

        let sample_radii = (0..size)
            .map(|i| {
                let u = i as Float / (size - 1) as Float;
                cdf_invert(&cdf, &radii, u)
            })
            .collect();

        Self {
            sample_radii,
            pdf,
            max_radius,
            integral,
        }
    }

    /// Returns true if the kernel integrated to zero.
    pub fn is_zero(&self) -> bool {
        self.integral == 0.0
    }

    /// Returns a radius distributed according to the kernel.
    ///
    /// * `u` - Uniform random value.
    pub fn sample(&self, u: Float) -> Float {
        lookup(&self.sample_radii, saturate(u))
    }

    /// Returns the radial density at `r`.
    ///
    /// * `r` - Distance.
    pub fn pdf(&self, r: Float) -> Float {
        if r < 0.0 || r > self.max_radius || self.max_radius <= 0.0 {
            return 0.0;
        }
        lookup(&self.pdf, r / self.max_radius)
    }

    /// Returns the area density at `r`, matching the normalized kernel.
    ///
    /// * `kernel` - The kernel the table was built from.
    /// * `r`      - Distance.
    pub fn area_pdf<F>(&self, kernel: F, r: Float) -> Float
    where
        F: Fn(Float) -> Float,
    {
        if self.is_zero() || r > self.max_radius {
            0.0
        } else {
            kernel(r) / self.integral
        }
    }
}

/// Inverts a normalized CDF tabulated at `x` using `upper_bound` and linear
/// interpolation.
fn cdf_invert(cdf: &[Float], x: &[Float], u: Float) -> Float {
    let n = cdf.len();
    let i = upper_bound(cdf, u);

    if i == 0 {
        x[0]
    } else if i >= n {
        x[n - 1]
    } else {
        let c0 = cdf[i - 1];
        let c1 = cdf[i];
        let t = if c1 > c0 { (u - c0) / (c1 - c0) } else { 0.0 };
        lerp(t, x[i - 1], x[i])
    }
}

/// Linear interpolation into a table sampled uniformly over [0, 1].
fn lookup(values: &[Float], x: Float) -> Float {
    let n = values.len();
    let pos = x * (n - 1) as Float;
    let i = min(pos as usize, n - 2);
    let t = pos - i as Float;
    lerp(t, values[i], values[i + 1])
}

/// Dipole radius tables indexed by diffuse reflectance.
pub struct BssrdfLookupTable {
    rows: Vec<RadiusTable>,
    params: Vec<DipoleParams>,
}

lazy_static! {
    /// Process-wide dipole lookup table.
    pub static ref BSSRDF_LOOKUP_TABLE: BssrdfLookupTable = BssrdfLookupTable::new();
}

impl BssrdfLookupTable {
    /// Builds `BSSRDF_REFL_TABLE_SIZE` dipole tables with unit radius.
    pub fn new() -> Self {
        debug!(
            "Building BSSRDF lookup table ({} x {})",
            BSSRDF_REFL_TABLE_SIZE, BSSRDF_RADIUS_TABLE_SIZE
        );

        let max_radius = BSSRDF_DIPOLE_MAX_RADIUS;
        let params: Vec<DipoleParams> = (0..BSSRDF_REFL_TABLE_SIZE)
            .map(|i| DipoleParams::new(Self::reflectance_of(i), 1.0, BSSRDF_DIPOLE_IOR))
            .collect();
        let rows = params
            .iter()
            .map(|p| RadiusTable::build(|r| p.profile(r), BSSRDF_RADIUS_TABLE_SIZE, max_radius))
            .collect();

        Self { rows, params }
    }

    /// Returns the reflectance a row was built for.
    ///
    /// * `index` - Row index.
    pub fn reflectance_of(index: usize) -> Float {
        index as Float / (BSSRDF_REFL_TABLE_SIZE - 1) as Float
    }

    /// Returns the row index for a reflectance.
    ///
    /// * `reflectance` - Diffuse reflectance; clamped to [0, 1].
    pub fn index_of(reflectance: Float) -> usize {
        let pos = saturate(reflectance) * (BSSRDF_REFL_TABLE_SIZE - 1) as Float;
        min(pos.round() as usize, BSSRDF_REFL_TABLE_SIZE - 1)
    }

    /// Returns the table row closest to a reflectance.
    ///
    /// * `reflectance` - Diffuse reflectance.
    pub fn row(&self, reflectance: Float) -> &RadiusTable {
        &self.rows[Self::index_of(reflectance)]
    }

    /// Returns the unit radius dipole parameters of the row closest to a
    /// reflectance.
    ///
    /// * `reflectance` - Diffuse reflectance.
    pub fn params(&self, reflectance: Float) -> &DipoleParams {
        &self.params[Self::index_of(reflectance)]
    }

    /// Returns the normalized area density of the unit radius dipole at `r`.
    ///
    /// * `reflectance` - Diffuse reflectance.
    /// * `r`           - Distance in units of the mean free path.
    pub fn area_pdf(&self, reflectance: Float, r: Float) -> Float {
        let params = self.params(reflectance);
        self.row(reflectance).area_pdf(|x| params.profile(x), r)
    }
}

impl Default for BssrdfLookupTable {
    fn default() -> Self {
        Self::new()
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
