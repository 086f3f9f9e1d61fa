//! Blackbody colour.

use super::color::xyz_to_rgb;
use super::RGBSpectrum;
use crate::math::*;

/// Lowest tabulated temperature in Kelvin.
pub const BLACKBODY_MIN_TEMPERATURE: Float = 800.0;

/// Highest tabulated temperature in Kelvin.
pub const BLACKBODY_MAX_TEMPERATURE: Float = 12000.0;

/// Number of entries in the blackbody table.
pub const BLACKBODY_TABLE_SIZE: usize = 256;

/// Visible range used when integrating the Planck spectrum (nm).
const LAMBDA_START: usize = 380;
const LAMBDA_END: usize = 780;

lazy_static! {
    static ref BLACKBODY_TABLE: Vec<[Float; 3]> = build_blackbody_table();
}

/// Returns the spectral radiance of a blackbody (perfect emitter).
///
/// * `lambda` - Wavelength in nanometers.
/// * `t`      - Temperature in Kelvin.
fn planck(lambda: f64, t: f64) -> f64 {
    if t <= 0.0 {
        return 0.0;
    }

    const C: f64 = 299792458.0;
    const H: f64 = 6.62606957e-34;
    const KB: f64 = 1.3806488e-23;

    let l = lambda * 1e-9; // Convert nanometers -> meters.
    let lambda5 = (l * l) * (l * l) * l;
    (2.0 * H * C * C) / (lambda5 * (((H * C) / (l * KB * t)).exp() - 1.0))
}

/// Piecewise gaussian used by the analytic CIE 1931 fit.
fn lobe(x: f64, mu: f64, sigma1: f64, sigma2: f64) -> f64 {
    let s = if x < mu { sigma1 } else { sigma2 };
    let t = (x - mu) / s;
    (-0.5 * t * t).exp()
}

/// Analytic fit of the CIE 1931 colour matching functions (Wyman, Sloan and
/// Shirley 2013).
///
/// * `lambda` - Wavelength in nanometers.
fn cie_xyz(lambda: f64) -> [f64; 3] {
    let x = 1.056 * lobe(lambda, 599.8, 37.9, 31.0) + 0.362 * lobe(lambda, 442.0, 16.0, 26.7)
        - 0.065 * lobe(lambda, 501.1, 20.4, 26.2);
    let y = 0.821 * lobe(lambda, 568.8, 46.9, 40.5) + 0.286 * lobe(lambda, 530.9, 16.3, 31.1);
    let z = 1.217 * lobe(lambda, 437.0, 11.8, 36.0) + 0.681 * lobe(lambda, 459.0, 26.0, 13.8);
    [x, y, z]
}

/// Computes the linear Rec.709 colour of a blackbody without the table,
/// normalized so its largest channel is 1.
///
/// * `t` - Temperature in Kelvin.
pub fn blackbody_exact(t: Float) -> RGBSpectrum {
    let mut xyz = [0.0_f64; 3];
    for lambda in LAMBDA_START..=LAMBDA_END {
        let l = lambda as f64;
        let p = planck(l, t as f64);
        let cmf = cie_xyz(l);
        for (acc, c) in xyz.iter_mut().zip(cmf.iter()) {
            *acc += p * c;
        }
    }

    let m = max(xyz[1], FLOAT_MIN as f64);
    let xyz = [(xyz[0] / m) as Float, 1.0, (xyz[2] / m) as Float];
    let rgb = xyz_to_rgb(&xyz).map(|v| max(v, 0.0));

    let s = max(rgb[0], max(rgb[1], rgb[2]));
    if s > 0.0 {
        RGBSpectrum::from(rgb.map(|v| v / s))
    } else {
        RGBSpectrum::ZERO
    }
}

fn build_blackbody_table() -> Vec<[Float; 3]> {
    debug!("Building blackbody table ({} entries)", BLACKBODY_TABLE_SIZE);

    (0..BLACKBODY_TABLE_SIZE)
        .map(|i| {
            let t = lerp(
                i as Float / (BLACKBODY_TABLE_SIZE - 1) as Float,
                BLACKBODY_MIN_TEMPERATURE,
                BLACKBODY_MAX_TEMPERATURE,
            );
            *blackbody_exact(t).samples()
        })
        .collect()
}

/// Returns the linear Rec.709 colour of a blackbody at a given temperature,
/// normalized so its largest channel is 1. Temperatures outside the table
/// range are clamped to it.
///
/// * `t` - Temperature in Kelvin.
pub fn blackbody(t: Float) -> RGBSpectrum {
    let t = clamp(t, BLACKBODY_MIN_TEMPERATURE, BLACKBODY_MAX_TEMPERATURE);
    let pos = (t - BLACKBODY_MIN_TEMPERATURE)
        / (BLACKBODY_MAX_TEMPERATURE - BLACKBODY_MIN_TEMPERATURE)
        * (BLACKBODY_TABLE_SIZE - 1) as Float;

    let i = min(pos as usize, BLACKBODY_TABLE_SIZE - 2);
    let f = pos - i as Float;

    let a = BLACKBODY_TABLE[i];
    let b = BLACKBODY_TABLE[i + 1];
    RGBSpectrum::from_rgb(
        lerp(f, a[0], b[0]),
        lerp(f, a[1], b[1]),
        lerp(f, a[2], b[2]),
    )
}
