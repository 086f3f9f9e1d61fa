//! Colour-space conversions.

use crate::math::*;

/// Converts the given XYZ coefficients to linear Rec.709 RGB coefficients
/// (D65 white point).
///
/// * `xyz` - The XYZ coefficients.
#[rustfmt::skip]
pub fn xyz_to_rgb(xyz: &[Float; 3]) -> [Float; 3] {
    [
         3.240479 * xyz[0] - 1.537150 * xyz[1] - 0.498535 * xyz[2],
        -0.969256 * xyz[0] + 1.875991 * xyz[1] + 0.041556 * xyz[2],
         0.055648 * xyz[0] - 0.204043 * xyz[1] + 1.057311 * xyz[2],
    ]
}

/// Converts the given linear Rec.709 RGB coefficients to XYZ coefficients.
///
/// * `rgb` - The RGB coefficients.
#[rustfmt::skip]
pub fn rgb_to_xyz(rgb: &[Float; 3]) -> [Float; 3] {
    [
        0.412453 * rgb[0] + 0.357580 * rgb[1] + 0.180423 * rgb[2],
        0.212671 * rgb[0] + 0.715160 * rgb[1] + 0.072169 * rgb[2],
        0.019334 * rgb[0] + 0.119193 * rgb[1] + 0.950227 * rgb[2],
    ]
}

/// Returns the luminance (Y) of a linear Rec.709 colour.
///
/// * `rgb` - The RGB coefficients.
#[inline]
pub fn luminance(rgb: &[Float; 3]) -> Float {
    0.212671 * rgb[0] + 0.715160 * rgb[1] + 0.072169 * rgb[2]
}

/// Converts one sRGB encoded channel to linear. Negative input maps to 0.
///
/// * `c` - Encoded value.
pub fn srgb_to_linear(c: Float) -> Float {
    if c < 0.04045 {
        if c < 0.0 {
            0.0
        } else {
            c * (1.0 / 12.92)
        }
    } else {
        ((c + 0.055) * (1.0 / 1.055)).powf(2.4)
    }
}

/// Converts one linear channel to sRGB encoding. Negative input maps to 0.
///
/// * `c` - Linear value.
pub fn linear_to_srgb(c: Float) -> Float {
    if c < 0.0031308 {
        if c < 0.0 {
            0.0
        } else {
            c * 12.92
        }
    } else {
        1.055 * c.powf(1.0 / 2.4) - 0.055
    }
}
