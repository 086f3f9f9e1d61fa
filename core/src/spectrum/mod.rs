//! Spectrum

mod blackbody;
mod color;
mod rgb_spectrum;

// Re-export
pub use blackbody::*;
pub use color::*;
pub use rgb_spectrum::*;

/// Closures weight light with an RGB triple.
pub type Spectrum = RGBSpectrum;
