//! BSSRDF diffusion profiles and importance sampling tables.

mod profile;
mod table;

// Re-export
pub use profile::*;
pub use table::*;

use crate::math::Float;

/// Radii below this are treated as zero and the closure degrades to diffuse.
pub const BSSRDF_MIN_RADIUS: Float = 1e-8;

/// Number of entries in a radius table.
pub const BSSRDF_RADIUS_TABLE_SIZE: usize = 1024;

/// Number of reflectance buckets in the dipole lookup table.
pub const BSSRDF_REFL_TABLE_SIZE: usize = 256;

/// Dipole profiles are tabulated out to this multiple of the radius.
pub const BSSRDF_DIPOLE_MAX_RADIUS: Float = 10.0;

/// Index of refraction used when building the dipole lookup table.
pub const BSSRDF_DIPOLE_IOR: Float = 1.3;
