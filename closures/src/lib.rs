//! Shading Closures

#[macro_use]
extern crate log;

pub mod bsdf;
pub mod closure;
pub mod common;
pub mod estimate;
pub mod registry;
pub mod subsurface;
pub mod volume;
