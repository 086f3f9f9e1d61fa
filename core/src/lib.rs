//! Core

#[macro_use]
extern crate hexf;
#[macro_use]
extern crate lazy_static;
#[macro_use]
extern crate log;

// Re-export.
pub mod app;
pub mod bssrdf;
pub mod fast_math;
pub mod geometry;
pub mod math;
pub mod paramset;
pub mod rng;
pub mod sampling;
pub mod spectrum;
