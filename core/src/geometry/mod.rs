//! Geometry

// Define macros for property based testing.
#[cfg(test)]
#[macro_export]
macro_rules! prop_range {
    ($name: ident, $t: ty, $r: expr) => {
        prop_compose! {
            fn $name()(f in $r) -> $t {
                f
            }
        }
    };
}

#[cfg(test)]
#[macro_export]
macro_rules! prop_vector3 {
    ($name: ident, $t: ty, $xr: expr, $yr: expr, $zr: expr) => {
        prop_compose! {
            fn $name()(x in $xr, y in $yr, z in $zr) -> Vector3<$t> {
                Vector3 { x, y, z }
            }
        }
    };
}

#[cfg(test)]
#[macro_export]
macro_rules! prop_unit_vector3 {
    ($name: ident) => {
        prop_compose! {
            fn $name()(
                (x, y, z) in (-1.0..1.0f32, -1.0..1.0f32, -1.0..1.0f32)
                    .prop_filter("non-degenerate", |(x, y, z)| x * x + y * y + z * z > 1e-2)
            ) -> Vector3<f32> {
                Vector3::new(x, y, z).normalize()
            }
        }
    };
}

mod common;
mod point2;
mod vector3;

// Re-export
pub use common::*;
pub use point2::*;
pub use vector3::*;
