//! Parameter Sets

use crate::geometry::*;
use crate::math::*;
use crate::spectrum::*;
use std::collections::HashMap;
use std::fmt;

mod paramset_item;

// Re-export
pub use paramset_item::*;

/// A hashmap of parameter sets stored by name.
pub type ParamSetMap<T> = HashMap<String, ParamSetItem<T>>;

/// Stores parameter set items of different types in hashmaps.
#[derive(Clone)]
pub struct ParamSet {
    pub floats: ParamSetMap<Float>,
    pub vector3fs: ParamSetMap<Vector3f>,
    pub spectra: ParamSetMap<Spectrum>,
    pub strings: ParamSetMap<String>,
}

/// Define a macro that can be used to generate a function for adding/replacing
/// parameter set item.
macro_rules! paramset_add {
    ($func: ident, $t: ty, $paramset: ident) => {
        pub fn $func(&mut self, name: &str, values: &[$t]) {
            let n = String::from(name);
            self.$paramset.insert(n, ParamSetItem::new(values.to_vec()));
        }
    };
}

/// Define a macro that can be used to generate a function for finding
/// parameter set item that is stored as a single item.
macro_rules! paramset_find_one {
    ($func: ident, $t: ty, $paramset: ident) => {
        pub fn $func(&self, name: &str, default: $t) -> $t {
            match self.$paramset.get(name) {
                Some(param) => {
                    param.looked_up.set(true);
                    if param.values.len() == 1 {
                        param.values[0].clone()
                    } else {
                        default.clone()
                    }
                }
                None => default.clone(),
            }
        }
    };
}

/// Define a macro that can be used to generate a function for finding
/// parameter set item that is stored as a list.
macro_rules! paramset_find {
    ($func: ident, $t: ty, $paramset: ident) => {
        pub fn $func(&self, name: &str) -> Vec<$t> {
            match self.$paramset.get(name) {
                Some(param) => {
                    param.looked_up.set(true);
                    param.values.clone()
                }
                None => vec![],
            }
        }
    };
}

/// Define a macro that can be used to print parameter set items.
macro_rules! display_param {
    ($params: expr, $param_type: literal, $formatter: expr) => {
        for (name, param) in $params.iter() {
            writeln!($formatter, "\"{} {}\" {}", $param_type, name, param)?;
        }
    };
}

/// Define a macro that warns about parameters that were never read back.
macro_rules! report_unused_params {
    ($params: expr, $param_type: literal) => {
        for (name, param) in $params.iter() {
            if !param.looked_up.get() {
                warn!("Parameter \"{} {}\" not used", $param_type, name);
            }
        }
    };
}

impl ParamSet {
    /// Returns a new `ParamSet`.
    pub fn new() -> Self {
        Self {
            floats: HashMap::new(),
            vector3fs: HashMap::new(),
            spectra: HashMap::new(),
            strings: HashMap::new(),
        }
    }

    paramset_find_one!(find_one_float, Float, floats);
    paramset_add!(add_float, Float, floats);

    paramset_find_one!(find_one_vector3f, Vector3f, vector3fs);
    paramset_add!(add_vector3f, Vector3f, vector3fs);

    paramset_find_one!(find_one_string, String, strings);
    paramset_add!(add_string, String, strings);

    paramset_find_one!(find_one_spectrum, Spectrum, spectra);
    paramset_find!(find_spectrum, Spectrum, spectra);
    paramset_add!(add_spectrum, Spectrum, spectra);

    /// Add/replace an RGB spectrum.
    ///
    /// * `name`   - Parameter name.
    /// * `values` - RGB values in a linear slice.
    pub fn add_rgb_spectrum(&mut self, name: &str, values: &[Float]) {
        let n = values.len();
        assert!(n % 3 == 0, "RGB spectrum values % 3 != 0");

        self.spectra.insert(
            String::from(name),
            ParamSetItem::new(
                values
                    .chunks_exact(3)
                    .map(|c| Spectrum::from_rgb(c[0], c[1], c[2]))
                    .collect(),
            ),
        );
    }

    /// Returns the type name of a parameter if present in any of the maps.
    ///
    /// * `name` - Parameter name.
    pub fn type_of(&self, name: &str) -> Option<&'static str> {
        if self.floats.contains_key(name) {
            Some("float")
        } else if self.vector3fs.contains_key(name) {
            Some("vector3")
        } else if self.spectra.contains_key(name) {
            Some("color")
        } else if self.strings.contains_key(name) {
            Some("string")
        } else {
            None
        }
    }

    /// Returns the number of values stored for a parameter in any of the maps.
    ///
    /// * `name` - Parameter name.
    pub fn len_of(&self, name: &str) -> usize {
        self.floats
            .get(name)
            .map(|p| p.values.len())
            .or_else(|| self.vector3fs.get(name).map(|p| p.values.len()))
            .or_else(|| self.spectra.get(name).map(|p| p.values.len()))
            .or_else(|| self.strings.get(name).map(|p| p.values.len()))
            .unwrap_or(0)
    }

    /// Logs a warning for every parameter that was never looked up.
    pub fn report_unused(&self) {
        report_unused_params!(self.floats, "float");
        report_unused_params!(self.vector3fs, "vector3");
        report_unused_params!(self.spectra, "color");
        report_unused_params!(self.strings, "string");
    }

    /// Returns names of parameters that were never looked up.
    pub fn unused(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .floats
            .iter()
            .filter(|(_, p)| !p.looked_up.get())
            .map(|(n, _)| n.clone())
            .chain(self.vector3fs.iter().filter(|(_, p)| !p.looked_up.get()).map(|(n, _)| n.clone()))
            .chain(self.spectra.iter().filter(|(_, p)| !p.looked_up.get()).map(|(n, _)| n.clone()))
            .chain(self.strings.iter().filter(|(_, p)| !p.looked_up.get()).map(|(n, _)| n.clone()))
            .collect();
        names.sort();
        names
    }
}

impl Default for ParamSet {
    /// Returns the "default value" for `ParamSet`.
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ParamSet {
    /// Formats the value using the given formatter.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        display_param!(self.floats, "float", f);
        display_param!(self.vector3fs, "vector3", f);
        display_param!(self.spectra, "color", f);
        display_param!(self.strings, "string", f);
        Ok(())
    }
}
