//! Closure Registry

use crate::bsdf::*;
use crate::closure::*;
use crate::subsurface::*;
use crate::volume::*;
use pbrt_core::geometry::*;
use pbrt_core::math::*;
use pbrt_core::paramset::*;
use pbrt_core::spectrum::*;
use std::fmt;
use std::mem::{offset_of, size_of};

/// Type tag of a closure parameter.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ParamType {
    Float,
    Vector,
    Color,
    ColorArray(usize),
    String,
}

impl ParamType {
    /// Returns the name of the `ParamSet` map the parameter is stored in.
    pub fn type_name(&self) -> &'static str {
        match self {
            ParamType::Float => "float",
            ParamType::Vector => "vector3",
            ParamType::Color | ParamType::ColorArray(_) => "color",
            ParamType::String => "string",
        }
    }

    /// Returns the number of values the parameter holds.
    pub fn len(&self) -> usize {
        match self {
            ParamType::ColorArray(n) => *n,
            _ => 1,
        }
    }

    /// Returns the number of bytes the parameter occupies in a closure.
    pub fn size(&self) -> usize {
        match self {
            ParamType::Float => size_of::<Float>(),
            ParamType::Vector => size_of::<Vector3f>(),
            ParamType::Color => size_of::<Spectrum>(),
            ParamType::ColorArray(n) => n * size_of::<Spectrum>(),
            ParamType::String => size_of::<String>(),
        }
    }
}

impl fmt::Display for ParamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamType::ColorArray(n) => write!(f, "color[{}]", n),
            _ => write!(f, "{}", self.type_name()),
        }
    }
}

/// Describes one closure parameter.
///
/// `offset` documents the layout of the closure struct for callers that
/// write closure memory directly. `ClosureRegistry::instantiate` never reads
/// it; values reach the closure through the descriptor's constructor, which
/// looks them up by name in the `ParamSet`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ParamDescriptor {
    /// Parameter name.
    pub name: &'static str,

    /// Byte offset of the field the parameter is stored in. Keyword
    /// parameters that are not stored have none. Layout information only.
    pub offset: Option<usize>,

    /// Type tag.
    pub param_type: ParamType,

    /// Whether the parameter may be omitted.
    pub optional: bool,
}

impl ParamDescriptor {
    /// Returns a required parameter stored at `offset`.
    ///
    /// * `name`       - Parameter name.
    /// * `offset`     - Byte offset of the field.
    /// * `param_type` - Type tag.
    pub const fn required(name: &'static str, offset: usize, param_type: ParamType) -> Self {
        Self {
            name,
            offset: Some(offset),
            param_type,
            optional: false,
        }
    }

    /// Returns an optional parameter stored at `offset`.
    ///
    /// * `name`       - Parameter name.
    /// * `offset`     - Byte offset of the field.
    /// * `param_type` - Type tag.
    pub const fn optional(name: &'static str, offset: usize, param_type: ParamType) -> Self {
        Self {
            name,
            offset: Some(offset),
            param_type,
            optional: true,
        }
    }

    /// Returns the optional `label` keyword parameter.
    pub const fn label() -> Self {
        Self {
            name: "label",
            offset: None,
            param_type: ParamType::String,
            optional: true,
        }
    }
}

/// Builds a closure from validated parameters.
pub type ClosureConstructor = fn(&ParamSet) -> Closure;

/// Describes a closure type: its name, parameters and constructor.
#[derive(Clone)]
pub struct ClosureDescriptor {
    /// Closure name.
    pub name: &'static str,

    /// Parameters in declaration order.
    pub params: Vec<ParamDescriptor>,

    /// Size of the closure's parameter struct in bytes.
    pub size: usize,

    /// Constructor.
    constructor: ClosureConstructor,
}

impl ClosureDescriptor {
    /// Create a new `ClosureDescriptor`. The `label` keyword is appended to
    /// the parameters.
    ///
    /// * `name`        - Closure name.
    /// * `params`      - Parameters.
    /// * `size`        - Size of the parameter struct.
    /// * `constructor` - Constructor.
    pub fn new(
        name: &'static str,
        mut params: Vec<ParamDescriptor>,
        size: usize,
        constructor: ClosureConstructor,
    ) -> Self {
        params.push(ParamDescriptor::label());
        Self {
            name,
            params,
            size,
            constructor,
        }
    }

    /// Returns a parameter descriptor by name.
    ///
    /// * `name` - Parameter name.
    pub fn param(&self, name: &str) -> Option<&ParamDescriptor> {
        self.params.iter().find(|p| p.name == name)
    }

    /// Checks that every required parameter is present and that present
    /// parameters have the declared type and length.
    ///
    /// * `ps` - Parameters.
    pub fn validate(&self, ps: &ParamSet) -> Result<(), String> {
        for p in self.params.iter() {
            match ps.type_of(p.name) {
                None if p.optional => {}
                None => {
                    return Err(format!(
                        "Closure '{}' missing required parameter '{} {}'",
                        self.name, p.param_type, p.name
                    ))
                }
                Some(t) if t != p.param_type.type_name() => {
                    return Err(format!(
                        "Closure '{}' parameter '{}' expects type '{}', got '{}'",
                        self.name, p.name, p.param_type, t
                    ))
                }
                Some(_) => {
                    let n = ps.len_of(p.name);
                    if n != p.param_type.len() {
                        return Err(format!(
                            "Closure '{}' parameter '{}' expects {} value(s), got {}",
                            self.name,
                            p.name,
                            p.param_type.len(),
                            n
                        ));
                    }
                }
            }
        }
        Ok(())
    }

    /// Returns a parameter set holding a default value for every required
    /// parameter.
    pub fn default_params(&self) -> ParamSet {
        let mut ps = ParamSet::new();
        for p in self.params.iter().filter(|p| !p.optional) {
            match p.param_type {
                ParamType::Float => ps.add_float(p.name, &[0.5]),
                ParamType::Vector if p.name == "T" => ps.add_vector3f(p.name, &[DEFAULT_TANGENT]),
                ParamType::Vector => ps.add_vector3f(p.name, &[DEFAULT_NORMAL]),
                ParamType::Color => ps.add_spectrum(p.name, &[Spectrum::new(0.5)]),
                ParamType::ColorArray(n) => ps.add_spectrum(p.name, &vec![Spectrum::new(0.5); n]),
                ParamType::String => ps.add_string(p.name, &[String::new()]),
            }
        }
        ps
    }

    /// Parses a textual value and stores it in a parameter set under the
    /// parameter's declared type. Vectors and colours take comma separated
    /// components; a single value sets all colour channels.
    ///
    /// * `name`  - Parameter name.
    /// * `value` - Textual value.
    /// * `ps`    - Parameter set to update.
    pub fn parse_param(&self, name: &str, value: &str, ps: &mut ParamSet) -> Result<(), String> {
        let p = self
            .param(name)
            .ok_or_else(|| format!("Closure '{}' has no parameter '{}'", self.name, name))?;

        if p.param_type == ParamType::String {
            ps.add_string(p.name, &[value.to_string()]);
            return Ok(());
        }

        let values = value
            .split(',')
            .map(|v| v.trim().parse::<Float>())
            .collect::<Result<Vec<Float>, _>>()
            .map_err(|e| format!("Parameter '{}' has invalid value '{}': {}", name, value, e))?;

        match (p.param_type, values.len()) {
            (ParamType::Float, 1) => ps.add_float(p.name, &values),
            (ParamType::Vector, 3) => {
                ps.add_vector3f(p.name, &[Vector3f::new(values[0], values[1], values[2])])
            }
            (ParamType::Color, 1) => ps.add_spectrum(p.name, &[Spectrum::new(values[0])]),
            (ParamType::Color, 3) => ps.add_rgb_spectrum(p.name, &values),
            (ParamType::ColorArray(n), len) if len == 3 * n => ps.add_rgb_spectrum(p.name, &values),
            (t, len) => {
                return Err(format!(
                    "Parameter '{}' of type '{}' cannot take {} value(s)",
                    name, t, len
                ))
            }
        }
        Ok(())
    }
}

impl fmt::Debug for ClosureDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClosureDescriptor")
            .field("name", &self.name)
            .field("params", &self.params)
            .field("size", &self.size)
            .finish()
    }
}

impl fmt::Display for ClosureDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.name)?;
        for (i, p) in self.params.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            if p.optional {
                write!(f, "[{} {}]", p.param_type, p.name)?;
            } else {
                write!(f, "{} {}", p.param_type, p.name)?;
            }
        }
        write!(f, ")")
    }
}

/// Normal used when none is given.
const DEFAULT_NORMAL: Vector3f = Vector3f {
    x: 0.0,
    y: 0.0,
    z: 1.0,
};

/// Tangent used when none is given.
const DEFAULT_TANGENT: Vector3f = Vector3f {
    x: 1.0,
    y: 0.0,
    z: 0.0,
};

/// Returns the `label` keyword of a parameter set, if any.
///
/// * `ps` - Parameters.
pub fn label_of(ps: &ParamSet) -> Option<String> {
    let label = ps.find_one_string("label", String::new());
    if label.is_empty() {
        None
    } else {
        Some(label)
    }
}

/// Descriptor tables of every closure type.
#[derive(Debug)]
pub struct ClosureRegistry {
    descriptors: Vec<ClosureDescriptor>,
}

impl ClosureRegistry {
    /// Builds the descriptor tables.
    pub fn new() -> Self {
        let n = |offset| ParamDescriptor::required("N", offset, ParamType::Vector);

        let descriptors = vec![
            ClosureDescriptor::new(
                "diffuse",
                vec![n(offset_of!(Diffuse, n))],
                size_of::<Diffuse>(),
                |ps| Bsdf::from(Diffuse::new(normal(ps))).into(),
            ),
            ClosureDescriptor::new(
                "translucent",
                vec![n(offset_of!(Translucent, n))],
                size_of::<Translucent>(),
                |ps| Bsdf::from(Translucent::new(normal(ps))).into(),
            ),
            ClosureDescriptor::new(
                "oren_nayar",
                vec![
                    n(offset_of!(OrenNayar, n)),
                    ParamDescriptor::required("sigma", offset_of!(OrenNayar, roughness), ParamType::Float),
                ],
                size_of::<OrenNayar>(),
                |ps| Bsdf::from(OrenNayar::new(normal(ps), float(ps, "sigma"))).into(),
            ),
            ClosureDescriptor::new(
                "reflection",
                vec![n(offset_of!(Reflection, n))],
                size_of::<Reflection>(),
                |ps| Bsdf::from(Reflection::new(normal(ps))).into(),
            ),
            ClosureDescriptor::new(
                "refraction",
                vec![
                    n(offset_of!(Refraction, n)),
                    ParamDescriptor::required("eta", offset_of!(Refraction, eta), ParamType::Float),
                ],
                size_of::<Refraction>(),
                |ps| Bsdf::from(Refraction::new(normal(ps), float(ps, "eta"))).into(),
            ),
            ClosureDescriptor::new(
                "transparent",
                vec![],
                size_of::<Transparent>(),
                |_| Bsdf::from(Transparent).into(),
            ),
            ClosureDescriptor::new(
                "microfacet_ggx",
                vec![
                    n(offset_of!(MicrofacetGgx, n)),
                    ParamDescriptor::required("alpha", offset_of!(MicrofacetGgx, alpha), ParamType::Float),
                ],
                size_of::<MicrofacetGgx>(),
                |ps| Bsdf::from(MicrofacetGgx::reflection(normal(ps), float(ps, "alpha"))).into(),
            ),
            ClosureDescriptor::new(
                "microfacet_ggx_refraction",
                vec![
                    n(offset_of!(MicrofacetGgx, n)),
                    ParamDescriptor::required("alpha", offset_of!(MicrofacetGgx, alpha), ParamType::Float),
                    ParamDescriptor::required("eta", offset_of!(MicrofacetGgx, eta), ParamType::Float),
                ],
                size_of::<MicrofacetGgx>(),
                |ps| {
                    Bsdf::from(MicrofacetGgx::refraction(
                        normal(ps),
                        float(ps, "alpha"),
                        float(ps, "eta"),
                    ))
                    .into()
                },
            ),
            ClosureDescriptor::new(
                "microfacet_beckmann",
                vec![
                    n(offset_of!(MicrofacetBeckmann, n)),
                    ParamDescriptor::required("alpha", offset_of!(MicrofacetBeckmann, alpha), ParamType::Float),
                ],
                size_of::<MicrofacetBeckmann>(),
                |ps| {
                    Bsdf::from(MicrofacetBeckmann::reflection(normal(ps), float(ps, "alpha"))).into()
                },
            ),
            ClosureDescriptor::new(
                "microfacet_beckmann_refraction",
                vec![
                    n(offset_of!(MicrofacetBeckmann, n)),
                    ParamDescriptor::required("alpha", offset_of!(MicrofacetBeckmann, alpha), ParamType::Float),
                    ParamDescriptor::required("eta", offset_of!(MicrofacetBeckmann, eta), ParamType::Float),
                ],
                size_of::<MicrofacetBeckmann>(),
                |ps| {
                    Bsdf::from(MicrofacetBeckmann::refraction(
                        normal(ps),
                        float(ps, "alpha"),
                        float(ps, "eta"),
                    ))
                    .into()
                },
            ),
            ClosureDescriptor::new(
                "ward",
                vec![
                    n(offset_of!(Ward, n)),
                    ParamDescriptor::required("T", offset_of!(Ward, t), ParamType::Vector),
                    ParamDescriptor::required("ax", offset_of!(Ward, ax), ParamType::Float),
                    ParamDescriptor::required("ay", offset_of!(Ward, ay), ParamType::Float),
                ],
                size_of::<Ward>(),
                |ps| {
                    Bsdf::from(Ward::new(
                        normal(ps),
                        ps.find_one_vector3f("T", DEFAULT_TANGENT),
                        float(ps, "ax"),
                        float(ps, "ay"),
                    ))
                    .into()
                },
            ),
            ClosureDescriptor::new(
                "phong",
                vec![
                    n(offset_of!(Phong, n)),
                    ParamDescriptor::required("exponent", offset_of!(Phong, exponent), ParamType::Float),
                ],
                size_of::<Phong>(),
                |ps| Bsdf::from(Phong::new(normal(ps), float(ps, "exponent"))).into(),
            ),
            ClosureDescriptor::new(
                "phong_ramp",
                vec![
                    n(offset_of!(PhongRamp, n)),
                    ParamDescriptor::required("exponent", offset_of!(PhongRamp, exponent), ParamType::Float),
                    ParamDescriptor::required(
                        "colors",
                        offset_of!(PhongRamp, colors),
                        ParamType::ColorArray(PHONG_RAMP_COLORS),
                    ),
                ],
                size_of::<PhongRamp>(),
                |ps| {
                    let colors: [Spectrum; PHONG_RAMP_COLORS] = ps
                        .find_spectrum("colors")
                        .try_into()
                        .unwrap_or([Spectrum::ONE; PHONG_RAMP_COLORS]);
                    Bsdf::from(PhongRamp::new(normal(ps), float(ps, "exponent"), colors)).into()
                },
            ),
            ClosureDescriptor::new(
                "westin_backscatter",
                vec![
                    n(offset_of!(WestinBackscatter, n)),
                    ParamDescriptor::required(
                        "roughness",
                        offset_of!(WestinBackscatter, roughness),
                        ParamType::Float,
                    ),
                ],
                size_of::<WestinBackscatter>(),
                |ps| {
                    Bsdf::from(WestinBackscatter::new(normal(ps), float(ps, "roughness"))).into()
                },
            ),
            ClosureDescriptor::new(
                "westin_sheen",
                vec![
                    n(offset_of!(WestinSheen, n)),
                    ParamDescriptor::required("edginess", offset_of!(WestinSheen, edginess), ParamType::Float),
                ],
                size_of::<WestinSheen>(),
                |ps| Bsdf::from(WestinSheen::new(normal(ps), float(ps, "edginess"))).into(),
            ),
            ClosureDescriptor::new(
                "ashikhmin_velvet",
                vec![
                    n(offset_of!(AshikhminVelvet, n)),
                    ParamDescriptor::required("sigma", offset_of!(AshikhminVelvet, sigma), ParamType::Float),
                ],
                size_of::<AshikhminVelvet>(),
                |ps| Bsdf::from(AshikhminVelvet::new(normal(ps), float(ps, "sigma"))).into(),
            ),
            ClosureDescriptor::new(
                "bssrdf_cubic",
                vec![
                    n(offset_of!(SubsurfaceClosure, n)),
                    ParamDescriptor::required("radius", offset_of!(SubsurfaceClosure, radius), ParamType::Color),
                    ParamDescriptor::optional(
                        "sharpness",
                        offset_of!(SubsurfaceClosure, sharpness),
                        ParamType::Float,
                    ),
                    ParamDescriptor::optional(
                        "texture_blur",
                        offset_of!(SubsurfaceClosure, texture_blur),
                        ParamType::Float,
                    ),
                    ParamDescriptor::optional("albedo", offset_of!(SubsurfaceClosure, albedo), ParamType::Color),
                ],
                size_of::<SubsurfaceClosure>(),
                |ps| {
                    SubsurfaceClosure::cubic(
                        normal(ps),
                        ps.find_one_spectrum("radius", Spectrum::ONE),
                        ps.find_one_float("sharpness", 0.0),
                        ps.find_one_float("texture_blur", 0.0),
                        ps.find_one_spectrum("albedo", Spectrum::ONE),
                    )
                    .into()
                },
            ),
            ClosureDescriptor::new(
                "bssrdf_dipole",
                vec![
                    n(offset_of!(SubsurfaceClosure, n)),
                    ParamDescriptor::required("radius", offset_of!(SubsurfaceClosure, radius), ParamType::Color),
                    ParamDescriptor::optional(
                        "texture_blur",
                        offset_of!(SubsurfaceClosure, texture_blur),
                        ParamType::Float,
                    ),
                    ParamDescriptor::optional("albedo", offset_of!(SubsurfaceClosure, albedo), ParamType::Color),
                ],
                size_of::<SubsurfaceClosure>(),
                |ps| {
                    SubsurfaceClosure::dipole(
                        normal(ps),
                        ps.find_one_spectrum("radius", Spectrum::ONE),
                        ps.find_one_float("texture_blur", 0.0),
                        ps.find_one_spectrum("albedo", Spectrum::ONE),
                    )
                    .into()
                },
            ),
            ClosureDescriptor::new(
                "isotropic",
                vec![],
                size_of::<VolumeClosure>(),
                |_| VolumeClosure::Isotropic.into(),
            ),
            ClosureDescriptor::new(
                "henyey_greenstein",
                vec![ParamDescriptor::required(
                    "g",
                    offset_of!(HenyeyGreenstein, g),
                    ParamType::Float,
                )],
                size_of::<HenyeyGreenstein>(),
                |ps| {
                    VolumeClosure::HenyeyGreenstein(HenyeyGreenstein::new(ps.find_one_float("g", 0.0)))
                        .into()
                },
            ),
        ];

        debug!("Registered {} closures", descriptors.len());
        Self { descriptors }
    }

    /// Returns the descriptor of a closure.
    ///
    /// * `name` - Closure name.
    pub fn get(&self, name: &str) -> Option<&ClosureDescriptor> {
        self.descriptors.iter().find(|d| d.name == name)
    }

    /// Returns all descriptors in registration order.
    pub fn descriptors(&self) -> &[ClosureDescriptor] {
        &self.descriptors
    }

    /// Returns all closure names in registration order.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.descriptors.iter().map(|d| d.name)
    }

    /// Validates parameters against a closure's descriptor and builds the
    /// closure. Parameters the closure does not read are logged.
    ///
    /// * `name` - Closure name.
    /// * `ps`   - Parameters.
    pub fn instantiate(&self, name: &str, ps: &ParamSet) -> Result<Closure, String> {
        let desc = self
            .get(name)
            .ok_or_else(|| format!("Unknown closure '{}'", name))?;

        desc.validate(ps)?;

        if let Some(label) = label_of(ps) {
            debug!("Closure '{}' labelled '{}'", name, label);
        }

        let closure = (desc.constructor)(ps);
        ps.report_unused();
        Ok(closure)
    }
}

impl Default for ClosureRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Returns the `N` parameter.
fn normal(ps: &ParamSet) -> Vector3f {
    ps.find_one_vector3f("N", DEFAULT_NORMAL)
}

/// Returns a validated float parameter.
fn float(ps: &ParamSet, name: &str) -> Float {
    ps.find_one_float(name, 0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_closures_instantiate_with_defaults() {
        let registry = ClosureRegistry::new();
        assert_eq!(registry.descriptors().len(), 20);
        for d in registry.descriptors() {
            let ps = d.default_params();
            let c = registry.instantiate(d.name, &ps).unwrap();
            assert_eq!(c.name(), d.name);
            assert!(ps.unused().is_empty(), "{}: {:?}", d.name, ps.unused());
        }
    }

    #[test]
    fn unknown_closure() {
        let registry = ClosureRegistry::new();
        assert!(registry.instantiate("glass", &ParamSet::new()).is_err());
    }

    #[test]
    fn missing_required_parameter() {
        let registry = ClosureRegistry::new();
        let mut ps = ParamSet::new();
        ps.add_vector3f("N", &[DEFAULT_NORMAL]);
        let err = registry.instantiate("oren_nayar", &ps).unwrap_err();
        assert!(err.contains("sigma"), "{}", err);
    }

    #[test]
    fn wrong_type_and_length() {
        let registry = ClosureRegistry::new();
        let mut ps = ParamSet::new();
        ps.add_float("N", &[1.0]);
        assert!(registry.instantiate("diffuse", &ps).is_err());

        let d = registry.get("phong_ramp").unwrap();
        let mut ps = d.default_params();
        ps.add_spectrum("colors", &[Spectrum::ONE; 3]);
        assert!(registry.instantiate("phong_ramp", &ps).is_err());
    }

    #[test]
    fn offsets_are_distinct_and_in_bounds() {
        let registry = ClosureRegistry::new();
        for d in registry.descriptors() {
            let mut offsets: Vec<usize> = d.params.iter().filter_map(|p| p.offset).collect();
            for p in d.params.iter() {
                if let Some(offset) = p.offset {
                    assert!(offset + p.param_type.size() <= d.size, "{}.{}", d.name, p.name);
                }
            }
            let n = offsets.len();
            offsets.sort_unstable();
            offsets.dedup();
            assert_eq!(offsets.len(), n, "{}", d.name);
        }
    }

    #[test]
    fn parse_values() {
        let registry = ClosureRegistry::new();
        let d = registry.get("ward").unwrap();
        let mut ps = d.default_params();
        d.parse_param("ax", "0.25", &mut ps).unwrap();
        d.parse_param("N", "0, 1, 0", &mut ps).unwrap();
        d.parse_param("label", "brushed", &mut ps).unwrap();
        assert!(d.parse_param("ay", "rough", &mut ps).is_err());
        assert!(d.parse_param("N", "1,2", &mut ps).is_err());
        assert!(d.parse_param("sigma", "1", &mut ps).is_err());

        assert_eq!(ps.find_one_float("ax", 0.0), 0.25);
        assert_eq!(label_of(&ps), Some(String::from("brushed")));
        let c = registry.instantiate("ward", &ps).unwrap();
        assert_eq!(c.normal(), Some(Vector3f::new(0.0, 1.0, 0.0)));
    }

    #[test]
    fn parse_colors() {
        let registry = ClosureRegistry::new();
        let d = registry.get("bssrdf_cubic").unwrap();
        let mut ps = d.default_params();
        d.parse_param("radius", "1,0.5,0.25", &mut ps).unwrap();
        d.parse_param("albedo", "0.8", &mut ps).unwrap();
        assert_eq!(
            ps.find_one_spectrum("radius", Spectrum::ZERO),
            Spectrum::from_rgb(1.0, 0.5, 0.25)
        );
        assert_eq!(ps.find_one_spectrum("albedo", Spectrum::ZERO), Spectrum::new(0.8));
    }
}
