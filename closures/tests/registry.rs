use closures::closure::*;
use closures::common::*;
use closures::registry::*;
use pbrt_core::geometry::*;
use pbrt_core::paramset::*;
use pbrt_core::spectrum::*;

const NAMES: [&str; 20] = [
    "diffuse",
    "translucent",
    "oren_nayar",
    "reflection",
    "refraction",
    "transparent",
    "microfacet_ggx",
    "microfacet_ggx_refraction",
    "microfacet_beckmann",
    "microfacet_beckmann_refraction",
    "ward",
    "phong",
    "phong_ramp",
    "westin_backscatter",
    "westin_sheen",
    "ashikhmin_velvet",
    "bssrdf_cubic",
    "bssrdf_dipole",
    "isotropic",
    "henyey_greenstein",
];

#[test]
fn every_name_is_registered() {
    let registry = ClosureRegistry::new();
    let names: Vec<&str> = registry.names().collect();
    assert_eq!(names, NAMES.to_vec());

    for name in NAMES {
        let d = registry.get(name).unwrap();
        let c = registry.instantiate(name, &d.default_params()).unwrap();
        assert_eq!(c.name(), name);
    }
}

#[test]
fn instances_with_equal_parameters_merge() {
    let registry = ClosureRegistry::new();

    let mut ps = ParamSet::new();
    ps.add_vector3f("N", &[Vector3f::new(0.0, 1.0, 0.0)]);
    ps.add_float("alpha", &[0.25]);
    let a = registry.instantiate("microfacet_ggx", &ps).unwrap();
    let b = registry.instantiate("microfacet_ggx", &ps).unwrap();
    let c = registry.instantiate("microfacet_beckmann", &ps).unwrap();
    assert!(a.mergeable(&b));
    assert!(!a.mergeable(&c));

    ps.add_float("alpha", &[0.5]);
    let d = registry.instantiate("microfacet_ggx", &ps).unwrap();
    assert!(!a.mergeable(&d));
}

#[test]
fn missing_parameters_are_reported() {
    let registry = ClosureRegistry::new();

    let err = registry.instantiate("ward", &ParamSet::new()).unwrap_err();
    assert!(err.contains("ward"), "{}", err);

    let mut ps = ParamSet::new();
    ps.add_vector3f("N", &[Vector3f::new(0.0, 0.0, 1.0)]);
    assert!(registry.instantiate("diffuse", &ps).is_ok());
    assert!(registry.instantiate("refraction", &ps).is_err());
    assert!(registry.instantiate("bssrdf_cubic", &ps).is_err());
    assert!(registry.instantiate("no_such_closure", &ps).is_err());
}

#[test]
fn optional_parameters_and_labels() {
    let registry = ClosureRegistry::new();
    let d = registry.get("bssrdf_cubic").unwrap();

    let mut ps = d.default_params();
    d.parse_param("albedo", "0.2,0.4,0.6", &mut ps).unwrap();
    d.parse_param("label", "skin", &mut ps).unwrap();
    let c = registry.instantiate("bssrdf_cubic", &ps).unwrap();

    assert_eq!(c.albedo(), Spectrum::from_rgb(0.2, 0.4, 0.6));
    assert_eq!(c.label(), ClosureLabel::REFLECT | ClosureLabel::DIFFUSE);
    assert!(matches!(c, Closure::Bssrdf(_)));
    assert!(ps.unused().is_empty());
}

#[test]
fn volume_closures_have_no_normal() {
    let registry = ClosureRegistry::new();
    let mut ps = ParamSet::new();
    ps.add_float("g", &[0.3]);
    let c = registry.instantiate("henyey_greenstein", &ps).unwrap();
    assert_eq!(c.normal(), None);
    assert_eq!(c.label(), ClosureLabel::VOLUME_SCATTER);
}

#[test]
fn ward_with_default_tangent_along_normal() {
    let registry = ClosureRegistry::new();
    let d = registry.get("ward").unwrap();

    let mut ps = d.default_params();
    d.parse_param("N", "1,0,0", &mut ps).unwrap();
    let c = registry.instantiate("ward", &ps).unwrap();

    let wo = Vector3f::new(0.8, 0.6, 0.0);
    let e = c.eval_reflect(&wo, &Vector3f::new(0.8, -0.6, 0.0));
    assert!(e.value.max_component_value().is_finite());
    assert!(e.pdf.is_finite() && e.pdf > 0.0);

    let sp = ShadingPoint::new(Vector3f::new(1.0, 0.0, 0.0), wo);
    let s = c.sample(&sp, &Point2f::new(0.3, 0.4));
    assert!(s.pdf.is_finite());
    assert!(s.weight().max_component_value().is_finite());
}
