//! Surface Scattering Closures

use crate::common::*;
use pbrt_core::geometry::*;
use pbrt_core::math::*;
use pbrt_core::sampling::*;
use pbrt_core::spectrum::*;

mod ashikhmin_velvet;
mod diffuse;
mod microfacet;
mod oren_nayar;
mod phong;
mod specular;
mod ward;
mod westin;

// Re-export
pub use ashikhmin_velvet::*;
pub use diffuse::*;
pub use microfacet::*;
pub use oren_nayar::*;
pub use phong::*;
pub use specular::*;
pub use ward::*;
pub use westin::*;

/// Surface closures.
///
/// Closures are plain values so the enumeration is dispatched with `match`
/// rather than through trait objects.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Bsdf {
    AshikhminVelvet(AshikhminVelvet),
    Diffuse(Diffuse),
    MicrofacetBeckmann(MicrofacetBeckmann),
    MicrofacetGgx(MicrofacetGgx),
    OrenNayar(OrenNayar),
    Phong(Phong),
    PhongRamp(PhongRamp),
    Reflection(Reflection),
    Refraction(Refraction),
    Translucent(Translucent),
    Transparent(Transparent),
    Ward(Ward),
    WestinBackscatter(WestinBackscatter),
    WestinSheen(WestinSheen),
}

impl Bsdf {
    /// Returns the registry name of the closure.
    pub fn name(&self) -> &'static str {
        match self {
            Bsdf::AshikhminVelvet(_) => "ashikhmin_velvet",
            Bsdf::Diffuse(_) => "diffuse",
            Bsdf::MicrofacetBeckmann(c) => match c.mode() {
                MicrofacetMode::Reflect => "microfacet_beckmann",
                MicrofacetMode::Refract => "microfacet_beckmann_refraction",
            },
            Bsdf::MicrofacetGgx(c) => match c.mode() {
                MicrofacetMode::Reflect => "microfacet_ggx",
                MicrofacetMode::Refract => "microfacet_ggx_refraction",
            },
            Bsdf::OrenNayar(_) => "oren_nayar",
            Bsdf::Phong(_) => "phong",
            Bsdf::PhongRamp(_) => "phong_ramp",
            Bsdf::Reflection(_) => "reflection",
            Bsdf::Refraction(_) => "refraction",
            Bsdf::Translucent(_) => "translucent",
            Bsdf::Transparent(_) => "transparent",
            Bsdf::Ward(_) => "ward",
            Bsdf::WestinBackscatter(_) => "westin_backscatter",
            Bsdf::WestinSheen(_) => "westin_sheen",
        }
    }

    /// Returns the closure label.
    pub fn label(&self) -> ClosureLabel {
        match self {
            Bsdf::AshikhminVelvet(c) => c.label(),
            Bsdf::Diffuse(c) => c.label(),
            Bsdf::MicrofacetBeckmann(c) => c.label(),
            Bsdf::MicrofacetGgx(c) => c.label(),
            Bsdf::OrenNayar(c) => c.label(),
            Bsdf::Phong(c) => c.label(),
            Bsdf::PhongRamp(c) => c.label(),
            Bsdf::Reflection(c) => c.label(),
            Bsdf::Refraction(c) => c.label(),
            Bsdf::Translucent(c) => c.label(),
            Bsdf::Transparent(c) => c.label(),
            Bsdf::Ward(c) => c.label(),
            Bsdf::WestinBackscatter(c) => c.label(),
            Bsdf::WestinSheen(c) => c.label(),
        }
    }

    /// Returns the shading normal. `Transparent` has none.
    pub fn normal(&self) -> Option<Vector3f> {
        match self {
            Bsdf::AshikhminVelvet(c) => Some(c.n),
            Bsdf::Diffuse(c) => Some(c.n),
            Bsdf::MicrofacetBeckmann(c) => Some(c.n),
            Bsdf::MicrofacetGgx(c) => Some(c.n),
            Bsdf::OrenNayar(c) => Some(c.n),
            Bsdf::Phong(c) => Some(c.n),
            Bsdf::PhongRamp(c) => Some(c.n),
            Bsdf::Reflection(c) => Some(c.n),
            Bsdf::Refraction(c) => Some(c.n),
            Bsdf::Translucent(c) => Some(c.n),
            Bsdf::Transparent(_) => None,
            Bsdf::Ward(c) => Some(c.n),
            Bsdf::WestinBackscatter(c) => Some(c.n),
            Bsdf::WestinSheen(c) => Some(c.n),
        }
    }

    /// Returns true if the closure only produces singular samples.
    pub fn is_singular(&self) -> bool {
        self.label()
            .intersects(ClosureLabel::SINGULAR | ClosureLabel::TRANSPARENT)
    }

    /// Evaluates reflection for a pair of directions. Singular closures
    /// return zero.
    ///
    /// * `omega_out` - Direction towards the viewer.
    /// * `omega_in`  - Direction towards the light.
    pub fn eval_reflect(&self, omega_out: &Vector3f, omega_in: &Vector3f) -> BsdfEval {
        match self {
            Bsdf::AshikhminVelvet(c) => c.eval_reflect(omega_out, omega_in),
            Bsdf::Diffuse(c) => c.eval_reflect(omega_out, omega_in),
            Bsdf::MicrofacetBeckmann(c) => c.eval_reflect(omega_out, omega_in),
            Bsdf::MicrofacetGgx(c) => c.eval_reflect(omega_out, omega_in),
            Bsdf::OrenNayar(c) => c.eval_reflect(omega_out, omega_in),
            Bsdf::Phong(c) => c.eval_reflect(omega_out, omega_in),
            Bsdf::PhongRamp(c) => c.eval_reflect(omega_out, omega_in),
            Bsdf::Ward(c) => c.eval_reflect(omega_out, omega_in),
            Bsdf::WestinBackscatter(c) => c.eval_reflect(omega_out, omega_in),
            Bsdf::WestinSheen(c) => c.eval_reflect(omega_out, omega_in),
            Bsdf::Reflection(_)
            | Bsdf::Refraction(_)
            | Bsdf::Translucent(_)
            | Bsdf::Transparent(_) => BsdfEval::ZERO,
        }
    }

    /// Evaluates transmission for a pair of directions. Singular closures
    /// return zero.
    ///
    /// * `omega_out` - Direction towards the viewer.
    /// * `omega_in`  - Direction towards the light.
    pub fn eval_transmit(&self, omega_out: &Vector3f, omega_in: &Vector3f) -> BsdfEval {
        match self {
            Bsdf::MicrofacetBeckmann(c) => c.eval_transmit(omega_out, omega_in),
            Bsdf::MicrofacetGgx(c) => c.eval_transmit(omega_out, omega_in),
            Bsdf::Translucent(c) => c.eval_transmit(omega_out, omega_in),
            _ => BsdfEval::ZERO,
        }
    }

    /// Evaluates whichever of reflection or transmission applies to the
    /// hemisphere `omega_in` lies in.
    ///
    /// * `omega_out` - Direction towards the viewer.
    /// * `omega_in`  - Direction towards the light.
    /// * `ng`        - Geometric normal.
    pub fn eval(&self, omega_out: &Vector3f, omega_in: &Vector3f, ng: &Vector3f) -> BsdfEval {
        if ng.dot(omega_in) * ng.dot(omega_out) > 0.0 {
            self.eval_reflect(omega_out, omega_in)
        } else {
            self.eval_transmit(omega_out, omega_in)
        }
    }

    /// Importance samples an incident direction.
    ///
    /// * `sp` - Shading point.
    /// * `u`  - Uniform random sample.
    pub fn sample(&self, sp: &ShadingPoint, u: &Point2f) -> BsdfSample {
        match self {
            Bsdf::AshikhminVelvet(c) => c.sample(sp, u),
            Bsdf::Diffuse(c) => c.sample(sp, u),
            Bsdf::MicrofacetBeckmann(c) => c.sample(sp, u),
            Bsdf::MicrofacetGgx(c) => c.sample(sp, u),
            Bsdf::OrenNayar(c) => c.sample(sp, u),
            Bsdf::Phong(c) => c.sample(sp, u),
            Bsdf::PhongRamp(c) => c.sample(sp, u),
            Bsdf::Reflection(c) => c.sample(sp),
            Bsdf::Refraction(c) => c.sample(sp),
            Bsdf::Translucent(c) => c.sample(sp, u),
            Bsdf::Transparent(c) => c.sample(sp),
            Bsdf::Ward(c) => c.sample(sp, u),
            Bsdf::WestinBackscatter(c) => c.sample(sp, u),
            Bsdf::WestinSheen(c) => c.sample(sp, u),
        }
    }

    /// Returns the nominal albedo: the ramp mean for `PhongRamp` and 1 for
    /// every other closure.
    pub fn albedo(&self) -> Spectrum {
        match self {
            Bsdf::PhongRamp(c) => c.mean_color(),
            _ => Spectrum::ONE,
        }
    }
}

macro_rules! from_closure {
    ($t: ty, $v: ident) => {
        impl From<$t> for Bsdf {
            fn from(c: $t) -> Self {
                Bsdf::$v(c)
            }
        }
    };
}

from_closure!(AshikhminVelvet, AshikhminVelvet);
from_closure!(Diffuse, Diffuse);
from_closure!(MicrofacetBeckmann, MicrofacetBeckmann);
from_closure!(MicrofacetGgx, MicrofacetGgx);
from_closure!(OrenNayar, OrenNayar);
from_closure!(Phong, Phong);
from_closure!(PhongRamp, PhongRamp);
from_closure!(Reflection, Reflection);
from_closure!(Refraction, Refraction);
from_closure!(Translucent, Translucent);
from_closure!(Transparent, Transparent);
from_closure!(Ward, Ward);
from_closure!(WestinBackscatter, WestinBackscatter);
from_closure!(WestinSheen, WestinSheen);
