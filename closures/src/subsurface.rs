//! Subsurface Scattering

use crate::bsdf::Diffuse;
use crate::common::*;
use pbrt_core::bssrdf::*;
use pbrt_core::geometry::*;
use pbrt_core::math::*;
use pbrt_core::spectrum::*;

/// Radial diffusion profile of a subsurface closure.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum SubsurfaceProfile {
    /// Normalized cubic falloff with a sharpness warp.
    Cubic,

    /// Classical dipole diffusion served from the lookup table.
    Dipole,
}

/// A sampled radius.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SubsurfaceSample {
    /// Distance from the entry point.
    pub r: Float,

    /// Half-length of the probe segment through the disk point.
    pub h: Float,

    /// Colour channel the radius was sampled for.
    pub channel: usize,
}

/// A probe ray through a disk around the entry point. The host traces it
/// against the surface to find exit points.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SubsurfaceProbe {
    /// Point on the tangent disk, relative to the entry point.
    pub disk_point: Vector3f,

    /// Probe origin above the disk, relative to the entry point.
    pub origin: Vector3f,

    /// Probe direction.
    pub direction: Vector3f,

    /// Probe length.
    pub length: Float,

    /// Colour channel the radius was sampled for.
    pub channel: usize,

    /// Distance of the disk point from the entry point.
    pub r: Float,
}

/// BSSRDF closure with a per-channel scattering radius.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SubsurfaceClosure {
    /// Shading normal.
    pub(crate) n: Vector3f,

    /// Scattering radius per channel.
    pub(crate) radius: Spectrum,

    /// Cubic sharpness in [0, 1].
    pub(crate) sharpness: Float,

    /// How much of the albedo texture is applied at entry, in [0, 1].
    pub(crate) texture_blur: Float,

    /// Diffuse albedo in [0, 1].
    pub(crate) albedo: Spectrum,

    profile: SubsurfaceProfile,
}

impl SubsurfaceClosure {
    /// Create a new `SubsurfaceClosure`.
    ///
    /// * `profile`      - Diffusion profile.
    /// * `n`            - Shading normal.
    /// * `radius`       - Scattering radius per channel; clamped to >= 0.
    /// * `sharpness`    - Cubic sharpness; clamped to [0, 1].
    /// * `texture_blur` - Texture blur; clamped to [0, 1].
    /// * `albedo`       - Diffuse albedo; clamped to [0, 1].
    pub fn new(
        profile: SubsurfaceProfile,
        n: Vector3f,
        radius: Spectrum,
        sharpness: Float,
        texture_blur: Float,
        albedo: Spectrum,
    ) -> Self {
        let sharpness = match profile {
            SubsurfaceProfile::Cubic => saturate(sharpness),
            SubsurfaceProfile::Dipole => 0.0,
        };

        Self {
            n: n.safe_normalize(),
            radius: radius.map(|r| max(r, 0.0)),
            sharpness,
            texture_blur: saturate(texture_blur),
            albedo: albedo.clamp(0.0, 1.0),
            profile,
        }
    }

    /// Create a new cubic `SubsurfaceClosure`.
    ///
    /// * `n`            - Shading normal.
    /// * `radius`       - Scattering radius per channel.
    /// * `sharpness`    - Sharpness.
    /// * `texture_blur` - Texture blur.
    /// * `albedo`       - Diffuse albedo.
    pub fn cubic(n: Vector3f, radius: Spectrum, sharpness: Float, texture_blur: Float, albedo: Spectrum) -> Self {
        Self::new(SubsurfaceProfile::Cubic, n, radius, sharpness, texture_blur, albedo)
    }

    /// Create a new dipole `SubsurfaceClosure`.
    ///
    /// * `n`            - Shading normal.
    /// * `radius`       - Mean free path per channel.
    /// * `texture_blur` - Texture blur.
    /// * `albedo`       - Diffuse albedo; selects the dipole table row.
    pub fn dipole(n: Vector3f, radius: Spectrum, texture_blur: Float, albedo: Spectrum) -> Self {
        Self::new(SubsurfaceProfile::Dipole, n, radius, 0.0, texture_blur, albedo)
    }

    /// Returns the diffusion profile.
    pub fn profile(&self) -> SubsurfaceProfile {
        self.profile
    }

    /// Returns the diffuse albedo.
    pub fn albedo(&self) -> Spectrum {
        self.albedo
    }

    /// Returns the closure label.
    pub fn label(&self) -> ClosureLabel {
        ClosureLabel::REFLECT | ClosureLabel::DIFFUSE
    }

    /// Returns true if every radius is too small to scatter. The host then
    /// shades with `as_diffuse()` instead.
    pub fn is_diffuse(&self) -> bool {
        self.channels().next().is_none()
    }

    /// Returns the diffuse fallback closure.
    pub fn as_diffuse(&self) -> Diffuse {
        Diffuse::new(self.n)
    }

    /// Returns the channels with a radius large enough to scatter.
    pub fn channels(&self) -> impl Iterator<Item = usize> + '_ {
        (0..RGB_SAMPLES).filter(move |&c| self.radius[c] >= BSSRDF_MIN_RADIUS)
    }

    /// Returns the largest distance a channel scatters to.
    ///
    /// * `channel` - Colour channel.
    pub fn max_radius(&self, channel: usize) -> Float {
        let r = self.radius[channel];
        match self.profile {
            SubsurfaceProfile::Cubic => r * (1.0 + self.sharpness),
            SubsurfaceProfile::Dipole => r * BSSRDF_DIPOLE_MAX_RADIUS,
        }
    }

    /// Returns the normalized area density of one channel at distance `r`.
    fn density(&self, channel: usize, r: Float) -> Float {
        let radius = self.radius[channel];
        if radius < BSSRDF_MIN_RADIUS {
            return 0.0;
        }

        match self.profile {
            SubsurfaceProfile::Cubic => bssrdf_cubic(radius, self.sharpness, r),
            SubsurfaceProfile::Dipole => {
                BSSRDF_LOOKUP_TABLE.area_pdf(self.albedo[channel], r / radius) / (radius * radius)
            }
        }
    }

    /// Evaluates the albedo weighted profile at distance `r`.
    ///
    /// * `r` - Distance from the entry point.
    pub fn eval(&self, r: Float) -> Spectrum {
        let mut out = Spectrum::ZERO;
        for c in self.channels() {
            out[c] = self.albedo[c] * self.density(c, r);
        }
        out
    }

    /// Returns the area density of `sample()` at distance `r`, averaged over
    /// the scattering channels.
    ///
    /// * `r` - Distance from the entry point.
    pub fn pdf(&self, r: Float) -> Float {
        let (sum, count) = self
            .channels()
            .fold((0.0, 0), |(sum, count), c| (sum + self.density(c, r), count + 1));

        if count > 0 {
            sum / count as Float
        } else {
            0.0
        }
    }

    /// Picks a scattering channel uniformly and returns it along with the
    /// rescaled random value.
    fn pick_channel(&self, u: Float) -> Option<(usize, Float)> {
        let count = self.channels().count();
        if count == 0 {
            return None;
        }

        let n = count as Float;
        let i = min((saturate(u) * n) as usize, count - 1);
        let remainder = saturate(u * n - i as Float);
        self.channels().nth(i).map(|c| (c, remainder))
    }

    fn sample_channel(&self, channel: usize, u: Float) -> SubsurfaceSample {
        let radius = self.radius[channel];
        let (r, h) = match self.profile {
            SubsurfaceProfile::Cubic => bssrdf_cubic_sample(radius, self.sharpness, u),
            SubsurfaceProfile::Dipole => {
                let r = BSSRDF_LOOKUP_TABLE.row(self.albedo[channel]).sample(u) * radius;
                let rm = BSSRDF_DIPOLE_MAX_RADIUS * radius;
                (r, safe_sqrt(rm * rm - r * r))
            }
        };

        SubsurfaceSample { r, h, channel }
    }

    /// Samples a distance from the entry point. Returns `None` when no
    /// channel scatters.
    ///
    /// * `u_channel` - Uniform random value selecting the channel.
    /// * `u_radius`  - Uniform random value selecting the distance.
    pub fn sample(&self, u_channel: Float, u_radius: Float) -> Option<SubsurfaceSample> {
        self.pick_channel(u_channel)
            .map(|(channel, _)| self.sample_channel(channel, u_radius))
    }

    /// Samples a probe ray through a disk in the tangent plane. Returns `None`
    /// when no channel scatters.
    ///
    /// * `u` - Uniform random value selecting the channel and the azimuth.
    /// * `v` - Uniform random value selecting the distance.
    pub fn probe(&self, u: Float, v: Float) -> Option<SubsurfaceProbe> {
        let (channel, u_phi) = self.pick_channel(u)?;
        let s = self.sample_channel(channel, v);

        let (x, y) = coordinate_system(&self.n);
        let phi = TWO_PI * u_phi;
        let disk_point = s.r * (phi.cos() * x + phi.sin() * y);

        Some(SubsurfaceProbe {
            disk_point,
            origin: disk_point + s.h * self.n,
            direction: -self.n,
            length: 2.0 * s.h,
            channel,
            r: s.r,
        })
    }

    /// Returns the albedo factor applied where light enters.
    pub fn entry_weight(&self) -> Spectrum {
        let blur = self.texture_blur;
        self.albedo.map(|a| a.powf(blur))
    }

    /// Returns the albedo factor applied where light exits.
    pub fn exit_weight(&self) -> Spectrum {
        let blur = 1.0 - self.texture_blur;
        self.albedo.map(|a| a.powf(blur))
    }
}
