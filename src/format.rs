//! Pixel formats, texture targets and plane geometry.

use crate::error::ConverterError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Maximum number of textures a single frame may span.
pub const MAX_PLANES: usize = 4;

/// Pixel layouts a converter can be selected for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Chroma {
    /// 8-bit YUV 4:2:0, three planes (Y, U, V)
    I420,
    /// 8-bit YUV 4:2:0, three planes (Y, V, U)
    Yv12,
    /// 8-bit YUV 4:2:2, three planes
    I422,
    /// 8-bit YUV 4:4:4, three planes
    I444,
    /// 10-bit YUV 4:2:0 stored in the low bits of 16-bit samples
    I420P10,
    /// Y plane + interleaved UV plane
    Nv12,
    /// Y plane + interleaved VU plane
    Nv21,
    /// 10-bit NV12 stored in the high bits of 16-bit samples
    P010,
    /// Packed 4:2:2 (Y0 U0 Y1 V0)
    Yuyv,
    /// Packed 4:2:2 (U0 Y0 V0 Y1)
    Uyvy,
    /// Luma only
    Grey,
    /// RGBA with 8 bits per channel
    Rgba,
    /// BGRA with 8 bits per channel
    Bgra,
    /// RGB with an ignored fourth byte
    Rgbx,
    /// RGB with 8 bits per channel (24 bits per pixel)
    Rgb24,
    /// Opaque hardware surface exported as an external texture
    Surface,
}

/// Per-plane layout relative to the frame size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlaneLayout {
    /// Horizontal pixels per texel
    pub w_div: u32,
    /// Vertical pixels per texel
    pub h_div: u32,
    /// Components stored per texel
    pub components: u32,
    /// Bytes per component
    pub bytes_per_component: u32,
}

impl PlaneLayout {
    const fn new(w_div: u32, h_div: u32, components: u32, bytes_per_component: u32) -> Self {
        Self {
            w_div,
            h_div,
            components,
            bytes_per_component,
        }
    }

    /// Bytes per texel of this plane.
    pub fn bytes_per_texel(&self) -> u32 {
        self.components * self.bytes_per_component
    }
}

const PLANAR_420: &[PlaneLayout] = &[
    PlaneLayout::new(1, 1, 1, 1),
    PlaneLayout::new(2, 2, 1, 1),
    PlaneLayout::new(2, 2, 1, 1),
];
const PLANAR_422: &[PlaneLayout] = &[
    PlaneLayout::new(1, 1, 1, 1),
    PlaneLayout::new(2, 1, 1, 1),
    PlaneLayout::new(2, 1, 1, 1),
];
const PLANAR_444: &[PlaneLayout] = &[
    PlaneLayout::new(1, 1, 1, 1),
    PlaneLayout::new(1, 1, 1, 1),
    PlaneLayout::new(1, 1, 1, 1),
];
const PLANAR_420_16: &[PlaneLayout] = &[
    PlaneLayout::new(1, 1, 1, 2),
    PlaneLayout::new(2, 2, 1, 2),
    PlaneLayout::new(2, 2, 1, 2),
];
const SEMI_PLANAR_420: &[PlaneLayout] =
    &[PlaneLayout::new(1, 1, 1, 1), PlaneLayout::new(2, 2, 2, 1)];
const SEMI_PLANAR_420_16: &[PlaneLayout] =
    &[PlaneLayout::new(1, 1, 1, 2), PlaneLayout::new(2, 2, 2, 2)];
// Two pixels per RGBA texel
const PACKED_422: &[PlaneLayout] = &[PlaneLayout::new(2, 1, 4, 1)];
const GREY: &[PlaneLayout] = &[PlaneLayout::new(1, 1, 1, 1)];
const RGBA: &[PlaneLayout] = &[PlaneLayout::new(1, 1, 4, 1)];
const RGB24: &[PlaneLayout] = &[PlaneLayout::new(1, 1, 3, 1)];

impl Chroma {
    /// Every chroma with a registered converter.
    pub const ALL: &'static [Chroma] = &[
        Chroma::I420,
        Chroma::Yv12,
        Chroma::I422,
        Chroma::I444,
        Chroma::I420P10,
        Chroma::Nv12,
        Chroma::Nv21,
        Chroma::P010,
        Chroma::Yuyv,
        Chroma::Uyvy,
        Chroma::Grey,
        Chroma::Rgba,
        Chroma::Bgra,
        Chroma::Rgbx,
        Chroma::Rgb24,
        Chroma::Surface,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Chroma::I420 => "i420",
            Chroma::Yv12 => "yv12",
            Chroma::I422 => "i422",
            Chroma::I444 => "i444",
            Chroma::I420P10 => "i420p10",
            Chroma::Nv12 => "nv12",
            Chroma::Nv21 => "nv21",
            Chroma::P010 => "p010",
            Chroma::Yuyv => "yuyv",
            Chroma::Uyvy => "uyvy",
            Chroma::Grey => "grey",
            Chroma::Rgba => "rgba",
            Chroma::Bgra => "bgra",
            Chroma::Rgbx => "rgbx",
            Chroma::Rgb24 => "rgb24",
            Chroma::Surface => "surface",
        }
    }

    /// Texture layout of each plane, in upload order.
    ///
    /// Two-component planes are expected as luminance-alpha textures (first
    /// component in `r`, second in `a`). Packed 4:2:2 is uploaded as RGBA at
    /// half the frame width.
    pub fn planes(&self) -> &'static [PlaneLayout] {
        match self {
            Chroma::I420 | Chroma::Yv12 => PLANAR_420,
            Chroma::I422 => PLANAR_422,
            Chroma::I444 => PLANAR_444,
            Chroma::I420P10 => PLANAR_420_16,
            Chroma::Nv12 | Chroma::Nv21 => SEMI_PLANAR_420,
            Chroma::P010 => SEMI_PLANAR_420_16,
            Chroma::Yuyv | Chroma::Uyvy => PACKED_422,
            Chroma::Grey => GREY,
            Chroma::Rgba | Chroma::Bgra | Chroma::Rgbx | Chroma::Surface => RGBA,
            Chroma::Rgb24 => RGB24,
        }
    }

    pub fn plane_count(&self) -> usize {
        self.planes().len()
    }

    /// Texture size in texels of every plane for a frame of `width` x `height` pixels.
    /// Odd dimensions round up so the last column/row of chroma is kept.
    pub fn plane_sizes(&self, width: u32, height: u32) -> Vec<(u32, u32)> {
        self.planes()
            .iter()
            .map(|p| (width.div_ceil(p.w_div), height.div_ceil(p.h_div)))
            .collect()
    }
}

impl fmt::Display for Chroma {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Chroma {
    type Err = ConverterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_ascii_lowercase();
        let alias = match lower.as_str() {
            "gray" | "y8" => "grey",
            "rgb32" => "rgbx",
            "i420_10l" => "i420p10",
            other => other,
        };
        Chroma::ALL
            .iter()
            .copied()
            .find(|c| c.name() == alias)
            .ok_or_else(|| ConverterError::UnsupportedFormat(s.to_string()))
    }
}

/// YUV matrix coefficients standard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorSpace {
    Bt601,
    #[default]
    Bt709,
    Bt2020,
}

impl ColorSpace {
    /// Luma weights (Kr, Kb) of the standard.
    pub fn luma_weights(&self) -> (f32, f32) {
        match self {
            ColorSpace::Bt601 => (0.299, 0.114),
            ColorSpace::Bt709 => (0.2126, 0.0722),
            ColorSpace::Bt2020 => (0.2627, 0.0593),
        }
    }
}

/// Texture target the planes are bound to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextureTarget {
    /// Normalized coordinates
    #[default]
    Texture2D,
    /// Texel coordinates, desktop GL only
    Rectangle,
    /// Hardware surface imported through `GL_OES_EGL_image_external`
    ExternalOes,
}

impl TextureTarget {
    pub fn gl_enum(&self) -> u32 {
        match self {
            TextureTarget::Texture2D => 0x0DE1,
            TextureTarget::Rectangle => 0x84F5,
            TextureTarget::ExternalOes => 0x8D65,
        }
    }
}

/// Everything that identifies a frame layout for converter selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VideoFormat {
    pub chroma: Chroma,
    #[serde(default)]
    pub space: ColorSpace,
    #[serde(default)]
    pub full_range: bool,
    #[serde(default)]
    pub target: TextureTarget,
}

impl VideoFormat {
    /// Studio-range BT.709 on 2D textures, or an external texture for [`Chroma::Surface`].
    pub fn new(chroma: Chroma) -> Self {
        let target = if chroma == Chroma::Surface {
            TextureTarget::ExternalOes
        } else {
            TextureTarget::Texture2D
        };
        Self {
            chroma,
            space: ColorSpace::default(),
            full_range: false,
            target,
        }
    }

    pub fn with_space(mut self, space: ColorSpace) -> Self {
        self.space = space;
        self
    }

    pub fn with_full_range(mut self, full_range: bool) -> Self {
        self.full_range = full_range;
        self
    }

    pub fn with_target(mut self, target: TextureTarget) -> Self {
        self.target = target;
        self
    }
}

impl fmt::Display for VideoFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({:?}, {} range, {:?})",
            self.chroma,
            self.space,
            if self.full_range { "full" } else { "studio" },
            self.target
        )
    }
}
