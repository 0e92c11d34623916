//! Format-specific sampling code.
//!
//! Each family reads its planes and leaves the raw components in a local
//! `vec4 pixel` (`xyz` = Y/Cb/Cr or R/G/B, `w` = alpha or 1). The YUV matrix
//! is applied afterwards by [`assemble_fragment`](super::assemble_fragment).

use super::{texture_size_name, GlslVersion, TEX_COORD};
use crate::color::lsb_range_correction;
use crate::format::{Chroma, TextureTarget};

/// Chroma neutral level (128 / 255).
const NEUTRAL_CHROMA: &str = "0.50196078";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackedOrder {
    /// Y0 U0 Y1 V0
    Yuyv,
    /// U0 Y0 V0 Y1
    Uyvy,
}

/// Closed set of sampling strategies, one per pixel-format family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatFamily {
    /// Three single-component planes.
    Planar { swap_uv: bool, bits: u8 },
    /// Luma plane plus an interleaved two-component chroma plane.
    SemiPlanar { swap_uv: bool, bits: u8, msb: bool },
    /// 4:2:2 packed in one RGBA texture, two pixels per texel.
    PackedYuv { order: PackedOrder },
    /// Luma only.
    Grey,
    /// Single RGB(A) texture, read through a swizzle.
    PackedRgb { swizzle: &'static str, alpha: bool },
    /// External surface that the interop layer already presents as RGB.
    Passthrough,
}

impl FormatFamily {
    /// Registry of converter families, keyed by chroma.
    pub fn for_chroma(chroma: Chroma) -> Self {
        match chroma {
            Chroma::I420 | Chroma::I422 | Chroma::I444 => FormatFamily::Planar {
                swap_uv: false,
                bits: 8,
            },
            Chroma::Yv12 => FormatFamily::Planar {
                swap_uv: true,
                bits: 8,
            },
            Chroma::I420P10 => FormatFamily::Planar {
                swap_uv: false,
                bits: 10,
            },
            Chroma::Nv12 => FormatFamily::SemiPlanar {
                swap_uv: false,
                bits: 8,
                msb: false,
            },
            Chroma::Nv21 => FormatFamily::SemiPlanar {
                swap_uv: true,
                bits: 8,
                msb: false,
            },
            Chroma::P010 => FormatFamily::SemiPlanar {
                swap_uv: false,
                bits: 10,
                msb: true,
            },
            Chroma::Yuyv => FormatFamily::PackedYuv {
                order: PackedOrder::Yuyv,
            },
            Chroma::Uyvy => FormatFamily::PackedYuv {
                order: PackedOrder::Uyvy,
            },
            Chroma::Grey => FormatFamily::Grey,
            Chroma::Rgba => FormatFamily::PackedRgb {
                swizzle: "rgba",
                alpha: true,
            },
            Chroma::Bgra => FormatFamily::PackedRgb {
                swizzle: "bgra",
                alpha: true,
            },
            Chroma::Rgbx | Chroma::Rgb24 => FormatFamily::PackedRgb {
                swizzle: "rgb",
                alpha: false,
            },
            Chroma::Surface => FormatFamily::Passthrough,
        }
    }

    pub fn plane_count(&self) -> usize {
        match self {
            FormatFamily::Planar { .. } => 3,
            FormatFamily::SemiPlanar { .. } => 2,
            FormatFamily::PackedYuv { .. }
            | FormatFamily::Grey
            | FormatFamily::PackedRgb { .. }
            | FormatFamily::Passthrough => 1,
        }
    }

    pub fn is_yuv(&self) -> bool {
        !matches!(self, FormatFamily::PackedRgb { .. } | FormatFamily::Passthrough)
    }

    /// Whether the format carries an alpha channel, and therefore a `FillColor`.
    pub fn has_alpha(&self) -> bool {
        matches!(self, FormatFamily::PackedRgb { alpha: true, .. })
    }

    /// Packed 4:2:2 needs the texel width to pick the luma sample, whatever
    /// the target.
    pub fn needs_texel_parity(&self) -> bool {
        matches!(self, FormatFamily::PackedYuv { .. })
    }

    /// Scale applied to Y/Cb/Cr for high bit depth stored in the low bits.
    pub fn range_correction(&self) -> f32 {
        match *self {
            FormatFamily::Planar { bits, .. }
            | FormatFamily::SemiPlanar { bits, msb: false, .. } => lsb_range_correction(bits),
            _ => 1.0,
        }
    }

    /// Whether planes of this family can be sampled from `target` in `glsl`.
    pub fn supports(&self, target: TextureTarget, glsl: GlslVersion) -> bool {
        match (self, target) {
            // External images only exist in GLSL ES.
            (FormatFamily::Passthrough, TextureTarget::ExternalOes) => glsl.is_es(),
            (FormatFamily::Passthrough, _) | (_, TextureTarget::ExternalOes) => false,
            (_, TextureTarget::Rectangle) => !glsl.is_es(),
            (_, TextureTarget::Texture2D) => true,
        }
    }

    /// GLSL statements assigning `vec4 pixel`, indented for `main`.
    pub fn sampling_body(&self, sampling: &Sampling) -> String {
        match *self {
            FormatFamily::Planar { swap_uv, .. } => {
                let (u, v) = if swap_uv { (2, 1) } else { (1, 2) };
                format!(
                    "    vec4 pixel = vec4({}.r, {}.r, {}.r, 1.0);\n",
                    sampling.sample(0),
                    sampling.sample(u),
                    sampling.sample(v)
                )
            }
            FormatFamily::SemiPlanar { swap_uv, .. } => {
                let (u, v) = if swap_uv { ("a", "r") } else { ("r", "a") };
                format!(
                    "    vec4 chroma = {};\n    vec4 pixel = vec4({}.r, chroma.{u}, chroma.{v}, 1.0);\n",
                    sampling.sample(1),
                    sampling.sample(0)
                )
            }
            FormatFamily::PackedYuv { order } => {
                let (y0, y1, u, v) = match order {
                    PackedOrder::Yuyv => ("r", "b", "g", "a"),
                    PackedOrder::Uyvy => ("g", "a", "r", "b"),
                };
                format!(
                    "    vec4 texel = {};\n    float odd = step(0.5, fract({}));\n    vec4 pixel = vec4(mix(texel.{y0}, texel.{y1}, odd), texel.{u}, texel.{v}, 1.0);\n",
                    sampling.sample(0),
                    sampling.texel_x(0)
                )
            }
            FormatFamily::Grey => format!(
                "    vec4 pixel = vec4({}.r, {NEUTRAL_CHROMA}, {NEUTRAL_CHROMA}, 1.0);\n",
                sampling.sample(0)
            ),
            FormatFamily::PackedRgb { swizzle, alpha } => {
                if alpha {
                    format!("    vec4 pixel = {}.{swizzle};\n", sampling.sample(0))
                } else {
                    format!("    vec4 pixel = vec4({}.{swizzle}, 1.0);\n", sampling.sample(0))
                }
            }
            FormatFamily::Passthrough => {
                format!("    vec4 pixel = vec4({}.rgb, 1.0);\n", sampling.sample(0))
            }
        }
    }
}

/// Sampler declarations and lookups for a (dialect, target) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sampling {
    pub target: TextureTarget,
    pub glsl: GlslVersion,
}

impl Sampling {
    pub fn new(target: TextureTarget, glsl: GlslVersion) -> Self {
        Self { target, glsl }
    }

    pub fn sampler_type(&self) -> &'static str {
        match self.target {
            TextureTarget::Texture2D => "sampler2D",
            TextureTarget::Rectangle => "sampler2DRect",
            TextureTarget::ExternalOes => "samplerExternalOES",
        }
    }

    pub fn lookup(&self) -> &'static str {
        match self.target {
            TextureTarget::Rectangle => "texture2DRect",
            TextureTarget::Texture2D | TextureTarget::ExternalOes => "texture2D",
        }
    }

    /// `#extension` directive the target requires, if any.
    pub fn extension(&self) -> Option<&'static str> {
        match self.target {
            TextureTarget::Texture2D => None,
            TextureTarget::Rectangle => Some("#extension GL_ARB_texture_rectangle : enable"),
            TextureTarget::ExternalOes => Some("#extension GL_OES_EGL_image_external : require"),
        }
    }

    /// Rectangle textures are addressed in texels.
    pub fn texel_coordinates(&self) -> bool {
        self.target == TextureTarget::Rectangle
    }

    pub fn coords(&self, plane: usize) -> String {
        if self.texel_coordinates() {
            format!("{TEX_COORD} * {}", texture_size_name(plane))
        } else {
            TEX_COORD.to_string()
        }
    }

    pub fn sample(&self, plane: usize) -> String {
        format!("{}(Texture{plane}, {})", self.lookup(), self.coords(plane))
    }

    /// Horizontal texel coordinate of the current fragment in `plane`.
    pub fn texel_x(&self, plane: usize) -> String {
        format!("{TEX_COORD}.x * {}.x", texture_size_name(plane))
    }
}
