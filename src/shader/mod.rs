//! GLSL generation for texture converters.

pub mod assemble;
pub mod fragment;
pub mod vertex;

pub use assemble::assemble_fragment;
pub use fragment::FormatFamily;
pub use vertex::default_vertex_source;

use crate::error::{ConverterError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Uniform holding the YUV to RGB matrix.
pub const COEFFICIENTS: &str = "Coefficients";
/// Uniform holding `(1, 1, 1, alpha)`.
pub const FILL_COLOR: &str = "FillColor";
/// Varying carrying normalized texture coordinates from the vertex stage.
pub const TEX_COORD: &str = "TexCoord";

/// Sampler uniform of plane `i`.
pub fn texture_name(plane: usize) -> String {
    format!("Texture{plane}")
}

/// Texel size uniform of plane `i`.
pub fn texture_size_name(plane: usize) -> String {
    format!("TexSize{plane}")
}

/// The two shading-language dialects converters generate code for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum GlslVersion {
    /// GLSL ES 1.00; has no default float precision in fragment shaders.
    Es100,
    /// Desktop GLSL 1.20.
    Desktop120,
}

impl GlslVersion {
    pub fn from_number(version: u32) -> Result<Self> {
        match version {
            100 => Ok(GlslVersion::Es100),
            120 => Ok(GlslVersion::Desktop120),
            other => Err(ConverterError::UnsupportedGlslVersion(other)),
        }
    }

    pub fn number(&self) -> u32 {
        match self {
            GlslVersion::Es100 => 100,
            GlslVersion::Desktop120 => 120,
        }
    }

    pub fn is_es(&self) -> bool {
        matches!(self, GlslVersion::Es100)
    }

    /// Header used when the caller does not supply one.
    pub fn default_precision_header(&self) -> &'static str {
        match self {
            GlslVersion::Es100 => "#ifdef GL_ES\nprecision highp float;\n#endif\n",
            GlslVersion::Desktop120 => "",
        }
    }
}

impl TryFrom<u32> for GlslVersion {
    type Error = ConverterError;

    fn try_from(version: u32) -> Result<Self> {
        Self::from_number(version)
    }
}

impl From<GlslVersion> for u32 {
    fn from(version: GlslVersion) -> u32 {
        version.number()
    }
}

impl fmt::Display for GlslVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GlslVersion::Es100 => f.write_str("GLSL ES 1.00"),
            GlslVersion::Desktop120 => f.write_str("GLSL 1.20"),
        }
    }
}
