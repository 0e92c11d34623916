//! Error types for converter selection, linking and frame binding.

use crate::converter::Generation;
use crate::format::{Chroma, TextureTarget};
use crate::gl::ShaderStage;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ConverterError>;

/// How the caller is expected to react to a [`ConverterError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The requested format or dialect cannot be served. No state was created.
    Configuration,
    /// Compilation, linking or location resolution failed. The converter is
    /// unusable; pick another one or abort setup.
    Link,
    /// The current frame could not be bound and must be skipped. Later frames
    /// may still succeed.
    FrameDropped,
}

#[derive(Debug, Clone, Error)]
pub enum ConverterError {
    #[error("unsupported format `{0}`")]
    UnsupportedFormat(String),

    #[error("unsupported GLSL version {0} (expected 100 or 120)")]
    UnsupportedGlslVersion(u32),

    #[error("{chroma} cannot be sampled from a {target:?} texture with this GLSL dialect")]
    UnsupportedTarget { chroma: Chroma, target: TextureTarget },

    #[error("failed to compile {stage} shader: {log}")]
    Compile { stage: ShaderStage, log: String },

    #[error("failed to link program: {0}")]
    Link(String),

    #[error("uniform `{0}` is not present in the linked program")]
    MissingUniform(String),

    #[error("converter has no linked program")]
    NotLinked,

    #[error("frame prepared for program {frame:?} but {active:?} is active")]
    StaleProgram { frame: Generation, active: Generation },

    #[error("frame has {got} planes, format needs {expected}")]
    PlaneCountMismatch { expected: usize, got: usize },

    #[error("GL error 0x{0:04x} while binding frame")]
    Gl(u32),
}

impl ConverterError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::UnsupportedFormat(_)
            | Self::UnsupportedGlslVersion(_)
            | Self::UnsupportedTarget { .. } => ErrorKind::Configuration,
            Self::Compile { .. } | Self::Link(_) | Self::MissingUniform(_) => ErrorKind::Link,
            Self::NotLinked
            | Self::StaleProgram { .. }
            | Self::PlaneCountMismatch { .. }
            | Self::Gl(_) => ErrorKind::FrameDropped,
        }
    }

    /// True when only the current frame is lost.
    pub fn is_recoverable(&self) -> bool {
        self.kind() == ErrorKind::FrameDropped
    }
}
