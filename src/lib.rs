//! texconv: GPU texture converters for video display.
//!
//! Picks a shader strategy for each decoded picture format, links it once and
//! binds per-frame state so the fragment stage emits linear RGBA.

pub mod cms;
pub mod color;
pub mod config;
pub mod converter;
pub mod error;
pub mod format;
pub mod gl;
pub mod pipeline;
pub mod shader;

pub use cms::{ColorManagement, NoColorManagement, StaticColorManagement};
pub use config::ConverterConfig;
pub use converter::{
    Converter, ConverterContext, ConverterDescriptor, FrameBinding, Generation, PlaneTexture,
};
pub use error::{ConverterError, ErrorKind, Result};
pub use format::{Chroma, ColorSpace, TextureTarget, VideoFormat};
pub use gl::GlApi;
#[cfg(feature = "glow")]
pub use gl::GlowApi;
pub use pipeline::GlPipeline;
pub use shader::GlslVersion;
