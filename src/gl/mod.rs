//! Graphics function table used by converters.
//!
//! Every call must happen on the thread that owns the current GL context.
//! Implementations are expected to be `!Send`, or to be wrapped in a type
//! that is.

#[cfg(feature = "glow")]
mod glow_backend;
#[cfg(test)]
pub(crate) mod recording;

#[cfg(feature = "glow")]
pub use glow_backend::GlowApi;

use crate::format::TextureTarget;
use std::fmt;

pub const TEXTURE0: u32 = 0x84C0;
pub const NO_ERROR: u32 = 0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl ShaderStage {
    pub fn gl_enum(&self) -> u32 {
        match self {
            ShaderStage::Vertex => 0x8B31,
            ShaderStage::Fragment => 0x8B30,
        }
    }
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShaderStage::Vertex => f.write_str("vertex"),
            ShaderStage::Fragment => f.write_str("fragment"),
        }
    }
}

/// The subset of OpenGL (ES) 2.0 a converter needs.
pub trait GlApi {
    type Shader: Copy + fmt::Debug;
    type Program: Copy + fmt::Debug;
    type Texture: Copy + fmt::Debug;
    type UniformLocation: Clone + fmt::Debug;

    fn create_shader(&self, stage: ShaderStage) -> Result<Self::Shader, String>;
    fn shader_source(&self, shader: Self::Shader, source: &str);
    fn compile_shader(&self, shader: Self::Shader);
    fn shader_compile_status(&self, shader: Self::Shader) -> bool;
    fn shader_info_log(&self, shader: Self::Shader) -> String;
    fn delete_shader(&self, shader: Self::Shader);

    fn create_program(&self) -> Result<Self::Program, String>;
    fn attach_shader(&self, program: Self::Program, shader: Self::Shader);
    fn detach_shader(&self, program: Self::Program, shader: Self::Shader);
    fn link_program(&self, program: Self::Program);
    fn program_link_status(&self, program: Self::Program) -> bool;
    fn program_info_log(&self, program: Self::Program) -> String;
    fn delete_program(&self, program: Self::Program);

    /// `None` when the name is unknown or was optimized out.
    fn uniform_location(
        &self,
        program: Self::Program,
        name: &str,
    ) -> Option<Self::UniformLocation>;

    /// `unit` is the absolute enum, i.e. `TEXTURE0 + n`.
    fn active_texture(&self, unit: u32);
    fn bind_texture(&self, target: TextureTarget, texture: Self::Texture);

    fn uniform_1_i32(&self, location: &Self::UniformLocation, x: i32);
    fn uniform_1_f32(&self, location: &Self::UniformLocation, x: f32);
    fn uniform_2_f32(&self, location: &Self::UniformLocation, x: f32, y: f32);
    fn uniform_3_f32(&self, location: &Self::UniformLocation, x: f32, y: f32, z: f32);
    fn uniform_4_f32(&self, location: &Self::UniformLocation, x: f32, y: f32, z: f32, w: f32);
    /// Column-major, never transposed (GLSL ES 1.00 forbids it).
    fn uniform_matrix_2_f32(&self, location: &Self::UniformLocation, v: &[f32]);
    fn uniform_matrix_3_f32(&self, location: &Self::UniformLocation, v: &[f32]);
    fn uniform_matrix_4_f32(&self, location: &Self::UniformLocation, v: &[f32]);

    /// Pops the oldest recorded error, [`NO_ERROR`] when none.
    fn error(&self) -> u32;
}
