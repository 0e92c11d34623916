//! [`GlApi`] over a `glow` context.

use super::{GlApi, ShaderStage};
use crate::format::TextureTarget;
use glow::HasContext;

type Ctx = glow::Context;

/// Function table backed by [`glow::Context`].
pub struct GlowApi {
    gl: Ctx,
    // Raw GL is bound to the thread owning the context.
    _not_send: std::marker::PhantomData<*const ()>,
}

impl GlowApi {
    /// Wraps a loaded context.
    ///
    /// # Safety
    ///
    /// `gl` must stay current on the calling thread for as long as the
    /// returned value, or anything built from it, is used.
    pub unsafe fn new(gl: Ctx) -> Self {
        Self {
            gl,
            _not_send: std::marker::PhantomData,
        }
    }

    pub fn context(&self) -> &Ctx {
        &self.gl
    }
}

impl GlApi for GlowApi {
    type Shader = <Ctx as HasContext>::Shader;
    type Program = <Ctx as HasContext>::Program;
    type Texture = <Ctx as HasContext>::Texture;
    type UniformLocation = <Ctx as HasContext>::UniformLocation;

    fn create_shader(&self, stage: ShaderStage) -> Result<Self::Shader, String> {
        unsafe { self.gl.create_shader(stage.gl_enum()) }
    }

    fn shader_source(&self, shader: Self::Shader, source: &str) {
        unsafe { self.gl.shader_source(shader, source) }
    }

    fn compile_shader(&self, shader: Self::Shader) {
        unsafe { self.gl.compile_shader(shader) }
    }

    fn shader_compile_status(&self, shader: Self::Shader) -> bool {
        unsafe { self.gl.get_shader_compile_status(shader) }
    }

    fn shader_info_log(&self, shader: Self::Shader) -> String {
        unsafe { self.gl.get_shader_info_log(shader) }
    }

    fn delete_shader(&self, shader: Self::Shader) {
        unsafe { self.gl.delete_shader(shader) }
    }

    fn create_program(&self) -> Result<Self::Program, String> {
        unsafe { self.gl.create_program() }
    }

    fn attach_shader(&self, program: Self::Program, shader: Self::Shader) {
        unsafe { self.gl.attach_shader(program, shader) }
    }

    fn detach_shader(&self, program: Self::Program, shader: Self::Shader) {
        unsafe { self.gl.detach_shader(program, shader) }
    }

    fn link_program(&self, program: Self::Program) {
        unsafe { self.gl.link_program(program) }
    }

    fn program_link_status(&self, program: Self::Program) -> bool {
        unsafe { self.gl.get_program_link_status(program) }
    }

    fn program_info_log(&self, program: Self::Program) -> String {
        unsafe { self.gl.get_program_info_log(program) }
    }

    fn delete_program(&self, program: Self::Program) {
        unsafe { self.gl.delete_program(program) }
    }

    fn uniform_location(
        &self,
        program: Self::Program,
        name: &str,
    ) -> Option<Self::UniformLocation> {
        unsafe { self.gl.get_uniform_location(program, name) }
    }

    fn active_texture(&self, unit: u32) {
        unsafe { self.gl.active_texture(unit) }
    }

    fn bind_texture(&self, target: TextureTarget, texture: Self::Texture) {
        unsafe { self.gl.bind_texture(target.gl_enum(), Some(texture)) }
    }

    fn uniform_1_i32(&self, location: &Self::UniformLocation, x: i32) {
        unsafe { self.gl.uniform_1_i32(Some(location), x) }
    }

    fn uniform_1_f32(&self, location: &Self::UniformLocation, x: f32) {
        unsafe { self.gl.uniform_1_f32(Some(location), x) }
    }

    fn uniform_2_f32(&self, location: &Self::UniformLocation, x: f32, y: f32) {
        unsafe { self.gl.uniform_2_f32(Some(location), x, y) }
    }

    fn uniform_3_f32(&self, location: &Self::UniformLocation, x: f32, y: f32, z: f32) {
        unsafe { self.gl.uniform_3_f32(Some(location), x, y, z) }
    }

    fn uniform_4_f32(&self, location: &Self::UniformLocation, x: f32, y: f32, z: f32, w: f32) {
        unsafe { self.gl.uniform_4_f32(Some(location), x, y, z, w) }
    }

    fn uniform_matrix_2_f32(&self, location: &Self::UniformLocation, v: &[f32]) {
        unsafe { self.gl.uniform_matrix_2_f32_slice(Some(location), false, v) }
    }

    fn uniform_matrix_3_f32(&self, location: &Self::UniformLocation, v: &[f32]) {
        unsafe { self.gl.uniform_matrix_3_f32_slice(Some(location), false, v) }
    }

    fn uniform_matrix_4_f32(&self, location: &Self::UniformLocation, v: &[f32]) {
        unsafe { self.gl.uniform_matrix_4_f32_slice(Some(location), false, v) }
    }

    fn error(&self) -> u32 {
        unsafe { self.gl.get_error() }
    }
}
