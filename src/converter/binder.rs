//! Per-frame texture binding and uniform upload.

use super::program::{Generation, LinkedProgram};
use super::ConverterDescriptor;
use crate::cms::{ColorManagement, UniformValue};
use crate::error::{ConverterError, Result};
use crate::gl::{GlApi, NO_ERROR, TEXTURE0};
use tracing::{debug, trace, warn};

/// One plane of the frame being drawn.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaneTexture<T> {
    pub texture: T,
    /// Texture width in texels
    pub width: u32,
    /// Texture height in texels
    pub height: u32,
}

impl<T> PlaneTexture<T> {
    pub fn new(texture: T, width: u32, height: u32) -> Self {
        Self {
            texture,
            width,
            height,
        }
    }
}

/// Inputs of a single bind. Built fresh for each displayed frame.
#[derive(Debug, Clone, Copy)]
pub struct FrameBinding<'a, T> {
    /// Program the frame was prepared against.
    pub generation: Generation,
    pub planes: &'a [PlaneTexture<T>],
    /// Global opacity, clamped to `[0, 1]`.
    pub alpha: f32,
}

impl<'a, T> FrameBinding<'a, T> {
    pub fn new(generation: Generation, planes: &'a [PlaneTexture<T>], alpha: f32) -> Self {
        Self {
            generation,
            planes,
            alpha,
        }
    }
}

/// Upper bound on flags drained per query; a lost context may report errors forever.
const MAX_ERROR_FLAGS: usize = 16;

/// Clears every pending error flag and returns them oldest first.
fn drain_errors<G: GlApi>(gl: &G) -> Vec<u32> {
    let mut codes = Vec::new();
    while codes.len() < MAX_ERROR_FLAGS {
        match gl.error() {
            NO_ERROR => break,
            code => codes.push(code),
        }
    }
    codes
}

fn upload<G: GlApi>(gl: &G, location: &G::UniformLocation, value: UniformValue) {
    match value {
        UniformValue::Float(x) => gl.uniform_1_f32(location, x),
        UniformValue::Vec2([x, y]) => gl.uniform_2_f32(location, x, y),
        UniformValue::Vec3([x, y, z]) => gl.uniform_3_f32(location, x, y, z),
        UniformValue::Vec4([x, y, z, w]) => gl.uniform_4_f32(location, x, y, z, w),
        UniformValue::Int(x) => gl.uniform_1_i32(location, x),
        UniformValue::Mat2(m) => gl.uniform_matrix_2_f32(location, &m),
        UniformValue::Mat3(m) => gl.uniform_matrix_3_f32(location, &m),
        UniformValue::Mat4(m) => gl.uniform_matrix_4_f32(location, &m),
    }
}

/// Binds the frame's textures and writes uniform state for `linked`.
///
/// The program must already be current. Never links or looks up locations.
pub(crate) fn bind_frame<G: GlApi>(
    gl: &G,
    desc: &ConverterDescriptor,
    linked: &LinkedProgram<G>,
    cms: &dyn ColorManagement,
    frame: &FrameBinding<'_, G::Texture>,
) -> Result<()> {
    if frame.generation != linked.generation {
        return Err(ConverterError::StaleProgram {
            frame: frame.generation,
            active: linked.generation,
        });
    }
    if frame.planes.len() != desc.plane_count {
        return Err(ConverterError::PlaneCountMismatch {
            expected: desc.plane_count,
            got: frame.planes.len(),
        });
    }

    let stale = drain_errors(gl);
    if !stale.is_empty() {
        debug!("Discarding GL errors raised before bind: {:x?}", stale);
    }

    let loc = &linked.locations;
    for (unit, (plane, sampler)) in frame.planes.iter().zip(&loc.textures).enumerate() {
        gl.active_texture(TEXTURE0 + unit as u32);
        gl.bind_texture(desc.format.target, plane.texture);
        gl.uniform_1_i32(sampler, unit as i32);
    }

    if let Some(sizes) = &loc.texture_sizes {
        for (plane, size) in frame.planes.iter().zip(sizes) {
            gl.uniform_2_f32(size, plane.width as f32, plane.height as f32);
        }
    }

    if let (Some(location), Some(matrix)) = (&loc.coefficients, desc.color_transform.matrix()) {
        gl.uniform_matrix_4_f32(location, matrix.as_slice());
    }

    if let Some(location) = &loc.fill_color {
        gl.uniform_4_f32(location, 1.0, 1.0, 1.0, frame.alpha.clamp(0.0, 1.0));
    }

    let variables = cms.variables();
    for (index, location) in loc.cm_variables.iter().enumerate() {
        let (Some(location), Some(variable)) = (location, variables.get(index)) else {
            continue;
        };
        match cms.value(index) {
            Some(value) if value.kind() == variable.kind => upload(gl, location, value),
            Some(value) => warn!(
                "Color-management uniform `{}` declared as {:?} but got {:?}, skipped",
                variable.name,
                variable.kind,
                value.kind()
            ),
            None => trace!("No value for color-management uniform `{}`", variable.name),
        }
    }

    match drain_errors(gl).first() {
        None => Ok(()),
        Some(&code) => Err(ConverterError::Gl(code)),
    }
}
