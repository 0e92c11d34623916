//! Program linking and uniform location resolution.

use super::ConverterDescriptor;
use crate::cms::ColorManagement;
use crate::error::{ConverterError, Result};
use crate::gl::{GlApi, ShaderStage};
use crate::shader::{texture_name, texture_size_name, COEFFICIENTS, FILL_COLOR};
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{debug, warn};

static NEXT_GENERATION: AtomicU64 = AtomicU64::new(1);

/// Identity of one successful link. Locations from one generation are never
/// valid for another.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Generation(u64);

impl Generation {
    pub(crate) fn next() -> Self {
        Generation(NEXT_GENERATION.fetch_add(1, Ordering::Relaxed))
    }

    pub fn get(&self) -> u64 {
        self.0
    }
}

/// Cached uniform locations of a linked program.
#[derive(Debug, Clone)]
pub struct Locations<L> {
    /// One sampler per plane.
    pub textures: Vec<L>,
    /// One per plane when the format samples in texels, `None` otherwise.
    pub texture_sizes: Option<Vec<L>>,
    pub coefficients: Option<L>,
    pub fill_color: Option<L>,
    /// Parallel to the extension's variables; `None` when optimized out.
    pub cm_variables: Vec<Option<L>>,
}

/// A linked program with a fully populated location table.
pub struct LinkedProgram<G: GlApi> {
    pub(crate) program: G::Program,
    pub(crate) generation: Generation,
    pub(crate) locations: Locations<G::UniformLocation>,
}

impl<G: GlApi> LinkedProgram<G> {
    pub fn program(&self) -> G::Program {
        self.program
    }

    pub fn generation(&self) -> Generation {
        self.generation
    }

    pub fn locations(&self) -> &Locations<G::UniformLocation> {
        &self.locations
    }

    /// Links `vertex` and `fragment`, then resolves every location `desc` and
    /// `cms` declare. On any failure the program is deleted.
    pub(crate) fn build(
        gl: &G,
        desc: &ConverterDescriptor,
        cms: &dyn ColorManagement,
        vertex: &str,
        fragment: &str,
    ) -> Result<Self> {
        let program = link(gl, vertex, fragment)?;
        match resolve(gl, program, desc, cms) {
            Ok(locations) => Ok(Self {
                program,
                generation: Generation::next(),
                locations,
            }),
            Err(e) => {
                gl.delete_program(program);
                Err(e)
            }
        }
    }
}

fn compile<G: GlApi>(gl: &G, stage: ShaderStage, source: &str) -> Result<G::Shader> {
    let shader = gl.create_shader(stage).map_err(|log| ConverterError::Compile { stage, log })?;
    gl.shader_source(shader, source);
    gl.compile_shader(shader);
    if !gl.shader_compile_status(shader) {
        let log = gl.shader_info_log(shader);
        gl.delete_shader(shader);
        return Err(ConverterError::Compile { stage, log });
    }
    Ok(shader)
}

/// Compiles both stages and links them. Shader objects never outlive the call.
fn link<G: GlApi>(gl: &G, vertex: &str, fragment: &str) -> Result<G::Program> {
    let vs = compile(gl, ShaderStage::Vertex, vertex)?;
    let fs = match compile(gl, ShaderStage::Fragment, fragment) {
        Ok(fs) => fs,
        Err(e) => {
            gl.delete_shader(vs);
            return Err(e);
        }
    };

    let program = match gl.create_program() {
        Ok(program) => program,
        Err(log) => {
            gl.delete_shader(vs);
            gl.delete_shader(fs);
            return Err(ConverterError::Link(log));
        }
    };
    gl.attach_shader(program, vs);
    gl.attach_shader(program, fs);
    gl.link_program(program);

    let linked = gl.program_link_status(program);
    let log = if linked { String::new() } else { gl.program_info_log(program) };

    gl.detach_shader(program, vs);
    gl.detach_shader(program, fs);
    gl.delete_shader(vs);
    gl.delete_shader(fs);

    if !linked {
        gl.delete_program(program);
        return Err(ConverterError::Link(log));
    }
    Ok(program)
}

fn required<G: GlApi>(gl: &G, program: G::Program, name: &str) -> Result<G::UniformLocation> {
    gl.uniform_location(program, name)
        .ok_or_else(|| ConverterError::MissingUniform(name.to_string()))
}

fn resolve<G: GlApi>(
    gl: &G,
    program: G::Program,
    desc: &ConverterDescriptor,
    cms: &dyn ColorManagement,
) -> Result<Locations<G::UniformLocation>> {
    let textures = (0..desc.plane_count)
        .map(|i| required(gl, program, &texture_name(i)))
        .collect::<Result<Vec<_>>>()?;

    let texture_sizes = if desc.needs_texture_size {
        Some(
            (0..desc.plane_count)
                .map(|i| required(gl, program, &texture_size_name(i)))
                .collect::<Result<Vec<_>>>()?,
        )
    } else {
        None
    };

    let coefficients = if desc.color_transform.is_yuv() {
        Some(required(gl, program, COEFFICIENTS)?)
    } else {
        None
    };

    let fill_color = if desc.has_alpha {
        Some(required(gl, program, FILL_COLOR)?)
    } else {
        None
    };

    let cm_variables = cms
        .variables()
        .iter()
        .map(|var| {
            let location = gl.uniform_location(program, &var.name);
            if location.is_none() {
                warn!(
                    "Color-management uniform `{}` is inactive, it will not be updated",
                    var.name
                );
            }
            location
        })
        .collect();

    let locations = Locations {
        textures,
        texture_sizes,
        coefficients,
        fill_color,
        cm_variables,
    };
    debug!("Resolved uniform locations: {:?}", locations);
    Ok(locations)
}
