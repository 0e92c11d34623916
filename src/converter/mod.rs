//! Texture converters: selection, one-time link and per-frame binding.

mod binder;
mod program;

pub use binder::{FrameBinding, PlaneTexture};
pub use program::{Generation, LinkedProgram, Locations};

use crate::cms::{ColorManagement, NoColorManagement};
use crate::color::{ColorMatrix, ColorTransform};
use crate::config::ConverterConfig;
use crate::error::{ConverterError, Result};
use crate::format::{TextureTarget, VideoFormat, MAX_PLANES};
use crate::gl::GlApi;
use crate::shader::{self, FormatFamily, GlslVersion};
use std::rc::Rc;
use tracing::{debug, info};

/// What a converter needs from the caller and what it produces.
#[derive(Debug, Clone, PartialEq)]
pub struct ConverterDescriptor {
    pub format: VideoFormat,
    pub family: FormatFamily,
    pub glsl: GlslVersion,
    pub precision_header: String,
    pub plane_count: usize,
    pub color_transform: ColorTransform,
    pub uses_color_management: bool,
    pub has_alpha: bool,
    pub needs_texture_size: bool,
}

impl ConverterDescriptor {
    /// Picks the converter family for `format`. Fails without side effects
    /// when the format cannot be sampled with this dialect.
    pub fn select(
        format: &VideoFormat,
        glsl: GlslVersion,
        precision_header: &str,
        cms: &dyn ColorManagement,
    ) -> Result<Self> {
        let family = FormatFamily::for_chroma(format.chroma);
        if !family.supports(format.target, glsl) {
            return Err(ConverterError::UnsupportedTarget {
                chroma: format.chroma,
                target: format.target,
            });
        }

        let plane_count = family.plane_count();
        debug_assert!(plane_count <= MAX_PLANES);

        let color_transform = if family.is_yuv() {
            ColorTransform::Yuv(ColorMatrix::yuv_to_rgb(
                format.space,
                format.full_range,
                family.range_correction(),
            ))
        } else {
            ColorTransform::Identity
        };

        Ok(Self {
            format: *format,
            family,
            glsl,
            precision_header: precision_header.to_string(),
            plane_count,
            color_transform,
            uses_color_management: cms.is_enabled(),
            has_alpha: family.has_alpha(),
            needs_texture_size: format.target == TextureTarget::Rectangle
                || family.needs_texel_parity(),
        })
    }

    /// Uniforms the linked program must expose, in resolution order.
    pub fn required_uniforms(&self) -> Vec<String> {
        let mut names: Vec<String> = (0..self.plane_count).map(shader::texture_name).collect();
        if self.needs_texture_size {
            names.extend((0..self.plane_count).map(shader::texture_size_name));
        }
        if self.color_transform.is_yuv() {
            names.push(shader::COEFFICIENTS.to_string());
        }
        if self.has_alpha {
            names.push(shader::FILL_COLOR.to_string());
        }
        names
    }

    pub fn key(&self) -> ConverterKey {
        ConverterKey {
            format: self.format,
            glsl: self.glsl,
            color_management: self.uses_color_management,
        }
    }
}

/// Everything a link depends on. Equal keys share the same program.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConverterKey {
    pub format: VideoFormat,
    pub glsl: GlslVersion,
    pub color_management: bool,
}

/// Caller-provided state shared by all converters of a drawing surface.
pub struct ConverterContext<G: GlApi> {
    pub gl: Rc<G>,
    pub glsl: GlslVersion,
    pub precision_header: String,
    /// Log assembled shader sources before compiling them.
    pub dump_shaders: bool,
    pub color_management: Rc<dyn ColorManagement>,
}

impl<G: GlApi> Clone for ConverterContext<G> {
    fn clone(&self) -> Self {
        Self {
            gl: Rc::clone(&self.gl),
            glsl: self.glsl,
            precision_header: self.precision_header.clone(),
            dump_shaders: self.dump_shaders,
            color_management: Rc::clone(&self.color_management),
        }
    }
}

impl<G: GlApi> ConverterContext<G> {
    pub fn new(gl: Rc<G>, glsl: GlslVersion) -> Self {
        Self {
            gl,
            glsl,
            precision_header: glsl.default_precision_header().to_string(),
            dump_shaders: false,
            color_management: Rc::new(NoColorManagement),
        }
    }

    pub fn from_config(gl: Rc<G>, config: &ConverterConfig) -> Result<Self> {
        let (glsl, precision_header) = config.shader_context()?;
        Ok(Self {
            precision_header,
            dump_shaders: config.dump_shaders,
            ..Self::new(gl, glsl)
        })
    }

    pub fn with_precision_header(mut self, header: impl Into<String>) -> Self {
        self.precision_header = header.into();
        self
    }

    pub fn with_dump_shaders(mut self, dump: bool) -> Self {
        self.dump_shaders = dump;
        self
    }

    pub fn with_color_management(mut self, cms: Rc<dyn ColorManagement>) -> Self {
        self.color_management = cms;
        self
    }
}

fn numbered(source: &str) -> String {
    source
        .lines()
        .enumerate()
        .map(|(i, line)| format!("{:4}: {}\n", i + 1, line))
        .collect()
}

/// One conversion strategy bound to one format. Owns its GL program, which is
/// deleted when the converter is dropped.
pub struct Converter<G: GlApi> {
    ctx: ConverterContext<G>,
    descriptor: ConverterDescriptor,
    fragment_source: String,
    linked: Option<LinkedProgram<G>>,
    failed: Option<ConverterError>,
}

impl<G: GlApi> Converter<G> {
    /// Selects and assembles a converter for `format`. No GL call is made.
    pub fn new(ctx: ConverterContext<G>, format: &VideoFormat) -> Result<Self> {
        let descriptor = ConverterDescriptor::select(
            format,
            ctx.glsl,
            &ctx.precision_header,
            ctx.color_management.as_ref(),
        )?;
        let fragment_source =
            shader::assemble_fragment(&descriptor, ctx.color_management.as_ref());
        Ok(Self {
            ctx,
            descriptor,
            fragment_source,
            linked: None,
            failed: None,
        })
    }

    pub fn descriptor(&self) -> &ConverterDescriptor {
        &self.descriptor
    }

    pub fn fragment_source(&self) -> &str {
        &self.fragment_source
    }

    pub fn key(&self) -> ConverterKey {
        self.descriptor.key()
    }

    /// Compiles, links and resolves locations against `vertex_source`.
    ///
    /// Runs at most once: later calls return the existing generation, or the
    /// original failure, without touching the driver. A failed converter
    /// stays unlinked and must be discarded.
    pub fn link(&mut self, vertex_source: &str) -> Result<Generation> {
        if let Some(linked) = &self.linked {
            return Ok(linked.generation);
        }
        if let Some(e) = &self.failed {
            return Err(e.clone());
        }

        if self.ctx.dump_shaders {
            debug!("Vertex shader:\n{}", numbered(vertex_source));
            debug!("Fragment shader:\n{}", numbered(&self.fragment_source));
        }

        let linked = match LinkedProgram::build(
            self.ctx.gl.as_ref(),
            &self.descriptor,
            self.ctx.color_management.as_ref(),
            vertex_source,
            &self.fragment_source,
        ) {
            Ok(linked) => linked,
            Err(e) => {
                self.failed = Some(e.clone());
                return Err(e);
            }
        };
        info!(
            "Linked converter for {} with {} ({} planes, generation {})",
            self.descriptor.format,
            self.descriptor.glsl,
            self.descriptor.plane_count,
            linked.generation.get()
        );
        let generation = linked.generation;
        self.linked = Some(linked);
        Ok(generation)
    }

    /// Whether a previous [`link`](Self::link) failed.
    pub fn is_failed(&self) -> bool {
        self.failed.is_some()
    }

    pub fn linked(&self) -> Option<&LinkedProgram<G>> {
        self.linked.as_ref()
    }

    /// Program handle to make current before [`bind`](Self::bind).
    pub fn program(&self) -> Option<G::Program> {
        self.linked.as_ref().map(|l| l.program)
    }

    pub fn generation(&self) -> Option<Generation> {
        self.linked.as_ref().map(|l| l.generation)
    }

    /// Binds one frame. Errors mean the frame must be dropped.
    pub fn bind(&self, frame: &FrameBinding<'_, G::Texture>) -> Result<()> {
        let linked = self.linked.as_ref().ok_or(ConverterError::NotLinked)?;
        binder::bind_frame(
            self.ctx.gl.as_ref(),
            &self.descriptor,
            linked,
            self.ctx.color_management.as_ref(),
            frame,
        )
    }
}

impl<G: GlApi> Drop for Converter<G> {
    fn drop(&mut self) {
        if let Some(linked) = self.linked.take() {
            debug!("Deleting program of generation {}", linked.generation.get());
            self.ctx.gl.delete_program(linked.program);
        }
    }
}
