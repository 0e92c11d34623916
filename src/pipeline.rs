//! Keeps one converter alive per drawing surface and swaps it on format changes.

use crate::converter::{Converter, ConverterContext, ConverterKey, FrameBinding, Generation};
use crate::error::{ConverterError, Result};
use crate::format::VideoFormat;
use crate::gl::GlApi;
use tracing::{info, warn};

/// Owns the active converter of a surface.
///
/// Frames are bound against the converter created by the last
/// [`prepare`](Self::prepare). A frame prepared against an older program is
/// rejected and counted as dropped.
pub struct GlPipeline<G: GlApi> {
    ctx: ConverterContext<G>,
    active: Option<Converter<G>>,
    dropped_frames: u64,
}

impl<G: GlApi> GlPipeline<G> {
    pub fn new(ctx: ConverterContext<G>) -> Self {
        Self {
            ctx,
            active: None,
            dropped_frames: 0,
        }
    }

    pub fn context(&self) -> &ConverterContext<G> {
        &self.ctx
    }

    /// Makes a linked converter for `format` active and returns its generation.
    ///
    /// Reuses the current converter when nothing it depends on changed.
    /// Otherwise the old program is deleted before the new one is built; on
    /// failure the pipeline is left without an active converter.
    pub fn prepare(&mut self, format: &VideoFormat, vertex_source: &str) -> Result<Generation> {
        let key = ConverterKey {
            format: *format,
            glsl: self.ctx.glsl,
            color_management: self.ctx.color_management.is_enabled(),
        };
        if let Some(active) = &self.active {
            if active.key() == key {
                if let Some(generation) = active.generation() {
                    return Ok(generation);
                }
            }
            info!("Format changed from {} to {}, relinking", active.descriptor().format, format);
        }

        self.active = None;
        let mut converter = Converter::new(self.ctx.clone(), format)?;
        let generation = converter.link(vertex_source)?;
        self.active = Some(converter);
        Ok(generation)
    }

    pub fn active(&self) -> Option<&Converter<G>> {
        self.active.as_ref()
    }

    pub fn generation(&self) -> Option<Generation> {
        self.active.as_ref().and_then(Converter::generation)
    }

    /// Program to make current before [`bind`](Self::bind).
    pub fn program(&self) -> Option<G::Program> {
        self.active.as_ref().and_then(Converter::program)
    }

    /// Binds `frame` with the active converter. Failed frames are logged and
    /// counted; the error is returned so the caller can skip the draw.
    pub fn bind(&mut self, frame: &FrameBinding<'_, G::Texture>) -> Result<()> {
        let result = match &self.active {
            Some(converter) => converter.bind(frame),
            None => Err(ConverterError::NotLinked),
        };
        if let Err(e) = &result {
            self.dropped_frames += 1;
            warn!("Dropping frame: {} ({} dropped so far)", e, self.dropped_frames);
        }
        result
    }

    pub fn dropped_frames(&self) -> u64 {
        self.dropped_frames
    }
}
