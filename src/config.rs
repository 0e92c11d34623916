//! YAML configuration for converter contexts.

use crate::error::Result as ConverterResult;
use crate::shader::GlslVersion;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::info;

fn default_glsl_version() -> u32 {
    120
}

/// Settings shared by every converter created for a drawing surface.
///
/// ```yaml
/// glsl_version: 100
/// precision_header: "precision mediump float;"
/// dump_shaders: true
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConverterConfig {
    /// `100` (GLSL ES) or `120` (desktop)
    pub glsl_version: u32,
    /// Replaces the dialect's default precision header when set.
    pub precision_header: Option<String>,
    pub dump_shaders: bool,
}

impl Default for ConverterConfig {
    fn default() -> Self {
        Self {
            glsl_version: default_glsl_version(),
            precision_header: None,
            dump_shaders: false,
        }
    }
}

impl ConverterConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {:?}", path))?;
        let config = Self::from_yaml_str(&content)
            .with_context(|| format!("Failed to parse config file {:?}", path))?;
        info!("Loaded converter config from {:?}", path);
        Ok(config)
    }

    pub fn from_yaml_str(content: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(content)?;
        config.shader_context()?;
        Ok(config)
    }

    /// Validated dialect and the precision header to use with it.
    pub fn shader_context(&self) -> ConverterResult<(GlslVersion, String)> {
        let glsl = GlslVersion::from_number(self.glsl_version)?;
        let header = match &self.precision_header {
            Some(header) => header.clone(),
            None => glsl.default_precision_header().to_string(),
        };
        Ok((glsl, header))
    }
}
