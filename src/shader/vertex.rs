//! Default vertex stage matching the converters' `TexCoord` varying.

use super::{GlslVersion, TEX_COORD};

/// Attribute holding the clip-space position.
pub const POSITION_ATTRIBUTE: &str = "VertexPosition";
/// Attribute holding the normalized texture coordinate.
pub const TEX_COORD_ATTRIBUTE: &str = "MultiTexCoord0";

/// Pass-through vertex shader for a full-screen quad.
pub fn default_vertex_source(glsl: GlslVersion) -> String {
    format!(
        "#version {version}\n\
         attribute vec2 {POSITION_ATTRIBUTE};\n\
         attribute vec2 {TEX_COORD_ATTRIBUTE};\n\
         varying vec2 {TEX_COORD};\n\
         void main(void) {{\n\
         \x20   {TEX_COORD} = {TEX_COORD_ATTRIBUTE};\n\
         \x20   gl_Position = vec4({POSITION_ATTRIBUTE}, 0.0, 1.0);\n\
         }}\n",
        version = glsl.number()
    )
}
