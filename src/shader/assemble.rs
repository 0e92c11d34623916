//! Builds the complete fragment translation unit of a converter.

use super::fragment::Sampling;
use super::{texture_name, texture_size_name, COEFFICIENTS, FILL_COLOR, TEX_COORD};
use crate::cms::ColorManagement;
use crate::converter::ConverterDescriptor;

/// Assembles the fragment shader for `desc`, splicing in the color-management
/// extension when it is enabled.
///
/// Layout: version and extension directives, precision header, declarations,
/// extension GLSL, then `main` running format sampling, the shared matrix
/// step, the extension entry point and the alpha multiply.
pub fn assemble_fragment(desc: &ConverterDescriptor, cms: &dyn ColorManagement) -> String {
    let sampling = Sampling::new(desc.format.target, desc.glsl);
    let mut out = String::with_capacity(2048);

    out.push_str(&format!("#version {}\n", desc.glsl.number()));
    if let Some(extension) = sampling.extension() {
        out.push_str(extension);
        out.push('\n');
    }
    out.push_str(&desc.precision_header);
    if !desc.precision_header.is_empty() && !desc.precision_header.ends_with('\n') {
        out.push('\n');
    }

    out.push_str(&format!("varying vec2 {TEX_COORD};\n"));
    for plane in 0..desc.plane_count {
        out.push_str(&format!(
            "uniform {} {};\n",
            sampling.sampler_type(),
            texture_name(plane)
        ));
    }
    if desc.needs_texture_size {
        for plane in 0..desc.plane_count {
            out.push_str(&format!("uniform vec2 {};\n", texture_size_name(plane)));
        }
    }
    if desc.color_transform.is_yuv() {
        out.push_str(&format!("uniform mat4 {COEFFICIENTS};\n"));
    }
    if desc.has_alpha {
        out.push_str(&format!("uniform vec4 {FILL_COLOR};\n"));
    }

    for var in cms.variables() {
        out.push_str(&format!("uniform {} {};\n", var.kind.glsl_type(), var.name));
    }
    let glsl = cms.glsl();
    if !glsl.is_empty() {
        out.push_str(glsl);
        if !glsl.ends_with('\n') {
            out.push('\n');
        }
    }

    out.push_str("void main(void) {\n");
    out.push_str(&desc.family.sampling_body(&sampling));
    if desc.color_transform.is_yuv() {
        out.push_str(&format!(
            "    vec4 result = {COEFFICIENTS} * vec4(pixel.xyz, 1.0);\n"
        ));
    } else {
        out.push_str("    vec4 result = pixel;\n");
    }
    if let Some(entry) = cms.entry_point() {
        out.push_str(&format!("    result = {entry}(result);\n"));
    }
    if desc.has_alpha {
        out.push_str(&format!("    result *= {FILL_COLOR};\n"));
    }
    out.push_str("    gl_FragColor = result;\n}\n");
    out
}
