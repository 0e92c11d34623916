//! texconv: inspect the shaders generated for a picture format.

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use texconv::cms::NoColorManagement;
use texconv::shader::{assemble_fragment, default_vertex_source};
use texconv::{Chroma, ColorSpace, ConverterConfig, ConverterDescriptor, TextureTarget, VideoFormat};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

/// Texture target the planes are sampled from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Target {
    /// Normalized 2D textures
    #[value(name = "2d")]
    Texture2D,
    /// Rectangle textures sampled in texels (desktop only)
    Rect,
    /// External images (opaque hardware surfaces)
    Oes,
}

impl From<Target> for TextureTarget {
    fn from(target: Target) -> Self {
        match target {
            Target::Texture2D => TextureTarget::Texture2D,
            Target::Rect => TextureTarget::Rectangle,
            Target::Oes => TextureTarget::ExternalOes,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Space {
    Bt601,
    Bt709,
    Bt2020,
}

impl From<Space> for ColorSpace {
    fn from(space: Space) -> Self {
        match space {
            Space::Bt601 => ColorSpace::Bt601,
            Space::Bt709 => ColorSpace::Bt709,
            Space::Bt2020 => ColorSpace::Bt2020,
        }
    }
}

/// Print the fragment shader and uniform table a converter would use.
#[derive(Parser, Debug)]
#[command(name = "texconv")]
#[command(about = "Generate GLSL texture converters for video picture formats")]
struct Args {
    /// Picture format (e.g. i420, nv12, p010, yuyv, rgba)
    #[arg(short, long, default_value = "i420")]
    format: String,

    /// GLSL version: 100 (ES) or 120 (desktop). Overrides the config file.
    #[arg(long)]
    glsl: Option<u32>,

    /// Texture target of the planes
    #[arg(long, value_enum)]
    target: Option<Target>,

    /// YUV color space
    #[arg(long, value_enum, default_value = "bt709")]
    space: Space,

    /// Samples use the full 0-255 range instead of studio swing
    #[arg(long)]
    full_range: bool,

    /// YAML converter configuration
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// List supported formats and exit
    #[arg(long)]
    list_formats: bool,

    /// Also print the default vertex shader
    #[arg(long)]
    vertex: bool,
}

/// One line per format: plane subsampling and bytes per texel.
fn list_formats() {
    println!("Supported formats:");
    for chroma in Chroma::ALL {
        let sizes = chroma
            .planes()
            .iter()
            .map(|p| format!("{}x{}/{}B", p.w_div, p.h_div, p.bytes_per_texel()))
            .collect::<Vec<_>>()
            .join(" ");
        println!("  {:<10} {} plane(s): {}", chroma.name(), chroma.plane_count(), sizes);
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    if args.list_formats {
        list_formats();
        return Ok(());
    }

    let mut config = match &args.config {
        Some(path) => ConverterConfig::load(path)?,
        None => ConverterConfig::default(),
    };
    if let Some(glsl) = args.glsl {
        config.glsl_version = glsl;
    }
    let (glsl, precision_header) = config.shader_context()?;

    let chroma: Chroma = args.format.parse()?;
    let mut format = VideoFormat::new(chroma)
        .with_space(args.space.into())
        .with_full_range(args.full_range);
    if let Some(target) = args.target {
        format = format.with_target(target.into());
    }
    info!("Generating converter for {} with {}", format, glsl);

    let cms = NoColorManagement;
    let desc = ConverterDescriptor::select(&format, glsl, &precision_header, &cms)
        .with_context(|| format!("No converter for {}", format))?;
    debug!("{:?}", desc);

    if args.vertex {
        println!("// Vertex shader");
        println!("{}", default_vertex_source(glsl));
    }
    println!("// Fragment shader");
    println!("{}", assemble_fragment(&desc, &cms));

    println!("// Uniforms");
    for name in desc.required_uniforms() {
        println!("//   {}", name);
    }
    if let Some(matrix) = desc.color_transform.matrix() {
        println!("// Coefficients (column-major)");
        for column in &matrix.columns {
            println!(
                "//   {:>10.6} {:>10.6} {:>10.6} {:>10.6}",
                column[0], column[1], column[2], column[3]
            );
        }
    }

    Ok(())
}
