//! YUV to RGB coefficient matrices.

use crate::format::ColorSpace;
use bytemuck::{Pod, Zeroable};

/// Column-major 4x4 matrix uploaded as `uniform mat4 Coefficients`.
///
/// Columns 0..3 hold the RGB contribution of Y, Cb and Cr; column 3 holds the
/// constant offset and carries `w = 1` so the result is opaque. The bottom row
/// is identity-padded.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct ColorMatrix {
    pub columns: [[f32; 4]; 4],
}

impl ColorMatrix {
    pub const IDENTITY: ColorMatrix = ColorMatrix {
        columns: [
            [1.0, 0.0, 0.0, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ],
    };

    /// Builds the conversion for normalized samples.
    ///
    /// `range_correction` rescales samples that only use the low bits of a
    /// wider texture (e.g. 10-bit data in 16-bit textures); it applies to the
    /// Y/Cb/Cr columns, never to the offset.
    pub fn yuv_to_rgb(space: ColorSpace, full_range: bool, range_correction: f32) -> Self {
        let (kr, kb) = space.luma_weights();
        let kg = 1.0 - kr - kb;

        let (y_scale, c_scale, y_offset) = if full_range {
            (1.0, 1.0, 0.0)
        } else {
            (255.0 / 219.0, 255.0 / 224.0, 16.0 / 255.0)
        };
        let c_offset = 128.0 / 255.0;

        let r_cr = 2.0 * (1.0 - kr) * c_scale;
        let g_cb = -2.0 * kb * (1.0 - kb) / kg * c_scale;
        let g_cr = -2.0 * kr * (1.0 - kr) / kg * c_scale;
        let b_cb = 2.0 * (1.0 - kb) * c_scale;

        let luma = y_scale * y_offset;
        let k = range_correction;
        ColorMatrix {
            columns: [
                [y_scale * k, y_scale * k, y_scale * k, 0.0],
                [0.0, g_cb * k, b_cb * k, 0.0],
                [r_cr * k, g_cr * k, 0.0, 0.0],
                [
                    -(luma + r_cr * c_offset),
                    -(luma + (g_cb + g_cr) * c_offset),
                    -(luma + b_cb * c_offset),
                    1.0,
                ],
            ],
        }
    }

    /// The 16 floats in upload order.
    pub fn as_slice(&self) -> &[f32] {
        bytemuck::cast_slice(&self.columns)
    }

    /// Applies the matrix to a `(y, cb, cr)` sample.
    pub fn apply(&self, yuv: [f32; 3]) -> [f32; 4] {
        let input = [yuv[0], yuv[1], yuv[2], 1.0];
        let mut out = [0.0; 4];
        for (col, value) in self.columns.iter().zip(input) {
            for (o, c) in out.iter_mut().zip(col) {
                *o += c * value;
            }
        }
        out
    }
}

/// Color step inserted once by shader assembly.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ColorTransform {
    /// Samples are already RGB
    Identity,
    /// Samples are Y/Cb/Cr and are multiplied by the matrix
    Yuv(ColorMatrix),
}

impl ColorTransform {
    pub fn is_yuv(&self) -> bool {
        matches!(self, ColorTransform::Yuv(_))
    }

    pub fn matrix(&self) -> Option<&ColorMatrix> {
        match self {
            ColorTransform::Yuv(m) => Some(m),
            ColorTransform::Identity => None,
        }
    }
}

/// Correction for samples stored in the low `bits` of a 16-bit texture.
pub fn lsb_range_correction(bits: u8) -> f32 {
    if bits <= 8 {
        1.0
    } else {
        65535.0 / ((1u32 << bits) - 1) as f32
    }
}
