//! Rasterizing symbols
//!
//! Each module becomes a `scale x scale` block of pixels (dark = 0,
//! light = 255) inside a light quiet zone of `border` modules.

use image::codecs::png::PngEncoder;
use image::{ColorType, GrayImage, ImageEncoder, Luma};

use crate::error::RenderError;
use crate::models::QRCode;

/// Pixels per module used by the service
pub const DEFAULT_SCALE: u32 = 10;
/// Quiet-zone width in modules used by the service
pub const DEFAULT_BORDER: u32 = 4;

const DARK: Luma<u8> = Luma([0]);
const LIGHT: Luma<u8> = Luma([255]);

/// Render a symbol to an 8-bit grayscale image
pub fn to_image(code: &QRCode, scale: u32, border: u32) -> Result<GrayImage, RenderError> {
    if scale == 0 {
        return Err(RenderError::InvalidScale);
    }
    let modules = code.size() + 2 * border as usize;
    let side = modules * scale as usize;
    let side_px = u32::try_from(side).map_err(|_| RenderError::TooLarge(side))?;

    let mut image = GrayImage::from_pixel(side_px, side_px, LIGHT);
    for y in 0..code.size() {
        for x in 0..code.size() {
            if !code.is_dark(x, y) {
                continue;
            }
            let left = (border + x as u32) * scale;
            let top = (border + y as u32) * scale;
            for py in top..top + scale {
                for px in left..left + scale {
                    image.put_pixel(px, py, DARK);
                }
            }
        }
    }
    Ok(image)
}

/// Encode a grayscale image as PNG bytes
pub fn to_png(image: &GrayImage) -> Result<Vec<u8>, RenderError> {
    let mut png = Vec::new();
    PngEncoder::new(&mut png).write_image(
        image.as_raw(),
        image.width(),
        image.height(),
        ColorType::L8,
    )?;
    Ok(png)
}

/// Render and encode in one step
pub fn render_png(code: &QRCode, scale: u32, border: u32) -> Result<Vec<u8>, RenderError> {
    to_png(&to_image(code, scale, border)?)
}

/// Terminal rendering, two modules per character row using half blocks.
pub fn to_ascii(code: &QRCode, border: usize) -> String {
    let side = code.size() + 2 * border;
    let dark = |x: usize, y: usize| {
        x >= border
            && y >= border
            && x < border + code.size()
            && y < border + code.size()
            && code.is_dark(x - border, y - border)
    };

    let mut out = String::with_capacity((side + 1) * side.div_ceil(2) * 3);
    for y in (0..side).step_by(2) {
        for x in 0..side {
            let ch = match (dark(x, y), dark(x, y + 1)) {
                (true, true) => '█',
                (true, false) => '▀',
                (false, true) => '▄',
                (false, false) => ' ',
            };
            out.push(ch);
        }
        out.push('\n');
    }
    out
}
