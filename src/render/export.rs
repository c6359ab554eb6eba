use image::ImageEncoder as _;

use crate::foundation::error::{PixelflowError, PixelflowResult};
use crate::render::compositor::{CardLayout, FrameRequest, draw_frame};
use crate::render::cpu::CpuSurface;

/// Width of a downloaded card in pixels.
pub const EXPORT_WIDTH: u32 = 1080;
/// Width of the on-screen preview in pixels.
pub const PREVIEW_WIDTH: u32 = 400;

const FALLBACK_FILE_STEM: &str = "pixelflow";

/// Pixel height of a card rendered `width` pixels wide.
pub fn card_height_for(width: u32) -> u32 {
    let layout = CardLayout::REFERENCE;
    (layout.height() * f64::from(width) / layout.width).round() as u32
}

/// Rasterize a card `width` pixels wide, scaling the reference layout uniformly.
pub fn render_rgba(request: &FrameRequest<'_>, width: u32) -> PixelflowResult<image::RgbaImage> {
    let layout = CardLayout::REFERENCE;
    if width == 0 {
        return Err(PixelflowError::validation("render width must be > 0"));
    }
    let scale = f64::from(width) / layout.width;
    let mut surface = CpuSurface::new(width, card_height_for(width), scale)?;
    draw_frame(&mut surface, &layout, request)?;
    surface.finish()
}

/// Preview-sized render of the same card.
pub fn preview(request: &FrameRequest<'_>) -> PixelflowResult<image::RgbaImage> {
    render_rgba(request, PREVIEW_WIDTH)
}

/// Encode a full-size card as PNG bytes.
#[tracing::instrument(
    level = "debug",
    skip(request),
    fields(grid = %request.cells.grid_size(), cells = request.cells.len())
)]
pub fn export_png(request: &FrameRequest<'_>) -> PixelflowResult<Vec<u8>> {
    let img = render_rgba(request, EXPORT_WIDTH)?;
    encode_png(&img)
}

pub fn encode_png(img: &image::RgbaImage) -> PixelflowResult<Vec<u8>> {
    let mut png = Vec::new();
    image::codecs::png::PngEncoder::new(&mut png)
        .write_image(
            img.as_raw(),
            img.width(),
            img.height(),
            image::ExtendedColorType::Rgba8,
        )
        .map_err(|e| PixelflowError::render(format!("png encode failed: {e}")))?;
    tracing::debug!(bytes = png.len(), "png encoded");
    Ok(png)
}

/// `<label>.png` with path-hostile characters replaced; `pixelflow.png` for a blank label.
pub fn export_file_name(label: &str) -> String {
    let stem = label
        .trim()
        .chars()
        .map(|c| {
            if c.is_control() || matches!(c, '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|')
            {
                '_'
            } else {
                c
            }
        })
        .collect::<String>();
    let stem = stem.trim_matches(|c: char| c == '.' || c.is_whitespace());
    if stem.is_empty() {
        format!("{FALLBACK_FILE_STEM}.png")
    } else {
        format!("{stem}.png")
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/export.rs"]
mod tests;
