//! Image → bead board quantization.
//!
//! The source is fitted inside the board ("contain"), sampled nearest-neighbour at every socket
//! centre, and thresholded on alpha. Image rows run top-down while board rows run bottom-up, so
//! rows are flipped on the way out.

use std::collections::HashMap;
use std::path::Path;

use image::{DynamicImage, RgbaImage};

use crate::foundation::core::{GridSize, Rgb8};
use crate::foundation::error::{PixelflowError, PixelflowResult};
use crate::grid::cell::{Cell, CellSet};

/// Samples with alpha at or below this are empty sockets.
pub const ALPHA_THRESHOLD: u8 = 50;

/// Theme color used when no eligible dominant color exists.
pub const DEFAULT_THEME_COLOR: Rgb8 = Rgb8::new(0x4f, 0x46, 0xe5);

/// Output of [`quantize`]: the sparse board and its dominant color.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Quantized {
    /// Filled sockets.
    pub cells: CellSet,
    /// Most frequent color, black and white excluded.
    pub theme_color: Rgb8,
}

/// Placement of the source image inside the board, in socket units.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ContainFit {
    /// Drawn width.
    pub width: f64,
    /// Drawn height.
    pub height: f64,
    /// Left margin.
    pub offset_x: f64,
    /// Top margin (image space, top-down).
    pub offset_y: f64,
}

impl ContainFit {
    /// Scale `src_w × src_h` so its longer side spans `side` and centre the shorter one.
    pub fn compute(src_w: u32, src_h: u32, side: u32) -> Self {
        let side = f64::from(side);
        let aspect = f64::from(src_w) / f64::from(src_h);
        if aspect >= 1.0 {
            let height = side / aspect;
            Self {
                width: side,
                height,
                offset_x: 0.0,
                offset_y: (side - height) / 2.0,
            }
        } else {
            let width = side * aspect;
            Self {
                width,
                height: side,
                offset_x: (side - width) / 2.0,
                offset_y: 0.0,
            }
        }
    }

    /// Source pixel sampled by the socket at image-space `(x, y)`, if it lies inside the fit.
    ///
    /// A socket belongs to the fit when its centre does, matching unsmoothed canvas drawing.
    fn source_pixel(&self, x: u32, y: u32, src_w: u32, src_h: u32) -> Option<(u32, u32)> {
        let cx = f64::from(x) + 0.5 - self.offset_x;
        let cy = f64::from(y) + 0.5 - self.offset_y;
        if cx < 0.0 || cy < 0.0 || cx >= self.width || cy >= self.height {
            return None;
        }
        let sx = ((cx / self.width) * f64::from(src_w)).floor() as u32;
        let sy = ((cy / self.height) * f64::from(src_h)).floor() as u32;
        Some((sx.min(src_w - 1), sy.min(src_h - 1)))
    }
}

/// Quantize an already-decoded image.
#[tracing::instrument(skip(image), fields(w = image.width(), h = image.height()))]
pub fn quantize(image: &DynamicImage, grid_size: GridSize) -> PixelflowResult<Quantized> {
    let rgba = image.to_rgba8();
    quantize_rgba(&rgba, grid_size)
}

/// Decode encoded bytes (any format `image` understands) and quantize them.
pub fn quantize_bytes(bytes: &[u8], grid_size: GridSize) -> PixelflowResult<Quantized> {
    let img = image::load_from_memory(bytes)
        .map_err(|e| PixelflowError::decode(format!("decode image from memory: {e}")))?;
    quantize(&img, grid_size)
}

/// Read, decode and quantize an image file.
pub fn quantize_path(path: &Path, grid_size: GridSize) -> PixelflowResult<Quantized> {
    let bytes = std::fs::read(path)
        .map_err(|e| PixelflowError::decode(format!("read image '{}': {e}", path.display())))?;
    quantize_bytes(&bytes, grid_size)
}

/// Quantize straight-alpha RGBA pixels.
pub fn quantize_rgba(rgba: &RgbaImage, grid_size: GridSize) -> PixelflowResult<Quantized> {
    let (src_w, src_h) = rgba.dimensions();
    if src_w == 0 || src_h == 0 {
        return Err(PixelflowError::decode("image has no pixels"));
    }

    let side = grid_size.side();
    let fit = ContainFit::compute(src_w, src_h, side);
    let mut cells = CellSet::new(grid_size);
    let mut tally = ColorTally::default();

    for y in 0..side {
        for x in 0..side {
            let Some((sx, sy)) = fit.source_pixel(x, y, src_w, src_h) else {
                continue;
            };
            let [r, g, b, a] = rgba.get_pixel(sx, sy).0;
            if a <= ALPHA_THRESHOLD {
                continue;
            }
            let color = Rgb8::new(r, g, b);
            tally.add(color);
            cells.insert(Cell::new(x, side - 1 - y, color))?;
        }
    }

    let theme_color = tally.dominant().unwrap_or(DEFAULT_THEME_COLOR);
    tracing::debug!(
        cells = cells.len(),
        theme = %theme_color,
        "quantized image"
    );
    Ok(Quantized { cells, theme_color })
}

/// Occurrence counts per color, remembering first appearance for tie-breaks.
#[derive(Default)]
struct ColorTally {
    counts: HashMap<Rgb8, (u32, usize)>,
}

impl ColorTally {
    fn add(&mut self, color: Rgb8) {
        let next = self.counts.len();
        self.counts.entry(color).or_insert((0, next)).0 += 1;
    }

    /// Highest count wins; among equal counts the earliest-seen color wins.
    fn dominant(&self) -> Option<Rgb8> {
        self.counts
            .iter()
            .filter(|(c, _)| **c != Rgb8::BLACK && **c != Rgb8::WHITE)
            .max_by(|(_, (ca, fa)), (_, (cb, fb))| ca.cmp(cb).then(fb.cmp(fa)))
            .map(|(c, _)| *c)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/quantize/quantize.rs"]
mod tests;
