use std::sync::Arc;

use crate::foundation::core::{Point, Rect, Rgba8};
use crate::foundation::error::{PixelflowError, PixelflowResult};
use crate::render::raster::{
    blur_rgba8_premul, linear_gradient_rgba8, over_in_place, over_offset_in_place,
    unpremultiply_in_place,
};
use crate::render::surface::{Paint, Shadow, Surface, TextAlign, TextStyle};
use crate::render::text::{TextBrushRgba8, TextLayoutEngine, label_font};

use vello_cpu::kurbo::Shape as _;

const PATH_TOLERANCE: f64 = 0.1;

struct ShadowLayer {
    shadow: Shadow,
    ctx: vello_cpu::RenderContext,
    dirty: bool,
}

/// [`Surface`] rasterized on the CPU with `vello_cpu`.
///
/// Draw calls are batched into a render context and composited onto a premultiplied canvas
/// whenever the shadow scope changes and on [`CpuSurface::finish`].
pub struct CpuSurface {
    width: u16,
    height: u16,
    scale: f64,
    canvas: Vec<u8>,
    ctx: vello_cpu::RenderContext,
    dirty: bool,
    shadow: Option<ShadowLayer>,
    text: TextLayoutEngine,
    skipped_text: usize,
}

impl std::fmt::Debug for CpuSurface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CpuSurface")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("scale", &self.scale)
            .finish_non_exhaustive()
    }
}

impl CpuSurface {
    /// Transparent `width`×`height` device pixels; canvas units are multiplied by `scale`.
    pub fn new(width: u32, height: u32, scale: f64) -> PixelflowResult<Self> {
        let w: u16 = width
            .try_into()
            .map_err(|_| PixelflowError::render("surface width exceeds u16"))?;
        let h: u16 = height
            .try_into()
            .map_err(|_| PixelflowError::render("surface height exceeds u16"))?;
        if w == 0 || h == 0 {
            return Err(PixelflowError::render("surface must be non-empty"));
        }
        if !scale.is_finite() || scale <= 0.0 {
            return Err(PixelflowError::validation("surface scale must be finite and > 0"));
        }

        let mut ctx = vello_cpu::RenderContext::new(w, h);
        ctx.set_transform(vello_cpu::kurbo::Affine::scale(scale));
        Ok(Self {
            width: w,
            height: h,
            scale,
            canvas: vec![0u8; usize::from(w) * usize::from(h) * 4],
            ctx,
            dirty: false,
            shadow: None,
            text: TextLayoutEngine::new(),
            skipped_text: 0,
        })
    }

    pub fn width(&self) -> u32 {
        u32::from(self.width)
    }

    pub fn height(&self) -> u32 {
        u32::from(self.height)
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Number of `fill_text` calls dropped because no font was available.
    pub fn skipped_text(&self) -> usize {
        self.skipped_text
    }

    /// Flush pending work and return straight-alpha pixels.
    pub fn finish(mut self) -> PixelflowResult<image::RgbaImage> {
        self.end_shadow()?;
        let (w, h) = (self.width(), self.height());
        let mut pixels = std::mem::take(&mut self.canvas);
        unpremultiply_in_place(&mut pixels);
        image::RgbaImage::from_raw(w, h, pixels)
            .ok_or_else(|| PixelflowError::render("canvas size does not match buffer length"))
    }

    fn new_ctx(&self) -> vello_cpu::RenderContext {
        let mut ctx = vello_cpu::RenderContext::new(self.width, self.height);
        ctx.set_transform(vello_cpu::kurbo::Affine::scale(self.scale));
        ctx
    }

    fn render_ctx(
        ctx: &mut vello_cpu::RenderContext,
        width: u16,
        height: u16,
    ) -> vello_cpu::Pixmap {
        let mut pixmap = vello_cpu::Pixmap::new(width, height);
        ctx.flush();
        ctx.render_to_pixmap(&mut pixmap);
        pixmap
    }

    fn flush_body(&mut self) -> PixelflowResult<()> {
        if !self.dirty {
            return Ok(());
        }
        let pixmap = Self::render_ctx(&mut self.ctx, self.width, self.height);
        over_in_place(&mut self.canvas, pixmap.data_as_u8_slice(), 1.0)?;
        self.ctx = self.new_ctx();
        self.dirty = false;
        Ok(())
    }

    /// Composite the current shadow group: blurred silhouette first, then the shapes.
    fn end_shadow(&mut self) -> PixelflowResult<()> {
        let Some(mut layer) = self.shadow.take() else {
            return self.flush_body();
        };
        if layer.dirty {
            let pixmap = Self::render_ctx(&mut layer.ctx, self.width, self.height);
            let mut silhouette = pixmap.data_as_u8_slice().to_vec();
            let sigma = (layer.shadow.blur / 2.0 * self.scale) as f32;
            let (w, h) = (self.width(), self.height());
            blur_rgba8_premul(&mut silhouette, w, h, sigma);
            let offset = (
                (layer.shadow.offset.0 * self.scale).round() as i32,
                (layer.shadow.offset.1 * self.scale).round() as i32,
            );
            let opacity = f32::from(layer.shadow.color.a) / 255.0;
            over_offset_in_place(
                &mut self.canvas,
                &silhouette,
                w,
                h,
                offset,
                opacity,
            )?;
        }
        self.flush_body()
    }

    fn set_paint(&mut self, paint: &Paint) {
        match paint {
            Paint::Solid(c) => {
                self.ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
                self.ctx
                    .set_paint(vello_cpu::peniko::Color::from_rgba8(c.r, c.g, c.b, c.a));
            }
            Paint::LinearGradient { start, end, stops } => {
                let (w, h) = (self.width(), self.height());
                let bytes = linear_gradient_rgba8(w, h, self.scale, *start, *end, stops);
                let pixels = bytes
                    .chunks_exact(4)
                    .map(|px| {
                        vello_cpu::peniko::color::PremulRgba8::from_u8_array([
                            px[0], px[1], px[2], px[3],
                        ])
                    })
                    .collect::<Vec<_>>();
                let pixmap = vello_cpu::Pixmap::from_parts_with_opacity(
                    pixels,
                    self.width,
                    self.height,
                    false,
                );
                // Gradient pixels are device pixels; undo the canvas scale.
                self.ctx
                    .set_paint_transform(vello_cpu::kurbo::Affine::scale(1.0 / self.scale));
                self.ctx.set_paint(vello_cpu::Image {
                    image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
                    sampler: vello_cpu::peniko::ImageSampler::default(),
                });
            }
        }
    }

    fn fill_shape(&mut self, path: &vello_cpu::kurbo::BezPath, paint: &Paint) {
        self.set_paint(paint);
        self.ctx.fill_path(path);
        self.dirty = true;
        if let Some(layer) = self.shadow.as_mut() {
            let c = layer.shadow.color;
            layer
                .ctx
                .set_paint(vello_cpu::peniko::Color::from_rgba8(c.r, c.g, c.b, 255));
            layer.ctx.fill_path(path);
            layer.dirty = true;
        }
    }
}

fn rect_to_cpu(rect: Rect) -> vello_cpu::kurbo::Rect {
    vello_cpu::kurbo::Rect::new(rect.x0, rect.y0, rect.x1, rect.y1)
}

fn rounded_rect_path(rect: Rect, radius: f64) -> vello_cpu::kurbo::BezPath {
    let r = radius.min(rect.width() / 2.0).min(rect.height() / 2.0).max(0.0);
    vello_cpu::kurbo::RoundedRect::from_rect(rect_to_cpu(rect), r).to_path(PATH_TOLERANCE)
}

impl Surface for CpuSurface {
    fn fill_rect(&mut self, rect: Rect, paint: &Paint) {
        let path = rect_to_cpu(rect).to_path(PATH_TOLERANCE);
        self.fill_shape(&path, paint);
    }

    fn fill_rounded_rect(&mut self, rect: Rect, radius: f64, paint: &Paint) {
        let path = rounded_rect_path(rect, radius);
        self.fill_shape(&path, paint);
    }

    fn stroke_rounded_rect(&mut self, rect: Rect, radius: f64, width: f64, color: Rgba8) {
        let path = rounded_rect_path(rect, radius);
        self.ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
        self.ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
            color.r, color.g, color.b, color.a,
        ));
        self.ctx.set_stroke(vello_cpu::kurbo::Stroke::new(width));
        self.ctx.stroke_path(&path);
        self.dirty = true;
    }

    fn fill_circle(&mut self, center: Point, radius: f64, paint: &Paint) {
        if radius <= 0.0 {
            return;
        }
        let path = vello_cpu::kurbo::Circle::new((center.x, center.y), radius).to_path(PATH_TOLERANCE);
        self.fill_shape(&path, paint);
    }

    fn fill_text(&mut self, text: &str, anchor: Point, style: &TextStyle) -> PixelflowResult<()> {
        if text.is_empty() {
            return Ok(());
        }
        let Some(font) = label_font(style.bold) else {
            self.skipped_text += 1;
            tracing::warn!(text, "no font available; skipping text");
            return Ok(());
        };

        let brush = TextBrushRgba8 {
            r: style.color.r,
            g: style.color.g,
            b: style.color.b,
            a: 255,
        };
        let layout = self
            .text
            .layout_line(text, font, style.size, style.bold, brush)?;
        let w = f64::from(layout.width());
        let h = f64::from(layout.height());
        let x = match style.align {
            TextAlign::Start => anchor.x,
            TextAlign::Center => anchor.x - w / 2.0,
            TextAlign::End => anchor.x - w,
        };
        let y = anchor.y - h / 2.0;

        let cpu_font = vello_cpu::peniko::FontData::new(
            vello_cpu::peniko::Blob::from(font.bytes.as_ref().clone()),
            font.index,
        );
        self.ctx.set_transform(
            vello_cpu::kurbo::Affine::scale(self.scale)
                * vello_cpu::kurbo::Affine::translate((x, y)),
        );
        self.ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
        for line in layout.lines() {
            for item in line.items() {
                let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                    continue;
                };
                let brush = run.style().brush;
                self.ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
                    brush.r, brush.g, brush.b, brush.a,
                ));
                let glyphs = run.positioned_glyphs().map(|g| vello_cpu::Glyph {
                    id: g.id,
                    x: g.x,
                    y: g.y,
                });
                self.ctx
                    .glyph_run(&cpu_font)
                    .font_size(run.run().font_size())
                    .fill_glyphs(glyphs);
            }
        }
        self.ctx
            .set_transform(vello_cpu::kurbo::Affine::scale(self.scale));
        self.dirty = true;
        Ok(())
    }

    fn set_shadow(&mut self, shadow: Option<Shadow>) {
        if let Err(e) = self.end_shadow() {
            tracing::error!(error = %e, "failed to composite shadow group");
        }
        self.shadow = shadow.map(|shadow| ShadowLayer {
            shadow,
            ctx: self.new_ctx(),
            dirty: false,
        });
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/cpu.rs"]
mod tests;
