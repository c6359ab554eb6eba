use crate::foundation::core::{Point, Rgb8};
use crate::foundation::error::{PixelflowError, PixelflowResult};

/// One premultiplied RGBA8 pixel.
pub(crate) type PremulRgba8 = [u8; 4];

/// `a * b / 255`, rounded to nearest.
fn scale255(a: u8, b: u8) -> u8 {
    ((u32::from(a) * u32::from(b) + 127) / 255) as u8
}

/// Porter-Duff source-over of premultiplied `src` onto `dst`, with `src` faded by `opacity`.
pub(crate) fn over(dst: PremulRgba8, src: PremulRgba8, opacity: f32) -> PremulRgba8 {
    let fade = (opacity.clamp(0.0, 1.0) * 255.0).round() as u8;
    let src_alpha = scale255(src[3], fade);
    if src_alpha == 0 {
        return dst;
    }
    let keep = 255 - src_alpha;
    std::array::from_fn(|i| {
        let s = if i == 3 { src_alpha } else { scale255(src[i], fade) };
        s.saturating_add(scale255(dst[i], keep))
    })
}

/// [`over`] applied pixel by pixel to two same-sized premultiplied RGBA8 buffers.
pub(crate) fn over_in_place(dst: &mut [u8], src: &[u8], opacity: f32) -> PixelflowResult<()> {
    if dst.len() != src.len() || !dst.len().is_multiple_of(4) {
        return Err(PixelflowError::render(
            "premultiplied buffers must match and hold whole pixels",
        ));
    }
    for (d, s) in dst.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
        let out = over([d[0], d[1], d[2], d[3]], [s[0], s[1], s[2], s[3]], opacity);
        d.copy_from_slice(&out);
    }
    Ok(())
}

/// Composite `src` translated by `(dx, dy)` device pixels; pixels shifted off the canvas are
/// dropped.
pub(crate) fn over_offset_in_place(
    dst: &mut [u8],
    src: &[u8],
    width: u32,
    height: u32,
    offset: (i32, i32),
    opacity: f32,
) -> PixelflowResult<()> {
    let expected = (width as usize) * (height as usize) * 4;
    if dst.len() != expected || src.len() != expected {
        return Err(PixelflowError::render(
            "over_offset_in_place expects width*height rgba8 buffers",
        ));
    }
    if offset == (0, 0) {
        return over_in_place(dst, src, opacity);
    }

    let (dx, dy) = offset;
    let (w, h) = (width as i32, height as i32);
    for y in 0..h {
        let sy = y - dy;
        if sy < 0 || sy >= h {
            continue;
        }
        for x in 0..w {
            let sx = x - dx;
            if sx < 0 || sx >= w {
                continue;
            }
            let si = ((sy * w + sx) as usize) * 4;
            let di = ((y * w + x) as usize) * 4;
            let s = [src[si], src[si + 1], src[si + 2], src[si + 3]];
            if s[3] == 0 {
                continue;
            }
            let out = over([dst[di], dst[di + 1], dst[di + 2], dst[di + 3]], s, opacity);
            dst[di..di + 4].copy_from_slice(&out);
        }
    }
    Ok(())
}

/// Radii of `passes` box filters whose convolution approximates a Gaussian of `sigma`.
pub(crate) fn box_radii_for_gauss(sigma: f32, passes: usize) -> Vec<u32> {
    if !sigma.is_finite() || sigma <= 0.0 || passes == 0 {
        return Vec::new();
    }
    let n = passes as f32;
    let ideal = (12.0 * sigma * sigma / n + 1.0).sqrt();
    let mut lower = ideal.floor() as i32;
    if lower % 2 == 0 {
        lower -= 1;
    }
    let lower = lower.max(1);
    let upper = lower + 2;
    let (lf, nf) = (lower as f32, n);
    let m_ideal = (12.0 * sigma * sigma - nf * lf * lf - 4.0 * nf * lf - 3.0 * nf) / (-4.0 * lf - 4.0);
    let m = m_ideal.round().clamp(0.0, n) as usize;

    (0..passes)
        .map(|i| if i < m { lower } else { upper })
        .map(|size| ((size - 1) / 2) as u32)
        .collect()
}

/// Approximate Gaussian blur of a premultiplied buffer (three box passes per axis).
///
/// Pixels outside the buffer count as transparent, so content fades toward the edges.
pub(crate) fn blur_rgba8_premul(buf: &mut [u8], width: u32, height: u32, sigma: f32) {
    let radii = box_radii_for_gauss(sigma, 3);
    if radii.iter().all(|&r| r == 0) || width == 0 || height == 0 {
        return;
    }
    let mut tmp = vec![0u8; buf.len()];
    for r in radii {
        if r == 0 {
            continue;
        }
        horizontal_box(buf, &mut tmp, width, height, r);
        vertical_box(&tmp, buf, width, height, r);
    }
}

fn horizontal_box(src: &[u8], dst: &mut [u8], width: u32, height: u32, radius: u32) {
    let w = width as i64;
    let r = i64::from(radius);
    let len = (2 * r + 1) as u32;
    for y in 0..height as i64 {
        let row = (y * w) as usize * 4;
        let mut acc = [0u32; 4];
        for x in 0..=r.min(w - 1) {
            let i = row + x as usize * 4;
            for c in 0..4 {
                acc[c] += u32::from(src[i + c]);
            }
        }
        for x in 0..w {
            let o = row + x as usize * 4;
            for c in 0..4 {
                dst[o + c] = ((acc[c] + len / 2) / len) as u8;
            }
            let add = x + r + 1;
            if add < w {
                let i = row + add as usize * 4;
                for c in 0..4 {
                    acc[c] += u32::from(src[i + c]);
                }
            }
            let sub = x - r;
            if sub >= 0 {
                let i = row + sub as usize * 4;
                for c in 0..4 {
                    acc[c] -= u32::from(src[i + c]);
                }
            }
        }
    }
}

fn vertical_box(src: &[u8], dst: &mut [u8], width: u32, height: u32, radius: u32) {
    let (w, h) = (width as i64, height as i64);
    let r = i64::from(radius);
    let len = (2 * r + 1) as u32;
    let at = |x: i64, y: i64| ((y * w + x) as usize) * 4;
    for x in 0..w {
        let mut acc = [0u32; 4];
        for y in 0..=r.min(h - 1) {
            let i = at(x, y);
            for c in 0..4 {
                acc[c] += u32::from(src[i + c]);
            }
        }
        for y in 0..h {
            let o = at(x, y);
            for c in 0..4 {
                dst[o + c] = ((acc[c] + len / 2) / len) as u8;
            }
            let add = y + r + 1;
            if add < h {
                let i = at(x, add);
                for c in 0..4 {
                    acc[c] += u32::from(src[i + c]);
                }
            }
            let sub = y - r;
            if sub >= 0 {
                let i = at(x, sub);
                for c in 0..4 {
                    acc[c] -= u32::from(src[i + c]);
                }
            }
        }
    }
}

/// Convert premultiplied RGBA8 back to straight alpha.
pub(crate) fn unpremultiply_in_place(buf: &mut [u8]) {
    for px in buf.chunks_exact_mut(4) {
        let a = u32::from(px[3]);
        if a == 0 {
            px[..3].fill(0);
            continue;
        }
        if a == 255 {
            continue;
        }
        for c in 0..3 {
            px[c] = ((u32::from(px[c]) * 255 + a / 2) / a).min(255) as u8;
        }
    }
}

/// Sample a piecewise-linear color ramp at `t`.
pub(crate) fn ramp_at(stops: &[(f32, Rgb8)], t: f32) -> Rgb8 {
    let Some(&(first_t, first)) = stops.first() else {
        return Rgb8::BLACK;
    };
    if t <= first_t {
        return first;
    }
    for pair in stops.windows(2) {
        let (t0, c0) = pair[0];
        let (t1, c1) = pair[1];
        if t <= t1 {
            let span = t1 - t0;
            let f = if span <= 0.0 { 1.0 } else { (t - t0) / span };
            let lerp = |a: u8, b: u8| -> u8 {
                let (af, bf) = (f32::from(a), f32::from(b));
                (af + (bf - af) * f).round().clamp(0.0, 255.0) as u8
            };
            return Rgb8::new(lerp(c0.r, c1.r), lerp(c0.g, c1.g), lerp(c0.b, c1.b));
        }
    }
    stops.last().map(|&(_, c)| c).unwrap_or(first)
}

/// Opaque linear gradient over a `width`×`height` device buffer.
///
/// `start`/`end` are canvas units; device pixel centers are mapped back through `scale`.
pub(crate) fn linear_gradient_rgba8(
    width: u32,
    height: u32,
    scale: f64,
    start: Point,
    end: Point,
    stops: &[(f32, Rgb8)],
) -> Vec<u8> {
    let mut bytes = vec![0u8; (width as usize) * (height as usize) * 4];
    let d = end - start;
    let len2 = d.hypot2();
    for y in 0..height {
        for x in 0..width {
            let p = Point::new(
                (f64::from(x) + 0.5) / scale,
                (f64::from(y) + 0.5) / scale,
            );
            let t = if len2 <= 0.0 {
                0.0
            } else {
                ((p - start).dot(d) / len2).clamp(0.0, 1.0)
            };
            let c = ramp_at(stops, t as f32);
            let idx = ((y as usize) * (width as usize) + (x as usize)) * 4;
            bytes[idx..idx + 4].copy_from_slice(&[c.r, c.g, c.b, 255]);
        }
    }
    bytes
}

#[cfg(test)]
#[path = "../../tests/unit/render/raster.rs"]
mod tests;
