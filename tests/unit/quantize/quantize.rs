use super::*;
use image::{ImageFormat, Rgba};

fn solid(w: u32, h: u32, px: [u8; 4]) -> RgbaImage {
    RgbaImage::from_pixel(w, h, Rgba(px))
}

fn png_bytes(img: &RgbaImage) -> Vec<u8> {
    let mut out = std::io::Cursor::new(Vec::new());
    DynamicImage::ImageRgba8(img.clone())
        .write_to(&mut out, ImageFormat::Png)
        .unwrap();
    out.into_inner()
}

#[test]
fn landscape_fit_is_centred_vertically() {
    let fit = ContainFit::compute(200, 100, 50);
    assert_eq!(fit.width, 50.0);
    assert_eq!(fit.height, 25.0);
    assert_eq!(fit.offset_x, 0.0);
    assert_eq!(fit.offset_y, 12.5);

    let q = quantize_rgba(&solid(200, 100, [200, 10, 10, 255]), GridSize::Fifty).unwrap();
    assert_eq!(q.cells.len(), 50 * 25);

    let rows: std::collections::BTreeSet<u32> = q.cells.iter().map(|c| c.row).collect();
    assert_eq!(rows.first(), Some(&13));
    assert_eq!(rows.last(), Some(&37));
    assert_eq!(rows.len(), 25);
    // 13 empty rows at the bottom (0..=12) and 12 at the top (38..=49).
    assert!(q.cells.iter().all(|c| c.row >= 13 && c.row <= 37));
}

#[test]
fn portrait_fit_is_centred_horizontally() {
    let fit = ContainFit::compute(100, 200, 100);
    assert_eq!(fit.width, 50.0);
    assert_eq!(fit.height, 100.0);
    assert_eq!(fit.offset_x, 25.0);

    let q = quantize_rgba(&solid(100, 200, [1, 2, 3, 255]), GridSize::Hundred).unwrap();
    assert_eq!(q.cells.len(), 50 * 100);
    assert!(q.cells.iter().all(|c| c.column >= 25 && c.column < 75));
}

#[test]
fn alpha_threshold_is_exclusive() {
    let q = quantize_rgba(&solid(1, 1, [9, 9, 9, 50]), GridSize::Fifty).unwrap();
    assert!(q.cells.is_empty());
    assert_eq!(q.theme_color, DEFAULT_THEME_COLOR);

    let q = quantize_rgba(&solid(1, 1, [9, 9, 9, 51]), GridSize::Fifty).unwrap();
    assert_eq!(q.cells.len(), 2500);
    assert_eq!(q.theme_color, Rgb8::new(9, 9, 9));
}

#[test]
fn rows_are_flipped_to_bottom_up() {
    let mut img = solid(50, 50, [0, 0, 0, 0]);
    img.put_pixel(0, 0, Rgba([255, 0, 0, 255]));
    img.put_pixel(49, 49, Rgba([0, 255, 0, 255]));

    let q = quantize_rgba(&img, GridSize::Fifty).unwrap();
    assert_eq!(q.cells.len(), 2);
    assert_eq!(q.cells.color_at(0, 49), Some(Rgb8::new(255, 0, 0)));
    assert_eq!(q.cells.color_at(49, 0), Some(Rgb8::new(0, 255, 0)));
}

#[test]
fn nearest_neighbour_keeps_flat_colors() {
    let mut img = solid(2, 2, [255, 0, 0, 255]);
    img.put_pixel(1, 0, Rgba([0, 0, 255, 255]));
    img.put_pixel(0, 1, Rgba([0, 255, 0, 255]));
    img.put_pixel(1, 1, Rgba([255, 255, 0, 255]));

    let q = quantize_rgba(&img, GridSize::Fifty).unwrap();
    let distinct: std::collections::HashSet<Rgb8> = q.cells.iter().map(|c| c.color).collect();
    assert_eq!(distinct.len(), 4, "no blended colors may appear");
}

#[test]
fn theme_skips_white_even_when_most_frequent() {
    let mut img = solid(50, 50, [255, 255, 255, 255]);
    for y in 25..50 {
        for x in 0..50 {
            let px = if x < 28 {
                [30, 60, 200, 255]
            } else {
                [200, 30, 30, 255]
            };
            img.put_pixel(x, y, Rgba(px));
        }
    }

    let q = quantize_rgba(&img, GridSize::Fifty).unwrap();
    assert_eq!(q.theme_color, Rgb8::new(30, 60, 200));
}

#[test]
fn theme_falls_back_when_only_black_and_white() {
    let mut img = solid(50, 50, [0, 0, 0, 255]);
    img.put_pixel(3, 3, Rgba([255, 255, 255, 255]));
    let q = quantize_rgba(&img, GridSize::Fifty).unwrap();
    assert_eq!(q.theme_color, DEFAULT_THEME_COLOR);
}

#[test]
fn theme_tie_prefers_first_seen_color() {
    let mut img = solid(50, 50, [0, 0, 0, 0]);
    img.put_pixel(0, 0, Rgba([10, 20, 30, 255]));
    img.put_pixel(1, 0, Rgba([40, 50, 60, 255]));
    let q = quantize_rgba(&img, GridSize::Fifty).unwrap();
    assert_eq!(q.theme_color, Rgb8::new(10, 20, 30));
}

#[test]
fn bytes_roundtrip_through_decoder() {
    let bytes = png_bytes(&solid(4, 4, [12, 34, 56, 255]));
    let q = quantize_bytes(&bytes, GridSize::Fifty).unwrap();
    assert_eq!(q.cells.len(), 2500);
    assert_eq!(q.theme_color, Rgb8::new(12, 34, 56));
}

#[test]
fn undecodable_bytes_report_decode_failure() {
    let err = quantize_bytes(b"definitely not an image", GridSize::Fifty).unwrap_err();
    assert!(matches!(err, PixelflowError::Decode(_)));

    let err = quantize_path(Path::new("does/not/exist.png"), GridSize::Fifty).unwrap_err();
    assert!(matches!(err, PixelflowError::Decode(_)));
}
