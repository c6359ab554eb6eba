use super::*;
use crate::foundation::core::Rgb8;

fn px(img: &image::RgbaImage, x: u32, y: u32) -> [u8; 4] {
    img.get_pixel(x, y).0
}

#[test]
fn rejects_degenerate_sizes() {
    assert!(CpuSurface::new(0, 10, 1.0).is_err());
    assert!(CpuSurface::new(70_000, 10, 1.0).is_err());
    assert!(CpuSurface::new(10, 10, 0.0).is_err());
}

#[test]
fn untouched_surface_is_transparent() {
    let img = CpuSurface::new(8, 8, 1.0).unwrap().finish().unwrap();
    assert!(img.pixels().all(|p| p.0 == [0, 0, 0, 0]));
}

#[test]
fn solid_rect_covers_its_pixels_only() {
    let mut s = CpuSurface::new(20, 20, 1.0).unwrap();
    s.fill_rect(
        Rect::new(0.0, 0.0, 10.0, 20.0),
        &Paint::rgb(Rgb8::new(200, 10, 10)),
    );
    let img = s.finish().unwrap();
    assert_eq!(px(&img, 2, 5), [200, 10, 10, 255]);
    assert_eq!(px(&img, 15, 5)[3], 0);
}

#[test]
fn scale_maps_canvas_units_to_device_pixels() {
    let mut s = CpuSurface::new(20, 20, 0.5).unwrap();
    s.fill_rect(
        Rect::new(0.0, 0.0, 20.0, 40.0),
        &Paint::rgb(Rgb8::new(0, 0, 255)),
    );
    let img = s.finish().unwrap();
    assert_eq!(px(&img, 5, 10), [0, 0, 255, 255]);
    assert_eq!(px(&img, 15, 10)[3], 0);
}

#[test]
fn circle_fills_center_not_corner() {
    let mut s = CpuSurface::new(20, 20, 1.0).unwrap();
    s.fill_circle(Point::new(10.0, 10.0), 6.0, &Paint::rgb(Rgb8::WHITE));
    let img = s.finish().unwrap();
    assert_eq!(px(&img, 10, 10), [255, 255, 255, 255]);
    assert_eq!(px(&img, 1, 1)[3], 0);
}

#[test]
fn gradient_paint_runs_from_start_to_end_color() {
    let mut s = CpuSurface::new(40, 40, 1.0).unwrap();
    let paint = Paint::LinearGradient {
        start: Point::new(0.0, 0.0),
        end: Point::new(40.0, 40.0),
        stops: vec![(0.0, Rgb8::new(0, 0, 0)), (1.0, Rgb8::new(250, 250, 250))],
    };
    s.fill_rect(Rect::new(0.0, 0.0, 40.0, 40.0), &paint);
    let img = s.finish().unwrap();
    let top_left = px(&img, 1, 1);
    let bottom_right = px(&img, 38, 38);
    assert_eq!(top_left[3], 255);
    assert!(top_left[0] < 30);
    assert!(bottom_right[0] > 220);
}

#[test]
fn shadow_group_darkens_outside_the_shape() {
    let mut s = CpuSurface::new(60, 60, 1.0).unwrap();
    s.fill_rect(Rect::new(0.0, 0.0, 60.0, 60.0), &Paint::rgb(Rgb8::WHITE));
    s.set_shadow(Some(Shadow {
        color: Rgba8::new(0, 0, 0, 0.5),
        blur: 0.0,
        offset: (0.0, 10.0),
    }));
    s.fill_rect(Rect::new(20.0, 10.0, 40.0, 30.0), &Paint::rgb(Rgb8::new(255, 0, 0)));
    s.set_shadow(None);
    let img = s.finish().unwrap();

    // body on top of its own shadow
    assert_eq!(px(&img, 30, 20), [255, 0, 0, 255]);
    // offset shadow below the body
    let shadow = px(&img, 30, 35);
    assert!(shadow[0] > 100 && shadow[0] < 160, "{shadow:?}");
    // untouched background
    assert_eq!(px(&img, 5, 5), [255, 255, 255, 255]);
}

#[test]
fn finish_composites_an_open_shadow_scope() {
    let mut s = CpuSurface::new(40, 40, 2.0).unwrap();
    s.set_shadow(Some(Shadow {
        color: Rgba8::new(0, 0, 0, 1.0),
        blur: 0.0,
        offset: (5.0, 0.0),
    }));
    s.fill_rect(Rect::new(0.0, 0.0, 5.0, 20.0), &Paint::rgb(Rgb8::WHITE));
    let img = s.finish().unwrap();

    // body covers device x 0..10, the shadow is shifted by 10 device pixels
    assert_eq!(px(&img, 5, 10), [255, 255, 255, 255]);
    assert_eq!(px(&img, 15, 10), [0, 0, 0, 255]);
    assert_eq!(px(&img, 25, 10)[3], 0);
}

#[test]
fn fills_after_shadow_scope_cast_nothing() {
    let mut s = CpuSurface::new(30, 30, 1.0).unwrap();
    s.set_shadow(Some(Shadow {
        color: Rgba8::new(0, 0, 0, 1.0),
        blur: 4.0,
        offset: (0.0, 0.0),
    }));
    s.set_shadow(None);
    s.fill_rect(Rect::new(10.0, 10.0, 20.0, 20.0), &Paint::rgb(Rgb8::WHITE));
    let img = s.finish().unwrap();
    assert_eq!(px(&img, 5, 5)[3], 0);
}

#[test]
fn stroke_draws_on_the_outline() {
    let mut s = CpuSurface::new(40, 40, 1.0).unwrap();
    s.stroke_rounded_rect(
        Rect::new(5.0, 5.0, 35.0, 35.0),
        4.0,
        4.0,
        Rgb8::new(0, 200, 0).opaque(),
    );
    let img = s.finish().unwrap();
    assert_eq!(px(&img, 20, 5), [0, 200, 0, 255]);
    assert_eq!(px(&img, 20, 20)[3], 0);
}

#[test]
fn text_without_font_is_skipped_not_fatal() {
    let mut s = CpuSurface::new(200, 80, 1.0).unwrap();
    let style = TextStyle {
        size: 24.0,
        bold: true,
        color: Rgb8::BLACK,
        align: TextAlign::Center,
    };
    s.fill_text("Hello", Point::new(100.0, 40.0), &style).unwrap();
    s.fill_text("", Point::new(100.0, 40.0), &style).unwrap();
    assert!(s.skipped_text() <= 1);
    assert!(s.finish().is_ok());
}
