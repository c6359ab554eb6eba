use super::*;

#[test]
fn over_opaque_source_replaces_destination() {
    assert_eq!(over([10, 20, 30, 255], [200, 100, 50, 255], 1.0), [200, 100, 50, 255]);
}

#[test]
fn over_with_zero_opacity_keeps_destination() {
    assert_eq!(over([10, 20, 30, 255], [200, 100, 50, 255], 0.0), [10, 20, 30, 255]);
}

#[test]
fn over_half_alpha_on_black() {
    // premultiplied white at 50%
    let out = over([0, 0, 0, 255], [128, 128, 128, 128], 1.0);
    assert_eq!(out[3], 255);
    assert_eq!(out[0], 128);
}

#[test]
fn over_in_place_rejects_mismatched_buffers() {
    let mut dst = vec![0u8; 8];
    assert!(over_in_place(&mut dst, &[0u8; 4], 1.0).is_err());
}

#[test]
fn offset_over_shifts_pixels() {
    let mut dst = vec![0u8; 3 * 3 * 4];
    let mut src = vec![0u8; 3 * 3 * 4];
    src[0..4].copy_from_slice(&[255, 0, 0, 255]);
    over_offset_in_place(&mut dst, &src, 3, 3, (1, 2), 1.0).unwrap();
    let idx = (2 * 3 + 1) * 4;
    assert_eq!(&dst[idx..idx + 4], &[255, 0, 0, 255]);
    assert_eq!(&dst[0..4], &[0, 0, 0, 0]);
}

#[test]
fn box_radii_grow_with_sigma() {
    assert!(box_radii_for_gauss(0.0, 3).is_empty());
    let small = box_radii_for_gauss(2.0, 3);
    let large = box_radii_for_gauss(60.0, 3);
    assert_eq!(small.len(), 3);
    assert!(large.iter().sum::<u32>() > small.iter().sum::<u32>());
    assert!(large.windows(2).all(|w| w[0] <= w[1]));
}

#[test]
fn blur_spreads_a_point_and_keeps_mass_roughly() {
    let (w, h) = (41u32, 41u32);
    let mut buf = vec![0u8; (w * h * 4) as usize];
    for y in 15..26 {
        for x in 15..26 {
            let i = ((y * w + x) * 4) as usize;
            buf[i..i + 4].copy_from_slice(&[255, 255, 255, 255]);
        }
    }
    let before: u64 = buf.iter().skip(3).step_by(4).map(|&a| u64::from(a)).sum();
    blur_rgba8_premul(&mut buf, w, h, 3.0);
    let after: u64 = buf.iter().skip(3).step_by(4).map(|&a| u64::from(a)).sum();

    let center = ((20 * w + 20) * 4 + 3) as usize;
    let outside = ((20 * w + 12) * 4 + 3) as usize;
    assert!(buf[center] > 150);
    assert!(buf[outside] > 0);
    let diff = before.abs_diff(after) as f64 / before as f64;
    assert!(diff < 0.05, "mass drifted by {diff}");
}

#[test]
fn blur_fades_toward_transparent_edges() {
    let (w, h) = (20u32, 20u32);
    let mut buf = vec![255u8; (w * h * 4) as usize];
    blur_rgba8_premul(&mut buf, w, h, 2.0);
    assert!(buf[3] < 255);
    let center = ((10 * w + 10) * 4 + 3) as usize;
    assert_eq!(buf[center], 255);
}

#[test]
fn unpremultiply_restores_straight_color() {
    let mut px = vec![64, 32, 0, 128, 9, 9, 9, 0];
    unpremultiply_in_place(&mut px);
    assert_eq!(px[3], 128);
    assert!((i32::from(px[0]) - 128).abs() <= 1);
    assert_eq!(&px[4..], &[0, 0, 0, 0]);
}

#[test]
fn ramp_interpolates_between_stops() {
    let stops = [
        (0.0, Rgb8::new(0, 0, 0)),
        (0.5, Rgb8::new(100, 100, 100)),
        (1.0, Rgb8::new(0, 0, 0)),
    ];
    assert_eq!(ramp_at(&stops, 0.0), Rgb8::new(0, 0, 0));
    assert_eq!(ramp_at(&stops, 0.25), Rgb8::new(50, 50, 50));
    assert_eq!(ramp_at(&stops, 0.5), Rgb8::new(100, 100, 100));
    assert_eq!(ramp_at(&stops, 2.0), Rgb8::new(0, 0, 0));
}

#[test]
fn diagonal_gradient_corners_hit_end_stops() {
    let stops = [(0.0, Rgb8::new(0, 0, 0)), (1.0, Rgb8::new(255, 255, 255))];
    let buf = linear_gradient_rgba8(
        10,
        10,
        1.0,
        Point::new(0.0, 0.0),
        Point::new(10.0, 10.0),
        &stops,
    );
    assert!(buf[0] < 20);
    let last = buf.len() - 4;
    assert!(buf[last] > 235);
    assert!(buf.iter().skip(3).step_by(4).all(|&a| a == 255));
}
