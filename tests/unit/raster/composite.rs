use super::*;

#[test]
fn over_transparent_source_is_noop() {
    let dst = Rgba8::new(10, 20, 30, 200);
    assert_eq!(over(dst, Rgba8::new(255, 0, 0, 0)), dst);
}

#[test]
fn over_opaque_source_replaces() {
    let src = Rgba8::new(1, 2, 3, 255);
    assert_eq!(over(Rgba8::new(200, 200, 200, 255), src), src);
}

#[test]
fn over_onto_transparent_keeps_source_color() {
    let out = over(Rgba8::TRANSPARENT, Rgba8::new(100, 150, 200, 128));
    assert_eq!(out, Rgba8::new(100, 150, 200, 128));
}

#[test]
fn over_half_alpha_on_opaque_averages() {
    let out = over(Rgba8::new(0, 0, 0, 255), Rgba8::new(255, 255, 255, 128));
    assert_eq!(out.a, 255);
    assert!((127..=129).contains(&out.r));
}

#[test]
fn blit_rect_clips_to_target() {
    assert_eq!(BlitRect::clip(10, 10, 4, 4, 10, 0), None);
    assert_eq!(BlitRect::clip(10, 10, 4, 4, -4, 0), None);
    let r = BlitRect::clip(10, 10, 4, 4, -1, 8).unwrap();
    assert_eq!(
        r,
        BlitRect {
            src_x: 1,
            src_y: 0,
            dst_x: 0,
            dst_y: 8,
            width: 3,
            height: 2,
        }
    );
    assert!(!r.is_uncropped(4, 4));
    assert!(BlitRect::clip(10, 10, 4, 4, 2, 2).unwrap().is_uncropped(4, 4));
}

#[test]
fn opaque_blit_replaces_rgb_only() {
    let mut dst = RasterBuffer::filled(3, 3, Rgba8::new(0, 0, 0, 7));
    let src = RasterBuffer::filled(2, 2, Rgba8::new(9, 8, 7, 0));
    let rect = BlitRect::clip(3, 3, 2, 2, 1, 1).unwrap();
    blit_opaque(&mut dst, &src, rect);
    assert_eq!(dst.pixel(2, 2), Some(Rgba8::new(9, 8, 7, 7)));
    assert_eq!(dst.pixel(0, 0), Some(Rgba8::new(0, 0, 0, 7)));
}

#[test]
fn masked_blit_interpolates() {
    let mut dst = RasterBuffer::filled(2, 1, Rgba8::new(0, 0, 0, 255));
    let src = RasterBuffer::filled(2, 1, Rgba8::new(255, 255, 255, 255));
    let mask = Mask::from_raw(2, 1, vec![0, 255]).unwrap();
    let rect = BlitRect::clip(2, 1, 2, 1, 0, 0).unwrap();
    blit_masked(&mut dst, &src, &mask, rect);
    assert_eq!(dst.pixel(0, 0), Some(Rgba8::new(0, 0, 0, 255)));
    assert_eq!(dst.pixel(1, 0), Some(Rgba8::new(255, 255, 255, 255)));
}

#[test]
fn mask_union_saturates_toward_opaque() {
    let mut dst = Mask::from_raw(3, 1, vec![0, 128, 255]).unwrap();
    let src = Mask::filled(3, 1, 128);
    blit_mask_union(&mut dst, &src, BlitRect::clip(3, 1, 3, 1, 0, 0).unwrap());
    assert_eq!(dst.data()[0], 128);
    assert!((191..=192).contains(&dst.data()[1]));
    assert_eq!(dst.data()[2], 255);
}

#[test]
fn paste_uses_source_alpha_by_default() {
    let mut dst = RasterBuffer::filled(2, 1, Rgba8::new(0, 0, 0, 0));
    let mut src = RasterBuffer::filled(2, 1, Rgba8::new(200, 100, 50, 255));
    src.set_pixel(1, 0, Rgba8::new(200, 100, 50, 0));
    paste(&mut dst, &src, None, 0, 0);
    assert_eq!(dst.pixel(0, 0), Some(Rgba8::new(200, 100, 50, 255)));
    assert_eq!(dst.pixel(1, 0), Some(Rgba8::TRANSPARENT));
}

#[test]
fn paste_outside_is_dropped() {
    let mut dst = RasterBuffer::new(2, 2);
    let before = dst.clone();
    let src = RasterBuffer::filled(2, 2, Rgba8::new(1, 1, 1, 255));
    paste(&mut dst, &src, None, 5, 5);
    assert_eq!(dst, before);
}

#[test]
fn composite_color_applies_alpha_mask() {
    let mut dst = RasterBuffer::new(2, 1);
    let alpha = Mask::from_raw(2, 1, vec![255, 0]).unwrap();
    composite_color(&mut dst, Rgb8::new(5, 6, 7), &alpha);
    assert_eq!(dst.pixel(0, 0), Some(Rgba8::new(5, 6, 7, 255)));
    assert_eq!(dst.pixel(1, 0), Some(Rgba8::TRANSPARENT));
}
