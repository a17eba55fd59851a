use super::*;
use crate::foundation::core::Rgba8;
use crate::raster::mask::Mask;

#[test]
fn preset_parameters_match_the_metallic_bundle() {
    let chrome = Chrome::default();
    let g = chrome.gradient();
    assert_eq!(g.colors.len(), 9);
    assert_eq!(g.angle, 90.0);
    assert!((g.opacity - 0.9).abs() < 1e-6);

    let b = chrome.bevel();
    assert_eq!(b.style, BevelStyle::InnerBevel);
    assert_eq!(b.depth, 8.0);
    assert_eq!(b.angle, 135.0);
    assert_eq!(b.shadow_color, Rgb8::new(20, 20, 45));
    assert_eq!(b.highlight_opacity, 1.0);
    assert!((b.shadow_opacity - 0.675).abs() < 1e-6);
    assert_eq!(b.soften, 1.0);
}

#[test]
fn chrome_only_paints_inside_the_mask() {
    let mut m = Mask::new(48, 48);
    for y in 12..36 {
        for x in 12..36 {
            m.data_mut()[y * 48 + x] = 255;
        }
    }
    let img = RasterBuffer::filled(48, 48, Rgba8::new(255, 0, 0, 255));
    let out = Chrome::default().apply(&img, EffectMasks { text: &m, fill: &m });
    assert_eq!(out.pixel(2, 2), Some(Rgba8::new(255, 0, 0, 255)));
    let inside = out.pixel(24, 24).unwrap();
    assert!(inside.g > 0 && inside.b > 0, "{inside:?}");
}
