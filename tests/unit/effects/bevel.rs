use super::*;
use crate::foundation::core::Rgba8;

fn square_mask() -> Mask {
    let mut m = Mask::new(40, 40);
    for y in 10..30 {
        for x in 10..30 {
            m.data_mut()[y * 40 + x] = 255;
        }
    }
    m
}

fn gray() -> RasterBuffer {
    RasterBuffer::filled(40, 40, Rgba8::new(128, 128, 128, 255))
}

fn run(fx: &BevelEmboss, m: &Mask) -> RasterBuffer {
    fx.apply(&gray(), EffectMasks { text: m, fill: m })
}

#[test]
fn light_from_the_right_lifts_the_right_edge() {
    let m = square_mask();
    let fx = BevelEmboss {
        angle: 0.0,
        ..BevelEmboss::default()
    };
    let out = run(&fx, &m);
    assert!(out.pixel(28, 20).unwrap().r > 128);
    assert!(out.pixel(11, 20).unwrap().r < 128);
}

#[test]
fn inner_bevel_never_touches_outside_pixels() {
    let m = square_mask();
    let out = run(&BevelEmboss::default(), &m);
    for y in 0..40u32 {
        for x in 0..40u32 {
            if m.get(x, y) == 0 {
                assert_eq!(out.pixel(x, y), Some(Rgba8::new(128, 128, 128, 255)));
            }
        }
    }
    assert_ne!(out, gray());
}

#[test]
fn outer_bevel_never_touches_inside_pixels() {
    let m = square_mask();
    let fx = BevelEmboss {
        style: BevelStyle::OuterBevel,
        ..BevelEmboss::default()
    };
    let out = run(&fx, &m);
    for y in 10..30u32 {
        for x in 10..30u32 {
            assert_eq!(out.pixel(x, y), Some(Rgba8::new(128, 128, 128, 255)));
        }
    }
    assert_ne!(out, gray());
}

#[test]
fn style_parses_snake_case() {
    let s: BevelStyle = serde_json::from_str("\"outer_bevel\"").unwrap();
    assert_eq!(s, BevelStyle::OuterBevel);
}
