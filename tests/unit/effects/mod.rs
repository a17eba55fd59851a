use super::*;
use crate::foundation::core::{Rgb8, Rgba8};

fn sample_variant() -> (RasterBuffer, Mask) {
    let mut img = RasterBuffer::new(40, 24);
    let mut mask = Mask::new(40, 24);
    for y in 6..18 {
        for x in 8..32 {
            img.set_pixel(x, y, Rgba8::new(250, 250, 250, 255));
            mask.data_mut()[(y * 40 + x) as usize] = 255;
        }
    }
    (img, mask)
}

fn every_effect() -> Vec<Effect> {
    vec![
        Effect::InnerGlow(InnerGlow::default()),
        Effect::BevelEmboss(BevelEmboss::default()),
        Effect::Chrome(Chrome::default()),
        Effect::InnerShadow(InnerShadow::default()),
        Effect::TextureFill(TextureFill {
            source: Some(TextureSource::Procedural(ProceduralTexture {
                width: 16,
                height: 16,
                roughness: 2,
                ..ProceduralTexture::default()
            })),
            ..TextureFill::default()
        }),
        Effect::GradientOverlay(GradientOverlay::default()),
    ]
}

#[test]
fn all_disabled_is_bit_identical() {
    let (img, mask) = sample_variant();
    let specs: Vec<EffectSpec> = every_effect().into_iter().map(EffectSpec::disabled).collect();
    let stack = EffectStack::new(&specs, 4);
    assert!(stack.is_empty());
    assert_eq!(stack.apply(&img, &mask), img);
}

#[test]
fn stack_order_is_fixed_regardless_of_declaration() {
    let specs: Vec<EffectSpec> = every_effect().into_iter().map(EffectSpec::enabled).collect();
    let stack = EffectStack::new(&specs, 0);
    let names: Vec<&str> = stack.effects().iter().map(Effect::name).collect();
    assert_eq!(
        names,
        [
            "chrome",
            "gradient_overlay",
            "texture_fill",
            "bevel_emboss",
            "inner_shadow",
            "inner_glow"
        ]
    );
    // Procedural sources are rendered once up front.
    assert!(stack.effects().iter().any(|e| matches!(
        e,
        Effect::TextureFill(TextureFill {
            source: Some(TextureSource::Image(_)),
            ..
        })
    )));
}

#[test]
fn wide_strokes_erode_the_fill_mask() {
    let (_, mask) = sample_variant();
    let thin = EffectStack::new(&[], 1);
    assert_eq!(thin.fill_mask(&mask), mask);

    // stroke 4 -> size 7 -> 3px shrink on every side
    let wide = EffectStack::new(&[], 4);
    let fill = wide.fill_mask(&mask);
    assert_eq!(fill.get(10, 12), 0);
    assert_eq!(fill.get(11, 12), 255);
    assert_eq!(fill.get(28, 12), 255);
    assert_eq!(fill.get(29, 12), 0);
}

#[test]
fn gradient_with_eroded_mask_keeps_the_stroke_color() {
    let (img, mask) = sample_variant();
    let red = Rgb8::new(255, 0, 0);
    let spec = EffectSpec::enabled(Effect::GradientOverlay(GradientOverlay {
        colors: smallvec::smallvec![red, red],
        angle: 0.0,
        opacity: 1.0,
    }));
    let out = EffectStack::new(&[spec], 4).apply(&img, &mask);
    assert_eq!(out.pixel(8, 12), Some(Rgba8::new(250, 250, 250, 255)));
    assert_eq!(out.pixel(20, 12), Some(Rgba8::new(255, 0, 0, 255)));
}

#[test]
fn enabled_effects_change_the_raster_inside_only() {
    let (img, mask) = sample_variant();
    let specs: Vec<EffectSpec> = every_effect().into_iter().map(EffectSpec::enabled).collect();
    let out = EffectStack::new(&specs, 2).apply(&img, &mask);
    assert_ne!(out, img);
    assert_eq!(out.pixel(1, 1), img.pixel(1, 1));
}

#[test]
fn mismatched_mask_skips_effects() {
    let (img, _) = sample_variant();
    let specs = vec![EffectSpec::enabled(Effect::InnerGlow(InnerGlow::default()))];
    let out = EffectStack::new(&specs, 0).apply(&img, &Mask::new(3, 3));
    assert_eq!(out, img);
}

#[test]
fn specs_parse_from_json() {
    let json = r#"[
        {"kind": "inner_shadow", "offset": [1, 2]},
        {"kind": "gradient_overlay", "enabled": false, "colors": [[1, 2, 3], [4, 5, 6]]},
        {"kind": "bevel_emboss", "style": "emboss", "depth": 5},
        {"kind": "chrome"}
    ]"#;
    let specs: Vec<EffectSpec> = serde_json::from_str(json).unwrap();
    assert_eq!(specs.len(), 4);
    assert!(specs[0].enabled);
    assert_eq!(
        specs[0].effect,
        Effect::InnerShadow(InnerShadow {
            offset: (1, 2),
            ..InnerShadow::default()
        })
    );
    assert!(!specs[1].enabled);
    let Effect::BevelEmboss(bevel) = &specs[2].effect else {
        panic!("expected bevel");
    };
    assert_eq!(bevel.style, BevelStyle::Emboss);
    assert_eq!(bevel.depth, 5.0);
    assert_eq!(specs[3].effect, Effect::Chrome(Chrome::default()));
}

#[test]
fn inner_edges_follow_the_full_mask_under_wide_strokes() {
    let (img, mask) = sample_variant();
    let dark = Rgba8::new(40, 40, 40, 255);
    let mut dark_img = img.clone();
    for px in dark_img.data_mut().chunks_exact_mut(4) {
        if px[3] == 255 {
            px.copy_from_slice(&dark.to_array());
        }
    }
    let wide = EffectStack::new(
        &[
            EffectSpec::enabled(Effect::InnerShadow(InnerShadow::default())),
            EffectSpec::enabled(Effect::InnerGlow(InnerGlow::default())),
        ],
        4,
    );
    let eroded = wide.fill_mask(&mask);
    assert_ne!(eroded, mask);

    let full = EffectMasks {
        text: &mask,
        fill: &mask,
    };
    let expected = InnerGlow::default().apply(&InnerShadow::default().apply(&dark_img, full), full);
    assert_eq!(wide.apply(&dark_img, &mask), expected);

    let from_eroded = EffectMasks {
        text: &mask,
        fill: &eroded,
    };
    let shadow_only = EffectStack::new(
        &[EffectSpec::enabled(Effect::InnerShadow(InnerShadow::default()))],
        4,
    );
    assert_ne!(
        shadow_only.apply(&img, &mask),
        InnerShadow::default().apply(&img, from_eroded)
    );
}
