use super::*;
use crate::foundation::core::Rgba8;
use crate::raster::mask::Mask;

fn masks(m: &Mask) -> EffectMasks<'_> {
    EffectMasks { text: m, fill: m }
}

#[test]
fn blend_formulas() {
    let (a, b) = (0.25f32, 0.5f32);
    assert_eq!(BlendMode::Normal.blend(a, b), b);
    assert!((BlendMode::Multiply.blend(a, b) - 0.125).abs() < 1e-6);
    assert!((BlendMode::Screen.blend(a, b) - 0.625).abs() < 1e-6);
    assert!((BlendMode::Overlay.blend(a, b) - 0.25).abs() < 1e-6);
    assert!((BlendMode::Overlay.blend(0.75, 0.5) - 0.75).abs() < 1e-6);
    assert_eq!(BlendMode::Overlay.blend(1.0, 0.0), 1.0);
    assert_eq!(BlendMode::Overlay.blend(0.0, 1.0), 0.0);
}

#[test]
fn missing_texture_is_a_noop() {
    let img = RasterBuffer::filled(4, 4, Rgba8::new(10, 20, 30, 255));
    let m = Mask::filled(4, 4, 255);
    let fx = TextureFill {
        source: Some(TextureSource::Path(
            std::env::temp_dir().join("kinetext_missing_texture_tile.png"),
        )),
        ..TextureFill::default()
    };
    assert_eq!(fx.apply(&img, masks(&m)), img);
}

#[test]
fn resolve_source_drops_unloadable_paths() {
    let mut fx = TextureFill {
        source: Some(TextureSource::Path(
            std::env::temp_dir().join("kinetext_missing_texture_tile.png"),
        )),
        ..TextureFill::default()
    };
    fx.resolve_source();
    assert_eq!(fx.source, None);
}

#[test]
fn normal_blend_at_full_opacity_tiles_the_texture() {
    let mut tile = RasterBuffer::filled(2, 1, Rgba8::new(200, 0, 0, 255));
    tile.set_pixel(1, 0, Rgba8::new(0, 200, 0, 255));
    let img = RasterBuffer::filled(5, 2, Rgba8::new(1, 2, 3, 255));
    let mut m = Mask::filled(5, 2, 255);
    m.data_mut()[0] = 0;
    let fx = TextureFill {
        source: Some(TextureSource::Image(Arc::new(tile))),
        opacity: 1.0,
        blend_mode: BlendMode::Normal,
        ..TextureFill::default()
    };
    let out = fx.apply(&img, masks(&m));
    assert_eq!(out.pixel(0, 0), Some(Rgba8::new(1, 2, 3, 255)));
    assert_eq!(out.pixel(1, 0), Some(Rgba8::new(0, 200, 0, 255)));
    assert_eq!(out.pixel(2, 1), Some(Rgba8::new(200, 0, 0, 255)));
    assert_eq!(out.pixel(4, 1), Some(Rgba8::new(200, 0, 0, 255)));
}

#[test]
fn alpha_is_preserved() {
    let tile = RasterBuffer::filled(3, 3, Rgba8::new(255, 255, 255, 255));
    let img = RasterBuffer::filled(3, 3, Rgba8::new(100, 100, 100, 77));
    let m = Mask::filled(3, 3, 255);
    let fx = TextureFill {
        source: Some(TextureSource::Image(Arc::new(tile))),
        opacity: 0.5,
        blend_mode: BlendMode::Screen,
        ..TextureFill::default()
    };
    let out = fx.apply(&img, masks(&m));
    assert!(out.data().chunks_exact(4).all(|px| px[3] == 77));
    assert!(out.pixel(1, 1).unwrap().r > 100);
}

#[test]
fn procedural_source_loads() {
    let src = TextureSource::Procedural(ProceduralTexture {
        width: 8,
        height: 8,
        roughness: 1,
        ..ProceduralTexture::default()
    });
    let tile = src.load().unwrap();
    assert_eq!(tile.size(), (8, 8));
}

#[test]
fn resolved_tile_is_rescaled_once() {
    let fill = TextureFill {
        source: Some(TextureSource::Procedural(ProceduralTexture {
            width: 16,
            height: 16,
            roughness: 1,
            ..ProceduralTexture::default()
        })),
        scale: 0.5,
        opacity: 1.0,
        blend_mode: BlendMode::Normal,
    };
    let mut resolved = fill.clone();
    resolved.resolve_source();
    assert_eq!(resolved.scale, 1.0);
    let Some(TextureSource::Image(tile)) = &resolved.source else {
        panic!("expected a decoded tile, got {:?}", resolved.source);
    };
    assert_eq!(tile.size(), (8, 8));
    assert!(Arc::ptr_eq(&resolved.tile().unwrap(), tile));

    let img = RasterBuffer::filled(20, 12, Rgba8::new(90, 90, 90, 255));
    let m = Mask::filled(20, 12, 255);
    let once = resolved.apply(&img, masks(&m));
    assert_eq!(resolved.apply(&img, masks(&m)), once);
    assert_eq!(fill.apply(&img, masks(&m)), once);
}
