use super::*;
use crate::foundation::core::Rgba8;
use crate::text::glyphs::BlockGlyphSource;

fn blocks(_: Option<&str>, _: f32) -> KinetextResult<Arc<dyn GlyphSource>> {
    Ok(Arc::new(BlockGlyphSource::default()))
}

const SCENE: &str = r#"{
    "canvas": {"width": 400, "height": 600},
    "fps": {"num": 10, "den": 1},
    "duration": 4.0,
    "background": {"solid": [10, 20, 30]},
    "elements": [
        {"kind": "solid", "size": [40, 40], "color": [255, 0, 0], "start": 1.0, "duration": 1.0},
        {"kind": "karaoke", "text": "one two three", "z": 2},
        {"kind": "overlay", "text": "Title", "start": 0.5, "duration": 1.0,
         "style": {"placement": "bottom"}}
    ]
}"#;

#[test]
fn parses_elements_and_defaults() {
    let scene = Scene::from_json(SCENE).unwrap();
    assert_eq!(scene.canvas, Canvas::new(400, 600));
    assert_eq!(scene.frame_count(), 40);
    assert_eq!(scene.background, Background::Solid(Rgb8::new(10, 20, 30)));
    assert_eq!(scene.elements.len(), 3);

    let karaoke = scene.elements[1].timing();
    assert_eq!(karaoke.start, 0.0);
    assert_eq!(karaoke.duration, None);
    assert_eq!(karaoke.z, 2);
    match &scene.elements[2] {
        Element::Overlay { style, .. } => {
            assert_eq!(style.placement, crate::text::overlay::OverlayPlacement::Bottom);
        }
        other => panic!("unexpected element {other:?}"),
    }
}

#[test]
fn minimal_scene_uses_default_fps_and_background() {
    let scene = Scene::from_json(r#"{"canvas": {"width": 8, "height": 8}, "duration": 1.0}"#)
        .unwrap();
    assert_eq!(scene.fps, Fps { num: 30, den: 1 });
    assert_eq!(scene.background, Background::Transparent);
    assert!(scene.elements.is_empty());
}

#[test]
fn malformed_json_is_a_serde_error() {
    let err = Scene::from_json("{").unwrap_err();
    assert!(matches!(err, KinetextError::Serde(_)));
}

#[test]
fn validation_rejects_bad_timing() {
    let mut scene = Scene::from_json(SCENE).unwrap();
    scene.duration = 0.0;
    assert!(scene.validate().is_err());

    let mut scene = Scene::from_json(SCENE).unwrap();
    scene.elements.push(Element::Solid {
        size: (0, 4),
        color: Rgb8::WHITE,
        position: ElementPosition::default(),
        timing: ElementTiming::default(),
    });
    assert!(scene.validate().is_err());

    let mut scene = Scene::from_json(SCENE).unwrap();
    scene.fps = Fps { num: 30, den: 0 };
    assert!(scene.validate().is_err());
}

#[test]
fn build_places_every_element() {
    let scene = Scene::from_json(SCENE).unwrap();
    let comp = scene.build_with(Path::new("."), &blocks).unwrap();
    assert_eq!(comp.size(), (400, 600));
    assert_eq!(comp.duration(), Some(4.0));
    // solid + one karaoke line + overlay
    assert_eq!(comp.layers().count(), 3);

    // The solid square is centered and visible during [1, 2).
    assert_eq!(comp.render(0.9).pixel(200, 300), Some(Rgba8::new(10, 20, 30, 255)));
    assert_eq!(comp.render(1.5).pixel(200, 300), Some(Rgba8::new(255, 0, 0, 255)));
    assert_eq!(comp.render(2.0).pixel(200, 300), Some(Rgba8::new(10, 20, 30, 255)));
}

#[test]
fn karaoke_element_spans_scene_duration() {
    let scene = Scene::from_json(SCENE).unwrap();
    let comp = scene.build_with(Path::new("."), &blocks).unwrap();
    let line = comp
        .layers()
        .find(|l| l.z() == 2)
        .expect("karaoke layer");
    // 5% lead-in of 4s, 90% speaking.
    assert!((line.span().start - 0.2).abs() < 1e-9);
    assert!((line.span().end.unwrap() - 3.8).abs() < 1e-9);
}

#[test]
fn missing_image_fails_to_build() {
    let scene = Scene::from_json(
        r#"{"canvas": {"width": 8, "height": 8}, "duration": 1.0,
            "elements": [{"kind": "image", "path": "does/not/exist.png"}]}"#,
    )
    .unwrap();
    let err = scene.build_with(Path::new("."), &blocks).unwrap_err();
    assert!(matches!(err, KinetextError::TextureLoad(_)));
}
