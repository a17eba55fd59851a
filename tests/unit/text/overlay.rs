use super::*;
use crate::foundation::core::Rgba8;
use crate::text::glyphs::BlockGlyphSource;

#[test]
fn caption_size_follows_wrapping() {
    let g = BlockGlyphSource::default();
    let style = StaticTextStyle::default();
    let one = render_static_text("hi there", 400, &g, &style);
    // width - 150 + 2 * 20; one line of 65 + 20 plus 2 * 20 padding.
    assert_eq!(one.size(), (290, 125));

    let two = render_static_text(
        "one two three four five six seven eight nine ten",
        400,
        &g,
        &style,
    );
    assert_eq!(two.size(), (290, 2 * 85 + 40));
}

#[test]
fn caption_box_is_translucent_black_behind_white_text() {
    let g = BlockGlyphSource::default();
    let img = render_static_text("hi there", 400, &g, &StaticTextStyle::default());
    // Box spans x 65..226; the 80px line starts at x 105.
    assert_eq!(img.pixel(86, 60), Some(Rgba8::new(0, 0, 0, 191)));
    assert_eq!(img.pixel(10, 60), Some(Rgba8::TRANSPARENT));
    assert_eq!(img.pixel(110, 28), Some(Rgba8::new(255, 255, 255, 255)));
}

#[test]
fn caption_opacity_zero_leaves_only_text() {
    let g = BlockGlyphSource::default();
    let style = StaticTextStyle {
        bg_opacity: 0.0,
        ..StaticTextStyle::default()
    };
    let img = render_static_text("hi", 400, &g, &style);
    assert_eq!(img.pixel(86, 60), Some(Rgba8::TRANSPARENT));
}

#[test]
fn title_wraps_by_pixel_width() {
    let g = BlockGlyphSource::default();
    let style = OverlayStyle::default();
    let one = render_text_overlay("AB CD", 400, &g, &style);
    assert_eq!(one.size(), (340, 110));
    assert_eq!(one.pixel(150, 28), Some(Rgba8::new(255, 255, 255, 255)));
    assert_eq!(one.pixel(5, 5), Some(Rgba8::TRANSPARENT));

    let two = render_text_overlay("AB CD EF", 150, &g, &style);
    assert_eq!(two.size(), (90, 2 * 70 + 40));
}

#[test]
fn placement_anchors() {
    assert_eq!(OverlayPlacement::Top.y(1080, 110), 150);
    assert_eq!(OverlayPlacement::Center.y(1080, 110), 485);
    assert_eq!(OverlayPlacement::Bottom.y(1080, 110), 680);
    assert_eq!(OverlayPlacement::Center.y(100, 111), -6);
}

#[test]
fn placement_deserializes_snake_case() {
    let p: OverlayPlacement = serde_json::from_str("\"bottom\"").unwrap();
    assert_eq!(p, OverlayPlacement::Bottom);
    let style: OverlayStyle = serde_json::from_str(r#"{"placement":"center"}"#).unwrap();
    assert_eq!(style.placement, OverlayPlacement::Center);
    assert_eq!(style.font_size, 60.0);
}

#[test]
fn layers_are_masked_and_timed() {
    let g = BlockGlyphSource::default();
    let canvas = Canvas::new(400, 1000);

    let title = text_overlay_layer("AB CD", 3.0, canvas, &g, &OverlayStyle::default());
    assert!(title.mask().is_some());
    assert!(title.is_time_invariant());
    assert_eq!(title.span().end, Some(3.0));
    assert_eq!(title.position().resolve((400, 1000), title.size(), 0.0), (30, 150));

    let caption = static_text_layer("hi", 2.0, canvas, &g, &StaticTextStyle::default());
    assert!(caption.mask().is_some());
    assert_eq!(caption.span().end, Some(2.0));
    assert_eq!(caption.position().resolve((400, 1000), caption.size(), 0.0), (55, 720));
}
