use super::*;
use crate::foundation::core::{Rgb8, Rgba8};

const RED: Rgb8 = Rgb8 { r: 255, g: 0, b: 0 };
const GREEN: Rgb8 = Rgb8 { r: 0, g: 255, b: 0 };
const BLUE: Rgb8 = Rgb8 { r: 0, g: 0, b: 255 };
const BLACK: Rgba8 = Rgba8 { r: 0, g: 0, b: 0, a: 255 };

#[test]
fn grid_sizes_follow_row_and_column_maxima() {
    let comp = clips_array(
        vec![
            vec![Layer::solid((10, 5), RED), Layer::solid((20, 8), BLUE)],
            vec![Layer::solid((6, 6), GREEN)],
        ],
        Background::Solid(Rgb8::BLACK),
    );
    assert_eq!(comp.size(), (30, 14));
    let out = comp.render(0.0);

    // 10x5 centered in a 10x8 slot.
    assert_eq!(out.pixel(0, 0), Some(BLACK));
    assert_eq!(out.pixel(0, 1), Some(RED.with_alpha(255)));
    assert_eq!(out.pixel(9, 5), Some(RED.with_alpha(255)));
    assert_eq!(out.pixel(9, 6), Some(BLACK));
    // Exact fit at x = 10.
    assert_eq!(out.pixel(10, 0), Some(BLUE.with_alpha(255)));
    assert_eq!(out.pixel(29, 7), Some(BLUE.with_alpha(255)));
    // 6x6 centered in a 10x6 slot at y = 8.
    assert_eq!(out.pixel(1, 8), Some(BLACK));
    assert_eq!(out.pixel(2, 8), Some(GREEN.with_alpha(255)));
    assert_eq!(out.pixel(7, 13), Some(GREEN.with_alpha(255)));
    assert_eq!(out.pixel(8, 13), Some(BLACK));
    assert_eq!(out.pixel(15, 10), Some(BLACK));
}

#[test]
fn empty_grid_is_a_single_background_pixel() {
    let comp = clips_array(Vec::new(), Background::Transparent);
    assert_eq!(comp.size(), (1, 1));
}

#[test]
fn concatenation_plays_layers_back_to_back() {
    let comp = concatenate(
        vec![
            Layer::solid((4, 4), RED).with_duration(1.0),
            Layer::solid((2, 2), BLUE).with_duration(2.0),
        ],
        0.5,
        Background::Solid(Rgb8::BLACK),
    )
    .unwrap();
    assert_eq!(comp.size(), (4, 4));
    assert_eq!(comp.duration(), Some(3.5));

    assert_eq!(comp.render(0.5).pixel(0, 0), Some(RED.with_alpha(255)));
    let gap = comp.render(1.2);
    assert!(gap.data().chunks_exact(4).all(|p| p == BLACK.to_array()));
    let second = comp.render(2.0);
    assert_eq!(second.pixel(1, 1), Some(BLUE.with_alpha(255)));
    assert_eq!(second.pixel(0, 0), Some(BLACK));
    assert_eq!(comp.render(3.5).pixel(1, 1), Some(BLACK));
}

#[test]
fn negative_padding_never_starts_before_zero() {
    let comp = concatenate(
        vec![
            Layer::solid((1, 1), RED).with_duration(1.0),
            Layer::solid((1, 1), BLUE).with_duration(1.0),
        ],
        -5.0,
        Background::Transparent,
    )
    .unwrap();
    let starts: Vec<f64> = comp.layers().map(|l| l.span().start).collect();
    assert_eq!(starts, vec![0.0, 0.0]);
}

#[test]
fn concatenation_needs_bounded_layers() {
    let err = concatenate(
        vec![Layer::solid((1, 1), RED)],
        0.0,
        Background::Transparent,
    )
    .unwrap_err();
    assert!(err.to_string().contains("no end"));
}
