//! Static text blocks: boxed captions and free-floating titles.

use crate::foundation::core::{Canvas, Rect, Rgb8};
use crate::foundation::math::mul_div255_u8;
use crate::layer::{Coord, Layer, Position};
use crate::raster::buffer::RasterBuffer;
use crate::raster::composite::paste;
use crate::raster::shapes::rounded_rect_coverage;
use crate::text::glyphs::GlyphSource;
use crate::text::layout::{wrap_text_by_chars, wrap_text_by_width};
use crate::text::word_frame::{stroked_text, to_i32};

const BLOCK_PADDING: u32 = 20;
const CAPTION_SIDE_RESERVE: u32 = 150;
const CAPTION_LINE_GAP: u32 = 20;
const CAPTION_BOX_RADIUS: f64 = 15.0;
const TITLE_SIDE_RESERVE: u32 = 100;
const TITLE_LINE_HEIGHT: u32 = 70;

/// Caption drawn over a translucent rounded box.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct StaticTextStyle {
    pub font: Option<String>,
    pub font_size: f32,
    pub text_color: Rgb8,
    pub stroke_color: Rgb8,
    pub stroke_width: u32,
    pub bg_opacity: f32,
    pub position_y_ratio: f32,
    pub max_chars_per_line: usize,
}

impl Default for StaticTextStyle {
    fn default() -> Self {
        Self {
            font: None,
            font_size: 65.0,
            text_color: Rgb8::WHITE,
            stroke_color: Rgb8::BLACK,
            stroke_width: 4,
            bg_opacity: 0.75,
            position_y_ratio: 0.72,
            max_chars_per_line: 35,
        }
    }
}

/// Vertical anchor of a title overlay.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverlayPlacement {
    #[default]
    Top,
    Center,
    Bottom,
}

impl OverlayPlacement {
    /// Top edge of a block of `block_height` on a canvas of `canvas_height`.
    pub fn y(self, canvas_height: u32, block_height: u32) -> i64 {
        match self {
            Self::Top => 150,
            Self::Center => (i64::from(canvas_height) - i64::from(block_height)).div_euclid(2),
            Self::Bottom => i64::from(canvas_height) - 400,
        }
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct OverlayStyle {
    pub font: Option<String>,
    pub font_size: f32,
    pub text_color: Rgb8,
    pub stroke_color: Rgb8,
    pub stroke_width: u32,
    pub placement: OverlayPlacement,
}

impl Default for OverlayStyle {
    fn default() -> Self {
        Self {
            font: None,
            font_size: 60.0,
            text_color: Rgb8::WHITE,
            stroke_color: Rgb8::BLACK,
            stroke_width: 3,
            placement: OverlayPlacement::Top,
        }
    }
}

/// Uppercased caption, wrapped by character count, centered over a rounded black box.
///
/// The buffer is `width - 150 + 40` wide; the box may extend past its horizontal edges and is
/// cropped there.
pub fn render_static_text(
    text: &str,
    canvas_width: u32,
    glyphs: &dyn GlyphSource,
    style: &StaticTextStyle,
) -> RasterBuffer {
    let lines = wrap_text_by_chars(&text.to_uppercase(), style.max_chars_per_line);
    let line_height = style.font_size.max(0.0).round() as u32 + CAPTION_LINE_GAP;
    let max_width = canvas_width.saturating_sub(CAPTION_SIDE_RESERVE);

    let widths: Vec<u32> = lines.iter().map(|l| glyphs.measure(l).width).collect();
    let max_line_w = widths.iter().copied().max().unwrap_or(max_width);
    let total_h = line_height * lines.len() as u32 + BLOCK_PADDING * 2;
    let img_w = max_width + BLOCK_PADDING * 2;

    let bg_w = max_line_w + BLOCK_PADDING * 2 + 40;
    let bg_h = total_h + 20;
    let bg_x = (i64::from(img_w) - i64::from(bg_w)).div_euclid(2);
    let bg_y = -10_i64;
    let rect = Rect::new(
        bg_x as f64,
        bg_y as f64,
        (bg_x + i64::from(bg_w) + 1) as f64,
        (bg_y + i64::from(bg_h) + 1) as f64,
    );
    let mut coverage = rounded_rect_coverage(img_w, total_h, rect, CAPTION_BOX_RADIUS);
    let alpha = (255.0 * style.bg_opacity.clamp(0.0, 1.0)) as u16;
    for v in coverage.data_mut() {
        *v = mul_div255_u8(u16::from(*v), alpha);
    }
    let mut img = RasterBuffer::from_color_and_alpha(Rgb8::BLACK, &coverage);

    draw_lines(
        &mut img,
        &lines,
        &widths,
        line_height,
        glyphs,
        style.text_color,
        style.stroke_color,
        style.stroke_width,
    );
    img
}

/// Title block wrapped to `width - 100` pixels, 70 px per line.
pub fn render_text_overlay(
    text: &str,
    canvas_width: u32,
    glyphs: &dyn GlyphSource,
    style: &OverlayStyle,
) -> RasterBuffer {
    let max_w = canvas_width.saturating_sub(TITLE_SIDE_RESERVE);
    let lines = wrap_text_by_width(text, max_w, glyphs);
    let widths: Vec<u32> = lines.iter().map(|l| glyphs.measure(l).width).collect();
    let total_h = TITLE_LINE_HEIGHT * lines.len() as u32 + BLOCK_PADDING * 2;

    let mut img = RasterBuffer::new(max_w + BLOCK_PADDING * 2, total_h);
    draw_lines(
        &mut img,
        &lines,
        &widths,
        TITLE_LINE_HEIGHT,
        glyphs,
        style.text_color,
        style.stroke_color,
        style.stroke_width,
    );
    img
}

/// Caption as a static layer, horizontally centered at `height * position_y_ratio`.
pub fn static_text_layer(
    text: &str,
    duration: f64,
    canvas: Canvas,
    glyphs: &dyn GlyphSource,
    style: &StaticTextStyle,
) -> Layer {
    let img = render_static_text(text, canvas.width, glyphs, style);
    let y = (f64::from(canvas.height) * f64::from(style.position_y_ratio)) as i32;
    Layer::image_with_alpha(img)
        .with_duration(duration)
        .with_position(Position::fixed(Coord::Center, Coord::Px(y)))
}

/// Title as a static layer anchored by `style.placement`.
pub fn text_overlay_layer(
    text: &str,
    duration: f64,
    canvas: Canvas,
    glyphs: &dyn GlyphSource,
    style: &OverlayStyle,
) -> Layer {
    let img = render_text_overlay(text, canvas.width, glyphs, style);
    let y = style.placement.y(canvas.height, img.height());
    Layer::image_with_alpha(img)
        .with_duration(duration)
        .with_position(Position::fixed(Coord::Center, Coord::Px(to_i32(y))))
}

#[allow(clippy::too_many_arguments)]
fn draw_lines(
    img: &mut RasterBuffer,
    lines: &[String],
    widths: &[u32],
    line_height: u32,
    glyphs: &dyn GlyphSource,
    fill: Rgb8,
    stroke: Rgb8,
    stroke_width: u32,
) {
    let pad = stroke_width + 2;
    let mut y = i64::from(BLOCK_PADDING);
    for (line, &w) in lines.iter().zip(widths) {
        let x = (i64::from(img.width()) - i64::from(w)).div_euclid(2);
        let drawn = stroked_text(glyphs, line, fill, stroke, stroke_width, pad);
        paste(
            img,
            &drawn.raster,
            None,
            x - i64::from(pad),
            y - i64::from(pad),
        );
        y += i64::from(line_height);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/text/overlay.rs"]
mod tests;
