//! Karaoke line rendering.
//!
//! A line of N words is turned into N immutable [`WordVariant`]s, one per highlighted word.
//! Every word is rasterized exactly twice (normal and highlight color); the drop shadow is
//! drawn once for the whole line and shared by all variants.

use std::sync::Arc;

use rayon::prelude::*;
use xxhash_rust::xxh3::Xxh3;

use crate::effects::EffectStack;
use crate::foundation::core::{Canvas, Rect, Rgb8};
use crate::foundation::error::KinetextResult;
use crate::foundation::math::{lerp_u8, mul_div255_u8};
use crate::layer::{Coord, Layer, Position};
use crate::raster::buffer::RasterBuffer;
use crate::raster::composite::{alpha_composite, paste};
use crate::raster::mask::Mask;
use crate::raster::shapes::rounded_rect_coverage;
use crate::text::cache::{LineKey, VariantCache};
use crate::text::clip::LineClip;
use crate::text::font::{FontRequest, resolve_font};
use crate::text::glyphs::{GlyphSource, ParleyGlyphSource};
use crate::text::layout::{KaraokeTiming, group_words_into_lines};
use crate::text::style::TextStyle;

/// Safety margin around each rendered word.
const WORD_PAD: u32 = 2;
const BOX_PAD_X: u32 = 12;
const BOX_PAD_Y: u32 = 6;

/// One line raster with a specific word highlighted.
#[derive(Clone, Debug, PartialEq)]
pub struct WordVariant {
    raster: RasterBuffer,
    text_mask: Mask,
    alpha: Mask,
}

impl WordVariant {
    pub fn new(raster: RasterBuffer, text_mask: Mask) -> Self {
        let alpha = raster.alpha();
        Self {
            raster,
            text_mask,
            alpha,
        }
    }

    pub fn raster(&self) -> &RasterBuffer {
        &self.raster
    }

    /// Alpha of the words alone, without shadow or highlight-box contribution.
    pub fn text_mask(&self) -> &Mask {
        &self.text_mask
    }

    /// Alpha channel of the full raster.
    pub fn alpha(&self) -> &Mask {
        &self.alpha
    }
}

/// All variants of one line plus the layout they were rendered from.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LineFrames {
    words: Vec<String>,
    word_xs: Vec<i64>,
    text_origin: (i64, i64),
    width: u32,
    height: u32,
    variants: Vec<WordVariant>,
}

impl LineFrames {
    pub fn len(&self) -> usize {
        self.variants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variants.is_empty()
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn variants(&self) -> &[WordVariant] {
        &self.variants
    }

    pub fn words(&self) -> &[String] {
        &self.words
    }

    /// Left edge of each word's line box inside the frame.
    pub fn word_xs(&self) -> &[i64] {
        &self.word_xs
    }

    /// Top-left corner of the line box inside the frame.
    pub fn text_origin(&self) -> (i64, i64) {
        self.text_origin
    }
}

struct WordImage {
    raster: RasterBuffer,
    /// Offset of the image origin from the word's line-box origin, on both axes.
    offset: i64,
}

pub struct WordFrameRenderer {
    glyphs: Arc<dyn GlyphSource>,
    style: TextStyle,
    effects: EffectStack,
    fingerprint: u64,
}

impl std::fmt::Debug for WordFrameRenderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WordFrameRenderer")
            .field("style", &self.style)
            .field("effects", &self.effects)
            .finish_non_exhaustive()
    }
}

impl WordFrameRenderer {
    pub fn new(glyphs: Arc<dyn GlyphSource>, style: TextStyle) -> Self {
        let effects = EffectStack::new(&style.effects, style.stroke_width);
        let fingerprint = renderer_fingerprint(&style, glyphs.as_ref());
        Self {
            glyphs,
            style,
            effects,
            fingerprint,
        }
    }

    /// Resolve `style.font` (or the fallback chain) and shape with parley.
    pub fn from_style(style: TextStyle) -> KinetextResult<Self> {
        let font = resolve_font(&FontRequest::parse(style.font.as_deref()))?;
        let glyphs = ParleyGlyphSource::new(&font, style.font_size)?;
        Ok(Self::new(Arc::new(glyphs), style))
    }

    pub fn style(&self) -> &TextStyle {
        &self.style
    }

    pub fn glyphs(&self) -> &dyn GlyphSource {
        self.glyphs.as_ref()
    }

    pub fn effects(&self) -> &EffectStack {
        &self.effects
    }

    /// Pack words into lines for a canvas of `canvas_width`.
    pub fn pack_lines<S: AsRef<str>>(&self, words: &[S], canvas_width: u32) -> Vec<Vec<String>> {
        group_words_into_lines(
            words,
            self.glyphs.as_ref(),
            self.style.max_words_per_line,
            self.style.line_budget(canvas_width),
        )
    }

    pub fn line_key<S: AsRef<str>>(&self, words: &[S], frame_width: u32) -> LineKey {
        LineKey::new(words, frame_width, self.fingerprint)
    }

    /// Render every highlight variant of one line, effects included.
    ///
    /// An empty word list yields empty frames.
    #[tracing::instrument(level = "debug", skip(self, words), fields(words = words.len()))]
    pub fn render_line<S: AsRef<str>>(&self, words: &[S], frame_width: u32) -> LineFrames {
        let words: Vec<String> = words.iter().map(|w| w.as_ref().to_string()).collect();
        let n = words.len();
        if n == 0 {
            return LineFrames::default();
        }

        let extent = self.glyphs.measure(&words.join(" "));
        let margin = self.style.frame_margin();
        let width = frame_width.max(1);
        let height = extent.height + margin * 2;
        let x = (i64::from(width) - i64::from(extent.width)).div_euclid(2);
        let y = i64::from(margin);

        let mut word_xs = Vec::with_capacity(n);
        let mut cur_x = x;
        for w in &words {
            word_xs.push(cur_x);
            cur_x += i64::from(self.glyphs.measure(&format!("{w} ")).width);
        }

        let use_glow = self.style.uses_glow();
        let normal: Vec<WordImage> = words
            .iter()
            .map(|w| self.render_word(w, self.style.text_color, false))
            .collect();
        let highlight: Vec<WordImage> = words
            .iter()
            .map(|w| self.render_word(w, self.style.highlight_color, use_glow))
            .collect();

        let base = if self.style.shadow.enabled {
            let (dx, dy) = self.style.shadow.offset;
            let mut shadow = Mask::new(width, height);
            for (img, &wx) in normal.iter().zip(&word_xs) {
                shadow.max_in_place(
                    &img.raster.alpha(),
                    to_i32(wx + img.offset + i64::from(dx)),
                    to_i32(y + img.offset + i64::from(dy)),
                );
            }
            if self.style.shadow.blur > 0.0 {
                shadow = shadow.blur(self.style.shadow.blur);
            }
            RasterBuffer::from_color_and_alpha(Rgb8::BLACK, &shadow)
        } else {
            RasterBuffer::new(width, height)
        };

        let boxes: Vec<(RasterBuffer, i64, i64)> = if self.style.highlight_box.enabled {
            words
                .iter()
                .zip(&word_xs)
                .map(|(w, &wx)| {
                    let e = self.glyphs.measure(w);
                    self.highlight_box(wx, y, e.width, e.height)
                })
                .collect()
        } else {
            Vec::new()
        };

        let variants: Vec<WordVariant> = (0..n)
            .map(|hi| {
                let mut frame = base.clone();
                if let Some((layer, bx, by)) = boxes.get(hi) {
                    paste(&mut frame, layer, None, *bx, *by);
                }
                let mut text_only = RasterBuffer::new(width, height);
                for (i, &wx) in word_xs.iter().enumerate() {
                    let img = if i == hi { &highlight[i] } else { &normal[i] };
                    let px = wx + img.offset;
                    let py = y + img.offset;
                    paste(&mut frame, &img.raster, None, px, py);
                    paste(&mut text_only, &img.raster, None, px, py);
                }
                WordVariant::new(frame, text_only.alpha())
            })
            .collect();

        let variants = if self.effects.is_empty() {
            variants
        } else {
            variants
                .into_par_iter()
                .map(|v| {
                    let raster = self.effects.apply(&v.raster, &v.text_mask);
                    WordVariant::new(raster, v.text_mask)
                })
                .collect()
        };

        LineFrames {
            words,
            word_xs,
            text_origin: (x, y),
            width,
            height,
            variants,
        }
    }

    /// [`WordFrameRenderer::render_line`] memoized in `cache`.
    pub fn render_line_cached<S: AsRef<str>>(
        &self,
        words: &[S],
        frame_width: u32,
        cache: &mut VariantCache,
    ) -> Arc<LineFrames> {
        let key = self.line_key(words, frame_width);
        cache.get_or_render(key, || self.render_line(words, frame_width))
    }

    /// One layer per packed line, timed word by word across `duration`.
    ///
    /// The first word starts after a 5% lead-in; 90% of `duration` is split evenly across all
    /// words and lines follow each other without gaps.
    #[tracing::instrument(
        level = "debug",
        skip(self, text, cache),
        fields(width = canvas.width, height = canvas.height)
    )]
    pub fn render_karaoke(
        &self,
        text: &str,
        duration: f64,
        canvas: Canvas,
        cache: &mut VariantCache,
    ) -> Vec<Layer> {
        let words = self.style.words(text);
        let Some(timing) = KaraokeTiming::new(duration, words.len()) else {
            return Vec::new();
        };
        let lines = self.pack_lines(&words, canvas.width);
        let y_pos = (f64::from(canvas.height) * f64::from(self.style.position_y_ratio)) as i32;

        let mut layers = Vec::with_capacity(lines.len());
        let mut first_word = 0;
        for line in &lines {
            let frames = self.render_line_cached(line, canvas.width, cache);
            let Some(clip) = LineClip::new(frames, timing.word_duration) else {
                continue;
            };
            layers.push(
                Layer::from_clip(Arc::new(clip))
                    .with_start(timing.line_start(first_word))
                    .with_duration(timing.line_duration(line.len()))
                    .with_position(Position::fixed(Coord::Center, Coord::Px(y_pos))),
            );
            first_word += line.len();
        }
        tracing::debug!(lines = layers.len(), words = words.len(), "karaoke layers built");
        layers
    }

    fn render_word(&self, word: &str, color: Rgb8, glow: bool) -> WordImage {
        let mut pad = self.style.stroke_width.saturating_add(WORD_PAD);
        if glow {
            pad = pad.saturating_add(self.style.glow.size.saturating_mul(2));
        }
        let text = stroked_text(
            self.glyphs.as_ref(),
            word,
            color,
            self.style.stroke_color,
            self.style.stroke_width,
            pad,
        );
        let mut raster = text.raster;
        if glow {
            let halo = text
                .coverage
                .dilate(self.style.glow.stroke())
                .blur(self.style.glow.size as f32);
            let mut under = RasterBuffer::from_color_and_alpha(self.style.glow.color, &halo);
            alpha_composite(&mut under, &raster);
            raster = under;
        }
        WordImage {
            raster,
            offset: -i64::from(pad),
        }
    }

    /// Blurred rounded box around one word; returns the layer and its paste position.
    fn highlight_box(
        &self,
        word_x: i64,
        word_y: i64,
        word_w: u32,
        word_h: u32,
    ) -> (RasterBuffer, i64, i64) {
        let hb = &self.style.highlight_box;
        let blur_pad = hb.blur.saturating_mul(2);
        let bw = word_w + BOX_PAD_X * 2 - 1;
        let bh = word_h + BOX_PAD_Y * 2 + 9;
        let layer_w = bw + 2 + blur_pad * 2;
        let layer_h = bh + 2 + blur_pad * 2;
        let alpha = (255.0 * hb.opacity.clamp(0.0, 1.0)) as u16;

        let rect = Rect::new(
            f64::from(blur_pad),
            f64::from(blur_pad),
            f64::from(blur_pad + bw + 1),
            f64::from(blur_pad + bh + 1),
        );
        let mut coverage = rounded_rect_coverage(layer_w, layer_h, rect, f64::from(hb.radius));
        for v in coverage.data_mut() {
            *v = mul_div255_u8(u16::from(*v), alpha);
        }
        if hb.blur > 0 {
            coverage = coverage.blur(hb.blur as f32);
        }
        (
            RasterBuffer::from_color_and_alpha(hb.color, &coverage),
            word_x - i64::from(BOX_PAD_X + blur_pad),
            word_y - i64::from(BOX_PAD_Y + blur_pad),
        )
    }
}

/// Text drawn with an outline, padded by `pad` pixels on every side.
pub(crate) struct StrokedText {
    pub(crate) raster: RasterBuffer,
    /// Glyph coverage in the same padded frame.
    pub(crate) coverage: Mask,
}

/// Fill color inside the glyph coverage, stroke color in the ring grown by a disk of
/// radius `stroke_width`.
pub(crate) fn stroked_text(
    glyphs: &dyn GlyphSource,
    text: &str,
    fill: Rgb8,
    stroke: Rgb8,
    stroke_width: u32,
    pad: u32,
) -> StrokedText {
    let glyph = glyphs.coverage(text);
    let w = glyph.width() + pad * 2;
    let h = glyph.height() + pad * 2;
    let mut coverage = Mask::new(w, h);
    coverage.max_in_place(&glyph, to_i32(i64::from(pad)), to_i32(i64::from(pad)));
    let outline = coverage.dilate(stroke_width);

    let mut raster = RasterBuffer::new(w, h);
    for ((px, &c), &o) in raster
        .data_mut()
        .chunks_exact_mut(4)
        .zip(coverage.data())
        .zip(outline.data())
    {
        if o == 0 {
            continue;
        }
        let rgb = if stroke_width == 0 {
            fill
        } else {
            Rgb8::new(
                lerp_u8(stroke.r, fill.r, c),
                lerp_u8(stroke.g, fill.g, c),
                lerp_u8(stroke.b, fill.b, c),
            )
        };
        px.copy_from_slice(&rgb.with_alpha(o).to_array());
    }
    StrokedText { raster, coverage }
}

pub(crate) fn to_i32(v: i64) -> i32 {
    v.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
}

fn renderer_fingerprint(style: &TextStyle, glyphs: &dyn GlyphSource) -> u64 {
    let mut h = Xxh3::new();
    h.update(&glyphs.fingerprint().to_le_bytes());
    match serde_json::to_vec(style) {
        Ok(bytes) => h.update(&bytes),
        // In-memory textures do not serialize.
        Err(_) => h.update(format!("{style:?}").as_bytes()),
    }
    h.digest()
}

#[cfg(test)]
#[path = "../../tests/unit/text/word_frame.rs"]
mod tests;
