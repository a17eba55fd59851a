use std::sync::Mutex;

use xxhash_rust::xxh3::Xxh3;

use crate::foundation::error::{KinetextError, KinetextResult};
use crate::raster::mask::Mask;
use crate::text::font::LoadedFont;

/// Line-box size of a run of text.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TextExtent {
    pub width: u32,
    pub height: u32,
}

/// Measurement oracle and coverage rasterizer for one font at one size.
///
/// Any provider whose `coverage` mask matches its own `measure` is acceptable to the renderers.
pub trait GlyphSource: Send + Sync {
    /// Advance width and line height of `text` set on a single line.
    fn measure(&self, text: &str) -> TextExtent;

    /// Glyph coverage of `text`, sized exactly to [`GlyphSource::measure`] (at least 1x1),
    /// with the line box's top-left corner at the origin.
    fn coverage(&self, text: &str) -> Mask;

    /// Stable identity of the font and size, used to key rendered-line caches.
    fn fingerprint(&self) -> u64;
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
struct TextBrush;

/// Shapes with parley and rasterizes with vello_cpu.
pub struct ParleyGlyphSource {
    font: vello_cpu::peniko::FontData,
    source: String,
    family: String,
    size_px: f32,
    engine: Mutex<LayoutEngine>,
}

struct LayoutEngine {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<TextBrush>,
}

impl std::fmt::Debug for ParleyGlyphSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ParleyGlyphSource")
            .field("family", &self.family)
            .field("size_px", &self.size_px)
            .finish_non_exhaustive()
    }
}

impl ParleyGlyphSource {
    pub fn new(font: &LoadedFont, size_px: f32) -> KinetextResult<Self> {
        if !size_px.is_finite() || size_px <= 0.0 {
            return Err(KinetextError::validation(
                "font size must be finite and > 0",
            ));
        }
        let mut font_ctx = parley::FontContext::default();
        let families = font_ctx
            .collection
            .register_fonts(parley::fontique::Blob::from(font.data.to_vec()), None);
        let family_id = families.first().map(|(id, _)| *id).ok_or_else(|| {
            KinetextError::font_not_found(font.source.clone())
        })?;
        let family = font_ctx
            .collection
            .family_name(family_id)
            .ok_or_else(|| KinetextError::font_not_found(font.source.clone()))?
            .to_string();

        Ok(Self {
            font: vello_cpu::peniko::FontData::new(
                vello_cpu::peniko::Blob::from(font.data.to_vec()),
                0,
            ),
            source: font.source.clone(),
            family,
            size_px,
            engine: Mutex::new(LayoutEngine {
                font_ctx,
                layout_ctx: parley::LayoutContext::new(),
            }),
        })
    }

    pub fn family(&self) -> &str {
        &self.family
    }

    pub fn size_px(&self) -> f32 {
        self.size_px
    }

    fn with_layout<R>(&self, text: &str, f: impl FnOnce(&parley::Layout<TextBrush>) -> R) -> R {
        let mut guard = match self.engine.lock() {
            Ok(g) => g,
            Err(poisoned) => poisoned.into_inner(),
        };
        let engine = &mut *guard;
        let mut builder = engine
            .layout_ctx
            .ranged_builder(&mut engine.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(std::borrow::Cow::Owned(self.family.clone())),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(self.size_px));
        builder.push_default(parley::style::StyleProperty::Brush(TextBrush));
        let mut layout: parley::Layout<TextBrush> = builder.build(text);
        layout.break_all_lines(None);
        f(&layout)
    }
}

fn extent_of(layout: &parley::Layout<TextBrush>) -> TextExtent {
    TextExtent {
        width: layout.full_width().ceil().max(0.0) as u32,
        height: layout.height().ceil().max(0.0) as u32,
    }
}

impl GlyphSource for ParleyGlyphSource {
    fn fingerprint(&self) -> u64 {
        let mut h = Xxh3::new();
        h.update(self.family.as_bytes());
        h.update(self.source.as_bytes());
        h.update(&self.size_px.to_bits().to_le_bytes());
        h.digest()
    }

    fn measure(&self, text: &str) -> TextExtent {
        self.with_layout(text, extent_of)
    }

    fn coverage(&self, text: &str) -> Mask {
        self.with_layout(text, |layout| {
            let extent = extent_of(layout);
            let w = u16::try_from(extent.width.max(1)).unwrap_or(u16::MAX);
            let h = u16::try_from(extent.height.max(1)).unwrap_or(u16::MAX);

            let mut ctx = vello_cpu::RenderContext::new(w, h);
            ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(255, 255, 255, 255));
            for line in layout.lines() {
                for item in line.items() {
                    let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                        continue;
                    };
                    let glyphs = run.glyphs().map(|g| vello_cpu::Glyph {
                        id: g.id,
                        x: g.x,
                        y: g.y,
                    });
                    ctx.glyph_run(&self.font)
                        .font_size(run.run().font_size())
                        .fill_glyphs(glyphs);
                }
            }
            ctx.flush();
            let mut pixmap = vello_cpu::Pixmap::new(w, h);
            ctx.render_to_pixmap(&mut pixmap);

            let alpha = pixmap
                .data_as_u8_slice()
                .chunks_exact(4)
                .map(|px| px[3])
                .collect();
            Mask::from_raw_unchecked(u32::from(w), u32::from(h), alpha)
        })
    }
}

/// Deterministic, font-free provider: every non-space character is a filled block.
///
/// Used by tests and by callers that need layout without installed fonts.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BlockGlyphSource {
    /// Horizontal advance per character.
    pub advance: u32,
    pub line_height: u32,
    /// Blank border inside each character cell.
    pub inset: u32,
}

impl Default for BlockGlyphSource {
    fn default() -> Self {
        Self {
            advance: 10,
            line_height: 16,
            inset: 2,
        }
    }
}

impl GlyphSource for BlockGlyphSource {
    fn fingerprint(&self) -> u64 {
        let mut h = Xxh3::new();
        h.update(b"block");
        for v in [self.advance, self.line_height, self.inset] {
            h.update(&v.to_le_bytes());
        }
        h.digest()
    }

    fn measure(&self, text: &str) -> TextExtent {
        TextExtent {
            width: text.chars().count() as u32 * self.advance,
            height: self.line_height,
        }
    }

    fn coverage(&self, text: &str) -> Mask {
        let extent = self.measure(text);
        let mut mask = Mask::new(extent.width, extent.height);
        let stride = mask.width() as usize;
        let y0 = self.inset.min(self.line_height);
        let y1 = self.line_height.saturating_sub(self.inset).max(y0);
        let data = mask.data_mut();
        for (i, ch) in text.chars().enumerate() {
            if ch.is_whitespace() {
                continue;
            }
            let cell = i as u32 * self.advance;
            let x0 = cell + self.inset.min(self.advance);
            let x1 = (cell + self.advance.saturating_sub(self.inset)).max(x0);
            for y in y0..y1 {
                for x in x0..x1 {
                    data[y as usize * stride + x as usize] = 255;
                }
            }
        }
        mask
    }
}

#[cfg(test)]
#[path = "../../tests/unit/text/glyphs.rs"]
mod tests;
