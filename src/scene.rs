//! JSON scene description: a canvas, a duration and a list of timed elements.
//!
//! ```json
//! {
//!   "canvas": {"width": 1080, "height": 1920},
//!   "fps": {"num": 30, "den": 1},
//!   "duration": 6.0,
//!   "background": {"solid": [20, 20, 30]},
//!   "elements": [
//!     {"kind": "karaoke", "text": "hello there world", "style": {"font_size": 80}},
//!     {"kind": "overlay", "text": "Title", "start": 1.0, "duration": 2.0}
//!   ]
//! }
//! ```

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::composite::compositor::{Background, Compositor};
use crate::foundation::core::{Canvas, Fps, Rgb8};
use crate::foundation::error::{KinetextError, KinetextResult};
use crate::layer::{Coord, Layer, Position};
use crate::raster::buffer::RasterBuffer;
use crate::text::cache::VariantCache;
use crate::text::font::{FontRequest, resolve_font};
use crate::text::glyphs::{GlyphSource, ParleyGlyphSource};
use crate::text::overlay::{OverlayStyle, StaticTextStyle, static_text_layer, text_overlay_layer};
use crate::text::style::TextStyle;
use crate::text::word_frame::WordFrameRenderer;

/// Builds a glyph source for a font request at a pixel size.
pub type GlyphFactory = dyn Fn(Option<&str>, f32) -> KinetextResult<Arc<dyn GlyphSource>>;

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Scene {
    pub canvas: Canvas,
    #[serde(default = "default_fps")]
    pub fps: Fps,
    /// Seconds.
    pub duration: f64,
    #[serde(default)]
    pub background: Background,
    #[serde(default)]
    pub elements: Vec<Element>,
}

fn default_fps() -> Fps {
    Fps { num: 30, den: 1 }
}

/// When an element is visible and how it stacks.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ElementTiming {
    pub start: f64,
    /// `None` runs to the end of the scene.
    pub duration: Option<f64>,
    pub z: i32,
}

/// Anchor of an image or solid element; centered by default.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ElementPosition {
    pub x: Coord,
    pub y: Coord,
}

impl Default for ElementPosition {
    fn default() -> Self {
        Self {
            x: Coord::Center,
            y: Coord::Center,
        }
    }
}

impl From<ElementPosition> for Position {
    fn from(p: ElementPosition) -> Self {
        Position::fixed(p.x, p.y)
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Element {
    /// Word-by-word highlighted lyrics spread across the element's duration.
    Karaoke {
        text: String,
        #[serde(default)]
        style: TextStyle,
        #[serde(flatten)]
        timing: ElementTiming,
    },
    StaticText {
        text: String,
        #[serde(default)]
        style: StaticTextStyle,
        #[serde(flatten)]
        timing: ElementTiming,
    },
    Overlay {
        text: String,
        #[serde(default)]
        style: OverlayStyle,
        #[serde(flatten)]
        timing: ElementTiming,
    },
    /// Image file, relative paths resolved against the scene's asset root.
    Image {
        path: PathBuf,
        /// Blend through the image's alpha instead of replacing pixels.
        #[serde(default)]
        use_alpha: bool,
        #[serde(default)]
        position: ElementPosition,
        #[serde(flatten)]
        timing: ElementTiming,
    },
    Solid {
        size: (u32, u32),
        color: Rgb8,
        #[serde(default)]
        position: ElementPosition,
        #[serde(flatten)]
        timing: ElementTiming,
    },
}

impl Element {
    pub fn timing(&self) -> ElementTiming {
        match self {
            Self::Karaoke { timing, .. }
            | Self::StaticText { timing, .. }
            | Self::Overlay { timing, .. }
            | Self::Image { timing, .. }
            | Self::Solid { timing, .. } => *timing,
        }
    }
}

impl Scene {
    pub fn from_json(json: &str) -> KinetextResult<Self> {
        serde_json::from_str(json).map_err(|e| KinetextError::serde(e.to_string()))
    }

    pub fn load(path: &Path) -> KinetextResult<Self> {
        let json = std::fs::read_to_string(path).map_err(|e| {
            KinetextError::validation(format!("read scene '{}': {e}", path.display()))
        })?;
        Self::from_json(&json)
    }

    pub fn validate(&self) -> KinetextResult<()> {
        if self.fps.num == 0 || self.fps.den == 0 {
            return Err(KinetextError::validation("fps must have num>0 and den>0"));
        }
        if self.canvas.width == 0 || self.canvas.height == 0 {
            return Err(KinetextError::validation("canvas width/height must be > 0"));
        }
        if !self.duration.is_finite() || self.duration <= 0.0 {
            return Err(KinetextError::validation("duration must be > 0 seconds"));
        }
        for (i, el) in self.elements.iter().enumerate() {
            let timing = el.timing();
            if !timing.start.is_finite() || timing.start < 0.0 {
                return Err(KinetextError::validation(format!(
                    "element {i} has a negative or non-finite start"
                )));
            }
            if let Some(d) = timing.duration
                && (!d.is_finite() || d <= 0.0)
            {
                return Err(KinetextError::validation(format!(
                    "element {i} duration must be > 0"
                )));
            }
            if let Element::Solid { size, .. } = el
                && (size.0 == 0 || size.1 == 0)
            {
                return Err(KinetextError::validation(format!(
                    "element {i} solid size must be > 0"
                )));
            }
        }
        Ok(())
    }

    /// Number of frames covering the scene duration.
    pub fn frame_count(&self) -> u64 {
        self.fps.frames_for_secs_ceil(self.duration)
    }

    /// Assemble the scene with fonts resolved through the font index and shaped by parley.
    pub fn build(&self, assets_root: &Path) -> KinetextResult<Compositor> {
        self.build_with(assets_root, &parley_glyphs)
    }

    /// Assemble the scene, creating glyph sources through `glyphs`.
    #[tracing::instrument(level = "debug", skip(self, glyphs), fields(elements = self.elements.len()))]
    pub fn build_with(&self, assets_root: &Path, glyphs: &GlyphFactory) -> KinetextResult<Compositor> {
        self.validate()?;
        let mut cache = VariantCache::new();
        let mut layers = Vec::new();

        for el in &self.elements {
            let timing = el.timing();
            let duration = timing
                .duration
                .unwrap_or(self.duration - timing.start)
                .max(0.0);
            match el {
                Element::Karaoke { text, style, .. } => {
                    let source = glyphs(style.font.as_deref(), style.font_size)?;
                    let renderer = WordFrameRenderer::new(source, style.clone());
                    for layer in renderer.render_karaoke(text, duration, self.canvas, &mut cache) {
                        let start = layer.span().start + timing.start;
                        layers.push(layer.with_start(start).with_z(timing.z));
                    }
                }
                Element::StaticText { text, style, .. } => {
                    let source = glyphs(style.font.as_deref(), style.font_size)?;
                    let layer =
                        static_text_layer(text, duration, self.canvas, source.as_ref(), style);
                    layers.push(layer.with_start(timing.start).with_z(timing.z));
                }
                Element::Overlay { text, style, .. } => {
                    let source = glyphs(style.font.as_deref(), style.font_size)?;
                    let layer =
                        text_overlay_layer(text, duration, self.canvas, source.as_ref(), style);
                    layers.push(layer.with_start(timing.start).with_z(timing.z));
                }
                Element::Image {
                    path,
                    use_alpha,
                    position,
                    ..
                } => {
                    let full = if path.is_absolute() {
                        path.clone()
                    } else {
                        assets_root.join(path)
                    };
                    let img = RasterBuffer::load(&full)?;
                    let layer = if *use_alpha {
                        Layer::image_with_alpha(img)
                    } else {
                        Layer::image(img)
                    };
                    layers.push(timed(layer, timing.start, duration, timing.z, *position));
                }
                Element::Solid {
                    size,
                    color,
                    position,
                    ..
                } => {
                    let layer = Layer::solid(*size, *color);
                    layers.push(timed(layer, timing.start, duration, timing.z, *position));
                }
            }
        }

        tracing::debug!(layers = layers.len(), cached_lines = cache.len(), "scene assembled");
        Ok(Compositor::new(self.canvas, layers, self.background).with_duration(Some(self.duration)))
    }
}

fn timed(layer: Layer, start: f64, duration: f64, z: i32, position: ElementPosition) -> Layer {
    layer
        .with_start(start)
        .with_duration(duration)
        .with_z(z)
        .with_position(position.into())
}

fn parley_glyphs(font: Option<&str>, size_px: f32) -> KinetextResult<Arc<dyn GlyphSource>> {
    let loaded = resolve_font(&FontRequest::parse(font))?;
    Ok(Arc::new(ParleyGlyphSource::new(&loaded, size_px)?))
}

#[cfg(test)]
#[path = "../tests/unit/scene.rs"]
mod tests;
