use crate::effects::EffectSpec;
use crate::foundation::core::Rgb8;

/// Drop shadow drawn once per line beneath every word.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ShadowStyle {
    pub enabled: bool,
    pub offset: (i32, i32),
    pub blur: f32,
}

impl Default for ShadowStyle {
    fn default() -> Self {
        Self {
            enabled: true,
            offset: (2, 2),
            blur: 4.0,
        }
    }
}

impl ShadowStyle {
    /// Vertical/horizontal room the blurred shadow needs around the glyphs.
    pub(crate) fn pad(&self, stroke: u32) -> u32 {
        let reach = self.offset.0.unsigned_abs().max(self.offset.1.unsigned_abs());
        ((self.blur.max(0.0) * 2.0).ceil() as u32)
            .saturating_add(stroke)
            .saturating_add(reach)
    }
}

/// Halo around the highlighted word. Only drawn when the shadow is disabled.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct GlowStyle {
    pub enabled: bool,
    pub color: Rgb8,
    pub size: u32,
}

impl Default for GlowStyle {
    fn default() -> Self {
        Self {
            enabled: false,
            color: Rgb8::new(255, 255, 0),
            size: 6,
        }
    }
}

impl GlowStyle {
    /// Dilation applied to the glyph coverage before blurring.
    pub(crate) fn stroke(&self) -> u32 {
        (self.size / 2).max(2)
    }
}

/// Rounded, blurred box behind the highlighted word.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct HighlightBoxStyle {
    pub enabled: bool,
    pub color: Rgb8,
    pub radius: u32,
    pub blur: u32,
    pub opacity: f32,
}

impl Default for HighlightBoxStyle {
    fn default() -> Self {
        Self {
            enabled: true,
            color: Rgb8::new(0, 0, 255),
            radius: 8,
            blur: 8,
            opacity: 0.3,
        }
    }
}

/// Everything the word renderer needs to style one karaoke line.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct TextStyle {
    /// Font family name or path; `None` walks the fallback list.
    pub font: Option<String>,
    pub font_size: f32,
    pub text_color: Rgb8,
    pub highlight_color: Rgb8,
    pub stroke_color: Rgb8,
    pub stroke_width: u32,
    pub max_words_per_line: usize,
    /// Vertical placement of the line as a fraction of the canvas height.
    pub position_y_ratio: f32,
    /// Horizontal margin on each side; the line budget is `width - 2 * side_margin`.
    pub side_margin: u32,
    pub uppercase: bool,
    pub shadow: ShadowStyle,
    pub glow: GlowStyle,
    pub highlight_box: HighlightBoxStyle,
    pub effects: Vec<EffectSpec>,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            font: None,
            font_size: 65.0,
            text_color: Rgb8::WHITE,
            highlight_color: Rgb8::new(255, 255, 0),
            stroke_color: Rgb8::BLACK,
            stroke_width: 4,
            max_words_per_line: 4,
            position_y_ratio: 0.72,
            side_margin: 40,
            uppercase: true,
            shadow: ShadowStyle::default(),
            glow: GlowStyle::default(),
            highlight_box: HighlightBoxStyle::default(),
            effects: Vec::new(),
        }
    }
}

impl TextStyle {
    /// Glow is only used for the highlighted word, and only without a drop shadow.
    pub fn uses_glow(&self) -> bool {
        self.glow.enabled && !self.shadow.enabled
    }

    /// Pixel budget for one packed line on a canvas of `width`.
    pub fn line_budget(&self, width: u32) -> u32 {
        width.saturating_sub(self.side_margin.saturating_mul(2))
    }

    /// Split text into words, uppercasing when configured.
    pub fn words(&self, text: &str) -> Vec<String> {
        text.split_whitespace()
            .map(|w| {
                if self.uppercase {
                    w.to_uppercase()
                } else {
                    w.to_string()
                }
            })
            .collect()
    }

    /// Vertical room around the line so shadow, glow and box blur never crop.
    pub(crate) fn frame_margin(&self) -> u32 {
        let stroke = self.stroke_width;
        let mut pad = stroke;
        if self.shadow.enabled {
            pad = pad.max(self.shadow.pad(stroke));
        }
        if self.uses_glow() {
            pad = pad.max(self.glow.size.saturating_mul(2).saturating_add(stroke));
        }
        if self.highlight_box.enabled {
            pad = pad.max(self.highlight_box.blur.saturating_mul(2).saturating_add(12));
        }
        pad.saturating_add(10).max(20)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/text/style.rs"]
mod tests;
