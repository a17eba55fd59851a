use crate::effects::{EffectMasks, RasterEffect};
use crate::foundation::core::Rgb8;
use crate::raster::buffer::RasterBuffer;
use crate::raster::composite::composite_color;

/// Shadow cast inward from the glyph edge, clipped to the full text mask.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct InnerShadow {
    pub color: Rgb8,
    /// Pixel offset `(dx, dy)`; vacated pixels count as outside the glyph.
    pub offset: (i32, i32),
    pub blur: f32,
    pub opacity: f32,
}

impl Default for InnerShadow {
    fn default() -> Self {
        Self {
            color: Rgb8::BLACK,
            offset: (3, 3),
            blur: 5.0,
            opacity: 0.75,
        }
    }
}

impl RasterEffect for InnerShadow {
    fn apply(&self, img: &RasterBuffer, masks: EffectMasks<'_>) -> RasterBuffer {
        let mut out = img.clone();
        let shifted = masks.text.invert().shift(self.offset.0, self.offset.1, 255);
        let shifted = if self.blur > 0.0 {
            shifted.blur(self.blur)
        } else {
            shifted
        };
        let Ok(clipped) = shifted.multiply(masks.text) else {
            return out;
        };
        composite_color(&mut out, self.color, &clipped.amplify(1.5, self.opacity));
        out
    }
}

/// Glow radiating inward from the glyph edge, clipped to the full text mask.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct InnerGlow {
    pub color: Rgb8,
    /// Blur sigma controlling how far the glow reaches.
    pub size: f32,
    pub opacity: f32,
}

impl Default for InnerGlow {
    fn default() -> Self {
        Self {
            color: Rgb8::WHITE,
            size: 6.0,
            opacity: 0.75,
        }
    }
}

impl RasterEffect for InnerGlow {
    fn apply(&self, img: &RasterBuffer, masks: EffectMasks<'_>) -> RasterBuffer {
        let mut out = img.clone();
        let glow = masks.text.invert().blur(self.size.max(1.0));
        let Ok(glow) = glow.multiply(masks.text) else {
            return out;
        };
        composite_color(&mut out, self.color, &glow.amplify(2.0, self.opacity));
        out
    }
}

#[cfg(test)]
#[path = "../../tests/unit/effects/inner.rs"]
mod tests;
