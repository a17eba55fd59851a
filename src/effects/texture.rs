use std::path::PathBuf;
use std::sync::Arc;

use crate::effects::procedural::ProceduralTexture;
use crate::effects::{EffectMasks, RasterEffect};
use crate::foundation::error::KinetextResult;
use crate::foundation::math::trunc_to_u8;
use crate::raster::buffer::RasterBuffer;

/// Per-channel blend arithmetic on `[0, 1]` values.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlendMode {
    Normal,
    Multiply,
    Screen,
    #[default]
    Overlay,
}

impl BlendMode {
    /// Blend `overlay` onto `base`.
    pub fn blend(self, base: f32, overlay: f32) -> f32 {
        match self {
            Self::Normal => overlay,
            Self::Multiply => base * overlay,
            Self::Screen => 1.0 - (1.0 - base) * (1.0 - overlay),
            Self::Overlay => {
                if base < 0.5 {
                    2.0 * base * overlay
                } else {
                    1.0 - 2.0 * (1.0 - base) * (1.0 - overlay)
                }
            }
        }
    }

    fn blend_u8(self, base: u8, overlay: u8) -> u8 {
        let v = self.blend(f32::from(base) / 255.0, f32::from(overlay) / 255.0);
        trunc_to_u8(v * 255.0)
    }
}

/// Where the texture tile comes from.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextureSource {
    /// Image file decoded with `image`.
    Path(PathBuf),
    /// Generated noise tile.
    Procedural(ProceduralTexture),
    /// Already decoded raster.
    #[serde(skip)]
    Image(Arc<RasterBuffer>),
}

impl TextureSource {
    pub fn load(&self) -> KinetextResult<Arc<RasterBuffer>> {
        match self {
            Self::Path(path) => Ok(Arc::new(RasterBuffer::load(path)?)),
            Self::Procedural(p) => Ok(Arc::new(p.generate())),
            Self::Image(img) => Ok(Arc::clone(img)),
        }
    }
}

/// Tile a texture over the frame, blend it with the existing colors and mix it into the fill.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct TextureFill {
    pub source: Option<TextureSource>,
    /// Resize factor applied to the tile before tiling.
    pub scale: f32,
    pub opacity: f32,
    pub blend_mode: BlendMode,
}

impl Default for TextureFill {
    fn default() -> Self {
        Self {
            source: None,
            scale: 1.0,
            opacity: 0.5,
            blend_mode: BlendMode::Overlay,
        }
    }
}

impl TextureFill {
    /// Decode and rescale the source once, folding `scale` into the stored tile.
    ///
    /// On failure the effect degrades to a no-op.
    pub(crate) fn resolve_source(&mut self) {
        let Some(source) = &self.source else {
            return;
        };
        match source.load() {
            Ok(tex) => {
                self.source = Some(TextureSource::Image(self.scaled(tex)));
                self.scale = 1.0;
            }
            Err(err) => {
                tracing::warn!(error = %err, "texture fill disabled");
                self.source = None;
            }
        }
    }

    fn scaled(&self, tex: Arc<RasterBuffer>) -> Arc<RasterBuffer> {
        if (self.scale - 1.0).abs() <= f32::EPSILON || !self.scale.is_finite() || self.scale <= 0.0
        {
            return tex;
        }
        let tw = ((tex.width() as f32 * self.scale) as u32).max(1);
        let th = ((tex.height() as f32 * self.scale) as u32).max(1);
        Arc::new(tex.resize_lanczos(tw, th))
    }

    fn tile(&self) -> Option<Arc<RasterBuffer>> {
        match self.source.as_ref()?.load() {
            Ok(tex) => Some(self.scaled(tex)),
            Err(err) => {
                tracing::warn!(error = %err, "texture fill skipped");
                None
            }
        }
    }
}

impl RasterEffect for TextureFill {
    fn apply(&self, img: &RasterBuffer, masks: EffectMasks<'_>) -> RasterBuffer {
        let mut out = img.clone();
        let Some(tile) = self.tile() else {
            return out;
        };
        if masks.fill.size() != img.size() {
            return out;
        }
        let opacity = self.opacity.clamp(0.0, 1.0);
        let (tw, th) = (tile.width() as usize, tile.height() as usize);
        let width = img.width() as usize;
        let tex = tile.data();
        let mask = masks.fill.data();

        for (i, px) in out.data_mut().chunks_exact_mut(4).enumerate() {
            let factor = f32::from(mask[i]) / 255.0 * opacity;
            if factor <= 0.0 {
                continue;
            }
            let (x, y) = (i % width, i / width);
            let t = ((y % th) * tw + (x % tw)) * 4;
            for c in 0..3 {
                let base = px[c];
                let blended = self.blend_mode.blend_u8(base, tex[t + c]);
                let v = f32::from(base) * (1.0 - factor) + f32::from(blended) * factor;
                px[c] = trunc_to_u8(v);
            }
        }
        out
    }
}

#[cfg(test)]
#[path = "../../tests/unit/effects/texture.rs"]
mod tests;
