//! Photoshop-style raster effects applied inside a text mask.
//!
//! Each effect is a pure function from `(raster, masks)` to a new raster. An [`EffectStack`]
//! normalizes a list of [`EffectSpec`] entries into the fixed application order
//! chrome → gradient overlay → texture fill → bevel/emboss → inner shadow → inner glow.

pub mod bevel;
pub mod chrome;
pub mod gradient;
pub mod inner;
pub mod procedural;
pub mod texture;

pub use bevel::{BevelEmboss, BevelStyle};
pub use chrome::Chrome;
pub use gradient::{GradientOverlay, GradientStops, gradient_overlay_layer, linear_gradient};
pub use inner::{InnerGlow, InnerShadow};
pub use procedural::ProceduralTexture;
pub use texture::{BlendMode, TextureFill, TextureSource};

use crate::raster::buffer::RasterBuffer;
use crate::raster::mask::Mask;

/// Masks handed to every effect.
#[derive(Clone, Copy, Debug)]
pub struct EffectMasks<'a> {
    /// Full text-only coverage (fill and stroke).
    pub text: &'a Mask,
    /// Coverage used by color-replacement effects; eroded when the stroke is wider than 1px.
    pub fill: &'a Mask,
}

/// A stateless raster transform bounded by text masks.
pub trait RasterEffect {
    fn apply(&self, img: &RasterBuffer, masks: EffectMasks<'_>) -> RasterBuffer;
}

/// One configured effect.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Effect {
    Chrome(Chrome),
    GradientOverlay(GradientOverlay),
    TextureFill(TextureFill),
    BevelEmboss(BevelEmboss),
    InnerShadow(InnerShadow),
    InnerGlow(InnerGlow),
}

impl Effect {
    /// Position in the fixed application order.
    pub fn rank(&self) -> u8 {
        match self {
            Self::Chrome(_) => 0,
            Self::GradientOverlay(_) => 1,
            Self::TextureFill(_) => 2,
            Self::BevelEmboss(_) => 3,
            Self::InnerShadow(_) => 4,
            Self::InnerGlow(_) => 5,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Chrome(_) => "chrome",
            Self::GradientOverlay(_) => "gradient_overlay",
            Self::TextureFill(_) => "texture_fill",
            Self::BevelEmboss(_) => "bevel_emboss",
            Self::InnerShadow(_) => "inner_shadow",
            Self::InnerGlow(_) => "inner_glow",
        }
    }
}

impl RasterEffect for Effect {
    fn apply(&self, img: &RasterBuffer, masks: EffectMasks<'_>) -> RasterBuffer {
        match self {
            Self::Chrome(e) => e.apply(img, masks),
            Self::GradientOverlay(e) => e.apply(img, masks),
            Self::TextureFill(e) => e.apply(img, masks),
            Self::BevelEmboss(e) => e.apply(img, masks),
            Self::InnerShadow(e) => e.apply(img, masks),
            Self::InnerGlow(e) => e.apply(img, masks),
        }
    }
}

fn default_enabled() -> bool {
    true
}

/// An effect plus its enabled flag, as it appears in configuration:
/// `{"kind": "inner_glow", "enabled": true, "size": 6.0}`.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct EffectSpec {
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(flatten)]
    pub effect: Effect,
}

impl EffectSpec {
    pub fn enabled(effect: Effect) -> Self {
        Self {
            enabled: true,
            effect,
        }
    }

    pub fn disabled(effect: Effect) -> Self {
        Self {
            enabled: false,
            effect,
        }
    }
}

impl From<Effect> for EffectSpec {
    fn from(effect: Effect) -> Self {
        Self::enabled(effect)
    }
}

/// Normalized, ordered list of enabled effects.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EffectStack {
    stroke_width: u32,
    effects: Vec<Effect>,
}

impl EffectStack {
    /// Keep enabled entries, sort them into the fixed order and resolve texture sources once.
    ///
    /// `stroke_width` decides whether color-replacement effects see an eroded fill mask.
    pub fn new(specs: &[EffectSpec], stroke_width: u32) -> Self {
        let mut effects: Vec<Effect> = specs
            .iter()
            .filter(|s| s.enabled)
            .map(|s| s.effect.clone())
            .collect();
        effects.sort_by_key(Effect::rank);
        for effect in &mut effects {
            if let Effect::TextureFill(fill) = effect {
                fill.resolve_source();
            }
        }
        Self {
            stroke_width,
            effects,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }

    pub fn effects(&self) -> &[Effect] {
        &self.effects
    }

    pub fn stroke_width(&self) -> u32 {
        self.stroke_width
    }

    /// Fill mask for color-replacement effects.
    ///
    /// With a stroke wider than 1px the text mask is eroded by a square of side
    /// `max(3, 2 * stroke - 1)` (forced odd) so the outline keeps its own color.
    pub fn fill_mask(&self, text_mask: &Mask) -> Mask {
        if self.stroke_width > 1 {
            let size = self.stroke_width.saturating_mul(2).saturating_sub(1).max(3);
            let size = if size.is_multiple_of(2) { size + 1 } else { size };
            text_mask.erode(size)
        } else {
            text_mask.clone()
        }
    }

    /// Apply every effect in order. An empty stack returns an identical copy of `img`.
    #[tracing::instrument(level = "debug", skip_all, fields(effects = self.effects.len()))]
    pub fn apply(&self, img: &RasterBuffer, text_mask: &Mask) -> RasterBuffer {
        if self.effects.is_empty() {
            return img.clone();
        }
        if text_mask.size() != img.size() {
            tracing::warn!(
                img = ?img.size(),
                mask = ?text_mask.size(),
                "text mask does not match raster; skipping effects"
            );
            return img.clone();
        }
        let fill = self.fill_mask(text_mask);
        let masks = EffectMasks {
            text: text_mask,
            fill: &fill,
        };
        let mut out = img.clone();
        for effect in &self.effects {
            out = effect.apply(&out, masks);
        }
        out
    }
}

#[cfg(test)]
#[path = "../../tests/unit/effects/mod.rs"]
mod tests;
