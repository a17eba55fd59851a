use smallvec::smallvec;

use crate::effects::bevel::{BevelEmboss, BevelStyle};
use crate::effects::gradient::{GradientOverlay, GradientStops};
use crate::effects::{EffectMasks, RasterEffect};
use crate::foundation::core::Rgb8;
use crate::raster::buffer::RasterBuffer;

/// Polished-silver bands, top to bottom.
pub fn default_chrome_stops() -> GradientStops {
    smallvec![
        Rgb8::new(255, 255, 255),
        Rgb8::new(210, 215, 230),
        Rgb8::new(100, 105, 130),
        Rgb8::new(245, 248, 255),
        Rgb8::new(120, 125, 150),
        Rgb8::new(250, 252, 255),
        Rgb8::new(80, 85, 110),
        Rgb8::new(230, 235, 248),
        Rgb8::new(60, 65, 90),
    ]
}

/// Metallic preset: a vertical multi-stop gradient over the fill followed by a strong inner bevel.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct Chrome {
    /// Gradient stops; `None` uses [`default_chrome_stops`].
    pub colors: Option<GradientStops>,
    pub opacity: f32,
}

impl Default for Chrome {
    fn default() -> Self {
        Self {
            colors: None,
            opacity: 0.9,
        }
    }
}

impl Chrome {
    fn gradient(&self) -> GradientOverlay {
        GradientOverlay {
            colors: self.colors.clone().unwrap_or_else(default_chrome_stops),
            angle: 90.0,
            opacity: self.opacity.clamp(0.0, 1.0),
        }
    }

    fn bevel(&self) -> BevelEmboss {
        let opacity = self.opacity.clamp(0.0, 1.0);
        BevelEmboss {
            style: BevelStyle::InnerBevel,
            depth: 8.0,
            angle: 135.0,
            highlight_color: Rgb8::WHITE,
            shadow_color: Rgb8::new(20, 20, 45),
            highlight_opacity: (opacity + 0.5).min(1.0),
            shadow_opacity: (opacity * 0.75).min(1.0),
            soften: 1.0,
        }
    }
}

impl RasterEffect for Chrome {
    fn apply(&self, img: &RasterBuffer, masks: EffectMasks<'_>) -> RasterBuffer {
        let out = self.gradient().apply(img, masks);
        self.bevel().apply(&out, masks)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/effects/chrome.rs"]
mod tests;
