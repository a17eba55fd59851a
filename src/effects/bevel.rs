use crate::effects::{EffectMasks, RasterEffect};
use crate::foundation::core::Rgb8;
use crate::foundation::math::trunc_to_u8;
use crate::raster::buffer::RasterBuffer;
use crate::raster::composite::composite_color;
use crate::raster::mask::Mask;
use crate::raster::sample::shift_bicubic;

/// Where the bevel lighting is allowed to land.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BevelStyle {
    /// Inside the glyph only.
    #[default]
    InnerBevel,
    /// Outside the glyph only.
    OuterBevel,
    /// Everywhere.
    Emboss,
}

/// Height-map lighting: highlight on the lit side, shadow on the far side.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct BevelEmboss {
    pub style: BevelStyle,
    /// Shift distance in pixels.
    pub depth: f32,
    /// Light angle in degrees.
    pub angle: f32,
    pub highlight_color: Rgb8,
    pub shadow_color: Rgb8,
    pub highlight_opacity: f32,
    pub shadow_opacity: f32,
    /// Extra height-map blur.
    pub soften: f32,
}

impl Default for BevelEmboss {
    fn default() -> Self {
        Self {
            style: BevelStyle::InnerBevel,
            depth: 3.0,
            angle: 135.0,
            highlight_color: Rgb8::WHITE,
            shadow_color: Rgb8::BLACK,
            highlight_opacity: 0.75,
            shadow_opacity: 0.75,
            soften: 0.0,
        }
    }
}

impl BevelEmboss {
    /// Signed bump map in `[-1, 1]`: height map minus its light-shifted copy, re-smoothed and
    /// contrast-boosted in proportion to depth.
    fn bump_map(&self, text: &Mask) -> Vec<f32> {
        let (w, h) = text.size();
        let height_map = text.blur((self.soften + 2.0).max(2.5));
        let height_plane: Vec<f32> = height_map.data().iter().map(|&v| f32::from(v)).collect();

        let rad = f64::from(self.angle).to_radians();
        let dx = rad.cos() * f64::from(self.depth);
        let dy = -rad.sin() * f64::from(self.depth);
        let shifted = shift_bicubic(&height_plane, w, h, dx, -dy);

        let bump_u8: Vec<u8> = height_map
            .data()
            .iter()
            .zip(&shifted)
            .map(|(&a, &s)| {
                let s = s.round().clamp(0.0, 255.0) / 255.0;
                let bump = f32::from(a) / 255.0 - s;
                trunc_to_u8((bump + 1.0) * 127.5)
            })
            .collect();
        let bump_mask = Mask::from_raw_unchecked(w, h, bump_u8).blur((self.depth * 0.6).max(1.2));

        let contrast = (self.depth * 0.7).max(1.0);
        bump_mask
            .data()
            .iter()
            .map(|&v| ((f32::from(v) / 127.5 - 1.0) * contrast).clamp(-1.0, 1.0))
            .collect()
    }

    fn lighting_alpha(
        &self,
        side: &[f32],
        opacity: f32,
        clip: Option<&[f32]>,
        (w, h): (u32, u32),
    ) -> Mask {
        let opacity = opacity.clamp(0.0, 1.0);
        let raw = side.iter().map(|&v| trunc_to_u8(v * 255.0 * opacity)).collect();
        let smoothed = Mask::from_raw_unchecked(w, h, raw).blur((self.depth * 0.35).max(0.7));
        match clip {
            None => smoothed,
            Some(clip) => {
                let data = smoothed
                    .data()
                    .iter()
                    .zip(clip)
                    .map(|(&a, &c)| trunc_to_u8(f32::from(a) * c))
                    .collect();
                Mask::from_raw_unchecked(w, h, data)
            }
        }
    }
}

impl RasterEffect for BevelEmboss {
    fn apply(&self, img: &RasterBuffer, masks: EffectMasks<'_>) -> RasterBuffer {
        let mut out = img.clone();
        let text = masks.text;
        if text.size() != img.size() {
            return out;
        }

        let bump = self.bump_map(text);
        let orig = text.to_unit_plane();

        let (area, clip): (Option<Vec<f32>>, Option<Vec<f32>>) = match self.style {
            BevelStyle::InnerBevel => (
                Some(orig.iter().map(|&a| (a * 1.5).clamp(0.0, 1.0)).collect()),
                Some(orig.clone()),
            ),
            BevelStyle::OuterBevel => (
                Some(orig.iter().map(|&a| ((1.0 - a) * 1.5).clamp(0.0, 1.0)).collect()),
                Some(orig.iter().map(|&a| 1.0 - a).collect()),
            ),
            BevelStyle::Emboss => (None, None),
        };

        let mut hi: Vec<f32> = bump.iter().map(|&b| b.clamp(0.0, 1.0)).collect();
        let mut sh: Vec<f32> = bump.iter().map(|&b| (-b).clamp(0.0, 1.0)).collect();
        if let Some(area) = &area {
            for ((h, s), &a) in hi.iter_mut().zip(sh.iter_mut()).zip(area) {
                *h *= a;
                *s *= a;
            }
        }

        let size = img.size();
        let hi_alpha = self.lighting_alpha(&hi, self.highlight_opacity, clip.as_deref(), size);
        composite_color(&mut out, self.highlight_color, &hi_alpha);
        let sh_alpha = self.lighting_alpha(&sh, self.shadow_opacity, clip.as_deref(), size);
        composite_color(&mut out, self.shadow_color, &sh_alpha);
        out
    }
}

#[cfg(test)]
#[path = "../../tests/unit/effects/bevel.rs"]
mod tests;
