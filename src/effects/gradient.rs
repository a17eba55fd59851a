use smallvec::{SmallVec, smallvec};

use crate::effects::{EffectMasks, RasterEffect};
use crate::foundation::core::Rgb8;
use crate::foundation::math::trunc_to_u8;
use crate::raster::buffer::RasterBuffer;
use crate::raster::composite::alpha_composite;
use crate::raster::mask::Mask;

/// Ordered color stops, evenly spaced along the gradient axis.
pub type GradientStops = SmallVec<[Rgb8; 4]>;

fn default_stops() -> GradientStops {
    smallvec![Rgb8::new(255, 215, 0), Rgb8::new(255, 140, 0)]
}

/// Linear gradient blended over the fill area.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct GradientOverlay {
    /// Two or more stops; a single stop is repeated.
    pub colors: GradientStops,
    /// Degrees; 0 runs left to right, 90 top to bottom.
    pub angle: f32,
    pub opacity: f32,
}

impl Default for GradientOverlay {
    fn default() -> Self {
        Self {
            colors: default_stops(),
            angle: 0.0,
            opacity: 0.8,
        }
    }
}

impl RasterEffect for GradientOverlay {
    fn apply(&self, img: &RasterBuffer, masks: EffectMasks<'_>) -> RasterBuffer {
        let mut out = img.clone();
        if self.colors.is_empty() {
            return out;
        }
        let layer = gradient_overlay_layer(&self.colors, self.angle, masks.fill, self.opacity);
        alpha_composite(&mut out, &layer);
        out
    }
}

/// Opaque linear gradient covering `width x height`.
///
/// Pixels are projected onto the axis at `angle_deg` and normalized by the axis's extent at that
/// angle (`|cos| * w/2 + |sin| * h/2`), so the gradient spans edge to edge.
pub fn linear_gradient(width: u32, height: u32, colors: &[Rgb8], angle_deg: f32) -> RasterBuffer {
    let width = width.max(1);
    let height = height.max(1);
    let mut out = RasterBuffer::new(width, height);
    let stops: SmallVec<[Rgb8; 4]> = match colors {
        [] => return out,
        [only] => smallvec![*only, *only],
        many => SmallVec::from_slice(many),
    };
    let segments = (stops.len() - 1) as f32;

    let rad = angle_deg.to_radians();
    let (sin_a, cos_a) = rad.sin_cos();
    let half_w = width as f32 / 2.0;
    let half_h = height as f32 / 2.0;
    let max_proj = (cos_a.abs() * half_w + sin_a.abs() * half_h).max(1.0);

    let data = out.data_mut();
    for y in 0..height {
        let py = y as f32 - half_h;
        for x in 0..width {
            let px = x as f32 - half_w;
            let proj = px * cos_a + py * sin_a;
            let t = ((proj / max_proj + 1.0) / 2.0).clamp(0.0, 1.0);

            let seg = ((t * segments).floor() as usize).min(stops.len() - 2);
            let t0 = seg as f32 / segments;
            let t1 = (seg + 1) as f32 / segments;
            let s = ((t - t0) / (t1 - t0)).clamp(0.0, 1.0);
            let (a, b) = (stops[seg], stops[seg + 1]);
            let mix = |c0: u8, c1: u8| {
                trunc_to_u8(f32::from(c0) + (f32::from(c1) - f32::from(c0)) * s)
            };

            let i = (y as usize * width as usize + x as usize) * 4;
            data[i] = mix(a.r, b.r);
            data[i + 1] = mix(a.g, b.g);
            data[i + 2] = mix(a.b, b.b);
            data[i + 3] = 255;
        }
    }
    out
}

/// Gradient sized to `fill` with alpha `fill * opacity`, ready to composite over the source.
pub fn gradient_overlay_layer(
    colors: &[Rgb8],
    angle_deg: f32,
    fill: &Mask,
    opacity: f32,
) -> RasterBuffer {
    let mut layer = linear_gradient(fill.width(), fill.height(), colors, angle_deg);
    let opacity = opacity.clamp(0.0, 1.0);
    for (px, &m) in layer.data_mut().chunks_exact_mut(4).zip(fill.data()) {
        px[3] = trunc_to_u8(f32::from(m) * opacity);
    }
    layer
}

#[cfg(test)]
#[path = "../../tests/unit/effects/gradient.rs"]
mod tests;
