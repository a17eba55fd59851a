use xxhash_rust::xxh3::xxh3_64_with_seed;

use crate::foundation::core::Rgb8;
use crate::foundation::math::trunc_to_u8;
use crate::raster::blur::{EdgeMode, blur_u8};
use crate::raster::buffer::RasterBuffer;

/// Tileable grunge texture built from blurred noise octaves.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ProceduralTexture {
    pub width: u32,
    pub height: u32,
    /// Color at normalized value 0.
    pub base_color: Rgb8,
    /// Color at normalized value 1.
    pub accent_color: Rgb8,
    /// Number of noise octaves.
    pub roughness: u32,
    pub seed: u64,
}

impl Default for ProceduralTexture {
    fn default() -> Self {
        Self {
            width: 256,
            height: 256,
            base_color: Rgb8::new(40, 10, 10),
            accent_color: Rgb8::new(120, 30, 20),
            roughness: 8,
            seed: 42,
        }
    }
}

impl ProceduralTexture {
    /// Render the tile. Identical parameters always produce identical bytes.
    #[tracing::instrument(level = "debug", skip(self), fields(w = self.width, h = self.height))]
    pub fn generate(&self) -> RasterBuffer {
        let width = self.width.max(1);
        let height = self.height.max(1);
        let n = width as usize * height as usize;
        let mut composite = vec![0f32; n];

        for octave in 0..self.roughness {
            let noise = noise_octave(width, height, octave, self.seed);
            let sigma = self.roughness.saturating_sub(octave).max(1) as f32;
            let blurred = blur_u8(&noise, width, height, 1, sigma, EdgeMode::Wrap);
            let weight = 1.0 / (1.0 + octave as f32);
            for (acc, &v) in composite.iter_mut().zip(&blurred) {
                *acc += f32::from(v) * weight;
            }
        }

        let (lo, hi) = composite
            .iter()
            .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), &v| {
                (lo.min(v), hi.max(v))
            });
        let range = hi - lo;

        let mut rgb = Vec::with_capacity(n * 3);
        let (base, accent) = (self.base_color, self.accent_color);
        for &v in &composite {
            let norm = if range > 0.0 { (v - lo) / range } else { 0.5 };
            let t = 1.0 / (1.0 + (-6.0 * (norm - 0.5)).exp());
            let mix = |a: u8, b: u8| trunc_to_u8(f32::from(a) * (1.0 - t) + f32::from(b) * t);
            rgb.extend_from_slice(&[
                mix(base.r, accent.r),
                mix(base.g, accent.g),
                mix(base.b, accent.b),
            ]);
        }

        match RasterBuffer::from_rgb8(width, height, &rgb) {
            Ok(buf) => buf,
            Err(_) => RasterBuffer::filled(width, height, base.with_alpha(255)),
        }
    }
}

fn noise_octave(width: u32, height: u32, octave: u32, seed: u64) -> Vec<u8> {
    let mut key = [0u8; 12];
    key[..4].copy_from_slice(&octave.to_le_bytes());
    let mut out = Vec::with_capacity(width as usize * height as usize);
    for y in 0..height {
        key[4..8].copy_from_slice(&y.to_le_bytes());
        for x in 0..width {
            key[8..].copy_from_slice(&x.to_le_bytes());
            out.push((xxh3_64_with_seed(&key, seed) >> 56) as u8);
        }
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/effects/procedural.rs"]
mod tests;
