use crate::foundation::error::{KinetextError, KinetextResult};
use crate::foundation::math::{mul_div255_u8, trunc_to_u8};
use crate::raster::blur::{self, EdgeMode};

#[derive(Clone, Debug, PartialEq, Eq)]
/// Single-channel 8-bit opacity field (`0` transparent, `255` opaque).
///
/// Every derived mask (inverted, eroded, blurred, shifted) is a new value.
pub struct Mask {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl Mask {
    /// All-zero mask. Degenerate sizes are clamped to 1x1.
    pub fn new(width: u32, height: u32) -> Self {
        Self::filled(width, height, 0)
    }

    pub fn filled(width: u32, height: u32, value: u8) -> Self {
        let width = width.max(1);
        let height = height.max(1);
        Self {
            width,
            height,
            data: vec![value; width as usize * height as usize],
        }
    }

    pub fn from_raw(width: u32, height: u32, data: Vec<u8>) -> KinetextResult<Self> {
        if width == 0 || height == 0 || data.len() != width as usize * height as usize {
            return Err(KinetextError::validation(format!(
                "mask of {} bytes does not match {width}x{height}",
                data.len()
            )));
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    pub(crate) fn from_raw_unchecked(width: u32, height: u32, data: Vec<u8>) -> Self {
        debug_assert_eq!(data.len(), width as usize * height as usize);
        Self {
            width,
            height,
            data,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    pub fn get(&self, x: u32, y: u32) -> u8 {
        if x >= self.width || y >= self.height {
            return 0;
        }
        self.data[y as usize * self.width as usize + x as usize]
    }

    /// Normalized `[0, 1]` copy of the mask.
    pub(crate) fn to_unit_plane(&self) -> Vec<f32> {
        self.data.iter().map(|&v| f32::from(v) / 255.0).collect()
    }

    pub fn invert(&self) -> Self {
        let data = self.data.iter().map(|&v| 255 - v).collect();
        Self::from_raw_unchecked(self.width, self.height, data)
    }

    /// Square minimum filter of side `size` (forced odd). Shrinks opaque regions.
    pub fn erode(&self, size: u32) -> Self {
        let size = if size.is_multiple_of(2) { size + 1 } else { size };
        let r = (size / 2) as i32;
        if r == 0 {
            return self.clone();
        }
        let rows = self.filter_rows(r, u8::min, u8::MAX);
        rows.filter_cols(r, u8::min, u8::MAX)
    }

    /// Disk maximum filter of radius `radius`. Grows opaque regions.
    pub fn dilate(&self, radius: u32) -> Self {
        if radius == 0 {
            return self.clone();
        }
        let r = radius as i32;
        let spans: Vec<(i32, i32)> = (-r..=r)
            .map(|dy| {
                let reach = (((r * r - dy * dy) as f32).sqrt()).floor() as i32;
                (dy, reach)
            })
            .collect();

        let w = self.width as i32;
        let h = self.height as i32;
        let mut out = vec![0u8; self.data.len()];
        for y in 0..h {
            for x in 0..w {
                let mut best = 0u8;
                'scan: for &(dy, reach) in &spans {
                    let sy = y + dy;
                    if sy < 0 || sy >= h {
                        continue;
                    }
                    let row = (sy * w) as usize;
                    let x0 = (x - reach).max(0);
                    let x1 = (x + reach).min(w - 1);
                    for sx in x0..=x1 {
                        let v = self.data[row + sx as usize];
                        if v > best {
                            best = v;
                            if best == 255 {
                                break 'scan;
                            }
                        }
                    }
                }
                out[(y * w + x) as usize] = best;
            }
        }
        Self::from_raw_unchecked(self.width, self.height, out)
    }

    /// Gaussian blur with standard deviation `sigma`; edges are clamped.
    pub fn blur(&self, sigma: f32) -> Self {
        self.blur_with(sigma, EdgeMode::Clamp)
    }

    pub fn blur_with(&self, sigma: f32, edge: EdgeMode) -> Self {
        let data = blur::blur_u8(&self.data, self.width, self.height, 1, sigma, edge);
        Self::from_raw_unchecked(self.width, self.height, data)
    }

    /// Translate by `(dx, dy)`; uncovered pixels take `fill`.
    pub fn shift(&self, dx: i32, dy: i32, fill: u8) -> Self {
        let w = self.width as i32;
        let h = self.height as i32;
        let mut out = vec![fill; self.data.len()];
        for y in 0..h {
            let sy = y - dy;
            if sy < 0 || sy >= h {
                continue;
            }
            for x in 0..w {
                let sx = x - dx;
                if sx < 0 || sx >= w {
                    continue;
                }
                out[(y * w + x) as usize] = self.data[(sy * w + sx) as usize];
            }
        }
        Self::from_raw_unchecked(self.width, self.height, out)
    }

    /// Pixelwise `a * b / 255`. Sizes must match.
    pub fn multiply(&self, other: &Mask) -> KinetextResult<Self> {
        if self.size() != other.size() {
            return Err(KinetextError::evaluation(
                "mask multiply expects equal-size masks",
            ));
        }
        let data = self
            .data
            .iter()
            .zip(&other.data)
            .map(|(&a, &b)| mul_div255_u8(u16::from(a), u16::from(b)))
            .collect();
        Ok(Self::from_raw_unchecked(self.width, self.height, data))
    }

    /// `trunc(min(255, v * gain) * opacity)`, the amplify step used by the edge effects.
    pub fn amplify(&self, gain: f32, opacity: f32) -> Self {
        let opacity = opacity.clamp(0.0, 1.0);
        let data = self
            .data
            .iter()
            .map(|&v| trunc_to_u8((f32::from(v) * gain).min(255.0) * opacity))
            .collect();
        Self::from_raw_unchecked(self.width, self.height, data)
    }

    /// True when every value is `255`.
    pub fn is_opaque(&self) -> bool {
        self.data.iter().all(|&v| v == 255)
    }

    /// Copy of `[x0, x1) x [y0, y1)`, clamped to the mask.
    pub fn crop(&self, x0: u32, y0: u32, x1: u32, y1: u32) -> Self {
        let x1 = x1.min(self.width);
        let y1 = y1.min(self.height);
        let x0 = x0.min(x1);
        let y0 = y0.min(y1);
        let mut out = Self::new(x1 - x0, y1 - y0);
        if x1 == x0 || y1 == y0 {
            return out;
        }
        let row = (x1 - x0) as usize;
        for (dy, y) in (y0..y1).enumerate() {
            let src = y as usize * self.width as usize + x0 as usize;
            let dst = dy * out.width as usize;
            out.data[dst..dst + row].copy_from_slice(&self.data[src..src + row]);
        }
        out
    }

    /// Paste `src` at `(x, y)` keeping the per-pixel maximum; out-of-bounds parts are dropped.
    pub fn max_in_place(&mut self, src: &Mask, x: i32, y: i32) {
        let w = self.width as i32;
        let h = self.height as i32;
        for sy in 0..src.height as i32 {
            let dy = y + sy;
            if dy < 0 || dy >= h {
                continue;
            }
            for sx in 0..src.width as i32 {
                let dx = x + sx;
                if dx < 0 || dx >= w {
                    continue;
                }
                let v = src.data[(sy * src.width as i32 + sx) as usize];
                let d = &mut self.data[(dy * w + dx) as usize];
                *d = (*d).max(v);
            }
        }
    }

    fn filter_rows(&self, r: i32, pick: fn(u8, u8) -> u8, init: u8) -> Self {
        let w = self.width as i32;
        let mut out = vec![0u8; self.data.len()];
        for y in 0..self.height as i32 {
            let row = (y * w) as usize;
            for x in 0..w {
                let mut acc = init;
                for sx in (x - r).max(0)..=(x + r).min(w - 1) {
                    acc = pick(acc, self.data[row + sx as usize]);
                }
                out[row + x as usize] = acc;
            }
        }
        Self::from_raw_unchecked(self.width, self.height, out)
    }

    fn filter_cols(&self, r: i32, pick: fn(u8, u8) -> u8, init: u8) -> Self {
        let w = self.width as i32;
        let h = self.height as i32;
        let mut out = vec![0u8; self.data.len()];
        for y in 0..h {
            for x in 0..w {
                let mut acc = init;
                for sy in (y - r).max(0)..=(y + r).min(h - 1) {
                    acc = pick(acc, self.data[(sy * w + x) as usize]);
                }
                out[(y * w + x) as usize] = acc;
            }
        }
        Self::from_raw_unchecked(self.width, self.height, out)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/raster/mask.rs"]
mod tests;
