use crate::foundation::core::{Rgb8, Rgba8};
use crate::foundation::error::{KinetextError, KinetextResult};
use crate::raster::mask::Mask;

#[derive(Clone, Debug, PartialEq, Eq)]
/// CPU raster in row-major straight-alpha RGBA8.
///
/// Every spatial operation preserves the buffer dimensions unless it explicitly resizes. Effects
/// never mutate a buffer they were handed by reference; they clone and return a new value.
pub struct RasterBuffer {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl RasterBuffer {
    /// Fully transparent buffer. Degenerate sizes are clamped to 1x1.
    pub fn new(width: u32, height: u32) -> Self {
        Self::filled(width, height, Rgba8::TRANSPARENT)
    }

    /// Buffer filled with a single color. Degenerate sizes are clamped to 1x1.
    pub fn filled(width: u32, height: u32, color: Rgba8) -> Self {
        let width = width.max(1);
        let height = height.max(1);
        let data = color.to_array().repeat(width as usize * height as usize);
        Self {
            width,
            height,
            data,
        }
    }

    /// Wrap existing RGBA8 bytes.
    pub fn from_rgba8(width: u32, height: u32, data: Vec<u8>) -> KinetextResult<Self> {
        let expected = rgba_len(width, height)?;
        if width == 0 || height == 0 || data.len() != expected {
            return Err(KinetextError::validation(format!(
                "rgba8 buffer of {} bytes does not match {width}x{height}",
                data.len()
            )));
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Expand RGB8 bytes into an opaque buffer.
    pub fn from_rgb8(width: u32, height: u32, rgb: &[u8]) -> KinetextResult<Self> {
        let expected = (width as usize)
            .checked_mul(height as usize)
            .and_then(|v| v.checked_mul(3))
            .ok_or_else(|| KinetextError::validation("rgb8 buffer size overflow"))?;
        if width == 0 || height == 0 || rgb.len() != expected {
            return Err(KinetextError::validation(format!(
                "rgb8 buffer of {} bytes does not match {width}x{height}",
                rgb.len()
            )));
        }
        let mut data = Vec::with_capacity(expected / 3 * 4);
        for px in rgb.chunks_exact(3) {
            data.extend_from_slice(&[px[0], px[1], px[2], 255]);
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Solid-color RGB plane with constant alpha taken from `mask`.
    pub fn from_color_and_alpha(color: Rgb8, alpha: &Mask) -> Self {
        let mut data = Vec::with_capacity(alpha.data().len() * 4);
        for &a in alpha.data() {
            data.extend_from_slice(&[color.r, color.g, color.b, a]);
        }
        Self {
            width: alpha.width(),
            height: alpha.height(),
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

    /// Raw RGBA8 bytes.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    pub fn into_raw(self) -> Vec<u8> {
        self.data
    }

    /// Pixel at `(x, y)`, or `None` outside the buffer.
    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba8> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = self.index(x, y);
        Some(Rgba8::new(
            self.data[i],
            self.data[i + 1],
            self.data[i + 2],
            self.data[i + 3],
        ))
    }

    /// Overwrite one pixel; writes outside the buffer are ignored.
    pub fn set_pixel(&mut self, x: u32, y: u32, color: Rgba8) {
        if x >= self.width || y >= self.height {
            return;
        }
        let i = self.index(x, y);
        self.data[i..i + 4].copy_from_slice(&color.to_array());
    }

    /// Extract the alpha channel.
    pub fn alpha(&self) -> Mask {
        let data = self.data.chunks_exact(4).map(|px| px[3]).collect();
        Mask::from_raw_unchecked(self.width, self.height, data)
    }

    /// Replace the alpha channel; `mask` must match the buffer size.
    pub fn put_alpha(&mut self, mask: &Mask) -> KinetextResult<()> {
        if mask.size() != self.size() {
            return Err(KinetextError::evaluation(
                "put_alpha expects a mask matching the buffer size",
            ));
        }
        for (px, &a) in self.data.chunks_exact_mut(4).zip(mask.data()) {
            px[3] = a;
        }
        Ok(())
    }

    /// Drop alpha, keeping row-major RGB8.
    pub fn to_rgb8(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.data.len() / 4 * 3);
        for px in self.data.chunks_exact(4) {
            out.extend_from_slice(&px[..3]);
        }
        out
    }

    /// Copy of the rectangle `[x0, x1) x [y0, y1)`, clamped to the buffer.
    pub fn crop(&self, x0: u32, y0: u32, x1: u32, y1: u32) -> Self {
        let x1 = x1.min(self.width);
        let y1 = y1.min(self.height);
        let x0 = x0.min(x1);
        let y0 = y0.min(y1);
        let w = (x1 - x0).max(1);
        let h = (y1 - y0).max(1);
        let mut out = Self::new(w, h);
        if x1 == x0 || y1 == y0 {
            return out;
        }
        let row_bytes = (x1 - x0) as usize * 4;
        for (dy, y) in (y0..y1).enumerate() {
            let src = self.index(x0, y);
            let dst = dy * w as usize * 4;
            out.data[dst..dst + row_bytes].copy_from_slice(&self.data[src..src + row_bytes]);
        }
        out
    }

    /// Lanczos3 resize through `image`.
    pub fn resize_lanczos(&self, width: u32, height: u32) -> Self {
        let width = width.max(1);
        let height = height.max(1);
        if (width, height) == self.size() {
            return self.clone();
        }
        let Some(img) = image::RgbaImage::from_raw(self.width, self.height, self.data.clone())
        else {
            return Self::new(width, height);
        };
        let resized =
            image::imageops::resize(&img, width, height, image::imageops::FilterType::Lanczos3);
        Self {
            width,
            height,
            data: resized.into_raw(),
        }
    }

    /// Decode any format `image` understands into a straight-alpha buffer.
    pub fn load(path: &std::path::Path) -> KinetextResult<Self> {
        let img = image::open(path)
            .map_err(|e| KinetextError::texture_load(format!("{}: {e}", path.display())))?;
        let rgba = img.to_rgba8();
        let (width, height) = rgba.dimensions();
        Self::from_rgba8(width, height, rgba.into_raw())
    }

    fn index(&self, x: u32, y: u32) -> usize {
        (y as usize * self.width as usize + x as usize) * 4
    }
}

fn rgba_len(width: u32, height: u32) -> KinetextResult<usize> {
    (width as usize)
        .checked_mul(height as usize)
        .and_then(|v| v.checked_mul(4))
        .ok_or_else(|| KinetextError::validation("rgba8 buffer size overflow"))
}

#[cfg(test)]
#[path = "../../tests/unit/raster/buffer.rs"]
mod tests;
