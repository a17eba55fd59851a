use crate::foundation::core::{Rgb8, Rgba8};
use crate::foundation::math::{lerp_u8, mul_div255_u8};
use crate::raster::buffer::RasterBuffer;
use crate::raster::mask::Mask;

/// Straight-alpha "source over destination" for one pixel.
pub fn over(dst: Rgba8, src: Rgba8) -> Rgba8 {
    if src.a == 0 {
        return dst;
    }
    if src.a == 255 {
        return src;
    }
    let sa = u32::from(src.a);
    let da = u32::from(dst.a);
    let src_w = sa * 255;
    let dst_w = da * (255 - sa);
    let out_a255 = src_w + dst_w;
    if out_a255 == 0 {
        return Rgba8::TRANSPARENT;
    }
    let half = out_a255 / 2;
    let ch = |s: u8, d: u8| -> u8 {
        ((u32::from(s) * src_w + u32::from(d) * dst_w + half) / out_a255).min(255) as u8
    };
    Rgba8::new(
        ch(src.r, dst.r),
        ch(src.g, dst.g),
        ch(src.b, dst.b),
        ((out_a255 + 127) / 255).min(255) as u8,
    )
}

/// Composite `src` over `dst` in place; both buffers must share dimensions.
///
/// Returns `false` (and leaves `dst` untouched) on a size mismatch.
pub fn alpha_composite(dst: &mut RasterBuffer, src: &RasterBuffer) -> bool {
    if dst.size() != src.size() {
        return false;
    }
    for (d, s) in dst.data_mut().chunks_exact_mut(4).zip(src.data().chunks_exact(4)) {
        let out = over(
            Rgba8::new(d[0], d[1], d[2], d[3]),
            Rgba8::new(s[0], s[1], s[2], s[3]),
        );
        d.copy_from_slice(&out.to_array());
    }
    true
}

/// Fill `dst` with `color` over the area described by `alpha`, composited on top.
pub fn composite_color(dst: &mut RasterBuffer, color: Rgb8, alpha: &Mask) {
    if dst.size() != alpha.size() {
        return;
    }
    for (d, &a) in dst.data_mut().chunks_exact_mut(4).zip(alpha.data()) {
        if a == 0 {
            continue;
        }
        let out = over(Rgba8::new(d[0], d[1], d[2], d[3]), color.with_alpha(a));
        d.copy_from_slice(&out.to_array());
    }
}

/// Overlap of a `src_w x src_h` source placed at `(x, y)` on a `dst_w x dst_h` target.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BlitRect {
    /// First source column.
    pub src_x: u32,
    /// First source row.
    pub src_y: u32,
    /// First destination column.
    pub dst_x: u32,
    /// First destination row.
    pub dst_y: u32,
    /// Copied width.
    pub width: u32,
    /// Copied height.
    pub height: u32,
}

impl BlitRect {
    /// `None` when the source lies entirely outside the target.
    pub fn clip(dst_w: u32, dst_h: u32, src_w: u32, src_h: u32, x: i64, y: i64) -> Option<Self> {
        let (dw, dh, sw, sh) = (
            i64::from(dst_w),
            i64::from(dst_h),
            i64::from(src_w),
            i64::from(src_h),
        );
        if x <= -sw || x >= dw || y <= -sh || y >= dh {
            return None;
        }
        let src_x1 = (-x).max(0);
        let src_y1 = (-y).max(0);
        let src_x2 = sw.min(dw - x);
        let src_y2 = sh.min(dh - y);
        if src_x2 <= src_x1 || src_y2 <= src_y1 {
            return None;
        }
        Some(Self {
            src_x: src_x1 as u32,
            src_y: src_y1 as u32,
            dst_x: x.max(0) as u32,
            dst_y: y.max(0) as u32,
            width: (src_x2 - src_x1) as u32,
            height: (src_y2 - src_y1) as u32,
        })
    }

    /// True when the whole source is visible.
    pub fn is_uncropped(&self, src_w: u32, src_h: u32) -> bool {
        self.src_x == 0 && self.src_y == 0 && self.width == src_w && self.height == src_h
    }
}

/// Replace the RGB of `dst` under `rect` with the RGB of `src`. Destination alpha is kept.
pub fn blit_opaque(dst: &mut RasterBuffer, src: &RasterBuffer, rect: BlitRect) {
    let dw = dst.width() as usize;
    let sw = src.width() as usize;
    let src_data = src.data();
    let dst_data = dst.data_mut();
    for row in 0..rect.height as usize {
        let s0 = ((rect.src_y as usize + row) * sw + rect.src_x as usize) * 4;
        let d0 = ((rect.dst_y as usize + row) * dw + rect.dst_x as usize) * 4;
        for col in 0..rect.width as usize {
            let s = s0 + col * 4;
            let d = d0 + col * 4;
            dst_data[d..d + 3].copy_from_slice(&src_data[s..s + 3]);
        }
    }
}

/// `dst = dst * (1 - a) + src * a` on RGB under `rect`, with `a` read from `mask`.
///
/// `mask` is addressed in source coordinates and must match the source size.
pub fn blit_masked(dst: &mut RasterBuffer, src: &RasterBuffer, mask: &Mask, rect: BlitRect) {
    if mask.size() != src.size() {
        return;
    }
    let dw = dst.width() as usize;
    let sw = src.width() as usize;
    let src_data = src.data();
    let mask_data = mask.data();
    let dst_data = dst.data_mut();
    for row in 0..rect.height as usize {
        let s_row = (rect.src_y as usize + row) * sw + rect.src_x as usize;
        let d_row = (rect.dst_y as usize + row) * dw + rect.dst_x as usize;
        for col in 0..rect.width as usize {
            let a = mask_data[s_row + col];
            if a == 0 {
                continue;
            }
            let s = (s_row + col) * 4;
            let d = (d_row + col) * 4;
            for c in 0..3 {
                dst_data[d + c] = lerp_u8(dst_data[d + c], src_data[s + c], a);
            }
        }
    }
}

/// Mask-channel union: `out = bg + m * (1 - bg)` under `rect`.
pub fn blit_mask_union(dst: &mut Mask, src: &Mask, rect: BlitRect) {
    let dw = dst.width() as usize;
    let sw = src.width() as usize;
    let src_data = src.data();
    let dst_data = dst.data_mut();
    for row in 0..rect.height as usize {
        let s_row = (rect.src_y as usize + row) * sw + rect.src_x as usize;
        let d_row = (rect.dst_y as usize + row) * dw + rect.dst_x as usize;
        for col in 0..rect.width as usize {
            let bg = dst_data[d_row + col];
            let m = src_data[s_row + col];
            dst_data[d_row + col] =
                bg.saturating_add(mul_div255_u8(u16::from(m), 255 - u16::from(bg)));
        }
    }
}

/// Paste with a blend mask over all four channels: `dst = dst * (1 - m) + src * m`.
///
/// `mask` defaults to the alpha of `src`; out-of-bounds parts are dropped.
pub fn paste(dst: &mut RasterBuffer, src: &RasterBuffer, mask: Option<&Mask>, x: i64, y: i64) {
    let Some(rect) = BlitRect::clip(dst.width(), dst.height(), src.width(), src.height(), x, y)
    else {
        return;
    };
    if let Some(m) = mask
        && m.size() != src.size()
    {
        return;
    }
    let dw = dst.width() as usize;
    let sw = src.width() as usize;
    let src_data = src.data();
    let dst_data = dst.data_mut();
    for row in 0..rect.height as usize {
        let s_row = (rect.src_y as usize + row) * sw + rect.src_x as usize;
        let d_row = (rect.dst_y as usize + row) * dw + rect.dst_x as usize;
        for col in 0..rect.width as usize {
            let s = (s_row + col) * 4;
            let d = (d_row + col) * 4;
            let m = match mask {
                Some(m) => m.data()[s_row + col],
                None => src_data[s + 3],
            };
            match m {
                0 => {}
                255 => dst_data[d..d + 4].copy_from_slice(&src_data[s..s + 4]),
                _ => {
                    for c in 0..4 {
                        dst_data[d + c] = lerp_u8(dst_data[d + c], src_data[s + c], m);
                    }
                }
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/raster/composite.rs"]
mod tests;
