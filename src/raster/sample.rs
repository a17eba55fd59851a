use kurbo::{Affine, Point};

const CUBIC_A: f64 = -0.5;

fn cubic_weight(t: f64) -> f64 {
    let t = t.abs();
    if t < 1.0 {
        ((CUBIC_A + 2.0) * t - (CUBIC_A + 3.0)) * t * t + 1.0
    } else if t < 2.0 {
        (((t - 5.0) * t + 8.0) * t - 4.0) * CUBIC_A
    } else {
        0.0
    }
}

fn cubic_weights(frac: f64) -> [f64; 4] {
    [
        cubic_weight(frac + 1.0),
        cubic_weight(frac),
        cubic_weight(1.0 - frac),
        cubic_weight(2.0 - frac),
    ]
}

/// Resample a float plane through `output_to_input` with a bicubic (a = -0.5) filter.
///
/// `output_to_input` maps an output pixel center to the input coordinate it reads from. Output
/// pixels whose source point falls outside the plane read as `0`; taps near the border are
/// clamped to the edge.
pub fn affine_bicubic(plane: &[f32], width: u32, height: u32, output_to_input: Affine) -> Vec<f32> {
    let w = width as i64;
    let h = height as i64;
    let mut out = vec![0f32; plane.len()];
    if plane.len() != (w * h) as usize {
        return out;
    }

    for y in 0..h {
        for x in 0..w {
            let p = output_to_input * Point::new(x as f64 + 0.5, y as f64 + 0.5);
            if p.x < 0.0 || p.y < 0.0 || p.x >= w as f64 || p.y >= h as f64 {
                continue;
            }
            let sx = p.x - 0.5;
            let sy = p.y - 0.5;
            let x0 = sx.floor();
            let y0 = sy.floor();
            let wx = cubic_weights(sx - x0);
            let wy = cubic_weights(sy - y0);
            let x0 = x0 as i64;
            let y0 = y0 as i64;

            let mut acc = 0f64;
            for (j, &ky) in wy.iter().enumerate() {
                let ty = (y0 - 1 + j as i64).clamp(0, h - 1);
                let row = (ty * w) as usize;
                let mut line = 0f64;
                for (i, &kx) in wx.iter().enumerate() {
                    let tx = (x0 - 1 + i as i64).clamp(0, w - 1);
                    line += kx * f64::from(plane[row + tx as usize]);
                }
                acc += ky * line;
            }
            out[(y * w + x) as usize] = acc as f32;
        }
    }
    out
}

/// Sub-pixel translate: output `(x, y)` samples input `(x + dx, y + dy)`.
pub fn shift_bicubic(plane: &[f32], width: u32, height: u32, dx: f64, dy: f64) -> Vec<f32> {
    affine_bicubic(plane, width, height, Affine::translate((dx, dy)))
}

#[cfg(test)]
#[path = "../../tests/unit/raster/sample.rs"]
mod tests;
