/// How samples beyond the raster border are read.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum EdgeMode {
    /// Repeat the nearest edge pixel.
    #[default]
    Clamp,
    /// Wrap around to the opposite edge (tileable output).
    Wrap,
}

impl EdgeMode {
    fn resolve(self, i: i32, len: i32) -> usize {
        match self {
            Self::Clamp => i.clamp(0, len - 1) as usize,
            Self::Wrap => i.rem_euclid(len) as usize,
        }
    }
}

/// Kernel half-width covering three standard deviations.
pub fn radius_for_sigma(sigma: f32) -> u32 {
    if !sigma.is_finite() || sigma <= 0.0 {
        return 0;
    }
    (sigma * 3.0).ceil() as u32
}

/// Separable Gaussian blur of interleaved 8-bit samples with `channels` per pixel.
///
/// Uses a q16 fixed-point kernel so results are bit-identical across platforms. A non-positive
/// `sigma` returns a copy of `src`.
pub fn blur_u8(
    src: &[u8],
    width: u32,
    height: u32,
    channels: usize,
    sigma: f32,
    edge: EdgeMode,
) -> Vec<u8> {
    let radius = radius_for_sigma(sigma);
    if radius == 0 || channels == 0 || src.len() != width as usize * height as usize * channels {
        return src.to_vec();
    }

    let kernel = gaussian_kernel_q16(radius, sigma);
    let mut tmp = vec![0u8; src.len()];
    let mut out = vec![0u8; src.len()];
    horizontal_pass(src, &mut tmp, width, height, channels, &kernel, edge);
    vertical_pass(&tmp, &mut out, width, height, channels, &kernel, edge);
    out
}

/// Straight-alpha RGBA blur; each channel is filtered independently.
pub fn blur_rgba8(src: &[u8], width: u32, height: u32, sigma: f32, edge: EdgeMode) -> Vec<u8> {
    blur_u8(src, width, height, 4, sigma, edge)
}

/// Separable Gaussian blur of a single-channel float plane.
pub fn blur_plane(src: &[f32], width: u32, height: u32, sigma: f32, edge: EdgeMode) -> Vec<f32> {
    let radius = radius_for_sigma(sigma);
    if radius == 0 || src.len() != width as usize * height as usize {
        return src.to_vec();
    }
    let kernel = gaussian_kernel_f32(radius, sigma);
    let r = radius as i32;
    let w = width as i32;
    let h = height as i32;

    let mut tmp = vec![0f32; src.len()];
    for y in 0..h {
        let row = (y * w) as usize;
        for x in 0..w {
            let mut acc = 0f32;
            for (ki, &kw) in kernel.iter().enumerate() {
                let sx = edge.resolve(x + ki as i32 - r, w);
                acc += kw * src[row + sx];
            }
            tmp[row + x as usize] = acc;
        }
    }

    let mut out = vec![0f32; src.len()];
    for y in 0..h {
        for x in 0..w {
            let mut acc = 0f32;
            for (ki, &kw) in kernel.iter().enumerate() {
                let sy = edge.resolve(y + ki as i32 - r, h);
                acc += kw * tmp[sy * w as usize + x as usize];
            }
            out[(y * w + x) as usize] = acc;
        }
    }
    out
}

fn gaussian_weights(radius: u32, sigma: f32) -> Vec<f64> {
    let r = radius as i32;
    let sigma = f64::from(sigma);
    let denom = 2.0 * sigma * sigma;
    (-r..=r)
        .map(|i| {
            let x = f64::from(i);
            (-x * x / denom).exp()
        })
        .collect()
}

fn gaussian_kernel_f32(radius: u32, sigma: f32) -> Vec<f32> {
    let weights = gaussian_weights(radius, sigma);
    let sum: f64 = weights.iter().sum();
    weights.iter().map(|w| (w / sum) as f32).collect()
}

fn gaussian_kernel_q16(radius: u32, sigma: f32) -> Vec<u32> {
    let weights_f = gaussian_weights(radius, sigma);
    let sum: f64 = weights_f.iter().sum();

    let mut weights = Vec::<u32>::with_capacity(weights_f.len());
    let mut acc: i64 = 0;
    for &wf in &weights_f {
        let q = ((wf / sum) * 65536.0).round() as i64;
        let q = q.clamp(0, 65536);
        weights.push(q as u32);
        acc += q;
    }
    let delta = 65536 - acc;
    if delta != 0 {
        let mid = weights.len() / 2;
        let new_mid = (i64::from(weights[mid]) + delta).clamp(0, 65536);
        weights[mid] = new_mid as u32;
    }
    weights
}

fn horizontal_pass(
    src: &[u8],
    dst: &mut [u8],
    width: u32,
    height: u32,
    channels: usize,
    k: &[u32],
    edge: EdgeMode,
) {
    let radius = (k.len() / 2) as i32;
    let w = width as i32;
    let mut acc = vec![0u64; channels];
    for y in 0..height as i32 {
        let row = (y * w) as usize;
        for x in 0..w {
            acc.fill(0);
            for (ki, &kw) in k.iter().enumerate() {
                let sx = edge.resolve(x + ki as i32 - radius, w);
                let idx = (row + sx) * channels;
                for (c, a) in acc.iter_mut().enumerate() {
                    *a += u64::from(kw) * u64::from(src[idx + c]);
                }
            }
            let out_idx = (row + x as usize) * channels;
            for (c, &a) in acc.iter().enumerate() {
                dst[out_idx + c] = q16_to_u8(a);
            }
        }
    }
}

fn vertical_pass(
    src: &[u8],
    dst: &mut [u8],
    width: u32,
    height: u32,
    channels: usize,
    k: &[u32],
    edge: EdgeMode,
) {
    let radius = (k.len() / 2) as i32;
    let w = width as usize;
    let h = height as i32;
    let mut acc = vec![0u64; channels];
    for y in 0..h {
        for x in 0..w {
            acc.fill(0);
            for (ki, &kw) in k.iter().enumerate() {
                let sy = edge.resolve(y + ki as i32 - radius, h);
                let idx = (sy * w + x) * channels;
                for (c, a) in acc.iter_mut().enumerate() {
                    *a += u64::from(kw) * u64::from(src[idx + c]);
                }
            }
            let out_idx = (y as usize * w + x) * channels;
            for (c, &a) in acc.iter().enumerate() {
                dst[out_idx + c] = q16_to_u8(a);
            }
        }
    }
}

fn q16_to_u8(acc: u64) -> u8 {
    let v = (acc + 32768) >> 16;
    (v.min(255)) as u8
}

#[cfg(test)]
#[path = "../../tests/unit/raster/blur.rs"]
mod tests;
