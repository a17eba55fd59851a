pub(crate) fn mul_div255_u16(x: u16, y: u16) -> u16 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u16
}

pub(crate) fn mul_div255_u8(x: u16, y: u16) -> u8 {
    mul_div255_u16(x, y) as u8
}

/// `a * (255 - t) + b * t`, all in 0..=255 fixed point.
pub(crate) fn lerp_u8(a: u8, b: u8, t: u8) -> u8 {
    let t = u16::from(t);
    let inv = 255 - t;
    (mul_div255_u16(u16::from(a), inv) + mul_div255_u16(u16::from(b), t)).min(255) as u8
}

pub(crate) fn clamp01(v: f32) -> f32 {
    if v.is_nan() { 0.0 } else { v.clamp(0.0, 1.0) }
}

/// Map a unit float onto 0..=255 with rounding.
pub(crate) fn unit_to_u8(v: f32) -> u8 {
    (clamp01(v) * 255.0).round() as u8
}

/// Truncating float to byte conversion; NaN maps to 0.
pub(crate) fn trunc_to_u8(v: f32) -> u8 {
    if v.is_nan() { 0 } else { v.clamp(0.0, 255.0) as u8 }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/math.rs"]
mod tests;
