use kurbo::Rect;

use crate::foundation::math::unit_to_u8;
use crate::raster::mask::Mask;

/// Anti-aliased coverage of a rounded rectangle on a `width x height` mask.
///
/// `rect` is in pixel-edge coordinates; the corner radius is clamped to half the shorter side.
pub fn rounded_rect_coverage(width: u32, height: u32, rect: Rect, radius: f64) -> Mask {
    let mut mask = Mask::new(width, height);
    let rect = rect.abs();
    if rect.width() <= 0.0 || rect.height() <= 0.0 {
        return mask;
    }
    let radius = radius.max(0.0).min(rect.width() / 2.0).min(rect.height() / 2.0);
    let center = rect.center();
    let half_w = rect.width() / 2.0 - radius;
    let half_h = rect.height() / 2.0 - radius;

    let x_start = (rect.x0.floor().max(0.0)) as u32;
    let y_start = (rect.y0.floor().max(0.0)) as u32;
    let x_end = (rect.x1.ceil().max(0.0) as u32).min(mask.width());
    let y_end = (rect.y1.ceil().max(0.0) as u32).min(mask.height());
    let stride = mask.width() as usize;
    let data = mask.data_mut();

    for y in y_start..y_end {
        let qy = ((f64::from(y) + 0.5) - center.y).abs() - half_h;
        for x in x_start..x_end {
            let qx = ((f64::from(x) + 0.5) - center.x).abs() - half_w;
            let outside = qx.max(0.0).hypot(qy.max(0.0));
            let inside = qx.max(qy).min(0.0);
            let dist = outside + inside - radius;
            let coverage = (0.5 - dist).clamp(0.0, 1.0) as f32;
            data[y as usize * stride + x as usize] = unit_to_u8(coverage);
        }
    }
    mask
}

#[cfg(test)]
#[path = "../../tests/unit/raster/shapes.rs"]
mod tests;
