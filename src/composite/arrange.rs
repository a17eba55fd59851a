//! Grid and sequential arrangement of layers.

use crate::composite::compositor::{Background, Compositor};
use crate::foundation::core::Canvas;
use crate::foundation::error::{KinetextError, KinetextResult};
use crate::layer::{Layer, Position};

/// Lay out rows of layers on a grid.
///
/// Row heights are the tallest cell per row and column widths the widest cell per column.
/// A cell smaller than its slot is centered in a nested composite of the slot size.
pub fn clips_array(rows: Vec<Vec<Layer>>, background: Background) -> Compositor {
    let cols = rows.iter().map(Vec::len).max().unwrap_or(0);
    let row_heights: Vec<u32> = rows
        .iter()
        .map(|row| row.iter().map(|l| l.size().1).max().unwrap_or(0))
        .collect();
    let col_widths: Vec<u32> = (0..cols)
        .map(|j| {
            rows.iter()
                .filter_map(|row| row.get(j))
                .map(|l| l.size().0)
                .max()
                .unwrap_or(0)
        })
        .collect();
    let xs = offsets(&col_widths);
    let ys = offsets(&row_heights);

    let mut layers = Vec::new();
    for (i, row) in rows.into_iter().enumerate() {
        for (j, layer) in row.into_iter().enumerate() {
            let slot = (col_widths[j], row_heights[i]);
            let cell = if layer.size() == slot {
                layer
            } else {
                let inner = Compositor::new(
                    Canvas::new(slot.0, slot.1),
                    vec![layer.with_position(Position::center())],
                    background,
                );
                Layer::nested(inner)
            };
            layers.push(cell.with_position(Position::at(xs[j], ys[i])));
        }
    }

    let width: u32 = col_widths.iter().sum();
    let height: u32 = row_heights.iter().sum();
    Compositor::new(Canvas::new(width, height), layers, background)
}

/// Play layers one after another, each centered on a canvas as large as the largest layer.
///
/// Each layer starts where the previous one ended plus `padding` (negative padding overlaps),
/// never before 0. Every layer needs a bounded duration.
pub fn concatenate(
    layers: Vec<Layer>,
    padding: f64,
    background: Background,
) -> KinetextResult<Compositor> {
    let width = layers.iter().map(|l| l.size().0).max().unwrap_or(1);
    let height = layers.iter().map(|l| l.size().1).max().unwrap_or(1);

    let mut t = 0.0f64;
    let mut placed = Vec::with_capacity(layers.len());
    for (i, layer) in layers.into_iter().enumerate() {
        let duration = layer.span().duration().ok_or_else(|| {
            KinetextError::validation(format!("layer {i} has no end; cannot concatenate"))
        })?;
        placed.push(layer.with_start(t).with_position(Position::center()));
        t = (t + duration + padding).max(0.0);
    }
    Ok(Compositor::new(
        Canvas::new(width, height),
        placed,
        background,
    ))
}

fn offsets(lengths: &[u32]) -> Vec<i32> {
    let mut acc = 0i64;
    lengths
        .iter()
        .map(|&len| {
            let at = acc;
            acc += i64::from(len);
            at.min(i64::from(i32::MAX)) as i32
        })
        .collect()
}

#[cfg(test)]
#[path = "../../tests/unit/composite/arrange.rs"]
mod tests;
