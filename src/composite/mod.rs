pub mod arrange;
pub mod compositor;
pub mod mask_track;

pub use arrange::{clips_array, concatenate};
pub use compositor::{Background, Compositor};
pub use mask_track::MaskCompositor;

use crate::foundation::core::Canvas;
use crate::layer::{Layer, Position};
use crate::raster::composite::BlitRect;

/// Blit placement of one layer, resolved once when its position never moves.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Placement {
    /// `None` when the layer lies entirely outside the canvas.
    Fixed(Option<BlitRect>),
    Dynamic,
}

impl Placement {
    pub(crate) fn prepare(canvas: Canvas, position: &Position, size: (u32, u32)) -> Self {
        if !position.is_fixed() {
            return Self::Dynamic;
        }
        Self::Fixed(place(canvas, position, size, 0.0))
    }

    pub(crate) fn rect(
        self,
        canvas: Canvas,
        position: &Position,
        size: (u32, u32),
        local_t: f64,
    ) -> Option<BlitRect> {
        match self {
            Self::Fixed(rect) => rect,
            Self::Dynamic => place(canvas, position, size, local_t),
        }
    }
}

fn place(canvas: Canvas, position: &Position, size: (u32, u32), local_t: f64) -> Option<BlitRect> {
    let (x, y) = position.resolve((canvas.width, canvas.height), size, local_t);
    BlitRect::clip(canvas.width, canvas.height, size.0, size.1, x, y)
}

/// Stable sort by z; equal keys keep declaration order so later layers paint on top.
pub(crate) fn sort_by_z(layers: &mut [Layer]) {
    layers.sort_by_key(Layer::z);
}

/// End of the latest layer, or `None` when any layer is unbounded (or there are none).
pub(crate) fn derived_duration(layers: &[Layer]) -> Option<f64> {
    let mut end: Option<f64> = None;
    for layer in layers {
        let e = layer.span().end?;
        end = Some(end.map_or(e, |cur| cur.max(e)));
    }
    end
}

/// Every layer is time-invariant and active over the whole `[0, duration)` window.
pub(crate) fn static_eligible(layers: &[Layer], duration: Option<f64>) -> bool {
    layers.iter().all(|l| {
        let span = l.span();
        l.is_time_invariant()
            && span.start == 0.0
            && span
                .end
                .is_none_or(|e| duration.is_some_and(|d| e >= d))
    })
}
