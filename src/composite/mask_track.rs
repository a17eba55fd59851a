use std::sync::{Arc, OnceLock};

use crate::composite::Placement;
use crate::foundation::core::{Canvas, TimeSpan};
use crate::layer::{Layer, MaskSource, Position};
use crate::raster::composite::blit_mask_union;
use crate::raster::mask::Mask;

#[derive(Debug)]
struct MaskEntry {
    mask: MaskSource,
    span: TimeSpan,
    position: Position,
    size: (u32, u32),
    placement: Placement,
}

/// Compositor over the mask channel alone.
///
/// Every layer contributes its own mask, or a fully opaque one when it has none, placed exactly
/// like its color layer. Masks combine as a union: `out = bg + m * (1 - bg)`.
#[derive(Debug)]
pub struct MaskCompositor {
    canvas: Canvas,
    entries: Vec<MaskEntry>,
    cache_static: bool,
    static_mask: OnceLock<Mask>,
}

impl MaskCompositor {
    /// `layers` must already be in paint order.
    pub fn new(canvas: Canvas, layers: &[Layer]) -> Self {
        let entries = layers
            .iter()
            .map(|layer| {
                let size = layer.size();
                let mask = match layer.mask() {
                    Some(m) => m.clone(),
                    None => MaskSource::Static(Arc::new(Mask::filled(size.0, size.1, 255))),
                };
                MaskEntry {
                    mask,
                    span: layer.span(),
                    position: layer.position().clone(),
                    size,
                    placement: Placement::prepare(canvas, layer.position(), size),
                }
            })
            .collect();
        Self {
            canvas,
            entries,
            cache_static: false,
            static_mask: OnceLock::new(),
        }
    }

    /// Memoize the flattened mask; only valid when every contributor is time-invariant.
    pub(crate) fn with_static_cache(mut self, enabled: bool) -> Self {
        self.cache_static = enabled;
        self
    }

    pub fn canvas(&self) -> Canvas {
        self.canvas
    }

    /// With the static cache on, the mask is flattened once at `t = 0` and `t` is ignored.
    pub fn render(&self, t: f64) -> Mask {
        if self.cache_static {
            return self
                .static_mask
                .get_or_init(|| self.render_uncached(0.0))
                .clone();
        }
        self.render_uncached(t)
    }

    pub fn render_uncached(&self, t: f64) -> Mask {
        let mut out = Mask::new(self.canvas.width, self.canvas.height);
        for entry in &self.entries {
            if !entry.span.contains(t) {
                continue;
            }
            let local = t - entry.span.start;
            let rect = entry
                .placement
                .rect(self.canvas, &entry.position, entry.size, local);
            let Some(rect) = rect else {
                continue;
            };
            let mask = entry.mask.mask_at(local);
            if mask.size() != entry.size {
                tracing::warn!(
                    expected = ?entry.size,
                    got = ?mask.size(),
                    "mask size differs from layer size; skipping"
                );
                continue;
            }
            blit_mask_union(&mut out, &mask, rect);
        }
        out
    }
}

#[cfg(test)]
#[path = "../../tests/unit/composite/mask_track.rs"]
mod tests;
