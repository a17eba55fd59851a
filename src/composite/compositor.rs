use std::borrow::Cow;
use std::sync::OnceLock;

use crate::composite::mask_track::MaskCompositor;
use crate::composite::{Placement, derived_duration, sort_by_z, static_eligible};
use crate::foundation::core::{Canvas, Rgb8};
use crate::layer::Layer;
use crate::raster::buffer::RasterBuffer;
use crate::raster::composite::{blit_masked, blit_opaque};
use crate::raster::mask::Mask;

/// Fill under all layers.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Background {
    /// Opaque color; the output alpha is 255 everywhere.
    Solid(Rgb8),
    /// Output alpha comes from the mask track.
    #[default]
    Transparent,
}

#[derive(Debug)]
struct PreparedLayer {
    layer: Layer,
    placement: Placement,
}

/// Flattens time-bounded layers into one raster per timestamp.
///
/// Layers paint in ascending z; equal z keeps declaration order, later on top. Unmasked layers
/// replace the RGB they cover; masked layers blend as `dst * (1 - a) + src * a`.
#[derive(Debug)]
pub struct Compositor {
    canvas: Canvas,
    background: Background,
    layers: Vec<PreparedLayer>,
    mask_track: Option<MaskCompositor>,
    duration: Option<f64>,
    cache_static: bool,
    static_frame: OnceLock<RasterBuffer>,
}

impl Compositor {
    pub fn new(canvas: Canvas, layers: Vec<Layer>, background: Background) -> Self {
        let duration = derived_duration(&layers);
        Self::build(canvas, layers, background, duration)
    }

    /// Override the derived duration (the latest layer end).
    pub fn with_duration(self, duration: Option<f64>) -> Self {
        let layers = self.layers.into_iter().map(|p| p.layer).collect();
        Self::build(self.canvas, layers, self.background, duration)
    }

    fn build(
        canvas: Canvas,
        mut layers: Vec<Layer>,
        background: Background,
        duration: Option<f64>,
    ) -> Self {
        sort_by_z(&mut layers);
        let cache_static = static_eligible(&layers, duration);
        tracing::debug!(
            layers = layers.len(),
            cache_static,
            "compositor prepared"
        );
        let mask_track = match background {
            Background::Transparent => {
                Some(MaskCompositor::new(canvas, &layers).with_static_cache(cache_static))
            }
            Background::Solid(_) => None,
        };
        let layers = layers
            .into_iter()
            .map(|layer| PreparedLayer {
                placement: Placement::prepare(canvas, layer.position(), layer.size()),
                layer,
            })
            .collect();
        Self {
            canvas,
            background,
            layers,
            mask_track,
            duration,
            cache_static,
            static_frame: OnceLock::new(),
        }
    }

    pub fn canvas(&self) -> Canvas {
        self.canvas
    }

    pub fn size(&self) -> (u32, u32) {
        (self.canvas.width, self.canvas.height)
    }

    pub fn background(&self) -> Background {
        self.background
    }

    pub fn duration(&self) -> Option<f64> {
        self.duration
    }

    /// Layers in paint order.
    pub fn layers(&self) -> impl Iterator<Item = &Layer> {
        self.layers.iter().map(|p| &p.layer)
    }

    pub fn has_mask_track(&self) -> bool {
        self.mask_track.is_some()
    }

    pub fn mask_track(&self) -> Option<&MaskCompositor> {
        self.mask_track.as_ref()
    }

    /// Whether the flattened frame is computed once and reused for every timestamp.
    pub fn is_static_cached(&self) -> bool {
        self.cache_static
    }

    pub fn render(&self, t: f64) -> RasterBuffer {
        self.frame(t).into_owned()
    }

    /// Like [`Compositor::render`], borrowing the memoized frame when the composite is static.
    pub fn frame(&self, t: f64) -> Cow<'_, RasterBuffer> {
        if self.is_cached_at(t) {
            return Cow::Borrowed(self.static_frame.get_or_init(|| {
                tracing::debug!("static composite cached");
                self.render_uncached(0.0)
            }));
        }
        Cow::Owned(self.render_uncached(t))
    }

    /// Combined alpha of the composite; fully opaque without a mask track.
    pub fn render_mask(&self, t: f64) -> Mask {
        match &self.mask_track {
            Some(track) if self.is_cached_at(t) => track.render(0.0),
            Some(track) => track.render_uncached(t),
            None => Mask::filled(self.canvas.width, self.canvas.height, 255),
        }
    }

    /// Whether `t` is served from the static-composite cache.
    ///
    /// Inside `[0, duration)` every layer of a static composite is active, so the frame
    /// flattened at `t = 0` holds for the whole window.
    pub fn is_cached_at(&self, t: f64) -> bool {
        self.cache_static && t >= 0.0 && self.duration.is_none_or(|d| t < d)
    }

    /// Flatten every active layer at `t`, bypassing the static cache.
    pub fn render_uncached(&self, t: f64) -> RasterBuffer {
        let Canvas { width, height } = self.canvas;
        let mut out = match self.background {
            Background::Solid(c) => RasterBuffer::filled(width, height, c.with_alpha(255)),
            Background::Transparent => RasterBuffer::new(width, height),
        };

        for prepared in &self.layers {
            let layer = &prepared.layer;
            if !layer.is_active(t) {
                continue;
            }
            let local = t - layer.span().start;
            let size = layer.size();
            let Some(rect) = prepared
                .placement
                .rect(self.canvas, layer.position(), size, local)
            else {
                continue;
            };
            let frame = layer.source().frame_at(local);
            if frame.size() != size {
                tracing::warn!(
                    expected = ?size,
                    got = ?frame.size(),
                    "layer frame size differs from its declared size; skipping"
                );
                continue;
            }
            match layer.mask() {
                None => blit_opaque(&mut out, &frame, rect),
                Some(source) => {
                    let mask = source.mask_at(local);
                    if mask.size() == size {
                        blit_masked(&mut out, &frame, &mask, rect);
                    } else {
                        tracing::warn!(
                            expected = ?size,
                            got = ?mask.size(),
                            "layer mask size differs from its frame; blitting opaque"
                        );
                        blit_opaque(&mut out, &frame, rect);
                    }
                }
            }
        }

        if let Some(track) = &self.mask_track {
            let alpha = track.render_uncached(t);
            if let Err(err) = out.put_alpha(&alpha) {
                tracing::warn!(%err, "mask track does not match canvas");
            }
        }
        out
    }
}

#[cfg(test)]
#[path = "../../tests/unit/composite/compositor.rs"]
mod tests;
