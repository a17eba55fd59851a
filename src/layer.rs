//! Time-bounded, positioned, optionally masked contributors to a composite.

use std::borrow::Cow;
use std::sync::Arc;

use crate::composite::compositor::Compositor;
use crate::foundation::core::{Rgb8, TimeSpan};
use crate::raster::buffer::RasterBuffer;
use crate::raster::mask::Mask;
use crate::text::clip::LineClip;

pub type FrameFn = dyn Fn(f64) -> RasterBuffer + Send + Sync;
pub type MaskFn = dyn Fn(f64) -> Mask + Send + Sync;
pub type PositionFn = dyn Fn(f64) -> (i32, i32) + Send + Sync;

/// Where a layer's pixels come from. All sources have a fixed size.
///
/// Functions receive layer-local time and must return rasters of the declared size.
#[derive(Clone)]
pub enum FrameSource {
    Static(Arc<RasterBuffer>),
    Clip(Arc<LineClip>),
    Nested(Arc<Compositor>),
    Function { size: (u32, u32), func: Arc<FrameFn> },
}

impl FrameSource {
    pub fn size(&self) -> (u32, u32) {
        match self {
            Self::Static(b) => b.size(),
            Self::Clip(c) => c.size(),
            Self::Nested(c) => c.size(),
            Self::Function { size, .. } => *size,
        }
    }

    /// Raster at layer-local time `t`.
    pub fn frame_at(&self, t: f64) -> Cow<'_, RasterBuffer> {
        match self {
            Self::Static(b) => Cow::Borrowed(b.as_ref()),
            Self::Clip(c) => Cow::Borrowed(c.frame_at(t).raster()),
            Self::Nested(c) => c.frame(t),
            Self::Function { func, .. } => Cow::Owned(func(t)),
        }
    }

    pub fn is_static(&self) -> bool {
        matches!(self, Self::Static(_))
    }
}

impl std::fmt::Debug for FrameSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Static(b) => f.debug_tuple("Static").field(&b.size()).finish(),
            Self::Clip(c) => f.debug_tuple("Clip").field(&c.count()).finish(),
            Self::Nested(c) => f.debug_tuple("Nested").field(&c.size()).finish(),
            Self::Function { size, .. } => f.debug_struct("Function").field("size", size).finish(),
        }
    }
}

/// Per-layer opacity field, sized like the layer's frames.
#[derive(Clone)]
pub enum MaskSource {
    Static(Arc<Mask>),
    /// Alpha of the active line variant.
    Clip(Arc<LineClip>),
    /// Mask track of a nested composite.
    Nested(Arc<Compositor>),
    Function { size: (u32, u32), func: Arc<MaskFn> },
}

impl MaskSource {
    pub fn size(&self) -> (u32, u32) {
        match self {
            Self::Static(m) => m.size(),
            Self::Clip(c) => c.size(),
            Self::Nested(c) => c.size(),
            Self::Function { size, .. } => *size,
        }
    }

    pub fn mask_at(&self, t: f64) -> Cow<'_, Mask> {
        match self {
            Self::Static(m) => Cow::Borrowed(m.as_ref()),
            Self::Clip(c) => Cow::Borrowed(c.frame_at(t).alpha()),
            Self::Nested(c) => Cow::Owned(c.render_mask(t)),
            Self::Function { func, .. } => Cow::Owned(func(t)),
        }
    }

    pub fn is_static(&self) -> bool {
        matches!(self, Self::Static(_))
    }
}

impl std::fmt::Debug for MaskSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Static(m) => f.debug_tuple("Static").field(&m.size()).finish(),
            Self::Clip(c) => f.debug_tuple("Clip").field(&c.count()).finish(),
            Self::Nested(c) => f.debug_tuple("Nested").field(&c.size()).finish(),
            Self::Function { size, .. } => f.debug_struct("Function").field("size", size).finish(),
        }
    }
}

/// One axis of a layer position.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Coord {
    Px(i32),
    /// `(canvas - layer) / 2`, truncated toward zero.
    Center,
    Start,
    End,
}

impl Coord {
    pub fn resolve(self, canvas_len: u32, layer_len: u32) -> i64 {
        let free = i64::from(canvas_len) - i64::from(layer_len);
        match self {
            Self::Px(v) => i64::from(v),
            Self::Center => free / 2,
            Self::Start => 0,
            Self::End => free,
        }
    }
}

#[derive(Clone)]
pub enum Position {
    Fixed { x: Coord, y: Coord },
    /// Top-left corner as a function of layer-local time.
    Animated(Arc<PositionFn>),
}

impl Position {
    pub fn fixed(x: Coord, y: Coord) -> Self {
        Self::Fixed { x, y }
    }

    pub fn at(x: i32, y: i32) -> Self {
        Self::Fixed {
            x: Coord::Px(x),
            y: Coord::Px(y),
        }
    }

    pub fn center() -> Self {
        Self::fixed(Coord::Center, Coord::Center)
    }

    pub fn is_fixed(&self) -> bool {
        matches!(self, Self::Fixed { .. })
    }

    pub fn resolve(&self, canvas: (u32, u32), layer: (u32, u32), t: f64) -> (i64, i64) {
        match self {
            Self::Fixed { x, y } => (x.resolve(canvas.0, layer.0), y.resolve(canvas.1, layer.1)),
            Self::Animated(f) => {
                let (x, y) = f(t);
                (i64::from(x), i64::from(y))
            }
        }
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::at(0, 0)
    }
}

impl std::fmt::Debug for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Fixed { x, y } => f.debug_struct("Fixed").field("x", x).field("y", y).finish(),
            Self::Animated(_) => f.write_str("Animated"),
        }
    }
}

#[derive(Clone, Debug)]
pub struct Layer {
    source: FrameSource,
    mask: Option<MaskSource>,
    span: TimeSpan,
    z: i32,
    position: Position,
}

impl Layer {
    pub fn new(source: FrameSource) -> Self {
        Self {
            source,
            mask: None,
            span: TimeSpan::ALWAYS,
            z: 0,
            position: Position::default(),
        }
    }

    /// Opaque static image.
    pub fn image(buffer: RasterBuffer) -> Self {
        Self::new(FrameSource::Static(Arc::new(buffer)))
    }

    /// Static image blended through its own alpha channel.
    pub fn image_with_alpha(buffer: RasterBuffer) -> Self {
        let mask = buffer.alpha();
        Self::image(buffer).with_mask(MaskSource::Static(Arc::new(mask)))
    }

    pub fn solid(size: (u32, u32), color: Rgb8) -> Self {
        Self::image(RasterBuffer::filled(size.0, size.1, color.with_alpha(255)))
    }

    /// Karaoke line: frames and mask both follow the active variant.
    pub fn from_clip(clip: Arc<LineClip>) -> Self {
        let duration = clip.duration();
        Self::new(FrameSource::Clip(Arc::clone(&clip)))
            .with_mask(MaskSource::Clip(clip))
            .with_duration(duration)
    }

    /// A composite used as a layer. Transparent composites carry their mask track along.
    pub fn nested(compositor: Compositor) -> Self {
        let compositor = Arc::new(compositor);
        let duration = compositor.duration();
        let mut layer = Self::new(FrameSource::Nested(Arc::clone(&compositor)));
        if compositor.has_mask_track() {
            layer.mask = Some(MaskSource::Nested(compositor));
        }
        layer.span.end = duration;
        layer
    }

    /// Move the layer to `start`, keeping its duration.
    pub fn with_start(mut self, start: f64) -> Self {
        let duration = self.span.duration();
        self.span.start = start;
        self.span.end = duration.map(|d| start + d);
        self
    }

    pub fn with_end(mut self, end: Option<f64>) -> Self {
        self.span.end = end;
        self
    }

    pub fn with_duration(mut self, duration: f64) -> Self {
        self.span.end = Some(self.span.start + duration.max(0.0));
        self
    }

    pub fn with_position(mut self, position: Position) -> Self {
        self.position = position;
        self
    }

    pub fn with_z(mut self, z: i32) -> Self {
        self.z = z;
        self
    }

    pub fn with_mask(mut self, mask: MaskSource) -> Self {
        self.mask = Some(mask);
        self
    }

    pub fn without_mask(mut self) -> Self {
        self.mask = None;
        self
    }

    pub fn source(&self) -> &FrameSource {
        &self.source
    }

    pub fn mask(&self) -> Option<&MaskSource> {
        self.mask.as_ref()
    }

    pub fn span(&self) -> TimeSpan {
        self.span
    }

    pub fn z(&self) -> i32 {
        self.z
    }

    pub fn position(&self) -> &Position {
        &self.position
    }

    pub fn size(&self) -> (u32, u32) {
        self.source.size()
    }

    pub fn is_active(&self, t: f64) -> bool {
        self.span.contains(t)
    }

    /// Content and mask never change over the layer's lifetime.
    pub fn is_time_invariant(&self) -> bool {
        self.source.is_static()
            && self.mask.as_ref().is_none_or(MaskSource::is_static)
            && self.position.is_fixed()
    }
}

#[cfg(test)]
#[path = "../tests/unit/layer.rs"]
mod tests;
