#![forbid(unsafe_code)]
//! Layered temporal compositing of styled, effect-laden kinetic text.
//!
//! Karaoke lines are pre-rendered once per highlighted word ([`WordFrameRenderer`]), wrapped
//! into time-bounded [`Layer`]s and flattened per timestamp by a [`Compositor`].

pub mod composite;
pub mod effects;
pub mod foundation;
pub mod layer;
pub mod raster;
pub mod render;
pub mod scene;
pub mod text;

pub use composite::{Background, Compositor, MaskCompositor, clips_array, concatenate};
pub use effects::{Effect, EffectSpec, EffectStack};
pub use foundation::core::{Canvas, Fps, Rgb8, Rgba8, TimeSpan};
pub use foundation::error::{KinetextError, KinetextResult};
pub use layer::{Coord, FrameSource, Layer, MaskSource, Position};
pub use raster::buffer::RasterBuffer;
pub use raster::mask::Mask;
pub use render::{
    FrameSink, InMemorySink, PngSequenceSink, RenderStats, RenderThreading, SinkConfig,
    render_range,
};
pub use scene::{Element, Scene};
pub use text::{
    BlockGlyphSource, GlyphSource, LineClip, LineFrames, ParleyGlyphSource, TextStyle,
    VariantCache, WordFrameRenderer, WordVariant,
};
