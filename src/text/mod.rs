//! Text shaping, line packing and karaoke frame rendering.

pub mod cache;
pub mod clip;
pub mod font;
pub mod glyphs;
pub mod layout;
pub mod overlay;
pub mod style;
pub mod word_frame;

pub use cache::{LineKey, VariantCache};
pub use clip::LineClip;
pub use font::{FontIndex, FontRequest, LoadedFont, resolve_font};
pub use glyphs::{BlockGlyphSource, GlyphSource, ParleyGlyphSource, TextExtent};
pub use layout::{KaraokeTiming, group_words_into_lines, wrap_text_by_chars, wrap_text_by_width};
pub use overlay::{
    OverlayPlacement, OverlayStyle, StaticTextStyle, render_static_text, render_text_overlay,
    static_text_layer, text_overlay_layer,
};
pub use style::{GlowStyle, HighlightBoxStyle, ShadowStyle, TextStyle};
pub use word_frame::{LineFrames, WordFrameRenderer, WordVariant};
