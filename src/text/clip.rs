use std::sync::Arc;

use crate::text::word_frame::{LineFrames, WordVariant};

/// Time-sliced view over one line's pre-rendered variants.
///
/// Local time `t` selects variant `min(floor(t / word_duration), N - 1)`; negative or NaN
/// times select the first variant.
#[derive(Clone, Debug)]
pub struct LineClip {
    frames: Arc<LineFrames>,
    word_duration: f64,
}

impl LineClip {
    /// `None` when `frames` holds no variants.
    pub fn new(frames: Arc<LineFrames>, word_duration: f64) -> Option<Self> {
        if frames.is_empty() {
            return None;
        }
        Some(Self {
            frames,
            word_duration,
        })
    }

    pub fn frames(&self) -> &Arc<LineFrames> {
        &self.frames
    }

    pub fn word_duration(&self) -> f64 {
        self.word_duration
    }

    pub fn count(&self) -> usize {
        self.frames.len()
    }

    pub fn duration(&self) -> f64 {
        self.word_duration * self.count() as f64
    }

    pub fn size(&self) -> (u32, u32) {
        self.frames.size()
    }

    pub fn index_at(&self, t: f64) -> usize {
        let last = self.count() - 1;
        let steps = (t / self.word_duration).floor();
        if steps.is_nan() || steps <= 0.0 {
            0
        } else if steps >= last as f64 {
            last
        } else {
            steps as usize
        }
    }

    pub fn frame_at(&self, t: f64) -> &WordVariant {
        &self.frames.variants()[self.index_at(t)]
    }
}

#[cfg(test)]
#[path = "../../tests/unit/text/clip.rs"]
mod tests;
