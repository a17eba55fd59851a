use std::collections::HashMap;
use std::sync::Arc;

use xxhash_rust::xxh3::Xxh3;

use crate::text::word_frame::LineFrames;

const XXH3_SEED: u64 = 0x3c6e_f372_fe94_f82b;

/// Identity of a rendered line: words, frame width and renderer fingerprint.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct LineKey {
    pub hi: u64,
    pub lo: u64,
}

impl LineKey {
    pub fn new<S: AsRef<str>>(words: &[S], frame_width: u32, renderer: u64) -> Self {
        let mut h = Xxh3::with_seed(XXH3_SEED);
        h.update(&renderer.to_le_bytes());
        h.update(&frame_width.to_le_bytes());
        h.update(&(words.len() as u64).to_le_bytes());
        for w in words {
            let w = w.as_ref().as_bytes();
            h.update(&(w.len() as u64).to_le_bytes());
            h.update(w);
        }
        let v = h.digest128();
        Self {
            hi: (v >> 64) as u64,
            lo: v as u64,
        }
    }
}

/// Write-once memo table of pre-rendered lines.
///
/// Entries are inserted on first render and never replaced or invalidated, so handed-out
/// `Arc<LineFrames>` stay valid and can be shared across frame-parallel renders.
#[derive(Debug, Default)]
pub struct VariantCache {
    entries: HashMap<LineKey, Arc<LineFrames>>,
    hits: u64,
    misses: u64,
}

impl VariantCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, key: &LineKey) -> Option<Arc<LineFrames>> {
        self.entries.get(key).cloned()
    }

    /// Return the cached line for `key`, rendering it with `render` only on a miss.
    pub fn get_or_render(
        &mut self,
        key: LineKey,
        render: impl FnOnce() -> LineFrames,
    ) -> Arc<LineFrames> {
        if let Some(hit) = self.entries.get(&key) {
            self.hits += 1;
            tracing::debug!(?key, "line variant cache hit");
            return Arc::clone(hit);
        }
        self.misses += 1;
        tracing::debug!(?key, "line variant cache miss");
        let frames = Arc::new(render());
        self.entries.insert(key, Arc::clone(&frames));
        frames
    }

    /// `(hits, misses)` since construction.
    pub fn stats(&self) -> (u64, u64) {
        (self.hits, self.misses)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/text/cache.rs"]
mod tests;
