//! Line packing, wrapping and karaoke timing.

use crate::text::glyphs::GlyphSource;

/// Greedy line packer bounded by word count and pixel width.
///
/// The word-count cap is checked first. A word that alone exceeds `max_width_px` still
/// gets a line of its own, so a line may overflow the pixel budget by one word.
pub fn group_words_into_lines<S: AsRef<str>>(
    words: &[S],
    glyphs: &dyn GlyphSource,
    max_words: usize,
    max_width_px: u32,
) -> Vec<Vec<String>> {
    let mut lines = Vec::new();
    let mut current: Vec<String> = Vec::new();
    for word in words {
        let word = word.as_ref();
        if current.len() + 1 > max_words {
            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            current.push(word.to_string());
            continue;
        }
        let candidate = if current.is_empty() {
            word.to_string()
        } else {
            format!("{} {word}", current.join(" "))
        };
        if glyphs.measure(&candidate).width > max_width_px && !current.is_empty() {
            lines.push(std::mem::take(&mut current));
        }
        current.push(word.to_string());
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

/// Wrap at a soft character limit. A single word longer than the limit keeps its own line.
pub fn wrap_text_by_chars(text: &str, max_chars: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current: Vec<&str> = Vec::new();
    let mut current_len = 0usize;
    for word in text.split_whitespace() {
        let word_len = word.chars().count();
        let joined_len = if current.is_empty() {
            word_len
        } else {
            current_len + 1 + word_len
        };
        if joined_len > max_chars && !current.is_empty() {
            lines.push(current.join(" "));
            current.clear();
            current_len = word_len;
        } else {
            current_len = joined_len;
        }
        current.push(word);
    }
    if !current.is_empty() {
        lines.push(current.join(" "));
    }
    lines
}

/// Wrap so that no multi-word line exceeds `max_width_px`.
///
/// Text without words comes back unchanged as a single line.
pub fn wrap_text_by_width(text: &str, max_width_px: u32, glyphs: &dyn GlyphSource) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current: Vec<&str> = Vec::new();
    for word in text.split_whitespace() {
        let test = if current.is_empty() {
            word.to_string()
        } else {
            format!("{} {word}", current.join(" "))
        };
        if glyphs.measure(&test).width <= max_width_px {
            current.push(word);
        } else {
            if !current.is_empty() {
                lines.push(current.join(" "));
            }
            current = vec![word];
        }
    }
    if !current.is_empty() {
        lines.push(current.join(" "));
    }
    if lines.is_empty() {
        lines.push(text.to_string());
    }
    lines
}

/// Lead-in fraction of the total duration before the first word.
pub const LEAD_IN: f64 = 0.05;
/// Fraction of the total duration spread evenly across all words.
pub const SPEAKING: f64 = 0.9;

/// Per-word schedule for one karaoke block.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct KaraokeTiming {
    pub word_duration: f64,
    pub start_offset: f64,
}

impl KaraokeTiming {
    /// `None` when there are no words to schedule.
    pub fn new(duration: f64, total_words: usize) -> Option<Self> {
        if total_words == 0 {
            return None;
        }
        let duration = duration.max(0.0);
        Some(Self {
            word_duration: duration * SPEAKING / total_words as f64,
            start_offset: duration * LEAD_IN,
        })
    }

    /// Start time of a line whose first word has global index `first_word`.
    pub fn line_start(&self, first_word: usize) -> f64 {
        self.start_offset + first_word as f64 * self.word_duration
    }

    pub fn line_duration(&self, words_in_line: usize) -> f64 {
        words_in_line as f64 * self.word_duration
    }
}

#[cfg(test)]
#[path = "../../tests/unit/text/layout.rs"]
mod tests;
