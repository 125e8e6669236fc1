//! Text chunking for embeddings.
//!
//! Splits documents into overlapping chunks before embedding so each chunk
//! stays under the model's input limit.
//!
//! - **Character-based**: predictable, works with any language.
//! - **Word boundaries**: never splits mid-word when a boundary is nearby.
//! - **Overlapping windows**: context carries across chunk edges.
//! - **UTF-8 safe**: offsets always land on char boundaries.

use super::types::ProviderInfo;

/// Configuration for text chunking.
#[derive(Debug, Clone)]
pub struct ChunkConfig {
    /// Maximum bytes per chunk.
    /// Default: 2000 (~500 tokens for most models).
    pub max_chars: usize,

    /// Bytes shared between consecutive chunks.
    /// Default: 200.
    pub overlap: usize,

    /// Minimum chunk size (avoids tiny trailing chunks).
    /// Default: 100.
    pub min_chunk_size: usize,
}

impl Default for ChunkConfig {
    fn default() -> Self {
        Self {
            max_chars: 2000,
            overlap: 200,
            min_chunk_size: 100,
        }
    }
}

impl ChunkConfig {
    /// Chunking sized to a provider's input limit.
    ///
    /// Caps at the default size; overlap and minimum scale with it.
    #[must_use]
    pub fn for_provider(info: &ProviderInfo) -> Self {
        let max_chars = info.max_chars.clamp(200, 2000);
        Self {
            max_chars,
            overlap: max_chars / 10,
            min_chunk_size: max_chars / 20,
        }
    }
}

/// A text chunk with its position.
#[derive(Debug, Clone)]
pub struct TextChunk {
    pub text: String,
    /// Zero-based index of this chunk.
    pub index: usize,
    /// Byte offset in the trimmed original text.
    pub start_offset: usize,
    pub end_offset: usize,
}

/// Split text into overlapping chunks.
///
/// # Examples
///
/// ```rust
/// use ragdocs::embeddings::chunking::{chunk_text, ChunkConfig};
///
/// let chunks = chunk_text("This is a test.", &ChunkConfig::default());
/// assert_eq!(chunks.len(), 1);
/// assert_eq!(chunks[0].text, "This is a test.");
/// ```
#[must_use]
pub fn chunk_text(text: &str, config: &ChunkConfig) -> Vec<TextChunk> {
    let text = text.trim();

    if text.is_empty() {
        return vec![];
    }

    if text.len() <= config.max_chars {
        return vec![TextChunk {
            text: text.to_string(),
            index: 0,
            start_offset: 0,
            end_offset: text.len(),
        }];
    }

    let mut chunks = Vec::new();
    let mut start = 0;

    while start < text.len() {
        let mut end = floor_char_boundary(text, (start + config.max_chars).min(text.len()));

        if end < text.len() {
            end = find_word_boundary(text, end, start + config.min_chunk_size);
        }
        if end <= start {
            // A single char wider than max_chars; take it whole.
            end = ceil_char_boundary(text, start + 1);
        }

        let piece = &text[start..end];
        let is_last = end >= text.len();

        if piece.len() >= config.min_chunk_size || is_last {
            chunks.push(TextChunk {
                text: piece.to_string(),
                index: chunks.len(),
                start_offset: start,
                end_offset: end,
            });
        }

        if is_last {
            break;
        }

        let next_start = floor_char_boundary(text, end.saturating_sub(config.overlap));
        start = if next_start <= start { end } else { next_start };
    }

    chunks
}

/// Search backward from `target` for whitespace or punctuation, not past `min_pos`.
///
/// Returns the offset just after the boundary char, or `target` if none is found.
fn find_word_boundary(text: &str, target: usize, min_pos: usize) -> usize {
    text[..target]
        .char_indices()
        .rev()
        .take_while(|(i, _)| *i >= min_pos)
        .find(|(_, c)| c.is_whitespace() || matches!(c, '.' | '!' | '?' | ';' | ','))
        .map_or(target, |(i, c)| i + c.len_utf8())
}

fn floor_char_boundary(text: &str, mut index: usize) -> usize {
    while index > 0 && !text.is_char_boundary(index) {
        index -= 1;
    }
    index
}

fn ceil_char_boundary(text: &str, mut index: usize) -> usize {
    while index < text.len() && !text.is_char_boundary(index) {
        index += 1;
    }
    index.min(text.len())
}
