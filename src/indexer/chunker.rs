#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextChunk {
    pub text: String,
    pub chunk_index: usize,
    /// Byte range of this chunk within the source text.
    pub start: usize,
    pub end: usize,
}

/// Byte position reached after moving `count` chars forward from `from`.
fn advance_chars(text: &str, from: usize, count: usize) -> usize {
    text[from..]
        .char_indices()
        .nth(count)
        .map(|(pos, _)| from + pos)
        .unwrap_or(text.len())
}

/// Byte position reached after moving `count` chars back from `from`.
fn retreat_chars(text: &str, from: usize, count: usize) -> usize {
    if count == 0 {
        return from;
    }
    text[..from]
        .char_indices()
        .rev()
        .nth(count - 1)
        .map(|(pos, _)| pos)
        .unwrap_or(0)
}

/// Split `text` into windows of at most `chunk_size` chars, each starting
/// `chunk_overlap` chars before the previous cut. Chunks are exact slices of
/// the input, so dropping the overlaps gives back the original text.
pub fn chunk_text(text: &str, chunk_size: usize, chunk_overlap: usize) -> Vec<TextChunk> {
    if chunk_size == 0 || text.trim().is_empty() {
        return Vec::new();
    }

    let mut chunks = Vec::new();
    let mut start = 0;

    while start < text.len() {
        let end = advance_chars(text, start, chunk_size);

        let actual_end = if end < text.len() {
            // A cut inside the overlap region would leave nothing to overlap with.
            let search_from = advance_chars(text, start, chunk_overlap.min(chunk_size - 1));
            find_break_point(text, search_from, end)
        } else {
            end
        };

        chunks.push(TextChunk {
            text: text[start..actual_end].to_string(),
            chunk_index: chunks.len(),
            start,
            end: actual_end,
        });

        let next_start = retreat_chars(text, actual_end, chunk_overlap);
        if next_start <= start {
            start = actual_end;
        } else {
            start = next_start;
        }
    }

    chunks
}

/// Last boundary in `text[search_from..max_end]`, coarsest kind first.
fn find_break_point(text: &str, search_from: usize, max_end: usize) -> usize {
    let segment = &text[search_from..max_end];

    if let Some(pos) = segment.rfind("\n\n") {
        return search_from + pos + 2;
    }
    if let Some(pos) = segment.rfind('\n') {
        return search_from + pos + 1;
    }
    for sentinel in ["。", "？", "！", ". ", "? ", "! "] {
        if let Some(pos) = segment.rfind(sentinel) {
            return search_from + pos + sentinel.len();
        }
    }
    if let Some(pos) = segment.rfind(' ') {
        return search_from + pos + 1;
    }
    max_end
}
