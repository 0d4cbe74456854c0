//! Boundary-aware overlapping text chunker.
//!
//! Splits preferentially at paragraph and sentence boundaries, packs the
//! resulting segments greedily up to `max_chunk_chars`, and seeds each new
//! chunk with the character tail of the previous one so context survives a
//! split. Sizes are in characters; all slicing is UTF-8 boundary safe.

/// Split `text` into ordered, overlapping chunks.
///
/// Guarantees:
/// - every chunk holds at most `max_chunk_chars` characters;
/// - consecutive chunks overlap by up to `overlap_chars` characters;
/// - text no longer than `max_chunk_chars` yields exactly one chunk equal to
///   the input;
/// - empty or whitespace-only input yields an empty Vec, not an error.
pub fn chunk(text: &str, max_chunk_chars: usize, overlap_chars: usize) -> Vec<String> {
    if text.trim().is_empty() || max_chunk_chars == 0 {
        return Vec::new();
    }
    if text.chars().count() <= max_chunk_chars {
        return vec![text.to_string()];
    }

    // Oversized segments (a single run-on sentence, say) are hard-split so
    // that overlap seed + segment still fits the chunk bound.
    let overlap = overlap_chars.min(max_chunk_chars.saturating_sub(1));
    let cap = max_chunk_chars - overlap;

    let mut chunks: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut current_chars = 0usize;

    for segment in split_segments(text) {
        for piece in hard_split(segment, cap) {
            let piece_chars = piece.chars().count();
            if current_chars + piece_chars > max_chunk_chars && !current.is_empty() {
                let tail = tail_chars(&current, overlap);
                chunks.push(std::mem::take(&mut current));
                current_chars = tail.chars().count();
                current = tail;
            }
            current.push_str(piece);
            current_chars += piece_chars;
        }
    }

    if !current.trim().is_empty() {
        chunks.push(current);
    }
    chunks
}

/// Split text into sentence/paragraph segments, keeping every character:
/// cuts fall after a blank line or after whitespace that follows `.` `!` `?`.
fn split_segments(text: &str) -> Vec<&str> {
    let mut segments = Vec::new();
    let mut start = 0usize;
    let mut prev: Option<char> = None;

    for (i, c) in text.char_indices() {
        let end = i + c.len_utf8();
        let paragraph_break = c == '\n' && prev == Some('\n');
        let sentence_break =
            c.is_whitespace() && matches!(prev, Some('.') | Some('!') | Some('?'));
        if paragraph_break || sentence_break {
            segments.push(&text[start..end]);
            start = end;
        }
        prev = Some(c);
    }
    if start < text.len() {
        segments.push(&text[start..]);
    }
    segments
}

/// Split a segment into pieces of at most `cap` characters, on char
/// boundaries.
fn hard_split(segment: &str, cap: usize) -> Vec<&str> {
    if segment.chars().count() <= cap {
        return vec![segment];
    }
    let mut pieces = Vec::new();
    let mut rest = segment;
    while !rest.is_empty() {
        let cut = rest
            .char_indices()
            .nth(cap)
            .map(|(i, _)| i)
            .unwrap_or(rest.len());
        let (piece, tail) = rest.split_at(cut);
        pieces.push(piece);
        rest = tail;
    }
    pieces
}

/// The last `n` characters of `s`.
fn tail_chars(s: &str, n: usize) -> String {
    if n == 0 {
        return String::new();
    }
    let total = s.chars().count();
    if total <= n {
        return s.to_string();
    }
    s.chars().skip(total - n).collect()
}
