//! Context window extraction / 上下文窗口提取
//!
//! Offsets are byte offsets into `text` (as returned by `str::find`),
//! window widths are counted in characters so multi-byte text gets the
//! same amount of surrounding context as ASCII.

/// Return `context_length` chars before the match, the match, and
/// `context_length` chars after, clipped to the text bounds / 提取匹配位置前后的上下文
///
/// Never panics: out-of-range or mid-character offsets are clamped.
pub fn extract_context(text: &str, match_start: usize, match_len: usize, context_length: usize) -> &str {
    let start = floor_boundary(text, match_start);
    let match_end = ceil_boundary(text, match_start.saturating_add(match_len)).max(start);

    let begin = text[..start]
        .char_indices()
        .rev()
        .take(context_length)
        .last()
        .map(|(i, _)| i)
        .unwrap_or(start);

    let end = text[match_end..]
        .char_indices()
        .nth(context_length)
        .map(|(i, _)| match_end + i)
        .unwrap_or(text.len());

    &text[begin..end]
}

fn floor_boundary(text: &str, idx: usize) -> usize {
    let mut idx = idx.min(text.len());
    while !text.is_char_boundary(idx) {
        idx -= 1;
    }
    idx
}

fn ceil_boundary(text: &str, idx: usize) -> usize {
    let mut idx = idx.min(text.len());
    while !text.is_char_boundary(idx) {
        idx += 1;
    }
    idx
}
