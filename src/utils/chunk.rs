use unicode_segmentation::UnicodeSegmentation;

/// Split `s` into consecutive pieces of at most `max_chars` characters
/// without breaking a grapheme cluster apart.
///
/// A single grapheme longer than `max_chars` is kept whole in its own piece.
pub fn split_in_chunks(s: &str, max_chars: usize) -> Vec<String> {
    let mut chunks = vec![];
    let mut current = String::new();
    let mut current_len = 0;

    for grapheme in s.graphemes(true) {
        let grapheme_len = grapheme.chars().count();
        if current_len + grapheme_len > max_chars && !current.is_empty() {
            chunks.push(std::mem::take(&mut current));
            current_len = 0;
        }
        current.push_str(grapheme);
        current_len += grapheme_len;
    }

    if !current.is_empty() {
        chunks.push(current);
    }

    chunks
}
