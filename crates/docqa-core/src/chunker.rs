//! Fixed-width text wrapping.
//!
//! Every chunk is a contiguous slice of the input holding at most `width`
//! characters. Breaks land on whitespace when the window contains any; the
//! whitespace run at a break belongs to no chunk. Words longer than `width`
//! are cut hard at a char boundary.

/// Split `text` into chunks of at most `width` characters.
///
/// Returns an empty vector for empty or whitespace-only input. `width` must be
/// non-zero; zero also yields no chunks.
pub fn chunk_text(text: &str, width: usize) -> Vec<&str> {
    let mut chunks = Vec::new();
    if width == 0 {
        return chunks;
    }

    let mut rest = text.trim_start();
    while !rest.is_empty() {
        let Some((limit, _)) = rest.char_indices().nth(width) else {
            chunks.push(rest.trim_end());
            break;
        };

        let window = &rest[..limit];
        let cut = if rest[limit..].starts_with(char::is_whitespace) {
            limit
        } else {
            // rest never starts with whitespace, so a hit here is past offset 0
            window.rfind(char::is_whitespace).unwrap_or(limit)
        };

        chunks.push(rest[..cut].trim_end());
        rest = rest[cut..].trim_start();
    }
    chunks
}

/// Owned convenience wrapper around [`chunk_text`].
pub fn chunk_text_owned(text: &str, width: usize) -> Vec<String> {
    chunk_text(text, width).into_iter().map(str::to_string).collect()
}
