//! Newline-boundary text chunker with overlap.
//!
//! Splits the concatenated document text into retrieval-sized segments by
//! greedily accumulating newline-delimited pieces until the target size is
//! reached. Consecutive chunks share a tail of up to `overlap` characters so
//! a passage cut near a boundary still lands whole in one chunk.
//!
//! The target size is soft: a single piece with no separator in reach grows
//! the chunk past the target rather than being cut mid-line.

use std::collections::VecDeque;

/// Split `text` into overlapping chunks at newline boundaries.
///
/// `chunk_size` and `overlap` are measured in characters. Empty input
/// yields no chunks; input shorter than `chunk_size` yields exactly one
/// chunk equal to the input. Every character of `text` appears in at least
/// one chunk, in order.
pub fn split_text(text: &str, chunk_size: usize, overlap: usize) -> Vec<String> {
    if text.is_empty() {
        return Vec::new();
    }

    let mut chunks = Vec::new();
    // Sliding window of newline-delimited pieces; its front is the overlap
    // carried over from the previously emitted chunk.
    let mut window: VecDeque<&str> = VecDeque::new();
    let mut window_len = 0usize;

    for piece in text.split_inclusive('\n') {
        let piece_len = piece.chars().count();

        if window_len + piece_len > chunk_size && !window.is_empty() {
            chunks.push(window.iter().copied().collect::<String>());

            // Shrink the window down to the overlap budget, and further if
            // the incoming piece still would not fit.
            while window_len > overlap
                || (window_len + piece_len > chunk_size && window_len > 0)
            {
                let front = window.pop_front().expect("window not empty");
                window_len -= front.chars().count();
            }
        }

        window.push_back(piece);
        window_len += piece_len;
    }

    // The window always holds at least one piece added since the last flush.
    chunks.push(window.iter().copied().collect::<String>());
    chunks
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_yields_no_chunks() {
        assert!(split_text("", 1000, 200).is_empty());
    }

    #[test]
    fn short_input_yields_single_identical_chunk() {
        let text = "The capital of France is Paris.";
        let chunks = split_text(text, 1000, 200);
        assert_eq!(chunks, vec![text.to_string()]);
    }

    #[test]
    fn zero_overlap_chunks_tile_the_input_exactly() {
        let text = (0..40)
            .map(|i| format!("line number {}", i))
            .collect::<Vec<_>>()
            .join("\n");
        let chunks = split_text(&text, 50, 0);
        assert!(chunks.len() > 1);
        assert_eq!(chunks.concat(), text);
    }

    /// Drop each chunk's shared prefix with its predecessor and concatenate
    /// the rest; with distinct lines the longest suffix/prefix match is the
    /// carried overlap, so the result must be the original text.
    fn reconstruct(chunks: &[String]) -> String {
        let mut out = String::new();
        for (i, chunk) in chunks.iter().enumerate() {
            if i == 0 {
                out.push_str(chunk);
                continue;
            }
            let prev = &chunks[i - 1];
            let max = prev.len().min(chunk.len());
            let shared = (0..=max)
                .rev()
                .find(|&l| chunk.is_char_boundary(l) && prev.ends_with(&chunk[..l]))
                .unwrap_or(0);
            out.push_str(&chunk[shared..]);
        }
        out
    }

    #[test]
    fn overlapping_chunks_reconstruct_the_input_exactly() {
        let text = (0..40)
            .map(|i| format!("line number {}", i))
            .collect::<Vec<_>>()
            .join("\n");
        let chunks = split_text(&text, 60, 20);
        assert!(chunks.len() > 1);
        assert_eq!(reconstruct(&chunks), text);

        let chunks = split_text(&text, 90, 40);
        assert!(chunks.len() > 1);
        assert_eq!(reconstruct(&chunks), text);
    }

    #[test]
    fn adjacent_chunks_share_an_overlap_tail() {
        let text = (0..40)
            .map(|i| format!("line number {}", i))
            .collect::<Vec<_>>()
            .join("\n");
        let chunks = split_text(&text, 60, 20);
        assert!(chunks.len() > 1);
        for pair in chunks.windows(2) {
            // Some suffix of the previous chunk opens the next one.
            let prev = &pair[0];
            let next = &pair[1];
            assert!(
                prev.char_indices()
                    .map(|(i, _)| i)
                    .any(|i| next.starts_with(&prev[i..])),
                "no shared boundary between {:?} and {:?}",
                prev,
                next
            );
        }
    }

    #[test]
    fn every_line_of_input_survives_chunking() {
        let text = (0..100)
            .map(|i| format!("sentence {} about something", i))
            .collect::<Vec<_>>()
            .join("\n");
        let chunks = split_text(&text, 120, 30);
        for line in text.lines() {
            assert!(
                chunks.iter().any(|c| c.contains(line)),
                "line {:?} lost",
                line
            );
        }
    }

    #[test]
    fn piece_without_separator_grows_past_the_target() {
        let long_line = "x".repeat(5000);
        let chunks = split_text(&long_line, 1000, 200);
        assert_eq!(chunks, vec![long_line]);
    }

    #[test]
    fn size_is_respected_at_separator_boundaries() {
        let text = (0..60)
            .map(|i| format!("row {}", i))
            .collect::<Vec<_>>()
            .join("\n");
        let chunks = split_text(&text, 40, 10);
        for chunk in &chunks {
            assert!(chunk.chars().count() <= 40, "oversized chunk {:?}", chunk);
        }
    }

    #[test]
    fn multibyte_text_splits_on_char_boundaries() {
        let text = (0..30)
            .map(|i| format!("zeile {} äöü ß € 日本語", i))
            .collect::<Vec<_>>()
            .join("\n");
        let chunks = split_text(&text, 60, 15);
        assert!(chunks.len() > 1);
        for line in text.lines() {
            assert!(chunks.iter().any(|c| c.contains(line)));
        }
    }

    #[test]
    fn deterministic() {
        let text = "Alpha\nBeta\nGamma\nDelta\nEpsilon";
        assert_eq!(split_text(text, 12, 6), split_text(text, 12, 6));
    }
}
