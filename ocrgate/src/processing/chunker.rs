/// Greedy whitespace-token packer. Tokens are joined by single spaces.
///
/// Lengths are counted in characters. A token longer than `max_size` is
/// never split; it becomes a chunk of its own.
pub fn chunk(text: &str, max_size: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current: Vec<&str> = Vec::new();
    let mut current_length = 0usize;

    for word in text.split_whitespace() {
        let len = word.chars().count();
        if current_length + len + 1 > max_size && !current.is_empty() {
            chunks.push(current.join(" "));
            current.clear();
            current.push(word);
            current_length = len;
        } else {
            current.push(word);
            current_length += len + 1;
        }
    }

    if !current.is_empty() {
        chunks.push(current.join(" "));
    }

    chunks
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_empty_text() {
        assert!(chunk("", 800).is_empty());
        assert!(chunk(" \n\t ", 800).is_empty());
    }

    #[test]
    fn test_short_text_is_one_chunk() {
        assert_eq!(chunk("Hello   world\nagain", 800), vec!["Hello world again"]);
    }

    #[test]
    fn test_packing_boundary() {
        // "aaaa" (len 4) accumulates 5; adding "bbbb" needs 5 + 4 + 1 = 10
        assert_eq!(chunk("aaaa bbbb", 10), vec!["aaaa bbbb"]);
        assert_eq!(chunk("aaaa bbbb", 9), vec!["aaaa", "bbbb"]);
    }

    #[test]
    fn test_oversized_token_stands_alone() {
        let chunks = chunk("a supercalifragilistic b", 10);
        assert_eq!(chunks, vec!["a", "supercalifragilistic", "b"]);
    }

    #[test]
    fn test_length_counts_characters() {
        // four 2-byte characters count as four
        assert_eq!(chunk("éééé éééé", 10), vec!["éééé éééé"]);
    }

    #[test]
    fn test_restarted_chunk_counts_first_token_without_separator() {
        assert_eq!(chunk("ab cd ef", 5), vec!["ab", "cd ef"]);
    }
}
