use once_cell::sync::Lazy;
use regex::Regex;

/// Recognition confidence at or above which the misread corrections are
/// skipped.
pub const CORRECTION_CONFIDENCE_CEILING: f32 = 90.0;

/// Applied in order; later patterns see earlier output.
static CORRECTIONS: Lazy<Vec<(Regex, &'static str)>> = Lazy::new(|| {
    vec![
        (Regex::new(r"(?i)\brn\b").unwrap(), "m"),
        (Regex::new(r"(?i)\bvv\b").unwrap(), "w"),
        (Regex::new(r"\b0([a-zA-Z])").unwrap(), "O${1}"),
        (Regex::new(r"\b1([a-zA-Z])").unwrap(), "l${1}"),
        (Regex::new(r"([a-zA-Z])0\b").unwrap(), "${1}o"),
    ]
});

static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

static SPACE_BEFORE_PUNCT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+([,.!?;:])").unwrap());

static AFTER_PUNCT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"([,.!?;:])\s*").unwrap());

/// Clean raw OCR output.
///
/// Below [`CORRECTION_CONFIDENCE_CEILING`] common misreads are corrected
/// first (`rn`→`m`, `vv`→`w`, digit/letter confusions, `|`→`l`). Spacing is
/// then normalized: single spaces, none before `, . ! ? ; :` and one after
/// each, no surrounding whitespace. Empty or blank input is returned as is.
pub fn process(text: &str, confidence: f32) -> String {
    if text.trim().is_empty() {
        return text.to_string();
    }

    let mut cleaned = text.trim().to_string();

    if confidence < CORRECTION_CONFIDENCE_CEILING {
        for (pattern, replacement) in CORRECTIONS.iter() {
            cleaned = pattern.replace_all(&cleaned, *replacement).into_owned();
        }
        cleaned = replace_between_letters(&cleaned, '5', 's');
        cleaned = cleaned.replace('|', "l");
    }

    let cleaned = WHITESPACE_RE.replace_all(&cleaned, " ");
    let cleaned = SPACE_BEFORE_PUNCT_RE.replace_all(&cleaned, "${1}");
    let cleaned = AFTER_PUNCT_RE.replace_all(&cleaned, "${1} ");

    cleaned.trim().to_string()
}

/// Replace `from` with `to` wherever both neighbours are ASCII letters in
/// the input.
fn replace_between_letters(text: &str, from: char, to: char) -> String {
    let chars: Vec<char> = text.chars().collect();
    chars
        .iter()
        .enumerate()
        .map(|(i, &c)| {
            let between_letters = c == from
                && i > 0
                && chars[i - 1].is_ascii_alphabetic()
                && chars.get(i + 1).is_some_and(|n| n.is_ascii_alphabetic());
            if between_letters {
                to
            } else {
                c
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_blank_input_is_untouched() {
        assert_eq!(process("", 10.0), "");
        assert_eq!(process("   \n\t", 10.0), "   \n\t");
    }

    #[test]
    fn test_word_level_corrections() {
        assert_eq!(process("rn", 50.0), "m");
        assert_eq!(process("turn rn VV", 50.0), "turn m w");
    }

    #[test]
    fn test_digit_letter_confusions() {
        assert_eq!(process("0pen 1ate", 50.0), "Open late");
        assert_eq!(process("hell0 w0rld", 50.0), "hello w0rld");
        assert_eq!(process("ca5e", 50.0), "case");
        assert_eq!(process("a5b5c", 50.0), "asbsc");
        assert_eq!(process("room 15 and 2005", 50.0), "room 15 and 2005");
    }

    #[test]
    fn test_pipe_becomes_l() {
        assert_eq!(process("he||o", 50.0), "hello");
    }

    #[test]
    fn test_corrections_run_in_order() {
        // "1rn" -> `\brn\b` does not fire inside the word, then "1r" -> "lr"
        assert_eq!(process("1rn", 50.0), "lrn");
    }

    #[test]
    fn test_high_confidence_skips_corrections() {
        assert_eq!(process("0pen rn he||o", 95.0), "0pen rn he||o");
        assert_eq!(process("0pen", 90.0), "0pen");
        assert_eq!(process("0pen", 89.99), "Open");
    }

    #[test]
    fn test_punctuation_spacing() {
        assert_eq!(process("Hello ,world !How are you ?", 95.0), "Hello, world! How are you?");
        assert_eq!(process("a;b:c", 95.0), "a; b: c");
    }

    #[test]
    fn test_no_trailing_space_after_terminal_punctuation() {
        assert_eq!(process("  Done.  ", 95.0), "Done.");
        assert_eq!(process("Done .", 40.0), "Done.");
    }

    #[test]
    fn test_whitespace_runs_collapse() {
        assert_eq!(process("line one\n\nline\ttwo", 95.0), "line one line two");
    }
}
