//! Heuristic token counts for batch packing.
//!
//! Not tokenizer-exact. Short texts are estimated from characters alone;
//! longer texts take the larger of the character and word estimates so
//! word-dense prose is not undercounted.

use recall_core::constants::SHORT_TEXT_CHARS;

/// Estimated tokens for `text`, capped at `max_length`.
pub fn estimate_tokens(text: &str, max_length: usize) -> usize {
    let chars = text.chars().count();
    let by_chars = chars.div_ceil(4);
    if chars < SHORT_TEXT_CHARS {
        return by_chars.min(max_length);
    }
    let words = text.split_whitespace().count();
    // ceil(words * 1.3) in integer math.
    let by_words = (words * 13).div_ceil(10);
    by_chars.max(by_words).min(max_length)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_text_is_zero() {
        assert_eq!(estimate_tokens("", 512), 0);
    }

    #[test]
    fn short_text_uses_chars() {
        // 11 chars -> ceil(11/4) = 3
        assert_eq!(estimate_tokens("hello world", 512), 3);
    }

    #[test]
    fn short_text_is_capped() {
        assert_eq!(estimate_tokens("hello world", 2), 2);
    }

    #[test]
    fn long_text_takes_word_estimate_when_larger() {
        // 60 one-letter words: 119 chars -> 30 by chars, 78 by words.
        let text = vec!["a"; 60].join(" ");
        assert_eq!(text.chars().count(), 119);
        assert_eq!(estimate_tokens(&text, 512), 78);
    }

    #[test]
    fn long_text_takes_char_estimate_when_larger() {
        // One 200-char word: 50 by chars, 2 by words.
        let text = "x".repeat(200);
        assert_eq!(estimate_tokens(&text, 512), 50);
    }

    #[test]
    fn long_text_is_capped() {
        let text = "x".repeat(4000);
        assert_eq!(estimate_tokens(&text, 512), 512);
    }
}
