//! Plain-text view of post content.
//!
//! Markup is removed with a single `<[^>]*>` pattern. Entities are not
//! decoded and malformed markup is not repaired; an unclosed `<` survives.

use std::sync::LazyLock;

use regex::Regex;

static TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").expect("valid tag regex"));

const WORDS_PER_MINUTE: usize = 200;

/// Remove every `<...>` span. Whitespace passes through untouched.
pub fn strip_markup(content: &str) -> String {
    TAG.replace_all(content, "").into_owned()
}

/// Words in the stripped text, counted as pieces between single spaces.
/// Empty text counts as one word.
pub fn word_count(content: &str) -> usize {
    strip_markup(content).split(' ').count()
}

/// Estimated reading time in whole minutes, rounded up.
pub fn reading_time_minutes(content: &str) -> usize {
    word_count(content).div_ceil(WORDS_PER_MINUTE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_tags_but_keeps_whitespace() {
        assert_eq!(
            strip_markup("<p>Hello  <b>world</b></p>\n<br/>next"),
            "Hello  world\nnext"
        );
    }

    #[test]
    fn leaves_entities_and_unclosed_brackets() {
        assert_eq!(strip_markup("a &amp; b < c"), "a &amp; b < c");
    }

    #[test]
    fn reading_time_rounds_up() {
        assert_eq!(reading_time_minutes(""), 1);
        assert_eq!(reading_time_minutes(&vec!["w"; 200].join(" ")), 1);
        assert_eq!(reading_time_minutes(&vec!["w"; 201].join(" ")), 2);
        assert_eq!(reading_time_minutes("<p>one two</p> three"), 1);
    }
}
