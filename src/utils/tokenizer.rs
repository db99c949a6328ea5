//! Fixed token grammar for LAT pattern lines.
//!
//! A token is either the longest run of word-forming characters (letters,
//! digits, apostrophe, hyphen, plus the `!`/`?` markers) or a single
//! punctuation character from the allowed set. Anything else, including
//! whitespace, only separates tokens.

use regex::Regex;
use std::sync::OnceLock;

static TOKEN_RE: OnceLock<Regex> = OnceLock::new();

fn token_re() -> &'static Regex {
    TOKEN_RE.get_or_init(|| {
        Regex::new(r##"[!?\w'-]+|[!"#$%&'()*+,\-./:;<=>?@\[\\\]^_`{|}~]"##)
            .expect("token grammar is a valid regex")
    })
}

/// Split one line into an ordered list of normalized tokens.
///
/// Empty or all-separator lines yield an empty vec, which callers must
/// treat as "no pattern".
pub fn tokenize(line: &str) -> Vec<String> {
    token_re()
        .find_iter(line)
        .map(|m| fix_case(m.as_str()))
        .collect()
}

/// Case normalization, applied token by token: class markers (prefixed
/// with `!`) are upper-cased, ordinary words lower-cased.
pub fn fix_case(token: &str) -> String {
    if token.starts_with(crate::dictionary::types::CLASS_SENTINEL) {
        token.to_uppercase()
    } else {
        token.to_lowercase()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_case_normalization() {
        assert_eq!(tokenize("Foo !bar BAZ"), vec!["foo", "!BAR", "baz"]);
    }

    #[test]
    fn test_empty_line() {
        assert!(tokenize("").is_empty());
        assert!(tokenize("   \t  ").is_empty());
    }

    #[test]
    fn test_word_characters_bind() {
        assert_eq!(tokenize("don't worry-free"), vec!["don't", "worry-free"]);
    }

    #[test]
    fn test_lone_punctuation_is_a_token() {
        assert_eq!(tokenize("well , yes ."), vec!["well", ",", "yes", "."]);
        assert_eq!(tokenize("(ok)"), vec!["(", "ok", ")"]);
    }

    #[test]
    fn test_class_marker_binds_with_word() {
        assert_eq!(tokenize("a !quality thing"), vec!["a", "!QUALITY", "thing"]);
    }

    #[test]
    fn test_digits_and_underscore() {
        assert_eq!(tokenize("catch_22 B2B"), vec!["catch_22", "b2b"]);
    }
}
