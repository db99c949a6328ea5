//! Vocabulary Loader: parses the word-classification source file into the
//! seed token -> class-membership table.
//!
//! Line grammar (whitespace-delimited fields):
//!
//! - `CLASS: <name>` sets the current class; the name is upper-cased and
//!   prefixed with the class sentinel (`!QUALITY`).
//! - a single field registers that word (lower-cased) as a member of the
//!   current class, always alongside self-membership.
//! - anything else is ignored.
//!
//! Words listed before the first header attach to the visible `NONE`
//! placeholder rather than being silently dropped.

use crate::dictionary::types::{CLASS_HEADER, CLASS_SENTINEL, NO_CLASS, WordsMap};
use anyhow::{Context, Result};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Load the word-classification file at `path` into `words`.
///
/// An unopenable file is fatal: no partial vocabulary is usable.
pub fn load_word_classes(words: &mut WordsMap, path: &Path) -> Result<()> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open word classes file {}", path.display()))?;
    read_word_classes(words, BufReader::new(file))
        .with_context(|| format!("Failed to read word classes file {}", path.display()))
}

/// Parse word-classification lines from any reader.
///
/// Membership sets behave as sets: re-reading the same source leaves the
/// table unchanged.
pub fn read_word_classes<R: BufRead>(words: &mut WordsMap, reader: R) -> Result<()> {
    let mut current_class = NO_CLASS.to_string();

    for line in reader.lines() {
        let line = line.context("Failed to read line")?;
        let fields: Vec<&str> = line.split_whitespace().collect();
        match fields.as_slice() {
            [word] => {
                let word = word.to_lowercase();
                let members = words
                    .entry(word.clone())
                    .or_insert_with(|| vec![word.clone()]);
                push_new(members, &current_class);
            }
            [header, class] if *header == CLASS_HEADER => {
                current_class = format!("{}{}", CLASS_SENTINEL, class.to_uppercase());
            }
            _ => {}
        }
    }

    Ok(())
}

/// Append only if not already a member.
fn push_new(members: &mut Vec<String>, class: &str) {
    if !members.iter().any(|m| m == class) {
        members.push(class.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn parse(source: &str) -> WordsMap {
        let mut words = WordsMap::new();
        read_word_classes(&mut words, Cursor::new(source)).unwrap();
        words
    }

    #[test]
    fn test_class_membership() {
        let words = parse("CLASS: quality\ngood\nbad\nCLASS: size\nbig\ngood\n");
        assert_eq!(words["good"], vec!["good", "!QUALITY", "!SIZE"]);
        assert_eq!(words["bad"], vec!["bad", "!QUALITY"]);
        assert_eq!(words["big"], vec!["big", "!SIZE"]);
    }

    #[test]
    fn test_words_before_first_header_get_placeholder() {
        let words = parse("stray\nCLASS: quality\ngood\n");
        assert_eq!(words["stray"], vec!["stray", "NONE"]);
    }

    #[test]
    fn test_word_is_lowercased_and_class_uppercased() {
        let words = parse("CLASS: Quality\nGOOD\n");
        assert_eq!(words["good"], vec!["good", "!QUALITY"]);
    }

    #[test]
    fn test_other_field_counts_ignored() {
        let words = parse("one two three\nnot a class header\nCLASS: q\nword\n");
        assert_eq!(words.len(), 1);
        assert_eq!(words["word"], vec!["word", "!Q"]);
    }

    #[test]
    fn test_non_header_two_field_line_ignored() {
        let words = parse("FOO: quality\ngood\n");
        assert_eq!(words["good"], vec!["good", "NONE"]);
    }

    #[test]
    fn test_idempotent() {
        let source = "CLASS: quality\ngood\nbad\n";
        let once = parse(source);
        let mut twice = once.clone();
        read_word_classes(&mut twice, Cursor::new(source)).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_missing_file_is_fatal() {
        let mut words = WordsMap::new();
        let err = load_word_classes(&mut words, Path::new("/nonexistent/_wordclasses.txt"));
        assert!(err.is_err());
    }
}
