use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A normalized token: a lower-cased word or an upper-cased class marker.
pub type Token = String;

/// Category identifier, derived from a LAT file's base name.
pub type Category = String;

/// An ordered sequence of normalized tokens parsed from one line.
pub type Pattern = Vec<Token>;

/// First token -> second token -> category -> appended pattern suffixes.
///
/// The two-token prefix is the lookup key the tagger scans with; the stored
/// suffixes are the remainder of each pattern (possibly empty for two-token
/// patterns). Suffix lists are append-only and may hold duplicates.
pub type RulesMap = BTreeMap<Token, BTreeMap<Token, BTreeMap<Category, Vec<Pattern>>>>;

/// Single-token pattern -> category. One category per token, last writer wins.
pub type ShortRulesMap = BTreeMap<Token, Category>;

/// Token -> class memberships. Every token holds at least itself.
pub type WordsMap = BTreeMap<Token, Vec<String>>;

/// Prefix character marking a class-marker token (and class names in the
/// vocabulary file after normalization).
pub const CLASS_SENTINEL: char = '!';

/// Header keyword opening a class block in the word-classification file.
pub const CLASS_HEADER: &str = "CLASS:";

/// Placeholder class for words listed before the first class header.
pub const NO_CLASS: &str = "NONE";

/// The compiler's sole output artifact: the three frozen index structures.
///
/// `BTreeMap` keys keep serialization deterministic, so two runs over the
/// same dictionary snapshot produce byte-identical JSON.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DictionaryIndex {
    pub rules: RulesMap,
    #[serde(rename = "shortRules")]
    pub short_rules: ShortRulesMap,
    pub words: WordsMap,
}

impl DictionaryIndex {
    /// Total number of stored patterns across both rule tables.
    pub fn pattern_count(&self) -> usize {
        let long: usize = self
            .rules
            .values()
            .flat_map(|seconds| seconds.values())
            .flat_map(|cats| cats.values())
            .map(|suffixes| suffixes.len())
            .sum();
        long + self.short_rules.len()
    }
}

/// One record of the flat rule export: a category paired with a full
/// pattern, token order preserved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlatRule {
    #[serde(rename = "LAT")]
    pub lat: Category,
    #[serde(rename = "Pat")]
    pub pattern: Pattern,
}

/// Configuration for the dictionary compiler.
#[derive(Debug, Clone)]
pub struct CompilerConfig {
    /// Worker threads scanning LAT files.
    pub workers: usize,
    /// Capacity of the task and result queues.
    pub channel_capacity: usize,
    /// Extension of pattern-source files (without the dot).
    pub pattern_extension: String,
    /// Base-name prefix marking auxiliary files to skip.
    pub reserved_prefix: char,
    /// Name of the word-classification file under the dictionary root.
    pub wordclasses_file: String,
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            workers: 30,
            channel_capacity: 256,
            pattern_extension: "txt".to_string(),
            reserved_prefix: '_',
            wordclasses_file: "_wordclasses.txt".to_string(),
        }
    }
}

impl CompilerConfig {
    /// Worker count with a floor of one.
    pub fn effective_workers(&self) -> usize {
        self.workers.max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pattern_count() {
        let mut index = DictionaryIndex::default();
        index
            .rules
            .entry("a".into())
            .or_default()
            .entry("b".into())
            .or_default()
            .entry("Cat".into())
            .or_default()
            .extend([vec![], vec!["c".into()]]);
        index.short_rules.insert("wow".into(), "Bang".into());
        assert_eq!(index.pattern_count(), 3);
    }

    #[test]
    fn test_index_json_field_names() {
        let index = DictionaryIndex::default();
        let json = serde_json::to_string(&index).unwrap();
        assert_eq!(json, r#"{"rules":{},"shortRules":{},"words":{}}"#);
    }
}
