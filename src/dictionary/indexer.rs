//! Rule Indexer: the single-writer aggregator owning the three output
//! structures while a compile is in flight.

use crate::dictionary::types::{Category, DictionaryIndex, Pattern, RulesMap, ShortRulesMap, Token, WordsMap};
use rustc_hash::FxHashMap;

/// Counters tracked across one compile, reported by `--stats`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CompileStats {
    /// Vocabulary entries seeded from the word-classification file.
    pub seed_words: usize,
    /// Tokens backfilled with self-membership during ingestion.
    pub missing_words: usize,
    /// Vocabulary entries in the finished index.
    pub final_words: usize,
    /// LAT files scanned.
    pub file_count: usize,
    /// Non-empty patterns ingested (both rule tables).
    pub pattern_count: usize,
    /// Suffix entries appended to the rules table.
    pub rule_count: usize,
    /// Distinct tokens in the short-rules table.
    pub short_rule_count: usize,
}

/// Accumulates patterns into the layered index and backfills the
/// vocabulary. All mutation goes through this one owner; workers only
/// send messages, so no locks guard the maps.
pub struct DictionaryBuilder {
    rules: RulesMap,
    short_rules: ShortRulesMap,
    /// Source-file rank of each short rule, for the deterministic
    /// last-writer-wins policy under concurrent ingestion.
    short_rule_ranks: FxHashMap<Token, u32>,
    words: WordsMap,
    stats: CompileStats,
}

impl DictionaryBuilder {
    /// Start a build from the seed vocabulary.
    pub fn new(words: WordsMap) -> Self {
        let stats = CompileStats {
            seed_words: words.len(),
            ..CompileStats::default()
        };
        Self {
            rules: RulesMap::new(),
            short_rules: ShortRulesMap::new(),
            short_rule_ranks: FxHashMap::default(),
            words,
            stats,
        }
    }

    /// Insert one tokenized pattern for a category.
    ///
    /// `rank` is the source file's position in the sorted discovery order;
    /// short-rule conflicts resolve to the highest rank seen, so the final
    /// table does not depend on worker scheduling. Empty patterns are
    /// discarded.
    pub fn add_pattern(&mut self, category: &str, pattern: &[Token], rank: u32) {
        match pattern {
            [] => return,
            [token] => self.add_short_rule(token, category, rank),
            [first, second, suffix @ ..] => {
                self.rules
                    .entry(first.clone())
                    .or_default()
                    .entry(second.clone())
                    .or_default()
                    .entry(category.to_string())
                    .or_default()
                    .push(suffix.to_vec());
                self.stats.rule_count += 1;
            }
        }
        self.stats.pattern_count += 1;
        self.backfill(pattern);
    }

    fn add_short_rule(&mut self, token: &Token, category: &str, rank: u32) {
        let stale = self
            .short_rule_ranks
            .get(token)
            .is_some_and(|&seen| rank < seen);
        if stale {
            return;
        }
        if self.short_rules.insert(token.clone(), category.to_string()).is_none() {
            self.stats.short_rule_count += 1;
        }
        self.short_rule_ranks.insert(token.clone(), rank);
    }

    /// Give every previously unseen token a self-membership entry. Runs
    /// for all tokens of every pattern, whatever its length.
    fn backfill(&mut self, pattern: &[Token]) {
        for token in pattern {
            if !self.words.contains_key(token) {
                self.words.insert(token.clone(), vec![token.clone()]);
                self.stats.missing_words += 1;
            }
        }
    }

    /// Record one scanned LAT file.
    pub fn note_file(&mut self) {
        self.stats.file_count += 1;
    }

    pub fn stats(&self) -> CompileStats {
        self.stats
    }

    /// Freeze the three structures into the output artifact.
    pub fn finish(mut self) -> (DictionaryIndex, CompileStats) {
        self.stats.final_words = self.words.len();
        let index = DictionaryIndex {
            rules: self.rules,
            short_rules: self.short_rules,
            words: self.words,
        };
        (index, self.stats)
    }
}

/// Patterns scanned from one LAT file, ready for aggregation.
#[derive(Debug)]
pub struct ScannedFile {
    pub category: Category,
    pub patterns: Vec<Pattern>,
}
