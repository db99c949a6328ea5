//! # latc - LAT dictionary compiler
//!
//! `latc` compiles a directory of human-maintained dictionary source
//! files into the compact lexical index a text-tagging engine loads to
//! recognize multi-word expressions: per-category "LAT" pattern files
//! (one token pattern per line) plus a `_wordclasses.txt`
//! word-classification file go in, one `DictionaryIndex` artifact comes
//! out.
//!
//! ## Architecture
//!
//! - [`dictionary`] - data model, vocabulary loader, rule indexer, and
//!   the concurrent ingestion pipeline
//! - [`output`] - interchangeable sinks (JSON document, flat record
//!   export, graph-mutation stream)
//! - [`utils`] - the fixed token grammar and case normalization
//!
//! ## Quick Start
//!
//! ```no_run
//! use latc::{CompilerConfig, compile_dictionary};
//! use std::path::Path;
//!
//! let config = CompilerConfig::default();
//! let (index, stats) = compile_dictionary(Path::new("Dictionaries/default"), &config).unwrap();
//! println!("{} patterns, {} words", index.pattern_count(), stats.final_words);
//! ```
//!
//! ## Index layout
//!
//! Multi-token patterns are keyed by their first two tokens
//! (`rules[t0][t1][category]` holding the remaining suffixes), so the
//! tagger can probe longest-pattern-first while scanning token by token;
//! single-token patterns live in a separate `shortRules` table. Every
//! token appearing in any pattern is guaranteed a vocabulary entry, backed
//! by self-membership when the word-classification file never listed it.

pub mod dictionary;
pub mod output;
pub mod utils;

pub use dictionary::build::{compile_dictionary, compile_dictionary_with_progress};
pub use dictionary::types::{CompilerConfig, DictionaryIndex};
