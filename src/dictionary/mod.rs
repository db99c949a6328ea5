//! Dictionary compilation.
//!
//! - [`types`] - data model and compiler configuration
//! - [`vocabulary`] - word-classification (seed vocabulary) loader
//! - [`indexer`] - single-writer aggregator building the layered index
//! - [`pipeline`] - bounded worker pool over discovered files
//! - [`build`] - discovery + ingestion driver
//! - [`stats`] - `--stats` counter display

pub mod build;
pub mod indexer;
pub mod pipeline;
pub mod stats;
pub mod types;
pub mod vocabulary;

pub use build::{compile_dictionary, compile_dictionary_with_progress};
pub use indexer::{CompileStats, DictionaryBuilder};
pub use types::{CompilerConfig, DictionaryIndex, FlatRule};
