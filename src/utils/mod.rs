//! Shared utilities.
//!
//! - [`tokenizer`] - fixed token grammar and case normalization

pub mod tokenizer;

pub use tokenizer::*;
