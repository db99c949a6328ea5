//! JSON sinks for the compiled index.
//!
//! Two shapes: the nested `{"rules", "shortRules", "words"}` document the
//! tagger loads directly, and the flat `[{LAT, Pat}, ..., {"words": ...}]`
//! record export for record-oriented stores. Both are written as a single
//! valid JSON value.

use crate::dictionary::types::{DictionaryIndex, FlatRule};
use anyhow::{Context, Result};
use serde_json::{Value, json};
use std::io::Write;

/// Serialize the index triple as one JSON object.
pub fn write_json_index<W: Write>(writer: W, index: &DictionaryIndex) -> Result<()> {
    serde_json::to_writer(writer, index).context("Failed to encode dictionary index")?;
    Ok(())
}

/// Reconstruct the full pattern list from the layered index: one record
/// per stored suffix, plus one per short rule.
pub fn flat_rules(index: &DictionaryIndex) -> Vec<FlatRule> {
    let mut records = Vec::with_capacity(index.pattern_count());

    for (first, seconds) in &index.rules {
        for (second, categories) in seconds {
            for (lat, suffixes) in categories {
                for suffix in suffixes {
                    let mut pattern = Vec::with_capacity(suffix.len() + 2);
                    pattern.push(first.clone());
                    pattern.push(second.clone());
                    pattern.extend(suffix.iter().cloned());
                    records.push(FlatRule {
                        lat: lat.clone(),
                        pattern,
                    });
                }
            }
        }
    }
    for (token, lat) in &index.short_rules {
        records.push(FlatRule {
            lat: lat.clone(),
            pattern: vec![token.clone()],
        });
    }

    records
}

/// Serialize the flat export: every rule record followed by the
/// vocabulary object, in one JSON array.
pub fn write_flat_rules<W: Write>(writer: W, index: &DictionaryIndex) -> Result<()> {
    let mut elements: Vec<Value> = flat_rules(index)
        .iter()
        .map(serde_json::to_value)
        .collect::<Result<_, _>>()
        .context("Failed to encode rule records")?;
    elements.push(json!({ "words": index.words }));

    serde_json::to_writer(writer, &elements).context("Failed to encode flat rule export")?;
    Ok(())
}
