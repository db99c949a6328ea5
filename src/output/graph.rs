//! Graph-mutation sink.
//!
//! Serializes the compiled index as the upsert stream a graph database
//! ingests: a chain of `n` linked token nodes per pattern, terminating in
//! a shared category node. Records are JSON lines of
//! `{"statement": ..., "parameters": {...}}`; driver and transaction
//! management live outside this crate.

use crate::dictionary::types::DictionaryIndex;
use crate::output::json::flat_rules;
use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::fmt::Write as _;
use std::io::Write;

/// Index-creation statements issued once, before any pattern mutation:
/// start-node key, category-node key, link-edge key.
pub const INDEX_STATEMENTS: [&str; 3] = [
    "CREATE INDEX start_index IF NOT EXISTS FOR (s:Start) ON (s.word);",
    "CREATE INDEX lat_index IF NOT EXISTS FOR (l:Lat) ON (l.lat);",
    "CREATE INDEX next_index IF NOT EXISTS FOR ()-[n:NEXT]->() ON (n.word);",
];

/// Lazily-populated statement table keyed by pattern length.
///
/// Statement text depends only on the token count, never on token
/// content, so each length is rendered once and reused; only the bound
/// parameters vary per pattern.
#[derive(Debug, Default)]
pub struct StatementCache {
    by_length: HashMap<usize, String>,
}

impl StatementCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Statement for a pattern of `length` tokens.
    pub fn statement(&mut self, length: usize) -> &str {
        self.by_length
            .entry(length)
            .or_insert_with(|| render_statement(length))
    }
}

fn render_statement(length: usize) -> String {
    if length == 0 {
        return String::new();
    }
    let mut statement = String::from("MERGE (s0:Start {word: $p0}) ");
    for link in 1..length {
        let _ = write!(
            statement,
            "MERGE (s{})-[:NEXT {{word: $p{}}}]->(s{}) ",
            link - 1,
            link,
            link
        );
    }
    statement.push_str("MERGE (l:Lat {lat: $lat}) ");
    let _ = write!(statement, "MERGE (s{})-[:LAT]->(l);", length - 1);
    statement
}

/// One wire record of the mutation stream.
#[derive(Debug, Serialize)]
struct GraphRecord<'a> {
    statement: &'a str,
    parameters: Map<String, Value>,
}

/// Parameters for one pattern: the category plus one positional binding
/// per token.
fn pattern_parameters(lat: &str, pattern: &[String]) -> Map<String, Value> {
    let mut parameters = Map::new();
    parameters.insert("lat".to_string(), Value::String(lat.to_string()));
    for (position, token) in pattern.iter().enumerate() {
        parameters.insert(format!("p{position}"), Value::String(token.clone()));
    }
    parameters
}

/// Write the full mutation stream for a compiled index: the index
/// prelude, then one record per stored pattern.
pub fn write_graph_statements<W: Write>(mut writer: W, index: &DictionaryIndex) -> Result<()> {
    for statement in INDEX_STATEMENTS {
        emit(&mut writer, &GraphRecord {
            statement,
            parameters: Map::new(),
        })?;
    }

    let mut cache = StatementCache::new();
    for rule in flat_rules(index) {
        let statement = cache.statement(rule.pattern.len());
        let record = GraphRecord {
            statement,
            parameters: pattern_parameters(&rule.lat, &rule.pattern),
        };
        emit(&mut writer, &record)?;
    }

    Ok(())
}

fn emit<W: Write>(writer: &mut W, record: &GraphRecord<'_>) -> Result<()> {
    serde_json::to_writer(&mut *writer, record).context("Failed to encode graph statement")?;
    writeln!(writer).context("Failed to write graph statement")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dictionary::indexer::DictionaryBuilder;
    use crate::dictionary::types::WordsMap;

    #[test]
    fn test_single_token_statement() {
        assert_eq!(
            render_statement(1),
            "MERGE (s0:Start {word: $p0}) MERGE (l:Lat {lat: $lat}) MERGE (s0)-[:LAT]->(l);"
        );
    }

    #[test]
    fn test_chain_statement() {
        assert_eq!(
            render_statement(3),
            "MERGE (s0:Start {word: $p0}) \
             MERGE (s0)-[:NEXT {word: $p1}]->(s1) \
             MERGE (s1)-[:NEXT {word: $p2}]->(s2) \
             MERGE (l:Lat {lat: $lat}) MERGE (s2)-[:LAT]->(l);"
        );
    }

    #[test]
    fn test_cache_returns_same_text() {
        let mut cache = StatementCache::new();
        let first = cache.statement(4).to_string();
        assert_eq!(cache.statement(4), first);
        assert_eq!(cache.by_length.len(), 1);
    }

    #[test]
    fn test_pattern_parameters() {
        let params = pattern_parameters("greeting", &["hello".into(), "world".into()]);
        assert_eq!(params["lat"], "greeting");
        assert_eq!(params["p0"], "hello");
        assert_eq!(params["p1"], "world");
        assert_eq!(params.len(), 3);
    }

    #[test]
    fn test_stream_shape() {
        let mut builder = DictionaryBuilder::new(WordsMap::new());
        builder.add_pattern("greeting", &["hello".into(), "world".into()], 0);
        builder.add_pattern("bang", &["wow".into()], 1);
        let (index, _) = builder.finish();

        let mut buf = Vec::new();
        write_graph_statements(&mut buf, &index).unwrap();

        let lines: Vec<serde_json::Value> = String::from_utf8(buf)
            .unwrap()
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect();
        assert_eq!(lines.len(), 5); // 3 index statements + 2 patterns
        assert_eq!(lines[0]["statement"], INDEX_STATEMENTS[0]);
        assert!(lines[0]["parameters"].as_object().unwrap().is_empty());
        assert_eq!(
            lines[3]["statement"],
            "MERGE (s0:Start {word: $p0}) MERGE (s0)-[:NEXT {word: $p1}]->(s1) \
             MERGE (l:Lat {lat: $lat}) MERGE (s1)-[:LAT]->(l);"
        );
        assert_eq!(lines[3]["parameters"]["p0"], "hello");
        assert_eq!(lines[4]["parameters"]["lat"], "bang");
    }
}
