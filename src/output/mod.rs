//! Output encoders: interchangeable sinks for the compiled index.
//!
//! - [`json`] - nested JSON document and flat record export
//! - [`graph`] - graph-mutation statement stream

pub mod graph;
pub mod json;

pub use graph::write_graph_statements;
pub use json::{write_flat_rules, write_json_index};
