//! Error types for network construction and inference.

use std::path::PathBuf;

use thiserror::Error;

use crate::node::CptKey;

/// Errors that can occur while building or querying a network.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum NetError {
    /// An edge or a `Parents:` declaration names a variable with no CPT block.
    #[error("Unknown node '{name}' referenced by {referenced_by}")]
    UnknownNode { name: String, referenced_by: String },

    /// A query or lookup names a variable that is not in the network.
    #[error("Variable '{name}' not found in the network")]
    VariableNotFound { name: String },

    /// Evidence lacks a value for one of the node's parents.
    #[error("Missing evidence for parent '{parent}' of node '{node}'")]
    MissingEvidence { parent: String, node: String },

    /// The requested (signature, value) pair is not in the node's table.
    #[error(
        "CPT entry not found for node '{node}' with key {key} ({} known keys; nearest: {})",
        .known.len(),
        list_keys(.nearest)
    )]
    CptKeyNotFound {
        node: String,
        key: CptKey,
        known: Vec<CptKey>,
        nearest: Vec<CptKey>,
    },

    /// A CPT row with fewer than two tokens.
    #[error("Line {line}: malformed CPT row '{row}' (expected '[Parent=value ...] value probability')")]
    MalformedRow { line: usize, row: String },

    /// A CPT block that is missing its name or domain.
    #[error("Line {line}: malformed CPT block: {reason}")]
    MalformedBlock { line: usize, reason: String },

    /// An edge line that is not exactly `Parent Child`.
    #[error("Line {line}: malformed edge '{text}' (expected 'Parent Child')")]
    MalformedEdge { line: usize, text: String },

    /// A probability that does not parse or lies outside [0, 1].
    #[error("Line {line}: invalid probability '{text}' (expected a number in [0, 1])")]
    InvalidProbability { line: usize, text: String },

    /// The parent/child relation contains a cycle.
    #[error("Network is not acyclic: cycle through node '{node}'")]
    Cycle { node: String },

    /// An evidence item is not of the form `Key=Value`.
    #[error("Invalid evidence '{item}' (expected Key=Value)")]
    InvalidEvidence { item: String },

    /// A CPT row set does not sum to one.
    #[error("CPT of '{node}' is not normalized for '{signature}': sum = {sum} (expected 1.0)")]
    NotNormalized {
        node: String,
        signature: String,
        sum: f64,
    },

    /// The network is deeper than the engine is allowed to recurse.
    #[error("Enumeration depth {variables} exceeds the configured limit of {max_depth}")]
    DepthLimitExceeded { variables: usize, max_depth: usize },

    /// An input file could not be read.
    #[error("Cannot read {}: {message}", .path.display())]
    Io { path: PathBuf, message: String },
}

fn list_keys(keys: &[CptKey]) -> String {
    if keys.is_empty() {
        return "none".to_string();
    }
    keys.iter()
        .map(|k| k.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
