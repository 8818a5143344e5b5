//! FILENAME: validator/src/config.rs
//! PURPOSE: Tunable limits for the formula validator.
//! CONTEXT: Embedding applications usually load this from their own JSON
//! settings; every field falls back to its default when omitted.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidatorConfig {
    /// Maximum formula length in characters, after trimming.
    pub max_length: usize,
    /// Identifiers longer than this (in characters) produce a warning.
    pub max_identifier_length: usize,
    /// More opening parentheses than this produce a complexity warning.
    pub complexity_paren_threshold: usize,
    /// Deepest parenthesis nesting accepted. Parsing is recursive, so this
    /// bounds stack use before the syntax stage runs.
    pub max_depth: usize,
    /// Reject Cyrillic words that are not keywords (ЕСЛИ, ТОГДА, ...).
    pub cyrillic_keywords_only: bool,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        ValidatorConfig {
            max_length: 1000,
            max_identifier_length: 20,
            complexity_paren_threshold: 5,
            max_depth: 64,
            cyrillic_keywords_only: false,
        }
    }
}
