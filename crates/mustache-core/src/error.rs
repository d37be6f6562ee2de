/*
 * error.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Error types for template parsing.

use thiserror::Error;

/// A template parse failure.
///
/// Parsing aborts on the first failure; no partial AST is produced.
/// `line` and `column` are 1-based positions in the source text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{source_name}:{line}:{column}: {message}")]
pub struct ParseError {
    /// Name the source was parsed under (carried through for messages,
    /// never interpreted).
    pub source_name: String,
    /// 1-based line of the offending tag or character.
    pub line: usize,
    /// 1-based column of the offending tag or character.
    pub column: usize,
    /// Human-readable description of the failure.
    pub message: String,
}

/// Result type for parsing operations.
pub type ParseResult<T> = Result<T, ParseError>;
