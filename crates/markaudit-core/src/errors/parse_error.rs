//! Parser errors.

use std::path::PathBuf;

use super::error_code::{self, ErrorCode};

/// Errors that can occur while parsing a single test file.
///
/// None of these abort an audit: the file contributes zero tests and the
/// error text becomes a warning.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("Python grammar unavailable: {message}")]
    GrammarUnavailable { message: String },

    #[error("{path} is unreadable: {message}")]
    Unreadable { path: PathBuf, message: String },

    #[error("syntax error at line {line}, column {column} ({error_count} error node(s))")]
    SyntaxError {
        path: PathBuf,
        line: u32,
        column: u32,
        error_count: u32,
    },

    #[error("tree-sitter produced no tree for {path}")]
    NoTree { path: PathBuf },
}

impl ErrorCode for ParseError {
    fn error_code(&self) -> &'static str {
        error_code::PARSE_ERROR
    }
}
