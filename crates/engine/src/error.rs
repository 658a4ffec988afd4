//! Engine error types.

use oxigraph::sparql::EvaluationError;
use oxigraph::store::{LoaderError, StorageError};

/// Error type for query backend operations.
///
/// This allows proper error propagation using `?` for both fatal setup
/// failures (a local document that will not parse) and per-statement
/// failures (a rejected query, a network fault, an unrenderable value).
#[derive(Debug)]
pub enum EngineError {
    /// The local document could not be loaded into a graph
    Parse(String),
    /// The backend rejected the statement
    Query(String),
    /// The remote service call failed (remote backend only)
    Network(String),
    /// A result value had a shape the client cannot decode
    Decode(String),
}

impl std::fmt::Display for EngineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EngineError::Parse(s) => write!(f, "parse error: {}", s),
            EngineError::Query(s) => write!(f, "query error: {}", s),
            EngineError::Network(s) => write!(f, "network error: {}", s),
            EngineError::Decode(s) => write!(f, "decode error: {}", s),
        }
    }
}

impl std::error::Error for EngineError {}

impl From<EvaluationError> for EngineError {
    fn from(e: EvaluationError) -> Self {
        EngineError::Query(e.to_string())
    }
}

impl From<StorageError> for EngineError {
    fn from(e: StorageError) -> Self {
        EngineError::Parse(e.to_string())
    }
}

impl From<LoaderError> for EngineError {
    fn from(e: LoaderError) -> Self {
        EngineError::Parse(e.to_string())
    }
}

impl From<ureq::Error> for EngineError {
    fn from(e: ureq::Error) -> Self {
        EngineError::Network(e.to_string())
    }
}

impl From<serde_json::Error> for EngineError {
    fn from(e: serde_json::Error) -> Self {
        EngineError::Decode(e.to_string())
    }
}
