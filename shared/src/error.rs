//! Error type for contract violations at the core boundary
//!
//! Missing data is never an error here: queries return `None`, empty vectors,
//! or zero-filled series. Only malformed input shapes end up in `CoreError`.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Unknown role: {0} (expected Supplier or Buyer)")]
    UnknownRole(String),

    #[error("Unknown record field: {0}")]
    UnknownField(String),

    #[error("Invalid match criteria: {0}")]
    InvalidCriteria(&'static str),

    #[error("Invalid payload: {0}")]
    InvalidPayload(#[from] serde_json::Error),
}

/// Result type alias for core operations
pub type CoreResult<T> = Result<T, CoreError>;
