//! Error taxonomy shared by every layer.
//!
//! Decode, contract and assembly errors affect correctness and are never
//! swallowed. `CallError` is the only transient kind; the gateway decides
//! whether to retry it from its message.

use thiserror::Error;

use crate::value::ValueTag;

/// Structural mismatch between the expected and the actual structured value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("{context}: expected {expected}, got {actual}")]
    UnexpectedTag {
        context: String,
        expected: &'static str,
        actual: ValueTag,
    },

    #[error("{context}: missing tuple field `{field}`")]
    MissingField { context: String, field: String },

    #[error("{context}: value {value} does not fit in {target}")]
    OutOfRange {
        context: String,
        value: String,
        target: &'static str,
    },

    #[error("{context}: expected {expected} bytes, got {actual}")]
    InvalidLength {
        context: String,
        expected: usize,
        actual: usize,
    },
}

/// Fixed code → name table for contract error responses.
///
/// Add rows here when the contract grows new codes.
pub const ERROR_CODES: &[(u128, &str)] = &[
    (100, "NOT_AUTHORIZED"),
    (101, "NOT_FOUND"),
    (102, "INVALID_BATCH"),
    (103, "HASH_MISMATCH"),
    (104, "ALREADY_SEALED"),
    (105, "METADATA_FROZEN"),
    (106, "WRONG_INDEX"),
    (107, "INVALID_URI"),
    (109, "PAUSED"),
    (110, "INVALID_FEE"),
    (111, "DEPENDENCY_MISSING"),
];

pub fn error_name(code: u128) -> Option<&'static str> {
    ERROR_CODES
        .iter()
        .find(|(known, _)| *known == code)
        .map(|(_, name)| *name)
}

/// A well-formed `err` response carrying a numeric code.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error(
    "contract returned error code {code}{}",
    .error_name.map(|n| format!(" ({n})")).unwrap_or_default()
)]
pub struct ContractCallError {
    pub code: u128,
    pub error_name: Option<&'static str>,
}

impl ContractCallError {
    pub fn from_code(code: u128) -> Self {
        Self {
            code,
            error_name: error_name(code),
        }
    }
}

/// Either a decode failure or a contract error surfaced while unwrapping a response.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResponseError {
    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error(transparent)]
    Contract(#[from] ContractCallError),
}

/// How the gateway treats a failed remote call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    RateLimited,
    Permanent,
    Transient,
}

/// Failure of one remote call attempt.
///
/// The remote error format is not under our control, so classification
/// inspects the message text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct CallError {
    message: String,
}

impl CallError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn classify(&self) -> ErrorClass {
        let lowered = self.message.to_ascii_lowercase();
        if lowered.contains("429")
            || lowered.contains("too many requests")
            || lowered.contains("rate limit")
        {
            ErrorClass::RateLimited
        } else if lowered.contains("no such contract") || lowered.contains("nosuchcontract") {
            ErrorClass::Permanent
        } else {
            ErrorClass::Transient
        }
    }
}

/// Invalid parameters to the chunk engine. Programmer error, never retried.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChunkError {
    #[error("chunk size must be greater than zero")]
    InvalidChunkSize,

    #[error("batch size must be greater than zero")]
    InvalidBatchSize,
}

/// Content reconstruction failed; partial content is never returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AssemblyError {
    #[error("chunk {index} of token {token_id} is missing on chain")]
    MissingChunk { token_id: u128, index: u64 },

    #[error("assembled {actual} bytes for token {token_id}, expected {expected}")]
    LengthMismatch {
        token_id: u128,
        expected: u64,
        actual: u64,
    },

    #[error("content hash mismatch for token {token_id}: expected {expected}, got {actual}")]
    HashMismatch {
        token_id: u128,
        expected: String,
        actual: String,
    },
}
