use thiserror::Error;

use insc_core::value::wire::WireError;
use insc_core::{AssemblyError, CallError, ContractCallError, DecodeError, ResponseError};

/// Terminal outcome of a gateway call that did not succeed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GatewayError {
    /// Not retryable; the first failure is returned unchanged.
    #[error("permanent failure: {source}")]
    Permanent { source: CallError },

    #[error("call failed after {attempts} attempts: {source}")]
    Exhausted { attempts: u32, source: CallError },

    #[error("call cancelled")]
    Cancelled,

    #[error("gateway is shut down")]
    Closed,
}

impl GatewayError {
    /// Last remote failure, if one was observed.
    pub fn call_error(&self) -> Option<&CallError> {
        match self {
            GatewayError::Permanent { source } | GatewayError::Exhausted { source, .. } => {
                Some(source)
            }
            GatewayError::Cancelled | GatewayError::Closed => None,
        }
    }
}

/// Error surfaced by the contract client, the content fetcher and the use cases.
///
/// The most specific underlying error is kept as-is.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientError {
    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error(transparent)]
    Contract(#[from] ContractCallError),

    #[error(transparent)]
    Gateway(#[from] GatewayError),

    #[error(transparent)]
    Assembly(#[from] AssemblyError),

    #[error("failed to encode call arguments: {0}")]
    Wire(#[from] WireError),

    #[error("inscription {token_id} not found")]
    NotFound { token_id: u128 },

    #[error("local content does not match upload state: {field} is {actual}, chain has {expected}")]
    UploadMismatch {
        field: &'static str,
        expected: String,
        actual: String,
    },
}

impl From<ResponseError> for ClientError {
    fn from(err: ResponseError) -> Self {
        match err {
            ResponseError::Decode(e) => ClientError::Decode(e),
            ResponseError::Contract(e) => ClientError::Contract(e),
        }
    }
}
