//! Remote read-only call boundary.

use async_trait::async_trait;
use std::sync::Arc;

use crate::contract::Network;
use crate::error::CallError;
use crate::value::StructuredValue;

/// One side-effect-free query against contract state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadOnlyCall {
    pub contract_address: String,
    pub contract_name: String,
    pub function_name: String,
    pub args: Vec<StructuredValue>,
    pub sender: String,
    pub network: Network,
}

impl ReadOnlyCall {
    pub fn contract_id(&self) -> String {
        format!("{}.{}", self.contract_address, self.contract_name)
    }
}

/// Performs exactly one remote call attempt.
///
/// Failures are reported as a [`CallError`] carrying the remote message
/// verbatim; retry policy lives in the gateway, not in implementations.
#[async_trait]
pub trait ReadOnlyCallPort: Send + Sync {
    async fn call_read_only(&self, call: &ReadOnlyCall) -> Result<StructuredValue, CallError>;
}

#[async_trait]
impl<T: ReadOnlyCallPort + ?Sized> ReadOnlyCallPort for Arc<T> {
    async fn call_read_only(&self, call: &ReadOnlyCall) -> Result<StructuredValue, CallError> {
        (**self).call_read_only(call).await
    }
}
