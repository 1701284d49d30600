use serde::Serialize;

use insc_core::value::wire::{self, WireError};
use insc_core::{ContractIdentity, StructuredValue};

/// A state-changing contract call, encoded but not signed or submitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallDescriptor {
    pub contract_address: String,
    pub contract_name: String,
    pub function_name: String,
    pub args: Vec<StructuredValue>,
}

/// Serializable form with wire-encoded (`0x` hex) arguments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EncodedCall {
    pub contract_id: String,
    pub function_name: String,
    pub args: Vec<String>,
}

impl CallDescriptor {
    pub(crate) fn new(
        identity: &ContractIdentity,
        function_name: &str,
        args: Vec<StructuredValue>,
    ) -> Self {
        Self {
            contract_address: identity.address.clone(),
            contract_name: identity.contract_name.clone(),
            function_name: function_name.to_string(),
            args,
        }
    }

    pub fn contract_id(&self) -> String {
        format!("{}.{}", self.contract_address, self.contract_name)
    }

    pub fn encode(&self) -> Result<EncodedCall, WireError> {
        Ok(EncodedCall {
            contract_id: self.contract_id(),
            function_name: self.function_name.clone(),
            args: self
                .args
                .iter()
                .map(wire::to_hex)
                .collect::<Result<Vec<_>, _>>()?,
        })
    }
}
