use std::collections::HashMap;
use std::sync::Mutex;

use insc_core::contract::resolve_capabilities;
use insc_core::{Capabilities, ContractIdentity};

/// Memoizes capability resolution per contract identity for the life of the
/// owning service object.
#[derive(Debug, Default)]
pub struct CapabilityResolver {
    resolved: Mutex<HashMap<ContractIdentity, Capabilities>>,
}

impl CapabilityResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn resolve(&self, identity: &ContractIdentity) -> Capabilities {
        let mut resolved = match self.resolved.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        *resolved
            .entry(identity.clone())
            .or_insert_with(|| resolve_capabilities(identity))
    }

    pub fn len(&self) -> usize {
        self.resolved.lock().map(|m| m.len()).unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
