//! Capability rules per contract protocol version.
//!
//! Resolution is a pure function of the identity. Identities that match no
//! rule get [`Capabilities::CONSERVATIVE`]: per-item reads and the creator
//! argument, which is slow but valid against every deployed version.

use serde::Serialize;

use super::identity::ContractIdentity;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Capabilities {
    pub supports_chunk_batch_read: bool,
    pub pending_chunk_requires_creator: bool,
}

impl Capabilities {
    pub const CONSERVATIVE: Capabilities = Capabilities {
        supports_chunk_batch_read: false,
        pending_chunk_requires_creator: true,
    };
}

impl Default for Capabilities {
    fn default() -> Self {
        Self::CONSERVATIVE
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ProtocolVersion {
    V1_0,
    V1_1,
    V2_0,
}

impl ProtocolVersion {
    pub fn capabilities(&self) -> Capabilities {
        match self {
            ProtocolVersion::V1_0 => Capabilities::CONSERVATIVE,
            ProtocolVersion::V1_1 => Capabilities {
                supports_chunk_batch_read: true,
                pending_chunk_requires_creator: true,
            },
            ProtocolVersion::V2_0 => Capabilities {
                supports_chunk_batch_read: true,
                pending_chunk_requires_creator: false,
            },
        }
    }

    fn from_parts(major: u32, minor: u32) -> Option<Self> {
        match (major, minor) {
            (1, 0) => Some(ProtocolVersion::V1_0),
            (1, 1) => Some(ProtocolVersion::V1_1),
            (2, 0) => Some(ProtocolVersion::V2_0),
            _ => None,
        }
    }
}

/// Parse "1.1", "v1.1", "1.1.0", "1-1" or a bare major ("2" means 2.0).
pub fn parse_protocol_version(raw: &str) -> Option<ProtocolVersion> {
    let trimmed = raw.trim();
    let trimmed = trimmed
        .strip_prefix('v')
        .or_else(|| trimmed.strip_prefix('V'))
        .unwrap_or(trimmed);
    if trimmed.is_empty() {
        return None;
    }
    let mut parts = trimmed.split(['.', '-']);
    let major = parts.next()?.parse::<u32>().ok()?;
    let minor = match parts.next() {
        Some(minor) => minor.parse::<u32>().ok()?,
        None => 0,
    };
    // Patch components do not change call shapes.
    for patch in parts {
        patch.parse::<u32>().ok()?;
    }
    ProtocolVersion::from_parts(major, minor)
}

/// Look for a `-v<major>[-<minor>]` suffix in the contract name.
pub fn version_from_contract_name(name: &str) -> Option<ProtocolVersion> {
    let lowered = name.to_ascii_lowercase();
    let (_, suffix) = lowered.rsplit_once("-v")?;
    parse_protocol_version(suffix)
}

pub fn resolve_capabilities(identity: &ContractIdentity) -> Capabilities {
    let version = parse_protocol_version(&identity.protocol_version)
        .or_else(|| version_from_contract_name(&identity.contract_name));
    match version {
        Some(version) => version.capabilities(),
        None => {
            #[cfg(feature = "tracing")]
            tracing::warn!(
                contract = %identity,
                protocol_version = %identity.protocol_version,
                "Unrecognized contract version; using conservative capabilities"
            );
            Capabilities::CONSERVATIVE
        }
    }
}
