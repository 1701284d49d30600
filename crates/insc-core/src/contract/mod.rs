//! Contract-facing domain: identity, capabilities, records and fees.

pub mod capability;
pub mod fee;
pub mod identity;
pub mod meta;

pub use capability::{resolve_capabilities, Capabilities, ProtocolVersion};
pub use fee::{FeeEstimate, FeeSchedule};
pub use identity::{ContractIdentity, InvalidContractId, Network};
pub use meta::{InscriptionMeta, UploadState};
