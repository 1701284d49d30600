//! # insc-core
//!
//! Core domain models and pure protocol logic for the inscription client.
//!
//! This crate has no I/O. It contains:
//! - the structured value model, its wire codec and the typed decoder
//! - the chunk/hash engine that mirrors on-chain verification
//! - contract identity, capability rules, domain records and fees
//! - the port traits implemented by the infrastructure layer

pub mod chunk;
pub mod config;
pub mod contract;
pub mod decode;
pub mod error;
pub mod ports;
pub mod value;

// Re-export commonly used types at the crate root
pub use chunk::{CHUNK_SIZE, MAX_BATCH_SIZE};
pub use config::ClientConfig;
pub use contract::{
    Capabilities, ContractIdentity, FeeEstimate, FeeSchedule, InscriptionMeta, Network,
    UploadState,
};
pub use error::{
    AssemblyError, CallError, ChunkError, ContractCallError, DecodeError, ErrorClass,
    ResponseError,
};
pub use value::{StructuredValue, ValueTag};
