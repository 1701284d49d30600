//! Inscription client application layer.
//!
//! This crate owns the shared read-only call gateway and everything built on
//! it: the contract client, the content fetcher and the upload planner.

pub mod capability;
pub mod client;
pub mod deps;
pub mod error;
pub mod gateway;
pub mod services;
pub mod usecases;

#[cfg(test)]
pub(crate) mod test_support;

pub use capability::CapabilityResolver;
pub use client::{CallDescriptor, ContractClient, EncodedCall};
pub use deps::ClientDeps;
pub use error::{ClientError, GatewayError};
pub use gateway::{GatewayPolicy, ReadOnlyGateway, RetryOptions};
pub use services::ClientServices;
pub use usecases::{ContentFetcher, LoadInscriptionUseCase, LoadedInscription, UploadPlanner};
