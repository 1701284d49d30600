//! Use cases built on top of the contract client.
//!
//! ContentFetcher       → chunk reads (batched or per index) + cache
//!         ↓
//! LoadInscriptionUseCase → metadata + content + final-hash check
//!
//! UploadPlanner        → call descriptors for a new or resumed upload

mod fetch_content;
mod load_inscription;
mod plan_upload;

pub use fetch_content::ContentFetcher;
pub use load_inscription::{LoadInscriptionUseCase, LoadedInscription};
pub use plan_upload::{UploadPlan, UploadPlanner, UploadSummary};
