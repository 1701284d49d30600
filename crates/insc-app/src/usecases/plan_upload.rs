//! Upload planning: content → ordered call descriptors.
//!
//! Nothing here signs or submits. A plan can be produced from scratch or
//! resumed against an on-chain [`UploadState`], in which case only the batches
//! the chain has not seen yet are emitted.

use insc_core::chunk::{batch, chunk, compute_running_hash, CHUNK_SIZE, MAX_BATCH_SIZE};
use insc_core::{FeeEstimate, FeeSchedule, UploadState};
use serde::Serialize;
use tracing::debug;

use crate::client::{CallDescriptor, ContractClient};
use crate::error::ClientError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadPlan {
    pub mime_type: String,
    pub total_size: u64,
    pub chunks: Vec<Vec<u8>>,
    pub final_hash: [u8; 32],
    pub dependencies: Vec<u128>,
}

/// Serializable summary of a plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UploadSummary {
    pub mime_type: String,
    pub total_size: u64,
    pub total_chunks: u64,
    pub batch_count: u64,
    pub final_hash: String,
    pub dependencies: Vec<u128>,
}

impl UploadPlan {
    pub fn total_chunks(&self) -> u64 {
        self.chunks.len() as u64
    }

    pub fn batches(&self) -> Vec<Vec<Vec<u8>>> {
        batch(&self.chunks, MAX_BATCH_SIZE).unwrap_or_default()
    }

    pub fn fee_estimate(&self, schedule: &FeeSchedule) -> FeeEstimate {
        schedule.estimate(self.total_chunks())
    }

    pub fn summary(&self) -> UploadSummary {
        UploadSummary {
            mime_type: self.mime_type.clone(),
            total_size: self.total_size,
            total_chunks: self.total_chunks(),
            batch_count: self.total_chunks().div_ceil(MAX_BATCH_SIZE as u64),
            final_hash: hex::encode(self.final_hash),
            dependencies: self.dependencies.clone(),
        }
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct UploadPlanner;

impl UploadPlanner {
    pub fn new() -> Self {
        Self
    }

    pub fn plan(&self, content: &[u8], mime_type: &str, dependencies: Vec<u128>) -> UploadPlan {
        let chunks = chunk(content, CHUNK_SIZE).unwrap_or_default();
        let final_hash = compute_running_hash(&chunks);
        UploadPlan {
            mime_type: mime_type.to_string(),
            total_size: content.len() as u64,
            chunks,
            final_hash,
            dependencies,
        }
    }

    /// Full call sequence: begin, every batch, then seal.
    pub fn descriptors(
        &self,
        client: &ContractClient,
        plan: &UploadPlan,
        token_uri: &str,
    ) -> Vec<CallDescriptor> {
        let mut calls = vec![client.begin_inscription(
            &plan.final_hash,
            &plan.mime_type,
            plan.total_size,
            plan.total_chunks(),
        )];
        calls.extend(self.batch_calls(client, plan, 0));
        calls.push(self.seal_call(client, plan, token_uri));
        calls
    }

    /// Remaining calls for an upload the chain already knows about.
    ///
    /// Fails with [`ClientError::UploadMismatch`] if `state` does not describe
    /// this content.
    pub fn resume(
        &self,
        client: &ContractClient,
        plan: &UploadPlan,
        state: &UploadState,
        token_uri: &str,
    ) -> Result<Vec<CallDescriptor>, ClientError> {
        check("mime type", &state.mime_type, &plan.mime_type)?;
        check("total size", &state.total_size, &plan.total_size)?;
        check("total chunks", &state.total_chunks, &plan.total_chunks())?;
        if state.current_index > plan.total_chunks() {
            return Err(mismatch(
                "current index",
                state.current_index,
                plan.total_chunks(),
            ));
        }

        let uploaded = state.current_index as usize;
        let local_hash = compute_running_hash(&plan.chunks[..uploaded]);
        if local_hash != state.running_hash {
            return Err(mismatch(
                "running hash",
                hex::encode(state.running_hash),
                hex::encode(local_hash),
            ));
        }

        debug!(
            uploaded,
            remaining = plan.chunks.len() - uploaded,
            "Resuming upload"
        );
        let mut calls = self.batch_calls(client, plan, uploaded);
        calls.push(self.seal_call(client, plan, token_uri));
        Ok(calls)
    }

    fn batch_calls(
        &self,
        client: &ContractClient,
        plan: &UploadPlan,
        from: usize,
    ) -> Vec<CallDescriptor> {
        plan.chunks[from..]
            .chunks(MAX_BATCH_SIZE)
            .map(|group| client.add_chunk_batch(&plan.final_hash, group))
            .collect()
    }

    fn seal_call(
        &self,
        client: &ContractClient,
        plan: &UploadPlan,
        token_uri: &str,
    ) -> CallDescriptor {
        if plan.dependencies.is_empty() {
            client.seal_inscription(&plan.final_hash, token_uri)
        } else {
            client.seal_recursive(&plan.final_hash, token_uri, &plan.dependencies)
        }
    }
}

fn check<T: PartialEq + ToString>(
    field: &'static str,
    chain: &T,
    local: &T,
) -> Result<(), ClientError> {
    if chain == local {
        Ok(())
    } else {
        Err(mismatch(field, chain.to_string(), local.to_string()))
    }
}

fn mismatch(field: &'static str, expected: impl ToString, actual: impl ToString) -> ClientError {
    ClientError::UploadMismatch {
        field,
        expected: expected.to_string(),
        actual: actual.to_string(),
    }
}
