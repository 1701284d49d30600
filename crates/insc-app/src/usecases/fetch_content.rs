use std::sync::Arc;

use insc_core::chunk::{chunk_count, content_hash, MAX_BATCH_SIZE};
use insc_core::ports::{CacheKey, ContentCachePort};
use insc_core::AssemblyError;
use tracing::{debug, info_span, warn, Instrument};

use crate::client::ContractClient;
use crate::error::ClientError;

/// Reassembles inscription content from on-chain chunks.
///
/// Chunk 0 is always read on its own. The rest are read in batches of up
/// to [`MAX_BATCH_SIZE`] when the contract supports it, falling back to
/// per-index reads for the remainder of the fetch as soon as one batch call
/// fails. Reads are sequential; concurrency is bounded by the gateway.
pub struct ContentFetcher {
    cache: Option<Arc<dyn ContentCachePort>>,
}

impl ContentFetcher {
    pub fn new(cache: Option<Arc<dyn ContentCachePort>>) -> Self {
        Self { cache }
    }

    pub async fn fetch_content(
        &self,
        client: &ContractClient,
        token_id: u128,
        total_size: u64,
        mime_type: &str,
    ) -> Result<Vec<u8>, ClientError> {
        self.fetch_verified(client, token_id, total_size, mime_type, None)
            .await
    }

    /// Like [`fetch_content`](Self::fetch_content), but when `final_hash` is
    /// given the assembled bytes must hash to it before they are cached or
    /// returned. A cached copy that fails the check is refetched.
    pub async fn fetch_verified(
        &self,
        client: &ContractClient,
        token_id: u128,
        total_size: u64,
        mime_type: &str,
        final_hash: Option<&[u8; 32]>,
    ) -> Result<Vec<u8>, ClientError> {
        let contract_id = client.contract_id();
        let span = info_span!(
            "app.fetch_content",
            contract = %contract_id,
            token_id = %token_id,
            total_size,
            mime_type = %mime_type,
        );
        async move {
            let key = CacheKey::data(contract_id, token_id);
            if let Some(bytes) = self.cache_get(&key).await {
                match final_hash {
                    Some(expected) if content_hash(&bytes) != *expected => {
                        warn!(key = %key, "Cached content fails the final hash; refetching");
                    }
                    _ => {
                        debug!(bytes = bytes.len(), "Content cache hit");
                        return Ok(bytes);
                    }
                }
            }

            let total_chunks = chunk_count(total_size);
            if total_chunks == 0 {
                return Ok(Vec::new());
            }

            // Sized from what the node returns, never from `total_size`.
            let mut content = client
                .get_chunk(token_id, 0)
                .await?
                .ok_or(AssemblyError::MissingChunk { token_id, index: 0 })?;

            let mut next = 1u64;
            if total_chunks > 1 && client.capabilities().supports_chunk_batch_read {
                next = self
                    .read_batches(client, token_id, total_chunks, &mut content)
                    .await?;
            }
            for index in next..total_chunks {
                let chunk = client
                    .get_chunk(token_id, index)
                    .await?
                    .ok_or(AssemblyError::MissingChunk { token_id, index })?;
                content.extend_from_slice(&chunk);
            }

            let actual = content.len() as u64;
            if actual != total_size {
                return Err(AssemblyError::LengthMismatch {
                    token_id,
                    expected: total_size,
                    actual,
                }
                .into());
            }

            if let Some(expected) = final_hash {
                let actual = content_hash(&content);
                if actual != *expected {
                    return Err(AssemblyError::HashMismatch {
                        token_id,
                        expected: hex::encode(expected),
                        actual: hex::encode(actual),
                    }
                    .into());
                }
            }

            self.cache_set(&key, &content).await;
            Ok(content)
        }
        .instrument(span)
        .await
    }

    /// Reads indices `1..total_chunks` in batch groups, appending to
    /// `content`. Returns the first index not read when the batch strategy
    /// was abandoned, or `total_chunks` when every group succeeded.
    async fn read_batches(
        &self,
        client: &ContractClient,
        token_id: u128,
        total_chunks: u64,
        content: &mut Vec<u8>,
    ) -> Result<u64, ClientError> {
        let mut next = 1u64;
        while next < total_chunks {
            let end = total_chunks.min(next.saturating_add(MAX_BATCH_SIZE as u64));
            let group: Vec<u64> = (next..end).collect();
            let chunks = match client.get_chunk_batch(token_id, &group).await {
                Ok(chunks) if chunks.len() == group.len() => chunks,
                Ok(chunks) => {
                    warn!(
                        requested = group.len(),
                        returned = chunks.len(),
                        "Batch read returned a short result; falling back to single reads"
                    );
                    return Ok(next);
                }
                Err(err) => {
                    warn!(error = %err, "Batch read failed; falling back to single reads");
                    return Ok(next);
                }
            };
            for (index, chunk) in group.iter().zip(chunks) {
                let chunk = chunk.ok_or(AssemblyError::MissingChunk {
                    token_id,
                    index: *index,
                })?;
                content.extend_from_slice(&chunk);
            }
            next = end;
        }
        Ok(next)
    }

    async fn cache_get(&self, key: &CacheKey) -> Option<Vec<u8>> {
        let cache = self.cache.as_ref()?;
        match cache.get(key).await {
            Ok(hit) => hit,
            Err(err) => {
                debug!(key = %key, error = %err, "Cache read failed; treating as miss");
                None
            }
        }
    }

    async fn cache_set(&self, key: &CacheKey, bytes: &[u8]) {
        if let Some(cache) = self.cache.as_ref() {
            if let Err(err) = cache.set(key, bytes).await {
                debug!(key = %key, error = %err, "Cache write failed");
            }
        }
    }
}
