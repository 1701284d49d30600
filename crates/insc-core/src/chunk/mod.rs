//! Chunk/hash engine.
//!
//! The running hash must match the contract's on-chain verification bit for
//! bit: H0 = 32 zero bytes, Hi = SHA-256(Hi-1 ‖ chunk_i).

use sha2::{Digest, Sha256};

use crate::error::ChunkError;

/// Maximum bytes per on-chain chunk.
pub const CHUNK_SIZE: usize = 16_384;

/// Maximum chunks per batch call.
pub const MAX_BATCH_SIZE: usize = 50;

/// Number of chunks needed for `total_size` bytes.
pub fn chunk_count(total_size: u64) -> u64 {
    total_size.div_ceil(CHUNK_SIZE as u64)
}

/// Split `data` left to right into slices of `chunk_size`; the last may be shorter.
pub fn chunk(data: &[u8], chunk_size: usize) -> Result<Vec<Vec<u8>>, ChunkError> {
    if chunk_size == 0 {
        return Err(ChunkError::InvalidChunkSize);
    }
    Ok(data.chunks(chunk_size).map(<[u8]>::to_vec).collect())
}

/// Group items in order; every group but the last holds exactly `batch_size`.
pub fn batch<T: Clone>(items: &[T], batch_size: usize) -> Result<Vec<Vec<T>>, ChunkError> {
    if batch_size == 0 {
        return Err(ChunkError::InvalidBatchSize);
    }
    Ok(items.chunks(batch_size).map(<[T]>::to_vec).collect())
}

pub fn join<C: AsRef<[u8]>>(chunks: &[C]) -> Vec<u8> {
    let total = chunks.iter().map(|c| c.as_ref().len()).sum();
    let mut out = Vec::with_capacity(total);
    for chunk in chunks {
        out.extend_from_slice(chunk.as_ref());
    }
    out
}

/// Incremental form of the running hash, fed one chunk at a time.
#[derive(Debug, Clone)]
pub struct RunningHasher {
    state: [u8; 32],
    chunks: u64,
}

impl RunningHasher {
    pub fn new() -> Self {
        Self::resume([0u8; 32], 0)
    }

    /// Continue from a hash already recorded on chain after `chunks` chunks.
    pub fn resume(state: [u8; 32], chunks: u64) -> Self {
        Self { state, chunks }
    }

    pub fn update(&mut self, chunk: &[u8]) {
        let mut hasher = Sha256::new();
        hasher.update(self.state);
        hasher.update(chunk);
        self.state = hasher.finalize().into();
        self.chunks += 1;
    }

    pub fn chunks(&self) -> u64 {
        self.chunks
    }

    pub fn digest(&self) -> [u8; 32] {
        self.state
    }
}

impl Default for RunningHasher {
    fn default() -> Self {
        Self::new()
    }
}

pub fn compute_running_hash<C: AsRef<[u8]>>(chunks: &[C]) -> [u8; 32] {
    let mut hasher = RunningHasher::new();
    for chunk in chunks {
        hasher.update(chunk.as_ref());
    }
    hasher.digest()
}

/// Running hash of `data` after splitting it with the default chunk size.
pub fn content_hash(data: &[u8]) -> [u8; 32] {
    let mut hasher = RunningHasher::new();
    for chunk in data.chunks(CHUNK_SIZE) {
        hasher.update(chunk);
    }
    hasher.digest()
}

pub fn verify_content(data: &[u8], expected: &[u8; 32]) -> bool {
    content_hash(data) == *expected
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(len: usize) -> Vec<u8> {
        (0..len).map(|i| (i % 251) as u8).collect()
    }

    #[test]
    fn chunks_reference_payload_into_expected_sizes() {
        let data = sample(34_778);
        let chunks = chunk(&data, CHUNK_SIZE).unwrap();
        let sizes: Vec<_> = chunks.iter().map(Vec::len).collect();
        assert_eq!(sizes, vec![16_384, 16_384, 2_010]);
        assert_eq!(join(&chunks), data);
    }

    #[test]
    fn empty_input_has_no_chunks() {
        assert!(chunk(&[], CHUNK_SIZE).unwrap().is_empty());
        assert_eq!(chunk_count(0), 0);
    }

    #[test]
    fn chunk_count_matches_chunking() {
        for len in [1usize, 16_383, 16_384, 16_385, 50 * 16_384 + 7] {
            let data = sample(len);
            assert_eq!(
                chunk(&data, CHUNK_SIZE).unwrap().len() as u64,
                chunk_count(len as u64)
            );
            assert_eq!(join(&chunk(&data, CHUNK_SIZE).unwrap()), data);
        }
    }

    #[test]
    fn zero_sizes_are_rejected() {
        assert_eq!(chunk(b"abc", 0), Err(ChunkError::InvalidChunkSize));
        assert_eq!(batch(&[1, 2, 3], 0), Err(ChunkError::InvalidBatchSize));
    }

    #[test]
    fn batches_preserve_order_and_count() {
        let items: Vec<u32> = (0..120).collect();
        let groups = batch(&items, MAX_BATCH_SIZE).unwrap();
        let sizes: Vec<_> = groups.iter().map(Vec::len).collect();
        assert_eq!(sizes, vec![50, 50, 20]);
        assert_eq!(groups.concat(), items);
    }

    #[test]
    fn empty_running_hash_is_the_zero_seed() {
        let empty: [&[u8]; 0] = [];
        assert_eq!(compute_running_hash(&empty), [0u8; 32]);
    }

    #[test]
    fn running_hash_matches_reference_vectors() {
        assert_eq!(
            hex::encode(compute_running_hash(&[b"abc"])),
            "365aa7d8f7f9402c4b9434502b4cc89ddb09fe50d7cd95b493b834c62d5a5370"
        );
        assert_eq!(
            hex::encode(compute_running_hash(&[b"a", b"b"])),
            "abccbe9b24d2bbd3aa1360d605147a841dd051130131c6929d6004e1ae4796e8"
        );
    }

    #[test]
    fn running_hash_is_order_sensitive_and_deterministic() {
        let forward = compute_running_hash(&[b"a", b"b"]);
        let reversed = compute_running_hash(&[b"b", b"a"]);
        assert_ne!(forward, reversed);
        assert_eq!(forward, compute_running_hash(&[b"a", b"b"]));
    }

    #[test]
    fn resumed_hasher_matches_full_computation() {
        let chunks = chunk(&sample(40_000), CHUNK_SIZE).unwrap();
        let prefix = compute_running_hash(&chunks[..1]);

        let mut resumed = RunningHasher::resume(prefix, 1);
        for c in &chunks[1..] {
            resumed.update(c);
        }
        assert_eq!(resumed.chunks(), 3);
        assert_eq!(resumed.digest(), compute_running_hash(&chunks));
    }

    #[test]
    fn verify_content_uses_default_chunking() {
        let data = sample(20_000);
        let expected = compute_running_hash(&chunk(&data, CHUNK_SIZE).unwrap());
        assert!(verify_content(&data, &expected));
        assert!(!verify_content(&data[..19_999], &expected));
    }
}
