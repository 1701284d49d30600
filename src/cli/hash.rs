use std::path::{Path, PathBuf};

use anyhow::Context;
use insc_core::chunk::{chunk_count, content_hash};
use insc_core::{CHUNK_SIZE, MAX_BATCH_SIZE};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HashReport {
    pub file: PathBuf,
    pub total_size: u64,
    pub chunk_size: usize,
    pub total_chunks: u64,
    pub batch_count: u64,
    pub running_hash: String,
}

pub async fn run(file: &Path) -> anyhow::Result<HashReport> {
    let content = tokio::fs::read(file)
        .await
        .with_context(|| format!("Failed to read {}", file.display()))?;
    let total_chunks = chunk_count(content.len() as u64);

    Ok(HashReport {
        file: file.to_path_buf(),
        total_size: content.len() as u64,
        chunk_size: CHUNK_SIZE,
        total_chunks,
        batch_count: total_chunks.div_ceil(MAX_BATCH_SIZE as u64),
        running_hash: hex::encode(content_hash(&content)),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[tokio::test]
    async fn reports_chunks_batches_and_hash() {
        let content = vec![9u8; CHUNK_SIZE * 51 + 1];
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(&content).unwrap();

        let report = run(file.path()).await.unwrap();
        assert_eq!(report.total_size, content.len() as u64);
        assert_eq!(report.total_chunks, 52);
        assert_eq!(report.batch_count, 2);
        assert_eq!(report.running_hash, hex::encode(content_hash(&content)));
    }

    #[tokio::test]
    async fn empty_file_has_zero_chunks() {
        let file = NamedTempFile::new().unwrap();
        let report = run(file.path()).await.unwrap();
        assert_eq!(report.total_chunks, 0);
        assert_eq!(report.batch_count, 0);
        assert_eq!(report.running_hash, hex::encode([0u8; 32]));
    }
}
