use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use anyhow::Result;
use async_trait::async_trait;
use insc_core::ports::{CacheKey, ContentCachePort};
use tokio::fs;

const DATA_FILE_EXTENSION: &str = "bin";

/// Content cache persisted as `<root>/<namespace>/<contract_id>/<token_id>.bin`.
pub struct FsContentCache {
    root: PathBuf,
}

impl FsContentCache {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &CacheKey) -> Result<PathBuf> {
        validate_contract_id(&key.contract_id)?;
        Ok(self
            .root
            .join(key.namespace.as_str())
            .join(&key.contract_id)
            .join(format!("{}.{DATA_FILE_EXTENSION}", key.token_id)))
    }
}

/// Contract ids become directory names, so path separators and traversal
/// segments are refused.
fn validate_contract_id(contract_id: &str) -> Result<()> {
    let valid = !contract_id.is_empty()
        && contract_id != "."
        && contract_id != ".."
        && contract_id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '_');
    if !valid {
        anyhow::bail!("invalid contract id for cache path: {contract_id:?}");
    }
    Ok(())
}

#[async_trait]
impl ContentCachePort for FsContentCache {
    async fn get(&self, key: &CacheKey) -> Result<Option<Vec<u8>>> {
        let path = self.path_for(key)?;
        match fs::read(&path).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    async fn set(&self, key: &CacheKey, bytes: &[u8]) -> Result<()> {
        let path = self.path_for(key)?;
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir).await?;
        }
        // Write then rename so readers never observe a partial file.
        let tmp = path.with_extension("tmp");
        fs::write(&tmp, bytes).await?;
        fs::rename(&tmp, &path).await?;
        Ok(())
    }
}
