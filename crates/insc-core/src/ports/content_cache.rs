use anyhow::Result;
use async_trait::async_trait;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CacheNamespace {
    /// Reassembled inscription content.
    Data,
    Preview,
    Temp,
}

impl CacheNamespace {
    pub fn as_str(&self) -> &'static str {
        match self {
            CacheNamespace::Data => "data",
            CacheNamespace::Preview => "preview",
            CacheNamespace::Temp => "temp",
        }
    }
}

/// Cache key, rendered as `<namespace>:<contractId>:<tokenId>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CacheKey {
    pub namespace: CacheNamespace,
    pub contract_id: String,
    pub token_id: u128,
}

impl CacheKey {
    pub fn new(namespace: CacheNamespace, contract_id: impl Into<String>, token_id: u128) -> Self {
        Self {
            namespace,
            contract_id: contract_id.into(),
            token_id,
        }
    }

    pub fn data(contract_id: impl Into<String>, token_id: u128) -> Self {
        Self::new(CacheNamespace::Data, contract_id, token_id)
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}:{}",
            self.namespace.as_str(),
            self.contract_id,
            self.token_id
        )
    }
}

/// Content cache. Callers treat every error as a miss.
#[async_trait]
pub trait ContentCachePort: Send + Sync {
    async fn get(&self, key: &CacheKey) -> Result<Option<Vec<u8>>>;

    async fn set(&self, key: &CacheKey, bytes: &[u8]) -> Result<()>;
}
