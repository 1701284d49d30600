use std::sync::Arc;

use insc_core::InscriptionMeta;
use serde::Serialize;
use tracing::{info, info_span, Instrument};

use crate::client::ContractClient;
use crate::error::ClientError;
use crate::usecases::ContentFetcher;

/// Metadata plus reassembled content of one inscription.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoadedInscription {
    pub token_id: u128,
    pub meta: InscriptionMeta,
    #[serde(skip)]
    pub content: Vec<u8>,
    /// `true` when the running hash was checked against `final_hash`.
    pub verified: bool,
}

/// Read an inscription's metadata, fetch its content and, once sealed,
/// verify the content against the on-chain final hash.
pub struct LoadInscriptionUseCase {
    fetcher: Arc<ContentFetcher>,
}

impl LoadInscriptionUseCase {
    pub fn new(fetcher: Arc<ContentFetcher>) -> Self {
        Self { fetcher }
    }

    pub async fn execute(
        &self,
        client: &ContractClient,
        token_id: u128,
        verify: bool,
    ) -> Result<LoadedInscription, ClientError> {
        let span = info_span!(
            "app.load_inscription",
            contract = %client.contract_id(),
            token_id = %token_id,
        );
        async move {
            let meta = client
                .get_inscription_meta(token_id)
                .await?
                .ok_or(ClientError::NotFound { token_id })?;

            // Unsealed uploads have no final hash to compare against yet.
            let verified = verify && meta.sealed;
            let content = self
                .fetcher
                .fetch_verified(
                    client,
                    token_id,
                    meta.total_size,
                    &meta.mime_type,
                    verified.then_some(&meta.final_hash),
                )
                .await?;

            info!(
                bytes = content.len(),
                sealed = meta.sealed,
                verified,
                "Inscription loaded"
            );
            Ok(LoadedInscription {
                token_id,
                meta,
                content,
                verified,
            })
        }
        .instrument(span)
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{client_with, FakeRemote, MemoryCache, SENDER};
    use insc_core::chunk::{chunk, content_hash, CHUNK_SIZE};
    use insc_core::ports::CacheKey;
    use insc_core::{AssemblyError, CallError, Capabilities, StructuredValue};

    fn remote_for(data: Vec<u8>, sealed: bool, final_hash: [u8; 32]) -> Arc<FakeRemote> {
        let chunks = chunk(&data, CHUNK_SIZE).unwrap();
        let total_size = data.len() as u64;
        FakeRemote::new(move |call| match call.function_name.as_str() {
            "get-inscription-meta" => match call.args[0] {
                StructuredValue::UInt(1) => Ok(StructuredValue::some(StructuredValue::tuple([
                    ("owner", StructuredValue::principal(SENDER)),
                    ("mime-type", StructuredValue::ascii("text/plain")),
                    ("total-size", StructuredValue::uint(total_size)),
                    ("sealed", StructuredValue::Bool(sealed)),
                    ("final-hash", StructuredValue::buffer(final_hash.to_vec())),
                ]))),
                _ => Ok(StructuredValue::none()),
            },
            "get-chunk" => match &call.args[1] {
                StructuredValue::UInt(i) => Ok(chunks
                    .get(*i as usize)
                    .map(|c| StructuredValue::some(StructuredValue::buffer(c.clone())))
                    .unwrap_or(StructuredValue::none())),
                _ => Err(CallError::new("bad args")),
            },
            other => Err(CallError::new(format!("unexpected {other}"))),
        })
    }

    fn use_case() -> LoadInscriptionUseCase {
        LoadInscriptionUseCase::new(Arc::new(ContentFetcher::new(None)))
    }

    #[tokio::test]
    async fn sealed_content_is_verified() {
        let data: Vec<u8> = (0..CHUNK_SIZE + 5).map(|i| i as u8).collect();
        let remote = remote_for(data.clone(), true, content_hash(&data));
        let client = client_with(remote, Capabilities::CONSERVATIVE);

        let loaded = use_case().execute(&client, 1, true).await.unwrap();
        assert_eq!(loaded.content, data);
        assert!(loaded.verified);
        assert_eq!(loaded.meta.total_chunks, 2);
    }

    #[tokio::test]
    async fn hash_mismatch_is_an_assembly_error() {
        let data = b"tampered".to_vec();
        let remote = remote_for(data, true, [0u8; 32]);
        let client = client_with(remote, Capabilities::CONSERVATIVE);

        assert!(matches!(
            use_case().execute(&client, 1, true).await,
            Err(ClientError::Assembly(AssemblyError::HashMismatch { token_id: 1, .. }))
        ));
    }

    #[tokio::test]
    async fn unsealed_or_unverified_content_skips_hash_check() {
        let data = b"draft".to_vec();
        let client = client_with(
            remote_for(data.clone(), false, [0u8; 32]),
            Capabilities::CONSERVATIVE,
        );
        let loaded = use_case().execute(&client, 1, true).await.unwrap();
        assert_eq!(loaded.content, data);
        assert!(!loaded.verified);

        let client = client_with(
            remote_for(data, true, [0u8; 32]),
            Capabilities::CONSERVATIVE,
        );
        assert!(!use_case().execute(&client, 1, false).await.unwrap().verified);
    }

    #[tokio::test]
    async fn unknown_token_is_not_found() {
        let client = client_with(
            remote_for(vec![], true, [0u8; 32]),
            Capabilities::CONSERVATIVE,
        );
        assert_eq!(
            use_case().execute(&client, 2, true).await.unwrap_err(),
            ClientError::NotFound { token_id: 2 }
        );
    }

    #[tokio::test]
    async fn content_failing_the_final_hash_is_not_cached() {
        let data = b"tampered".to_vec();
        let cache = Arc::new(MemoryCache::default());
        let fetcher = Arc::new(ContentFetcher::new(Some(cache.clone())));
        let use_case = LoadInscriptionUseCase::new(fetcher.clone());
        let remote = remote_for(data.clone(), true, [0u8; 32]);
        let client = client_with(remote.clone(), Capabilities::CONSERVATIVE);

        assert!(matches!(
            use_case.execute(&client, 1, true).await,
            Err(ClientError::Assembly(AssemblyError::HashMismatch { .. }))
        ));
        assert!(cache.entries.lock().unwrap().is_empty());

        // A later unverified read goes back to the node instead of a cached copy.
        let before = remote.count("get-chunk");
        let content = fetcher
            .fetch_content(&client, 1, data.len() as u64, "text/plain")
            .await
            .unwrap();
        assert_eq!(content, data);
        assert_eq!(remote.count("get-chunk"), before + 1);
    }

    #[tokio::test]
    async fn stale_cached_copy_is_replaced_when_verifying() {
        let data = b"genuine".to_vec();
        let cache = Arc::new(MemoryCache::default());
        let client = client_with(
            remote_for(data.clone(), true, content_hash(&data)),
            Capabilities::CONSERVATIVE,
        );
        let key = CacheKey::data(client.contract_id(), 1).to_string();
        cache
            .entries
            .lock()
            .unwrap()
            .insert(key.clone(), b"corrupt".to_vec());

        let fetcher = ContentFetcher::new(Some(cache.clone()));
        let use_case = LoadInscriptionUseCase::new(Arc::new(fetcher));
        let loaded = use_case.execute(&client, 1, true).await.unwrap();

        assert!(loaded.verified);
        assert_eq!(loaded.content, data);
        assert_eq!(cache.entries.lock().unwrap().get(&key), Some(&data));
    }
}
