//! Contract client: typed read accessors and call-descriptor builders bound
//! to one contract identity.
//!
//! Every read goes through the shared [`ReadOnlyGateway`] and is decoded with
//! the matching parser from `insc_core::decode`.

mod descriptor;

pub use descriptor::{CallDescriptor, EncodedCall};

use std::sync::Arc;

use insc_core::decode::{self, strip_response};
use insc_core::ports::{ReadOnlyCall, ReadOnlyCallPort};
use insc_core::{Capabilities, ContractIdentity, InscriptionMeta, StructuredValue, UploadState};
use tracing::debug;

use crate::error::ClientError;
use crate::gateway::{ReadOnlyGateway, RetryOptions};

pub const FN_GET_LAST_TOKEN_ID: &str = "get-last-token-id";
pub const FN_GET_ID_BY_HASH: &str = "get-id-by-hash";
pub const FN_GET_ADMIN: &str = "get-admin";
pub const FN_GET_FEE_UNIT: &str = "get-fee-unit";
pub const FN_IS_PAUSED: &str = "is-paused";
pub const FN_GET_TOKEN_URI: &str = "get-token-uri";
pub const FN_GET_OWNER: &str = "get-owner";
pub const FN_GET_SVG: &str = "get-svg";
pub const FN_GET_INSCRIPTION_META: &str = "get-inscription-meta";
pub const FN_GET_DEPENDENCIES: &str = "get-dependencies";
pub const FN_GET_CHUNK: &str = "get-chunk";
pub const FN_GET_CHUNK_BATCH: &str = "get-chunk-batch";
pub const FN_GET_PENDING_CHUNK: &str = "get-pending-chunk";
pub const FN_GET_UPLOAD_STATE: &str = "get-upload-state";

pub const FN_BEGIN_INSCRIPTION: &str = "begin-inscription";
pub const FN_ADD_CHUNK_BATCH: &str = "add-chunk-batch";
pub const FN_SEAL_INSCRIPTION: &str = "seal-inscription";
pub const FN_SEAL_RECURSIVE: &str = "seal-recursive";
pub const FN_TRANSFER: &str = "transfer";
pub const FN_SET_ROYALTY_RECIPIENT: &str = "set-royalty-recipient";

#[derive(Clone)]
pub struct ContractClient {
    identity: ContractIdentity,
    sender: String,
    capabilities: Capabilities,
    remote: Arc<dyn ReadOnlyCallPort>,
    gateway: Arc<ReadOnlyGateway>,
    retry: RetryOptions,
}

impl ContractClient {
    pub fn new(
        identity: ContractIdentity,
        sender: impl Into<String>,
        capabilities: Capabilities,
        remote: Arc<dyn ReadOnlyCallPort>,
        gateway: Arc<ReadOnlyGateway>,
    ) -> Self {
        Self {
            identity,
            sender: sender.into(),
            capabilities,
            remote,
            gateway,
            retry: RetryOptions::default(),
        }
    }

    /// Retry options applied to every read made through this client,
    /// including its cancellation token.
    pub fn with_retry_options(mut self, retry: RetryOptions) -> Self {
        self.retry = retry;
        self
    }

    pub fn identity(&self) -> &ContractIdentity {
        &self.identity
    }

    pub fn contract_id(&self) -> String {
        self.identity.contract_id()
    }

    pub fn capabilities(&self) -> Capabilities {
        self.capabilities
    }

    pub fn sender(&self) -> &str {
        &self.sender
    }

    /// One read-only call through the gateway, with the response wrapper stripped.
    async fn read(
        &self,
        function_name: &str,
        args: Vec<StructuredValue>,
    ) -> Result<StructuredValue, ClientError> {
        let call = ReadOnlyCall {
            contract_address: self.identity.address.clone(),
            contract_name: self.identity.contract_name.clone(),
            function_name: function_name.to_string(),
            args,
            sender: self.sender.clone(),
            network: self.identity.network,
        };
        let contract_id = call.contract_id();
        let remote = &self.remote;
        let call_ref = &call;
        let value = self
            .gateway
            .call_with_retry(function_name, &contract_id, self.retry.clone(), move || {
                remote.call_read_only(call_ref)
            })
            .await?;
        Ok(strip_response(&value, function_name)?.clone())
    }

    pub async fn get_last_token_id(&self) -> Result<u128, ClientError> {
        let value = self.read(FN_GET_LAST_TOKEN_ID, vec![]).await?;
        Ok(decode::parse_token_id(&value, FN_GET_LAST_TOKEN_ID)?)
    }

    pub async fn get_id_by_hash(&self, hash: &[u8; 32]) -> Result<Option<u128>, ClientError> {
        let value = self
            .read(FN_GET_ID_BY_HASH, vec![StructuredValue::buffer(hash.to_vec())])
            .await?;
        Ok(decode::parse_optional_token_id(&value)?)
    }

    pub async fn get_admin(&self) -> Result<String, ClientError> {
        let value = self.read(FN_GET_ADMIN, vec![]).await?;
        Ok(decode::parse_admin(&value)?)
    }

    pub async fn get_fee_unit(&self) -> Result<u128, ClientError> {
        let value = self.read(FN_GET_FEE_UNIT, vec![]).await?;
        Ok(decode::parse_fee_unit(&value)?)
    }

    pub async fn is_paused(&self) -> Result<bool, ClientError> {
        let value = self.read(FN_IS_PAUSED, vec![]).await?;
        Ok(decode::parse_paused(&value)?)
    }

    pub async fn get_token_uri(&self, token_id: u128) -> Result<Option<String>, ClientError> {
        let value = self
            .read(FN_GET_TOKEN_URI, vec![StructuredValue::uint(token_id)])
            .await?;
        Ok(decode::parse_token_uri(&value)?)
    }

    pub async fn get_owner(&self, token_id: u128) -> Result<Option<String>, ClientError> {
        let value = self
            .read(FN_GET_OWNER, vec![StructuredValue::uint(token_id)])
            .await?;
        Ok(decode::parse_owner(&value)?)
    }

    pub async fn get_svg(&self, token_id: u128) -> Result<Option<String>, ClientError> {
        let value = self
            .read(FN_GET_SVG, vec![StructuredValue::uint(token_id)])
            .await?;
        Ok(decode::parse_svg(&value)?)
    }

    pub async fn get_inscription_meta(
        &self,
        token_id: u128,
    ) -> Result<Option<InscriptionMeta>, ClientError> {
        let value = self
            .read(FN_GET_INSCRIPTION_META, vec![StructuredValue::uint(token_id)])
            .await?;
        Ok(decode::parse_inscription_meta(&value)?)
    }

    pub async fn get_dependencies(&self, token_id: u128) -> Result<Vec<u128>, ClientError> {
        let value = self
            .read(FN_GET_DEPENDENCIES, vec![StructuredValue::uint(token_id)])
            .await?;
        Ok(decode::parse_dependencies(&value)?)
    }

    pub async fn get_chunk(
        &self,
        token_id: u128,
        index: u64,
    ) -> Result<Option<Vec<u8>>, ClientError> {
        let value = self
            .read(
                FN_GET_CHUNK,
                vec![StructuredValue::uint(token_id), StructuredValue::uint(index)],
            )
            .await?;
        Ok(decode::parse_chunk(&value, FN_GET_CHUNK)?)
    }

    /// One entry per requested index, in request order.
    pub async fn get_chunk_batch(
        &self,
        token_id: u128,
        indices: &[u64],
    ) -> Result<Vec<Option<Vec<u8>>>, ClientError> {
        let value = self
            .read(
                FN_GET_CHUNK_BATCH,
                vec![
                    StructuredValue::uint(token_id),
                    StructuredValue::list(indices.iter().map(|i| StructuredValue::uint(*i))),
                ],
            )
            .await?;
        Ok(decode::parse_chunk_batch(&value)?)
    }

    /// Chunk of an unsealed upload. Older contracts key pending uploads by
    /// creator as well as hash, so the creator is passed only when required.
    pub async fn get_pending_chunk(
        &self,
        hash: &[u8; 32],
        creator: &str,
        index: u64,
    ) -> Result<Option<Vec<u8>>, ClientError> {
        let mut args = Vec::with_capacity(3);
        if self.capabilities.pending_chunk_requires_creator {
            args.push(StructuredValue::principal(creator));
        }
        args.push(StructuredValue::buffer(hash.to_vec()));
        args.push(StructuredValue::uint(index));
        debug!(
            with_creator = self.capabilities.pending_chunk_requires_creator,
            index,
            "Reading pending chunk"
        );
        let value = self.read(FN_GET_PENDING_CHUNK, args).await?;
        Ok(decode::parse_chunk(&value, FN_GET_PENDING_CHUNK)?)
    }

    pub async fn get_upload_state(
        &self,
        hash: &[u8; 32],
        owner: &str,
    ) -> Result<Option<UploadState>, ClientError> {
        let value = self
            .read(
                FN_GET_UPLOAD_STATE,
                vec![
                    StructuredValue::buffer(hash.to_vec()),
                    StructuredValue::principal(owner),
                ],
            )
            .await?;
        Ok(decode::parse_upload_state(&value)?)
    }

    // === Call descriptors ===

    pub fn begin_inscription(
        &self,
        hash: &[u8; 32],
        mime_type: &str,
        total_size: u64,
        total_chunks: u64,
    ) -> CallDescriptor {
        CallDescriptor::new(
            &self.identity,
            FN_BEGIN_INSCRIPTION,
            vec![
                StructuredValue::buffer(hash.to_vec()),
                StructuredValue::ascii(mime_type),
                StructuredValue::uint(total_size),
                StructuredValue::uint(total_chunks),
            ],
        )
    }

    pub fn add_chunk_batch<C: AsRef<[u8]>>(
        &self,
        hash: &[u8; 32],
        chunks: &[C],
    ) -> CallDescriptor {
        CallDescriptor::new(
            &self.identity,
            FN_ADD_CHUNK_BATCH,
            vec![
                StructuredValue::buffer(hash.to_vec()),
                StructuredValue::list(
                    chunks
                        .iter()
                        .map(|c| StructuredValue::buffer(c.as_ref().to_vec())),
                ),
            ],
        )
    }

    pub fn seal_inscription(&self, hash: &[u8; 32], token_uri: &str) -> CallDescriptor {
        CallDescriptor::new(
            &self.identity,
            FN_SEAL_INSCRIPTION,
            vec![
                StructuredValue::buffer(hash.to_vec()),
                StructuredValue::ascii(token_uri),
            ],
        )
    }

    pub fn seal_recursive(
        &self,
        hash: &[u8; 32],
        token_uri: &str,
        dependencies: &[u128],
    ) -> CallDescriptor {
        CallDescriptor::new(
            &self.identity,
            FN_SEAL_RECURSIVE,
            vec![
                StructuredValue::buffer(hash.to_vec()),
                StructuredValue::ascii(token_uri),
                StructuredValue::list(dependencies.iter().map(|d| StructuredValue::uint(*d))),
            ],
        )
    }

    pub fn transfer(&self, token_id: u128, sender: &str, recipient: &str) -> CallDescriptor {
        CallDescriptor::new(
            &self.identity,
            FN_TRANSFER,
            vec![
                StructuredValue::uint(token_id),
                StructuredValue::principal(sender),
                StructuredValue::principal(recipient),
            ],
        )
    }

    pub fn set_royalty_recipient(&self, recipient: &str) -> CallDescriptor {
        CallDescriptor::new(
            &self.identity,
            FN_SET_ROYALTY_RECIPIENT,
            vec![StructuredValue::principal(recipient)],
        )
    }
}
