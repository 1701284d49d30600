use serde::Serialize;

/// Metadata of an inscription as recorded by the contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InscriptionMeta {
    pub owner: String,
    pub creator: Option<String>,
    pub mime_type: String,
    pub total_size: u64,
    pub total_chunks: u64,
    pub sealed: bool,
    #[serde(serialize_with = "serialize_hash")]
    pub final_hash: [u8; 32],
}

/// An unsealed upload in progress. Only the chain mutates it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UploadState {
    pub mime_type: String,
    pub total_size: u64,
    pub total_chunks: u64,
    pub current_index: u64,
    #[serde(serialize_with = "serialize_hash")]
    pub running_hash: [u8; 32],
}

fn serialize_hash<S: serde::Serializer>(hash: &[u8; 32], serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&hex::encode(hash))
}
