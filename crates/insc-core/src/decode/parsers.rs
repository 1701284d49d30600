//! Composite parsers for contract query results.
//!
//! Every parser is assembled from the `expect_*` primitives in the parent
//! module. Response wrapping (`ok`/`err`) is stripped by the caller first.

use super::*;
use crate::chunk::chunk_count;
use crate::contract::{InscriptionMeta, UploadState};

const HASH_LEN: usize = 32;

fn expect_u64(value: &StructuredValue, context: &str) -> Result<u64, DecodeError> {
    let raw = expect_uint(value, context)?;
    u64::try_from(raw).map_err(|_| DecodeError::OutOfRange {
        context: context.to_string(),
        value: raw.to_string(),
        target: "u64",
    })
}

fn expect_hash(value: &StructuredValue, context: &str) -> Result<[u8; HASH_LEN], DecodeError> {
    let bytes = expect_buffer(value, context)?;
    <[u8; HASH_LEN]>::try_from(bytes).map_err(|_| DecodeError::InvalidLength {
        context: context.to_string(),
        expected: HASH_LEN,
        actual: bytes.len(),
    })
}

/// string-ascii or string-utf8.
fn expect_text(value: &StructuredValue, context: &str) -> Result<String, DecodeError> {
    match value {
        StructuredValue::StringUtf8(_) => expect_string_utf8(value, context).map(str::to_string),
        _ => expect_string_ascii(value, context).map(str::to_string),
    }
}

/// Unwraps an optional wrapper if present; a bare value counts as `Some`.
fn optional_or_bare<'a>(
    value: &'a StructuredValue,
    context: &str,
) -> Result<Option<&'a StructuredValue>, DecodeError> {
    match value {
        StructuredValue::OptionalSome(_) | StructuredValue::OptionalNone => {
            expect_optional(value, context)
        }
        other => Ok(Some(other)),
    }
}

fn field_context(context: &str, field: &str) -> String {
    format!("{context}.{field}")
}

/// `get-inscription-meta`: `(optional (tuple ...))`.
///
/// `total-chunks` is derived from `total-size` when the contract omits it.
/// `creator` may be absent, an optional principal or a bare principal.
pub fn parse_inscription_meta(
    value: &StructuredValue,
) -> Result<Option<InscriptionMeta>, DecodeError> {
    const CTX: &str = "get-inscription-meta";
    let Some(inner) = optional_or_bare(value, CTX)? else {
        return Ok(None);
    };
    let fields = expect_tuple(inner, CTX)?;

    let owner = expect_principal(
        tuple_field(fields, "owner", CTX)?,
        &field_context(CTX, "owner"),
    )?
    .to_string();

    let creator = match tuple_field_opt(fields, "creator") {
        None => None,
        Some(raw) => {
            let ctx = field_context(CTX, "creator");
            optional_or_bare(raw, &ctx)?
                .map(|principal| expect_principal(principal, &ctx).map(str::to_string))
                .transpose()?
        }
    };

    let mime_type = expect_text(
        tuple_field(fields, "mime-type", CTX)?,
        &field_context(CTX, "mime-type"),
    )?;
    let total_size = expect_u64(
        tuple_field(fields, "total-size", CTX)?,
        &field_context(CTX, "total-size"),
    )?;
    let total_chunks = match tuple_field_opt(fields, "total-chunks") {
        Some(raw) => expect_u64(raw, &field_context(CTX, "total-chunks"))?,
        None => chunk_count(total_size),
    };
    let sealed = expect_bool(
        tuple_field(fields, "sealed", CTX)?,
        &field_context(CTX, "sealed"),
    )?;
    let final_hash = expect_hash(
        tuple_field(fields, "final-hash", CTX)?,
        &field_context(CTX, "final-hash"),
    )?;

    Ok(Some(InscriptionMeta {
        owner,
        creator,
        mime_type,
        total_size,
        total_chunks,
        sealed,
        final_hash,
    }))
}

/// `get-upload-state`: `(optional (tuple ...))`.
pub fn parse_upload_state(value: &StructuredValue) -> Result<Option<UploadState>, DecodeError> {
    const CTX: &str = "get-upload-state";
    let Some(inner) = optional_or_bare(value, CTX)? else {
        return Ok(None);
    };
    let fields = expect_tuple(inner, CTX)?;

    let total_size = expect_u64(
        tuple_field(fields, "total-size", CTX)?,
        &field_context(CTX, "total-size"),
    )?;
    let total_chunks = match tuple_field_opt(fields, "total-chunks") {
        Some(raw) => expect_u64(raw, &field_context(CTX, "total-chunks"))?,
        None => chunk_count(total_size),
    };

    Ok(Some(UploadState {
        mime_type: expect_text(
            tuple_field(fields, "mime-type", CTX)?,
            &field_context(CTX, "mime-type"),
        )?,
        total_size,
        total_chunks,
        current_index: expect_u64(
            tuple_field(fields, "current-index", CTX)?,
            &field_context(CTX, "current-index"),
        )?,
        running_hash: expect_hash(
            tuple_field(fields, "running-hash", CTX)?,
            &field_context(CTX, "running-hash"),
        )?,
    }))
}

/// `get-dependencies`: `(list uint)`.
pub fn parse_dependencies(value: &StructuredValue) -> Result<Vec<u128>, DecodeError> {
    const CTX: &str = "get-dependencies";
    expect_list(value, CTX)?
        .iter()
        .enumerate()
        .map(|(i, item)| expect_uint(item, &format!("{CTX}[{i}]")))
        .collect()
}

/// `get-chunk` / `get-pending-chunk`: `(optional (buff 16384))`.
pub fn parse_chunk(value: &StructuredValue, context: &str) -> Result<Option<Vec<u8>>, DecodeError> {
    expect_optional(value, context)?
        .map(|inner| expect_buffer(inner, context).map(<[u8]>::to_vec))
        .transpose()
}

/// `get-chunk-batch`: `(list (optional (buff 16384)))`, one entry per requested index.
pub fn parse_chunk_batch(value: &StructuredValue) -> Result<Vec<Option<Vec<u8>>>, DecodeError> {
    const CTX: &str = "get-chunk-batch";
    expect_list(value, CTX)?
        .iter()
        .enumerate()
        .map(|(i, item)| parse_chunk(item, &format!("{CTX}[{i}]")))
        .collect()
}

pub fn parse_token_id(value: &StructuredValue, context: &str) -> Result<u128, DecodeError> {
    expect_uint(value, context)
}

/// `get-id-by-hash`: `(optional uint)`.
pub fn parse_optional_token_id(value: &StructuredValue) -> Result<Option<u128>, DecodeError> {
    const CTX: &str = "get-id-by-hash";
    expect_optional(value, CTX)?
        .map(|inner| expect_uint(inner, CTX))
        .transpose()
}

pub fn parse_admin(value: &StructuredValue) -> Result<String, DecodeError> {
    expect_principal(value, "get-admin").map(str::to_string)
}

pub fn parse_fee_unit(value: &StructuredValue) -> Result<u128, DecodeError> {
    expect_uint(value, "get-fee-unit")
}

pub fn parse_paused(value: &StructuredValue) -> Result<bool, DecodeError> {
    expect_bool(value, "is-paused")
}

/// `get-token-uri`: `(optional (string-ascii 256))`.
pub fn parse_token_uri(value: &StructuredValue) -> Result<Option<String>, DecodeError> {
    const CTX: &str = "get-token-uri";
    expect_optional(value, CTX)?
        .map(|inner| expect_text(inner, CTX))
        .transpose()
}

/// `get-owner`: `(optional principal)`.
pub fn parse_owner(value: &StructuredValue) -> Result<Option<String>, DecodeError> {
    const CTX: &str = "get-owner";
    expect_optional(value, CTX)?
        .map(|inner| expect_principal(inner, CTX).map(str::to_string))
        .transpose()
}

/// `get-svg`: `(optional string)`.
pub fn parse_svg(value: &StructuredValue) -> Result<Option<String>, DecodeError> {
    const CTX: &str = "get-svg";
    expect_optional(value, CTX)?
        .map(|inner| expect_text(inner, CTX))
        .transpose()
}
