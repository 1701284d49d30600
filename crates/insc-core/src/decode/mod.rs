//! Typed decoding of structured values.
//!
//! One `expect_*` function per variant. Each takes the value and a context
//! label and either returns the payload or a [`DecodeError`] naming the
//! context, the expected variant and the actual one. Composite parsers in
//! [`parsers`] are built from these primitives only.

pub mod parsers;

use std::collections::BTreeMap;

use crate::error::{ContractCallError, DecodeError, ResponseError};
use crate::value::StructuredValue;

pub use parsers::*;

fn mismatch(context: &str, expected: &'static str, actual: &StructuredValue) -> DecodeError {
    DecodeError::UnexpectedTag {
        context: context.to_string(),
        expected,
        actual: actual.tag(),
    }
}

pub fn expect_int(value: &StructuredValue, context: &str) -> Result<i128, DecodeError> {
    match value {
        StructuredValue::Int(v) => Ok(*v),
        other => Err(mismatch(context, "int", other)),
    }
}

pub fn expect_uint(value: &StructuredValue, context: &str) -> Result<u128, DecodeError> {
    match value {
        StructuredValue::UInt(v) => Ok(*v),
        other => Err(mismatch(context, "uint", other)),
    }
}

pub fn expect_buffer<'a>(
    value: &'a StructuredValue,
    context: &str,
) -> Result<&'a [u8], DecodeError> {
    match value {
        StructuredValue::Buffer(bytes) => Ok(bytes),
        other => Err(mismatch(context, "buffer", other)),
    }
}

pub fn expect_string_ascii<'a>(
    value: &'a StructuredValue,
    context: &str,
) -> Result<&'a str, DecodeError> {
    match value {
        StructuredValue::StringAscii(s) => Ok(s),
        other => Err(mismatch(context, "string-ascii", other)),
    }
}

pub fn expect_string_utf8<'a>(
    value: &'a StructuredValue,
    context: &str,
) -> Result<&'a str, DecodeError> {
    match value {
        StructuredValue::StringUtf8(s) => Ok(s),
        other => Err(mismatch(context, "string-utf8", other)),
    }
}

pub fn expect_true(value: &StructuredValue, context: &str) -> Result<(), DecodeError> {
    match value {
        StructuredValue::Bool(true) => Ok(()),
        other => Err(mismatch(context, "true", other)),
    }
}

pub fn expect_false(value: &StructuredValue, context: &str) -> Result<(), DecodeError> {
    match value {
        StructuredValue::Bool(false) => Ok(()),
        other => Err(mismatch(context, "false", other)),
    }
}

pub fn expect_bool(value: &StructuredValue, context: &str) -> Result<bool, DecodeError> {
    match value {
        StructuredValue::Bool(b) => Ok(*b),
        other => Err(mismatch(context, "bool", other)),
    }
}

pub fn expect_some<'a>(
    value: &'a StructuredValue,
    context: &str,
) -> Result<&'a StructuredValue, DecodeError> {
    match value {
        StructuredValue::OptionalSome(inner) => Ok(inner),
        other => Err(mismatch(context, "some", other)),
    }
}

pub fn expect_none(value: &StructuredValue, context: &str) -> Result<(), DecodeError> {
    match value {
        StructuredValue::OptionalNone => Ok(()),
        other => Err(mismatch(context, "none", other)),
    }
}

/// `some` → `Some(inner)`, `none` → `None`, anything else fails.
pub fn expect_optional<'a>(
    value: &'a StructuredValue,
    context: &str,
) -> Result<Option<&'a StructuredValue>, DecodeError> {
    match value {
        StructuredValue::OptionalSome(inner) => Ok(Some(inner)),
        StructuredValue::OptionalNone => Ok(None),
        other => Err(mismatch(context, "optional", other)),
    }
}

pub fn expect_ok<'a>(
    value: &'a StructuredValue,
    context: &str,
) -> Result<&'a StructuredValue, DecodeError> {
    match value {
        StructuredValue::ResponseOk(inner) => Ok(inner),
        other => Err(mismatch(context, "ok", other)),
    }
}

pub fn expect_err<'a>(
    value: &'a StructuredValue,
    context: &str,
) -> Result<&'a StructuredValue, DecodeError> {
    match value {
        StructuredValue::ResponseErr(inner) => Ok(inner),
        other => Err(mismatch(context, "err", other)),
    }
}

pub fn expect_tuple<'a>(
    value: &'a StructuredValue,
    context: &str,
) -> Result<&'a BTreeMap<String, StructuredValue>, DecodeError> {
    match value {
        StructuredValue::Tuple(fields) => Ok(fields),
        other => Err(mismatch(context, "tuple", other)),
    }
}

pub fn expect_list<'a>(
    value: &'a StructuredValue,
    context: &str,
) -> Result<&'a [StructuredValue], DecodeError> {
    match value {
        StructuredValue::List(items) => Ok(items),
        other => Err(mismatch(context, "list", other)),
    }
}

pub fn expect_standard_principal<'a>(
    value: &'a StructuredValue,
    context: &str,
) -> Result<&'a str, DecodeError> {
    match value {
        StructuredValue::PrincipalStandard(p) => Ok(p),
        other => Err(mismatch(context, "principal-standard", other)),
    }
}

pub fn expect_contract_principal<'a>(
    value: &'a StructuredValue,
    context: &str,
) -> Result<&'a str, DecodeError> {
    match value {
        StructuredValue::PrincipalContract(p) => Ok(p),
        other => Err(mismatch(context, "principal-contract", other)),
    }
}

/// Either principal variant.
pub fn expect_principal<'a>(
    value: &'a StructuredValue,
    context: &str,
) -> Result<&'a str, DecodeError> {
    match value {
        StructuredValue::PrincipalStandard(p) | StructuredValue::PrincipalContract(p) => Ok(p),
        other => Err(mismatch(context, "principal", other)),
    }
}

/// Required tuple field; a missing key fails loudly.
pub fn tuple_field<'a>(
    fields: &'a BTreeMap<String, StructuredValue>,
    key: &str,
    context: &str,
) -> Result<&'a StructuredValue, DecodeError> {
    fields.get(key).ok_or_else(|| DecodeError::MissingField {
        context: context.to_string(),
        field: key.to_string(),
    })
}

pub fn tuple_field_opt<'a>(
    fields: &'a BTreeMap<String, StructuredValue>,
    key: &str,
) -> Option<&'a StructuredValue> {
    fields.get(key)
}

/// Outcome of a response value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseValue<'a> {
    Ok(&'a StructuredValue),
    Err(&'a StructuredValue),
}

pub fn unwrap_response<'a>(
    value: &'a StructuredValue,
    context: &str,
) -> Result<ResponseValue<'a>, DecodeError> {
    match value {
        StructuredValue::ResponseOk(inner) => Ok(ResponseValue::Ok(inner)),
        StructuredValue::ResponseErr(inner) => Ok(ResponseValue::Err(inner)),
        other => Err(mismatch(context, "response", other)),
    }
}

/// Turn an `err` payload (an unsigned code) into a [`ContractCallError`].
pub fn contract_error(
    payload: &StructuredValue,
    context: &str,
) -> Result<ContractCallError, DecodeError> {
    let code = expect_uint(payload, &format!("{context} error code"))?;
    Ok(ContractCallError::from_code(code))
}

/// Response that must be `ok`; `err` becomes a [`ContractCallError`].
pub fn expect_ok_response<'a>(
    value: &'a StructuredValue,
    context: &str,
) -> Result<&'a StructuredValue, ResponseError> {
    match unwrap_response(value, context)? {
        ResponseValue::Ok(inner) => Ok(inner),
        ResponseValue::Err(payload) => Err(contract_error(payload, context)?.into()),
    }
}

/// Like [`expect_ok_response`] but passes non-response values through, for
/// read-only functions that some contract versions wrap in `ok` and others do not.
pub fn strip_response<'a>(
    value: &'a StructuredValue,
    context: &str,
) -> Result<&'a StructuredValue, ResponseError> {
    match value {
        StructuredValue::ResponseOk(_) | StructuredValue::ResponseErr(_) => {
            expect_ok_response(value, context)
        }
        other => Ok(other),
    }
}
