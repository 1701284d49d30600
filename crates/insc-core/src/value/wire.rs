//! Binary consensus serialization of structured values.
//!
//! Layout: one type-prefix byte, then the payload. Integers are 16-byte
//! big-endian, lengths and counts are u32 big-endian, tuple keys and contract
//! names carry a u8 length prefix. Tuple keys are written in sorted order.

use std::collections::BTreeMap;

use thiserror::Error;

use super::c32::{decode_address, encode_address, C32Error};
use super::StructuredValue;

const TYPE_INT: u8 = 0x00;
const TYPE_UINT: u8 = 0x01;
const TYPE_BUFFER: u8 = 0x02;
const TYPE_TRUE: u8 = 0x03;
const TYPE_FALSE: u8 = 0x04;
const TYPE_PRINCIPAL_STANDARD: u8 = 0x05;
const TYPE_PRINCIPAL_CONTRACT: u8 = 0x06;
const TYPE_RESPONSE_OK: u8 = 0x07;
const TYPE_RESPONSE_ERR: u8 = 0x08;
const TYPE_OPTIONAL_NONE: u8 = 0x09;
const TYPE_OPTIONAL_SOME: u8 = 0x0a;
const TYPE_LIST: u8 = 0x0b;
const TYPE_TUPLE: u8 = 0x0c;
const TYPE_STRING_ASCII: u8 = 0x0d;
const TYPE_STRING_UTF8: u8 = 0x0e;

const MAX_DEPTH: usize = 64;
const MAX_NAME_LEN: usize = 128;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WireError {
    #[error("unknown type prefix 0x{0:02x}")]
    UnknownType(u8),

    #[error("unexpected end of input at offset {0}")]
    UnexpectedEnd(usize),

    #[error("{0} trailing bytes after value")]
    TrailingBytes(usize),

    #[error("string-ascii contains non-ascii bytes")]
    InvalidAscii,

    #[error("string-utf8 is not valid utf-8")]
    InvalidUtf8,

    #[error("value nesting exceeds 64 levels")]
    TooDeep,

    #[error("invalid hex: {0}")]
    Hex(String),

    #[error("invalid principal: {0}")]
    Principal(#[from] C32Error),

    #[error("invalid name `{0}`")]
    InvalidName(String),

    #[error("length {0} does not fit the wire format")]
    LengthOverflow(usize),

    #[error("duplicate tuple key `{0}`")]
    DuplicateKey(String),
}

pub fn to_bytes(value: &StructuredValue) -> Result<Vec<u8>, WireError> {
    let mut out = Vec::new();
    write_value(value, &mut out)?;
    Ok(out)
}

pub fn to_hex(value: &StructuredValue) -> Result<String, WireError> {
    Ok(format!("0x{}", hex::encode(to_bytes(value)?)))
}

pub fn from_bytes(bytes: &[u8]) -> Result<StructuredValue, WireError> {
    let mut reader = Reader { bytes, pos: 0 };
    let value = reader.read_value(0)?;
    let remaining = bytes.len() - reader.pos;
    if remaining > 0 {
        return Err(WireError::TrailingBytes(remaining));
    }
    Ok(value)
}

/// Parse a hex payload, with or without the `0x` prefix.
pub fn from_hex(input: &str) -> Result<StructuredValue, WireError> {
    let trimmed = input.strip_prefix("0x").unwrap_or(input);
    let bytes = hex::decode(trimmed).map_err(|err| WireError::Hex(err.to_string()))?;
    from_bytes(&bytes)
}

fn write_len(len: usize, out: &mut Vec<u8>) -> Result<(), WireError> {
    let len = u32::try_from(len).map_err(|_| WireError::LengthOverflow(len))?;
    out.extend_from_slice(&len.to_be_bytes());
    Ok(())
}

fn write_name(name: &str, out: &mut Vec<u8>) -> Result<(), WireError> {
    if name.is_empty() || name.len() > MAX_NAME_LEN || !name.is_ascii() {
        return Err(WireError::InvalidName(name.to_string()));
    }
    out.push(name.len() as u8);
    out.extend_from_slice(name.as_bytes());
    Ok(())
}

fn write_standard_principal(address: &str, out: &mut Vec<u8>) -> Result<(), WireError> {
    let (version, hash160) = decode_address(address)?;
    out.push(version);
    out.extend_from_slice(&hash160);
    Ok(())
}

fn write_value(value: &StructuredValue, out: &mut Vec<u8>) -> Result<(), WireError> {
    match value {
        StructuredValue::Int(v) => {
            out.push(TYPE_INT);
            out.extend_from_slice(&v.to_be_bytes());
        }
        StructuredValue::UInt(v) => {
            out.push(TYPE_UINT);
            out.extend_from_slice(&v.to_be_bytes());
        }
        StructuredValue::Buffer(bytes) => {
            out.push(TYPE_BUFFER);
            write_len(bytes.len(), out)?;
            out.extend_from_slice(bytes);
        }
        StructuredValue::Bool(true) => out.push(TYPE_TRUE),
        StructuredValue::Bool(false) => out.push(TYPE_FALSE),
        StructuredValue::PrincipalStandard(address) => {
            out.push(TYPE_PRINCIPAL_STANDARD);
            write_standard_principal(address, out)?;
        }
        StructuredValue::PrincipalContract(id) => {
            let (address, name) = id
                .split_once('.')
                .ok_or_else(|| WireError::InvalidName(id.clone()))?;
            out.push(TYPE_PRINCIPAL_CONTRACT);
            write_standard_principal(address, out)?;
            write_name(name, out)?;
        }
        StructuredValue::ResponseOk(inner) => {
            out.push(TYPE_RESPONSE_OK);
            write_value(inner, out)?;
        }
        StructuredValue::ResponseErr(inner) => {
            out.push(TYPE_RESPONSE_ERR);
            write_value(inner, out)?;
        }
        StructuredValue::OptionalNone => out.push(TYPE_OPTIONAL_NONE),
        StructuredValue::OptionalSome(inner) => {
            out.push(TYPE_OPTIONAL_SOME);
            write_value(inner, out)?;
        }
        StructuredValue::List(items) => {
            out.push(TYPE_LIST);
            write_len(items.len(), out)?;
            for item in items {
                write_value(item, out)?;
            }
        }
        StructuredValue::Tuple(fields) => {
            out.push(TYPE_TUPLE);
            write_len(fields.len(), out)?;
            // BTreeMap iterates in key order.
            for (key, field) in fields {
                write_name(key, out)?;
                write_value(field, out)?;
            }
        }
        StructuredValue::StringAscii(s) => {
            if !s.is_ascii() {
                return Err(WireError::InvalidAscii);
            }
            out.push(TYPE_STRING_ASCII);
            write_len(s.len(), out)?;
            out.extend_from_slice(s.as_bytes());
        }
        StructuredValue::StringUtf8(s) => {
            out.push(TYPE_STRING_UTF8);
            write_len(s.len(), out)?;
            out.extend_from_slice(s.as_bytes());
        }
    }
    Ok(())
}

struct Reader<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    fn take(&mut self, n: usize) -> Result<&'a [u8], WireError> {
        let end = self
            .pos
            .checked_add(n)
            .filter(|end| *end <= self.bytes.len())
            .ok_or(WireError::UnexpectedEnd(self.pos))?;
        let slice = &self.bytes[self.pos..end];
        self.pos = end;
        Ok(slice)
    }

    fn byte(&mut self) -> Result<u8, WireError> {
        Ok(self.take(1)?[0])
    }

    fn u32(&mut self) -> Result<usize, WireError> {
        let mut buf = [0u8; 4];
        buf.copy_from_slice(self.take(4)?);
        Ok(u32::from_be_bytes(buf) as usize)
    }

    fn sixteen(&mut self) -> Result<[u8; 16], WireError> {
        let mut buf = [0u8; 16];
        buf.copy_from_slice(self.take(16)?);
        Ok(buf)
    }

    fn name(&mut self) -> Result<String, WireError> {
        let len = self.byte()? as usize;
        let raw = self.take(len)?;
        if !raw.is_ascii() {
            return Err(WireError::InvalidName(
                String::from_utf8_lossy(raw).into_owned(),
            ));
        }
        Ok(String::from_utf8_lossy(raw).into_owned())
    }

    fn standard_principal(&mut self) -> Result<String, WireError> {
        let version = self.byte()?;
        let mut hash160 = [0u8; 20];
        hash160.copy_from_slice(self.take(20)?);
        Ok(encode_address(version, &hash160)?)
    }

    fn read_value(&mut self, depth: usize) -> Result<StructuredValue, WireError> {
        if depth > MAX_DEPTH {
            return Err(WireError::TooDeep);
        }
        let prefix = self.byte()?;
        let value = match prefix {
            TYPE_INT => StructuredValue::Int(i128::from_be_bytes(self.sixteen()?)),
            TYPE_UINT => StructuredValue::UInt(u128::from_be_bytes(self.sixteen()?)),
            TYPE_BUFFER => {
                let len = self.u32()?;
                StructuredValue::Buffer(self.take(len)?.to_vec())
            }
            TYPE_TRUE => StructuredValue::Bool(true),
            TYPE_FALSE => StructuredValue::Bool(false),
            TYPE_PRINCIPAL_STANDARD => {
                StructuredValue::PrincipalStandard(self.standard_principal()?)
            }
            TYPE_PRINCIPAL_CONTRACT => {
                let address = self.standard_principal()?;
                let name = self.name()?;
                StructuredValue::PrincipalContract(format!("{address}.{name}"))
            }
            TYPE_RESPONSE_OK => StructuredValue::ResponseOk(Box::new(self.read_value(depth + 1)?)),
            TYPE_RESPONSE_ERR => {
                StructuredValue::ResponseErr(Box::new(self.read_value(depth + 1)?))
            }
            TYPE_OPTIONAL_NONE => StructuredValue::OptionalNone,
            TYPE_OPTIONAL_SOME => {
                StructuredValue::OptionalSome(Box::new(self.read_value(depth + 1)?))
            }
            TYPE_LIST => {
                let count = self.u32()?;
                // Every element takes at least one byte.
                if count > self.bytes.len() - self.pos {
                    return Err(WireError::UnexpectedEnd(self.pos));
                }
                let mut items = Vec::with_capacity(count);
                for _ in 0..count {
                    items.push(self.read_value(depth + 1)?);
                }
                StructuredValue::List(items)
            }
            TYPE_TUPLE => {
                let count = self.u32()?;
                let mut fields = BTreeMap::new();
                for _ in 0..count {
                    let key = self.name()?;
                    if fields.contains_key(&key) {
                        return Err(WireError::DuplicateKey(key));
                    }
                    let field = self.read_value(depth + 1)?;
                    fields.insert(key, field);
                }
                StructuredValue::Tuple(fields)
            }
            TYPE_STRING_ASCII => {
                let len = self.u32()?;
                let raw = self.take(len)?;
                if !raw.is_ascii() {
                    return Err(WireError::InvalidAscii);
                }
                StructuredValue::StringAscii(String::from_utf8_lossy(raw).into_owned())
            }
            TYPE_STRING_UTF8 => {
                let len = self.u32()?;
                let raw = self.take(len)?;
                let s = std::str::from_utf8(raw).map_err(|_| WireError::InvalidUtf8)?;
                StructuredValue::StringUtf8(s.to_string())
            }
            other => return Err(WireError::UnknownType(other)),
        };
        Ok(value)
    }
}
