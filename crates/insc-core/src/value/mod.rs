//! Structured value model returned by read-only queries and used as call arguments.

pub mod c32;
pub mod wire;

use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};

/// Tagged value as produced by the ledger's query interface.
///
/// Tuples keep their keys ordered, which is also the order the wire codec
/// serializes them in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StructuredValue {
    Int(i128),
    UInt(u128),
    Buffer(Vec<u8>),
    StringAscii(String),
    StringUtf8(String),
    Bool(bool),
    OptionalSome(Box<StructuredValue>),
    OptionalNone,
    ResponseOk(Box<StructuredValue>),
    ResponseErr(Box<StructuredValue>),
    Tuple(BTreeMap<String, StructuredValue>),
    List(Vec<StructuredValue>),
    PrincipalStandard(String),
    PrincipalContract(String),
}

/// Variant name of a [`StructuredValue`], used in decode errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueTag {
    Int,
    UInt,
    Buffer,
    StringAscii,
    StringUtf8,
    BoolTrue,
    BoolFalse,
    OptionalSome,
    OptionalNone,
    ResponseOk,
    ResponseErr,
    Tuple,
    List,
    PrincipalStandard,
    PrincipalContract,
}

impl ValueTag {
    pub fn as_str(&self) -> &'static str {
        match self {
            ValueTag::Int => "int",
            ValueTag::UInt => "uint",
            ValueTag::Buffer => "buffer",
            ValueTag::StringAscii => "string-ascii",
            ValueTag::StringUtf8 => "string-utf8",
            ValueTag::BoolTrue => "true",
            ValueTag::BoolFalse => "false",
            ValueTag::OptionalSome => "some",
            ValueTag::OptionalNone => "none",
            ValueTag::ResponseOk => "ok",
            ValueTag::ResponseErr => "err",
            ValueTag::Tuple => "tuple",
            ValueTag::List => "list",
            ValueTag::PrincipalStandard => "principal-standard",
            ValueTag::PrincipalContract => "principal-contract",
        }
    }
}

impl Display for ValueTag {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl StructuredValue {
    pub fn tag(&self) -> ValueTag {
        match self {
            StructuredValue::Int(_) => ValueTag::Int,
            StructuredValue::UInt(_) => ValueTag::UInt,
            StructuredValue::Buffer(_) => ValueTag::Buffer,
            StructuredValue::StringAscii(_) => ValueTag::StringAscii,
            StructuredValue::StringUtf8(_) => ValueTag::StringUtf8,
            StructuredValue::Bool(true) => ValueTag::BoolTrue,
            StructuredValue::Bool(false) => ValueTag::BoolFalse,
            StructuredValue::OptionalSome(_) => ValueTag::OptionalSome,
            StructuredValue::OptionalNone => ValueTag::OptionalNone,
            StructuredValue::ResponseOk(_) => ValueTag::ResponseOk,
            StructuredValue::ResponseErr(_) => ValueTag::ResponseErr,
            StructuredValue::Tuple(_) => ValueTag::Tuple,
            StructuredValue::List(_) => ValueTag::List,
            StructuredValue::PrincipalStandard(_) => ValueTag::PrincipalStandard,
            StructuredValue::PrincipalContract(_) => ValueTag::PrincipalContract,
        }
    }

    pub fn uint(value: impl Into<u128>) -> Self {
        StructuredValue::UInt(value.into())
    }

    pub fn buffer(bytes: impl Into<Vec<u8>>) -> Self {
        StructuredValue::Buffer(bytes.into())
    }

    pub fn ascii(value: impl Into<String>) -> Self {
        StructuredValue::StringAscii(value.into())
    }

    pub fn some(value: StructuredValue) -> Self {
        StructuredValue::OptionalSome(Box::new(value))
    }

    pub fn none() -> Self {
        StructuredValue::OptionalNone
    }

    pub fn ok(value: StructuredValue) -> Self {
        StructuredValue::ResponseOk(Box::new(value))
    }

    pub fn err(value: StructuredValue) -> Self {
        StructuredValue::ResponseErr(Box::new(value))
    }

    pub fn list(items: impl IntoIterator<Item = StructuredValue>) -> Self {
        StructuredValue::List(items.into_iter().collect())
    }

    pub fn tuple<K: Into<String>>(fields: impl IntoIterator<Item = (K, StructuredValue)>) -> Self {
        StructuredValue::Tuple(fields.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    /// Build a principal from its textual form.
    ///
    /// `<address>.<name>` becomes a contract principal, anything else a
    /// standard principal. The address is not validated here; the wire codec
    /// does that when the value is serialized.
    pub fn principal(value: impl Into<String>) -> Self {
        let value = value.into();
        if value.contains('.') {
            StructuredValue::PrincipalContract(value)
        } else {
            StructuredValue::PrincipalStandard(value)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn principal_constructor_picks_variant_by_dot() {
        assert_eq!(
            StructuredValue::principal("SP000000000000000000002Q6VF78").tag(),
            ValueTag::PrincipalStandard
        );
        assert_eq!(
            StructuredValue::principal("SP000000000000000000002Q6VF78.pox").tag(),
            ValueTag::PrincipalContract
        );
    }

    #[test]
    fn bool_tags_follow_value() {
        assert_eq!(StructuredValue::Bool(true).tag().as_str(), "true");
        assert_eq!(StructuredValue::Bool(false).tag().as_str(), "false");
    }

    #[test]
    fn tuple_keys_are_ordered() {
        let value = StructuredValue::tuple([
            ("sealed", StructuredValue::Bool(true)),
            ("mime-type", StructuredValue::ascii("image/png")),
        ]);
        let StructuredValue::Tuple(map) = value else {
            panic!("expected tuple");
        };
        let keys: Vec<_> = map.keys().cloned().collect();
        assert_eq!(keys, vec!["mime-type".to_string(), "sealed".to_string()]);
    }
}
