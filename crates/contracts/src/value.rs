//! Normalized attribute tree
//!
//! Numbers stay `Decimal` until serialization, or `WideNumber` when they do
//! not fit. On output a number with no fractional part is written as an exact
//! integer literal, anything else as a float literal (lossy past f64
//! precision).

use std::collections::BTreeMap;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::ser::Error as _;
use serde::{Serialize, Serializer};
use serde_json::value::RawValue;

use crate::{TaggedAttribute, TaggedMap, WideNumber};

/// Field name -> normalized value
pub type AttributeMap = BTreeMap<String, AttributeValue>;

/// Plain value produced by unwrapping a tagged attribute
#[derive(Debug, Clone, PartialEq)]
pub enum AttributeValue {
    String(String),
    Number(Decimal),
    /// Number outside `Decimal` precision or range
    WideNumber(WideNumber),
    Map(AttributeMap),
    List(Vec<AttributeValue>),
    /// Placeholder for an unsupported list element; never a map value
    Null,
}

impl AttributeValue {
    /// Re-encode into the tagged wire shape
    pub fn to_tagged(&self) -> TaggedAttribute {
        match self {
            Self::String(s) => TaggedAttribute::S(s.clone()),
            Self::Number(n) => TaggedAttribute::N(n.normalize().to_string()),
            Self::WideNumber(n) => TaggedAttribute::N(n.to_string()),
            Self::Map(m) => TaggedAttribute::M(to_tagged_map(m)),
            Self::List(l) => TaggedAttribute::L(l.iter().map(Self::to_tagged).collect()),
            Self::Null => TaggedAttribute::Unsupported {
                tag: "NULL".to_string(),
            },
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }
}

/// Re-encode a normalized map into the tagged wire shape
pub fn to_tagged_map(map: &AttributeMap) -> TaggedMap {
    map.iter().map(|(k, v)| (k.clone(), v.to_tagged())).collect()
}

impl From<&str> for AttributeValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for AttributeValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<Decimal> for AttributeValue {
    fn from(value: Decimal) -> Self {
        Self::Number(value)
    }
}

impl From<WideNumber> for AttributeValue {
    fn from(value: WideNumber) -> Self {
        Self::WideNumber(value)
    }
}

impl Serialize for AttributeValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::String(s) => serializer.serialize_str(s),
            Self::Number(n) => serialize_decimal(n, serializer),
            Self::WideNumber(n) => serialize_wide(n, serializer),
            Self::Map(m) => m.serialize(serializer),
            Self::List(l) => l.serialize(serializer),
            Self::Null => serializer.serialize_unit(),
        }
    }
}

fn serialize_decimal<S: Serializer>(value: &Decimal, serializer: S) -> Result<S::Ok, S::Error> {
    // Every Decimal integer fits in i128.
    if value.fract().is_zero() {
        if let Some(i) = value.to_i128() {
            return serializer.serialize_i128(i);
        }
    }
    let f = value
        .to_f64()
        .ok_or_else(|| S::Error::custom(format!("number {value} has no f64 form")))?;
    serializer.serialize_f64(f)
}

fn serialize_wide<S: Serializer>(value: &WideNumber, serializer: S) -> Result<S::Ok, S::Error> {
    if let Some(literal) = value.integer_literal() {
        if let Ok(i) = literal.parse::<i128>() {
            return serializer.serialize_i128(i);
        }
        // Past i128 the digits are written verbatim.
        return RawValue::from_string(literal)
            .map_err(S::Error::custom)?
            .serialize(serializer);
    }
    let f = value
        .to_f64()
        .ok_or_else(|| S::Error::custom(format!("number {value} has no f64 form")))?;
    serializer.serialize_f64(f)
}
