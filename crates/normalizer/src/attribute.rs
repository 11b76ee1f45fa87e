//! Tagged attribute deserializer
//!
//! `S` -> string, `N` -> `Decimal` (or `WideNumber` past its precision),
//! `M` -> nested map, `L` -> list. Every other tag is omitted from maps and
//! becomes a null placeholder inside lists, so list positions are kept.

use std::str::FromStr;

use contracts::{
    AttributeMap, AttributeValue, ParseNumberError, TaggedAttribute, TaggedMap, WideNumber,
};
use rust_decimal::Decimal;

use crate::error::AttributeError;

/// Unwrap a full tagged attribute map
///
/// An empty input yields an empty map.
///
/// # Errors
/// Returns `AttributeError::InvalidNumber` if an `N` value is not numeric,
/// `AttributeError::NumberOutOfRange` if it is beyond 1E-130..1E+125.
pub fn deserialize_item(item: &TaggedMap) -> Result<AttributeMap, AttributeError> {
    deserialize_map_at(item, "")
}

/// Unwrap a single tagged attribute
///
/// Returns `Ok(None)` for unsupported tags.
pub fn deserialize_attribute(
    attribute: &TaggedAttribute,
) -> Result<Option<AttributeValue>, AttributeError> {
    deserialize_at(attribute, "")
}

fn deserialize_map_at(item: &TaggedMap, prefix: &str) -> Result<AttributeMap, AttributeError> {
    let mut out = AttributeMap::new();
    for (name, attribute) in item {
        let path = if prefix.is_empty() {
            name.clone()
        } else {
            format!("{prefix}.{name}")
        };
        if let Some(value) = deserialize_at(attribute, &path)? {
            out.insert(name.clone(), value);
        }
    }
    Ok(out)
}

fn deserialize_at(
    attribute: &TaggedAttribute,
    path: &str,
) -> Result<Option<AttributeValue>, AttributeError> {
    let value = match attribute {
        TaggedAttribute::S(s) => AttributeValue::String(s.clone()),
        TaggedAttribute::N(n) => parse_number(n, path)?,
        TaggedAttribute::M(m) => AttributeValue::Map(deserialize_map_at(m, path)?),
        TaggedAttribute::L(items) => {
            let mut list = Vec::with_capacity(items.len());
            for (idx, item) in items.iter().enumerate() {
                let value = deserialize_at(item, &format!("{path}[{idx}]"))?;
                list.push(value.unwrap_or(AttributeValue::Null));
            }
            AttributeValue::List(list)
        }
        TaggedAttribute::Unsupported { .. } => return Ok(None),
    };
    Ok(Some(value))
}

/// Plain (`12.5`) or scientific (`1.25E1`) notation
fn parse_number(raw: &str, path: &str) -> Result<AttributeValue, AttributeError> {
    let trimmed = raw.trim();
    if let Ok(n) = Decimal::from_str(trimmed).or_else(|_| Decimal::from_scientific(trimmed)) {
        return Ok(AttributeValue::Number(n));
    }
    match WideNumber::from_str(trimmed) {
        Ok(n) => Ok(AttributeValue::WideNumber(n)),
        Err(ParseNumberError::NotNumeric) => Err(AttributeError::invalid_number(path, raw)),
        Err(ParseNumberError::OutOfRange) => Err(AttributeError::number_out_of_range(path, raw)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::to_tagged_map;

    fn tagged(json: &str) -> TaggedMap {
        serde_json::from_str(json).unwrap()
    }

    fn dec(s: &str) -> AttributeValue {
        AttributeValue::Number(Decimal::from_str(s).unwrap())
    }

    #[test]
    fn test_scalars() {
        let out = deserialize_item(&tagged(r#"{"name": {"S": "Ann"}, "age": {"N": "30"}}"#)).unwrap();
        assert_eq!(out["name"], AttributeValue::from("Ann"));
        assert_eq!(out["age"], dec("30"));
    }

    #[test]
    fn test_number_keeps_precision() {
        let out = deserialize_item(&tagged(r#"{"v": {"N": "0.1000000000000000055511151231"}}"#))
            .unwrap();
        assert_eq!(out["v"], dec("0.1000000000000000055511151231"));
    }

    #[test]
    fn test_scientific_number() {
        let out = deserialize_item(&tagged(r#"{"v": {"N": "1.5e3"}}"#)).unwrap();
        assert_eq!(out["v"], dec("1500"));
    }

    #[test]
    fn test_nested_map_and_list() {
        let out = deserialize_item(&tagged(
            r#"{"outer": {"M": {"a": {"L": [{"S": "x"}, {"N": "1"}]}}}}"#,
        ))
        .unwrap();

        let AttributeValue::Map(outer) = &out["outer"] else {
            panic!("expected map");
        };
        assert_eq!(outer["a"], AttributeValue::List(vec!["x".into(), dec("1")]));
        assert_eq!(
            serde_json::to_string(&out["outer"]).unwrap(),
            r#"{"a":["x",1]}"#
        );
    }

    #[test]
    fn test_list_of_maps() {
        let out = deserialize_item(&tagged(
            r#"{"tags": {"L": [{"M": {"k": {"S": "v"}}}, {"L": [{"N": "2.5"}]}]}}"#,
        ))
        .unwrap();
        assert_eq!(
            serde_json::to_string(&out["tags"]).unwrap(),
            r#"[{"k":"v"},[2.5]]"#
        );
    }

    #[test]
    fn test_empty_input() {
        assert!(deserialize_item(&TaggedMap::new()).unwrap().is_empty());
    }

    #[test]
    fn test_wide_numbers_are_kept() {
        let out = deserialize_item(&tagged(
            r#"{
                "big": {"N": "12345678901234567890123456789012345678"},
                "sci": {"N": "1E+30"},
                "tiny": {"N": "1E-130"}
            }"#,
        ))
        .unwrap();

        assert!(matches!(out["big"], AttributeValue::WideNumber(_)));
        assert_eq!(
            serde_json::to_string(&out).unwrap(),
            r#"{"big":12345678901234567890123456789012345678,"sci":1000000000000000000000000000000,"tiny":1e-130}"#
        );
    }

    #[test]
    fn test_number_beyond_stream_range() {
        let err = deserialize_item(&tagged(r#"{"v": {"N": "1E+126"}}"#)).unwrap_err();
        assert_eq!(err, AttributeError::number_out_of_range("v", "1E+126"));
    }

    #[test]
    fn test_unsupported_tags_are_omitted() {
        let out = deserialize_item(&tagged(
            r#"{
                "name": {"S": "Ann"},
                "active": {"BOOL": true},
                "nothing": {"NULL": true},
                "blob": {"B": "AAEC"},
                "set": {"SS": ["a"]},
                "mixed": {"L": [{"S": "x"}, {"BOOL": false}, {"N": "3"}]}
            }"#,
        ))
        .unwrap();

        assert_eq!(out.len(), 2);
        assert!(out.contains_key("name"));
        assert_eq!(
            out["mixed"],
            AttributeValue::List(vec!["x".into(), AttributeValue::Null, dec("3")])
        );
    }

    #[test]
    fn test_unsupported_list_element_keeps_position() {
        let out = deserialize_item(&tagged(
            r#"{"l": {"L": [{"S": "a"}, {"NULL": true}, {"S": "c"}]}}"#,
        ))
        .unwrap();
        assert_eq!(serde_json::to_string(&out).unwrap(), r#"{"l":["a",null,"c"]}"#);
    }

    #[test]
    fn test_single_attribute_unwrap() {
        let attr: TaggedAttribute = serde_json::from_str(r#"{"BOOL": true}"#).unwrap();
        assert_eq!(deserialize_attribute(&attr).unwrap(), None);

        let attr: TaggedAttribute = serde_json::from_str(r#"{"S": "x"}"#).unwrap();
        assert_eq!(deserialize_attribute(&attr).unwrap(), Some("x".into()));
    }

    #[test]
    fn test_invalid_number_reports_path() {
        let err = deserialize_item(&tagged(r#"{"m": {"M": {"l": {"L": [{"N": "abc"}]}}}}"#))
            .unwrap_err();
        assert_eq!(err, AttributeError::invalid_number("m.l[0]", "abc"));
    }

    #[test]
    fn test_redeserialize_is_stable() {
        let input = tagged(
            r#"{
                "name": {"S": "Ann"},
                "score": {"N": "12.50"},
                "profile": {"M": {"langs": {"L": [{"S": "rust"}, {"N": "7"}, {"BOOL": true}]}}},
                "wide": {"N": "-1.5E+40"}
            }"#,
        );
        let first = deserialize_item(&input).unwrap();
        let second = deserialize_item(&to_tagged_map(&first)).unwrap();
        assert_eq!(first, second);
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }
}
