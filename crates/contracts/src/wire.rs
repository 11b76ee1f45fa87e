//! Wire shapes consumed by the relay
//!
//! - `StreamBatch` / `ChangeEvent`: change stream batch (DynamoDB Streams JSON)
//! - `TaggedAttribute`: self-describing `{"<tag>": <value>}` attribute encoding
//! - `ObjectLandedEvent`: object-created notification for the crawler trigger

use std::collections::BTreeMap;
use std::fmt;

use serde::de::{self, IgnoredAny, MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Field name -> tagged attribute
pub type TaggedMap = BTreeMap<String, TaggedAttribute>;

/// One type-tagged attribute
///
/// Only `S`, `N`, `M` and `L` carry data through the relay. Every other tag
/// (`B`, `BOOL`, `NULL`, `SS`, `NS`, `BS`, ...) decodes to `Unsupported`; the
/// deserializer drops it from maps and turns it into null inside lists.
#[derive(Debug, Clone, PartialEq)]
pub enum TaggedAttribute {
    /// `{"S": "text"}`
    S(String),
    /// `{"N": "123.45"}`, kept as the raw numeric string
    N(String),
    /// `{"M": {...}}`
    M(TaggedMap),
    /// `{"L": [...]}`
    L(Vec<TaggedAttribute>),
    /// Any other tag; the raw value is discarded
    Unsupported { tag: String },
}

impl TaggedAttribute {
    /// Wire tag of this attribute
    pub fn tag(&self) -> &str {
        match self {
            Self::S(_) => "S",
            Self::N(_) => "N",
            Self::M(_) => "M",
            Self::L(_) => "L",
            Self::Unsupported { tag } => tag,
        }
    }
}

impl<'de> Deserialize<'de> for TaggedAttribute {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(TaggedAttributeVisitor)
    }
}

struct TaggedAttributeVisitor;

impl<'de> Visitor<'de> for TaggedAttributeVisitor {
    type Value = TaggedAttribute;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a single-key type-tagged attribute object")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
        let Some(tag) = map.next_key::<String>()? else {
            return Ok(TaggedAttribute::Unsupported { tag: String::new() });
        };

        let attribute = match tag.as_str() {
            "S" => TaggedAttribute::S(map.next_value()?),
            "N" => TaggedAttribute::N(map.next_value()?),
            "M" => TaggedAttribute::M(map.next_value()?),
            "L" => TaggedAttribute::L(map.next_value()?),
            _ => {
                map.next_value::<IgnoredAny>()?;
                TaggedAttribute::Unsupported { tag }
            }
        };

        // A well-formed attribute has exactly one tag; extra keys are ignored.
        while map.next_entry::<IgnoredAny, IgnoredAny>()?.is_some() {}

        Ok(attribute)
    }
}

impl Serialize for TaggedAttribute {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        match self {
            Self::S(v) => map.serialize_entry("S", v)?,
            Self::N(v) => map.serialize_entry("N", v)?,
            Self::M(v) => map.serialize_entry("M", v)?,
            Self::L(v) => map.serialize_entry("L", v)?,
            Self::Unsupported { tag } => map.serialize_entry(tag, &())?,
        }
        map.end()
    }
}

/// Change stream event name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum EventName {
    Insert,
    Modify,
    Remove,
    /// Anything the stream may add later
    #[serde(other)]
    Unknown,
}

impl EventName {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Insert => "INSERT",
            Self::Modify => "MODIFY",
            Self::Remove => "REMOVE",
            Self::Unknown => "UNKNOWN",
        }
    }
}

impl fmt::Display for EventName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One batch delivered by the change stream
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StreamBatch {
    #[serde(rename = "Records")]
    pub records: Vec<ChangeEvent>,
}

/// One change event
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeEvent {
    #[serde(rename = "eventID", default, skip_serializing_if = "Option::is_none")]
    pub event_id: Option<String>,

    pub event_name: EventName,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_source: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aws_region: Option<String>,

    pub dynamodb: StreamRecord,
}

/// Item images carried by a change event
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct StreamRecord {
    /// Key attributes, always present on the wire
    #[serde(default)]
    pub keys: TaggedMap,

    /// Item after the change (INSERT / MODIFY)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_image: Option<TaggedMap>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sequence_number: Option<String>,
}

impl ChangeEvent {
    /// Build an event from its name and images
    pub fn new(event_name: EventName, keys: TaggedMap, new_image: Option<TaggedMap>) -> Self {
        Self {
            event_id: None,
            event_name,
            event_source: None,
            aws_region: None,
            dynamodb: StreamRecord {
                keys,
                new_image,
                sequence_number: None,
            },
        }
    }

    pub fn keys(&self) -> &TaggedMap {
        &self.dynamodb.keys
    }

    pub fn new_image(&self) -> Option<&TaggedMap> {
        self.dynamodb.new_image.as_ref()
    }

    /// Attribute data the envelope is built from: the new image when present
    /// and non-empty, otherwise the keys. `None` when both are empty.
    pub fn source_image(&self) -> Option<&TaggedMap> {
        match self.new_image() {
            Some(image) if !image.is_empty() => Some(image),
            _ if !self.keys().is_empty() => Some(self.keys()),
            _ => None,
        }
    }
}

/// Object-created notification that triggers a catalog re-scan
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ObjectLandedEvent {
    #[serde(rename = "Records", default)]
    pub records: Vec<ObjectLandedRecord>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectLandedRecord {
    #[serde(default)]
    pub event_name: String,
    #[serde(default)]
    pub s3: ObjectLocation,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ObjectLocation {
    #[serde(default)]
    pub bucket: BucketRef,
    #[serde(default)]
    pub object: ObjectRef,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BucketRef {
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ObjectRef {
    #[serde(default)]
    pub key: String,
    #[serde(default)]
    pub size: Option<u64>,
}

impl ObjectLandedEvent {
    /// `bucket/key` for every landed object
    pub fn object_paths(&self) -> Vec<String> {
        self.records
            .iter()
            .map(|r| format!("{}/{}", r.s3.bucket.name, r.s3.object.key))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_tagged_attribute() {
        let attr: TaggedAttribute =
            serde_json::from_str(r#"{"M": {"a": {"L": [{"S": "x"}, {"N": "1"}]}}}"#).unwrap();
        let TaggedAttribute::M(map) = attr else {
            panic!("expected map");
        };
        assert_eq!(
            map["a"],
            TaggedAttribute::L(vec![
                TaggedAttribute::S("x".into()),
                TaggedAttribute::N("1".into())
            ])
        );
    }

    #[test]
    fn test_decode_unsupported_tags() {
        let attr: TaggedAttribute = serde_json::from_str(r#"{"BOOL": true}"#).unwrap();
        assert_eq!(attr.tag(), "BOOL");
        assert!(matches!(attr, TaggedAttribute::Unsupported { .. }));

        let attr: TaggedAttribute = serde_json::from_str(r#"{"SS": ["a", "b"]}"#).unwrap();
        assert!(matches!(attr, TaggedAttribute::Unsupported { .. }));

        let attr: TaggedAttribute = serde_json::from_str("{}").unwrap();
        assert!(matches!(attr, TaggedAttribute::Unsupported { .. }));
    }

    #[test]
    fn test_tagged_attribute_round_trip() {
        let json = r#"{"L":[{"S":"x"},{"N":"1"},{"M":{"k":{"S":"v"}}}]}"#;
        let attr: TaggedAttribute = serde_json::from_str(json).unwrap();
        assert_eq!(serde_json::to_string(&attr).unwrap(), json);
    }

    #[test]
    fn test_decode_stream_batch() {
        let json = r#"{
            "Records": [{
                "eventID": "1",
                "eventName": "INSERT",
                "eventSource": "aws:dynamodb",
                "awsRegion": "us-east-1",
                "dynamodb": {
                    "Keys": {"user_id": {"S": "42"}},
                    "NewImage": {"user_id": {"S": "42"}, "age": {"N": "30"}},
                    "SequenceNumber": "111",
                    "SizeBytes": 26
                }
            }, {
                "eventName": "REMOVE",
                "dynamodb": {"Keys": {"user_id": {"S": "7"}}}
            }, {
                "eventName": "TTL_EXPIRE",
                "dynamodb": {}
            }]
        }"#;
        let batch: StreamBatch = serde_json::from_str(json).unwrap();
        assert_eq!(batch.records.len(), 3);
        assert_eq!(batch.records[0].event_name, EventName::Insert);
        assert_eq!(batch.records[0].new_image().unwrap().len(), 2);
        assert_eq!(batch.records[1].event_name, EventName::Remove);
        assert!(batch.records[1].new_image().is_none());
        assert_eq!(batch.records[2].event_name, EventName::Unknown);
        assert!(batch.records[2].keys().is_empty());
    }

    #[test]
    fn test_source_image_selection() {
        let mut keys = TaggedMap::new();
        keys.insert("user_id".into(), TaggedAttribute::S("1".into()));

        let event = ChangeEvent::new(EventName::Modify, keys.clone(), Some(TaggedMap::new()));
        assert_eq!(event.source_image(), Some(&keys));

        let event = ChangeEvent::new(EventName::Remove, TaggedMap::new(), None);
        assert!(event.source_image().is_none());
    }

    #[test]
    fn test_object_paths() {
        let json = r#"{"Records":[{"eventName":"ObjectCreated:Put","s3":{"bucket":{"name":"lake"},"object":{"key":"users/part-0.parquet","size":10}}}]}"#;
        let event: ObjectLandedEvent = serde_json::from_str(json).unwrap();
        assert_eq!(event.object_paths(), vec!["lake/users/part-0.parquet"]);
    }
}
