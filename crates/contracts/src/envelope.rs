//! EnvelopeRecord - normalizer output
//!
//! Fixed schema written to both delivery streams, one JSON object per line.

use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::{AttributeMap, ContractError};

/// Attribute holding the primary key in every source item
pub const PRIMARY_KEY_FIELD: &str = "user_id";

/// Layout of `processing_timestamp` (UTC)
pub const PROCESSING_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Change type tag written to `cdc_type`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChangeType {
    #[serde(rename = "I")]
    Insert,
    #[serde(rename = "U")]
    Update,
    #[serde(rename = "D")]
    Delete,
}

impl ChangeType {
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Insert => "I",
            Self::Update => "U",
            Self::Delete => "D",
        }
    }
}

/// Normalized change record
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnvelopeRecord {
    /// Never empty
    #[serde(rename = "user_id")]
    pub primary_key: String,

    #[serde(rename = "cdc_type")]
    pub change_type: ChangeType,

    /// Shared by every record of one batch
    pub processing_timestamp: String,

    /// Source item without the primary key field
    #[serde(rename = "user_attributes")]
    pub attributes: AttributeMap,
}

impl EnvelopeRecord {
    /// Single-line JSON object
    pub fn to_json(&self) -> Result<String, ContractError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Single-line JSON object plus trailing newline, as UTF-8 bytes
    pub fn to_line(&self) -> Result<Bytes, ContractError> {
        let mut line = serde_json::to_vec(self)?;
        line.push(b'\n');
        Ok(Bytes::from(line))
    }
}

/// Fixed-shape invocation result
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvocationResult {
    #[serde(rename = "statusCode")]
    pub status_code: u16,
    pub body: String,
}

impl InvocationResult {
    /// Success result; the body is always plain text
    pub fn ok(body: impl Into<String>) -> Self {
        Self {
            status_code: 200,
            body: body.into(),
        }
    }

    /// Result of a change batch, counting events examined rather than delivered
    pub fn processed(examined: usize) -> Self {
        Self::ok(format!("Processed {examined} records."))
    }
}
