//! Per-event normalization into `EnvelopeRecord` lines.

use std::fmt;

use bytes::Bytes;
use chrono::{DateTime, Utc};
use contracts::{
    AttributeMap, AttributeValue, ChangeEvent, ChangeType, EnvelopeRecord, EventName,
    NormalizerConfig, PRIMARY_KEY_FIELD, PROCESSING_TIMESTAMP_FORMAT,
};
use tracing::{info, instrument, warn};

use crate::attribute::deserialize_item;

/// Why an event produced no record
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// Neither a new image nor keys
    NoSourceData,
    /// Primary key absent, empty, zero or not a scalar
    MissingPrimaryKey,
    /// Attribute map could not be unwrapped
    MalformedAttribute(String),
    /// Envelope could not be encoded
    Unserializable(String),
}

impl SkipReason {
    /// Stable label for logs and metrics
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NoSourceData => "no_source_data",
            Self::MissingPrimaryKey => "missing_primary_key",
            Self::MalformedAttribute(_) => "malformed_attribute",
            Self::Unserializable(_) => "unserializable",
        }
    }
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MalformedAttribute(detail) | Self::Unserializable(detail) => {
                write!(f, "{}: {}", self.as_str(), detail)
            }
            _ => f.write_str(self.as_str()),
        }
    }
}

/// Result of normalizing one event
#[derive(Debug, Clone, PartialEq)]
pub enum RecordOutcome {
    Emitted(EnvelopeRecord),
    Skipped {
        event_name: EventName,
        reason: SkipReason,
    },
}

/// Skip counts by reason
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SkipSummary {
    pub no_source_data: usize,
    pub missing_primary_key: usize,
    pub malformed_attribute: usize,
    pub unserializable: usize,
}

impl SkipSummary {
    fn record(&mut self, reason: &SkipReason) {
        match reason {
            SkipReason::NoSourceData => self.no_source_data += 1,
            SkipReason::MissingPrimaryKey => self.missing_primary_key += 1,
            SkipReason::MalformedAttribute(_) => self.malformed_attribute += 1,
            SkipReason::Unserializable(_) => self.unserializable += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.no_source_data + self.missing_primary_key + self.malformed_attribute + self.unserializable
    }
}

/// Output of one batch
#[derive(Debug, Clone, Default)]
pub struct NormalizedBatch {
    /// Events examined (emitted + skipped)
    pub examined: usize,
    /// Timestamp stamped on every record of the batch
    pub processing_timestamp: String,
    /// Serialized JSON lines, input order preserved
    pub records: Vec<Bytes>,
    /// One outcome per input event
    pub outcomes: Vec<RecordOutcome>,
    pub skipped: SkipSummary,
}

impl NormalizedBatch {
    pub fn emitted(&self) -> usize {
        self.records.len()
    }
}

/// Change event normalizer
#[derive(Debug, Clone, Default)]
pub struct Normalizer {
    config: NormalizerConfig,
}

impl Normalizer {
    pub fn new(config: NormalizerConfig) -> Self {
        Self { config }
    }

    /// Map a stream event name to the envelope change type
    ///
    /// REMOVE is tagged `U` unless `remove_as_delete` is set. Unknown names
    /// are treated as updates.
    pub fn classify(&self, event_name: EventName) -> ChangeType {
        match event_name {
            EventName::Insert => ChangeType::Insert,
            EventName::Remove if self.config.remove_as_delete => ChangeType::Delete,
            EventName::Modify | EventName::Remove | EventName::Unknown => ChangeType::Update,
        }
    }

    /// Normalize one batch
    ///
    /// The processing timestamp is computed once from `processed_at` and
    /// shared by every record.
    #[instrument(name = "normalizer_normalize_batch", skip(self, events), fields(events = events.len()))]
    pub fn normalize_batch(
        &self,
        events: &[ChangeEvent],
        processed_at: DateTime<Utc>,
    ) -> NormalizedBatch {
        let processing_timestamp = processed_at
            .format(PROCESSING_TIMESTAMP_FORMAT)
            .to_string();

        info!(
            count = events.len(),
            "Received {} records from change stream",
            events.len()
        );
        observability::record_batch_received(events.len());

        let mut batch = NormalizedBatch {
            examined: events.len(),
            processing_timestamp,
            records: Vec::with_capacity(events.len()),
            outcomes: Vec::with_capacity(events.len()),
            skipped: SkipSummary::default(),
        };

        for event in events {
            let outcome = self.normalize_event(event, &batch.processing_timestamp);
            match &outcome {
                RecordOutcome::Emitted(record) => match encode(record) {
                    Ok(line) => {
                        observability::record_record_emitted(record.change_type.tag());
                        batch.records.push(line);
                    }
                    Err(reason) => {
                        warn!(event_name = %event.event_name, %reason, "Skipping record");
                        observability::record_record_skipped(reason.as_str());
                        batch.skipped.record(&reason);
                        batch.outcomes.push(RecordOutcome::Skipped {
                            event_name: event.event_name,
                            reason,
                        });
                        continue;
                    }
                },
                RecordOutcome::Skipped { reason, .. } => {
                    observability::record_record_skipped(reason.as_str());
                    batch.skipped.record(reason);
                }
            }
            batch.outcomes.push(outcome);
        }

        if batch.skipped.total() > 0 {
            info!(
                examined = batch.examined,
                emitted = batch.emitted(),
                no_source_data = batch.skipped.no_source_data,
                missing_primary_key = batch.skipped.missing_primary_key,
                malformed_attribute = batch.skipped.malformed_attribute,
                "Batch normalized with skipped records"
            );
        }

        batch
    }

    /// Normalize one event against a precomputed batch timestamp
    pub fn normalize_event(&self, event: &ChangeEvent, processing_timestamp: &str) -> RecordOutcome {
        let change_type = self.classify(event.event_name);

        let Some(source) = event.source_image() else {
            return RecordOutcome::Skipped {
                event_name: event.event_name,
                reason: SkipReason::NoSourceData,
            };
        };

        let mut attributes = match deserialize_item(source) {
            Ok(attributes) => attributes,
            Err(e) => {
                warn!(
                    event_name = %event.event_name,
                    event_id = event.event_id.as_deref().unwrap_or_default(),
                    error = %e,
                    "Skipping record with malformed attributes"
                );
                return RecordOutcome::Skipped {
                    event_name: event.event_name,
                    reason: SkipReason::MalformedAttribute(e.to_string()),
                };
            }
        };

        let Some(primary_key) = take_primary_key(&mut attributes) else {
            warn!(
                event_name = %event.event_name,
                "Skipping record with missing {}. Event: {}",
                PRIMARY_KEY_FIELD,
                event.event_name
            );
            return RecordOutcome::Skipped {
                event_name: event.event_name,
                reason: SkipReason::MissingPrimaryKey,
            };
        };

        RecordOutcome::Emitted(EnvelopeRecord {
            primary_key,
            change_type,
            processing_timestamp: processing_timestamp.to_string(),
            attributes,
        })
    }
}

/// Remove the primary key field; only a non-empty string or non-zero number
/// counts as present
fn take_primary_key(attributes: &mut AttributeMap) -> Option<String> {
    match attributes.remove(PRIMARY_KEY_FIELD)? {
        AttributeValue::String(key) if !key.is_empty() => Some(key),
        AttributeValue::Number(key) if !key.is_zero() => Some(key.normalize().to_string()),
        AttributeValue::WideNumber(key) if !key.is_zero() => {
            Some(key.integer_literal().unwrap_or_else(|| key.to_string()))
        }
        _ => None,
    }
}

fn encode(record: &EnvelopeRecord) -> Result<Bytes, SkipReason> {
    let line = record
        .to_line()
        .map_err(|e| SkipReason::Unserializable(e.to_string()))?;
    info!(
        cdc_type = record.change_type.tag(),
        user_id = %record.primary_key,
        "Processed Record (Type={}, ID={}): {}",
        record.change_type.tag(),
        record.primary_key,
        String::from_utf8_lossy(line.trim_ascii_end())
    );
    Ok(line)
}
