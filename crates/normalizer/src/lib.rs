//! # Normalizer
//!
//! Change event normalization.
//!
//! Responsibilities:
//! - Unwrap type-tagged attribute maps into plain value trees
//! - Classify change types and extract the primary key
//! - Build `EnvelopeRecord`s and serialize them as JSON lines
//! - Account for skipped events instead of failing the batch
//!
//! ## Example
//!
//! ```ignore
//! use normalizer::Normalizer;
//!
//! let normalizer = Normalizer::new(config.normalizer.clone());
//! let batch = normalizer.normalize_batch(&stream_batch.records, chrono::Utc::now());
//! dispatcher.dispatch(&batch.records).await?;
//! ```

mod attribute;
mod error;
mod normalize;

pub use attribute::{deserialize_attribute, deserialize_item};
pub use error::AttributeError;
pub use normalize::{NormalizedBatch, Normalizer, RecordOutcome, SkipReason, SkipSummary};

// Re-export contracts types
pub use contracts::{AttributeMap, AttributeValue, ChangeEvent, ChangeType, EnvelopeRecord};
