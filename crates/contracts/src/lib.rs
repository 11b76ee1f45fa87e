//! # Contracts
//!
//! Frozen interface contracts shared by every crate in the relay.
//! Business crates depend only on this crate, never on each other's internals.
//!
//! ## Data Flow
//! - `StreamBatch` (wire) -> normalizer -> `EnvelopeRecord` lines -> `DeliveryStream`s
//! - `ObjectLandedEvent` (wire) -> crawler trigger

mod config;
mod envelope;
mod error;
mod number;
mod sink;
mod value;
mod wire;

pub use config::*;
pub use envelope::*;
pub use error::*;
pub use number::*;
pub use sink::*;
pub use value::*;
pub use wire::*;
