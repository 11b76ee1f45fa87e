//! Dispatcher error types

use contracts::{ContractError, SinkRole};
use thiserror::Error;

/// Dispatcher-specific errors
#[derive(Debug, Error)]
pub enum DispatcherError {
    /// Sink creation error
    #[error("failed to create sink '{name}': {message}")]
    SinkCreation { name: String, message: String },

    /// A submission call could not complete; later sinks were not attempted
    #[error("{role} sink '{sink_name}' submission failed: {source}")]
    Delivery {
        role: SinkRole,
        sink_name: String,
        #[source]
        source: ContractError,
    },

    /// Contract error
    #[error("sink error: {0}")]
    Contract(#[from] ContractError),

    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl DispatcherError {
    /// Create a sink creation error
    pub fn sink_creation(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::SinkCreation {
            name: name.into(),
            message: message.into(),
        }
    }

    /// Create a delivery error
    pub fn delivery(role: SinkRole, sink_name: impl Into<String>, source: ContractError) -> Self {
        Self::Delivery {
            role,
            sink_name: sink_name.into(),
            source,
        }
    }
}
