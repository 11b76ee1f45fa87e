//! FileSink - appends record batches to a local JSON-lines file

use bytes::Bytes;
use contracts::{ContractError, DeliveryStream, PutBatchResponse};
use std::collections::HashMap;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, error, instrument};

/// Configuration for FileSink
#[derive(Debug, Clone)]
pub struct FileSinkConfig {
    /// Output directory
    pub base_path: PathBuf,
}

impl FileSinkConfig {
    /// Create config from params map
    pub fn from_params(params: &HashMap<String, String>) -> Self {
        let base_path = params
            .get("base_path")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("./output"));

        Self { base_path }
    }
}

/// Sink that appends every record to `<base_path>/<name>.jsonl`
///
/// Records are written as-is; they already carry their newline delimiter.
pub struct FileSink {
    name: String,
    path: PathBuf,
}

impl FileSink {
    /// Create a new FileSink
    pub fn new(name: impl Into<String>, config: FileSinkConfig) -> std::io::Result<Self> {
        fs::create_dir_all(&config.base_path)?;

        let name = name.into();
        let path = config.base_path.join(format!("{name}.jsonl"));
        Ok(Self { name, path })
    }

    /// Create from params map (for factory)
    pub fn from_params(
        name: impl Into<String>,
        params: &HashMap<String, String>,
    ) -> std::io::Result<Self> {
        let config = FileSinkConfig::from_params(params);
        Self::new(name, config)
    }

    /// Output file path
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn append(&self, records: &[Bytes]) -> std::io::Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        for record in records {
            file.write_all(record)?;
        }
        file.flush()
    }
}

impl DeliveryStream for FileSink {
    fn name(&self) -> &str {
        &self.name
    }

    #[instrument(
        name = "file_sink_put_record_batch",
        skip(self, records),
        fields(sink = %self.name, records = records.len())
    )]
    async fn put_record_batch(
        &mut self,
        records: &[Bytes],
    ) -> Result<PutBatchResponse, ContractError> {
        self.append(records).map_err(|e| {
            error!(sink = %self.name, path = %self.path.display(), error = %e, "Write failed");
            ContractError::sink_delivery(&self.name, e.to_string())
        })?;
        debug!(sink = %self.name, path = %self.path.display(), "Batch appended");
        Ok(PutBatchResponse::accepted())
    }
}
