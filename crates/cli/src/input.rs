//! Invocation payload reading.

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use std::io::Read;
use std::path::Path;

/// Read a JSON payload from a file, or stdin for `None` / `-`
pub fn read_payload<T: DeserializeOwned>(path: Option<&Path>) -> Result<T> {
    let content = match path {
        Some(path) if path != Path::new("-") => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?,
        _ => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read stdin")?;
            buf
        }
    };

    parse_payload(&content, path)
}

fn parse_payload<T: DeserializeOwned>(content: &str, path: Option<&Path>) -> Result<T> {
    let source = path.map_or_else(|| "stdin".to_string(), |p| p.display().to_string());
    serde_json::from_str(content).with_context(|| format!("Invalid JSON payload in {source}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::StreamBatch;
    use std::io::Write;

    #[test]
    fn test_read_payload_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(br#"{"Records":[{"eventName":"INSERT","dynamodb":{"Keys":{"user_id":{"S":"u1"}}}}]}"#)
            .unwrap();

        let batch: StreamBatch = read_payload(Some(file.path())).unwrap();
        assert_eq!(batch.records.len(), 1);
    }

    #[test]
    fn test_invalid_payload_names_source() {
        let err = parse_payload::<StreamBatch>("not json", Some(Path::new("batch.json")))
            .unwrap_err();
        assert!(err.to_string().contains("batch.json"));
    }
}
