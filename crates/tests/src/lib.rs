//! # Integration Tests
//!
//! Cross-crate and end-to-end tests.
//!
//! Covers:
//! - Wire contract decoding
//! - Normalizer -> Dispatcher with mock and file sinks
//! - Config -> sinks wiring
//! - Crawler trigger outcomes
//! - Warning and critical diagnostics

#[cfg(test)]
mod contract_tests {
    use contracts::{EventName, StreamBatch, TaggedAttribute};

    #[test]
    fn test_stream_batch_decodes_full_record() {
        let batch: StreamBatch = serde_json::from_str(
            r#"{"Records":[{
                "eventID":"1",
                "eventName":"MODIFY",
                "eventSource":"aws:dynamodb",
                "awsRegion":"us-east-1",
                "dynamodb":{
                    "Keys":{"user_id":{"S":"42"}},
                    "NewImage":{"user_id":{"S":"42"},"active":{"BOOL":true}},
                    "SequenceNumber":"111"
                }
            }]}"#,
        )
        .unwrap();

        let event = &batch.records[0];
        assert_eq!(event.event_name, EventName::Modify);
        assert!(matches!(
            event.new_image().unwrap()["active"],
            TaggedAttribute::Unsupported { .. }
        ));
    }
}

#[cfg(test)]
mod e2e_tests {
    use bytes::Bytes;
    use chrono::{DateTime, TimeZone, Utc};
    use contracts::{InvocationResult, NormalizerConfig, StreamBatch};
    use dispatcher::{BatchDispatcher, CallJournal, DispatcherError, MockBehavior, MockDeliveryStream};
    use normalizer::{Normalizer, SkipReason, RecordOutcome};

    fn processed_at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap()
    }

    fn batch(json: &str) -> StreamBatch {
        serde_json::from_str(json).unwrap()
    }

    fn parse_line(line: &Bytes) -> serde_json::Value {
        assert!(line.ends_with(b"\n"));
        serde_json::from_slice(line).unwrap()
    }

    fn mocks(row: MockBehavior) -> (MockDeliveryStream, MockDeliveryStream, CallJournal) {
        let journal = CallJournal::default();
        (
            MockDeliveryStream::with_behavior("users-json", row).with_journal(journal.clone()),
            MockDeliveryStream::new("users-parquet").with_journal(journal.clone()),
            journal,
        )
    }

    /// Normalize then dispatch, the way one invocation does
    async fn invoke(
        normalizer: &Normalizer,
        dispatcher: &mut BatchDispatcher<MockDeliveryStream>,
        batch: &StreamBatch,
    ) -> Result<InvocationResult, DispatcherError> {
        let normalized = normalizer.normalize_batch(&batch.records, processed_at());
        dispatcher.dispatch(&normalized.records).await?;
        Ok(InvocationResult::processed(normalized.examined))
    }

    #[tokio::test]
    async fn test_three_inserts_reach_both_sinks_in_order() {
        let (row, column, journal) = mocks(MockBehavior::Accept);
        let normalizer = Normalizer::new(NormalizerConfig::default());
        let mut dispatcher = BatchDispatcher::new(row.clone(), column.clone());

        let input = batch(
            r#"{"Records":[
                {"eventName":"INSERT","dynamodb":{"NewImage":{"user_id":{"S":"a"},"n":{"N":"1"}}}},
                {"eventName":"INSERT","dynamodb":{"NewImage":{"user_id":{"S":"b"},"n":{"N":"2"}}}},
                {"eventName":"INSERT","dynamodb":{"NewImage":{"user_id":{"S":"c"},"n":{"N":"3"}}}}
            ]}"#,
        );

        let result = invoke(&normalizer, &mut dispatcher, &input).await.unwrap();
        assert_eq!(result.body, "Processed 3 records.");

        assert_eq!(*journal.lock().unwrap(), vec!["users-json", "users-parquet"]);
        for sink in [&row, &column] {
            let calls = sink.calls();
            assert_eq!(calls.len(), 1);
            let ids: Vec<_> = calls[0]
                .iter()
                .map(|line| parse_line(line)["user_id"].as_str().unwrap().to_string())
                .collect();
            assert_eq!(ids, ["a", "b", "c"]);
        }
    }

    #[tokio::test]
    async fn test_transport_error_on_row_sink_skips_column() {
        let (row, column, journal) = mocks(MockBehavior::CallFailure("connection reset".into()));
        let normalizer = Normalizer::new(NormalizerConfig::default());
        let mut dispatcher = BatchDispatcher::new(row, column.clone());

        let input = batch(
            r#"{"Records":[{"eventName":"INSERT","dynamodb":{"NewImage":{"user_id":{"S":"a"}}}}]}"#,
        );

        let err = invoke(&normalizer, &mut dispatcher, &input)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("connection reset"));
        assert_eq!(column.call_count(), 0);
        assert_eq!(*journal.lock().unwrap(), vec!["users-json"]);
    }

    #[tokio::test]
    async fn test_remove_with_keys_only() {
        let (row, column, _) = mocks(MockBehavior::Accept);
        let normalizer = Normalizer::new(NormalizerConfig::default());
        let mut dispatcher = BatchDispatcher::new(row.clone(), column);

        let input = batch(
            r#"{"Records":[{"eventName":"REMOVE","dynamodb":{"Keys":{"user_id":{"S":"42"}}}}]}"#,
        );
        invoke(&normalizer, &mut dispatcher, &input).await.unwrap();

        let records = row.records();
        assert_eq!(records.len(), 1);
        let record = parse_line(&records[0]);
        assert_eq!(record["user_id"], "42");
        assert_eq!(record["cdc_type"], "U");
        assert_eq!(record["user_attributes"], serde_json::json!({}));
        assert_eq!(record["processing_timestamp"], "2024-01-02 03:04:05");
    }

    #[tokio::test]
    async fn test_missing_key_is_skipped_and_batch_continues() {
        let (row, column, _) = mocks(MockBehavior::Accept);
        let normalizer = Normalizer::new(NormalizerConfig::default());
        let mut dispatcher = BatchDispatcher::new(row.clone(), column);

        let input = batch(
            r#"{"Records":[
                {"eventName":"INSERT","dynamodb":{"Keys":{"id":{"S":"x"}},"NewImage":{"name":{"S":"anon"}}}},
                {"eventName":"INSERT","dynamodb":{"NewImage":{"user_id":{"S":"b"}}}}
            ]}"#,
        );

        let normalized = normalizer.normalize_batch(&input.records, processed_at());
        assert!(matches!(
            normalized.outcomes[0],
            RecordOutcome::Skipped {
                reason: SkipReason::MissingPrimaryKey,
                ..
            }
        ));
        assert_eq!(normalized.skipped.missing_primary_key, 1);

        let result = invoke(&normalizer, &mut dispatcher, &input).await.unwrap();
        assert_eq!(result.body, "Processed 2 records.");
        assert_eq!(row.records().len(), 1);
    }

    #[tokio::test]
    async fn test_empty_batch_makes_no_calls() {
        let (row, column, journal) = mocks(MockBehavior::Accept);
        let normalizer = Normalizer::new(NormalizerConfig::default());
        let mut dispatcher = BatchDispatcher::new(row, column);

        let result = invoke(&normalizer, &mut dispatcher, &StreamBatch::default())
            .await
            .unwrap();

        assert_eq!(result.body, "Processed 0 records.");
        assert!(journal.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_number_formats_and_nesting_survive_delivery() {
        let (row, column, _) = mocks(MockBehavior::Accept);
        let normalizer = Normalizer::new(NormalizerConfig::default());
        let mut dispatcher = BatchDispatcher::new(row.clone(), column);

        let input = batch(
            r#"{"Records":[{"eventName":"INSERT","dynamodb":{"NewImage":{
                "user_id":{"S":"u"},
                "whole":{"N":"100"},
                "fraction":{"N":"100.5"},
                "wide":{"N":"12345678901234567890123456789012345678"},
                "nested":{"M":{"a":{"L":[{"S":"x"},{"NULL":true},{"N":"1"}]}}}
            }}}]}"#,
        );
        invoke(&normalizer, &mut dispatcher, &input).await.unwrap();

        let line = row.records().remove(0);
        let text = std::str::from_utf8(&line).unwrap();
        assert!(text.contains(r#""whole":100"#), "got: {text}");
        assert!(text.contains(r#""fraction":100.5"#), "got: {text}");
        assert!(
            text.contains(r#""wide":12345678901234567890123456789012345678"#),
            "got: {text}"
        );
        assert!(text.contains(r#""nested":{"a":["x",null,1]}"#), "got: {text}");
    }

    #[tokio::test]
    async fn test_partial_failure_is_reported_not_retried() {
        let (row, column, _) = mocks(MockBehavior::PartialFailure(1));
        let normalizer = Normalizer::new(NormalizerConfig::default());
        let mut dispatcher = BatchDispatcher::new(row.clone(), column.clone());

        let input = batch(
            r#"{"Records":[
                {"eventName":"INSERT","dynamodb":{"NewImage":{"user_id":{"S":"a"}}}},
                {"eventName":"INSERT","dynamodb":{"NewImage":{"user_id":{"S":"b"}}}}
            ]}"#,
        );
        let normalized = normalizer.normalize_batch(&input.records, processed_at());
        let report = dispatcher.dispatch(&normalized.records).await.unwrap();

        assert_eq!(report.total_failed(), 1);
        assert_eq!(row.call_count(), 1);
        assert_eq!(column.call_count(), 1);
    }
}

#[cfg(test)]
mod config_tests {
    use config_loader::{ConfigFormat, ConfigLoader};
    use dispatcher::create_dispatcher;
    use normalizer::Normalizer;

    #[tokio::test]
    async fn test_config_to_file_sinks() {
        let dir = tempfile::tempdir().unwrap();
        let content = format!(
            r#"
[normalizer]
remove_as_delete = true

[sinks.row]
name = "users-json"
sink_type = "file"
params = {{ base_path = "{path}" }}

[sinks.column]
name = "users-parquet"
sink_type = "file"
params = {{ base_path = "{path}" }}
"#,
            path = dir.path().display()
        );

        let config = ConfigLoader::load_from_str(&content, ConfigFormat::Toml).unwrap();
        let mut dispatcher = create_dispatcher(&config.sinks, &config.aws)
            .await
            .unwrap();
        let normalizer = Normalizer::new(config.normalizer.clone());

        let batch: contracts::StreamBatch = serde_json::from_str(
            r#"{"Records":[{"eventName":"REMOVE","dynamodb":{"Keys":{"user_id":{"S":"7"}}}}]}"#,
        )
        .unwrap();
        let normalized = normalizer.normalize_batch(&batch.records, chrono::Utc::now());
        dispatcher.dispatch(&normalized.records).await.unwrap();

        for name in ["users-json", "users-parquet"] {
            let written =
                std::fs::read_to_string(dir.path().join(format!("{name}.jsonl"))).unwrap();
            let record: serde_json::Value = serde_json::from_str(written.trim_end()).unwrap();
            assert_eq!(record["cdc_type"], "D");
        }
    }

    #[test]
    fn test_env_only_config_requires_both_streams() {
        let result = ConfigLoader::from_env_with(|key| {
            (key == config_loader::env::ENV_ROW_STREAM).then(|| "users-json".to_string())
        });
        assert!(result.is_err());
    }
}

#[cfg(test)]
mod crawler_tests {
    use contracts::ObjectLandedEvent;
    use crawler::{CrawlerTrigger, MockCatalogBehavior, MockCatalogClient, TriggerOutcome};

    #[tokio::test]
    async fn test_running_crawler_is_idempotent_success() {
        let client = MockCatalogClient::with_behavior(MockCatalogBehavior::AlreadyRunning);
        let trigger = CrawlerTrigger::new("users-parquet-crawler", client.clone());
        let event: ObjectLandedEvent = serde_json::from_str(
            r#"{"Records":[{"eventName":"ObjectCreated:Put","s3":{"bucket":{"name":"lake"},"object":{"key":"users/part-0.parquet"}}}]}"#,
        )
        .unwrap();

        let first = trigger.on_objects_landed(&event).await.unwrap();
        let second = trigger.on_objects_landed(&event).await.unwrap();

        assert_eq!(first, TriggerOutcome::AlreadyRunning);
        assert_eq!(second, TriggerOutcome::AlreadyRunning);
        assert_eq!(first.to_result().status_code, 200);
        assert_eq!(client.requests().len(), 2);
    }
}

#[cfg(test)]
mod diagnostics_tests {
    use std::io::Write;
    use std::sync::{Arc, Mutex};

    use chrono::{TimeZone, Utc};
    use contracts::{NormalizerConfig, StreamBatch};
    use dispatcher::{BatchDispatcher, MockBehavior, MockDeliveryStream};
    use normalizer::Normalizer;
    use tracing::subscriber::DefaultGuard;

    /// JSON log lines written while the guard is held
    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

    impl Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl CapturedLogs {
        fn lines_with(&self, needles: &[&str]) -> Vec<String> {
            let buf = self.0.lock().unwrap();
            String::from_utf8_lossy(&buf)
                .lines()
                .filter(|line| needles.iter().all(|needle| line.contains(needle)))
                .map(str::to_string)
                .collect()
        }
    }

    fn capture() -> (CapturedLogs, DefaultGuard) {
        let logs = CapturedLogs::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .json()
            .with_max_level(tracing::Level::TRACE)
            .with_writer(move || writer.clone())
            .finish();
        (logs, tracing::subscriber::set_default(subscriber))
    }

    #[test]
    fn test_one_warning_per_missing_key_event() {
        let (logs, _guard) = capture();
        let batch: StreamBatch = serde_json::from_str(
            r#"{"Records":[
                {"eventName":"INSERT","dynamodb":{"Keys":{"id":{"S":"x"}},"NewImage":{"name":{"S":"anon"}}}},
                {"eventName":"INSERT","dynamodb":{"NewImage":{"user_id":{"S":"ok"}}}},
                {"eventName":"MODIFY","dynamodb":{"NewImage":{"user_id":{"S":""}}}}
            ]}"#,
        )
        .unwrap();

        let out = Normalizer::new(NormalizerConfig::default()).normalize_batch(
            &batch.records,
            Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap(),
        );
        assert_eq!(out.emitted(), 1);

        let warnings = logs.lines_with(&[r#""level":"WARN""#]);
        assert_eq!(warnings.len(), 2, "{warnings:#?}");
        assert!(warnings[0].contains("missing user_id"), "{}", warnings[0]);
        assert!(warnings[0].contains("INSERT"));
        assert!(warnings[1].contains("MODIFY"));
    }

    #[tokio::test]
    async fn test_call_failure_is_logged_as_critical() {
        let (logs, _guard) = capture();
        let row = MockDeliveryStream::with_behavior(
            "users-json",
            MockBehavior::CallFailure("ServiceUnavailableException".into()),
        );
        let mut dispatcher = BatchDispatcher::new(row, MockDeliveryStream::new("users-parquet"));

        let records = vec![bytes::Bytes::from_static(b"{\"user_id\":\"a\"}\n")];
        dispatcher.dispatch(&records).await.unwrap_err();

        let critical = logs.lines_with(&[r#""level":"ERROR""#, r#""severity":"CRITICAL""#]);
        assert_eq!(critical.len(), 1, "{critical:#?}");
        assert!(critical[0].contains("ServiceUnavailableException"));
        assert!(critical[0].contains("users-json"));
    }

    #[tokio::test]
    async fn test_partial_failure_is_not_critical() {
        let (logs, _guard) = capture();
        let row = MockDeliveryStream::with_behavior("users-json", MockBehavior::PartialFailure(1));
        let mut dispatcher = BatchDispatcher::new(row, MockDeliveryStream::new("users-parquet"));

        let records = vec![bytes::Bytes::from_static(b"{\"user_id\":\"a\"}\n")];
        dispatcher.dispatch(&records).await.unwrap();

        assert!(logs.lines_with(&[r#""severity":"CRITICAL""#]).is_empty());
        assert_eq!(
            logs.lines_with(&[r#""level":"ERROR""#, "delivery failed for 1 records"]).len(),
            1
        );
    }
}
