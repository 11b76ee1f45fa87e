//! `process` command implementation.

use std::collections::HashMap;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Utc;
use contracts::{RelayConfig, SinkType, StreamBatch};
use normalizer::Normalizer;
use tracing::info;

use super::load_config;
use crate::cli::ProcessArgs;
use crate::input::read_payload;
use crate::pipeline::RelayHandler;

/// Execute the `process` command
pub async fn run_process(args: &ProcessArgs) -> Result<()> {
    let mut config = load_config(args.config.as_deref())?;

    if let Some(dir) = &args.local_dir {
        info!(dir = %dir.display(), "Routing both sinks to local files");
        route_to_local(&mut config, dir);
    }

    info!(
        row = %config.sinks.row.name,
        column = %config.sinks.column.name,
        dry_run = args.dry_run,
        "Configuration loaded"
    );

    let inputs = input_sources(&args.inputs);

    if args.dry_run {
        return normalize_only(&config, &inputs);
    }

    if args.metrics_port != 0 {
        observability::init_metrics_only(args.metrics_port)?;
    }

    let mut handler = RelayHandler::from_config(&config).await?;

    for input in inputs {
        let batch: StreamBatch = read_payload(input)?;
        let result = handler.handle(&batch).await?;
        println!(
            "{}",
            serde_json::to_string(&result).context("Failed to serialize result")?
        );
    }

    handler.stats().print_summary();
    Ok(())
}

fn input_sources(inputs: &[PathBuf]) -> Vec<Option<&Path>> {
    if inputs.is_empty() {
        vec![None]
    } else {
        inputs.iter().map(|p| Some(p.as_path())).collect()
    }
}

/// Replace both routes with file sinks under `dir`, keeping stream names
fn route_to_local(config: &mut RelayConfig, dir: &Path) {
    for sink in [&mut config.sinks.row, &mut config.sinks.column] {
        sink.sink_type = SinkType::File;
        sink.params = HashMap::from([("base_path".to_string(), dir.display().to_string())]);
    }
}

/// Print envelope lines to stdout without touching any sink
fn normalize_only(config: &RelayConfig, inputs: &[Option<&Path>]) -> Result<()> {
    let normalizer = Normalizer::new(config.normalizer.clone());
    let mut stdout = std::io::stdout().lock();

    for input in inputs {
        let batch: StreamBatch = read_payload(*input)?;
        let normalized = normalizer.normalize_batch(&batch.records, Utc::now());
        for record in &normalized.records {
            stdout.write_all(record).context("Failed to write record")?;
        }
        info!(
            examined = normalized.examined,
            emitted = normalized.emitted(),
            skipped = normalized.skipped.total(),
            "Dry run batch normalized"
        );
    }

    Ok(())
}
