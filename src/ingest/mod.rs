// src/ingest/mod.rs

use anyhow::Result;
use arrow::record_batch::RecordBatch;
use reqwest::Client;
use tracing::info;

use crate::assemble;
use crate::config::TripsConfig;
use crate::fetch::{self, FetchFailure, FetchOutcome};

/// What one ingestion run produced: the concatenated table plus an account
/// of every attempt, so callers can tell a quiet month from a broken source.
#[derive(Debug)]
pub struct IngestResult {
    pub table: RecordBatch,
    /// Number of (month, variant) pairs that loaded successfully.
    pub loaded: usize,
    pub failures: Vec<FetchFailure>,
}

/// Run the whole pipeline: plan months, fetch each (month, variant) pair in
/// order, and assemble the output table.
///
/// Fetches run strictly one at a time, months ascending and variants in the
/// configured order, which fixes the row order of the result. A failed fetch
/// is recorded and skipped; only configuration-level problems (a bad
/// endpoint) abort the run.
pub async fn run(client: &Client, config: &TripsConfig) -> Result<IngestResult> {
    let mut collected: Vec<RecordBatch> = Vec::new();
    let mut loaded = 0usize;
    let mut failures: Vec<FetchFailure> = Vec::new();

    for month in config.window.months() {
        for taxi_type in &config.taxi_types {
            match fetch::fetch_month(client, &config.endpoint, taxi_type, month).await? {
                FetchOutcome::Loaded(raw) => {
                    loaded += 1;
                    collected.extend(raw.batches);
                }
                FetchOutcome::Failed(failure) => failures.push(failure),
            }
        }
    }

    let table = assemble::concat_all(&collected)?;
    info!(
        rows = table.num_rows(),
        loaded,
        failed = failures.len(),
        "assembled output table"
    );

    Ok(IngestResult {
        table,
        loaded,
        failures,
    })
}
