// src/fetch/trips.rs

use anyhow::{Context, Result};
use arrow::array::{ArrayRef, StringArray, TimestampMicrosecondArray};
use arrow::datatypes::{DataType, Field, FieldRef, Schema, TimeUnit};
use arrow::record_batch::RecordBatch;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

use super::urls;
use crate::range::MonthKey;

/// Per-request deadline. Each (month, variant) pair gets exactly one attempt
/// bounded by this; there is no retry or backoff.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Build the shared HTTP client used for every monthly download.
pub fn build_client() -> Result<Client> {
    Client::builder()
        .timeout(REQUEST_TIMEOUT)
        .build()
        .context("building HTTP client")
}

/// The parsed content of one successful (month, variant) fetch. Every batch
/// already carries the `taxi_type` and `extracted_at` tag columns.
#[derive(Debug)]
pub struct RawBatch {
    pub taxi_type: String,
    pub month: MonthKey,
    pub batches: Vec<RecordBatch>,
}

impl RawBatch {
    pub fn num_rows(&self) -> usize {
        self.batches.iter().map(RecordBatch::num_rows).sum()
    }
}

/// A soft failure for a single (month, variant) attempt. The run continues
/// past these; they are surfaced to the caller as values, not exceptions.
#[derive(Debug, Clone)]
pub struct FetchFailure {
    pub taxi_type: String,
    pub month: MonthKey,
    pub url: String,
    pub reason: String,
}

/// Result of one (month, variant) attempt.
#[derive(Debug)]
pub enum FetchOutcome {
    Loaded(RawBatch),
    Failed(FetchFailure),
}

/// Fetch and parse one monthly trip file.
///
/// Network errors, non-2xx statuses, and Parquet decode errors all become
/// [`FetchOutcome::Failed`]; only URL construction from a bad endpoint is a
/// hard error, since that poisons every attempt of the run.
pub async fn fetch_month(
    client: &Client,
    endpoint: &str,
    taxi_type: &str,
    month: MonthKey,
) -> Result<FetchOutcome> {
    let url = urls::trip_url(endpoint, taxi_type, month)?;
    info!(%url, "fetching");

    match fetch_batches(client, url.as_str()).await {
        Ok(batches) => {
            let extracted_at = Utc::now();
            let tagged = batches
                .iter()
                .map(|batch| tag_batch(batch, taxi_type, extracted_at))
                .collect::<Result<Vec<_>>>()?;
            let raw = RawBatch {
                taxi_type: taxi_type.to_string(),
                month,
                batches: tagged,
            };
            info!(rows = raw.num_rows(), taxi_type, month = %month, "loaded");
            Ok(FetchOutcome::Loaded(raw))
        }
        Err(err) => {
            warn!(%url, error = %format!("{err:#}"), "fetch failed");
            Ok(FetchOutcome::Failed(FetchFailure {
                taxi_type: taxi_type.to_string(),
                month,
                url: url.into(),
                reason: format!("{err:#}"),
            }))
        }
    }
}

async fn fetch_batches(client: &Client, url: &str) -> Result<Vec<RecordBatch>> {
    let resp = client
        .get(url)
        .send()
        .await
        .with_context(|| format!("GET {url}"))?;
    let status = resp.status();
    if !status.is_success() {
        anyhow::bail!("unexpected status {status}");
    }
    let body = resp
        .bytes()
        .await
        .with_context(|| format!("reading body from {url}"))?;
    read_parquet(body)
}

/// Decode a Parquet payload into Arrow record batches.
pub fn read_parquet(data: Bytes) -> Result<Vec<RecordBatch>> {
    let reader = ParquetRecordBatchReaderBuilder::try_new(data)
        .context("opening parquet payload")?
        .build()
        .context("building parquet reader")?;
    reader
        .collect::<std::result::Result<Vec<_>, _>>()
        .context("decoding parquet payload")
}

/// Append the `taxi_type` and `extracted_at` lineage columns to a batch.
pub fn tag_batch(
    batch: &RecordBatch,
    taxi_type: &str,
    extracted_at: DateTime<Utc>,
) -> Result<RecordBatch> {
    let rows = batch.num_rows();

    let mut fields: Vec<FieldRef> = batch.schema().fields().iter().cloned().collect();
    fields.push(Arc::new(Field::new("taxi_type", DataType::Utf8, false)));
    fields.push(Arc::new(Field::new(
        "extracted_at",
        DataType::Timestamp(TimeUnit::Microsecond, Some("UTC".into())),
        false,
    )));

    let taxi_type_array =
        StringArray::from_iter_values(std::iter::repeat(taxi_type).take(rows));
    let ts = extracted_at.timestamp_micros();
    let extracted_at_array =
        TimestampMicrosecondArray::from_iter_values(std::iter::repeat(ts).take(rows))
            .with_timezone("UTC");

    let mut columns: Vec<ArrayRef> = batch.columns().to_vec();
    columns.push(Arc::new(taxi_type_array));
    columns.push(Arc::new(extracted_at_array));

    RecordBatch::try_new(Arc::new(Schema::new(fields)), columns)
        .context("appending tag columns")
}

#[cfg(test)]
mod tests {
    use super::*;
    use arrow::array::{Array, Float64Array, Int64Array};
    use parquet::arrow::ArrowWriter;

    fn sample_batch(rows: usize) -> RecordBatch {
        let schema = Arc::new(Schema::new(vec![
            Field::new("VendorID", DataType::Int64, true),
            Field::new("fare_amount", DataType::Float64, true),
        ]));
        let vendors = Int64Array::from_iter_values((0..rows).map(|i| i as i64));
        let fares = Float64Array::from_iter_values((0..rows).map(|i| i as f64 * 1.5));
        RecordBatch::try_new(schema, vec![Arc::new(vendors), Arc::new(fares)]).unwrap()
    }

    fn sample_parquet(rows: usize) -> Bytes {
        let batch = sample_batch(rows);
        let mut buf = Vec::new();
        let mut writer = ArrowWriter::try_new(&mut buf, batch.schema(), None).unwrap();
        writer.write(&batch).unwrap();
        writer.close().unwrap();
        Bytes::from(buf)
    }

    #[test]
    fn read_parquet_recovers_all_rows() -> Result<()> {
        let batches = read_parquet(sample_parquet(10))?;
        let rows: usize = batches.iter().map(RecordBatch::num_rows).sum();
        assert_eq!(rows, 10);
        assert_eq!(batches[0].num_columns(), 2);
        Ok(())
    }

    #[test]
    fn read_parquet_rejects_garbage() {
        assert!(read_parquet(Bytes::from_static(b"definitely not parquet")).is_err());
    }

    #[test]
    fn tag_batch_appends_both_columns() -> Result<()> {
        let now = Utc::now();
        let tagged = tag_batch(&sample_batch(3), "yellow", now)?;

        assert_eq!(tagged.num_columns(), 4);
        assert_eq!(tagged.num_rows(), 3);

        let schema = tagged.schema();
        assert_eq!(schema.field(2).name(), "taxi_type");
        assert_eq!(schema.field(3).name(), "extracted_at");

        let types = tagged
            .column(2)
            .as_any()
            .downcast_ref::<StringArray>()
            .unwrap();
        assert!(types.iter().all(|v| v == Some("yellow")));

        let stamps = tagged
            .column(3)
            .as_any()
            .downcast_ref::<TimestampMicrosecondArray>()
            .unwrap();
        assert_eq!(stamps.null_count(), 0);
        assert!(stamps.iter().all(|v| v == Some(now.timestamp_micros())));
        Ok(())
    }

    #[test]
    fn tag_batch_handles_empty_input() -> Result<()> {
        let tagged = tag_batch(&sample_batch(0), "green", Utc::now())?;
        assert_eq!(tagged.num_rows(), 0);
        assert_eq!(tagged.num_columns(), 4);
        Ok(())
    }
}
