use anyhow::{Context, Result};
use parquet::arrow::ArrowWriter;
use parquet::basic::Compression;
use parquet::file::properties::WriterProperties;
use std::{env, fs::File, path::PathBuf};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};
use tripscraper::{
    config::{TripsConfig, VariableBag},
    fetch, ingest,
    range::FetchWindow,
    schema,
};

#[tokio::main]
async fn main() -> Result<()> {
    // ─── 1) init logging ─────────────────────────────────────────────
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder().with_env_filter(env_filter).init();
    info!("startup");

    // ─── 2) translate environment into an explicit config ────────────
    // The orchestration layer passes the window and variable bag through the
    // environment; everything below main works off the config value only.
    let start = env::var("TRIPS_START_DATE").context("TRIPS_START_DATE not set")?;
    let end = env::var("TRIPS_END_DATE").context("TRIPS_END_DATE not set")?;
    let window = FetchWindow::parse(&start, &end)?;

    let bag = match env::var("TRIPS_VARS") {
        Ok(raw) => VariableBag::from_json(&raw)?,
        Err(_) => VariableBag::default(),
    };

    let mut config = TripsConfig::new(window);
    config.taxi_types = bag.taxi_types_or_default();
    info!(?window, taxi_types = ?config.taxi_types, "configured");

    let out_path = PathBuf::from(
        env::var("TRIPS_OUT").unwrap_or_else(|_| "trips.parquet".to_string()),
    );
    let out_dir = out_path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."));

    // ─── 3) run the pipeline ─────────────────────────────────────────
    let client = fetch::build_client()?;
    let result = ingest::run(&client, &config).await?;
    for failure in &result.failures {
        info!(
            taxi_type = %failure.taxi_type,
            month = %failure.month,
            reason = %failure.reason,
            "skipped"
        );
    }

    // ─── 4) publish the declared schema for downstream tooling ──────
    schema::write_columns("trips", &out_dir, &schema::declared_columns())?;

    // ─── 5) materialize the output table ─────────────────────────────
    if result.table.num_rows() == 0 {
        info!("no rows fetched; skipping write");
        return Ok(());
    }

    let file = File::create(&out_path)
        .with_context(|| format!("creating output file {}", out_path.display()))?;
    let props = WriterProperties::builder()
        .set_compression(Compression::SNAPPY)
        .build();
    let mut writer = ArrowWriter::try_new(file, result.table.schema(), Some(props))
        .context("creating Arrow writer for output")?;
    writer.write(&result.table).context("writing output table")?;
    writer.close().context("closing output writer")?;

    info!(
        rows = result.table.num_rows(),
        path = %out_path.display(),
        "all done"
    );
    Ok(())
}
