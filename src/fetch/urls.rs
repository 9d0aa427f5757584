// src/fetch/urls.rs

use anyhow::{Context, Result};
use url::Url;

use crate::range::MonthKey;

/// Public object-storage endpoint the TLC publishes monthly trip files under.
pub const DEFAULT_ENDPOINT: &str = "https://d37ci6vzurychx.cloudfront.net/trip-data";

/// Build the source URL for one (month, variant) pair. The file name is fully
/// determined by the template `{variant}_tripdata_{year}-{month:02}.parquet`.
pub fn trip_url(endpoint: &str, taxi_type: &str, month: MonthKey) -> Result<Url> {
    let raw = format!(
        "{}/{}_tripdata_{:04}-{:02}.parquet",
        endpoint.trim_end_matches('/'),
        taxi_type,
        month.year,
        month.month
    );
    Url::parse(&raw).with_context(|| format!("parsing trip data URL `{raw}`"))
}
