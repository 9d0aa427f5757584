// src/fetch/mod.rs

pub mod trips;
pub mod urls;

pub use trips::{build_client, fetch_month, FetchFailure, FetchOutcome, RawBatch};
