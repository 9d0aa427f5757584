// src/config.rs

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::fetch::urls::DEFAULT_ENDPOINT;
use crate::range::FetchWindow;

/// The dataset variants fetched when the caller does not name any.
pub fn default_taxi_types() -> Vec<String> {
    vec!["yellow".to_string(), "green".to_string()]
}

/// Everything the ingestion core needs, passed in explicitly. The core never
/// reads process environment; the binary adapter owns that translation.
#[derive(Debug, Clone)]
pub struct TripsConfig {
    pub window: FetchWindow,
    /// Variants to fetch per month, in the order their rows should appear.
    pub taxi_types: Vec<String>,
    /// Base URL the monthly file names are appended to.
    pub endpoint: String,
}

impl TripsConfig {
    pub fn new(window: FetchWindow) -> Self {
        Self {
            window,
            taxi_types: default_taxi_types(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
        }
    }
}

/// Optional JSON variable bag supplied by the orchestration layer,
/// e.g. `{"taxi_types": ["yellow"]}`.
#[derive(Debug, Default, Deserialize)]
pub struct VariableBag {
    #[serde(default)]
    pub taxi_types: Option<Vec<String>>,
}

impl VariableBag {
    pub fn from_json(raw: &str) -> Result<Self> {
        serde_json::from_str(raw).context("parsing variable bag JSON")
    }

    pub fn taxi_types_or_default(self) -> Vec<String> {
        self.taxi_types.unwrap_or_else(default_taxi_types)
    }
}
