// src/schema/types.rs

use serde::{Deserialize, Serialize};

/// A single declared column of the destination table.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone, Eq, Hash)]
pub struct Column {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: String,
}
