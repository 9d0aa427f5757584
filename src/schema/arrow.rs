// src/schema/arrow.rs

use arrow::datatypes::{DataType, Field as ArrowField, Schema as ArrowSchema, TimeUnit};
use std::sync::Arc;

use super::types::Column;

/// Map a declared column type into an Arrow DataType.
///
/// Covers:
/// - timestamp → Timestamp(µs, UTC)
/// - integer   → Int64
/// - float     → Float64
/// - boolean   → Boolean
/// - string    → Utf8
/// - fallback  → Utf8
pub fn map_to_arrow_type(ty: &str) -> DataType {
    match ty.to_ascii_lowercase().as_str() {
        "timestamp" => DataType::Timestamp(TimeUnit::Microsecond, Some(Arc::from("UTC"))),
        "integer" | "int" | "bigint" => DataType::Int64,
        "float" | "double" | "numeric" => DataType::Float64,
        "boolean" => DataType::Boolean,
        "string" => DataType::Utf8,
        _ => DataType::Utf8,
    }
}

/// Build an ArrowSchema (inside an Arc) from a slice of declared `Column`s.
pub fn build_arrow_schema(cols: &[Column]) -> Arc<ArrowSchema> {
    let fields: Vec<ArrowField> = cols
        .iter()
        .map(|col| ArrowField::new(&col.name, map_to_arrow_type(&col.ty), true))
        .collect();

    Arc::new(ArrowSchema::new(fields))
}
