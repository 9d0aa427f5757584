// src/schema/mod.rs
//
// Declared destination schema for the trips table. This is metadata for the
// materialization layer and lineage tooling; the ingestion core never
// validates fetched data against it.

pub mod arrow;
pub mod types;
pub mod write;

pub use arrow::{build_arrow_schema, map_to_arrow_type};
pub use types::Column;
pub use write::write_columns;

fn col(name: &str, ty: &str) -> Column {
    Column {
        name: name.to_string(),
        ty: ty.to_string(),
    }
}

/// The declared trips columns: the union of the yellow and green feeds plus
/// the two lineage columns the fetcher appends.
pub fn declared_columns() -> Vec<Column> {
    vec![
        col("VendorID", "integer"),
        col("tpep_pickup_datetime", "timestamp"),
        col("tpep_dropoff_datetime", "timestamp"),
        col("passenger_count", "float"),
        col("trip_distance", "float"),
        col("RatecodeID", "float"),
        col("store_and_fwd_flag", "string"),
        col("PULocationID", "integer"),
        col("DOLocationID", "integer"),
        col("payment_type", "integer"),
        col("fare_amount", "float"),
        col("extra", "float"),
        col("mta_tax", "float"),
        col("tip_amount", "float"),
        col("tolls_amount", "float"),
        col("improvement_surcharge", "float"),
        col("total_amount", "float"),
        col("congestion_surcharge", "float"),
        col("airport_fee", "float"),
        col("lpep_pickup_datetime", "timestamp"),
        col("lpep_dropoff_datetime", "timestamp"),
        col("ehail_fee", "float"),
        col("trip_type", "float"),
        col("taxi_type", "string"),
        col("extracted_at", "timestamp"),
    ]
}
