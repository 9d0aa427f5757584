pub mod assemble;
pub mod config;
pub mod fetch;
pub mod ingest;
pub mod range;
pub mod schema;
