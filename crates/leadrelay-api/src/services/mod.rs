pub mod email;
pub mod ingest;
