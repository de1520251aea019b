// Ingestion pipeline: decoding, row processing, and record storage

pub mod ingestion;
pub mod processing;
pub mod storage;

// Re-export key types and functions from each stage
pub use ingestion::{decode, StagedUpload};
pub use processing::{RowTransformer, TransformOutcome};
pub use storage::{InMemoryRecordStore, RecordStore};
