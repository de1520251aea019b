// Pipeline ingestion: upload staging and spreadsheet decoding

pub mod decode;
pub mod upload;

// Re-export key types and functions for external use
pub use decode::{decode, decode_csv, decode_workbook, detect_format};
pub use upload::StagedUpload;
