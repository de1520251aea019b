pub mod common;
pub mod config;
pub mod domain;
pub mod logging;
pub mod observability;
pub mod pipeline;
pub mod server;

// Use cases composed from the pipeline stages
pub mod app;

pub use app::CompanyService;
pub use common::error::{CompanyError, Result};
pub use domain::{CompanyRecord, IngestSummary, RawRow, SourceFormat};
