// Observability: Prometheus metrics for the ingestion pipeline

pub mod metrics;

// Re-export main functions for ease of use
pub use metrics::init;
