//! Metrics for the CNPJ ingestion pipeline
//!
//! Recording goes through the `metrics` facade and is a no-op until a
//! recorder is installed with [`init`].

use std::fmt;
use std::net::SocketAddr;
use tracing::info;

/// Enum representing all metric names used in the system
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetricName {
    // Ingest metrics
    IngestBatches,
    IngestRecords,
    IngestRowsSkipped,
    IngestFailures,
    IngestDuration,

    // Store metrics
    StoreClears,
    StoreRecords,
}

impl MetricName {
    /// Get the metric name as a string (convenience method)
    pub fn as_str(&self) -> &'static str {
        match self {
            MetricName::IngestBatches => "cnpj_ingest_batches_total",
            MetricName::IngestRecords => "cnpj_ingest_records_total",
            MetricName::IngestRowsSkipped => "cnpj_ingest_rows_skipped_total",
            MetricName::IngestFailures => "cnpj_ingest_failures_total",
            MetricName::IngestDuration => "cnpj_ingest_duration_seconds",
            MetricName::StoreClears => "cnpj_store_clears_total",
            MetricName::StoreRecords => "cnpj_store_records",
        }
    }

    pub fn all_metrics() -> impl Iterator<Item = MetricName> {
        [
            MetricName::IngestBatches,
            MetricName::IngestRecords,
            MetricName::IngestRowsSkipped,
            MetricName::IngestFailures,
            MetricName::IngestDuration,
            MetricName::StoreClears,
            MetricName::StoreRecords,
        ]
        .into_iter()
    }
}

impl MetricName {
    fn description(&self) -> &'static str {
        match self {
            MetricName::IngestBatches => "Spreadsheets ingested successfully",
            MetricName::IngestRecords => "Company records produced by ingestion",
            MetricName::IngestRowsSkipped => "Raw rows dropped for lacking a legal name or CNPJ",
            MetricName::IngestFailures => "Ingestions that failed, by error kind",
            MetricName::IngestDuration => "Time spent decoding and transforming an upload",
            MetricName::StoreClears => "Explicit clears of the record store",
            MetricName::StoreRecords => "Records currently held in the store",
        }
    }
}

fn describe_all() {
    for metric in MetricName::all_metrics() {
        let (name, description) = (metric.as_str(), metric.description());
        match metric {
            MetricName::IngestDuration => ::metrics::describe_histogram!(name, description),
            MetricName::StoreRecords => ::metrics::describe_gauge!(name, description),
            _ => ::metrics::describe_counter!(name, description),
        }
    }
}

impl fmt::Display for MetricName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Install the Prometheus recorder and its scrape listener on `listen_addr`.
///
/// Must be called from inside a tokio runtime.
pub fn init(listen_addr: &str) -> Result<(), Box<dyn std::error::Error>> {
    let addr: SocketAddr = listen_addr
        .parse()
        .map_err(|e| format!("Invalid metrics address '{}': {}", listen_addr, e))?;

    metrics_exporter_prometheus::PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()
        .map_err(|e| format!("Failed to install Prometheus recorder: {}", e))?;

    describe_all();
    info!("Prometheus exporter listening at http://{}/metrics", addr);
    Ok(())
}

// ============================================================================
// Ingest Metrics
// ============================================================================

pub mod ingest {
    use super::MetricName;

    /// Record a completed batch and how many rows it kept and dropped
    pub fn batch_completed(format: &'static str, records: usize, skipped: usize, secs: f64) {
        ::metrics::counter!(MetricName::IngestBatches.as_str(), "format" => format).increment(1);
        ::metrics::counter!(MetricName::IngestRecords.as_str()).increment(records as u64);
        ::metrics::counter!(MetricName::IngestRowsSkipped.as_str()).increment(skipped as u64);
        ::metrics::histogram!(MetricName::IngestDuration.as_str()).record(secs);
    }

    /// Record a failed ingestion by error kind
    pub fn failed(kind: &'static str) {
        ::metrics::counter!(MetricName::IngestFailures.as_str(), "kind" => kind).increment(1);
    }
}

// ============================================================================
// Store Metrics
// ============================================================================

pub mod store {
    use super::MetricName;

    pub fn records(count: usize) {
        ::metrics::gauge!(MetricName::StoreRecords.as_str()).set(count as f64);
    }

    pub fn cleared() {
        ::metrics::counter!(MetricName::StoreClears.as_str()).increment(1);
        records(0);
    }
}
