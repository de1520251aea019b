use chrono::Utc;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Mutex;
use tracing::{error, info, info_span, warn, Instrument};
use uuid::Uuid;

use crate::common::error::{CompanyError, Result};
use crate::config::IngestConfig;
use crate::domain::{CompanyRecord, IngestSummary};
use crate::observability::metrics;
use crate::pipeline::ingestion::{decode, detect_format, StagedUpload};
use crate::pipeline::processing::RowTransformer;
use crate::pipeline::storage::RecordStore;

/// Parse a client-supplied record id. Non-numeric and negative input yields `None`.
pub fn parse_record_id(raw: &str) -> Option<usize> {
    let id: i64 = raw.trim().parse().ok()?;
    usize::try_from(id).ok()
}

/// Ingest, list, look up and clear company records.
///
/// Owns the record store for the process. Ingestions are serialized so two
/// uploads cannot interleave their replace; the last one to finish wins.
pub struct CompanyService {
    store: Arc<dyn RecordStore>,
    transformer: RowTransformer,
    upload_dir: PathBuf,
    ingest_lock: Mutex<()>,
}

impl CompanyService {
    pub fn new(store: Arc<dyn RecordStore>, transformer: RowTransformer, upload_dir: PathBuf) -> Self {
        Self {
            store,
            transformer,
            upload_dir,
            ingest_lock: Mutex::new(()),
        }
    }

    pub fn from_config(store: Arc<dyn RecordStore>, config: &IngestConfig) -> Self {
        Self::new(
            store,
            RowTransformer::new(config.reference_url_base.clone()),
            config.upload_dir(),
        )
    }

    /// Decode `bytes` according to the extension of `filename`, transform the
    /// rows and replace the store with the result. On failure the store keeps
    /// its previous contents.
    pub async fn ingest(&self, bytes: Vec<u8>, filename: &str) -> Result<IngestSummary> {
        let batch_id = Uuid::new_v4();
        let span = info_span!("ingest", %batch_id, filename);

        async move {
            let started = Instant::now();
            let result = self.run_ingest(bytes, filename, batch_id).await;
            match &result {
                Ok(summary) => {
                    metrics::ingest::batch_completed(
                        summary.format.as_str(),
                        summary.count,
                        summary.skipped,
                        started.elapsed().as_secs_f64(),
                    );
                    metrics::store::records(summary.count);
                    info!(
                        count = summary.count,
                        skipped = summary.skipped,
                        "Ingestion finished"
                    );
                }
                Err(e @ CompanyError::UnsupportedFormat { .. }) => {
                    metrics::ingest::failed(e.kind());
                    warn!("Rejected upload: {}", e);
                }
                Err(e) => {
                    metrics::ingest::failed(e.kind());
                    error!("Ingestion failed: {}", e);
                }
            }
            result
        }
        .instrument(span)
        .await
    }

    async fn run_ingest(&self, bytes: Vec<u8>, filename: &str, batch_id: Uuid) -> Result<IngestSummary> {
        let format = detect_format(filename)?;
        let _guard = self.ingest_lock.lock().await;

        let upload_dir = self.upload_dir.clone();
        let name = filename.to_string();
        let rows = tokio::task::spawn_blocking(move || {
            let staged = StagedUpload::stage(&upload_dir, &name, &bytes)?;
            decode(staged)
        })
        .await
        .map_err(|e| CompanyError::Internal(format!("decode task failed: {}", e)))??;

        let outcome = self.transformer.transform_all(&rows);
        let summary = IngestSummary {
            count: outcome.records.len(),
            skipped: outcome.skipped,
            format,
            batch_id,
            ingested_at: Utc::now(),
        };
        self.store.replace(outcome.records).await;
        Ok(summary)
    }

    pub async fn list(&self) -> Vec<CompanyRecord> {
        self.store.list().await
    }

    /// Look up by the textual id a client sent.
    pub async fn get_by_id(&self, raw_id: &str) -> Result<CompanyRecord> {
        let not_found = || CompanyError::NotFound(raw_id.to_string());
        let id = parse_record_id(raw_id).ok_or_else(not_found)?;
        self.store.get_by_id(id).await.ok_or_else(not_found)
    }

    pub async fn clear(&self) {
        self.store.clear().await;
        metrics::store::cleared();
        info!("Record store cleared");
    }
}
