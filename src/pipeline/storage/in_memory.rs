use super::traits::RecordStore;
use crate::domain::CompanyRecord;
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

/// Process-local record store; contents are lost on restart.
pub struct InMemoryRecordStore {
    records: RwLock<Arc<Vec<CompanyRecord>>>,
}

impl Default for InMemoryRecordStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryRecordStore {
    pub fn new() -> Self {
        Self {
            records: RwLock::new(Arc::new(Vec::new())),
        }
    }

    async fn snapshot(&self) -> Arc<Vec<CompanyRecord>> {
        self.records.read().await.clone()
    }
}

#[async_trait]
impl RecordStore for InMemoryRecordStore {
    async fn replace(&self, records: Vec<CompanyRecord>) {
        let count = records.len();
        let fresh = Arc::new(records);
        *self.records.write().await = fresh;
        debug!("Replaced record store with {} records", count);
    }

    async fn list(&self) -> Vec<CompanyRecord> {
        self.snapshot().await.as_ref().clone()
    }

    async fn get_by_id(&self, id: usize) -> Option<CompanyRecord> {
        self.snapshot().await.get(id).cloned()
    }

    async fn clear(&self) {
        *self.records.write().await = Arc::new(Vec::new());
        debug!("Cleared record store");
    }
}
