use crate::domain::CompanyRecord;
use async_trait::async_trait;

/// Holder of the most recently ingested batch of companies.
///
/// Every write is a whole-state transition: a batch replaces whatever was
/// there, and `clear` empties it. Nothing is merged across batches.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Swap the visible batch for `records`.
    async fn replace(&self, records: Vec<CompanyRecord>);

    /// Snapshot of the current batch in insertion order.
    async fn list(&self) -> Vec<CompanyRecord>;

    /// Record at positional `id`, if the current batch has one.
    async fn get_by_id(&self, id: usize) -> Option<CompanyRecord>;

    async fn clear(&self);
}
