// Record storage: the trait seam and its in-process implementation

pub mod in_memory;
pub mod traits;

pub use in_memory::InMemoryRecordStore;
pub use traits::RecordStore;
