pub mod columns;
pub mod identifier;
pub mod transform;

pub use transform::{RowTransformer, TransformOutcome};
