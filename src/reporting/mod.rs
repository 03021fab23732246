pub mod aggregator;
pub mod formatter;
pub mod serializer;

pub use aggregator::aggregate;
pub use serializer::{serialize, write_report};
