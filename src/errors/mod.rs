pub mod types;

pub use types::PhalanxError;
