pub mod orchestrator;

pub use orchestrator::{ScanConfig, ScanOrchestrator, ScanOutcome};
