pub mod models;
pub mod orchestrator;
pub mod tracker;

pub use orchestrator::UploadOrchestrator;
pub use tracker::UploadTracker;
