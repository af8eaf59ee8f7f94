pub mod export;
pub mod ingestion;
pub mod notifier;

pub use export::{Artifact, DownloadSink, ExportService, FileDownloadSink};
pub use ingestion::{read_document, IngestionService};
pub use notifier::{Notification, Notifier};
