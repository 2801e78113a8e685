use connectors::error::ConnectorError;
use engine_core::error::SyncError;
use thiserror::Error;

/// Top-level errors of a sync run.
#[derive(Debug, Error)]
pub enum RunError {
    /// Building the source client or connecting to the sink failed.
    #[error("Connector error: {0}")]
    Connector(#[from] ConnectorError),

    #[error("Sync error: {0}")]
    Sync(#[from] SyncError),

    #[error("Invalid settings: {0}")]
    Settings(String),

    /// Some jobs of a multi-dataset run failed; the others completed.
    #[error("{failed} of {total} sync jobs failed")]
    JobsFailed { failed: usize, total: usize },
}
