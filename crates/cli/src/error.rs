use connectors::error::{CkanError, ConnectorError, DbError};
use engine_runtime::error::RunError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to write output: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to serialize data to JSON: {0}")]
    JsonSerialize(#[from] serde_json::Error),

    #[error("Sync run failed: {0}")]
    Run(#[from] RunError),

    #[error("Connector error: {0}")]
    Connector(#[from] ConnectorError),

    /// PostgreSQL driver error.
    #[error("PostgreSQL error: {0}")]
    Postgres(#[from] DbError),

    #[error("CKAN API error: {0}")]
    Ckan(#[from] CkanError),
}
