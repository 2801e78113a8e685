use crate::progress::SyncStage;
use connectors::error::{CkanError, DbError};
use model::dataset::descriptor::DescriptorError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SourceError {
    #[error("CKAN error: {0}")]
    Ckan(#[from] CkanError),

    #[error("Unexpected source response: {0}")]
    Response(String),
}

#[derive(Error, Debug)]
pub enum SinkError {
    #[error("Database error: {0}")]
    Database(#[from] DbError),

    #[error("Page has no columns to write into {0}")]
    EmptyShape(String),
}

#[derive(Error, Debug)]
pub enum SyncError {
    #[error("Source error: {0}")]
    Source(#[from] SourceError),

    #[error("Sink error: {0}")]
    Sink(#[from] SinkError),

    #[error("Invalid dataset: {0}")]
    Descriptor(#[from] DescriptorError),

    #[error("Illegal stage transition for {dataset}: {from} -> {to}")]
    IllegalTransition {
        dataset: String,
        from: SyncStage,
        to: SyncStage,
    },
}
