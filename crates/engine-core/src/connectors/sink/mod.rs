use crate::error::SinkError;
use async_trait::async_trait;
use model::{dataset::descriptor::PartitionKey, records::page::Page};

pub mod postgres;

/// Table store the datasets are materialized into.
#[async_trait]
pub trait Sink: Send + Sync {
    /// Maximum of `field` in `table` as text. Any failure, including a
    /// missing table, reads as `None`.
    async fn max_text(&self, table: &str, field: &str) -> Option<String>;

    /// Drops `table`; a missing table is not an error.
    async fn drop_table(&self, table: &str) -> Result<(), SinkError>;

    /// Deletes the rows of one partition and returns how many went away.
    /// A missing table deletes nothing.
    async fn delete_where(&self, table: &str, key: &PartitionKey) -> Result<u64, SinkError>;

    /// Appends the page, creating the table from the page's shape on first
    /// write and widening it when a later page needs wider columns.
    /// Returns the number of rows written.
    async fn append_rows(&self, table: &str, page: &Page) -> Result<u64, SinkError>;
}
