use crate::{
    error::{ConnectorError, DbError},
    sql::base::requests::CopyRowsRequest,
};
use async_trait::async_trait;
use model::core::value::Value;

/// Statement-level access to a relational store.
#[async_trait]
pub trait SqlAdapter: Send + Sync {
    async fn connect(url: &str) -> Result<Self, ConnectorError>
    where
        Self: Sized;

    // Exec / Params
    async fn exec(&self, query: &str) -> Result<(), DbError>;
    async fn exec_params(&self, query: &str, params: Vec<Value>) -> Result<u64, DbError>;

    /// First column of the first row rendered as text; `None` when there is
    /// no row or the value is NULL.
    async fn query_text(&self, query: &str) -> Result<Option<String>, DbError>;

    // Introspection
    async fn table_exists(&self, schema: &str, table: &str) -> Result<bool, DbError>;

    /// `(column, data_type)` pairs in table order, as information_schema
    /// names the types. Empty when the table is missing.
    async fn column_types(
        &self,
        schema: &str,
        table: &str,
    ) -> Result<Vec<(String, String)>, DbError>;

    /// Streams the request's records, returning the number of rows copied.
    async fn copy_rows(&self, request: CopyRowsRequest<'_>) -> Result<u64, DbError>;

    /// Round trip to the server; returns its version string.
    async fn ping(&self) -> Result<String, DbError>;
}
