//! Bulk load into a table: `COPY ... FROM STDIN`.

use crate::query::ast::common::TableRef;

#[derive(Debug, Clone)]
pub struct CopyIn {
    pub table: TableRef,
    /// Target columns, in the order the streamed rows carry them.
    pub columns: Vec<String>,
    pub options: Vec<CopyOption>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyFormat {
    Csv,
    Text,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CopyOption {
    Format(CopyFormat),
    /// Literal that stands for SQL NULL in the stream.
    Null(String),
    Header(bool),
}
