use model::records::record::Record;
use planner::query::ast::common::TableRef;

/// Rows of one page to be streamed into `table` inside a single transaction.
pub struct CopyRowsRequest<'a> {
    pub table: TableRef,
    pub columns: Vec<String>,
    pub records: &'a [Record],
    /// Statements executed in the same transaction before the copy,
    /// e.g. the DDL creating the table on first write.
    pub prelude: Vec<String>,
    /// Records sent per COPY data message.
    pub chunk_rows: usize,
}

pub const DEFAULT_CHUNK_ROWS: usize = 5_000;

pub struct CopyRowsRequestBuilder<'a> {
    table: TableRef,
    columns: Vec<String>,
    records: &'a [Record],
    prelude: Vec<String>,
    chunk_rows: usize,
}

impl<'a> CopyRowsRequestBuilder<'a> {
    pub fn new(table: TableRef, records: &'a [Record]) -> Self {
        CopyRowsRequestBuilder {
            table,
            columns: Vec::new(),
            records,
            prelude: Vec::new(),
            chunk_rows: DEFAULT_CHUNK_ROWS,
        }
    }

    pub fn columns(mut self, columns: Vec<String>) -> Self {
        self.columns = columns;
        self
    }

    pub fn prelude(mut self, statement: String) -> Self {
        self.prelude.push(statement);
        self
    }

    pub fn chunk_rows(mut self, chunk_rows: usize) -> Self {
        self.chunk_rows = chunk_rows.max(1);
        self
    }

    pub fn build(self) -> CopyRowsRequest<'a> {
        CopyRowsRequest {
            table: self.table,
            columns: self.columns,
            records: self.records,
            prelude: self.prelude,
            chunk_rows: self.chunk_rows,
        }
    }
}
