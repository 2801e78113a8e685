use crate::{connectors::sink::Sink, error::SinkError};
use async_trait::async_trait;
use connectors::sql::base::{
    adapter::SqlAdapter,
    requests::{CopyRowsRequestBuilder, DEFAULT_CHUNK_ROWS},
};
use model::{
    core::{data_type::DataType, value::Value},
    dataset::descriptor::PartitionKey,
    records::page::{ColumnShape, Page},
};
use planner::{
    query::{
        ast::{common::TableRef, create_schema::CreateSchema},
        builder::{
            alter_table::AlterTableBuilder, create_table::CreateTableBuilder, delete::DeleteBuilder, drop_table::DropTableBuilder,
            select::SelectBuilder,
        },
        dialect, ident,
        renderer::render,
        value,
    },
    table_ref,
};
use std::sync::Arc;
use tracing::{debug, info};

pub const DEFAULT_SCHEMA: &str = "stg";

/// Staging tables under one Postgres schema.
pub struct PostgresSink {
    adapter: Arc<dyn SqlAdapter>,
    dialect: dialect::Postgres,
    schema: String,
    chunk_rows: usize,
}

impl PostgresSink {
    pub fn new(adapter: Arc<dyn SqlAdapter>, schema: &str) -> Self {
        Self {
            adapter,
            dialect: dialect::Postgres,
            schema: schema.to_string(),
            chunk_rows: DEFAULT_CHUNK_ROWS,
        }
    }

    pub fn with_chunk_rows(mut self, chunk_rows: usize) -> Self {
        self.chunk_rows = chunk_rows.max(1);
        self
    }

    fn table_ref(&self, table: &str) -> TableRef {
        table_ref!(self.schema, table)
    }

    fn qualified(&self, table: &str) -> String {
        format!("{}.{}", self.schema, table)
    }

    fn max_sql(&self, table: &str, field: &str) -> String {
        let query = SelectBuilder::new()
            .select(vec![ident(field).max().pg_cast("text")])
            .from(self.table_ref(table), None)
            .where_clause(None)
            .build();
        render(&query, &self.dialect).0
    }

    fn drop_sql(&self, table: &str) -> String {
        let drop = DropTableBuilder::new(self.table_ref(table))
            .if_exists()
            .build();
        render(&drop, &self.dialect).0
    }

    fn delete_sql(&self, table: &str, key: &PartitionKey) -> (String, Vec<Value>) {
        let delete = DeleteBuilder::new(self.table_ref(table))
            .where_clause(
                ident(&key.field)
                    .cast("BIGINT")
                    .eq(value(Value::Int(i64::from(key.value)))),
            )
            .build();
        render(&delete, &self.dialect)
    }

    fn create_sql(&self, table: &str, shape: &[ColumnShape]) -> Vec<String> {
        let schema = CreateSchema {
            name: self.schema.clone(),
            if_not_exists: true,
        };
        let create = shape
            .iter()
            .fold(
                CreateTableBuilder::new(self.table_ref(table)).if_not_exists(),
                |builder, column| builder.column(&column.name, column.data_type.clone(), true),
            )
            .build();

        vec![
            render(&schema, &self.dialect).0,
            render(&create, &self.dialect).0,
        ]
    }

    /// ALTER bringing an existing table up to a page's shape: columns too
    /// narrow for the page are widened, columns the table lacks are added.
    fn widen_sql(
        &self,
        table: &str,
        existing: &[(String, String)],
        shape: &[ColumnShape],
    ) -> Option<String> {
        let mut alter = AlterTableBuilder::new(self.table_ref(table));
        for column in shape {
            let Some((_, current)) = existing.iter().find(|(name, _)| *name == column.name) else {
                alter = alter.add_column(&column.name, column.data_type.clone());
                continue;
            };
            // Types the sink never creates are left as they are.
            let Some(current) = DataType::from_postgres_type(current) else {
                continue;
            };
            let widened = current.widen(&column.data_type);
            if widened != current {
                debug!(
                    table = %self.qualified(table),
                    column = %column.name,
                    from = %current,
                    to = %widened,
                    "Widening column"
                );
                alter = alter.alter_column_type(&column.name, widened);
            }
        }

        (!alter.is_empty()).then(|| render(&alter.build(), &self.dialect).0)
    }
}

#[async_trait]
impl Sink for PostgresSink {
    async fn max_text(&self, table: &str, field: &str) -> Option<String> {
        match self.adapter.query_text(&self.max_sql(table, field)).await {
            Ok(max) => max,
            Err(err) => {
                debug!(table = %self.qualified(table), %err, "No readable maximum in sink");
                None
            }
        }
    }

    async fn drop_table(&self, table: &str) -> Result<(), SinkError> {
        self.adapter.exec(&self.drop_sql(table)).await?;
        info!("DROP {}", self.qualified(table));
        Ok(())
    }

    async fn delete_where(&self, table: &str, key: &PartitionKey) -> Result<u64, SinkError> {
        if !self.adapter.table_exists(&self.schema, table).await? {
            debug!(table = %self.qualified(table), "Table missing, nothing to delete");
            return Ok(0);
        }

        let (sql, params) = self.delete_sql(table, key);
        let deleted = self.adapter.exec_params(&sql, params).await?;
        info!(
            "{}: DELETE {}={} ({} rows)",
            self.qualified(table),
            key.field,
            key.value,
            deleted
        );
        Ok(deleted)
    }

    async fn append_rows(&self, table: &str, page: &Page) -> Result<u64, SinkError> {
        if page.is_empty() {
            return Ok(0);
        }

        let shape = page.shape();
        if shape.is_empty() {
            return Err(SinkError::EmptyShape(self.qualified(table)));
        }

        let columns = shape.iter().map(|c| c.name.clone()).collect();
        let mut request = CopyRowsRequestBuilder::new(self.table_ref(table), &page.records)
            .columns(columns)
            .chunk_rows(self.chunk_rows);

        let prelude: Vec<String> = if self.adapter.table_exists(&self.schema, table).await? {
            let existing = self.adapter.column_types(&self.schema, table).await?;
            self.widen_sql(table, &existing, &shape).into_iter().collect()
        } else {
            debug!(table = %self.qualified(table), columns = shape.len(), "Creating table from page shape");
            self.create_sql(table, &shape)
        };
        for ddl in prelude {
            request = request.prelude(ddl);
        }

        let written = self.adapter.copy_rows(request.build()).await?;
        Ok(written)
    }
}
