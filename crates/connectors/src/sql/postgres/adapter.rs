use crate::{
    error::{ConnectorError, DbError},
    sql::{
        base::{adapter::SqlAdapter, encoder::CopyValueEncoder, requests::CopyRowsRequest},
        postgres::{encoder::PgCopyValueEncoder, params::PgParamStore, utils::connect_client},
    },
};
use async_trait::async_trait;
use bytes::Bytes;
use futures_util::{SinkExt, pin_mut};
use model::core::value::Value;
use planner::query::{
    ast::{common::TableRef, copy::CopyFormat},
    builder::copy::CopyBuilder,
    dialect::{self},
    renderer::render,
};
use std::sync::Arc;
use tokio::sync::RwLock;
use tokio_postgres::Client;
use tracing::debug;

#[derive(Clone)]
pub struct PgAdapter {
    client: Arc<RwLock<Client>>,
    dialect: dialect::Postgres,
}

const QUERY_TABLE_EXISTS_SQL: &str = include_str!("sql/table_exists.sql");
const QUERY_COLUMN_TYPES_SQL: &str = include_str!("sql/column_types.sql");

impl PgAdapter {
    fn copy_statement(&self, table: &TableRef, columns: &[String]) -> String {
        let copy = CopyBuilder::new(table.clone())
            .columns(columns)
            .format(CopyFormat::Csv)
            .null_marker(PgCopyValueEncoder::NULL_MARKER)
            .build();
        render(&copy, &self.dialect).0
    }
}

#[async_trait]
impl SqlAdapter for PgAdapter {
    async fn connect(url: &str) -> Result<Self, ConnectorError> {
        let client = Arc::new(RwLock::new(connect_client(url).await?));
        Ok(PgAdapter {
            client,
            dialect: dialect::Postgres,
        })
    }

    async fn exec(&self, query: &str) -> Result<(), DbError> {
        let client = self.client.read().await;
        client.batch_execute(query).await?;
        Ok(())
    }

    async fn exec_params(&self, query: &str, params: Vec<Value>) -> Result<u64, DbError> {
        let bindings = PgParamStore::from_values(params);
        debug!(params = bindings.len(), "Executing parameterized statement");
        let client = self.client.read().await;
        let affected = client.execute(query, &bindings.as_refs()).await?;
        Ok(affected)
    }

    async fn query_text(&self, query: &str) -> Result<Option<String>, DbError> {
        let client = self.client.read().await;
        let Some(row) = client.query_opt(query, &[]).await? else {
            return Ok(None);
        };
        Ok(row.try_get::<_, Option<String>>(0)?)
    }

    async fn table_exists(&self, schema: &str, table: &str) -> Result<bool, DbError> {
        let client = self.client.read().await;
        let row = client
            .query_one(QUERY_TABLE_EXISTS_SQL, &[&schema, &table])
            .await?;
        Ok(row.try_get(0)?)
    }

    async fn column_types(
        &self,
        schema: &str,
        table: &str,
    ) -> Result<Vec<(String, String)>, DbError> {
        let client = self.client.read().await;
        let rows = client
            .query(QUERY_COLUMN_TYPES_SQL, &[&schema, &table])
            .await?;

        let columns = rows
            .iter()
            .map(|row| Ok((row.try_get::<_, String>(0)?, row.try_get::<_, String>(1)?)))
            .collect::<Result<Vec<_>, tokio_postgres::Error>>()?;
        Ok(columns)
    }

    async fn copy_rows(&self, request: CopyRowsRequest<'_>) -> Result<u64, DbError> {
        if request.records.is_empty() {
            return Ok(0);
        }
        if request.columns.is_empty() {
            return Err(DbError::Write(format!(
                "no columns to copy into {}",
                request.table.name
            )));
        }

        let statement = self.copy_statement(&request.table, &request.columns);
        let encoder = PgCopyValueEncoder::new();

        let mut client = self.client.write().await;
        let tx = client.transaction().await?;

        for ddl in &request.prelude {
            debug!(%ddl, "Executing prelude");
            tx.batch_execute(ddl).await?;
        }

        debug!("COPY statement: {}", statement);
        let sink = tx.copy_in(&statement).await?;
        pin_mut!(sink);

        for chunk in request.records.chunks(request.chunk_rows) {
            let mut data = String::new();
            for record in chunk {
                data.push_str(&encoder.encode_record(record, &request.columns));
            }
            sink.as_mut().send(Bytes::from(data)).await?;
        }

        let copied = sink.as_mut().finish().await?;
        tx.commit().await?;
        Ok(copied)
    }

    async fn ping(&self) -> Result<String, DbError> {
        let client = self.client.read().await;
        let row = client.query_one("SELECT version()", &[]).await?;
        Ok(row.try_get(0)?)
    }
}
