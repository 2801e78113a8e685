//! In-memory stand-ins for the source, the sink and the SQL adapter.

use crate::{
    connectors::{
        sink::Sink,
        source::{PageRequest, Source},
    },
    context::SyncContext,
    error::{SinkError, SourceError},
};
use async_trait::async_trait;
use connectors::{
    error::{ConnectorError, DbError},
    sql::base::{adapter::SqlAdapter, requests::CopyRowsRequest},
};
use model::{
    core::value::Value,
    dataset::{
        descriptor::{DatasetDescriptor, PartitionKey},
        filter::{Filter, FilterValue},
    },
    records::{page::Page, record::Record},
};
use std::{
    collections::{HashMap, HashSet},
    sync::{Arc, Mutex},
};

pub fn continuity() -> DatasetDescriptor {
    DatasetDescriptor::new(
        "continuity",
        "4493985c-baea-429c-9df5-3030422c71d7",
        "stg_continuidades",
        Filter::new().with("SigIndicador", FilterValue::list(["DEC", "FEC"])),
    )
    .with_partition_field("AnoIndice")
    .with_trim_field("SigAgente")
}

pub fn compensation() -> DatasetDescriptor {
    DatasetDescriptor::new(
        "compensation",
        "364d945e-a18b-4111-ab1b-73aa0f7b06b1",
        "stg_compensacoes",
        Filter::new().with(
            "SigIndicador",
            FilterValue::list(["PGUCAT", "PGUCBTNU", "PGUCBTU", "PGUCMTNU", "PGUCMTU"]),
        ),
    )
    .with_partition_field("AnoIndice")
    .with_trim_field("SigAgente")
}

/// `n` continuity rows of year 2024, the year typed as text.
pub fn rows(n: usize) -> Vec<Record> {
    (0..n)
        .map(|i| {
            Record::from([
                ("_id", Value::Int(i as i64)),
                ("SigIndicador", Value::String("DEC".into())),
                ("AnoIndice", Value::String("2024".into())),
            ])
        })
        .collect()
}

pub fn context(source: FakeSource, sink: MemorySink) -> SyncContext {
    SyncContext::new(Arc::new(source), Arc::new(sink))
}

/// Type-strict match, as the upstream API does: a text condition never
/// matches a numeric field and the other way round.
fn filter_matches(record: &Record, filter: &Filter) -> bool {
    filter.iter().all(|(field, condition)| {
        match (condition, record.get_value(field)) {
            (FilterValue::Text(expected), Value::String(actual)) => *expected == actual,
            (FilterValue::Number(expected), Value::Int(actual)) => *expected == actual,
            (FilterValue::TextList(expected), Value::String(actual)) => expected.contains(&actual),
            _ => false,
        }
    })
}

#[derive(Default)]
struct FakeSourceState {
    marker: Option<String>,
    fail_marker: bool,
    page_cap: Option<usize>,
    hide_total: bool,
    fail_at: Option<usize>,
    offsets: Vec<usize>,
    marker_filters: Vec<Filter>,
}

#[derive(Clone)]
pub struct FakeSource {
    records: Arc<Vec<Record>>,
    state: Arc<Mutex<FakeSourceState>>,
}

impl FakeSource {
    pub fn new(records: Vec<Record>) -> Self {
        FakeSource {
            records: Arc::new(records),
            state: Arc::default(),
        }
    }

    pub fn with_marker(self, marker: &str) -> Self {
        self.state.lock().unwrap().marker = Some(marker.to_string());
        self
    }

    pub fn failing_marker(self) -> Self {
        self.state.lock().unwrap().fail_marker = true;
        self
    }

    /// Serves at most `cap` rows per page, whatever the requested limit.
    pub fn with_page_cap(self, cap: usize) -> Self {
        self.state.lock().unwrap().page_cap = Some(cap);
        self
    }

    pub fn without_total(self) -> Self {
        self.state.lock().unwrap().hide_total = true;
        self
    }

    /// The page requested at `offset` fails as an upstream timeout would.
    pub fn failing_page(self, offset: usize) -> Self {
        self.state.lock().unwrap().fail_at = Some(offset);
        self
    }

    /// Offsets of every page request, in order.
    pub fn offsets(&self) -> Vec<usize> {
        self.state.lock().unwrap().offsets.clone()
    }

    pub fn marker_filters(&self) -> Vec<Filter> {
        self.state.lock().unwrap().marker_filters.clone()
    }
}

#[async_trait]
impl Source for FakeSource {
    async fn max_text(
        &self,
        _resource_id: &str,
        _field: &str,
        filter: &Filter,
    ) -> Result<Option<String>, SourceError> {
        let mut state = self.state.lock().unwrap();
        state.marker_filters.push(filter.clone());
        if state.fail_marker {
            return Err(SourceError::Response("HTTP 503".to_string()));
        }
        Ok(state.marker.clone())
    }

    async fn fetch_page(&self, request: PageRequest<'_>) -> Result<Page, SourceError> {
        let mut state = self.state.lock().unwrap();
        state.offsets.push(request.offset);
        if state.fail_at == Some(request.offset) {
            return Err(SourceError::Response(format!(
                "timed out at offset {}",
                request.offset
            )));
        }

        let matching: Vec<&Record> = self
            .records
            .iter()
            .filter(|r| filter_matches(r, request.filter))
            .collect();
        let limit = state
            .page_cap
            .map_or(request.limit, |cap| cap.min(request.limit));
        let records = matching
            .iter()
            .skip(request.offset)
            .take(limit)
            .map(|r| (*r).clone())
            .collect();
        let total = (!state.hide_total).then_some(matching.len());

        Ok(Page::new(request.offset, records).with_total(total))
    }
}

#[derive(Default)]
struct MemorySinkState {
    tables: HashMap<String, Vec<Record>>,
    operations: Vec<String>,
    fail_appends: bool,
    fail_clear: bool,
}

#[derive(Clone, Default)]
pub struct MemorySink {
    state: Arc<Mutex<MemorySinkState>>,
}

impl MemorySink {
    pub fn with_rows(self, table: &str, rows: Vec<Record>) -> Self {
        self.state
            .lock()
            .unwrap()
            .tables
            .insert(table.to_string(), rows);
        self
    }

    pub fn failing_appends(self) -> Self {
        self.state.lock().unwrap().fail_appends = true;
        self
    }

    /// Both drop and partition delete fail.
    pub fn failing_clear(self) -> Self {
        self.state.lock().unwrap().fail_clear = true;
        self
    }

    pub fn rows(&self, table: &str) -> Vec<Record> {
        self.state
            .lock()
            .unwrap()
            .tables
            .get(table)
            .cloned()
            .unwrap_or_default()
    }

    pub fn operations(&self) -> Vec<String> {
        self.state.lock().unwrap().operations.clone()
    }
}

#[async_trait]
impl Sink for MemorySink {
    async fn max_text(&self, table: &str, field: &str) -> Option<String> {
        let state = self.state.lock().unwrap();
        state
            .tables
            .get(table)?
            .iter()
            .filter_map(|r| r.get_value(field).as_string())
            .max()
    }

    async fn drop_table(&self, table: &str) -> Result<(), SinkError> {
        let mut state = self.state.lock().unwrap();
        if state.fail_clear {
            return Err(DbError::Write(format!("permission denied for table {table}")).into());
        }
        state.tables.remove(table);
        state.operations.push(format!("drop {table}"));
        Ok(())
    }

    async fn delete_where(&self, table: &str, key: &PartitionKey) -> Result<u64, SinkError> {
        let mut state = self.state.lock().unwrap();
        if state.fail_clear {
            return Err(DbError::Write(format!("permission denied for table {table}")).into());
        }
        state
            .operations
            .push(format!("delete {table} {}={}", key.field, key.value));
        let Some(rows) = state.tables.get_mut(table) else {
            return Ok(0);
        };
        let before = rows.len();
        rows.retain(|r| r.get_value(&key.field).as_i64() != Some(i64::from(key.value)));
        Ok((before - rows.len()) as u64)
    }

    async fn append_rows(&self, table: &str, page: &Page) -> Result<u64, SinkError> {
        let mut state = self.state.lock().unwrap();
        if state.fail_appends {
            return Err(DbError::Write(format!("relation {table} is read-only")).into());
        }
        state
            .operations
            .push(format!("append {table} {}", page.len()));
        state
            .tables
            .entry(table.to_string())
            .or_default()
            .extend(page.records.iter().cloned());
        Ok(page.len() as u64)
    }
}

/// What a [`RecordingAdapter`] saw of one copy request.
#[derive(Debug, Clone)]
pub struct RecordedCopy {
    pub table: String,
    pub columns: Vec<String>,
    pub prelude: Vec<String>,
    pub rows: usize,
}

#[derive(Default)]
struct RecordingState {
    tables: HashSet<(String, String)>,
    columns: HashMap<(String, String), Vec<(String, String)>>,
    executed: Vec<String>,
    copies: Vec<RecordedCopy>,
}

/// SQL adapter that records statements instead of running them.
#[derive(Default)]
pub struct RecordingAdapter {
    state: Mutex<RecordingState>,
    fail_queries: bool,
}

impl RecordingAdapter {
    /// An existing table with `(column, data_type)` columns.
    pub fn with_columns(self, schema: &str, table: &str, columns: &[(&str, &str)]) -> Self {
        {
            let mut state = self.state.lock().unwrap();
            let key = (schema.to_string(), table.to_string());
            state.tables.insert(key.clone());
            state.columns.insert(
                key,
                columns
                    .iter()
                    .map(|(name, ty)| (name.to_string(), ty.to_string()))
                    .collect(),
            );
        }
        self
    }

    pub fn failing_queries(mut self) -> Self {
        self.fail_queries = true;
        self
    }

    pub fn executed(&self) -> Vec<String> {
        self.state.lock().unwrap().executed.clone()
    }

    pub fn copies(&self) -> Vec<RecordedCopy> {
        self.state.lock().unwrap().copies.clone()
    }
}

#[async_trait]
impl SqlAdapter for RecordingAdapter {
    async fn connect(_url: &str) -> Result<Self, ConnectorError> {
        Ok(RecordingAdapter::default())
    }

    async fn exec(&self, query: &str) -> Result<(), DbError> {
        self.state.lock().unwrap().executed.push(query.to_string());
        Ok(())
    }

    async fn exec_params(&self, query: &str, _params: Vec<Value>) -> Result<u64, DbError> {
        self.state.lock().unwrap().executed.push(query.to_string());
        Ok(0)
    }

    async fn query_text(&self, query: &str) -> Result<Option<String>, DbError> {
        if self.fail_queries {
            return Err(DbError::Write(format!("cannot run {query}")));
        }
        Ok(None)
    }

    async fn table_exists(&self, schema: &str, table: &str) -> Result<bool, DbError> {
        let state = self.state.lock().unwrap();
        Ok(state
            .tables
            .contains(&(schema.to_string(), table.to_string())))
    }

    async fn column_types(
        &self,
        schema: &str,
        table: &str,
    ) -> Result<Vec<(String, String)>, DbError> {
        let state = self.state.lock().unwrap();
        Ok(state
            .columns
            .get(&(schema.to_string(), table.to_string()))
            .cloned()
            .unwrap_or_default())
    }

    async fn copy_rows(&self, request: CopyRowsRequest<'_>) -> Result<u64, DbError> {
        let mut state = self.state.lock().unwrap();
        if let Some(schema) = &request.table.schema {
            state
                .tables
                .insert((schema.clone(), request.table.name.clone()));
        }
        state.copies.push(RecordedCopy {
            table: request.table.name.clone(),
            columns: request.columns.clone(),
            prelude: request.prelude.clone(),
            rows: request.records.len(),
        });
        Ok(request.records.len() as u64)
    }

    async fn ping(&self) -> Result<String, DbError> {
        Ok("recording".to_string())
    }
}
