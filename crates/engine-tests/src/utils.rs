#![allow(dead_code)]

use crate::TEST_SCHEMA;
use async_trait::async_trait;
use connectors::sql::{base::adapter::SqlAdapter, postgres::adapter::PgAdapter};
use engine_core::{
    connectors::source::{PageRequest, Source},
    error::SourceError,
};
use model::{
    core::value::Value,
    dataset::filter::{Filter, FilterValue},
    records::{page::Page, record::Record},
};
use std::sync::Mutex;

/// One upstream row shaped like the continuity dataset.
pub fn indicator_row(id: i64, agent: &str, indicator: &str, year: i32, generated: &str) -> Record {
    Record::from([
        ("_id", Value::Int(id)),
        ("DatGeracaoConjuntoDados", Value::String(generated.into())),
        ("SigAgente", Value::String(agent.into())),
        ("SigIndicador", Value::String(indicator.into())),
        ("AnoIndice", Value::String(year.to_string())),
        ("VlrIndiceEnviado", Value::Float(1.5 + id as f64)),
    ])
}

/// In-process upstream backed by a fixed row set. Filters compare the
/// textual form of the row value, like the datastore does for text columns.
pub struct StaticSource {
    records: Mutex<Vec<Record>>,
}

impl StaticSource {
    pub fn new(records: Vec<Record>) -> Self {
        Self {
            records: Mutex::new(records),
        }
    }

    pub fn replace(&self, records: Vec<Record>) {
        *self.records.lock().unwrap() = records;
    }

    fn matching(&self, filter: &Filter) -> Vec<Record> {
        self.records
            .lock()
            .unwrap()
            .iter()
            .filter(|record| {
                filter.iter().all(|(field, accepted)| {
                    let Some(actual) = record.get_value(field).as_string() else {
                        return false;
                    };
                    match accepted {
                        FilterValue::Text(v) => *v == actual,
                        FilterValue::Number(v) => v.to_string() == actual,
                        FilterValue::TextList(vs) => vs.contains(&actual),
                    }
                })
            })
            .cloned()
            .collect()
    }
}

#[async_trait]
impl Source for StaticSource {
    async fn max_text(
        &self,
        _resource_id: &str,
        field: &str,
        filter: &Filter,
    ) -> Result<Option<String>, SourceError> {
        Ok(self
            .matching(filter)
            .iter()
            .filter_map(|r| r.get_value(field).as_string())
            .max())
    }

    async fn fetch_page(&self, request: PageRequest<'_>) -> Result<Page, SourceError> {
        let matching = self.matching(request.filter);
        let total = matching.len();
        let records = matching
            .into_iter()
            .skip(request.offset)
            .take(request.limit)
            .collect();
        Ok(Page::new(request.offset, records).with_total(Some(total)))
    }
}

fn qualified(table: &str) -> String {
    format!(r#""{TEST_SCHEMA}"."{table}""#)
}

pub async fn get_row_count(pg: &PgAdapter, table: &str) -> u64 {
    pg.query_text(&format!("SELECT COUNT(*)::text FROM {}", qualified(table)))
        .await
        .expect("count rows")
        .and_then(|n| n.parse().ok())
        .unwrap_or(0)
}

pub async fn get_year_count(pg: &PgAdapter, table: &str, year: i32) -> u64 {
    pg.query_text(&format!(
        r#"SELECT COUNT(*)::text FROM {} WHERE "AnoIndice" = '{year}'"#,
        qualified(table)
    ))
    .await
    .expect("count year rows")
    .and_then(|n| n.parse().ok())
    .unwrap_or(0)
}

pub async fn assert_table_exists(pg: &PgAdapter, table: &str, should: bool) {
    let exists = pg
        .table_exists(TEST_SCHEMA, table)
        .await
        .expect("table lookup");
    assert_eq!(
        exists, should,
        "expected table '{table}' existence == {should}"
    );
}

/// Column names in table order.
pub async fn get_column_names(pg: &PgAdapter, table: &str) -> Vec<String> {
    let joined = pg
        .query_text(&format!(
            "SELECT string_agg(column_name::text, ',' ORDER BY ordinal_position) \
             FROM information_schema.columns \
             WHERE table_schema = '{TEST_SCHEMA}' AND table_name = '{table}'"
        ))
        .await
        .expect("column lookup")
        .unwrap_or_default();
    joined
        .split(',')
        .filter(|c| !c.is_empty())
        .map(str::to_string)
        .collect()
}

/// Data type of one column as information_schema reports it.
pub async fn get_column_type(pg: &PgAdapter, table: &str, column: &str) -> Option<String> {
    pg.query_text(&format!(
        "SELECT data_type::text FROM information_schema.columns \
         WHERE table_schema = '{TEST_SCHEMA}' AND table_name = '{table}' AND column_name = '{column}'"
    ))
    .await
    .expect("column type lookup")
}

pub async fn get_cell_as_string(pg: &PgAdapter, table: &str, column: &str, id: i64) -> Option<String> {
    pg.query_text(&format!(
        r#"SELECT "{column}"::text FROM {} WHERE "_id" = {id}"#,
        qualified(table)
    ))
    .await
    .expect("cell lookup")
}
