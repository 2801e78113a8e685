use model::core::value::Value;
use tokio_postgres::types::{Json, ToSql};

/// Owned bind parameter for tokio-postgres.
pub struct PgParam(Box<dyn ToSql + Sync + Send>);

impl From<Value> for PgParam {
    fn from(value: Value) -> Self {
        match value {
            Value::Int(v) => PgParam(Box::new(v)),
            Value::Float(v) => PgParam(Box::new(v)),
            Value::String(v) => PgParam(Box::new(v)),
            Value::Boolean(v) => PgParam(Box::new(v)),
            Value::Json(v) => PgParam(Box::new(Json(v))),
            // Untyped NULL; the server infers the type from the statement.
            Value::Null => PgParam(Box::new(Option::<String>::None)),
        }
    }
}

/// Keeps the boxed parameters alive for the duration of a call.
pub struct PgParamStore {
    params: Vec<PgParam>,
}

impl PgParamStore {
    pub fn from_values(values: Vec<Value>) -> Self {
        Self {
            params: values.into_iter().map(PgParam::from).collect(),
        }
    }

    pub fn as_refs(&self) -> Vec<&(dyn ToSql + Sync)> {
        self.params
            .iter()
            .map(|p| &*p.0 as &(dyn ToSql + Sync))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }
}
