use crate::sql::base::encoder::CopyValueEncoder;
use model::core::{utils::escape_csv_string, value::Value};

/// Encodes values for `COPY ... FROM STDIN (FORMAT csv, NULL '\N')`.
#[derive(Debug, Default, Clone, Copy)]
pub struct PgCopyValueEncoder;

impl PgCopyValueEncoder {
    pub const NULL_MARKER: &'static str = "\\N";

    pub fn new() -> Self {
        Self
    }
}

impl CopyValueEncoder for PgCopyValueEncoder {
    fn encode_value(&self, value: &Value) -> String {
        match value {
            Value::Null => self.encode_null(),
            Value::String(s) => escape_csv_string(s),
            Value::Json(v) => escape_csv_string(&v.to_string()),
            Value::Boolean(v) => v.to_string(),
            Value::Int(v) => v.to_string(),
            Value::Float(v) => ryu::Buffer::new().format(*v).to_string(),
        }
    }

    fn encode_null(&self) -> String {
        Self::NULL_MARKER.to_string()
    }
}
