use model::{core::value::Value, records::record::Record};

/// Provides database-specific CSV encoding for COPY style ingestion.
pub trait CopyValueEncoder {
    /// Encodes a concrete value into the backend's CSV representation.
    fn encode_value(&self, value: &Value) -> String;

    /// Encodes a SQL NULL into its CSV literal form (e.g. `\N`).
    fn encode_null(&self) -> String;

    /// One newline-terminated CSV line holding `columns` of `record` in order.
    /// Fields missing from the record are written as NULL.
    fn encode_record(&self, record: &Record, columns: &[String]) -> String {
        let mut line = String::new();
        for (i, column) in columns.iter().enumerate() {
            if i > 0 {
                line.push(',');
            }
            match record.get(column) {
                Some(field) => line.push_str(&self.encode_value(&field.value)),
                None => line.push_str(&self.encode_null()),
            }
        }
        line.push('\n');
        line
    }
}
