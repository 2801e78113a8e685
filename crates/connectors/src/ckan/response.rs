use model::records::record::Record;
use serde::Deserialize;

/// Envelope every CKAN action answers with.
#[derive(Debug, Deserialize)]
pub struct ActionResponse<T> {
    pub success: bool,
    pub result: Option<T>,
    #[serde(default)]
    pub error: Option<serde_json::Value>,
}

/// `result` of `datastore_search` and `datastore_search_sql`.
#[derive(Debug, Deserialize)]
pub struct SearchResult {
    #[serde(default)]
    pub records: Vec<Record>,
    #[serde(default)]
    pub total: Option<u64>,
    /// Set when `total` is an estimate rather than an exact count.
    #[serde(default)]
    pub total_was_estimated: bool,
}

impl<T> ActionResponse<T> {
    /// Human readable form of the `error` object, e.g. `{"message": "..."}`.
    pub fn error_message(&self) -> String {
        match &self.error {
            Some(serde_json::Value::Object(map)) => map
                .get("message")
                .and_then(|m| m.as_str())
                .map(str::to_string)
                .unwrap_or_else(|| serde_json::Value::Object(map.clone()).to_string()),
            Some(other) => other.to_string(),
            None => "unknown error".to_string(),
        }
    }
}
