use connectors::ckan::client::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT};
use engine_core::connectors::sink::postgres::DEFAULT_SCHEMA;
use model::dataset::descriptor::DEFAULT_PAGE_SIZE;
use std::time::Duration;

/// Process-wide settings, resolved once at startup.
#[derive(Debug, Clone)]
pub struct RuntimeSettings {
    pub db_url: String,
    pub ckan_base_url: String,
    pub schema: String,
    pub page_size: usize,
    pub http_timeout: Duration,
}

impl RuntimeSettings {
    pub fn new(db_url: impl Into<String>) -> Self {
        RuntimeSettings {
            db_url: db_url.into(),
            ckan_base_url: DEFAULT_BASE_URL.to_string(),
            schema: DEFAULT_SCHEMA.to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            http_timeout: DEFAULT_TIMEOUT,
        }
    }
}
