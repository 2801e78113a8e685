use crate::{metrics::MetricsSnapshot, progress::SyncStage, sync::freshness::FreshnessCheck};
use chrono::{DateTime, Utc};
use model::dataset::freshness::FreshnessMarker;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "strategy", rename_all = "snake_case")]
pub enum SyncMode {
    /// Drop and reload the whole table.
    Full,
    /// Delete and reload one partition (operating year).
    Scoped { year: i32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncOutcome {
    Skipped,
    Replicated,
}

/// What one dataset sync did, for logs and machine consumption.
#[derive(Debug, Clone, Serialize)]
pub struct SyncReport {
    pub dataset: String,
    pub table: String,
    pub mode: SyncMode,
    pub outcome: SyncOutcome,
    pub sink_marker: Option<FreshnessMarker>,
    pub source_marker: Option<FreshnessMarker>,
    pub metrics: MetricsSnapshot,
    pub stages: Vec<SyncStage>,
    pub started_at: DateTime<Utc>,
    pub elapsed_ms: u64,
}

impl SyncReport {
    pub fn rows_written(&self) -> u64 {
        self.metrics.rows_written
    }

    pub fn was_skipped(&self) -> bool {
        self.outcome == SyncOutcome::Skipped
    }

    pub(crate) fn with_check(mut self, check: &FreshnessCheck) -> Self {
        self.sink_marker = check.sink;
        self.source_marker = check.source;
        self
    }
}
