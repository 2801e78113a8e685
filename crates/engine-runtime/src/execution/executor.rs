use crate::{catalog::DatasetKind, error::RunError, execution::settings::RuntimeSettings};
use chrono::{Datelike, Local};
use engine_core::{
    context::SyncContext,
    error::SyncError,
    sync::{self, FreshnessCheck, SyncMode, SyncReport},
};
use serde::Serialize;
use tracing::{error, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum JobMode {
    Full,
    /// Scoped to one operating year; the current year when `year` is `None`.
    CurrentYear { year: Option<i32> },
}

/// One dataset synced with one strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SyncJob {
    pub dataset: DatasetKind,
    pub mode: JobMode,
}

impl SyncJob {
    pub fn new(dataset: DatasetKind, mode: JobMode) -> Self {
        SyncJob { dataset, mode }
    }

    pub fn sync_mode(&self) -> SyncMode {
        match self.mode {
            JobMode::Full => SyncMode::Full,
            JobMode::CurrentYear { year } => SyncMode::Scoped {
                year: year.unwrap_or_else(current_year),
            },
        }
    }
}

pub struct JobResult {
    pub job: SyncJob,
    pub result: Result<SyncReport, SyncError>,
}

/// The operating year, from the local clock.
pub fn current_year() -> i32 {
    Local::now().year()
}

pub async fn run_job(
    ctx: &SyncContext,
    settings: &RuntimeSettings,
    job: SyncJob,
) -> Result<SyncReport, SyncError> {
    let dataset = job.dataset.descriptor(settings.page_size);
    info!(dataset = %job.dataset, mode = ?job.sync_mode(), "Starting sync");
    sync::sync(ctx, &dataset, job.sync_mode()).await
}

/// Runs the jobs one after the other. A failed job is logged and does not
/// stop the ones after it.
pub async fn run_jobs(
    ctx: &SyncContext,
    settings: &RuntimeSettings,
    jobs: &[SyncJob],
) -> Vec<JobResult> {
    let mut results = Vec::with_capacity(jobs.len());
    for (idx, job) in jobs.iter().enumerate() {
        info!("Processing job {}/{}: {}", idx + 1, jobs.len(), job.dataset);
        let result = run_job(ctx, settings, *job).await;
        if let Err(err) = &result {
            error!(dataset = %job.dataset, %err, "Sync job failed");
        }
        results.push(JobResult { job: *job, result });
    }
    results
}

pub fn summarize(results: &[JobResult]) -> Result<(), RunError> {
    let failed = results.iter().filter(|r| r.result.is_err()).count();
    if failed > 0 {
        return Err(RunError::JobsFailed {
            failed,
            total: results.len(),
        });
    }
    Ok(())
}

/// Freshness verdicts only; reads both ends and writes nothing.
pub async fn check(
    ctx: &SyncContext,
    settings: &RuntimeSettings,
    datasets: &[DatasetKind],
) -> Result<Vec<(DatasetKind, FreshnessCheck)>, RunError> {
    let mut checks = Vec::with_capacity(datasets.len());
    for kind in datasets {
        let dataset = kind.descriptor(settings.page_size);
        let check = sync::check_freshness(ctx, &dataset).await?;
        checks.push((*kind, check));
    }
    Ok(checks)
}

pub async fn load_continuity_full(
    ctx: &SyncContext,
    settings: &RuntimeSettings,
) -> Result<SyncReport, RunError> {
    let job = SyncJob::new(DatasetKind::Continuity, JobMode::Full);
    Ok(run_job(ctx, settings, job).await?)
}

pub async fn load_compensation_full(
    ctx: &SyncContext,
    settings: &RuntimeSettings,
) -> Result<SyncReport, RunError> {
    let job = SyncJob::new(DatasetKind::Compensation, JobMode::Full);
    Ok(run_job(ctx, settings, job).await?)
}

pub async fn load_continuity_current_year(
    ctx: &SyncContext,
    settings: &RuntimeSettings,
    year: Option<i32>,
) -> Result<SyncReport, RunError> {
    let job = SyncJob::new(DatasetKind::Continuity, JobMode::CurrentYear { year });
    Ok(run_job(ctx, settings, job).await?)
}

pub async fn load_compensation_current_year(
    ctx: &SyncContext,
    settings: &RuntimeSettings,
    year: Option<i32>,
) -> Result<SyncReport, RunError> {
    let job = SyncJob::new(DatasetKind::Compensation, JobMode::CurrentYear { year });
    Ok(run_job(ctx, settings, job).await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{COMPENSATION_RESOURCE_ID, CONTINUITY_RESOURCE_ID};
    use async_trait::async_trait;
    use engine_core::{
        connectors::{
            sink::Sink,
            source::{PageRequest, Source},
        },
        error::{SinkError, SourceError},
        sync::SyncOutcome,
    };
    use model::{
        dataset::{descriptor::PartitionKey, filter::Filter},
        records::page::Page,
    };
    use std::sync::{Arc, Mutex};

    /// Upstream where the continuity resource is unreachable and the
    /// compensation resource is empty.
    #[derive(Default)]
    struct PartialOutage {
        filters: Mutex<Vec<Filter>>,
    }

    #[async_trait]
    impl Source for PartialOutage {
        async fn max_text(
            &self,
            resource_id: &str,
            _field: &str,
            _filter: &Filter,
        ) -> Result<Option<String>, SourceError> {
            if resource_id == CONTINUITY_RESOURCE_ID {
                return Err(SourceError::Response("HTTP 502".into()));
            }
            Ok(None)
        }

        async fn fetch_page(&self, request: PageRequest<'_>) -> Result<Page, SourceError> {
            assert_eq!(request.resource_id, COMPENSATION_RESOURCE_ID);
            self.filters.lock().unwrap().push(request.filter.clone());
            Ok(Page::new(request.offset, Vec::new()))
        }
    }

    #[derive(Default)]
    struct NullSink {
        deleted: Mutex<Vec<PartitionKey>>,
    }

    #[async_trait]
    impl Sink for NullSink {
        async fn max_text(&self, _table: &str, _field: &str) -> Option<String> {
            None
        }

        async fn drop_table(&self, _table: &str) -> Result<(), SinkError> {
            Ok(())
        }

        async fn delete_where(&self, _table: &str, key: &PartitionKey) -> Result<u64, SinkError> {
            self.deleted.lock().unwrap().push(key.clone());
            Ok(0)
        }

        async fn append_rows(&self, _table: &str, page: &Page) -> Result<u64, SinkError> {
            Ok(page.len() as u64)
        }
    }

    fn settings() -> RuntimeSettings {
        RuntimeSettings::new("postgres://localhost/test")
    }

    #[test]
    fn test_current_year_mode_defaults_to_clock() {
        let job = SyncJob::new(DatasetKind::Continuity, JobMode::CurrentYear { year: None });
        assert_eq!(
            job.sync_mode(),
            SyncMode::Scoped {
                year: current_year()
            }
        );

        let pinned = SyncJob::new(
            DatasetKind::Continuity,
            JobMode::CurrentYear { year: Some(2023) },
        );
        assert_eq!(pinned.sync_mode(), SyncMode::Scoped { year: 2023 });
    }

    #[tokio::test]
    async fn test_failed_job_does_not_stop_the_next() {
        let source = Arc::new(PartialOutage::default());
        let ctx = SyncContext::new(source.clone(), Arc::new(NullSink::default()));
        let jobs = [
            SyncJob::new(DatasetKind::Continuity, JobMode::Full),
            SyncJob::new(DatasetKind::Compensation, JobMode::Full),
        ];

        let results = run_jobs(&ctx, &settings(), &jobs).await;

        assert!(results[0].result.is_err());
        let report = results[1].result.as_ref().unwrap();
        assert_eq!(report.outcome, SyncOutcome::Replicated);
        assert_eq!(report.rows_written(), 0);
        assert!(matches!(
            summarize(&results),
            Err(RunError::JobsFailed {
                failed: 1,
                total: 2
            })
        ));
    }

    #[tokio::test]
    async fn test_current_year_entry_point_scopes_partition() {
        let source = Arc::new(PartialOutage::default());
        let sink = Arc::new(NullSink::default());
        let ctx = SyncContext::new(source.clone(), sink.clone());

        let report = load_compensation_current_year(&ctx, &settings(), Some(2025))
            .await
            .unwrap();

        assert_eq!(report.mode, SyncMode::Scoped { year: 2025 });
        assert_eq!(
            *sink.deleted.lock().unwrap(),
            vec![PartitionKey::new("AnoIndice", 2025)]
        );
        // Text-typed attempt, then the numeric retry.
        let filters = source.filters.lock().unwrap();
        assert_eq!(filters.len(), 2);
        assert_eq!(
            filters[1].to_json().unwrap(),
            r#"{"AnoIndice":2025,"SigIndicador":["PGUCAT","PGUCBTNU","PGUCBTU","PGUCMTNU","PGUCMTU"]}"#
        );
    }

    #[tokio::test]
    async fn test_source_outage_fails_entry_point() {
        let ctx = SyncContext::new(
            Arc::new(PartialOutage::default()),
            Arc::new(NullSink::default()),
        );
        assert!(matches!(
            load_continuity_full(&ctx, &settings()).await,
            Err(RunError::Sync(SyncError::Source(_)))
        ));
    }
}
