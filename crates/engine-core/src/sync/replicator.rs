use crate::{
    connectors::source::PageRequest,
    context::SyncContext,
    error::SyncError,
    metrics::SyncMetrics,
    progress::{StageTracker, SyncStage},
    sync::{
        freshness::{self, FreshnessCheck},
        report::{SyncMode, SyncOutcome, SyncReport},
    },
};
use chrono::{DateTime, Utc};
use model::{
    dataset::{descriptor::DatasetDescriptor, filter::Filter},
    records::page::Page,
};
use std::time::Instant;
use tracing::{debug, error, info};

/// One sync of one dataset: the freshness gate, the clearing step and the
/// page loop, with the stage tracker and counters they share.
pub struct SyncRun<'a> {
    ctx: &'a SyncContext,
    dataset: &'a DatasetDescriptor,
    tracker: StageTracker,
    metrics: SyncMetrics,
    started_at: DateTime<Utc>,
    clock: Instant,
}

impl<'a> SyncRun<'a> {
    pub fn new(ctx: &'a SyncContext, dataset: &'a DatasetDescriptor) -> Self {
        SyncRun {
            ctx,
            dataset,
            tracker: StageTracker::new(&dataset.name),
            metrics: SyncMetrics::new(),
            started_at: Utc::now(),
            clock: Instant::now(),
        }
    }

    pub fn stage(&self) -> SyncStage {
        self.tracker.stage()
    }

    pub fn metrics(&self) -> &SyncMetrics {
        &self.metrics
    }

    /// Runs the freshness gate; a fresh sink ends the run as `Skipped`.
    pub async fn check_freshness(&mut self) -> Result<FreshnessCheck, SyncError> {
        let result = self.gate().await;
        self.settle(result)
    }

    /// Drops the table and reloads it from offset 0 under the logical filter.
    pub async fn replicate_full(&mut self) -> Result<u64, SyncError> {
        let result = self.full().await;
        self.settle(result)
    }

    /// Deletes one partition and reloads it, leaving sibling partitions alone.
    pub async fn replicate_scoped(&mut self, year: i32) -> Result<u64, SyncError> {
        let result = self.scoped(year).await;
        self.settle(result)
    }

    pub fn into_report(self, mode: SyncMode, outcome: SyncOutcome) -> SyncReport {
        SyncReport {
            dataset: self.dataset.name.clone(),
            table: self.dataset.table.clone(),
            mode,
            outcome,
            sink_marker: None,
            source_marker: None,
            metrics: self.metrics.snapshot(),
            stages: self.tracker.history().to_vec(),
            started_at: self.started_at,
            elapsed_ms: u64::try_from(self.clock.elapsed().as_millis()).unwrap_or(u64::MAX),
        }
    }

    async fn gate(&mut self) -> Result<FreshnessCheck, SyncError> {
        self.tracker.advance(SyncStage::CheckingFreshness)?;
        let check = freshness::check_freshness(self.ctx, self.dataset).await?;

        if let (Some(sink), Some(source)) = (check.sink, check.source)
            && !check.needs_sync()
        {
            info!(
                "{}: no news (source max {} <= sink max {})",
                self.dataset.table,
                source.date(),
                sink.date()
            );
            self.tracker.advance(SyncStage::Skipped)?;
        }
        Ok(check)
    }

    async fn full(&mut self) -> Result<u64, SyncError> {
        let dataset = self.dataset;
        dataset.validate()?;

        self.tracker.advance(SyncStage::Clearing)?;
        self.ctx.sink.drop_table(&dataset.table).await?;

        let total = self.paginate(dataset.filter.clone(), None).await?;
        info!("{}: inserted {} rows", dataset.table, total);
        Ok(total)
    }

    async fn scoped(&mut self, year: i32) -> Result<u64, SyncError> {
        let dataset = self.dataset;
        dataset.validate()?;
        let key = dataset.partition(year)?;

        self.tracker.advance(SyncStage::Clearing)?;
        self.ctx.sink.delete_where(&dataset.table, &key).await?;

        let filter = dataset.partitioned_filter(&key);
        let total = self.paginate(filter, Some(&key.field)).await?;
        info!(
            "{}: inserted {} rows for {}={}",
            dataset.table, total, key.field, key.value
        );
        Ok(total)
    }

    /// Fetch/write loop from offset 0. When `retype_field` is given and the
    /// very first page is empty, the loop restarts once with that field
    /// re-typed as a number.
    async fn paginate(
        &mut self,
        mut filter: Filter,
        retype_field: Option<&str>,
    ) -> Result<u64, SyncError> {
        let dataset = self.dataset;
        let mut retype_field = retype_field;
        let mut offset = 0;
        let mut total = 0;

        self.tracker.advance(SyncStage::Fetching)?;
        loop {
            let mut page = self.fetch(&filter, offset).await?;

            if page.is_empty() {
                if offset == 0
                    && let Some(field) = retype_field.take()
                    && let Some(retyped) = filter.retype_numeric(field)
                {
                    info!(
                        "{}: first page empty, retrying with {} as a number",
                        dataset.table, field
                    );
                    self.metrics.increment_retype_retries();
                    filter = retyped;
                    self.tracker.advance(SyncStage::Fetching)?;
                    continue;
                }
                break;
            }

            if let Some(field) = &dataset.trim_field {
                page.trim_text(field);
            }

            self.tracker.advance(SyncStage::Writing)?;
            let written = self.ctx.sink.append_rows(&dataset.table, &page).await?;
            self.metrics.increment_rows(written);
            total += written;
            info!("[{}] +{} (total {})", dataset.table, page.len(), total);

            if page.is_last() {
                break;
            }
            offset = page.next_offset();
            self.tracker.advance(SyncStage::Fetching)?;
        }

        self.tracker.advance(SyncStage::Done)?;
        Ok(total)
    }

    async fn fetch(&self, filter: &Filter, offset: usize) -> Result<Page, SyncError> {
        let request = PageRequest {
            resource_id: &self.dataset.resource_id,
            filter,
            limit: self.dataset.page_size,
            offset,
        };

        self.metrics.increment_fetch_calls();
        let page = self.ctx.source.fetch_page(request).await?;
        if !page.is_empty() {
            self.metrics.increment_pages();
            self.metrics.increment_bytes(page.size_bytes() as u64);
        }

        debug!(
            dataset = %self.dataset.name,
            offset,
            received = page.len(),
            total = ?page.total,
            "Fetched page"
        );
        Ok(page)
    }

    fn settle<T>(&mut self, result: Result<T, SyncError>) -> Result<T, SyncError> {
        if let Err(err) = &result {
            error!(
                dataset = %self.dataset.name,
                stage = %self.tracker.stage(),
                %err,
                "Sync failed"
            );
            self.tracker.fail();
        }
        result
    }
}

/// Full replace of a dataset; the caller has already decided a sync is due.
pub async fn replicate_full(
    ctx: &SyncContext,
    dataset: &DatasetDescriptor,
) -> Result<u64, SyncError> {
    SyncRun::new(ctx, dataset).replicate_full().await
}

/// Scoped replace of one partition; the caller has already decided a sync is due.
pub async fn replicate_scoped(
    ctx: &SyncContext,
    dataset: &DatasetDescriptor,
    year: i32,
) -> Result<u64, SyncError> {
    SyncRun::new(ctx, dataset).replicate_scoped(year).await
}
