//! Batch drivers: the daily metadata sweep and the document fan-out.
//!
//! Both drivers run `Created → Running → Done` with no paused state and no
//! persisted checkpoint — rerunning after a crash re-fetches everything,
//! and deterministic destination paths make that idempotent (outputs are
//! overwritten, never appended). Individual fetch failures are reported in
//! the post-run summary, never escalated.

use std::path::PathBuf;

use chrono::NaiveDate;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::scheduler::{self, BatchSummary};
use crate::tsv::MetadataTable;
use crate::types::{ContentKind, DocumentId, FetchOutcome, FetchRequest};
use crate::worker::FetchWorker;

/// Name of the combined table a full-range metadata run produces
const COMBINED_LISTING_FILENAME: &str = "document_list.tsv";

/// Result of a full-range daily metadata run
#[derive(Debug)]
pub struct ListingRunReport {
    /// One outcome per date, in ascending date order
    pub outcomes: Vec<FetchOutcome>,
    /// Every non-empty per-date table concatenated in date order
    pub combined: MetadataTable,
    /// Where the combined table was written
    pub combined_path: PathBuf,
}

/// Fetches filing metadata for every date in a closed interval.
///
/// Dates are dispatched strictly one at a time in ascending order: the
/// listing endpoint is queried once per date and daily volume does not
/// justify concurrency risk, so this driver deliberately serializes and
/// reuses the scheduler only for its pre-batch quiescence throttle.
pub struct DailyMetadataDriver<'a> {
    worker: &'a FetchWorker,
    config: &'a Config,
}

impl<'a> DailyMetadataDriver<'a> {
    /// Create a driver over the given worker and configuration
    pub fn new(worker: &'a FetchWorker, config: &'a Config) -> Self {
        Self { worker, config }
    }

    /// Fetch listings for every date in `[start, end]` inclusive.
    ///
    /// Each date's rows are saved to `document_list_<date>.tsv` by the
    /// worker; dates whose outcome is `NotFound` or `EmptyResult` produce
    /// no file and contribute no rows. After the last date, all collected
    /// rows are written as one combined `document_list.tsv` (written even
    /// when every day was empty, so a full run always leaves its artifact).
    ///
    /// Fails with `InvalidParameter` if `start > end`; fetch failures are
    /// per-date outcomes, not errors.
    pub async fn run(&self, start: NaiveDate, end: NaiveDate) -> Result<ListingRunReport> {
        if start > end {
            return Err(Error::invalid_parameter(format!(
                "date range start {start} is after end {end}"
            )));
        }

        let mut outcomes = Vec::new();
        let mut combined = MetadataTable::default();
        let mut date = start;
        loop {
            let request = FetchRequest::listing(date, &self.config.tsv_dir);
            let mut batch = scheduler::run_batch(
                self.worker,
                vec![request],
                1,
                self.config.batch_delay,
            )
            .await?;

            if let Some(outcome) = batch.pop() {
                if let Some(table) = &outcome.listing {
                    combined.concat(table.clone());
                }
                outcomes.push(outcome);
            }

            match date.succ_opt() {
                Some(next) if next <= end => date = next,
                _ => break,
            }
        }

        let combined_path = self.config.tsv_dir.join(COMBINED_LISTING_FILENAME);
        combined.write(&combined_path)?;

        let summary = BatchSummary::of(&outcomes);
        tracing::info!(
            start = %start,
            end = %end,
            rows = combined.len(),
            path = %combined_path.display(),
            %summary,
            "metadata range complete"
        );

        Ok(ListingRunReport {
            outcomes,
            combined,
            combined_path,
        })
    }
}

/// Fans out document-content fetches for a set of identifiers in one
/// bounded-concurrency batch.
pub struct DocumentFetchDriver<'a> {
    worker: &'a FetchWorker,
    config: &'a Config,
}

impl<'a> DocumentFetchDriver<'a> {
    /// Create a driver over the given worker and configuration
    pub fn new(worker: &'a FetchWorker, config: &'a Config) -> Self {
        Self { worker, config }
    }

    /// Fetch `kind` content for every (id, target directory) pair.
    ///
    /// The whole set goes to the scheduler as one batch bounded by
    /// `max_concurrent_fetches`. Outcomes come back in input order; there
    /// is no combined table, document content has no tabular shape.
    pub async fn run(
        &self,
        documents: Vec<(DocumentId, PathBuf)>,
        kind: ContentKind,
    ) -> Result<Vec<FetchOutcome>> {
        let requests: Vec<FetchRequest> = documents
            .into_iter()
            .map(|(id, target_dir)| FetchRequest::document(id, kind, &target_dir))
            .collect();

        let outcomes = scheduler::run_batch(
            self.worker,
            requests,
            self.config.max_concurrent_fetches,
            self.config.batch_delay,
        )
        .await?;

        let summary = BatchSummary::of(&outcomes);
        tracing::info!(kind = kind.extension(), %summary, "document batch complete");
        Ok(outcomes)
    }
}
