//! Bounded-concurrency batch execution with deterministic outcome ordering.

use std::collections::HashSet;
use std::time::Duration;

use futures::stream::{self, StreamExt};

use crate::error::{Error, Result};
use crate::types::{FetchOutcome, FetchRequest, FetchStatus};
use crate::worker::FetchWorker;

/// Run one batch of fetch requests.
///
/// At most `max_concurrency` requests are in flight at once; requests
/// beyond the bound queue until a slot frees. Before the first dispatch a
/// `quiescence` delay elapses as a coarse, static throttle — a non-blocking
/// timer, so it never stalls unrelated work on the runtime.
///
/// Outcomes are returned in input order regardless of completion order, so
/// callers can zip inputs to outputs deterministically. One member's
/// failure never cancels or blocks its siblings; a failed outcome is
/// terminal for that request (no retry) and the batch always runs to
/// completion of all members.
///
/// Fails up front with `InvalidParameter` — before any network traffic —
/// if `max_concurrency` is zero or two requests share a destination path,
/// which would break the one-writer-per-path invariant the batch relies on
/// for filesystem safety.
pub async fn run_batch(
    worker: &FetchWorker,
    requests: Vec<FetchRequest>,
    max_concurrency: usize,
    quiescence: Duration,
) -> Result<Vec<FetchOutcome>> {
    if max_concurrency == 0 {
        return Err(Error::invalid_parameter("max_concurrency must be at least 1"));
    }

    let mut destinations = HashSet::new();
    for request in &requests {
        if !destinations.insert(request.destination.as_path()) {
            return Err(Error::invalid_parameter(format!(
                "duplicate destination path in batch: {}",
                request.destination.display()
            )));
        }
    }

    if !quiescence.is_zero() {
        tokio::time::sleep(quiescence).await;
    }

    tracing::debug!(
        batch_size = requests.len(),
        max_concurrency,
        "dispatching batch"
    );

    let mut indexed: Vec<(usize, FetchOutcome)> = stream::iter(requests.into_iter().enumerate())
        .map(|(index, request)| async move { (index, worker.execute(request).await) })
        .buffer_unordered(max_concurrency)
        .collect()
        .await;

    // Completion order is unconstrained; restore input order for callers.
    indexed.sort_by_key(|(index, _)| *index);
    Ok(indexed.into_iter().map(|(_, outcome)| outcome).collect())
}

/// Aggregate counts of outcome kinds for one batch.
///
/// Reported after a batch completes; individual failures never halt a run,
/// so the summary is how callers learn about them.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BatchSummary {
    /// Outcomes that produced an output file
    pub success: usize,
    /// Remote confirmed absence (HTTP 404)
    pub not_found: usize,
    /// Remote rejected the request (non-200, non-404)
    pub http_error: usize,
    /// Connection, timeout, decode, or write failures
    pub transport_error: usize,
    /// 200 responses with no usable payload
    pub empty_result: usize,
}

impl BatchSummary {
    /// Tally the outcomes of one batch
    pub fn of(outcomes: &[FetchOutcome]) -> Self {
        let mut summary = Self::default();
        for outcome in outcomes {
            match outcome.status {
                FetchStatus::Success(_) => summary.success += 1,
                FetchStatus::NotFound => summary.not_found += 1,
                FetchStatus::HttpError(_) => summary.http_error += 1,
                FetchStatus::TransportError(_) => summary.transport_error += 1,
                FetchStatus::EmptyResult => summary.empty_result += 1,
            }
        }
        summary
    }

    /// Total outcomes tallied
    pub fn total(&self) -> usize {
        self.success + self.not_found + self.http_error + self.transport_error + self.empty_result
    }

    /// Outcomes that indicate something actually went wrong (HTTP rejections
    /// and transport failures; absence and empty listings are informational)
    pub fn failures(&self) -> usize {
        self.http_error + self.transport_error
    }
}

impl std::fmt::Display for BatchSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} fetched, {} not found, {} empty, {} http errors, {} transport errors",
            self.success, self.not_found, self.empty_result, self.http_error, self.transport_error
        )
    }
}
