//! # edinet-dl
//!
//! Bulk acquisition pipeline for EDINET regulatory filings: turns a date
//! range or a set of document identifiers into a bounded-concurrency set of
//! HTTP fetches, each with its own success/failure outcome and output file,
//! plus aggregate reporting.
//!
//! ## Design Philosophy
//!
//! - **Failures are data** - every fetch attempt yields a [`FetchOutcome`];
//!   one request's failure never aborts its batch
//! - **Deterministic** - outcomes come back in input order, destination
//!   paths derive from request parameters, reruns overwrite
//! - **Polite by default** - batches are always concurrency-bounded and
//!   wait out a static quiescence period before dispatch
//! - **Library-first** - the CLI binary is a thin wrapper over the drivers
//!
//! ## Quick Start
//!
//! ```no_run
//! use chrono::NaiveDate;
//! use edinet_dl::{Config, DailyMetadataDriver, FetchWorker};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::default();
//!     let credential = edinet_dl::credential::resolve(None)?;
//!     let worker = FetchWorker::new(&config, credential)?;
//!
//!     let start = NaiveDate::from_ymd_opt(2024, 3, 1).ok_or("bad date")?;
//!     let end = NaiveDate::from_ymd_opt(2024, 3, 7).ok_or("bad date")?;
//!     let report = DailyMetadataDriver::new(&worker, &config)
//!         .run(start, end)
//!         .await?;
//!
//!     println!("combined table: {} rows", report.combined.len());
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]

/// Configuration types
pub mod config;
/// Credential resolution (environment variable or key file)
pub mod credential;
/// Batch drivers: daily metadata sweep and document fan-out
pub mod driver;
/// Error types
pub mod error;
/// URL construction for the remote endpoints
pub mod request;
/// Bounded-concurrency batch scheduling
pub mod scheduler;
/// TSV serialization of metadata listings
pub mod tsv;
/// Core types and outcomes
pub mod types;
/// Single-request fetch execution
pub mod worker;

// Re-export commonly used types
pub use config::Config;
pub use driver::{DailyMetadataDriver, DocumentFetchDriver, ListingRunReport};
pub use error::{Error, Result};
pub use request::RequestBuilder;
pub use scheduler::{BatchSummary, run_batch};
pub use tsv::{MetadataRecord, MetadataTable};
pub use types::{
    ContentKind, Credential, DocumentId, FetchOperation, FetchOutcome, FetchRequest, FetchStatus,
};
pub use worker::FetchWorker;
