//! Core types for edinet-dl

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::tsv::MetadataTable;

/// Unique identifier for a filing document (e.g. "S100TR7I")
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentId(String);

impl DocumentId {
    /// Create a new DocumentId.
    ///
    /// Fails with `InvalidParameter` if the id is empty or whitespace-only,
    /// so a [`FetchRequest`] can never carry an unusable identifier.
    pub fn new(id: impl Into<String>) -> Result<Self> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(Error::invalid_parameter("document id must not be empty"));
        }
        Ok(Self(id))
    }

    /// Get the identifier as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for DocumentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for DocumentId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::new(s)
    }
}

/// Content form requested from the document endpoint
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentKind {
    /// XBRL structured-data archive (`type=1`, saved as `.zip`)
    StructuredArchive,
    /// Rendered PDF of the filing (`type=2`, saved as `.pdf`)
    RenderedDocument,
}

impl ContentKind {
    /// Value of the `type` query parameter on the document endpoint
    pub fn type_param(&self) -> &'static str {
        match self {
            ContentKind::StructuredArchive => "1",
            ContentKind::RenderedDocument => "2",
        }
    }

    /// File extension for the saved content
    pub fn extension(&self) -> &'static str {
        match self {
            ContentKind::StructuredArchive => "zip",
            ContentKind::RenderedDocument => "pdf",
        }
    }
}

/// Logical fetch operation against the remote registry
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FetchOperation {
    /// List filing metadata for one calendar date
    ListMetadata {
        /// The date to list filings for
        date: NaiveDate,
    },
    /// Fetch the content of one filing
    FetchDocument {
        /// The filing to fetch
        id: DocumentId,
        /// Which rendition of the filing to fetch
        kind: ContentKind,
    },
}

impl std::fmt::Display for FetchOperation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FetchOperation::ListMetadata { date } => write!(f, "listing {date}"),
            FetchOperation::FetchDocument { id, kind } => {
                write!(f, "document {id} ({})", kind.extension())
            }
        }
    }
}

/// One unit of work for the fetch worker.
///
/// Immutable once constructed; created by a batch driver and consumed
/// exactly once by the worker. The destination path is deterministic from
/// the operation parameters, so rerunning the same request overwrites
/// rather than duplicates its output.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FetchRequest {
    /// The logical operation to perform
    pub operation: FetchOperation,
    /// Where the response payload is written on success
    pub destination: PathBuf,
}

impl FetchRequest {
    /// Request the metadata listing for `date`, to be saved as
    /// `<tsv_dir>/document_list_<date>.tsv`.
    pub fn listing(date: NaiveDate, tsv_dir: &Path) -> Self {
        Self {
            operation: FetchOperation::ListMetadata { date },
            destination: tsv_dir.join(format!("document_list_{date}.tsv")),
        }
    }

    /// Request the content of one filing, to be saved as
    /// `<target_dir>/<id>.<ext>` where the extension follows `kind`.
    pub fn document(id: DocumentId, kind: ContentKind, target_dir: &Path) -> Self {
        let destination = target_dir.join(format!("{id}.{}", kind.extension()));
        Self {
            operation: FetchOperation::FetchDocument { id, kind },
            destination,
        }
    }
}

/// Terminal classification of one fetch attempt
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FetchStatus {
    /// HTTP 200 and the payload was written. Carries the row count for
    /// listing fetches and the byte count for document fetches.
    Success(u64),
    /// HTTP 404: the remote confirms there is no data for this query.
    /// Informational, not a failure of the system.
    NotFound,
    /// The remote rejected the request for a reason other than absence
    /// (credential, quota, or server-side issue)
    HttpError(u16),
    /// Connection, timeout, body-decode, or local write failure
    TransportError(String),
    /// HTTP 200 whose `results` collection was absent or empty
    EmptyResult,
}

impl FetchStatus {
    /// Whether this attempt produced an output file
    pub fn is_success(&self) -> bool {
        matches!(self, FetchStatus::Success(_))
    }

    /// Short label for summaries and logs
    pub fn kind(&self) -> &'static str {
        match self {
            FetchStatus::Success(_) => "success",
            FetchStatus::NotFound => "not-found",
            FetchStatus::HttpError(_) => "http-error",
            FetchStatus::TransportError(_) => "transport-error",
            FetchStatus::EmptyResult => "empty-result",
        }
    }
}

impl std::fmt::Display for FetchStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FetchStatus::Success(count) => write!(f, "success ({count})"),
            FetchStatus::NotFound => write!(f, "not found"),
            FetchStatus::HttpError(code) => write!(f, "http error {code}"),
            FetchStatus::TransportError(message) => write!(f, "transport error: {message}"),
            FetchStatus::EmptyResult => write!(f, "empty result"),
        }
    }
}

/// The terminal result of attempting one [`FetchRequest`].
///
/// Produced exactly once per request by the fetch worker and owned by the
/// batch driver that aggregates it.
#[derive(Clone, Debug)]
pub struct FetchOutcome {
    /// The request this outcome belongs to
    pub request: FetchRequest,
    /// How the attempt ended
    pub status: FetchStatus,
    /// Parsed rows of a successful listing fetch, so the daily driver can
    /// concatenate tables without re-reading files. `None` for document
    /// fetches and for every non-success status.
    pub listing: Option<MetadataTable>,
}

impl FetchOutcome {
    /// Outcome without an attached listing table
    pub(crate) fn new(request: FetchRequest, status: FetchStatus) -> Self {
        Self {
            request,
            status,
            listing: None,
        }
    }

    /// Outcome of a successful listing fetch carrying its parsed rows
    pub(crate) fn with_listing(
        request: FetchRequest,
        status: FetchStatus,
        listing: MetadataTable,
    ) -> Self {
        Self {
            request,
            status,
            listing: Some(listing),
        }
    }
}

/// Opaque API subscription key.
///
/// Resolved once at process start and shared read-only by every worker.
/// `Debug` output is redacted so the secret never lands in logs; the raw
/// value is only reachable through [`Credential::reveal`], which the request
/// builder uses to embed it as a query parameter.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    /// Wrap a resolved secret
    pub fn new(secret: impl Into<String>) -> Self {
        Self(secret.into())
    }

    /// The raw secret, for query-parameter embedding only
    pub fn reveal(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Credential(***)")
    }
}
