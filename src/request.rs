//! URL construction for the listing and document endpoints.
//!
//! Pure target construction: no I/O and no retained state beyond the base
//! URL and the credential. The remote API authenticates via a
//! `Subscription-Key` query parameter, so built URLs embed the secret —
//! callers must log the operation, never the URL itself.

use chrono::NaiveDate;
use url::Url;

use crate::error::{Error, Result};
use crate::types::{ContentKind, Credential, DocumentId, FetchOperation, FetchRequest};

/// `type` parameter selecting the full metadata listing (the API also
/// offers a count-only form under `type=1`)
const LISTING_TYPE: &str = "2";

/// Builds fully qualified request URLs for the two registry operations
#[derive(Clone, Debug)]
pub struct RequestBuilder {
    base: Url,
    credential: Credential,
}

impl RequestBuilder {
    /// Create a builder for the given API base URL.
    ///
    /// Fails with `InvalidParameter` if the base URL does not parse or
    /// cannot carry path segments.
    pub fn new(base_url: &str, credential: Credential) -> Result<Self> {
        let base = Url::parse(base_url).map_err(|e| {
            Error::invalid_parameter(format!("invalid base URL {base_url}: {e}"))
        })?;
        if base.cannot_be_a_base() {
            return Err(Error::invalid_parameter(format!(
                "base URL {base_url} cannot carry path segments"
            )));
        }
        Ok(Self { base, credential })
    }

    /// Target for the metadata listing of one calendar date
    pub fn listing_url(&self, date: NaiveDate) -> Url {
        let mut url = self.endpoint(&["documents.json"]);
        url.query_pairs_mut()
            .append_pair("date", &date.format("%Y-%m-%d").to_string())
            .append_pair("type", LISTING_TYPE)
            .append_pair("Subscription-Key", self.credential.reveal());
        url
    }

    /// Target for the content of one filing in the given form
    pub fn document_url(&self, id: &DocumentId, kind: ContentKind) -> Url {
        let mut url = self.endpoint(&["documents", id.as_str()]);
        url.query_pairs_mut()
            .append_pair("type", kind.type_param())
            .append_pair("Subscription-Key", self.credential.reveal());
        url
    }

    /// Target for a logical fetch request
    pub fn url_for(&self, request: &FetchRequest) -> Url {
        match &request.operation {
            FetchOperation::ListMetadata { date } => self.listing_url(*date),
            FetchOperation::FetchDocument { id, kind } => self.document_url(id, *kind),
        }
    }

    /// Base URL with `segments` appended to its path
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base.clone();
        // cannot_be_a_base was rejected in new(), so this branch always runs
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }
}
