//! Single-request execution: one HTTP round trip, classified into a
//! [`FetchOutcome`], with the output file written on success.
//!
//! The worker is total: every failure mode — connection errors, non-200
//! statuses, undecodable bodies, even local write failures — is captured as
//! data in the returned outcome. Nothing propagates past [`FetchWorker::execute`],
//! so one request's failure can never abort a batch.

use serde::Deserialize;

use crate::config::Config;
use crate::error::Result;
use crate::request::RequestBuilder;
use crate::tsv::{MetadataRecord, MetadataTable};
use crate::types::{Credential, FetchOperation, FetchOutcome, FetchRequest, FetchStatus};

/// Body shape of the listing endpoint; fields other than `results` are
/// passed over
#[derive(Debug, Deserialize)]
struct ListingResponse {
    #[serde(default)]
    results: Option<Vec<MetadataRecord>>,
}

/// Executes fetch requests against the remote registry.
///
/// Holds the shared HTTP client and the request builder with the resolved
/// credential; cheap to clone, and safe to share across a batch since both
/// are read-only.
#[derive(Clone, Debug)]
pub struct FetchWorker {
    client: reqwest::Client,
    builder: RequestBuilder,
}

impl FetchWorker {
    /// Create a worker for the configured base URL with the given credential
    pub fn new(config: &Config, credential: Credential) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()?;
        Ok(Self {
            client,
            builder: RequestBuilder::new(&config.base_url, credential)?,
        })
    }

    /// Execute exactly one network round trip and classify the result.
    ///
    /// - 200 on a listing request: parse the JSON body; an absent or empty
    ///   `results` array is `EmptyResult` (no file), otherwise the rows are
    ///   written as TSV to the destination and the outcome carries the row
    ///   count and the parsed table.
    /// - 200 on a document request: the raw body is written to the
    ///   destination; the outcome carries the byte count.
    /// - 404: `NotFound` — a defined remote response meaning "no data for
    ///   this query", not a transport error. No file is written.
    /// - any other status: `HttpError(code)`, no file.
    /// - connection/timeout/decode/write failure: `TransportError`, no file.
    ///
    /// The destination directory is created only once a response has been
    /// classified as writable, so failed requests never leave empty
    /// directories behind.
    pub async fn execute(&self, request: FetchRequest) -> FetchOutcome {
        let url = self.builder.url_for(&request);

        let response = match self.client.get(url).send().await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(operation = %request.operation, error = %e, "transport failure");
                return FetchOutcome::new(request, FetchStatus::TransportError(e.to_string()));
            }
        };

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            tracing::debug!(operation = %request.operation, "remote reports no data");
            return FetchOutcome::new(request, FetchStatus::NotFound);
        }
        if status != reqwest::StatusCode::OK {
            tracing::warn!(operation = %request.operation, status = status.as_u16(), "remote rejected request");
            return FetchOutcome::new(request, FetchStatus::HttpError(status.as_u16()));
        }

        let body = match response.bytes().await {
            Ok(body) => body,
            Err(e) => {
                tracing::warn!(operation = %request.operation, error = %e, "failed to read response body");
                return FetchOutcome::new(request, FetchStatus::TransportError(e.to_string()));
            }
        };

        match request.operation {
            FetchOperation::ListMetadata { .. } => self.complete_listing(request, &body),
            FetchOperation::FetchDocument { .. } => self.complete_document(request, &body),
        }
    }

    /// Parse a listing body and write it as TSV
    fn complete_listing(&self, request: FetchRequest, body: &[u8]) -> FetchOutcome {
        let parsed: ListingResponse = match serde_json::from_slice(body) {
            Ok(parsed) => parsed,
            Err(e) => {
                tracing::warn!(operation = %request.operation, error = %e, "listing body is not valid JSON");
                return FetchOutcome::new(
                    request,
                    FetchStatus::TransportError(format!("listing decode failed: {e}")),
                );
            }
        };

        let records = parsed.results.unwrap_or_default();
        if records.is_empty() {
            tracing::debug!(operation = %request.operation, "listing has no results");
            return FetchOutcome::new(request, FetchStatus::EmptyResult);
        }

        let table = MetadataTable::from_records(records);
        if let Err(e) = table.write(&request.destination) {
            tracing::warn!(
                operation = %request.operation,
                path = %request.destination.display(),
                error = %e,
                "failed to write listing"
            );
            return FetchOutcome::new(
                request,
                FetchStatus::TransportError(format!("write failed: {e}")),
            );
        }

        let rows = table.len() as u64;
        tracing::info!(
            operation = %request.operation,
            rows,
            path = %request.destination.display(),
            "listing saved"
        );
        FetchOutcome::with_listing(request, FetchStatus::Success(rows), table)
    }

    /// Write raw document content to the destination path
    fn complete_document(&self, request: FetchRequest, body: &[u8]) -> FetchOutcome {
        if let Some(parent) = request.destination.parent()
            && !parent.as_os_str().is_empty()
            && let Err(e) = std::fs::create_dir_all(parent)
        {
            tracing::warn!(
                operation = %request.operation,
                path = %parent.display(),
                error = %e,
                "failed to create destination directory"
            );
            return FetchOutcome::new(
                request,
                FetchStatus::TransportError(format!("create dir failed: {e}")),
            );
        }

        if let Err(e) = std::fs::write(&request.destination, body) {
            tracing::warn!(
                operation = %request.operation,
                path = %request.destination.display(),
                error = %e,
                "failed to write document"
            );
            return FetchOutcome::new(
                request,
                FetchStatus::TransportError(format!("write failed: {e}")),
            );
        }

        let bytes = body.len() as u64;
        tracing::info!(
            operation = %request.operation,
            bytes,
            path = %request.destination.display(),
            "document saved"
        );
        FetchOutcome::new(request, FetchStatus::Success(bytes))
    }
}

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ContentKind, DocumentId};
    use chrono::NaiveDate;
    use serde_json::json;
    use tempfile::TempDir;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_config(server: &MockServer) -> Config {
        Config {
            base_url: server.uri(),
            ..Config::default()
        }
    }

    fn worker_for(server: &MockServer) -> FetchWorker {
        FetchWorker::new(&test_config(server), Credential::new("test-key")).unwrap()
    }

    fn listing_request(temp_dir: &TempDir) -> FetchRequest {
        let date = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();
        FetchRequest::listing(date, temp_dir.path())
    }

    fn document_request(temp_dir: &TempDir, id: &str) -> FetchRequest {
        FetchRequest::document(
            DocumentId::new(id).unwrap(),
            ContentKind::StructuredArchive,
            temp_dir.path(),
        )
    }

    #[tokio::test]
    async fn listing_success_writes_tsv_and_reports_row_count() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/documents.json"))
            .and(query_param("date", "2024-03-05"))
            .and(query_param("type", "2"))
            .and(query_param("Subscription-Key", "test-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "results": [
                    {"docID": "S1", "filerName": "Acme"},
                    {"docID": "S2", "filerName": "Beta"},
                ]
            })))
            .mount(&server)
            .await;

        let temp_dir = TempDir::new().unwrap();
        let worker = worker_for(&server);
        let outcome = worker.execute(listing_request(&temp_dir)).await;

        assert_eq!(outcome.status, FetchStatus::Success(2));
        let table = outcome.listing.expect("successful listing carries its rows");
        assert_eq!(table.len(), 2);

        let saved = std::fs::read_to_string(&outcome.request.destination).unwrap();
        assert_eq!(
            saved.lines().count(),
            3,
            "header plus one line per reported row"
        );
    }

    #[tokio::test]
    async fn listing_with_empty_results_is_empty_result_without_file() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/documents.json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"results": []})))
            .mount(&server)
            .await;

        let temp_dir = TempDir::new().unwrap();
        let worker = worker_for(&server);
        let outcome = worker.execute(listing_request(&temp_dir)).await;

        assert_eq!(outcome.status, FetchStatus::EmptyResult);
        assert!(outcome.listing.is_none());
        assert!(!outcome.request.destination.exists());
    }

    #[tokio::test]
    async fn listing_with_absent_results_key_is_empty_result() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/documents.json"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"metadata": {"status": "200"}})),
            )
            .mount(&server)
            .await;

        let temp_dir = TempDir::new().unwrap();
        let worker = worker_for(&server);
        let outcome = worker.execute(listing_request(&temp_dir)).await;

        assert_eq!(outcome.status, FetchStatus::EmptyResult);
    }

    #[tokio::test]
    async fn listing_with_undecodable_body_is_transport_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/documents.json"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json at all"))
            .mount(&server)
            .await;

        let temp_dir = TempDir::new().unwrap();
        let worker = worker_for(&server);
        let outcome = worker.execute(listing_request(&temp_dir)).await;

        assert!(matches!(outcome.status, FetchStatus::TransportError(_)));
        assert!(!outcome.request.destination.exists());
    }

    #[tokio::test]
    async fn document_success_round_trips_bytes() {
        let payload: &[u8] = b"PK\x03\x04zip-like-bytes";
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/documents/S100TR7I"))
            .and(query_param("type", "1"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(payload))
            .mount(&server)
            .await;

        let temp_dir = TempDir::new().unwrap();
        let worker = worker_for(&server);
        let outcome = worker
            .execute(document_request(&temp_dir, "S100TR7I"))
            .await;

        assert_eq!(outcome.status, FetchStatus::Success(payload.len() as u64));
        let saved = std::fs::read(&outcome.request.destination).unwrap();
        assert_eq!(saved, payload, "file bytes must equal the reported count's payload");
    }

    #[tokio::test]
    async fn document_creates_missing_destination_directory() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/documents/S1"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"x".as_slice()))
            .mount(&server)
            .await;

        let temp_dir = TempDir::new().unwrap();
        let nested = temp_dir.path().join("a").join("b");
        let request = FetchRequest::document(
            DocumentId::new("S1").unwrap(),
            ContentKind::StructuredArchive,
            &nested,
        );

        let worker = worker_for(&server);
        let outcome = worker.execute(request).await;

        assert_eq!(outcome.status, FetchStatus::Success(1));
        assert!(nested.join("S1.zip").exists());
    }

    #[tokio::test]
    async fn http_404_is_not_found_and_creates_nothing() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/documents/S404"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let temp_dir = TempDir::new().unwrap();
        let nested = temp_dir.path().join("never-created");
        let request = FetchRequest::document(
            DocumentId::new("S404").unwrap(),
            ContentKind::StructuredArchive,
            &nested,
        );

        let worker = worker_for(&server);
        let outcome = worker.execute(request).await;

        assert_eq!(outcome.status, FetchStatus::NotFound);
        assert!(
            !nested.exists(),
            "directories are only created for writable responses"
        );
    }

    #[tokio::test]
    async fn other_statuses_are_http_errors() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/documents/S500"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/documents/S401"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let temp_dir = TempDir::new().unwrap();
        let worker = worker_for(&server);

        let outcome = worker.execute(document_request(&temp_dir, "S500")).await;
        assert_eq!(outcome.status, FetchStatus::HttpError(500));
        assert!(!outcome.request.destination.exists());

        // An auth rejection is not distinguished from other HTTP errors
        let outcome = worker.execute(document_request(&temp_dir, "S401")).await;
        assert_eq!(outcome.status, FetchStatus::HttpError(401));
    }

    #[tokio::test]
    async fn connection_failure_is_transport_error_not_panic() {
        // Start and immediately drop a server so the port refuses connections.
        // A pooled server (MockServer::start) keeps listening after drop, so
        // use a dedicated one whose listener closes when it goes out of scope.
        let server = MockServer::builder().start().await;
        let config = test_config(&server);
        drop(server);

        let worker = FetchWorker::new(&config, Credential::new("test-key")).unwrap();
        let temp_dir = TempDir::new().unwrap();
        let outcome = worker.execute(document_request(&temp_dir, "S1")).await;

        assert!(matches!(outcome.status, FetchStatus::TransportError(_)));
    }

    #[tokio::test]
    async fn rerunning_a_request_overwrites_the_output() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/documents/S1"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"same-bytes".as_slice()))
            .mount(&server)
            .await;

        let temp_dir = TempDir::new().unwrap();
        let worker = worker_for(&server);

        let first = worker.execute(document_request(&temp_dir, "S1")).await;
        let second = worker.execute(document_request(&temp_dir, "S1")).await;

        assert_eq!(first.status, second.status);
        assert_eq!(
            std::fs::read(&second.request.destination).unwrap(),
            b"same-bytes"
        );
        assert_eq!(
            std::fs::read_dir(temp_dir.path()).unwrap().count(),
            1,
            "rerun must overwrite, not duplicate"
        );
    }
}
