//! Configuration types for edinet-dl

use serde::{Deserialize, Serialize};
use std::{path::PathBuf, time::Duration};

/// Main configuration for the fetch pipeline
///
/// Every field has a sensible default, so `Config::default()` works out of
/// the box against the production EDINET endpoint. Serialized form uses
/// whole seconds for durations.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    /// Base URL of the document registry API
    /// (default: "https://api.edinet-fsa.go.jp/api/v2")
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Directory for per-date and combined metadata TSV files (default: "./tsv")
    #[serde(default = "default_tsv_dir")]
    pub tsv_dir: PathBuf,

    /// Default directory for downloaded document content (default: "./doc")
    #[serde(default = "default_doc_dir")]
    pub doc_dir: PathBuf,

    /// Maximum simultaneously in-flight fetches in one document batch
    /// (default: 16)
    ///
    /// Always bounded: the scheduler rejects a zero bound rather than
    /// falling back to an unbounded fan-out against the remote service.
    #[serde(default = "default_max_concurrent")]
    pub max_concurrent_fetches: usize,

    /// Minimum quiescence before a batch is issued (default: 5 seconds)
    ///
    /// A coarse, static throttle to avoid bursting the remote service right
    /// after a prior batch; not adaptive backoff.
    #[serde(default = "default_batch_delay", with = "duration_serde")]
    pub batch_delay: Duration,

    /// Per-request timeout on the HTTP client (default: 30 seconds)
    #[serde(default = "default_request_timeout", with = "duration_serde")]
    pub request_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            tsv_dir: default_tsv_dir(),
            doc_dir: default_doc_dir(),
            max_concurrent_fetches: default_max_concurrent(),
            batch_delay: default_batch_delay(),
            request_timeout: default_request_timeout(),
        }
    }
}

fn default_base_url() -> String {
    "https://api.edinet-fsa.go.jp/api/v2".to_string()
}

fn default_tsv_dir() -> PathBuf {
    PathBuf::from("./tsv")
}

fn default_doc_dir() -> PathBuf {
    PathBuf::from("./doc")
}

fn default_max_concurrent() -> usize {
    16
}

fn default_batch_delay() -> Duration {
    Duration::from_secs(5)
}

fn default_request_timeout() -> Duration {
    Duration::from_secs(30)
}

// Duration serialization helper (whole seconds)
mod duration_serde {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(duration.as_secs())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = u64::deserialize(deserializer)?;
        Ok(Duration::from_secs(secs))
    }
}
