//! Credential resolution for the remote registry API.
//!
//! Resolution happens once at process start: the `EDINET_API_KEY`
//! environment variable is consulted first, then an optional JSON key file
//! of the form `{"Subscription-Key": "..."}`. Core components receive the
//! resolved [`Credential`] explicitly; nothing in the fetch pipeline reads
//! ambient state. An empty or wrong key is not special-cased locally — the
//! remote rejection surfaces as an `HttpError` outcome like any other.

use serde::Deserialize;
use std::path::Path;

use crate::error::{Error, Result};
use crate::types::Credential;

/// Environment variable consulted before any key file
pub const CREDENTIAL_ENV_VAR: &str = "EDINET_API_KEY";

/// Shape of the JSON key file
#[derive(Debug, Deserialize)]
struct KeyFile {
    #[serde(rename = "Subscription-Key")]
    subscription_key: String,
}

/// Resolve a credential from the environment or an optional key file.
///
/// Fails with [`Error::Credential`] when neither source yields a non-empty
/// key, and with `Io`/`Serialization` errors when a supplied key file
/// cannot be read or parsed.
pub fn resolve(key_path: Option<&Path>) -> Result<Credential> {
    if let Ok(key) = std::env::var(CREDENTIAL_ENV_VAR)
        && !key.trim().is_empty()
    {
        tracing::debug!(source = "environment", "resolved subscription key");
        return Ok(Credential::new(key));
    }

    if let Some(path) = key_path {
        let raw = std::fs::read_to_string(path)?;
        let parsed: KeyFile = serde_json::from_str(&raw)?;
        tracing::debug!(source = "key file", path = %path.display(), "resolved subscription key");
        return Ok(Credential::new(parsed.subscription_key));
    }

    Err(Error::Credential(format!(
        "no {CREDENTIAL_ENV_VAR} environment variable set and no key file supplied"
    )))
}
