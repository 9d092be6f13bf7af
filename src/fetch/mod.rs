//! Acquisition of the raw survey file from disk or over HTTP.

mod basic;
mod client;

pub use basic::BasicClient;
pub use client::HttpClient;

use crate::error::{PipelineError, Result};
use tracing::{debug, info};

/// Downloads `url` through `client`, failing on any non-success status.
pub async fn fetch_bytes<C: HttpClient>(client: &C, url: &str) -> Result<Vec<u8>> {
    let fetch_err = |message: String| PipelineError::Fetch {
        url: url.to_string(),
        message,
    };

    let parsed = url
        .parse::<reqwest::Url>()
        .map_err(|e| fetch_err(format!("{e}")))?;
    let req = reqwest::Request::new(reqwest::Method::GET, parsed);

    let resp = client
        .execute(req)
        .await
        .and_then(|r| r.error_for_status())
        .map_err(|e| fetch_err(e.to_string()))?;

    let bytes = resp.bytes().await.map_err(|e| fetch_err(e.to_string()))?;
    Ok(bytes.to_vec())
}

/// Returns `true` when `location` should be fetched rather than read from disk.
pub fn is_remote(location: &str) -> bool {
    location.starts_with("http://") || location.starts_with("https://")
}

/// Loads the survey source from a local path or an `http(s)://` URL.
#[tracing::instrument(fields(source = %location))]
pub async fn read_source(location: &str) -> Result<Vec<u8>> {
    let bytes = if is_remote(location) {
        let client = BasicClient::new().map_err(|e| PipelineError::Fetch {
            url: location.to_string(),
            message: format!("building HTTP client: {e}"),
        })?;
        fetch_bytes(&client, location).await?
    } else {
        std::fs::read(location)?
    };

    debug!(bytes = bytes.len(), "Source bytes received");
    info!("Survey source loaded");
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::fs;

    #[test]
    fn test_is_remote() {
        assert!(is_remote("https://example.org/gss.csv"));
        assert!(is_remote("http://example.org/gss.csv"));
        assert!(!is_remote("data/gss2018.csv"));
        assert!(!is_remote("/tmp/https.csv"));
    }

    #[test]
    fn test_basic_client_builds_with_timeouts() {
        assert!(BasicClient::new().is_ok());
    }

    #[tokio::test]
    async fn test_fetch_bytes_rejects_invalid_url() {
        let client = BasicClient::new().unwrap();
        let result = fetch_bytes(&client, "not a url").await;
        assert!(matches!(result, Err(PipelineError::Fetch { .. })));
    }

    #[tokio::test]
    async fn test_read_source_local_file() {
        let path = format!("{}/gss_dashboard_read_source.csv", env::temp_dir().display());
        fs::write(&path, "id,sex\n1,male\n").unwrap();

        let bytes = read_source(&path).await.unwrap();
        assert_eq!(bytes, b"id,sex\n1,male\n");

        fs::remove_file(&path).unwrap();
    }

    #[tokio::test]
    async fn test_read_source_missing_file() {
        let path = format!("{}/gss_dashboard_does_not_exist.csv", env::temp_dir().display());
        let result = read_source(&path).await;
        assert!(matches!(result, Err(PipelineError::Io(_))));
    }
}
