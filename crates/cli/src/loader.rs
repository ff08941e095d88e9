//! Fetching and parsing OpenAPI documents from URLs or local files.

use std::time::Duration;

use orq_core::{OpenApiDocument, SpecError};
use thiserror::Error;
use tracing::{debug, warn};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Why a document could not be loaded.
#[derive(Debug, Error)]
#[allow(missing_docs)]
pub enum LoadError {
    /// Connection, timeout or body read failure.
    #[error("Failed to fetch {url}: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// Non-success HTTP status.
    #[error("Failed to fetch {url}: HTTP {status}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },

    /// Local file could not be read.
    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The content is not an OpenAPI document.
    #[error("Failed to fetch/parse OpenAPI spec: {0}")]
    Spec(#[from] SpecError),
}

fn is_url(source: &str) -> bool {
    source.starts_with("http://") || source.starts_with("https://")
}

fn build_client() -> Result<reqwest::Client, reqwest::Error> {
    reqwest::Client::builder()
        .timeout(REQUEST_TIMEOUT)
        .user_agent(concat!("orq/", env!("CARGO_PKG_VERSION")))
        .build()
}

async fn fetch_text(url: &str) -> Result<String, LoadError> {
    let http_err = |source| LoadError::Http {
        url: url.to_string(),
        source,
    };

    let client = build_client().map_err(http_err)?;
    debug!(url, "Fetching OpenAPI document.");
    let response = client.get(url).send().await.map_err(http_err)?;

    let status = response.status();
    if !status.is_success() {
        warn!(url, %status, "OpenAPI document request failed.");
        return Err(LoadError::Status {
            url: url.to_string(),
            status,
        });
    }

    response.text().await.map_err(http_err)
}

async fn read_text(path: &str) -> Result<String, LoadError> {
    debug!(path, "Reading OpenAPI document.");
    tokio::fs::read_to_string(path)
        .await
        .map_err(|source| LoadError::Io {
            path: path.to_string(),
            source,
        })
}

/// Load an OpenAPI 3.x document from an `http(s)://` URL or a file path.
///
/// JSON is tried first, then YAML.
pub async fn load_document(source: &str) -> Result<OpenApiDocument, LoadError> {
    let text = if is_url(source) {
        fetch_text(source).await?
    } else {
        read_text(source).await?
    };

    let document = OpenApiDocument::parse(&text)?;
    debug!(
        source,
        paths = document.paths.len(),
        "Loaded OpenAPI document."
    );
    Ok(document)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_is_url() {
        assert!(is_url("https://petstore3.swagger.io/api/v3/openapi.json"));
        assert!(is_url("http://localhost:8080/openapi.yaml"));
        assert!(!is_url("./openapi.json"));
        assert!(!is_url("/abs/openapi.yaml"));
    }

    #[tokio::test]
    async fn test_missing_file_is_io_error() {
        let err = load_document("/definitely/not/here/openapi.json")
            .await
            .unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));
    }
}
