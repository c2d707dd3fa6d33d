use reqwest::{Client, Response};
use std::time::Duration;
use tracing::debug;

use crate::errors::{SourceError, SourceResult};
use crate::utils::url::UrlUtils;

/// Thin reqwest wrapper with a fixed per-request timeout
///
/// The timeout bounds the whole request including the body read; on
/// expiry the fetch fails with [`SourceError::Timeout`] and the caller
/// skips that source. No retry is attempted.
pub struct StandardHttpClient {
    client: Client,
}

impl StandardHttpClient {
    /// Create new HTTP client with the given total request timeout
    pub fn with_timeout(timeout: Duration) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .expect("Failed to create HTTP client");

        Self { client }
    }

    /// Fetch URL and return the raw response body bytes
    pub async fn fetch_bytes(&self, url: &str) -> SourceResult<Vec<u8>> {
        debug!(
            "Fetching content from: {}",
            UrlUtils::obfuscate_credentials(url)
        );

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| Self::classify_error(url, &e))?;

        Self::process_response_to_bytes(response, url).await
    }

    /// Check the response status and read the body
    async fn process_response_to_bytes(response: Response, url: &str) -> SourceResult<Vec<u8>> {
        if !response.status().is_success() {
            return Err(SourceError::Http {
                status: response.status().as_u16(),
                message: response
                    .status()
                    .canonical_reason()
                    .unwrap_or("Unknown")
                    .to_string(),
                url: UrlUtils::obfuscate_credentials(url),
            });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| Self::classify_error(url, &e))?;

        debug!("Fetched {} bytes of raw content", bytes.len());
        Ok(bytes.to_vec())
    }

    fn classify_error(url: &str, error: &reqwest::Error) -> SourceError {
        let url = UrlUtils::obfuscate_credentials(url);
        if error.is_timeout() {
            SourceError::Timeout { url }
        } else {
            SourceError::Network {
                url,
                message: UrlUtils::obfuscate_credentials(&error.to_string()),
            }
        }
    }
}
