//! EPG source model and fetching
//!
//! A source identifier is either an http/https URL or a local file
//! path. Payloads are transparently gunzipped when the identifier ends
//! in `.gz` or the content starts with the gzip magic prefix, whatever
//! the extension says.

use bytes::Bytes;
use std::time::Duration;
use tracing::debug;

use crate::config::SourceConfig;
use crate::errors::{SourceError, SourceResult};
use crate::utils::url::UrlUtils;
use crate::utils::{CompressionFormat, DecompressionService, StandardHttpClient};

/// One EPG source to ingest
#[derive(Debug, Clone)]
pub struct EpgSource {
    /// Display name used in logs
    pub name: String,
    /// URL or local file path
    pub url: String,
}

impl From<&SourceConfig> for EpgSource {
    fn from(config: &SourceConfig) -> Self {
        Self {
            name: config
                .name
                .clone()
                .unwrap_or_else(|| UrlUtils::obfuscate_credentials(&config.url)),
            url: config.url.clone(),
        }
    }
}

/// Retrieves raw bytes for a source, decompressing gzip transparently
pub struct SourceFetcher {
    http_client: StandardHttpClient,
}

impl SourceFetcher {
    pub fn new(fetch_timeout: Duration) -> Self {
        Self {
            http_client: StandardHttpClient::with_timeout(fetch_timeout),
        }
    }

    /// Fetch one source and return its decompressed bytes
    pub async fn fetch(&self, source: &EpgSource) -> SourceResult<Vec<u8>> {
        let raw = if UrlUtils::is_http_url(&source.url) {
            self.http_client.fetch_bytes(&source.url).await?
        } else {
            tokio::fs::read(&source.url)
                .await
                .map_err(|e| SourceError::LocalRead {
                    path: source.url.clone(),
                    message: e.to_string(),
                })?
        };

        if source.url.ends_with(".gz")
            || DecompressionService::detect_compression_format(&raw) == CompressionFormat::Gzip
        {
            debug!("Decompressing gzip data for source '{}'", source.name);
            return DecompressionService::decompress_gzip(Bytes::from(raw))
                .map_err(|e| SourceError::decompress(&source.name, e.to_string()));
        }

        Ok(raw)
    }
}
