use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use tracing::info;

pub mod defaults;
pub mod duration_serde;

use defaults::*;

/// Top-level application configuration
///
/// Loaded from a TOML file; every section has sensible defaults so an
/// empty file (or no file at all) yields a working configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Ordered list of EPG sources. Order matters: when two sources carry
    /// the same channel or programme, the earlier source wins.
    #[serde(default = "default_sources")]
    pub sources: Vec<SourceConfig>,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub epg: EpgConfig,
    #[serde(default)]
    pub ingestion: IngestionConfig,
}

/// One configured EPG source
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    /// URL (http/https) or local file path of an XMLTV document,
    /// optionally gzip-compressed
    pub url: String,
    /// Optional display name used in logs; defaults to the URL
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Path the merged XMLTV document is written to
    #[serde(default = "default_output_path")]
    pub path: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EpgConfig {
    /// Language code applied to display-name/title/desc elements that
    /// arrive without a lang attribute
    #[serde(default = "default_lang")]
    pub default_lang: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestionConfig {
    /// Total per-fetch timeout; a source exceeding it is skipped
    #[serde(with = "duration_serde::duration", default = "default_fetch_timeout")]
    pub fetch_timeout: Duration,
}

fn default_sources() -> Vec<SourceConfig> {
    DEFAULT_EPG_URLS
        .iter()
        .map(|url| SourceConfig {
            url: (*url).to_string(),
            name: None,
        })
        .collect()
}

fn default_output_path() -> PathBuf {
    PathBuf::from(DEFAULT_OUTPUT_PATH)
}

fn default_lang() -> String {
    DEFAULT_LANG.to_string()
}

fn default_fetch_timeout() -> Duration {
    Duration::from_secs(DEFAULT_FETCH_TIMEOUT_SECS)
}

impl Default for Config {
    fn default() -> Self {
        Self {
            sources: default_sources(),
            output: OutputConfig::default(),
            epg: EpgConfig::default(),
            ingestion: IngestionConfig::default(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: default_output_path(),
        }
    }
}

impl Default for EpgConfig {
    fn default() -> Self {
        Self {
            default_lang: default_lang(),
        }
    }
}

impl Default for IngestionConfig {
    fn default() -> Self {
        Self {
            fetch_timeout: default_fetch_timeout(),
        }
    }
}

impl Config {
    pub fn load_from_file(config_file: &str) -> Result<Self> {
        if std::path::Path::new(&config_file).exists() {
            let contents = std::fs::read_to_string(config_file)?;
            Ok(toml::from_str(&contents)?)
        } else {
            let default_config = Self::default();
            let contents = toml::to_string_pretty(&default_config)?;
            std::fs::write(config_file, contents)?;
            info!("Created default config file: {}", config_file);
            Ok(default_config)
        }
    }
}
