/// Configuration default values
///
/// This module contains all the default values for configuration options,
/// making them easily changeable in one central location.
// Source defaults
pub const DEFAULT_EPG_URLS: &[&str] = &[
    "https://github.com/globetvapp/epg/raw/main/Bulgaria/bulgaria1.xml",
    "https://iptv-epg.org/files/epg-bg.xml",
    "https://github.com/harrygg/EPG/raw/refs/heads/master/all-3days.basic.epg.xml.gz",
];

// Output defaults
pub const DEFAULT_OUTPUT_PATH: &str = "merged_epg.xml";

// EPG defaults
pub const DEFAULT_LANG: &str = "bg";

// Ingestion defaults
pub const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 60;
