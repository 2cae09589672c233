use serde::{Deserialize, Serialize};

use crate::search::provider::{DEFAULT_MAX_RESULTS, DEFAULT_MIN_QUERY_LEN};
use crate::search::ArchiveEndpoint;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub search: SearchConfig,

    #[serde(default)]
    pub archive: ArchiveConfig,

    #[serde(default)]
    pub enrichment: EnrichmentConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SearchConfig {
    /// Maximum candidates returned per search
    #[serde(default = "default_max_results")]
    pub max_results: usize,

    /// Queries shorter than this (in characters) return nothing
    #[serde(default = "default_min_query_len")]
    pub min_query_len: usize,

    /// Wall-clock timeout for each upstream request (5-10 seconds)
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Outgoing request budget shared by all remote lookups
    #[serde(default = "default_requests_per_second")]
    pub requests_per_second: u32,

    /// Provider id used when the caller does not name one ("auto" picks the
    /// first remote provider)
    #[serde(default = "default_provider")]
    pub default_provider: String,
}

fn default_max_results() -> usize {
    DEFAULT_MAX_RESULTS
}
fn default_min_query_len() -> usize {
    DEFAULT_MIN_QUERY_LEN
}
fn default_timeout_secs() -> u64 {
    8
}
fn default_requests_per_second() -> u32 {
    4
}
fn default_provider() -> String {
    "auto".to_string()
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_results: default_max_results(),
            min_query_len: default_min_query_len(),
            timeout_secs: default_timeout_secs(),
            requests_per_second: default_requests_per_second(),
            default_provider: default_provider(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ArchiveConfig {
    #[serde(default)]
    pub enabled: bool,

    /// Absolute http(s) base URL of the archive search API
    #[serde(default)]
    pub base_url: Option<String>,

    #[serde(default = "default_archive_id")]
    pub id: String,

    /// Display label, also stamped as the candidates' source
    #[serde(default = "default_archive_label")]
    pub label: String,

    #[serde(default)]
    pub endpoint: ArchiveEndpoint,
}

fn default_archive_id() -> String {
    "archive".to_string()
}
fn default_archive_label() -> String {
    "Archive".to_string()
}

impl Default for ArchiveConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            base_url: None,
            id: default_archive_id(),
            label: default_archive_label(),
            endpoint: ArchiveEndpoint::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EnrichmentConfig {
    #[serde(default = "default_enrichment_enabled")]
    pub enabled: bool,

    /// Base URL of the IIIF/OAI probe endpoints (defaults to the archive
    /// base URL)
    #[serde(default)]
    pub base_url: Option<String>,
}

fn default_enrichment_enabled() -> bool {
    true
}

impl Default for EnrichmentConfig {
    fn default() -> Self {
        Self {
            enabled: default_enrichment_enabled(),
            base_url: None,
        }
    }
}
