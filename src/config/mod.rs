mod types;

pub use types::*;

use anyhow::{Context, Result};
use std::num::NonZeroU32;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use crate::search::providers::archive::parse_base_url;
use crate::search::{
    ArchiveProvider, DemoProvider, EnrichmentProvider, Fetcher, HttpFetcher, ProviderRegistry,
    RecordProbe, SearchLimits,
};

/// Allowed range for `search.timeout_secs`.
const TIMEOUT_RANGE_SECS: std::ops::RangeInclusive<u64> = 5..=10;

/// Load configuration from a TOML file
pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    let config: Config = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {:?}", path))?;

    validate_config(&config)?;

    Ok(config)
}

/// Load config from default locations or return default config
pub fn load_config_or_default(custom_path: Option<&Path>) -> Result<Config> {
    if let Some(path) = custom_path {
        return load_config(path);
    }

    // Try default locations
    let default_paths = [
        "./kinsearch.toml",
        "~/.config/kinsearch/config.toml",
        "/etc/kinsearch/config.toml",
    ];

    for path_str in default_paths {
        let path = shellexpand::tilde(path_str);
        let path = Path::new(path.as_ref());
        if path.exists() {
            return load_config(path);
        }
    }

    Ok(Config::default())
}

/// Validate configuration
pub fn validate_config(config: &Config) -> Result<()> {
    let search = &config.search;
    if search.max_results == 0 {
        anyhow::bail!("search.max_results must be greater than 0");
    }
    if search.min_query_len == 0 {
        anyhow::bail!("search.min_query_len must be greater than 0");
    }
    if !TIMEOUT_RANGE_SECS.contains(&search.timeout_secs) {
        anyhow::bail!(
            "search.timeout_secs must be between {} and {} (got {})",
            TIMEOUT_RANGE_SECS.start(),
            TIMEOUT_RANGE_SECS.end(),
            search.timeout_secs
        );
    }
    if search.requests_per_second == 0 {
        anyhow::bail!("search.requests_per_second must be greater than 0");
    }

    let archive = &config.archive;
    if archive.enabled {
        let base_url = archive
            .base_url
            .as_deref()
            .context("archive.base_url is required when the archive provider is enabled")?;
        parse_base_url(base_url).context("archive.base_url is invalid")?;
        if archive.id.trim().is_empty() {
            anyhow::bail!("archive.id cannot be empty");
        }
        if archive.id.eq_ignore_ascii_case(crate::search::registry::AUTO)
            || archive.id == "demo"
        {
            anyhow::bail!("archive.id '{}' is reserved", archive.id);
        }
    }

    if let Some(base_url) = config.enrichment.base_url.as_deref() {
        parse_base_url(base_url).context("enrichment.base_url is invalid")?;
    }

    Ok(())
}

impl Config {
    /// Query floor and result ceiling from `[search]`.
    pub fn limits(&self) -> SearchLimits {
        SearchLimits {
            min_query_len: self.search.min_query_len,
            max_results: self.search.max_results,
        }
    }

    /// Base URL for enrichment probes, if any is configured.
    pub fn enrichment_base_url(&self) -> Option<&str> {
        self.enrichment.base_url.as_deref().or_else(|| {
            self.archive
                .enabled
                .then_some(self.archive.base_url.as_deref())
                .flatten()
        })
    }

    /// Shared HTTP fetcher honoring the configured timeout and rate limit.
    pub fn fetcher(&self) -> Arc<dyn Fetcher> {
        let mut fetcher = HttpFetcher::new(Duration::from_secs(self.search.timeout_secs));
        if let Some(rate) = NonZeroU32::new(self.search.requests_per_second) {
            fetcher = fetcher.with_rate_limit(rate);
        }
        Arc::new(fetcher)
    }
}

/// Build the process-wide provider registry: the demo provider plus the
/// archive provider when it is enabled.
pub fn build_registry(config: &Config, fetcher: Arc<dyn Fetcher>) -> Result<ProviderRegistry> {
    let limits = config.limits();
    let mut registry = ProviderRegistry::with_demo(Arc::new(DemoProvider::new(limits)));

    if config.archive.enabled {
        let base_url = config
            .archive
            .base_url
            .as_deref()
            .context("archive.base_url is required when the archive provider is enabled")?;
        let archive = ArchiveProvider::new(
            base_url,
            config.archive.label.clone(),
            config.archive.endpoint,
            limits,
            fetcher,
        )?
        .with_id(config.archive.id.clone());
        registry.register(Arc::new(archive));
    }

    tracing::debug!(providers = registry.len(), "Provider registry built");
    Ok(registry)
}

/// Build the enrichment providers. Empty when enrichment is disabled or no
/// probe base URL is known.
pub fn build_enrichers(
    config: &Config,
    fetcher: Arc<dyn Fetcher>,
) -> Result<Vec<Arc<dyn EnrichmentProvider>>> {
    if !config.enrichment.enabled {
        return Ok(Vec::new());
    }
    let Some(base_url) = config.enrichment_base_url() else {
        return Ok(Vec::new());
    };

    let enrichers: Vec<Arc<dyn EnrichmentProvider>> = vec![
        Arc::new(RecordProbe::iiif(base_url, fetcher.clone())?),
        Arc::new(RecordProbe::oai(base_url, fetcher)?),
    ];
    tracing::debug!(enrichers = enrichers.len(), "Enrichment providers built");
    Ok(enrichers)
}
