//! Remote archive search provider.
//!
//! Queries `GET <base>/records?name=<q>&limit=<n>` (or the `/persons`
//! variant), resolves the item list from whatever envelope the backend
//! currently uses, keeps only items classified as people, and maps each one
//! through the shared field pickers into a normalized [`Candidate`].

use std::sync::Arc;

use anyhow::Context;
use async_trait::async_trait;
use reqwest::Url;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info};

use crate::error::Result;
use crate::search::candidate::{Candidate, RawCandidate, MAX_YEAR, MIN_YEAR};
use crate::search::classify::{classify, display_name, Classification, Rejection};
use crate::search::envelope::resolve_items;
use crate::search::fetch::Fetcher;
use crate::search::fields::{
    lookup, parse_year_range, pick_link, pick_number_from, pick_text_from, pick_url,
};
use crate::search::provider::{PersonProvider, RefineParams, SearchLimits};

const ID_PATHS: &[&str] = &["id", "recordId", "identifier", "metadata.id", "metadata.recordId"];
const DATE_PATHS: &[&str] = &[
    "dates",
    "date",
    "lifespan",
    "lifeDates",
    "metadata.dates",
    "metadata.date",
    "metadata.lifespan",
];
const BIRTH_YEAR_PATHS: &[&str] = &["birthYear", "metadata.birthYear"];
const DEATH_YEAR_PATHS: &[&str] = &["deathYear", "metadata.deathYear"];
const PLACE_PATHS: &[&str] = &[
    "place",
    "birthPlace",
    "location",
    "parish",
    "metadata.place",
    "metadata.birthPlace",
    "metadata.location",
];
const URL_PATHS: &[&str] = &["url", "link", "permalink", "metadata.url"];
const LINK_PATHS: &[&str] = &["_links", "links", "metadata.links"];

/// Which search endpoint the backend exposes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArchiveEndpoint {
    #[default]
    Records,
    Persons,
}

impl ArchiveEndpoint {
    pub fn path(&self) -> &'static str {
        match self {
            Self::Records => "records",
            Self::Persons => "persons",
        }
    }
}

/// Person search against a remote archive backend.
pub struct ArchiveProvider {
    id: String,
    label: String,
    base_url: Url,
    endpoint: ArchiveEndpoint,
    limits: SearchLimits,
    fetcher: Arc<dyn Fetcher>,
}

impl ArchiveProvider {
    /// Create a provider for the backend at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns an error if `base_url` is not an absolute http(s) URL.
    pub fn new(
        base_url: &str,
        label: impl Into<String>,
        endpoint: ArchiveEndpoint,
        limits: SearchLimits,
        fetcher: Arc<dyn Fetcher>,
    ) -> anyhow::Result<Self> {
        let base_url = parse_base_url(base_url)?;
        Ok(Self {
            id: "archive".to_string(),
            label: label.into(),
            base_url,
            endpoint,
            limits,
            fetcher,
        })
    }

    /// Override the provider id (defaults to `"archive"`).
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    /// Build the search URL for `name` plus any extra query parameters.
    pub fn search_url(&self, name: &str, extra: &[(&str, String)]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push(self.endpoint.path());
        }
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("name", name);
            query.append_pair("limit", &self.limits.max_results.to_string());
            for (key, value) in extra {
                query.append_pair(key, value);
            }
        }
        url
    }

    async fn fetch_candidates(&self, query: &str, extra: &[(&str, String)]) -> Result<Vec<Candidate>> {
        let query = query.trim();
        if !self.limits.accepts(query) {
            debug!(provider = %self.id, "Query below minimum length; skipping request");
            return Ok(Vec::new());
        }

        let payload = self.fetcher.get_json(&self.search_url(query, extra)).await?;
        let items = resolve_items(&payload)?;

        let candidates = self.map_items(items);
        info!(
            provider = %self.id,
            raw = items.len(),
            accepted = candidates.len(),
            "Archive search complete"
        );
        Ok(candidates)
    }

    /// Classify and map raw items, keeping at most `max_results` people.
    pub fn map_items(&self, items: &[Value]) -> Vec<Candidate> {
        let mut rejected_types = 0usize;
        let mut rejected_names = 0usize;

        let candidates: Vec<Candidate> = items
            .iter()
            .filter(|item| item.is_object())
            .filter_map(|item| match classify(item) {
                Classification::Rejected(Rejection::NonPersonType(_)) => {
                    rejected_types += 1;
                    None
                }
                Classification::Rejected(Rejection::NotNameLike) => {
                    rejected_names += 1;
                    None
                }
                verdict => Some(self.to_candidate(item, &verdict)),
            })
            .take(self.limits.max_results)
            .collect();

        if rejected_types + rejected_names > 0 {
            debug!(
                provider = %self.id,
                rejected_types,
                rejected_names,
                "Excluded non-person items"
            );
        }
        candidates
    }

    fn to_candidate(&self, item: &Value, verdict: &Classification) -> Candidate {
        let dates = pick_text_from(item, DATE_PATHS);
        let (parsed_birth, parsed_death) = parse_year_range(&dates);
        let birth_year = plausible_year(item, BIRTH_YEAR_PATHS).or(parsed_birth.map(i64::from));
        let death_year = plausible_year(item, DEATH_YEAR_PATHS).or(parsed_death.map(i64::from));

        let id = pick_text_from(item, ID_PATHS);

        let mut why: Vec<String> = verdict.why().map(str::to_string).into_iter().collect();
        if !dates.is_empty() {
            why.push(format!("dates: {dates}"));
        }
        why.push(format!("source: {}", self.label));

        Candidate::normalize(RawCandidate {
            id: Some(id),
            name: display_name(item),
            birth_year,
            death_year,
            place: pick_text_from(item, PLACE_PATHS),
            source: self.label.clone(),
            url: item_url(item),
            why,
        })
    }
}

/// Prefer an explicit absolute URL field, then the links structure.
fn item_url(item: &Value) -> String {
    let direct = pick_url(&pick_text_from(item, URL_PATHS));
    if !direct.is_empty() {
        return direct;
    }
    LINK_PATHS
        .iter()
        .filter_map(|path| lookup(item, path))
        .map(|links| pick_url(&pick_link(links)))
        .find(|url| !url.is_empty())
        .unwrap_or_default()
}

/// Explicit year field, ignored when it cannot be a real year so the date
/// text can still supply one.
fn plausible_year(item: &Value, paths: &[&str]) -> Option<i64> {
    pick_number_from(item, paths).filter(|y| (MIN_YEAR..=MAX_YEAR).contains(y))
}

/// Parse and check a backend base URL.
pub fn parse_base_url(raw: &str) -> anyhow::Result<Url> {
    let url = Url::parse(raw.trim()).with_context(|| format!("Invalid base URL: {raw}"))?;
    if !matches!(url.scheme(), "http" | "https") || url.host_str().is_none() {
        anyhow::bail!("Base URL must be an absolute http(s) URL: {raw}");
    }
    Ok(url)
}

#[async_trait]
impl PersonProvider for ArchiveProvider {
    fn id(&self) -> &str {
        &self.id
    }

    fn label(&self) -> &str {
        &self.label
    }

    fn is_remote(&self) -> bool {
        true
    }

    async fn search(&self, query: &str) -> Result<Vec<Candidate>> {
        self.fetch_candidates(query, &[]).await
    }

    async fn refine(&self, params: &RefineParams) -> Result<Vec<Candidate>> {
        let mut extra: Vec<(&str, String)> = Vec::new();
        if let Some(year) = params.birth_year {
            extra.push(("birthYear", year.to_string()));
        }
        if let Some(year) = params.death_year {
            extra.push(("deathYear", year.to_string()));
        }
        if let Some(place) = params.place.as_deref().map(str::trim).filter(|p| !p.is_empty()) {
            extra.push(("place", place.to_string()));
        }

        let candidates = self.fetch_candidates(&params.name, &extra).await?;
        Ok(candidates
            .into_iter()
            .filter(|candidate| params.matches(candidate))
            .collect())
    }
}
