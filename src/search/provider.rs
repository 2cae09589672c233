//! The person-search provider contract.
//!
//! Every search backend, remote or offline, implements [`PersonProvider`]
//! and emits only normalized [`Candidate`] values. Providers hold no mutable
//! session state and are shared behind `Arc` across concurrent calls.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::candidate::Candidate;
use crate::error::Result;

/// Shortest trimmed query, in characters, that reaches a backend.
pub const DEFAULT_MIN_QUERY_LEN: usize = 2;

/// Maximum number of candidates returned by one search.
pub const DEFAULT_MAX_RESULTS: usize = 150;

/// Query floor and result ceiling applied by every provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchLimits {
    pub min_query_len: usize,
    pub max_results: usize,
}

impl SearchLimits {
    /// `true` if `query` is long enough to be searched.
    pub fn accepts(&self, query: &str) -> bool {
        query.trim().chars().count() >= self.min_query_len
    }
}

impl Default for SearchLimits {
    fn default() -> Self {
        Self {
            min_query_len: DEFAULT_MIN_QUERY_LEN,
            max_results: DEFAULT_MAX_RESULTS,
        }
    }
}

/// Structured search parameters for [`PersonProvider::refine`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefineParams {
    pub name: String,
    #[serde(default)]
    pub birth_year: Option<i32>,
    #[serde(default)]
    pub death_year: Option<i32>,
    #[serde(default)]
    pub place: Option<String>,
}

impl RefineParams {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Whether `candidate` satisfies every constraint given.
    ///
    /// A constraint the candidate has no value for counts as a mismatch.
    pub fn matches(&self, candidate: &Candidate) -> bool {
        if let Some(year) = self.birth_year {
            if candidate.birth_year() != Some(year) {
                return false;
            }
        }
        if let Some(year) = self.death_year {
            if candidate.death_year() != Some(year) {
                return false;
            }
        }
        if let Some(place) = self.place.as_deref().map(str::trim) {
            if !place.is_empty()
                && !candidate
                    .place()
                    .to_lowercase()
                    .contains(&place.to_lowercase())
            {
                return false;
            }
        }
        true
    }
}

/// Identity of a registered provider as shown to callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProviderInfo {
    pub id: String,
    pub label: String,
}

/// Async trait implemented by every person-search backend.
#[async_trait]
pub trait PersonProvider: Send + Sync {
    /// Short, lowercase identifier (e.g. `"demo"`).
    fn id(&self) -> &str;

    /// Display label, also used as the candidates' `source`.
    fn label(&self) -> &str;

    /// `true` for providers backed by a network service. Used by the
    /// registry's `"auto"` selection.
    fn is_remote(&self) -> bool;

    /// Search for people matching a free-text name query.
    ///
    /// Queries below the provider's floor return an empty list without any
    /// I/O. At most the configured maximum number of candidates is returned,
    /// in upstream order.
    async fn search(&self, query: &str) -> Result<Vec<Candidate>>;

    /// Search with structured constraints.
    ///
    /// The default searches by name and filters the result locally.
    async fn refine(&self, params: &RefineParams) -> Result<Vec<Candidate>> {
        let candidates = self.search(&params.name).await?;
        Ok(candidates
            .into_iter()
            .filter(|candidate| params.matches(candidate))
            .collect())
    }

    fn info(&self) -> ProviderInfo {
        ProviderInfo {
            id: self.id().to_string(),
            label: self.label().to_string(),
        }
    }
}
