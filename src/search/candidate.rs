//! The canonical person record handed to callers.
//!
//! A [`Candidate`] can only be built through [`Candidate::normalize`], which
//! enforces the output contract regardless of what a provider mapping
//! produced: non-empty id and name, plausible years or none, absolute
//! http(s) URLs only, and a deduplicated justification list.

use serde::Serialize;

use super::fields::{pick_url, temp_id, TEMP_ID_PREFIX};

/// Name emitted when the upstream record carries no usable name.
pub const NAME_MISSING: &str = "(name missing)";

/// Source label used when a provider mapping left it blank.
pub const UNKNOWN_SOURCE: &str = "Unknown";

/// Lowest year accepted as a birth or death year.
pub const MIN_YEAR: i64 = 1000;

/// Highest year accepted as a birth or death year.
pub const MAX_YEAR: i64 = 2099;

/// Unvalidated record produced by a provider-specific mapping step.
///
/// Every field is optional or may be blank; [`Candidate::normalize`] decides
/// what survives.
#[derive(Debug, Clone, Default)]
pub struct RawCandidate {
    pub id: Option<String>,
    pub name: String,
    pub birth_year: Option<i64>,
    pub death_year: Option<i64>,
    pub place: String,
    pub source: String,
    pub url: String,
    pub why: Vec<String>,
}

/// A normalized person match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    id: String,
    name: String,
    birth_year: Option<i32>,
    death_year: Option<i32>,
    place: String,
    source: String,
    url: String,
    why: Vec<String>,
    #[serde(skip)]
    synthetic_id: bool,
}

impl Candidate {
    /// Build a candidate from raw mapped values, enforcing every invariant
    /// of the output contract.
    pub fn normalize(raw: RawCandidate) -> Self {
        let upstream_id = raw
            .id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(str::to_string);
        let synthetic_id = upstream_id.is_none();
        let id = upstream_id.unwrap_or_else(temp_id);

        let name = collapse(&raw.name);
        let name = if name.is_empty() {
            NAME_MISSING.to_string()
        } else {
            name
        };

        let source = collapse(&raw.source);
        let source = if source.is_empty() {
            UNKNOWN_SOURCE.to_string()
        } else {
            source
        };

        Self {
            id,
            name,
            birth_year: plausible_year(raw.birth_year),
            death_year: plausible_year(raw.death_year),
            place: collapse(&raw.place),
            source,
            url: pick_url(&raw.url),
            why: dedup_why(raw.why),
            synthetic_id,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn birth_year(&self) -> Option<i32> {
        self.birth_year
    }

    pub fn death_year(&self) -> Option<i32> {
        self.death_year
    }

    pub fn place(&self) -> &str {
        &self.place
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn why(&self) -> &[String] {
        &self.why
    }

    /// `true` when the id came from the upstream record rather than being
    /// synthesized locally.
    pub fn has_upstream_id(&self) -> bool {
        !self.synthetic_id && !self.id.starts_with(TEMP_ID_PREFIX)
    }

    /// Human-readable life span such as `1661–1704`, `1704–` or `–1704`.
    pub fn lifespan(&self) -> String {
        match (self.birth_year, self.death_year) {
            (None, None) => String::new(),
            (birth, death) => format!(
                "{}–{}",
                birth.map(|y| y.to_string()).unwrap_or_default(),
                death.map(|y| y.to_string()).unwrap_or_default()
            ),
        }
    }
}

fn collapse(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn plausible_year(year: Option<i64>) -> Option<i32> {
    year.filter(|y| (MIN_YEAR..=MAX_YEAR).contains(y))
        .and_then(|y| i32::try_from(y).ok())
}

fn dedup_why(why: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(why.len());
    for fragment in why {
        let fragment = collapse(&fragment);
        if !fragment.is_empty() && !out.contains(&fragment) {
            out.push(fragment);
        }
    }
    out
}
