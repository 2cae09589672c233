//! Optional per-candidate enrichment lookups.
//!
//! After a search has produced a candidate list, each [`EnrichmentProvider`]
//! may probe a secondary endpoint and attach supplementary
//! [`EnrichmentBit`]s. Enrichment never fails as a whole: every error,
//! malformed response or missing field yields an empty bit list for that
//! provider, and candidates themselves are never modified.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use futures::future::join_all;
use reqwest::Url;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use super::candidate::Candidate;
use super::fetch::Fetcher;
use super::fields::{pick_text_from, pick_url};
use super::providers::archive::parse_base_url;

/// Supplementary, non-authoritative metadata about a candidate.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrichmentBit {
    pub provider_id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub title: String,
    pub confidence: f64,
    pub url: String,
    pub fields: BTreeMap<String, String>,
}

impl EnrichmentBit {
    /// Build a bit, clamping `confidence` into `[0, 1]` and dropping
    /// non-http(s) URLs.
    pub fn new(
        provider_id: impl Into<String>,
        kind: impl Into<String>,
        title: impl Into<String>,
        confidence: f64,
        url: &str,
    ) -> Self {
        let confidence = if confidence.is_finite() {
            confidence.clamp(0.0, 1.0)
        } else {
            0.0
        };
        Self {
            provider_id: provider_id.into(),
            kind: kind.into(),
            title: title.into(),
            confidence,
            url: pick_url(url),
            fields: BTreeMap::new(),
        }
    }

    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        let value = value.into();
        if !value.is_empty() {
            self.fields.insert(key.into(), value);
        }
        self
    }
}

/// A secondary metadata source consulted per candidate.
#[async_trait]
pub trait EnrichmentProvider: Send + Sync {
    fn id(&self) -> &str;

    /// Cheap check whether this provider can contribute for `candidate`.
    fn supports(&self, candidate: &Candidate) -> bool;

    /// Probe the source. Must not fail; problems yield an empty list.
    async fn enrich(&self, candidate: &Candidate) -> Vec<EnrichmentBit>;
}

/// Run every supporting provider for one candidate concurrently.
pub async fn enrich_candidate(
    providers: &[Arc<dyn EnrichmentProvider>],
    candidate: &Candidate,
) -> Vec<EnrichmentBit> {
    let probes = providers
        .iter()
        .filter(|p| p.supports(candidate))
        .map(|p| p.enrich(candidate));

    join_all(probes).await.into_iter().flatten().collect()
}

/// Enrich every candidate concurrently. The output is index-aligned with
/// `candidates`.
pub async fn enrich_all(
    providers: &[Arc<dyn EnrichmentProvider>],
    candidates: &[Candidate],
) -> Vec<Vec<EnrichmentBit>> {
    join_all(
        candidates
            .iter()
            .map(|candidate| enrich_candidate(providers, candidate)),
    )
    .await
}

/// Which record-probe endpoint to query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeKind {
    /// `GET <base>/iiif?recordId=<id>`, yielding a IIIF manifest link.
    Iiif,
    /// `GET <base>/oai?recordId=<id>`, yielding an OAI-PMH identifier.
    Oai,
}

impl ProbeKind {
    fn provider_id(&self) -> &'static str {
        match self {
            Self::Iiif => "iiif",
            Self::Oai => "oai",
        }
    }

    fn path(&self) -> &'static str {
        match self {
            Self::Iiif => "iiif",
            Self::Oai => "oai",
        }
    }
}

const MANIFEST_PATHS: &[&str] = &["manifest", "manifestUrl", "iiifManifest", "@id", "id"];
const OAI_IDENTIFIER_PATHS: &[&str] = &["identifier", "oaiIdentifier", "header.identifier"];
const OAI_DATESTAMP_PATHS: &[&str] = &["datestamp", "header.datestamp"];
const OAI_URL_PATHS: &[&str] = &["url", "link", "metadata.url"];

/// Enrichment via the archive's IIIF or OAI record probes.
pub struct RecordProbe {
    kind: ProbeKind,
    base_url: Url,
    fetcher: Arc<dyn Fetcher>,
}

impl RecordProbe {
    pub fn new(kind: ProbeKind, base_url: &str, fetcher: Arc<dyn Fetcher>) -> anyhow::Result<Self> {
        Ok(Self {
            kind,
            base_url: parse_base_url(base_url)?,
            fetcher,
        })
    }

    pub fn iiif(base_url: &str, fetcher: Arc<dyn Fetcher>) -> anyhow::Result<Self> {
        Self::new(ProbeKind::Iiif, base_url, fetcher)
    }

    pub fn oai(base_url: &str, fetcher: Arc<dyn Fetcher>) -> anyhow::Result<Self> {
        Self::new(ProbeKind::Oai, base_url, fetcher)
    }

    fn probe_url(&self, record_id: &str) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push(self.kind.path());
        }
        url.query_pairs_mut().append_pair("recordId", record_id);
        url
    }

    fn to_bits(&self, record_id: &str, body: &Value) -> Vec<EnrichmentBit> {
        let provider_id = self.kind.provider_id();
        match self.kind {
            ProbeKind::Iiif => {
                let manifest = pick_url(&pick_text_from(body, MANIFEST_PATHS));
                if manifest.is_empty() {
                    return Vec::new();
                }
                vec![
                    EnrichmentBit::new(provider_id, "iiif-manifest", "IIIF manifest", 0.6, &manifest)
                        .with_field("recordId", record_id),
                ]
            }
            ProbeKind::Oai => {
                let identifier = pick_text_from(body, OAI_IDENTIFIER_PATHS);
                if identifier.is_empty() {
                    return Vec::new();
                }
                let url = pick_text_from(body, OAI_URL_PATHS);
                vec![
                    EnrichmentBit::new(provider_id, "oai-record", "OAI-PMH record", 0.5, &url)
                        .with_field("recordId", record_id)
                        .with_field("identifier", identifier)
                        .with_field("datestamp", pick_text_from(body, OAI_DATESTAMP_PATHS)),
                ]
            }
        }
    }
}

#[async_trait]
impl EnrichmentProvider for RecordProbe {
    fn id(&self) -> &str {
        self.kind.provider_id()
    }

    fn supports(&self, candidate: &Candidate) -> bool {
        candidate.has_upstream_id()
    }

    async fn enrich(&self, candidate: &Candidate) -> Vec<EnrichmentBit> {
        if !self.supports(candidate) {
            return Vec::new();
        }

        match self.fetcher.get_json(&self.probe_url(candidate.id())).await {
            Ok(body) => self.to_bits(candidate.id(), &body),
            Err(err) => {
                debug!(provider = self.id(), code = %err.code(), "Enrichment probe failed");
                Vec::new()
            }
        }
    }
}
