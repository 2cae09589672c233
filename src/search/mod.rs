//! Person search across archival backends.
//!
//! This module defines the [`PersonProvider`] contract and the pipeline that
//! turns loosely-shaped upstream JSON into normalized [`Candidate`] records.
//!
//! # Module layout
//!
//! - [`fetch`] -- Time-bounded HTTP GET with failure classification.
//! - [`envelope`] -- Locating the item list inside a response envelope.
//! - [`fields`] -- Text, number, URL, link and year pickers.
//! - [`classify`] -- Person-versus-other decision for raw items.
//! - [`candidate`] -- The normalized output record.
//! - [`provider`] -- Provider trait and shared search types.
//! - [`providers`] -- Concrete providers (demo, archive).
//! - [`registry`] -- Provider registry and selection policy.
//! - [`enrichment`] -- Optional per-candidate secondary lookups.

pub mod candidate;
pub mod classify;
pub mod enrichment;
pub mod envelope;
pub mod fetch;
pub mod fields;
pub mod provider;
pub mod providers;
pub mod registry;

pub use candidate::{Candidate, RawCandidate};
pub use classify::{classify, Classification, Rejection};
pub use enrichment::{enrich_all, enrich_candidate, EnrichmentBit, EnrichmentProvider, RecordProbe};
pub use fetch::{Fetcher, HttpFetcher};
pub use provider::{PersonProvider, ProviderInfo, RefineParams, SearchLimits};
pub use providers::{ArchiveEndpoint, ArchiveProvider, DemoProvider};
pub use registry::ProviderRegistry;
