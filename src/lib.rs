//! kinsearch - Historical person lookup against archival search backends
//!
//! The library exposes the provider contract, the record normalization
//! pipeline and configuration loading; the `kinsearch` binary is a thin
//! command-line front end over them.

pub mod config;
pub mod error;
pub mod search;

pub use error::{Result, SearchError};
pub use search::{Candidate, EnrichmentBit, PersonProvider, ProviderRegistry};
