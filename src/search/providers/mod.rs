//! Concrete person-search provider implementations.
//!
//! Each submodule implements the
//! [`PersonProvider`](super::PersonProvider) trait.

pub mod archive;
pub mod demo;

pub use archive::{ArchiveEndpoint, ArchiveProvider};
pub use demo::DemoProvider;
