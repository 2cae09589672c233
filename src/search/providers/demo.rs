//! Offline demo provider backed by a fixed in-memory dataset.
//!
//! Serves the same contract as remote providers so callers can fall back to
//! it transparently, and gives tests a deterministic fixture.

use async_trait::async_trait;

use crate::error::Result;
use crate::search::candidate::{Candidate, RawCandidate};
use crate::search::provider::{PersonProvider, SearchLimits};

const DEMO_ID: &str = "demo";
const DEMO_LABEL: &str = "Demo";

struct DemoRecord {
    id: &'static str,
    name: &'static str,
    birth_year: Option<i64>,
    death_year: Option<i64>,
    place: &'static str,
    url: &'static str,
}

const DEMO_RECORDS: &[DemoRecord] = &[
    DemoRecord {
        id: "demo-1",
        name: "Karl XII",
        birth_year: Some(1682),
        death_year: Some(1718),
        place: "Stockholm",
        url: "https://archive.example/persons/demo-1",
    },
    DemoRecord {
        id: "demo-2",
        name: "Karlsson, Anna",
        birth_year: Some(1821),
        death_year: Some(1890),
        place: "Karlstad",
        url: "",
    },
    DemoRecord {
        id: "demo-3",
        name: "Lindqvist, Erik",
        birth_year: Some(1661),
        death_year: Some(1704),
        place: "Uppsala",
        url: "https://archive.example/persons/demo-3",
    },
    DemoRecord {
        id: "demo-4",
        name: "Johansson, Per",
        birth_year: Some(1790),
        death_year: Some(1850),
        place: "Karlskrona",
        url: "",
    },
    DemoRecord {
        id: "demo-5",
        name: "Ulrika Eleonora",
        birth_year: Some(1688),
        death_year: Some(1741),
        place: "Stockholm",
        url: "https://archive.example/persons/demo-5",
    },
    DemoRecord {
        id: "demo-6",
        name: "Bergström, Kristina",
        birth_year: Some(1805),
        death_year: None,
        place: "Göteborg",
        url: "",
    },
    DemoRecord {
        id: "demo-7",
        name: "Sten Sture",
        birth_year: Some(1440),
        death_year: Some(1503),
        place: "Jönköping",
        url: "",
    },
    DemoRecord {
        id: "demo-8",
        name: "Månsdotter, Karin",
        birth_year: Some(1550),
        death_year: Some(1612),
        place: "Liuksiala",
        url: "https://archive.example/persons/demo-8",
    },
];

/// Deterministic offline provider.
pub struct DemoProvider {
    limits: SearchLimits,
}

impl DemoProvider {
    pub fn new(limits: SearchLimits) -> Self {
        Self { limits }
    }

    fn to_candidate(record: &DemoRecord) -> Candidate {
        Candidate::normalize(RawCandidate {
            id: Some(record.id.to_string()),
            name: record.name.to_string(),
            birth_year: record.birth_year,
            death_year: record.death_year,
            place: record.place.to_string(),
            source: DEMO_LABEL.to_string(),
            url: record.url.to_string(),
            why: vec!["demo dataset".to_string(), "name or place match".to_string()],
        })
    }
}

impl Default for DemoProvider {
    fn default() -> Self {
        Self::new(SearchLimits::default())
    }
}

#[async_trait]
impl PersonProvider for DemoProvider {
    fn id(&self) -> &str {
        DEMO_ID
    }

    fn label(&self) -> &str {
        DEMO_LABEL
    }

    fn is_remote(&self) -> bool {
        false
    }

    async fn search(&self, query: &str) -> Result<Vec<Candidate>> {
        if !self.limits.accepts(query) {
            return Ok(Vec::new());
        }

        let needle = query.trim().to_lowercase();
        Ok(DEMO_RECORDS
            .iter()
            .filter(|r| {
                r.name.to_lowercase().contains(&needle) || r.place.to_lowercase().contains(&needle)
            })
            .take(self.limits.max_results)
            .map(Self::to_candidate)
            .collect())
    }
}
