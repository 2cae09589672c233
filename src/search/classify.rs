//! Deciding whether a raw upstream item describes a person.
//!
//! The archive search returns every kind of catalogue entry for a name
//! query: people, but also buildings, drawings, maps and whole archival
//! series that merely mention the name. [`classify`] sorts them into three
//! outcomes:
//!
//! 1. any non-person type token anywhere in the item rejects it outright;
//! 2. an explicit agent + person type signal accepts it;
//! 3. otherwise the display name must look like a personal name, and the
//!    item is accepted at lower confidence.

use std::sync::OnceLock;

use regex::Regex;
use serde_json::Value;

use super::fields::{pick_text, pick_text_from};

/// Fields that may carry the top-level object type.
pub const OBJECT_TYPE_PATHS: &[&str] = &["objectType", "metadata.objectType"];

/// Fields that may carry the object sub-type.
pub const SUB_TYPE_PATHS: &[&str] = &[
    "objectSubType",
    "subType",
    "metadata.objectSubType",
    "metadata.subType",
];

/// Every field inspected for non-person type tokens.
pub const TYPE_PATHS: &[&str] = &[
    "objectType",
    "objectSubType",
    "subType",
    "type",
    "recordType",
    "entityKind",
    "metadata.objectType",
    "metadata.objectSubType",
    "metadata.subType",
    "metadata.type",
    "metadata.recordType",
    "metadata.entityKind",
];

/// Fields that may carry the best display name, in preference order.
pub const NAME_PATHS: &[&str] = &[
    "name",
    "displayName",
    "caption",
    "title",
    "label",
    "metadata.name",
    "metadata.displayName",
    "metadata.caption",
    "metadata.title",
];

/// Type vocabulary that marks an item as something other than a person.
const NON_PERSON_TYPES: &[&str] = &[
    "archival series",
    "arkivserie",
    "serie",
    "record set",
    "recordset",
    "place",
    "plats",
    "building",
    "byggnad",
    "drawing",
    "ritning",
    "map",
    "karta",
    "photograph",
    "fotografi",
    "organisation",
    "organization",
];

/// Word stems that mark an institutional, ecclesiastical or architectural
/// name. Matched anywhere inside a lower-cased word so that compounds such
/// as "domkyrka" are caught.
const STOP_STEMS: &[&str] = &[
    "kyrk",
    "församling",
    "socken",
    "kommun",
    "härad",
    "herrgård",
    "prästgård",
    "slott",
    "ritning",
    "karta",
    "arkiv",
    "fotografi",
    "church",
    "parish",
    "chapel",
    "cathedral",
    "monaster",
    "kloster",
    "museum",
    "hospital",
    "sjukhus",
    "regemente",
    "regiment",
    "förening",
    "society",
    "institut",
    "universit",
    "akademi",
    "academy",
    "building",
    "byggnad",
    "drawing",
    "fabrik",
    "factory",
    "rådhus",
    "skola",
    "school",
];

/// Short stoplist entries matched as whole words only.
const STOP_WORDS: &[&str] = &[
    "ab", "ltd", "inc", "map", "mill", "kvarn", "hamn", "bro", "gata", "gatan", "street",
    "bridge", "station", "gård", "gården", "län", "stad", "city", "town",
];

const MIN_NAME_CHARS: usize = 3;
const MAX_NAME_CHARS: usize = 120;

/// Why an item was not accepted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    /// A type field named something that is not a person.
    NonPersonType(String),
    /// No type signal, and the display name does not look like a person.
    NotNameLike,
}

/// Outcome of classifying one raw item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    /// Explicit agent/person type signal.
    Person,
    /// No type signal; the display name passed the person-name heuristic.
    LikelyPerson,
    /// Not eligible to become a candidate.
    Rejected(Rejection),
}

impl Classification {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Person | Self::LikelyPerson)
    }

    /// Justification fragment recorded on accepted candidates.
    pub fn why(&self) -> Option<&'static str> {
        match self {
            Self::Person => Some("type: agent/person"),
            Self::LikelyPerson => Some("fallback: name pattern (low confidence)"),
            Self::Rejected(_) => None,
        }
    }
}

/// Classify a raw upstream item.
pub fn classify(item: &Value) -> Classification {
    if let Some(token) = type_tokens(item)
        .into_iter()
        .find(|token| is_non_person_type(token))
    {
        return Classification::Rejected(Rejection::NonPersonType(token));
    }

    if has_person_type(item) {
        return Classification::Person;
    }

    if looks_like_person_name(&display_name(item)) {
        Classification::LikelyPerson
    } else {
        Classification::Rejected(Rejection::NotNameLike)
    }
}

/// Best-guess display name of an item, possibly empty.
pub fn display_name(item: &Value) -> String {
    pick_text_from(item, NAME_PATHS)
}

/// Lower-cased, non-empty text of every type-like field in `item`.
pub fn type_tokens(item: &Value) -> Vec<String> {
    TYPE_PATHS
        .iter()
        .filter_map(|path| super::fields::lookup(item, path))
        .map(|value| pick_text(value).to_lowercase())
        .filter(|token| !token.is_empty())
        .collect()
}

fn is_non_person_type(token: &str) -> bool {
    NON_PERSON_TYPES.iter().any(|term| token.contains(term))
}

fn has_person_type(item: &Value) -> bool {
    let object_type = pick_text_from(item, OBJECT_TYPE_PATHS).to_lowercase();
    let sub_type = pick_text_from(item, SUB_TYPE_PATHS).to_lowercase();
    object_type.contains("agent") && sub_type.contains("person")
}

fn comma_name_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(
            r"^\p{L}[\p{L}'’.\-]*(?:\s+\p{L}[\p{L}'’.\-]*){0,3},\s*\p{L}[\p{L}'’.\-]*(?:\s+\p{L}[\p{L}'’.\-]*){0,3}$",
        )
        .expect("comma name pattern is valid")
    })
}

fn free_name_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^\p{L}[\p{L}'’.\-]*(?:\s+\p{L}[\p{L}'’.\-]*){0,3}$")
            .expect("free name pattern is valid")
    })
}

/// Heuristic check that `name` reads like a personal name.
///
/// Requires a non-trivial length, at least one letter, no stoplisted word,
/// and either `Surname, Given names` or one to four plain name words.
pub fn looks_like_person_name(name: &str) -> bool {
    let name = name.trim();
    let len = name.chars().count();
    if !(MIN_NAME_CHARS..=MAX_NAME_CHARS).contains(&len) {
        return false;
    }
    if !name.chars().any(char::is_alphabetic) {
        return false;
    }

    let lower = name.to_lowercase();
    let stoplisted = lower
        .split(|c: char| !c.is_alphanumeric())
        .filter(|word| !word.is_empty())
        .any(|word| {
            STOP_WORDS.contains(&word) || STOP_STEMS.iter().any(|stem| word.contains(stem))
        });
    if stoplisted {
        return false;
    }

    comma_name_pattern().is_match(name) || free_name_pattern().is_match(name)
}
