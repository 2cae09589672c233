//! Field extraction helpers shared by every provider mapping.
//!
//! Upstream item fields are not contractually fixed: the same logical value
//! may arrive as a plain string, a number, an object such as
//! `{"value": "..."}`, or a list of any of those. The pickers here flatten
//! those shapes into plain Rust values and never fail; a missing or unusable
//! value simply comes back empty.

use std::sync::OnceLock;

use chrono::Utc;
use rand::distributions::Alphanumeric;
use rand::Rng;
use regex::Regex;
use serde_json::Value;

/// Sub-keys that carry the human-readable part of a wrapped value, in
/// preference order.
const SEMANTIC_KEYS: &[&str] = &[
    "value",
    "label",
    "title",
    "name",
    "caption",
    "displayName",
    "content",
];

/// Link relations tried before falling back to any relation with an `href`.
const LINK_RELATIONS: &[&str] = &["html", "self", "alternate", "record"];

/// Prefix of locally synthesized record ids.
pub const TEMP_ID_PREFIX: &str = "tmp-";

const MAX_TEXT_DEPTH: usize = 8;

/// Flatten an arbitrary JSON value into a single trimmed string.
///
/// Lists are joined with a single space, objects are searched for the first
/// semantic sub-key that yields non-empty text. Booleans and `null` produce
/// an empty string.
pub fn pick_text(value: &Value) -> String {
    pick_text_at_depth(value, 0)
}

fn pick_text_at_depth(value: &Value, depth: usize) -> String {
    if depth > MAX_TEXT_DEPTH {
        return String::new();
    }

    match value {
        Value::String(s) => collapse_whitespace(s),
        Value::Number(n) => n.to_string(),
        Value::Array(items) => {
            let parts: Vec<String> = items
                .iter()
                .map(|item| pick_text_at_depth(item, depth + 1))
                .filter(|s| !s.is_empty())
                .collect();
            parts.join(" ")
        }
        Value::Object(map) => SEMANTIC_KEYS
            .iter()
            .filter_map(|key| map.get(*key))
            .map(|inner| pick_text_at_depth(inner, depth + 1))
            .find(|s| !s.is_empty())
            .unwrap_or_default(),
        Value::Bool(_) | Value::Null => String::new(),
    }
}

fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Resolve a dotted path such as `metadata.caption` inside `value`.
pub fn lookup<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.')
        .try_fold(value, |current, segment| current.get(segment))
}

/// Return the first non-empty text found under any of `paths`.
pub fn pick_text_from(value: &Value, paths: &[&str]) -> String {
    paths
        .iter()
        .filter_map(|path| lookup(value, path))
        .map(pick_text)
        .find(|s| !s.is_empty())
        .unwrap_or_default()
}

/// Interpret a value as an integer.
///
/// Accepts JSON integers, finite floats (truncated) and numeric strings.
/// Anything else, including `NaN` and infinities, yields `None`.
pub fn pick_number(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.is_finite())
                .map(|f| f.trunc() as i64)
        }),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        Value::Object(_) | Value::Array(_) => {
            let text = pick_text(value);
            text.parse::<i64>().ok()
        }
        Value::Bool(_) | Value::Null => None,
    }
}

/// Return the first number found under any of `paths`.
pub fn pick_number_from(value: &Value, paths: &[&str]) -> Option<i64> {
    paths
        .iter()
        .filter_map(|path| lookup(value, path))
        .find_map(pick_number)
}

fn absolute_url_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?i)^https?://[^\s/?#]+[^\s]*$").expect("absolute url pattern is valid")
    })
}

/// Return `raw` (trimmed) only if it is an absolute `http(s)` URL, otherwise
/// an empty string.
pub fn pick_url(raw: &str) -> String {
    let trimmed = raw.trim();
    if absolute_url_pattern().is_match(trimmed) {
        trimmed.to_string()
    } else {
        String::new()
    }
}

/// Find an `href` in a links structure.
///
/// Two shapes are understood: a map of relation name to `{href}` (or a list
/// of such objects), and a list of `{rel, href}` objects. Preferred
/// relations are tried first, then every entry in order.
pub fn pick_link(links: &Value) -> String {
    match links {
        Value::Object(map) => LINK_RELATIONS
            .iter()
            .filter_map(|rel| map.get(*rel))
            .chain(map.values())
            .map(href_of)
            .find(|href| !href.is_empty())
            .unwrap_or_default(),
        Value::Array(entries) => {
            let by_rel = LINK_RELATIONS.iter().find_map(|rel| {
                entries
                    .iter()
                    .filter(|entry| entry.get("rel").and_then(Value::as_str) == Some(*rel))
                    .map(href_of)
                    .find(|href| !href.is_empty())
            });
            by_rel
                .or_else(|| {
                    entries
                        .iter()
                        .map(href_of)
                        .find(|href| !href.is_empty())
                })
                .unwrap_or_default()
        }
        _ => String::new(),
    }
}

fn href_of(entry: &Value) -> String {
    match entry {
        Value::Object(map) => map
            .get("href")
            .and_then(Value::as_str)
            .map(str::trim)
            .unwrap_or_default()
            .to_string(),
        Value::Array(items) => items
            .iter()
            .map(href_of)
            .find(|href| !href.is_empty())
            .unwrap_or_default(),
        _ => String::new(),
    }
}

/// Extract up to two four-digit years from a free-text date description.
///
/// Digit runs of exactly four characters are taken in document order; the
/// first is the birth year and the second the death year. No ordering or
/// plausibility check is applied here.
pub fn parse_year_range(text: &str) -> (Option<i32>, Option<i32>) {
    let mut years = text
        .split(|c: char| !c.is_ascii_digit())
        .filter(|run| run.len() == 4)
        .filter_map(|run| run.parse::<i32>().ok());

    let birth = years.next();
    let death = years.next();
    (birth, death)
}

/// Generate a placeholder id for an item that arrived without one.
///
/// Unique within a process run; never persisted.
pub fn temp_id() -> String {
    let suffix: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(8)
        .map(char::from)
        .collect();
    format!(
        "{TEMP_ID_PREFIX}{}-{}",
        Utc::now().timestamp_millis(),
        suffix.to_ascii_lowercase()
    )
}
