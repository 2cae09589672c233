//! Locating the item list inside an upstream response envelope.
//!
//! The archive backend has wrapped its result list under different keys
//! across versions. Resolution probes a fixed, ordered key list and fails
//! with [`SearchError::BadPayload`] when nothing list-shaped is found, so a
//! changed envelope never masquerades as an empty result.

use serde_json::Value;

use crate::error::{Result, SearchError};

/// Envelope keys that may hold the item list, in priority order.
pub const ENVELOPE_KEYS: &[&str] = &["items", "records", "data", "results", "hits"];

/// Return the raw items contained in `payload`.
///
/// Only objects are accepted. Each key in [`ENVELOPE_KEYS`] is tried in
/// order and the first array value wins. When no key holds an array
/// directly, keys holding an object are probed one level deeper with the
/// same key list, which covers shapes like `{"hits": {"hits": [...]}}`.
pub fn resolve_items(payload: &Value) -> Result<&[Value]> {
    if !payload.is_object() {
        return Err(SearchError::BadPayload);
    }
    direct_list(payload)
        .or_else(|| {
            ENVELOPE_KEYS
                .iter()
                .filter_map(|key| payload.get(*key).filter(|v| v.is_object()))
                .find_map(direct_list)
        })
        .ok_or(SearchError::BadPayload)
}

fn direct_list(value: &Value) -> Option<&[Value]> {
    ENVELOPE_KEYS
        .iter()
        .find_map(|key| value.get(*key).and_then(Value::as_array))
        .map(Vec::as_slice)
}
