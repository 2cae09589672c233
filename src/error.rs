//! Error types surfaced by person searches.
//!
//! Every failure that makes a whole upstream response unusable maps to one
//! [`SearchError`] variant. Per-item problems never become errors; they only
//! exclude the item from the result list.

/// Call-level failure of a search or probe.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SearchError {
    /// The request never produced a response: connection failure, timeout,
    /// or the request was aborted. These causes are not distinguished.
    #[error("NETWORK_OR_TIMEOUT: request did not complete")]
    NetworkOrTimeout,

    /// Transport succeeded but the upstream answered outside 2xx.
    #[error("UPSTREAM_HTTP_{0}: upstream returned an error status")]
    UpstreamHttp(u16),

    /// Status was fine but the body was not valid JSON.
    #[error("BAD_JSON: response body is not valid JSON")]
    BadJson,

    /// JSON decoded, but no recognized item list could be found in it.
    #[error("BAD_PAYLOAD: response envelope has no recognized item list")]
    BadPayload,
}

impl SearchError {
    /// Stable machine-readable code for this failure.
    pub fn code(&self) -> String {
        match self {
            Self::NetworkOrTimeout => "NETWORK_OR_TIMEOUT".to_string(),
            Self::UpstreamHttp(status) => format!("UPSTREAM_HTTP_{status}"),
            Self::BadJson => "BAD_JSON".to_string(),
            Self::BadPayload => "BAD_PAYLOAD".to_string(),
        }
    }
}

/// Result type alias using [`SearchError`].
pub type Result<T> = std::result::Result<T, SearchError>;
