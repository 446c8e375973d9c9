//! Error types for KICK.
//!
//! One enum covers the whole taxonomy: configuration errors (fatal, raised at
//! construction), fetch errors (per request, never cached) and cache
//! corruption (internal invariant violations).
//!
//! `KickError` is `Clone` because a single fetch outcome is handed to every
//! caller that joined the same in-flight request.

use thiserror::Error;

/// Result type alias using `KickError`.
pub type Result<T> = std::result::Result<T, KickError>;

/// Main error type for all KICK operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KickError {
    // ═══════════════════════════════════════════════════════════════════════════
    // CONFIGURATION ERRORS
    // ═══════════════════════════════════════════════════════════════════════════

    /// Cache or client configuration rejected at construction time.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ═══════════════════════════════════════════════════════════════════════════
    // FETCH ERRORS
    // ═══════════════════════════════════════════════════════════════════════════

    /// Transport-level failure (DNS, connection reset, TLS, ...).
    #[error("Fetch failed for '{url}': {reason}")]
    FetchFailed { url: String, reason: String },

    /// Remote answered with a non-success status.
    #[error("HTTP {status} from '{url}'")]
    HttpStatus { url: String, status: u16 },

    /// Response body could not be interpreted as a valid payload.
    #[error("Malformed payload from '{url}': {reason}")]
    MalformedPayload { url: String, reason: String },

    /// Request did not complete within the fetcher's timeout.
    #[error("Request to '{url}' timed out after {seconds}s")]
    Timeout { url: String, seconds: u64 },

    /// An endpoint URL could not be built.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    // ═══════════════════════════════════════════════════════════════════════════
    // CACHE ERRORS
    // ═══════════════════════════════════════════════════════════════════════════

    /// Internal cache invariant violated (should never happen).
    #[error("Cache invariant violated: {0}")]
    CacheCorruption(String),
}

impl KickError {
    /// Returns true if this is a configuration error.
    pub fn is_config_error(&self) -> bool {
        matches!(self, KickError::InvalidConfig(_))
    }

    /// Returns true if this error came from the fetch path.
    pub fn is_fetch_error(&self) -> bool {
        matches!(
            self,
            KickError::FetchFailed { .. }
                | KickError::HttpStatus { .. }
                | KickError::MalformedPayload { .. }
                | KickError::Timeout { .. }
                | KickError::InvalidUrl(_)
        )
    }

    /// Returns true if a later attempt might succeed.
    ///
    /// The gateway never retries on its own; this is a hint for callers.
    pub fn is_recoverable(&self) -> bool {
        match self {
            KickError::FetchFailed { .. } | KickError::Timeout { .. } => true,
            KickError::HttpStatus { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }
}
