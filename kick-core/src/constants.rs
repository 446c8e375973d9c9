//! Defaults for the Kick public API and the response cache.

// ═══════════════════════════════════════════════════════════════════════════════
// API
// ═══════════════════════════════════════════════════════════════════════════════

/// Base URL of the Kick site; API paths are appended to it.
pub const DEFAULT_BASE_URL: &str = "https://kick.com";

/// Default page number for paginated listings.
pub const DEFAULT_PAGE: u32 = 1;

/// Default page size for paginated listings.
pub const DEFAULT_LIMIT: u32 = 25;

/// Default livestream language filter.
pub const DEFAULT_LANGUAGE: &str = "en";

// ═══════════════════════════════════════════════════════════════════════════════
// HTTP
// ═══════════════════════════════════════════════════════════════════════════════

/// Request timeout for the HTTP fetcher, in seconds.
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 30;

/// User agent sent with every request.
pub const DEFAULT_USER_AGENT: &str = concat!("kick-client/", env!("CARGO_PKG_VERSION"));

// ═══════════════════════════════════════════════════════════════════════════════
// CACHE
// ═══════════════════════════════════════════════════════════════════════════════

/// Default time-to-live for cached responses (one minute).
pub const DEFAULT_CACHE_TTL_MS: u64 = 60_000;
