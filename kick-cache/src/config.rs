//! Cache configuration and its validated form.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use kick_core::error::{KickError, Result};

/// User-facing cache configuration.
///
/// `enabled` and `ttl_ms` are never read independently: they are validated
/// together into a [`CachePolicy`] once, when the gateway is built.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Whether responses are cached at all
    #[serde(default)]
    pub enabled: bool,
    /// Time-to-live in milliseconds; required when `enabled` is true
    #[serde(default)]
    pub ttl_ms: Option<f64>,
}

impl CacheConfig {
    /// Creates an enabled config with the given TTL.
    pub fn with_ttl_ms(ttl_ms: f64) -> Self {
        Self {
            enabled: true,
            ttl_ms: Some(ttl_ms),
        }
    }

    /// Creates a disabled (pass-through) config.
    pub fn disabled() -> Self {
        Self::default()
    }

    /// Validates the config into a policy.
    ///
    /// A disabled config is always valid, whatever its `ttl_ms`. An enabled
    /// one needs a finite, strictly positive TTL.
    pub fn validate(&self) -> Result<CachePolicy> {
        if !self.enabled {
            return Ok(CachePolicy::Disabled);
        }

        let ttl_ms = self.ttl_ms.ok_or_else(|| {
            KickError::InvalidConfig("cache.ttl_ms is required when cache.enabled is true".into())
        })?;

        if !ttl_ms.is_finite() {
            return Err(KickError::InvalidConfig(format!(
                "cache.ttl_ms must be a finite number, got {}",
                ttl_ms
            )));
        }
        if ttl_ms <= 0.0 {
            return Err(KickError::InvalidConfig(format!(
                "cache.ttl_ms must be positive, got {}",
                ttl_ms
            )));
        }

        let ttl = Duration::try_from_secs_f64(ttl_ms / 1000.0)
            .map_err(|e| KickError::InvalidConfig(format!("cache.ttl_ms out of range: {}", e)))?;
        if ttl.is_zero() {
            return Err(KickError::InvalidConfig(format!(
                "cache.ttl_ms rounds down to zero: {}",
                ttl_ms
            )));
        }

        Ok(CachePolicy::Ttl(ttl))
    }
}

/// Validated caching behaviour.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CachePolicy {
    /// Every lookup goes to the fetcher; nothing is stored.
    Disabled,
    /// Successful payloads are kept for the given duration.
    Ttl(Duration),
}

impl CachePolicy {
    /// Returns the TTL if caching is enabled.
    pub fn ttl(&self) -> Option<Duration> {
        match self {
            CachePolicy::Disabled => None,
            CachePolicy::Ttl(ttl) => Some(*ttl),
        }
    }

    /// Returns true if caching is enabled.
    pub fn is_enabled(&self) -> bool {
        matches!(self, CachePolicy::Ttl(_))
    }
}
