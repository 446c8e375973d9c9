//! Common traits for KICK.
//!
//! The cache gateway never talks to the network itself; it delegates every
//! miss to a [`Fetcher`]. Production code plugs in the HTTP fetcher from
//! `kick-client`, tests plug in in-memory fakes.

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::Result;

// ═══════════════════════════════════════════════════════════════════════════════
// FETCHER TRAIT
// ═══════════════════════════════════════════════════════════════════════════════

/// Interface for the expensive remote lookup behind the cache.
///
/// Implementations must be safe to call again for the same URL: the gateway
/// re-invokes the fetcher after expiry and after any failure.
///
/// # Return values
///
/// - `Ok(Some(value))`: usable payload, eligible for caching
/// - `Ok(None)`: the remote returned "nothing" (e.g. a JSON `null`); passed
///   to the caller but never cached
/// - `Err(_)`: the lookup failed or the payload was malformed
///
/// # Panics
///
/// A panic inside `fetch` is not turned into a fetch error. The gateway
/// reports it to every waiter as `KickError::CacheCorruption` and clears the
/// in-flight slot, so the next call starts a new fetch.
#[async_trait]
pub trait Fetcher<V>: Send + Sync {
    /// Fetches and parses the content behind `url`.
    async fn fetch(&self, url: &str) -> Result<Option<V>>;
}

#[async_trait]
impl<V, F> Fetcher<V> for Arc<F>
where
    F: Fetcher<V> + ?Sized,
    V: 'static,
{
    async fn fetch(&self, url: &str) -> Result<Option<V>> {
        (**self).fetch(url).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::KickError;

    struct EchoFetcher;

    #[async_trait]
    impl Fetcher<String> for EchoFetcher {
        async fn fetch(&self, url: &str) -> Result<Option<String>> {
            match url {
                "" => Err(KickError::InvalidUrl("empty".into())),
                "null" => Ok(None),
                other => Ok(Some(other.to_uppercase())),
            }
        }
    }

    #[tokio::test]
    async fn test_arc_fetcher_delegates() {
        let fetcher: Arc<dyn Fetcher<String>> = Arc::new(EchoFetcher);
        assert_eq!(fetcher.fetch("abc").await.unwrap(), Some("ABC".to_string()));
        assert_eq!(fetcher.fetch("null").await.unwrap(), None);
        assert!(fetcher.fetch("").await.unwrap_err().is_fetch_error());
    }
}
