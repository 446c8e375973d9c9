//! # KICK Client
//!
//! Cached access to the Kick public API.
//!
//! - [`HttpFetcher`]: fetches a URL and turns the response into JSON
//! - [`endpoints`]: builds the URL for each API endpoint
//! - [`KickClient`]: one method per endpoint, backed by a
//!   [`Gateway`](kick_cache::Gateway) so repeated lookups are served from
//!   memory and concurrent ones share a single request
//!
//! ## Example
//!
//! ```rust,ignore
//! use kick_client::{ClientConfig, KickClient};
//!
//! let client = KickClient::new(ClientConfig::default())?;
//! if let Some(channel) = client.channel("xqc").await? {
//!     println!("{}", channel["slug"]);
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

mod client;
pub mod endpoints;
mod fetcher;

pub use client::{ClientConfig, KickClient};
pub use endpoints::{ClipQuery, LivestreamQuery, SubcategoryQuery};
pub use fetcher::{strip_markup, FetcherConfig, HttpFetcher};
pub use kick_cache::{CacheConfig, CachePolicy, CacheStats};
