//! TTL cache gateway for KICK.
//!
//! Sits in front of a [`Fetcher`](kick_core::Fetcher): fresh entries are
//! served from memory, misses and expired entries go to the fetcher, and
//! concurrent misses for the same key share a single fetch.
//!
//! ## Example
//!
//! ```rust,ignore
//! use kick_cache::{CacheConfig, Gateway};
//!
//! let gateway = Gateway::new(CacheConfig::with_ttl_ms(60_000.0), fetcher)?;
//! let channel = gateway.get("https://kick.com/api/v1/channels/xqc").await?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

mod config;
mod gateway;
mod inflight;
mod store;

pub use config::{CacheConfig, CachePolicy};
pub use gateway::Gateway;
pub use store::CacheStats;
