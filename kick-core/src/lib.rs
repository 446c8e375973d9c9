//! # KICK Core
//!
//! Foundational pieces shared by every KICK crate:
//!
//! - **Errors**: one error taxonomy covering configuration, fetch and cache failures
//! - **Traits**: the [`Fetcher`] capability the cache gateway delegates to
//! - **Constants**: Kick API defaults
//!
//! ## Example
//!
//! ```rust
//! use kick_core::{KickError, Result};
//!
//! fn check(ttl_ms: f64) -> Result<()> {
//!     if ttl_ms <= 0.0 {
//!         return Err(KickError::InvalidConfig("ttl must be positive".into()));
//!     }
//!     Ok(())
//! }
//!
//! assert!(check(0.0).unwrap_err().is_config_error());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms, clippy::all)]

pub mod constants;
pub mod error;
pub mod traits;

// Re-export commonly used items at crate root
pub use constants::*;
pub use error::{KickError, Result};
pub use traits::*;
