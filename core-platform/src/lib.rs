//! # Core Platform
//!
//! Host-facing helpers that need no network access:
//!
//! - [`Environment`] detection from the document hostname and per
//!   environment URLs ([`EnvironmentUrls`])
//! - [`get_origin`] to strip a URL down to its origin
//! - [`PlatformInfo`] for browser flags, document metrics and a printable
//!   platform summary
//! - [`DeactivateGuard`] asking a [`Deactivatable`] view whether it may be
//!   left
//! - [`is_valid_id`] / [`validate_id`] for Israeli ID numbers

pub mod environment;
pub mod error;
pub mod guard;
pub mod platform;
pub mod validators;

pub use environment::{get_origin, Environment, EnvironmentUrls};
pub use error::{PlatformError, Result};
pub use guard::{DeactivateGuard, Deactivatable, Deactivation};
pub use platform::{BrowserFlags, PlatformInfo, UNKNOWN_DIMENSION};
pub use validators::{is_valid_id, validate_id};
