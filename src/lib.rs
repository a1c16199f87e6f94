//! Workspace entry crate.
//!
//! Re-exports the [`core_service`] façade so host applications can depend on
//! `uoh-tools` alone. The `desktop-shims` feature (on by default) pulls in
//! the native bridge defaults.

#[cfg(feature = "desktop-shims")]
pub use core_service::*;
