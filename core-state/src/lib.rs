//! # Core State
//!
//! Observable state primitives shared by the tools crates:
//!
//! - [`Store`]: a single value with merge/override updates, projected
//!   streams and optional session persistence
//! - [`CountdownTimer`]: a restartable once-per-period countdown
//! - [`ErrorState`]: the current user-facing error message, partitioned by
//!   label
//!
//! Every observable keeps its current value in a `tokio::sync::watch`
//! channel, so new subscribers immediately see it. [`Store`] and
//! [`ErrorState`] also fan each update out on a `tokio::sync::broadcast`
//! channel so their streams deliver every value in order.

pub mod error;
pub mod error_state;
pub mod store;
pub mod timer;

pub use error::{Result, StateError};
pub use error_state::{ErrorRecord, ErrorState};
pub use store::{Merger, Replace, ShallowMerge, Store};
pub use timer::CountdownTimer;
