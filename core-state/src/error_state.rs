//! # Error State
//!
//! Holds the single current user-facing error message. A label partitions
//! observers: a view showing errors for `"login"` selects that label, a
//! global banner selects everything.
//!
//! Every record is delivered to each matching selector, even when another
//! label's record replaces it right away.

use futures::stream::{self, Stream};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast::error::RecvError;
use tokio::sync::{broadcast, watch};
use tracing::warn;

const RECORD_CAPACITY: usize = 64;

/// The current error message and the label it was raised under.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorRecord {
    pub message: String,
    pub label: Option<String>,
}

impl ErrorRecord {
    pub fn new(message: impl Into<String>, label: Option<&str>) -> Self {
        Self {
            message: message.into(),
            label: label.map(str::to_string),
        }
    }

    fn matches(&self, label: Option<&str>) -> bool {
        match label {
            None | Some("") => true,
            Some(label) => self.label.as_deref() == Some(label),
        }
    }
}

/// Observable error message holder.
#[derive(Debug)]
pub struct ErrorState {
    tx: watch::Sender<ErrorRecord>,
    records: broadcast::Sender<ErrorRecord>,
}

impl Default for ErrorState {
    fn default() -> Self {
        Self::new()
    }
}

impl ErrorState {
    pub fn new() -> Self {
        let (tx, _) = watch::channel(ErrorRecord::default());
        let (records, _) = broadcast::channel(RECORD_CAPACITY);
        Self { tx, records }
    }

    /// Records `message` under `label`.
    pub fn handle(&self, label: Option<&str>, message: impl Into<String>) {
        self.set(message, label);
    }

    /// Records `message` under `label`.
    pub fn set(&self, message: impl Into<String>, label: Option<&str>) {
        self.publish(ErrorRecord::new(message, label));
    }

    /// Sets an empty message under `label`.
    pub fn clear(&self, label: Option<&str>) {
        self.publish(ErrorRecord::new(String::new(), label));
    }

    /// Whether the current message is non-empty.
    pub fn has_errors(&self) -> bool {
        !self.tx.borrow().message.is_empty()
    }

    pub fn current(&self) -> ErrorRecord {
        self.tx.borrow().clone()
    }

    /// Messages of records raised under `label` (all records for `None`).
    ///
    /// Starts with the current record when it matches.
    pub fn select(&self, label: Option<&str>) -> impl Stream<Item = String> + Send + 'static {
        let (current, rx) = {
            let current = self.tx.borrow();
            (current.clone(), self.records.subscribe())
        };
        let label = label.map(str::to_string);

        stream::unfold(
            (Some(current), rx, label),
            |(mut pending, mut rx, label)| async move {
                loop {
                    let record = match pending.take() {
                        Some(record) => record,
                        None => match rx.recv().await {
                            Ok(record) => record,
                            Err(RecvError::Lagged(skipped)) => {
                                warn!(skipped, "Error state subscriber lagged behind");
                                continue;
                            }
                            Err(RecvError::Closed) => return None,
                        },
                    };
                    if record.matches(label.as_deref()) {
                        return Some((record.message, (None, rx, label)));
                    }
                }
            },
        )
    }

    fn publish(&self, record: ErrorRecord) {
        // Fan out under the write lock so select() never misses or repeats
        self.tx.send_modify(|current| {
            *current = record;
            let _ = self.records.send(current.clone());
        });
    }
}
