//! # Observable Store
//!
//! [`Store<T>`] holds exactly one current value of `T`. Updates are total:
//! a patch is merged into the current value (see [`Merger`]) or replaces it,
//! and every change is published to all subscribers.
//!
//! When created with [`Store::persisted`], each update writes a JSON
//! snapshot under the given key and a snapshot found at construction time
//! becomes the initial value. The snapshot is written before the new state
//! is published: an update that fails to persist changes nothing.
//!
//! The current value lives in a `watch` channel; every published state is
//! also fanned out on a `broadcast` channel so streams see each update,
//! not only the latest one.
//!
//! ## Usage
//!
//! ```ignore
//! use core_state::Store;
//! use serde_json::json;
//!
//! #[derive(Clone, PartialEq, Serialize, Deserialize)]
//! struct Form { name: String, step: u32 }
//!
//! let store = Store::new(Form { name: String::new(), step: 1 });
//! let mut steps = store.select(|form| form.step);
//!
//! store.set_state(&json!({ "step": 2 }))?;
//! assert_eq!(store.get_state_of(|form| form.step), 2);
//! ```

use crate::error::Result;
use bridge_traits::{BridgeError, SessionStorage};
use futures::future;
use futures::stream::{self, Stream, StreamExt};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use tokio::sync::broadcast::error::RecvError;
use tokio::sync::{broadcast, watch};
use tracing::{debug, warn};

const UPDATE_CAPACITY: usize = 256;

/// Combines the current state with a patch, both in JSON form.
pub trait Merger: Send + Sync {
    fn merge(&self, current: Value, patch: Value) -> Value;
}

/// Top-level fields present in the patch overwrite, all others are kept.
///
/// A patch that is not an object, or a current state that is not one,
/// replaces the state entirely.
#[derive(Debug, Clone, Copy, Default)]
pub struct ShallowMerge;

impl Merger for ShallowMerge {
    fn merge(&self, current: Value, patch: Value) -> Value {
        match (current, patch) {
            (Value::Object(mut current), Value::Object(patch)) => {
                current.extend(patch);
                Value::Object(current)
            }
            (_, patch) => patch,
        }
    }
}

/// The patch becomes the new state.
#[derive(Debug, Clone, Copy, Default)]
pub struct Replace;

impl Merger for Replace {
    fn merge(&self, _current: Value, patch: Value) -> Value {
        patch
    }
}

impl<F> Merger for F
where
    F: Fn(Value, Value) -> Value + Send + Sync,
{
    fn merge(&self, current: Value, patch: Value) -> Value {
        self(current, patch)
    }
}

struct Persistence {
    key: String,
    storage: Arc<dyn SessionStorage>,
}

/// Observable single-value state container.
pub struct Store<T> {
    tx: watch::Sender<T>,
    updates: broadcast::Sender<T>,
    initial: T,
    merger: Arc<dyn Merger>,
    persistence: Option<Persistence>,
}

impl<T> fmt::Debug for Store<T>
where
    T: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Store")
            .field("state", &*self.tx.borrow())
            .field("initial", &self.initial)
            .field("key", &self.persistence.as_ref().map(|p| p.key.as_str()))
            .finish()
    }
}

impl<T> Store<T>
where
    T: Clone + Serialize + DeserializeOwned + Send + Sync + 'static,
{
    /// Creates an in-memory store.
    pub fn new(initial: T) -> Self {
        let (tx, _) = watch::channel(initial.clone());
        let (updates, _) = broadcast::channel(UPDATE_CAPACITY);
        Self {
            tx,
            updates,
            initial,
            merger: Arc::new(ShallowMerge),
            persistence: None,
        }
    }

    /// Creates a store persisted under `key`.
    ///
    /// A snapshot already stored under `key` wins over `initial` and becomes
    /// the value [`reset`](Self::reset) returns to. A snapshot that cannot
    /// be read or deserialized is ignored.
    pub fn persisted(initial: T, key: impl Into<String>, storage: Arc<dyn SessionStorage>) -> Self {
        let key = key.into();
        let initial = match storage.get_item(&key) {
            Ok(Some(raw)) => match serde_json::from_str::<T>(&raw) {
                Ok(restored) => {
                    debug!(key = %key, "Restored store snapshot");
                    restored
                }
                Err(e) => {
                    warn!(key = %key, error = %e, "Ignoring unreadable store snapshot");
                    initial
                }
            },
            Ok(None) => initial,
            Err(e) => {
                warn!(key = %key, error = %e, "Failed to read store snapshot");
                initial
            }
        };

        let (tx, _) = watch::channel(initial.clone());
        let (updates, _) = broadcast::channel(UPDATE_CAPACITY);
        Self {
            tx,
            updates,
            initial,
            merger: Arc::new(ShallowMerge),
            persistence: Some(Persistence { key, storage }),
        }
    }

    /// Replaces the default [`ShallowMerge`] merger.
    pub fn with_merger(mut self, merger: impl Merger + 'static) -> Self {
        self.merger = Arc::new(merger);
        self
    }

    /// Current state.
    pub fn get_state(&self) -> T {
        self.tx.borrow().clone()
    }

    /// Projection of the current state.
    pub fn get_state_of<U, F>(&self, selector: F) -> U
    where
        F: FnOnce(&T) -> U,
    {
        selector(&self.tx.borrow())
    }

    /// The value the store was created with (or restored to).
    pub fn initial_state(&self) -> &T {
        &self.initial
    }

    /// Merges `patch` into the state with the store's merger.
    pub fn set_state<P>(&self, patch: &P) -> Result<()>
    where
        P: Serialize + ?Sized,
    {
        self.apply_patch(serde_json::to_value(patch)?, self.merger.as_ref())
    }

    /// Merges `patch` into the state with an explicit merger.
    pub fn set_state_with<P, M>(&self, patch: &P, merger: &M) -> Result<()>
    where
        P: Serialize + ?Sized,
        M: Merger,
    {
        self.apply_patch(serde_json::to_value(patch)?, merger)
    }

    /// Replaces the state entirely.
    pub fn override_state(&self, state: T) -> Result<()> {
        self.publish(state)
    }

    /// Replaces the state with `f(current)`.
    pub fn update<F>(&self, f: F) -> Result<()>
    where
        F: FnOnce(&T) -> T,
    {
        let current = self.get_state();
        self.publish(f(&current))
    }

    /// Restores the initial value and drops the persisted snapshot.
    ///
    /// Leaves the state untouched when the snapshot cannot be removed.
    pub fn reset(&self) -> Result<()> {
        self.commit(self.initial.clone(), |persistence| {
            persistence.storage.remove_item(&persistence.key)
        })
    }

    /// Stream of the whole state: the current value, then every update.
    ///
    /// A subscriber falling more than the channel capacity behind skips
    /// the missed updates. Ends when the store is dropped.
    pub fn state(&self) -> impl Stream<Item = T> + Send + 'static {
        let (current, rx) = {
            // Holding the read lock keeps publishers out between the two reads
            let current = self.tx.borrow();
            (current.clone(), self.updates.subscribe())
        };

        stream::unfold((Some(current), rx), |(pending, mut rx)| async move {
            if let Some(value) = pending {
                return Some((value, (None, rx)));
            }
            loop {
                match rx.recv().await {
                    Ok(value) => return Some((value, (None, rx))),
                    Err(RecvError::Lagged(skipped)) => {
                        warn!(skipped, "Store subscriber lagged behind");
                    }
                    Err(RecvError::Closed) => return None,
                }
            }
        })
    }

    /// Stream of a projection of the state.
    ///
    /// Emits the current projected value, then each change of it;
    /// consecutive equal values are suppressed. Ends when the store is
    /// dropped.
    pub fn select<U, F>(&self, selector: F) -> impl Stream<Item = U> + Send + 'static
    where
        F: Fn(&T) -> U + Send + 'static,
        U: PartialEq + Clone + Send + 'static,
    {
        let mut last: Option<U> = None;
        self.state().filter_map(move |state| {
            let value = selector(&state);
            let changed = last.as_ref() != Some(&value);
            if changed {
                last = Some(value.clone());
            }
            future::ready(changed.then_some(value))
        })
    }

    /// Number of live subscriptions.
    pub fn subscriber_count(&self) -> usize {
        self.updates.receiver_count()
    }

    fn apply_patch(&self, patch: Value, merger: &dyn Merger) -> Result<()> {
        let current = serde_json::to_value(&*self.tx.borrow())?;
        let merged = merger.merge(current, patch);
        let next: T = serde_json::from_value(merged)?;
        self.publish(next)
    }

    fn publish(&self, next: T) -> Result<()> {
        let snapshot = match &self.persistence {
            Some(_) => serde_json::to_string(&next)?,
            None => String::new(),
        };

        self.commit(next, |persistence| {
            persistence.storage.set_item(&persistence.key, &snapshot)
        })
    }

    /// Persists, then publishes `next`, all under the watch write lock so
    /// storage and subscribers observe updates in the same order.
    fn commit<P>(&self, next: T, persist: P) -> Result<()>
    where
        P: FnOnce(&Persistence) -> std::result::Result<(), BridgeError>,
    {
        let mut result = Ok(());
        self.tx.send_if_modified(|state| {
            if let Some(persistence) = &self.persistence {
                if let Err(e) = persist(persistence) {
                    warn!(key = %persistence.key, error = %e, "Failed to persist store snapshot");
                    result = Err(e.into());
                    return false;
                }
            }
            *state = next;
            // No subscribers is fine
            let _ = self.updates.send(state.clone());
            true
        });
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StateError;
    use bridge_desktop::MemorySessionStorage;
    use serde::Deserialize;
    use serde_json::json;
    use std::sync::atomic::{AtomicBool, Ordering};

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Counter {
        a: i32,
        b: i32,
    }

    fn counter() -> Counter {
        Counter { a: 1, b: 2 }
    }

    #[test]
    fn test_get_state_returns_initial() {
        let store = Store::new(counter());
        assert_eq!(store.get_state(), counter());
        assert_eq!(store.get_state_of(|s| s.b), 2);
    }

    #[test]
    fn test_set_state_merges_top_level_fields() {
        let store = Store::new(counter());
        store.set_state(&json!({ "b": 5 })).unwrap();

        assert_eq!(store.get_state(), Counter { a: 1, b: 5 });
    }

    #[test]
    fn test_set_state_with_replace_requires_full_value() {
        let store = Store::new(counter());

        store
            .set_state_with(&json!({ "a": 7, "b": 8 }), &Replace)
            .unwrap();
        assert_eq!(store.get_state(), Counter { a: 7, b: 8 });

        let partial = store.set_state_with(&json!({ "a": 9 }), &Replace);
        assert!(partial.is_err());
        assert_eq!(store.get_state(), Counter { a: 7, b: 8 });
    }

    #[test]
    fn test_custom_merger_closure() {
        let sum = |current: Value, patch: Value| {
            let a = current["a"].as_i64().unwrap_or(0) + patch["a"].as_i64().unwrap_or(0);
            let b = current["b"].clone();
            json!({ "a": a, "b": b })
        };
        let store = Store::new(counter()).with_merger(sum);

        store.set_state(&json!({ "a": 10 })).unwrap();
        assert_eq!(store.get_state(), Counter { a: 11, b: 2 });
    }

    #[test]
    fn test_override_and_update() {
        let store = Store::new(counter());

        store.override_state(Counter { a: 0, b: 0 }).unwrap();
        assert_eq!(store.get_state(), Counter { a: 0, b: 0 });

        store
            .update(|s| Counter { a: s.a + 3, ..s.clone() })
            .unwrap();
        assert_eq!(store.get_state(), Counter { a: 3, b: 0 });
    }

    #[test]
    fn test_reset_restores_initial() {
        let store = Store::new(counter());
        store.set_state(&json!({ "a": 99 })).unwrap();
        store.reset().unwrap();

        assert_eq!(store.get_state(), counter());
    }

    #[test]
    fn test_persisted_store_writes_and_restores() {
        let storage: Arc<dyn SessionStorage> = Arc::new(MemorySessionStorage::new());

        let store = Store::persisted(counter(), "counter", storage.clone());
        store.set_state(&json!({ "a": 5 })).unwrap();
        assert_eq!(
            storage.get_item("counter").unwrap().as_deref(),
            Some(r#"{"a":5,"b":2}"#)
        );

        let restored = Store::persisted(counter(), "counter", storage.clone());
        assert_eq!(restored.get_state(), Counter { a: 5, b: 2 });
        assert_eq!(restored.initial_state(), &Counter { a: 5, b: 2 });

        restored.reset().unwrap();
        assert_eq!(restored.get_state(), Counter { a: 5, b: 2 });
        assert_eq!(storage.get_item("counter").unwrap(), None);
    }

    #[test]
    fn test_unreadable_snapshot_is_ignored() {
        let storage: Arc<dyn SessionStorage> = Arc::new(MemorySessionStorage::new());
        storage.set_item("counter", "{not json").unwrap();

        let store = Store::persisted(counter(), "counter", storage);
        assert_eq!(store.get_state(), counter());
    }

    #[tokio::test]
    async fn test_select_suppresses_consecutive_duplicates() {
        let store = Store::new(counter());
        let mut b_values = Box::pin(store.select(|s| s.b));

        assert_eq!(b_values.next().await, Some(2));

        store.set_state(&json!({ "a": 100 })).unwrap();
        store.set_state(&json!({ "b": 3 })).unwrap();
        assert_eq!(b_values.next().await, Some(3));

        drop(store);
        assert_eq!(b_values.next().await, None);
    }

    #[tokio::test]
    async fn test_state_stream_starts_with_current_value() {
        let store = Store::new(counter());
        let mut states = Box::pin(store.state());

        assert_eq!(states.next().await, Some(counter()));
        store.override_state(Counter { a: 4, b: 4 }).unwrap();
        assert_eq!(states.next().await, Some(Counter { a: 4, b: 4 }));
        assert_eq!(store.subscriber_count(), 1);
    }

    #[tokio::test]
    async fn test_select_sees_back_to_back_updates() {
        let store = Store::new(counter());
        let mut b_values = Box::pin(store.select(|s| s.b));
        assert_eq!(b_values.next().await, Some(2));

        store.set_state(&json!({ "b": 3 })).unwrap();
        store.set_state(&json!({ "b": 4 })).unwrap();

        let seen: Vec<i32> = b_values.take(2).collect().await;
        assert_eq!(seen, vec![3, 4]);
    }

    /// Storage whose writes fail while `failing` is set.
    #[derive(Default)]
    struct FlakyStorage {
        inner: MemorySessionStorage,
        failing: AtomicBool,
    }

    impl SessionStorage for FlakyStorage {
        fn get_item(&self, key: &str) -> bridge_traits::error::Result<Option<String>> {
            self.inner.get_item(key)
        }

        fn set_item(&self, key: &str, value: &str) -> bridge_traits::error::Result<()> {
            if self.failing.load(Ordering::SeqCst) {
                return Err(BridgeError::Storage("quota exceeded".into()));
            }
            self.inner.set_item(key, value)
        }

        fn remove_item(&self, key: &str) -> bridge_traits::error::Result<()> {
            if self.failing.load(Ordering::SeqCst) {
                return Err(BridgeError::Storage("quota exceeded".into()));
            }
            self.inner.remove_item(key)
        }
    }

    #[tokio::test]
    async fn test_failed_write_leaves_state_unpublished() {
        let storage = Arc::new(FlakyStorage::default());
        let store = Store::persisted(counter(), "counter", storage.clone());
        let mut states = Box::pin(store.state());
        assert_eq!(states.next().await, Some(counter()));

        storage.failing.store(true, Ordering::SeqCst);
        let result = store.set_state(&json!({ "a": 9 }));
        assert!(matches!(result, Err(StateError::Storage(_))));
        assert_eq!(store.get_state(), counter());
        assert_eq!(storage.get_item("counter").unwrap(), None);

        storage.failing.store(false, Ordering::SeqCst);
        store.set_state(&json!({ "a": 5 })).unwrap();
        assert_eq!(states.next().await, Some(Counter { a: 5, b: 2 }));
    }

    #[test]
    fn test_failed_reset_keeps_state() {
        let storage = Arc::new(FlakyStorage::default());
        let store = Store::persisted(counter(), "counter", storage.clone());
        store.set_state(&json!({ "b": 7 })).unwrap();

        storage.failing.store(true, Ordering::SeqCst);
        assert!(store.reset().is_err());
        assert_eq!(store.get_state(), Counter { a: 1, b: 7 });
        assert_eq!(
            storage.get_item("counter").unwrap().as_deref(),
            Some(r#"{"a":1,"b":7}"#)
        );
    }
}
