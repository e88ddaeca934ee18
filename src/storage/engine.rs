//! Concurrent In-Memory Store with Live Size Accounting
//!
//! This module implements the store that backs the cache: a key-value map
//! plus a [`Status`] aggregate (entry count, total key bytes, total value
//! bytes) that is kept exactly consistent with the map's contents.
//!
//! ## Concurrency Model
//!
//! The map and its counters live together behind one `RwLock`:
//!
//! ```text
//! ┌───────────────────────────────┐
//! │          MemoryStore          │
//! │  ┌─────────────────────────┐  │
//! │  │        RwLock           │  │
//! │  │  entries: HashMap       │  │
//! │  │  status:  Status        │  │
//! │  └─────────────────────────┘  │
//! └───────────────────────────────┘
//! ```
//!
//! Reads take the shared lock and may run concurrently; `set`/`del` take the
//! exclusive lock. Because the counters mutate inside the same critical
//! section as the map, no caller ever observes a map state whose `Status`
//! does not match. Critical sections cover only in-memory work and never
//! span I/O.

use bytes::Bytes;
use std::collections::HashMap;
use std::sync::RwLock;
use thiserror::Error;

/// Errors a store backend can report.
///
/// The in-memory backend never fails, but the trait keeps the error channel
/// open for backends that can (an I/O-backed store, for instance). The
/// dispatcher maps any of these to a generic failure response.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum StoreError {
    /// The backend could not service the operation.
    #[error("store backend unavailable: {0}")]
    Unavailable(String),
}

/// Aggregate statistics over the store's current contents.
///
/// Invariant: at all times `count` equals the number of live entries,
/// `key_bytes` the sum of their key lengths, and `value_bytes` the sum of
/// their value lengths.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Status {
    /// Number of entries currently present.
    pub count: u64,
    /// Total bytes across all keys.
    pub key_bytes: u64,
    /// Total bytes across all values.
    pub value_bytes: u64,
}

impl Status {
    /// Accounts for an entry entering the store.
    fn add(&mut self, key: &[u8], value: &[u8]) {
        self.count += 1;
        self.key_bytes += key.len() as u64;
        self.value_bytes += value.len() as u64;
    }

    /// Accounts for an entry leaving the store.
    fn remove(&mut self, key: &[u8], value: &[u8]) {
        self.count -= 1;
        self.key_bytes -= key.len() as u64;
        self.value_bytes -= value.len() as u64;
    }
}

/// The capability a cache backend must provide.
///
/// One concrete implementation exists ([`MemoryStore`]); the trait is the
/// seam where an alternative backend would plug in, selected through
/// [`StoreKind`](crate::storage::StoreKind) rather than by name at runtime.
pub trait Store: Send + Sync {
    /// Returns the current value for `key`, or `None` if absent.
    ///
    /// Absence is not an error.
    fn get(&self, key: &[u8]) -> Result<Option<Bytes>, StoreError>;

    /// Inserts or overwrites `key`.
    fn set(&self, key: Bytes, value: Bytes) -> Result<(), StoreError>;

    /// Removes `key` if present. Deleting an absent key is a no-op, not an
    /// error.
    fn del(&self, key: &[u8]) -> Result<(), StoreError>;

    /// Returns a snapshot copy of the aggregate counters.
    fn status(&self) -> Status;
}

#[derive(Debug, Default)]
struct Inner {
    entries: HashMap<Bytes, Bytes>,
    status: Status,
}

/// The in-memory store backend.
///
/// Unbounded and process-lifetime: entries live from a `set` until an
/// explicit `del` or shutdown. No TTL, no eviction, no persistence.
///
/// # Example
///
/// ```
/// use bytecache::storage::{MemoryStore, Store};
/// use bytes::Bytes;
///
/// let store = MemoryStore::new();
/// store.set(Bytes::from("name"), Bytes::from("bytecache")).unwrap();
/// assert_eq!(
///     store.get(b"name").unwrap(),
///     Some(Bytes::from("bytecache"))
/// );
/// assert_eq!(store.status().count, 1);
/// ```
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl Store for MemoryStore {
    fn get(&self, key: &[u8]) -> Result<Option<Bytes>, StoreError> {
        let inner = self.inner.read().unwrap();
        Ok(inner.entries.get(key).cloned())
    }

    fn set(&self, key: Bytes, value: Bytes) -> Result<(), StoreError> {
        let mut guard = self.inner.write().unwrap();
        let inner = &mut *guard;

        // Overwrites retire the old contribution before adding the new one.
        // The transient dip is invisible: both steps run under the same
        // exclusive lock.
        if let Some(old) = inner.entries.get(&key) {
            inner.status.remove(&key, old);
        }
        inner.status.add(&key, &value);
        inner.entries.insert(key, value);
        Ok(())
    }

    fn del(&self, key: &[u8]) -> Result<(), StoreError> {
        let mut guard = self.inner.write().unwrap();
        let inner = &mut *guard;

        if let Some(old) = inner.entries.remove(key) {
            inner.status.remove(key, &old);
        }
        Ok(())
    }

    fn status(&self) -> Status {
        self.inner.read().unwrap().status
    }
}
