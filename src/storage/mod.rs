//! Storage Module
//!
//! This module provides the store that backs the cache: the [`Store`]
//! capability trait, the one concrete backend ([`MemoryStore`]), and the
//! [`StoreKind`] enumeration through which a backend is selected.
//!
//! The store is an unbounded, process-lifetime map. It owns its entries
//! exclusively; values are copied in and out across the boundary, and the
//! aggregate [`Status`] counters are updated in the same critical section as
//! every map mutation.

use std::str::FromStr;
use std::sync::Arc;

pub mod engine;

// Re-export commonly used types
pub use engine::{MemoryStore, Status, Store, StoreError};

/// The available store backends.
///
/// Selection happens through this enumeration, never through open-ended
/// string dispatch: an unrecognized name fails at configuration parse time
/// with a typed error instead of panicking at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreKind {
    /// The in-memory backend. Currently the only one.
    Memory,
}

impl StoreKind {
    /// Builds a store of this kind, ready to share across connections.
    pub fn build(self) -> Arc<dyn Store> {
        match self {
            StoreKind::Memory => Arc::new(MemoryStore::new()),
        }
    }
}

impl FromStr for StoreKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "memory" => Ok(StoreKind::Memory),
            other => Err(format!("unknown store backend '{}' (expected: memory)", other)),
        }
    }
}

impl std::fmt::Display for StoreKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreKind::Memory => write!(f, "memory"),
        }
    }
}
