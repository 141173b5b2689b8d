//! # Table Store
//!
//! Generic keyed mapping with get/set semantics. The in-memory state adapter
//! is assembled from one table per record family.

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::RwLock;

/// A concurrent keyed table.
///
/// Reads clone the stored value so callers never hold a reference into the
/// map; writes replace the value wholesale. The engine re-reads before every
/// mutation, so the store needs no merge-update primitive.
#[derive(Debug)]
pub struct TableStore<K, V> {
    rows: RwLock<HashMap<K, V>>,
}

impl<K, V> Default for TableStore<K, V> {
    fn default() -> Self {
        Self {
            rows: RwLock::new(HashMap::new()),
        }
    }
}

impl<K, V> TableStore<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self {
            rows: RwLock::new(HashMap::new()),
        }
    }

    /// Returns a clone of the value at `key`, if present.
    #[must_use]
    pub fn get(&self, key: &K) -> Option<V> {
        self.rows.read().unwrap().get(key).cloned()
    }

    /// Inserts or replaces the value at `key`.
    pub fn insert(&self, key: K, value: V) {
        self.rows.write().unwrap().insert(key, value);
    }

    /// Number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.read().unwrap().len()
    }

    /// Returns true if the table is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.read().unwrap().is_empty()
    }

    /// Clones the whole table. Used by tests to compare pre/post states.
    #[must_use]
    pub fn snapshot(&self) -> HashMap<K, V> {
        self.rows.read().unwrap().clone()
    }
}

// =============================================================================
// TESTS
// =============================================================================
