// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! String intern pool.
//!
//! Topic names, type names, and partition names are repeated across
//! thousands of discovery samples; interning them to `Arc<str>` makes
//! QoS/entity comparisons pointer-cheap and keeps the entity graph's
//! maps (`crate::entity`) keyed by small, `Copy`-ish handles rather than
//! owned `String`s everywhere. Same double-checked-locking shape as
//! `qos::intern`'s hash-consing engine.

use dashmap::DashMap;
use std::sync::Arc;

#[derive(Default)]
pub struct InternPool {
    table: DashMap<Arc<str>, ()>,
}

impl InternPool {
    pub fn new() -> Self {
        Self {
            table: DashMap::new(),
        }
    }

    /// Return the canonical `Arc<str>` for `s`, inserting it if this is
    /// the first time it has been seen.
    pub fn intern(&self, s: &str) -> Arc<str> {
        if let Some(entry) = self.table.get_key_value(s) {
            return entry.0.clone();
        }
        let arc: Arc<str> = Arc::from(s);
        self.table.entry(arc.clone()).or_insert(());
        arc
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interning_same_string_shares_allocation() {
        let pool = InternPool::new();
        let a = pool.intern("rt/sensors/temperature");
        let b = pool.intern("rt/sensors/temperature");
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(pool.len(), 1);
    }

    #[test]
    fn distinct_strings_get_distinct_entries() {
        let pool = InternPool::new();
        pool.intern("a");
        pool.intern("b");
        assert_eq!(pool.len(), 2);
    }
}
