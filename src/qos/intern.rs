// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! QoS intern engine: hash-conses [`UniQos`] records into canonical
//! `Arc<UniQos>`s.
//!
//! Most endpoints in a domain share one of a handful of QoS profiles
//! (`best_effort`, `reliable`, a couple of site-specific overrides), so
//! rather than storing an owned `UniQos` per entity, the entity graph
//! (`crate::entity`) stores the `Arc<UniQos>` this engine returns:
//! identical records collapse to the same allocation, and comparisons
//! for the common "is this the same profile" case become pointer
//! comparisons. Double-checked locking mirrors the teacher's
//! `core/types/cache.rs` `TypeCache::get_or_build`.

use super::record::UniQos;
use dashmap::DashMap;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

fn record_hash(qos: &UniQos) -> u64 {
    let mut hasher = std::collections::hash_map::DefaultHasher::new();
    hash_uniqos(qos, &mut hasher);
    hasher.finish()
}

/// `UniQos` doesn't derive `Hash` directly (some nested policy types
/// only implement `PartialEq`), so the intern key hashes the `Debug`
/// rendering — cheap relative to the allocation it avoids, and stable
/// for any two `PartialEq`-equal records since `Debug` output is
/// derived from the same fields.
fn hash_uniqos(qos: &UniQos, hasher: &mut impl Hasher) {
    format!("{qos:?}").hash(hasher);
}

/// Stable identifier for an interned QoS record, usable as a cheap
/// equality/lookup key once interned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct QosId(u64);

#[derive(Default)]
pub struct QosInternPool {
    table: DashMap<u64, Vec<Arc<UniQos>>>,
}

impl QosInternPool {
    pub fn new() -> Self {
        Self {
            table: DashMap::new(),
        }
    }

    /// Return the canonical `Arc<UniQos>` equal to `qos`, inserting it
    /// if no equal record has been interned yet.
    pub fn intern(&self, qos: UniQos) -> (QosId, Arc<UniQos>) {
        let h = record_hash(&qos);
        if let Some(bucket) = self.table.get(&h) {
            if let Some(existing) = bucket.iter().find(|existing| ***existing == qos) {
                return (QosId(h), existing.clone());
            }
        }
        let arc = Arc::new(qos);
        let mut bucket = self.table.entry(h).or_default();
        // Re-check under the write lock: another thread may have
        // inserted an equal record between the read above and here.
        if let Some(existing) = bucket.iter().find(|existing| ***existing == *arc) {
            return (QosId(h), existing.clone());
        }
        bucket.push(arc.clone());
        (QosId(h), arc)
    }

    pub fn len(&self) -> usize {
        self.table.iter().map(|e| e.value().len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}
