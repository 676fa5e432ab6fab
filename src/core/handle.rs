// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Entity handle table.
//!
//! Every DCPS entity (participant, topic, publisher, subscriber, writer,
//! reader) is addressed by an opaque [`Handle`] rather than a raw
//! pointer or index, so the entity graph (`crate::entity`) can move,
//! replace, or drop entities without invalidating handles held by
//! application code. A handle that outlives its entity simply looks up
//! as absent rather than dangling.
//!
//! Concurrency pattern mirrors the teacher crate's `DashMap`-keyed
//! registries (e.g. its reader-proxy table): a concurrent map keyed by
//! slot index, with a generation counter to detect stale handles after
//! slot reuse.

use dashmap::DashMap;
use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};

/// Opaque reference to an entity stored in a [`HandleTable`].
///
/// `index` selects the slot; `generation` detects reuse. Two handles
/// with the same `index` but different `generation` refer to different
/// (successive) entities that happened to reuse a slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Handle {
    index: u32,
    generation: u32,
}

impl Handle {
    pub const fn index(&self) -> u32 {
        self.index
    }

    pub const fn generation(&self) -> u32 {
        self.generation
    }

    /// A handle value that never compares equal to an allocated handle.
    pub const fn invalid() -> Self {
        Self {
            index: u32::MAX,
            generation: u32::MAX,
        }
    }

    pub const fn is_invalid(&self) -> bool {
        self.index == u32::MAX && self.generation == u32::MAX
    }
}

impl Default for Handle {
    fn default() -> Self {
        Self::invalid()
    }
}

/// Thread-safe handle -> entity table with generation-checked reuse.
///
/// `T` is typically a small, cheaply cloneable value (an `Arc<Entity>`
/// or similar); the table does not itself provide locking beyond what
/// `DashMap` gives per-shard.
pub struct HandleTable<T> {
    slots: DashMap<u32, Slot<T>>,
    next_index: AtomicU32,
    free_list: crossbeam::queue::SegQueue<u32>,
    generation_seq: AtomicU64,
}

struct Slot<T> {
    generation: u32,
    value: T,
}

impl<T> Default for HandleTable<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> HandleTable<T> {
    pub fn new() -> Self {
        Self {
            slots: DashMap::new(),
            next_index: AtomicU32::new(0),
            free_list: crossbeam::queue::SegQueue::new(),
            generation_seq: AtomicU64::new(1),
        }
    }

    fn next_generation(&self) -> u32 {
        // Wrapping is fine: a full u32 wrap before a slot is reused again
        // would require ~4 billion allocations on that exact slot.
        (self.generation_seq.fetch_add(1, Ordering::Relaxed) & u64::from(u32::MAX)) as u32
    }

    /// Allocate a new handle bound to `value`.
    pub fn insert(&self, value: T) -> Handle {
        let index = self
            .free_list
            .pop()
            .unwrap_or_else(|| self.next_index.fetch_add(1, Ordering::Relaxed));
        let generation = self.next_generation();
        self.slots.insert(index, Slot { generation, value });
        Handle { index, generation }
    }

    /// Look up the entity bound to `handle`, if it is still live.
    pub fn get(&self, handle: Handle) -> Option<dashmap::mapref::one::Ref<'_, u32, Slot<T>>> {
        let slot = self.slots.get(&handle.index)?;
        if slot.generation == handle.generation {
            Some(slot)
        } else {
            None
        }
    }

    /// Fetch a clone of the value bound to `handle`, if still live.
    pub fn get_cloned(&self, handle: Handle) -> Option<T>
    where
        T: Clone,
    {
        let slot = self.slots.get(&handle.index)?;
        if slot.generation == handle.generation {
            Some(slot.value.clone())
        } else {
            None
        }
    }

    /// Remove the entity bound to `handle`, returning its value if the
    /// handle was still live. The slot is recycled for future `insert`
    /// calls under a new generation.
    pub fn remove(&self, handle: Handle) -> Option<T> {
        let (_, slot) = self.slots.remove_if(&handle.index, |_, slot| {
            slot.generation == handle.generation
        })?;
        self.free_list.push(handle.index);
        Some(slot.value)
    }

    pub fn contains(&self, handle: Handle) -> bool {
        self.slots
            .get(&handle.index)
            .is_some_and(|slot| slot.generation == handle.generation)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

impl<T> Slot<T> {
    pub fn value(&self) -> &T {
        &self.value
    }
}

impl<T> std::ops::Deref for Slot<T> {
    type Target = T;
    fn deref(&self) -> &T {
        &self.value
    }
}
