// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Forwarding table: GUID-prefix-keyed locator routing entries with
//! TTL aging, for relaying RTPS traffic between participants that
//! cannot reach each other directly (spec.md §4.10).
//!
//! Grounded on the teacher's `DashMap`-keyed reader-proxy registry
//! pattern (`core::handle::HandleTable` uses the same concurrent-map
//! shape) and the `Clock` trait (`core::clock`), used here in place of
//! a real timer thread so aging is deterministically testable with
//! `ManualClock`.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use dashmap::DashMap;

use crate::core::{Clock, LocatorList};

/// Default lifetime of a forwarding entry absent a refresh, and the
/// tick interval at which `age_tick` is expected to be called.
pub const DEFAULT_ENTRY_TTL: Duration = Duration::from_secs(200);
pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, Default)]
pub struct FTEntryFlags {
    pub linked: bool,
    pub info_reply: bool,
}

/// One route: where to forward traffic destined for `guid_prefix`, and
/// who else is downstream of this entry (its `children`).
pub struct FTEntry {
    pub guid_prefix: [u8; 12],
    pub flags: FTEntryFlags,
    pub local_hops: u8,
    pub dest_locators: LocatorList,
    pub reply_locators: LocatorList,
    pub parent: Option<[u8; 12]>,
    expires_at_nanos: AtomicU64,
    children: Mutex<Vec<[u8; 12]>>,
}

impl FTEntry {
    fn new(guid_prefix: [u8; 12], parent: Option<[u8; 12]>, expires_at: Duration) -> Self {
        Self {
            guid_prefix,
            flags: FTEntryFlags::default(),
            local_hops: 0,
            dest_locators: LocatorList::default(),
            reply_locators: LocatorList::default(),
            parent,
            expires_at_nanos: AtomicU64::new(expires_at.as_nanos() as u64),
            children: Mutex::new(Vec::new()),
        }
    }

    fn is_expired(&self, now: Duration) -> bool {
        now.as_nanos() as u64 > self.expires_at_nanos.load(Ordering::Acquire)
    }

    fn refresh(&self, expires_at: Duration) {
        self.expires_at_nanos.store(expires_at.as_nanos() as u64, Ordering::Release);
    }

    pub fn children(&self) -> Vec<[u8; 12]> {
        self.children.lock().unwrap().clone()
    }
}

/// Concurrent table of [`FTEntry`], keyed by the GUID prefix of the
/// participant it routes to.
#[derive(Default)]
pub struct ForwardingTable {
    entries: DashMap<[u8; 12], std::sync::Arc<FTEntry>>,
}

impl ForwardingTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lookup(&self, guid_prefix: &[u8; 12]) -> Option<std::sync::Arc<FTEntry>> {
        self.entries.get(guid_prefix).map(|e| e.clone())
    }

    /// Insert or refresh the entry for `guid_prefix`, resetting its
    /// TTL to `now + ttl`. If `parent` is `Some`, this entry is linked
    /// as a child of the parent entry so that aging the parent out
    /// cascades to it.
    pub fn add(&self, guid_prefix: [u8; 12], parent: Option<[u8; 12]>, clock: &dyn Clock, ttl: Duration) {
        let expires_at = clock.now() + ttl;
        match self.entries.get(&guid_prefix) {
            Some(entry) => entry.refresh(expires_at),
            None => {
                let entry = std::sync::Arc::new(FTEntry::new(guid_prefix, parent, expires_at));
                self.entries.insert(guid_prefix, entry);
            }
        }
        if let Some(parent_prefix) = parent {
            if let Some(parent_entry) = self.entries.get(&parent_prefix) {
                let mut children = parent_entry.children.lock().unwrap();
                if !children.contains(&guid_prefix) {
                    children.push(guid_prefix);
                }
            }
        }
    }

    pub fn remove(&self, guid_prefix: &[u8; 12]) -> Option<std::sync::Arc<FTEntry>> {
        self.entries.remove(guid_prefix).map(|(_, v)| v)
    }

    /// Drop every entry expired as of `clock.now()`, cascading removal
    /// to each expired entry's children so a dead relay does not leave
    /// stranded downstream routes.
    pub fn age_tick(&self, clock: &dyn Clock) {
        let now = clock.now();
        let expired: Vec<[u8; 12]> = self
            .entries
            .iter()
            .filter(|e| e.is_expired(now))
            .map(|e| *e.key())
            .collect();
        let mut to_remove = expired;
        while let Some(prefix) = to_remove.pop() {
            if let Some((_, entry)) = self.entries.remove(&prefix) {
                to_remove.extend(entry.children());
            }
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ManualClock;

    fn prefix(byte: u8) -> [u8; 12] {
        let mut p = [0u8; 12];
        p[0] = byte;
        p
    }

    #[test]
    fn add_then_lookup_finds_entry() {
        let table = ForwardingTable::new();
        let clock = ManualClock::default();
        table.add(prefix(1), None, &clock, DEFAULT_ENTRY_TTL);
        assert!(table.lookup(&prefix(1)).is_some());
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn age_tick_removes_expired_entry() {
        let table = ForwardingTable::new();
        let clock = ManualClock::default();
        table.add(prefix(1), None, &clock, Duration::from_secs(10));
        clock.advance(Duration::from_secs(11));
        table.age_tick(&clock);
        assert!(table.is_empty());
    }

    #[test]
    fn age_tick_keeps_refreshed_entry_alive() {
        let table = ForwardingTable::new();
        let clock = ManualClock::default();
        table.add(prefix(1), None, &clock, Duration::from_secs(10));
        clock.advance(Duration::from_secs(8));
        table.add(prefix(1), None, &clock, Duration::from_secs(10));
        clock.advance(Duration::from_secs(8));
        table.age_tick(&clock);
        assert!(table.lookup(&prefix(1)).is_some());
    }

    #[test]
    fn expiring_parent_cascades_to_children() {
        let table = ForwardingTable::new();
        let clock = ManualClock::default();
        table.add(prefix(1), None, &clock, Duration::from_secs(10));
        table.add(prefix(2), Some(prefix(1)), &clock, Duration::from_secs(10));
        assert_eq!(table.len(), 2);
        clock.advance(Duration::from_secs(11));
        table.age_tick(&clock);
        assert!(table.is_empty());
    }

    #[test]
    fn remove_drops_entry_without_touching_children() {
        let table = ForwardingTable::new();
        let clock = ManualClock::default();
        table.add(prefix(1), None, &clock, DEFAULT_ENTRY_TTL);
        table.add(prefix(2), Some(prefix(1)), &clock, DEFAULT_ENTRY_TTL);
        table.remove(&prefix(1));
        assert_eq!(table.len(), 1);
        assert!(table.lookup(&prefix(2)).is_some());
    }
}
