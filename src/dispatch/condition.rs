// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! `Condition` trait and its four concrete forms: `GuardCondition`,
//! `StatusCondition`, `ReadCondition`, `QueryCondition`.
//!
//! Ported from the teacher's `dds/condition.rs` and
//! `dds/read_condition.rs`, generalized to the SampleState/ViewState/
//! InstanceState masks spec.md §4.9 calls for instead of the teacher's
//! fixed "any new data" trigger.

use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::Mutex;

use crate::core::Handle;
use crate::entity::StatusMask;
use crate::filter::ContentFilter;

/// Anything a `WaitSet` can block on.
pub trait Condition: Send + Sync {
    fn get_trigger_value(&self) -> bool;
}

/// User-toggled condition with no backing entity.
#[derive(Debug, Default)]
pub struct GuardCondition {
    trigger: AtomicBool,
}

impl GuardCondition {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_trigger_value(&self, value: bool) {
        self.trigger.store(value, Ordering::Release);
    }
}

impl Condition for GuardCondition {
    fn get_trigger_value(&self) -> bool {
        self.trigger.load(Ordering::Acquire)
    }
}

/// Triggers when any bit in `enabled_statuses` has changed on `entity`
/// since the last time that bit was cleared (spec.md §4.9).
pub struct StatusCondition {
    pub entity: Handle,
    enabled_statuses: Mutex<StatusMask>,
    changed: AtomicU32,
}

impl StatusCondition {
    pub fn new(entity: Handle) -> Self {
        Self {
            entity,
            enabled_statuses: Mutex::new(StatusMask::ALL),
            changed: AtomicU32::new(0),
        }
    }

    pub fn set_enabled_statuses(&self, mask: StatusMask) {
        *self.enabled_statuses.lock().unwrap() = mask;
    }

    pub fn enabled_statuses(&self) -> StatusMask {
        *self.enabled_statuses.lock().unwrap()
    }

    /// Record a status change, e.g. when the entity graph fires a
    /// `Notification` for this entity.
    pub fn notify(&self, bit: StatusMask) {
        self.changed.fetch_or(bit.bits(), Ordering::AcqRel);
    }

    /// Clear one status bit, typically after the application reads the
    /// corresponding `*Status` struct.
    pub fn clear(&self, bit: StatusMask) {
        self.changed.fetch_and(!bit.bits(), Ordering::AcqRel);
    }

    pub fn changed_statuses(&self) -> StatusMask {
        StatusMask::from_bits(self.changed.load(Ordering::Acquire))
    }
}

impl Condition for StatusCondition {
    fn get_trigger_value(&self) -> bool {
        self.changed_statuses().intersects(self.enabled_statuses())
    }
}

/// Sample/view/instance state bitmasks a `ReadCondition` filters on,
/// mirroring `cache::instance::{SampleState, ViewState, InstanceState}`
/// as OR-able masks instead of single enum values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DataStateMask {
    pub sample_states: u8,
    pub view_states: u8,
    pub instance_states: u8,
}

impl DataStateMask {
    pub const ANY_SAMPLE_STATE: u8 = 0b11;
    pub const ANY_VIEW_STATE: u8 = 0b11;
    pub const ANY_INSTANCE_STATE: u8 = 0b111;

    pub const fn any() -> Self {
        Self {
            sample_states: Self::ANY_SAMPLE_STATE,
            view_states: Self::ANY_VIEW_STATE,
            instance_states: Self::ANY_INSTANCE_STATE,
        }
    }
}

/// Triggers when its reader has data matching `mask`. The reader's
/// read/take path marks this dirty; `get_trigger_value` is the cheap
/// "might have matching data" check the caller still confirms with an
/// actual read (spec.md §4.9 Open Question: conservative dirty bit,
/// not exact per-mask tracking).
pub struct ReadCondition {
    pub reader: Handle,
    pub mask: DataStateMask,
    dirty: AtomicBool,
}

impl ReadCondition {
    pub fn new(reader: Handle, mask: DataStateMask) -> Self {
        Self { reader, mask, dirty: AtomicBool::new(false) }
    }

    pub fn mark_dirty(&self) {
        self.dirty.store(true, Ordering::Release);
    }

    pub fn clear_dirty(&self) {
        self.dirty.store(false, Ordering::Release);
    }
}

impl Condition for ReadCondition {
    fn get_trigger_value(&self) -> bool {
        self.dirty.load(Ordering::Acquire)
    }
}

/// `ReadCondition` narrowed by a content filter expression.
pub struct QueryCondition {
    pub base: ReadCondition,
    pub filter: ContentFilter,
}

impl QueryCondition {
    pub fn new(reader: Handle, mask: DataStateMask, filter: ContentFilter) -> Self {
        Self { base: ReadCondition::new(reader, mask), filter }
    }

    pub fn mark_dirty(&self) {
        self.base.mark_dirty();
    }
}

impl Condition for QueryCondition {
    fn get_trigger_value(&self) -> bool {
        self.base.get_trigger_value()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn guard_condition_toggles() {
        let g = GuardCondition::new();
        assert!(!g.get_trigger_value());
        g.set_trigger_value(true);
        assert!(g.get_trigger_value());
    }

    #[test]
    fn status_condition_triggers_only_on_enabled_bits() {
        let c = StatusCondition::new(Handle::invalid());
        c.set_enabled_statuses(StatusMask::DATA_AVAILABLE);
        c.notify(StatusMask::SAMPLE_LOST);
        assert!(!c.get_trigger_value());
        c.notify(StatusMask::DATA_AVAILABLE);
        assert!(c.get_trigger_value());
        c.clear(StatusMask::DATA_AVAILABLE);
        assert!(!c.get_trigger_value());
    }

    #[test]
    fn read_condition_triggers_when_marked_dirty() {
        let rc = ReadCondition::new(Handle::invalid(), DataStateMask::any());
        assert!(!rc.get_trigger_value());
        rc.mark_dirty();
        assert!(rc.get_trigger_value());
        rc.clear_dirty();
        assert!(!rc.get_trigger_value());
    }
}
