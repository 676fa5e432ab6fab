// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Listener registration and ancestor-propagating dispatch, ported
//! from the teacher's `dds/listener.rs`.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use super::notification::NotificationKind;
use crate::core::Handle;
use crate::entity::StatusMask;

/// Callback invoked when a matching status change fires on an entity
/// this listener is installed on (or a descendant, per propagation).
pub trait Listener: Send + Sync {
    fn on_notification(&self, entity: Handle, kind: NotificationKind);
}

struct Registration {
    listener: Arc<dyn Listener>,
    mask: StatusMask,
    /// The entity to walk up to next (Writer/Reader -> Publisher/
    /// Subscriber -> Participant) if this registration's mask doesn't
    /// cover the fired status, per spec.md §4.9 step 2.
    parent: Option<Handle>,
}

/// Per-domain table of installed listeners, keyed by the entity they
/// were installed on.
#[derive(Default)]
pub struct ListenerRegistry {
    registrations: Mutex<HashMap<Handle, Registration>>,
}

impl ListenerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn install(&self, entity: Handle, listener: Arc<dyn Listener>, mask: StatusMask, parent: Option<Handle>) {
        self.registrations.lock().unwrap().insert(entity, Registration { listener, mask, parent });
    }

    pub fn remove(&self, entity: Handle) {
        self.registrations.lock().unwrap().remove(&entity);
    }

    /// Walk `entity`, then its registered parent chain, invoking the
    /// first listener whose enabled mask covers `kind`. Mirrors
    /// "narrowest scope to widest" listener inheritance (DDS v1.4
    /// Sec.2.1.4.3).
    pub fn dispatch(&self, entity: Handle, kind: NotificationKind) {
        let registrations = self.registrations.lock().unwrap();
        let bit = kind.mask_bit();
        let mut current = Some(entity);
        while let Some(handle) = current {
            if let Some(registration) = registrations.get(&handle) {
                if registration.mask.intersects(bit) {
                    registration.listener.on_notification(entity, kind);
                    return;
                }
                current = registration.parent;
            } else {
                current = None;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingListener(Arc<AtomicUsize>);
    impl Listener for CountingListener {
        fn on_notification(&self, _entity: Handle, _kind: NotificationKind) {
            self.0.fetch_add(1, Ordering::Relaxed);
        }
    }

    #[test]
    fn dispatch_invokes_listener_on_matching_entity() {
        let registry = ListenerRegistry::new();
        let count = Arc::new(AtomicUsize::new(0));
        let writer = Handle::invalid();
        registry.install(writer, Arc::new(CountingListener(count.clone())), StatusMask::PUBLICATION_MATCHED, None);
        registry.dispatch(writer, NotificationKind::PublicationMatched);
        assert_eq!(count.load(Ordering::Relaxed), 1);
    }

    #[test]
    fn dispatch_falls_back_to_parent_when_mask_does_not_cover() {
        let registry = ListenerRegistry::new();
        let count = Arc::new(AtomicUsize::new(0));
        let table: crate::core::HandleTable<()> = crate::core::HandleTable::new();
        let writer = table.insert(());
        let publisher = table.insert(());
        registry.install(writer, Arc::new(CountingListener(Arc::new(AtomicUsize::new(0)))), StatusMask::NONE, Some(publisher));
        registry.install(publisher, Arc::new(CountingListener(count.clone())), StatusMask::PUBLICATION_MATCHED, None);
        registry.dispatch(writer, NotificationKind::PublicationMatched);
        assert_eq!(count.load(Ordering::Relaxed), 1);
    }

    #[test]
    fn dispatch_is_noop_when_nothing_installed() {
        let registry = ListenerRegistry::new();
        registry.dispatch(Handle::invalid(), NotificationKind::SampleLost);
    }
}
