// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Publisher/Subscriber groups and Writer/Reader endpoints.

use std::sync::Arc;

use super::header::{EntityFlags, EntityHeader, EntityKind};
use super::participant::EntityId;
use super::status::{ReaderStatusCounters, StatusMask, WriterStatusCounters};
use crate::cache::HistoryCache;
use crate::core::{Handle, Locator};
use crate::qos::UniQos;

/// Publisher: a QoS-bearing grouping for DataWriters. Holds the
/// `suspended` queue spec.md §4.7 requires — writers created, or QoS
/// changes made, while the publisher is suspended are held here and
/// only announced to discovery on `resume_publications`.
pub struct Publisher {
    pub header: EntityHeader,
    pub participant: Handle,
    pub qos: Arc<UniQos>,
    pub writers: Vec<Handle>,
    /// Writers awaiting announcement, queued by `suspend_publications`.
    pub suspended_writers: Vec<Handle>,
}

impl Publisher {
    pub fn new(handle: Handle, participant: Handle, qos: Arc<UniQos>) -> Self {
        Self {
            header: EntityHeader::new(EntityKind::Publisher, handle, EntityFlags::new_local()),
            participant,
            qos,
            writers: Vec::new(),
            suspended_writers: Vec::new(),
        }
    }

    pub fn is_suspended(&self) -> bool {
        self.header.flags.suspended
    }

    pub fn suspend(&mut self) {
        self.header.flags.suspended = true;
    }

    /// Release the queued writers for discovery announcement and clear
    /// the suspended flag. Returns the handles the caller must now
    /// announce.
    pub fn resume(&mut self) -> Vec<Handle> {
        self.header.flags.suspended = false;
        std::mem::take(&mut self.suspended_writers)
    }
}

/// Subscriber: a QoS-bearing grouping for DataReaders.
pub struct Subscriber {
    pub header: EntityHeader,
    pub participant: Handle,
    pub qos: Arc<UniQos>,
    pub readers: Vec<Handle>,
}

impl Subscriber {
    pub fn new(handle: Handle, participant: Handle, qos: Arc<UniQos>) -> Self {
        Self {
            header: EntityHeader::new(EntityKind::Subscriber, handle, EntityFlags::new_local()),
            participant,
            qos,
            readers: Vec::new(),
        }
    }
}

/// Fields shared by `Writer` and `Reader` (spec.md §3's `Endpoint`
/// base): identity, topic binding, QoS, and locators.
pub struct EndpointBase {
    pub header: EntityHeader,
    pub participant: Handle,
    pub entity_id: EntityId,
    pub topic: Handle,
    pub qos: Arc<UniQos>,
    pub unicast_locators: Vec<Locator>,
    pub multicast_locators: Vec<Locator>,
}

/// DataWriter endpoint.
pub struct Writer {
    pub base: EndpointBase,
    pub publisher: Handle,
    pub cache: HistoryCache,
    pub mask: StatusMask,
    pub status_counters: WriterStatusCounters,
}

impl Writer {
    pub fn new(
        handle: Handle,
        participant: Handle,
        publisher: Handle,
        entity_id: EntityId,
        topic: Handle,
        qos: Arc<UniQos>,
        local: bool,
    ) -> Self {
        let history_kind = qos.history;
        let limits = qos.resource_limits;
        let flags = if local {
            EntityFlags::new_local()
        } else {
            EntityFlags::new_remote()
        };
        Self {
            base: EndpointBase {
                header: EntityHeader::new(EntityKind::Writer, handle, flags),
                participant,
                entity_id,
                topic,
                qos,
                unicast_locators: Vec::new(),
                multicast_locators: Vec::new(),
            },
            publisher,
            cache: HistoryCache::new(history_kind, limits),
            mask: StatusMask::NONE,
            status_counters: WriterStatusCounters::default(),
        }
    }
}

/// DataReader endpoint.
pub struct Reader {
    pub base: EndpointBase,
    pub subscriber: Handle,
    pub cache: HistoryCache,
    pub mask: StatusMask,
    pub status_counters: ReaderStatusCounters,
    /// Conditions (`ReadCondition`/`QueryCondition`) attached to this
    /// reader; owned by `dispatch`, tracked here only by handle so the
    /// entity graph can tear them down when the reader is deleted.
    pub conditions: Vec<Handle>,
}

impl Reader {
    pub fn new(
        handle: Handle,
        participant: Handle,
        subscriber: Handle,
        entity_id: EntityId,
        topic: Handle,
        qos: Arc<UniQos>,
        local: bool,
    ) -> Self {
        let history_kind = qos.history;
        let limits = qos.resource_limits;
        let flags = if local {
            EntityFlags::new_local()
        } else {
            EntityFlags::new_remote()
        };
        Self {
            base: EndpointBase {
                header: EntityHeader::new(EntityKind::Reader, handle, flags),
                participant,
                entity_id,
                topic,
                qos,
                unicast_locators: Vec::new(),
                multicast_locators: Vec::new(),
            },
            subscriber,
            cache: HistoryCache::new(history_kind, limits),
            mask: StatusMask::NONE,
            status_counters: ReaderStatusCounters::default(),
            conditions: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn suspended_publisher_queues_writers_until_resume() {
        let mut pub_ = Publisher::new(Handle::invalid(), Handle::invalid(), Arc::new(UniQos::best_effort()));
        pub_.suspend();
        assert!(pub_.is_suspended());
        pub_.suspended_writers.push(Handle::invalid());
        let released = pub_.resume();
        assert_eq!(released.len(), 1);
        assert!(!pub_.is_suspended());
        assert!(pub_.suspended_writers.is_empty());
    }
}
