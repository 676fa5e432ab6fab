// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! The DCPS entity graph: one [`Domain`] owns every participant, topic,
//! publisher, subscriber, writer, and reader in a domain, and drives
//! their create/enable/delete lifecycle and QoS-compatibility matching
//! (spec.md §4.7, §4.8).
//!
//! Entities are addressed by [`crate::core::Handle`] and stored behind
//! `Mutex<EntityObject>` in one `HandleTable`, rather than as a struct
//! of typed tables per kind: a single table keeps handle allocation
//! uniform across kinds (ported from the teacher's pattern of keying
//! every registry off one handle space) while `EntityObject` recovers
//! the concrete type at each call site.
//!
//! Locking follows the fixed partial order domain -> participant ->
//! topic -> publisher/subscriber -> endpoint, matching the teacher's
//! lock-ordering convention for its per-entity `Mutex`es: a method that
//! needs two entities always locks the one earlier in this list first.

pub mod endpoint;
pub mod header;
pub mod participant;
pub mod status;
pub mod topic;

pub use endpoint::{EndpointBase, Publisher, Reader, Subscriber, Writer};
pub use header::{EntityFlags, EntityHeader, EntityKind};
pub use participant::{EntityId, GuidPrefix, Participant};
pub use status::{ReaderStatusCounters, StatusMask, WriterStatusCounters};
pub use topic::{FilterData, Topic};

use std::collections::{BTreeMap, VecDeque};
use std::sync::{Arc, Mutex};

use crate::core::{Handle, HandleTable};
use crate::discovery::{DiscoveredParticipantData, DiscoveredReaderData, DiscoveredWriterData};
use crate::error::{ReturnCode, Result};
use crate::qos::{match_qos, EntityFactory, QosInternPool, UniQos};

/// The six kinds of live entity stored in one [`Domain`]'s handle table.
pub enum EntityObject {
    Participant(Participant),
    Topic(Topic),
    Publisher(Publisher),
    Subscriber(Subscriber),
    Writer(Writer),
    Reader(Reader),
}

impl EntityObject {
    pub fn kind(&self) -> EntityKind {
        match self {
            EntityObject::Participant(_) => EntityKind::Participant,
            EntityObject::Topic(_) => EntityKind::Topic,
            EntityObject::Publisher(_) => EntityKind::Publisher,
            EntityObject::Subscriber(_) => EntityKind::Subscriber,
            EntityObject::Writer(_) => EntityKind::Writer,
            EntityObject::Reader(_) => EntityKind::Reader,
        }
    }

    fn header_mut(&mut self) -> &mut EntityHeader {
        match self {
            EntityObject::Participant(e) => &mut e.header,
            EntityObject::Topic(e) => &mut e.header,
            EntityObject::Publisher(e) => &mut e.header,
            EntityObject::Subscriber(e) => &mut e.header,
            EntityObject::Writer(e) => &mut e.base.header,
            EntityObject::Reader(e) => &mut e.base.header,
        }
    }

    pub fn is_enabled(&self) -> bool {
        match self {
            EntityObject::Participant(e) => e.header.flags.enabled,
            EntityObject::Topic(e) => e.header.flags.enabled,
            EntityObject::Publisher(e) => e.header.flags.enabled,
            EntityObject::Subscriber(e) => e.header.flags.enabled,
            EntityObject::Writer(e) => e.base.header.flags.enabled,
            EntityObject::Reader(e) => e.base.header.flags.enabled,
        }
    }

    fn as_participant(&self) -> Option<&Participant> {
        match self {
            EntityObject::Participant(p) => Some(p),
            _ => None,
        }
    }

    fn as_participant_mut(&mut self) -> Option<&mut Participant> {
        match self {
            EntityObject::Participant(p) => Some(p),
            _ => None,
        }
    }

    fn as_topic_mut(&mut self) -> Option<&mut Topic> {
        match self {
            EntityObject::Topic(t) => Some(t),
            _ => None,
        }
    }

    fn as_publisher_mut(&mut self) -> Option<&mut Publisher> {
        match self {
            EntityObject::Publisher(p) => Some(p),
            _ => None,
        }
    }

    fn as_subscriber_mut(&mut self) -> Option<&mut Subscriber> {
        match self {
            EntityObject::Subscriber(s) => Some(s),
            _ => None,
        }
    }

    fn as_writer(&self) -> Option<&Writer> {
        match self {
            EntityObject::Writer(w) => Some(w),
            _ => None,
        }
    }

    fn as_writer_mut(&mut self) -> Option<&mut Writer> {
        match self {
            EntityObject::Writer(w) => Some(w),
            _ => None,
        }
    }

    fn as_reader(&self) -> Option<&Reader> {
        match self {
            EntityObject::Reader(r) => Some(r),
            _ => None,
        }
    }

    fn as_reader_mut(&mut self) -> Option<&mut Reader> {
        match self {
            EntityObject::Reader(r) => Some(r),
            _ => None,
        }
    }
}

/// One domain's full set of DCPS entities plus the bookkeeping needed
/// to create, enable, delete, and match them.
pub struct Domain {
    pub domain_id: u32,
    handles: HandleTable<Mutex<EntityObject>>,
    qos_pool: QosInternPool,
    lock: Mutex<()>,
    participants: Mutex<Vec<Handle>>,
    /// Domain-wide topic name -> handle, enforcing the one-name-one-type
    /// invariant across every participant (spec.md §4.7).
    topics_by_name: Mutex<BTreeMap<Arc<str>, Handle>>,
    /// Symmetric writer<->reader match sets, keyed by either side.
    matches: Mutex<BTreeMap<Handle, Vec<Handle>>>,
    /// Status bits raised since the last drain, for `dispatch` to turn
    /// into `Notification`s and feed to listeners/waitsets.
    status_events: Mutex<VecDeque<(Handle, StatusMask)>>,
}

impl Domain {
    pub fn new(domain_id: u32) -> Self {
        Self {
            domain_id,
            handles: HandleTable::new(),
            qos_pool: QosInternPool::new(),
            lock: Mutex::new(()),
            participants: Mutex::new(Vec::new()),
            topics_by_name: Mutex::new(BTreeMap::new()),
            matches: Mutex::new(BTreeMap::new()),
            status_events: Mutex::new(VecDeque::new()),
        }
    }

    fn raise(&self, entity: Handle, bit: StatusMask) {
        self.status_events.lock().unwrap().push_back((entity, bit));
    }

    /// Drain every status event raised since the last call, for the
    /// caller to hand to a `dispatch::NotificationQueue`/
    /// `dispatch::ListenerRegistry`.
    pub fn drain_status_events(&self) -> Vec<(Handle, StatusMask)> {
        self.status_events.lock().unwrap().drain(..).collect()
    }

    pub fn intern_qos(&self, qos: UniQos) -> Arc<UniQos> {
        self.qos_pool.intern(qos).1
    }

    fn enable(&self, handle: Handle) -> Result<()> {
        let slot = self.handles.get(handle).ok_or(ReturnCode::AlreadyDeleted)?;
        slot.lock().unwrap().header_mut().flags.enabled = true;
        Ok(())
    }

    pub fn is_enabled(&self, handle: Handle) -> Result<bool> {
        let slot = self.handles.get(handle).ok_or(ReturnCode::AlreadyDeleted)?;
        Ok(slot.lock().unwrap().is_enabled())
    }

    // -- Participant ----------------------------------------------------

    pub fn create_participant(
        &self,
        guid_prefix: GuidPrefix,
        domain_id: u32,
        local: bool,
        entity_factory: EntityFactory,
    ) -> Handle {
        let _guard = self.lock.lock().unwrap();
        let auto_enable = entity_factory.autoenable_created_entities();
        let handle = self
            .handles
            .insert(Mutex::new(EntityObject::Participant(Participant::new(
                Handle::invalid(),
                guid_prefix,
                domain_id,
                local,
                entity_factory,
            ))));
        self.participants.lock().unwrap().push(handle);
        if auto_enable || !local {
            let _ = self.enable(handle);
        }
        handle
    }

    pub fn enable_participant(&self, handle: Handle) -> Result<()> {
        self.enable(handle)
    }

    pub fn delete_participant(&self, handle: Handle) -> Result<()> {
        let _guard = self.lock.lock().unwrap();
        {
            let slot = self.handles.get(handle).ok_or(ReturnCode::AlreadyDeleted)?;
            let object = slot.lock().unwrap();
            let participant = object.as_participant().ok_or(ReturnCode::BadParameter)?;
            if participant.endpoint_count() > 0 {
                return Err(ReturnCode::PreconditionNotMet);
            }
        }
        self.handles.remove(handle).ok_or(ReturnCode::AlreadyDeleted)?;
        self.participants.lock().unwrap().retain(|h| *h != handle);
        Ok(())
    }

    // -- Topic ------------------------------------------------------------

    /// Create (or, for remote discovery, reuse) the topic named `name`.
    /// A local create against an existing, differently-typed topic is
    /// rejected outright; a remote discovery of the same mismatch marks
    /// the existing topic `InconsistentTopic` and keeps using it
    /// (spec.md §4.7: discovery never hard-fails on type mismatch).
    pub fn create_topic(&self, name: Arc<str>, type_name: Arc<str>, qos: UniQos, local: bool) -> Result<Handle> {
        let _guard = self.lock.lock().unwrap();
        let qos = self.intern_qos(qos);
        let mut topics_by_name = self.topics_by_name.lock().unwrap();
        if let Some(existing) = topics_by_name.get(&name).copied() {
            let slot = self.handles.get(existing).ok_or(ReturnCode::AlreadyDeleted)?;
            let mut object = slot.lock().unwrap();
            let topic = object.as_topic_mut().ok_or(ReturnCode::BadParameter)?;
            if topic.type_name.as_ref() != type_name.as_ref() {
                if local {
                    return Err(ReturnCode::PreconditionNotMet);
                }
                topic.note_inconsistent();
            }
            if local {
                topic.local_ref_count += 1;
            } else {
                topic.remote_ref_count += 1;
            }
            return Ok(existing);
        }
        drop(topics_by_name);
        let mut topic = Topic::new(Handle::invalid(), name.clone(), type_name, qos, local);
        if local {
            topic.local_ref_count = 1;
        } else {
            topic.remote_ref_count = 1;
        }
        let handle = self.handles.insert(Mutex::new(EntityObject::Topic(topic)));
        if !local {
            let _ = self.enable(handle);
        }
        self.topics_by_name.lock().unwrap().insert(name, handle);
        Ok(handle)
    }

    pub fn enable_topic(&self, handle: Handle) -> Result<()> {
        self.enable(handle)
    }

    pub fn delete_topic(&self, handle: Handle) -> Result<()> {
        let _guard = self.lock.lock().unwrap();
        let name = {
            let slot = self.handles.get(handle).ok_or(ReturnCode::AlreadyDeleted)?;
            let mut object = slot.lock().unwrap();
            let topic = object.as_topic_mut().ok_or(ReturnCode::BadParameter)?;
            if topic.is_reachable() && (!topic.readers.is_empty() || !topic.writers.is_empty()) {
                return Err(ReturnCode::PreconditionNotMet);
            }
            topic.name.clone()
        };
        self.handles.remove(handle);
        self.topics_by_name.lock().unwrap().remove(&name);
        Ok(())
    }

    // -- Publisher / Subscriber --------------------------------------------

    pub fn create_publisher(&self, participant: Handle, qos: UniQos) -> Result<Handle> {
        let _guard = self.lock.lock().unwrap();
        let qos = self.intern_qos(qos);
        let auto_enable = self.participant_auto_enable(participant)?;
        let handle = self
            .handles
            .insert(Mutex::new(EntityObject::Publisher(Publisher::new(Handle::invalid(), participant, qos))));
        if auto_enable {
            let _ = self.enable(handle);
        }
        Ok(handle)
    }

    pub fn create_subscriber(&self, participant: Handle, qos: UniQos) -> Result<Handle> {
        let _guard = self.lock.lock().unwrap();
        let qos = self.intern_qos(qos);
        let auto_enable = self.participant_auto_enable(participant)?;
        let handle = self
            .handles
            .insert(Mutex::new(EntityObject::Subscriber(Subscriber::new(Handle::invalid(), participant, qos))));
        if auto_enable {
            let _ = self.enable(handle);
        }
        Ok(handle)
    }

    fn participant_auto_enable(&self, participant: Handle) -> Result<bool> {
        let slot = self.handles.get(participant).ok_or(ReturnCode::AlreadyDeleted)?;
        let object = slot.lock().unwrap();
        let p = object.as_participant().ok_or(ReturnCode::BadParameter)?;
        Ok(p.autoenable_created_entities())
    }

    pub fn enable_publisher(&self, handle: Handle) -> Result<()> {
        self.enable(handle)
    }

    pub fn enable_subscriber(&self, handle: Handle) -> Result<()> {
        self.enable(handle)
    }

    pub fn delete_publisher(&self, handle: Handle) -> Result<()> {
        let _guard = self.lock.lock().unwrap();
        {
            let slot = self.handles.get(handle).ok_or(ReturnCode::AlreadyDeleted)?;
            let object = slot.lock().unwrap();
            let publisher = match &*object {
                EntityObject::Publisher(p) => p,
                _ => return Err(ReturnCode::BadParameter),
            };
            if !publisher.writers.is_empty() {
                return Err(ReturnCode::PreconditionNotMet);
            }
        }
        self.handles.remove(handle);
        Ok(())
    }

    pub fn delete_subscriber(&self, handle: Handle) -> Result<()> {
        let _guard = self.lock.lock().unwrap();
        {
            let slot = self.handles.get(handle).ok_or(ReturnCode::AlreadyDeleted)?;
            let object = slot.lock().unwrap();
            let subscriber = match &*object {
                EntityObject::Subscriber(s) => s,
                _ => return Err(ReturnCode::BadParameter),
            };
            if !subscriber.readers.is_empty() {
                return Err(ReturnCode::PreconditionNotMet);
            }
        }
        self.handles.remove(handle);
        Ok(())
    }

    /// Hold back announcement (matching) of writers created or enabled
    /// under `publisher` until `resume_publications` (spec.md §4.7).
    pub fn suspend_publications(&self, publisher: Handle) -> Result<()> {
        let slot = self.handles.get(publisher).ok_or(ReturnCode::AlreadyDeleted)?;
        let mut object = slot.lock().unwrap();
        let p = object.as_publisher_mut().ok_or(ReturnCode::BadParameter)?;
        p.suspend();
        Ok(())
    }

    pub fn resume_publications(&self, publisher: Handle) -> Result<()> {
        let released = {
            let slot = self.handles.get(publisher).ok_or(ReturnCode::AlreadyDeleted)?;
            let mut object = slot.lock().unwrap();
            let p = object.as_publisher_mut().ok_or(ReturnCode::BadParameter)?;
            p.resume()
        };
        for writer in released {
            self.match_writer(writer)?;
        }
        Ok(())
    }

    // -- Writer / Reader ----------------------------------------------------

    pub fn create_writer(&self, participant: Handle, publisher: Handle, topic: Handle, qos: UniQos, local: bool) -> Result<Handle> {
        let _guard = self.lock.lock().unwrap();
        let qos = self.intern_qos(qos);
        let entity_id = {
            let slot = self.handles.get(participant).ok_or(ReturnCode::AlreadyDeleted)?;
            let mut object = slot.lock().unwrap();
            let p = object.as_participant_mut().ok_or(ReturnCode::BadParameter)?;
            p.next_entity_id(0x02)
        };
        let auto_enable = self.participant_auto_enable(participant)?;
        let writer = Writer::new(Handle::invalid(), participant, publisher, entity_id, topic, qos, local);
        let handle = self.handles.insert(Mutex::new(EntityObject::Writer(writer)));

        {
            let slot = self.handles.get(participant).ok_or(ReturnCode::AlreadyDeleted)?;
            let mut object = slot.lock().unwrap();
            object.as_participant_mut().unwrap().insert_endpoint(entity_id, handle);
        }
        {
            let slot = self.handles.get(topic).ok_or(ReturnCode::AlreadyDeleted)?;
            let mut object = slot.lock().unwrap();
            object.as_topic_mut().ok_or(ReturnCode::BadParameter)?.writers.push(handle);
        }
        let suspended = {
            let slot = self.handles.get(publisher).ok_or(ReturnCode::AlreadyDeleted)?;
            let mut object = slot.lock().unwrap();
            let p = object.as_publisher_mut().ok_or(ReturnCode::BadParameter)?;
            p.writers.push(handle);
            if p.is_suspended() {
                p.suspended_writers.push(handle);
                true
            } else {
                false
            }
        };
        if auto_enable || !local {
            let _ = self.enable(handle);
            if !suspended {
                self.match_writer(handle)?;
            }
        }
        Ok(handle)
    }

    pub fn create_reader(&self, participant: Handle, subscriber: Handle, topic: Handle, qos: UniQos, local: bool) -> Result<Handle> {
        let _guard = self.lock.lock().unwrap();
        let qos = self.intern_qos(qos);
        let entity_id = {
            let slot = self.handles.get(participant).ok_or(ReturnCode::AlreadyDeleted)?;
            let mut object = slot.lock().unwrap();
            let p = object.as_participant_mut().ok_or(ReturnCode::BadParameter)?;
            p.next_entity_id(0x03)
        };
        let auto_enable = self.participant_auto_enable(participant)?;
        let reader = Reader::new(Handle::invalid(), participant, subscriber, entity_id, topic, qos, local);
        let handle = self.handles.insert(Mutex::new(EntityObject::Reader(reader)));

        {
            let slot = self.handles.get(participant).ok_or(ReturnCode::AlreadyDeleted)?;
            let mut object = slot.lock().unwrap();
            object.as_participant_mut().unwrap().insert_endpoint(entity_id, handle);
        }
        {
            let slot = self.handles.get(topic).ok_or(ReturnCode::AlreadyDeleted)?;
            let mut object = slot.lock().unwrap();
            object.as_topic_mut().ok_or(ReturnCode::BadParameter)?.readers.push(handle);
        }
        {
            let slot = self.handles.get(subscriber).ok_or(ReturnCode::AlreadyDeleted)?;
            let mut object = slot.lock().unwrap();
            object.as_subscriber_mut().ok_or(ReturnCode::BadParameter)?.readers.push(handle);
        }
        if auto_enable || !local {
            let _ = self.enable(handle);
            self.match_reader(handle)?;
        }
        Ok(handle)
    }

    pub fn enable_writer(&self, handle: Handle) -> Result<()> {
        self.enable(handle)?;
        self.match_writer(handle)
    }

    pub fn enable_reader(&self, handle: Handle) -> Result<()> {
        self.enable(handle)?;
        self.match_reader(handle)
    }

    pub fn delete_writer(&self, handle: Handle) -> Result<()> {
        let _guard = self.lock.lock().unwrap();
        let (participant, publisher, topic, entity_id) = {
            let slot = self.handles.get(handle).ok_or(ReturnCode::AlreadyDeleted)?;
            let object = slot.lock().unwrap();
            let w = object.as_writer().ok_or(ReturnCode::BadParameter)?;
            (w.base.participant, w.publisher, w.base.topic, w.base.entity_id)
        };
        self.unmatch_all(handle);
        self.handles.remove(handle);
        if let Some(slot) = self.handles.get(participant) {
            slot.lock().unwrap().as_participant_mut().unwrap().remove_endpoint(entity_id);
        }
        if let Some(slot) = self.handles.get(publisher) {
            slot.lock().unwrap().as_publisher_mut().unwrap().writers.retain(|h| *h != handle);
        }
        if let Some(slot) = self.handles.get(topic) {
            slot.lock().unwrap().as_topic_mut().unwrap().writers.retain(|h| *h != handle);
        }
        Ok(())
    }

    pub fn delete_reader(&self, handle: Handle) -> Result<()> {
        let _guard = self.lock.lock().unwrap();
        let (participant, subscriber, topic, entity_id) = {
            let slot = self.handles.get(handle).ok_or(ReturnCode::AlreadyDeleted)?;
            let object = slot.lock().unwrap();
            let r = object.as_reader().ok_or(ReturnCode::BadParameter)?;
            (r.base.participant, r.subscriber, r.base.topic, r.base.entity_id)
        };
        self.unmatch_all(handle);
        self.handles.remove(handle);
        if let Some(slot) = self.handles.get(participant) {
            slot.lock().unwrap().as_participant_mut().unwrap().remove_endpoint(entity_id);
        }
        if let Some(slot) = self.handles.get(subscriber) {
            slot.lock().unwrap().as_subscriber_mut().unwrap().readers.retain(|h| *h != handle);
        }
        if let Some(slot) = self.handles.get(topic) {
            slot.lock().unwrap().as_topic_mut().unwrap().readers.retain(|h| *h != handle);
        }
        Ok(())
    }

    fn unmatch_all(&self, handle: Handle) {
        let mut matches = self.matches.lock().unwrap();
        if let Some(peers) = matches.remove(&handle) {
            for peer in peers {
                if let Some(list) = matches.get_mut(&peer) {
                    list.retain(|h| *h != handle);
                }
            }
        }
    }

    fn match_writer(&self, writer: Handle) -> Result<()> {
        let topic = {
            let slot = self.handles.get(writer).ok_or(ReturnCode::AlreadyDeleted)?;
            let object = slot.lock().unwrap();
            object.as_writer().ok_or(ReturnCode::BadParameter)?.base.topic
        };
        let readers = {
            let slot = self.handles.get(topic).ok_or(ReturnCode::AlreadyDeleted)?;
            let object = slot.lock().unwrap();
            match &*object {
                EntityObject::Topic(t) => t.readers.clone(),
                _ => return Err(ReturnCode::BadParameter),
            }
        };
        for reader in readers {
            self.try_match(writer, reader)?;
        }
        Ok(())
    }

    fn match_reader(&self, reader: Handle) -> Result<()> {
        let topic = {
            let slot = self.handles.get(reader).ok_or(ReturnCode::AlreadyDeleted)?;
            let object = slot.lock().unwrap();
            object.as_reader().ok_or(ReturnCode::BadParameter)?.base.topic
        };
        let writers = {
            let slot = self.handles.get(topic).ok_or(ReturnCode::AlreadyDeleted)?;
            let object = slot.lock().unwrap();
            match &*object {
                EntityObject::Topic(t) => t.writers.clone(),
                _ => return Err(ReturnCode::BadParameter),
            }
        };
        for writer in writers {
            self.try_match(writer, reader)?;
        }
        Ok(())
    }

    /// Run RxO compatibility between one writer/reader pair and either
    /// record the match or raise the incompatible-QoS statuses
    /// (spec.md §4.7, §4.8).
    fn try_match(&self, writer: Handle, reader: Handle) -> Result<()> {
        if !self.is_enabled(writer).unwrap_or(false) || !self.is_enabled(reader).unwrap_or(false) {
            return Ok(());
        }
        let (offered, writer_publisher) = {
            let slot = self.handles.get(writer).ok_or(ReturnCode::AlreadyDeleted)?;
            let object = slot.lock().unwrap();
            let w = object.as_writer().ok_or(ReturnCode::BadParameter)?;
            (w.base.qos.clone(), w.publisher)
        };
        if let Some(slot) = self.handles.get(writer_publisher) {
            let object = slot.lock().unwrap();
            if let EntityObject::Publisher(p) = &*object {
                if p.is_suspended() {
                    return Ok(());
                }
            }
        }
        let requested = {
            let slot = self.handles.get(reader).ok_or(ReturnCode::AlreadyDeleted)?;
            let object = slot.lock().unwrap();
            object.as_reader().ok_or(ReturnCode::BadParameter)?.base.qos.clone()
        };
        let (compatible, _failed) = match_qos(&offered, &requested);
        if compatible {
            let mut matches = self.matches.lock().unwrap();
            matches.entry(writer).or_default().push(reader);
            matches.entry(reader).or_default().push(writer);
            drop(matches);
            self.bump_writer_counter(writer, |c| &c.publication_matched);
            self.bump_reader_counter(reader, |c| &c.subscription_matched);
            self.raise(writer, StatusMask::PUBLICATION_MATCHED);
            self.raise(reader, StatusMask::SUBSCRIPTION_MATCHED);
        } else {
            self.bump_writer_counter(writer, |c| &c.offered_incompatible_qos);
            self.bump_reader_counter(reader, |c| &c.requested_incompatible_qos);
            self.raise(writer, StatusMask::OFFERED_INCOMPATIBLE_QOS);
            self.raise(reader, StatusMask::REQUESTED_INCOMPATIBLE_QOS);
        }
        Ok(())
    }

    fn bump_writer_counter(&self, writer: Handle, field: impl Fn(&WriterStatusCounters) -> &std::sync::atomic::AtomicU32) {
        if let Some(slot) = self.handles.get(writer) {
            let object = slot.lock().unwrap();
            if let EntityObject::Writer(w) = &*object {
                WriterStatusCounters::bump(field(&w.status_counters));
            }
        }
    }

    fn bump_reader_counter(&self, reader: Handle, field: impl Fn(&ReaderStatusCounters) -> &std::sync::atomic::AtomicU32) {
        if let Some(slot) = self.handles.get(reader) {
            let object = slot.lock().unwrap();
            if let EntityObject::Reader(r) = &*object {
                ReaderStatusCounters::bump(field(&r.status_counters));
            }
        }
    }

    pub fn get_matched_subscriptions(&self, writer: Handle) -> Vec<Handle> {
        self.matches.lock().unwrap().get(&writer).cloned().unwrap_or_default()
    }

    pub fn get_matched_publications(&self, reader: Handle) -> Vec<Handle> {
        self.matches.lock().unwrap().get(&reader).cloned().unwrap_or_default()
    }

    // -- Discovery ----------------------------------------------------------

    /// Create or refresh the remote participant described by `data`,
    /// keyed by its GUID prefix (spec.md §4.4/§4.7).
    pub fn discover_participant(&self, data: &DiscoveredParticipantData) -> Handle {
        let _guard = self.lock.lock().unwrap();
        let participants = self.participants.lock().unwrap();
        for handle in participants.iter() {
            if let Some(slot) = self.handles.get(*handle) {
                let object = slot.lock().unwrap();
                if let EntityObject::Participant(p) = &*object {
                    if p.guid_prefix.0 == data.guid_prefix {
                        return *handle;
                    }
                }
            }
        }
        drop(participants);
        let handle = self.handles.insert(Mutex::new(EntityObject::Participant(Participant::new(
            Handle::invalid(),
            GuidPrefix(data.guid_prefix),
            data.domain_id,
            false,
            EntityFactory::auto_enable(),
        ))));
        {
            let slot = self.handles.get(handle).unwrap();
            let mut object = slot.lock().unwrap();
            if let EntityObject::Participant(p) = &mut *object {
                p.default_unicast_locators = data.default_unicast_locators.unicast().to_vec();
                p.metatraffic_unicast_locators = data.metatraffic_unicast_locators.unicast().to_vec();
            }
        }
        self.participants.lock().unwrap().push(handle);
        handle
    }

    fn discovered_qos(data_qos: &crate::discovery::DiscoveredQos) -> UniQos {
        UniQos {
            reliability: data_qos.reliability,
            durability: data_qos.durability,
            ..UniQos::default()
        }
    }

    pub fn discover_writer(&self, participant: Handle, data: &DiscoveredWriterData) -> Result<Handle> {
        let topic = self.create_topic(Arc::from(data.topic_name.as_str()), Arc::from(data.type_name.as_str()), UniQos::default(), false)?;
        let qos = Self::discovered_qos(&data.qos);
        // Remote writers arrive with no publisher grouping of their own;
        // host each in a fresh remote publisher scoped to its participant.
        let publisher = self.create_publisher(participant, UniQos::default())?;
        let handle = self.create_writer(participant, publisher, topic, qos, false)?;
        if let Some(slot) = self.handles.get(handle) {
            let mut object = slot.lock().unwrap();
            if let EntityObject::Writer(w) = &mut *object {
                w.base.unicast_locators = data.unicast_locators.clone();
            }
        }
        Ok(handle)
    }

    pub fn discover_reader(&self, participant: Handle, data: &DiscoveredReaderData) -> Result<Handle> {
        let topic = self.create_topic(Arc::from(data.topic_name.as_str()), Arc::from(data.type_name.as_str()), UniQos::default(), false)?;
        let qos = Self::discovered_qos(&data.qos);
        let subscriber = self.create_subscriber(participant, UniQos::default())?;
        let handle = self.create_reader(participant, subscriber, topic, qos, false)?;
        if let Some(slot) = self.handles.get(handle) {
            let mut object = slot.lock().unwrap();
            if let EntityObject::Reader(r) = &mut *object {
                r.base.unicast_locators = data.unicast_locators.clone();
            }
        }
        Ok(handle)
    }

    pub fn entity_count(&self) -> usize {
        self.handles.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::qos::UniQos;

    fn domain() -> Domain {
        Domain::new(0)
    }

    fn new_participant(domain: &Domain) -> Handle {
        domain.create_participant(GuidPrefix([1; 12]), 0, true, EntityFactory::auto_enable())
    }

    #[test]
    fn create_participant_auto_enables_by_default() {
        let d = domain();
        let p = new_participant(&d);
        assert!(d.is_enabled(p).unwrap());
    }

    #[test]
    fn delete_participant_with_live_endpoints_is_rejected() {
        let d = domain();
        let p = new_participant(&d);
        let topic = d.create_topic(Arc::from("t"), Arc::from("T"), UniQos::default(), true).unwrap();
        let publisher = d.create_publisher(p, UniQos::default()).unwrap();
        d.create_writer(p, publisher, topic, UniQos::best_effort(), true).unwrap();
        assert_eq!(d.delete_participant(p), Err(ReturnCode::PreconditionNotMet));
    }

    #[test]
    fn create_topic_with_mismatched_type_locally_is_rejected() {
        let d = domain();
        d.create_topic(Arc::from("t"), Arc::from("A"), UniQos::default(), true).unwrap();
        let err = d.create_topic(Arc::from("t"), Arc::from("B"), UniQos::default(), true);
        assert_eq!(err, Err(ReturnCode::PreconditionNotMet));
    }

    #[test]
    fn remote_topic_mismatch_marks_inconsistent_without_failing() {
        let d = domain();
        let local = d.create_topic(Arc::from("t"), Arc::from("A"), UniQos::default(), true).unwrap();
        let remote = d.create_topic(Arc::from("t"), Arc::from("B"), UniQos::default(), false).unwrap();
        assert_eq!(local, remote);
    }

    #[test]
    fn compatible_writer_reader_match_and_report_each_other() {
        let d = domain();
        let p = new_participant(&d);
        let topic = d.create_topic(Arc::from("t"), Arc::from("T"), UniQos::default(), true).unwrap();
        let publisher = d.create_publisher(p, UniQos::default()).unwrap();
        let subscriber = d.create_subscriber(p, UniQos::default()).unwrap();
        let writer = d.create_writer(p, publisher, topic, UniQos::best_effort(), true).unwrap();
        let reader = d.create_reader(p, subscriber, topic, UniQos::best_effort(), true).unwrap();
        assert_eq!(d.get_matched_subscriptions(writer), vec![reader]);
        assert_eq!(d.get_matched_publications(reader), vec![writer]);
        let events = d.drain_status_events();
        assert!(events.iter().any(|(h, bit)| *h == writer && *bit == StatusMask::PUBLICATION_MATCHED));
        assert!(events.iter().any(|(h, bit)| *h == reader && *bit == StatusMask::SUBSCRIPTION_MATCHED));
    }

    #[test]
    fn incompatible_reliability_reports_incompatible_qos_and_no_match() {
        let d = domain();
        let p = new_participant(&d);
        let topic = d.create_topic(Arc::from("t"), Arc::from("T"), UniQos::default(), true).unwrap();
        let publisher = d.create_publisher(p, UniQos::default()).unwrap();
        let subscriber = d.create_subscriber(p, UniQos::default()).unwrap();
        let writer = d.create_writer(p, publisher, topic, UniQos::best_effort(), true).unwrap();
        let reader = d.create_reader(p, subscriber, topic, UniQos::reliable(), true).unwrap();
        assert!(d.get_matched_subscriptions(writer).is_empty());
        assert!(d.get_matched_publications(reader).is_empty());
        let events = d.drain_status_events();
        assert!(events.iter().any(|(h, bit)| *h == writer && *bit == StatusMask::OFFERED_INCOMPATIBLE_QOS));
        assert!(events.iter().any(|(h, bit)| *h == reader && *bit == StatusMask::REQUESTED_INCOMPATIBLE_QOS));
    }

    #[test]
    fn suspended_publisher_defers_matching_until_resume() {
        let d = domain();
        let p = new_participant(&d);
        let topic = d.create_topic(Arc::from("t"), Arc::from("T"), UniQos::default(), true).unwrap();
        let publisher = d.create_publisher(p, UniQos::default()).unwrap();
        let subscriber = d.create_subscriber(p, UniQos::default()).unwrap();
        d.suspend_publications(publisher).unwrap();
        let writer = d.create_writer(p, publisher, topic, UniQos::best_effort(), true).unwrap();
        let reader = d.create_reader(p, subscriber, topic, UniQos::best_effort(), true).unwrap();
        assert!(d.get_matched_subscriptions(writer).is_empty());
        d.resume_publications(publisher).unwrap();
        assert_eq!(d.get_matched_subscriptions(writer), vec![reader]);
    }

    #[test]
    fn delete_writer_clears_match_on_peer_reader() {
        let d = domain();
        let p = new_participant(&d);
        let topic = d.create_topic(Arc::from("t"), Arc::from("T"), UniQos::default(), true).unwrap();
        let publisher = d.create_publisher(p, UniQos::default()).unwrap();
        let subscriber = d.create_subscriber(p, UniQos::default()).unwrap();
        let writer = d.create_writer(p, publisher, topic, UniQos::best_effort(), true).unwrap();
        let reader = d.create_reader(p, subscriber, topic, UniQos::best_effort(), true).unwrap();
        d.delete_writer(writer).unwrap();
        assert!(d.get_matched_publications(reader).is_empty());
    }
}
