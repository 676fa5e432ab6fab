// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Topic and FilteredTopic entities.

use std::sync::Arc;

use super::header::{EntityFlags, EntityHeader, EntityKind};
use super::status::StatusMask;
use crate::core::Handle;
use crate::filter::{ContentFilter, FieldValue};
use crate::qos::UniQos;

/// Content-filter attachment for a `FilteredTopic` (spec.md §3:
/// `FilterData {name, related_name, class_name, expression, parameters,
/// bytecode-program, cache}` — the bytecode program and cache already
/// live inside `ContentFilter`/`filter::vm::Program`, so this struct
/// only adds the identifying fields a filtered topic needs on top of
/// that).
#[derive(Debug, Clone)]
pub struct FilterData {
    pub name: String,
    pub related_topic_name: String,
    pub class_name: String,
    pub filter: Arc<ContentFilter>,
}

impl FilterData {
    pub fn matches(&self, fields: &std::collections::HashMap<String, FieldValue>) -> bool {
        self.filter.matches(fields).unwrap_or(false)
    }
}

/// Named data channel with an associated type, QoS, and reader/writer
/// lists. Reachable only while `local_ref_count + remote_ref_count >=
/// 1` (spec.md §3); the entity graph enforces that invariant, not this
/// struct.
pub struct Topic {
    pub header: EntityHeader,
    pub name: Arc<str>,
    pub type_name: Arc<str>,
    pub qos: Arc<UniQos>,
    pub readers: Vec<Handle>,
    pub writers: Vec<Handle>,
    pub filtered_children: Vec<Handle>,
    pub local_ref_count: u32,
    pub remote_ref_count: u32,
    pub mask: StatusMask,
    pub inconsistent_topic_count: u32,
    /// `Some` for a `FilteredTopic`; `None` for a plain `Topic`.
    pub filter_data: Option<FilterData>,
}

impl Topic {
    pub fn new(handle: Handle, name: Arc<str>, type_name: Arc<str>, qos: Arc<UniQos>, local: bool) -> Self {
        let flags = if local {
            EntityFlags::new_local()
        } else {
            EntityFlags::new_remote()
        };
        Self {
            header: EntityHeader::new(EntityKind::Topic, handle, flags),
            name,
            type_name,
            qos,
            readers: Vec::new(),
            writers: Vec::new(),
            filtered_children: Vec::new(),
            local_ref_count: 0,
            remote_ref_count: 0,
            mask: StatusMask::NONE,
            inconsistent_topic_count: 0,
            filter_data: None,
        }
    }

    pub fn with_filter(mut self, filter_data: FilterData) -> Self {
        self.header.flags.filtered_topic = true;
        self.filter_data = Some(filter_data);
        self
    }

    /// Whether the topic is still reachable: referenced locally or
    /// remotely, per spec.md §3's reachability invariant.
    pub fn is_reachable(&self) -> bool {
        self.local_ref_count > 0 || self.remote_ref_count > 0
    }

    /// Record an `InconsistentTopic` occurrence: fired when discovery
    /// finds the same topic name bound to a different type name
    /// (spec.md §4.7).
    pub fn note_inconsistent(&mut self) {
        self.inconsistent_topic_count += 1;
        self.mask = self.mask | StatusMask::INCONSISTENT_TOPIC;
    }
}
