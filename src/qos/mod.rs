// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! # QoS policies and the intern engine
//!
//! Every DCPS entity carries a [`record::UniQos`] — the canonical,
//! hash-consed aggregate of all 22 standard QoS policies. `intern`
//! hash-conses `UniQos` values into shared `Arc`s; `matching` computes
//! RxO (Requested-vs-Offered) compatibility between two policies.
//! Ported from the teacher's `dds/qos/*` and `qos/*` policy modules.

pub mod deadline;
pub mod destination_order;
pub mod durability_service;
pub mod entity_factory;
pub mod intern;
pub mod latency_budget;
pub mod lifespan;
pub mod liveliness;
pub mod matching;
pub mod metadata;
pub mod ownership;
pub mod partition;
pub mod presentation;
#[cfg(feature = "qos-loaders")]
pub mod profile_loader;
pub mod reader_data_lifecycle;
pub mod record;
pub mod reliability;
pub mod time_based_filter;
pub mod transport_priority;
pub mod writer_data_lifecycle;

pub use deadline::Deadline;
pub use destination_order::{DestinationOrder, DestinationOrderKind};
pub use durability_service::DurabilityService;
pub use entity_factory::EntityFactory;
pub use intern::{QosId, QosInternPool};
pub use latency_budget::LatencyBudget;
pub use lifespan::{Lifespan, LifespanChecker};
pub use liveliness::{Liveliness, LivelinessKind, LivelinessMonitor};
pub use matching::{match_qos, PolicyId};
pub use metadata::{GroupData, TopicData, UserData};
pub use ownership::{Ownership, OwnershipArbiter, OwnershipKind, OwnershipStrength};
pub use partition::Partition;
pub use presentation::{Presentation, PresentationAccessScope};
#[cfg(feature = "qos-loaders")]
pub use profile_loader::{ConfigFormat, ProfileError, QosProfileLoader};
pub use reader_data_lifecycle::ReaderDataLifecycle;
pub use record::UniQos;
pub use reliability::{Durability, History, Reliability, ResourceLimits};
pub use time_based_filter::{TimeBasedFilter, TimeBasedFilterChecker};
pub use transport_priority::TransportPriority;
pub use writer_data_lifecycle::WriterDataLifecycle;
