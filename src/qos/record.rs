// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! `UniQos` — the canonical, hash-consed QoS record.
//!
//! Every DCPS entity (topic, publisher, subscriber, writer, reader)
//! stores one `Arc<UniQos>` obtained from `crate::qos::intern`, rather
//! than an owned copy of all 22 policies, so that the extremely common
//! case — many endpoints sharing a profile — costs one allocation
//! instead of one per entity. Mirrors the teacher's `dds::qos::QoS`
//! aggregate (`dds/qos/profile/structs.rs`), generalized to a value
//! type suitable for hash-consing (`Eq` + `Hash` on every field).

use super::deadline::Deadline;
use super::destination_order::DestinationOrder;
use super::durability_service::DurabilityService;
use super::entity_factory::EntityFactory;
use super::latency_budget::LatencyBudget;
use super::lifespan::Lifespan;
use super::liveliness::Liveliness;
use super::metadata::{GroupData, TopicData, UserData};
use super::ownership::{Ownership, OwnershipStrength};
use super::partition::Partition;
use super::presentation::Presentation;
use super::reader_data_lifecycle::ReaderDataLifecycle;
use super::reliability::{Durability, History, Reliability, ResourceLimits};
use super::time_based_filter::TimeBasedFilter;
use super::transport_priority::TransportPriority;
use super::writer_data_lifecycle::WriterDataLifecycle;

/// All 22 standard DDS QoS policies, aggregated into one canonical,
/// cloneable, hashable record.
#[derive(Clone, Debug, PartialEq)]
pub struct UniQos {
    pub reliability: Reliability,
    pub history: History,
    pub durability: Durability,
    pub durability_service: DurabilityService,
    pub deadline: Deadline,
    pub lifespan: Lifespan,
    pub time_based_filter: TimeBasedFilter,
    pub destination_order: DestinationOrder,
    pub presentation: Presentation,
    pub latency_budget: LatencyBudget,
    pub transport_priority: TransportPriority,
    pub liveliness: Liveliness,
    pub ownership: Ownership,
    pub ownership_strength: OwnershipStrength,
    pub partition: Partition,
    pub resource_limits: ResourceLimits,
    pub user_data: UserData,
    pub group_data: GroupData,
    pub topic_data: TopicData,
    pub entity_factory: EntityFactory,
    pub writer_data_lifecycle: WriterDataLifecycle,
    pub reader_data_lifecycle: ReaderDataLifecycle,
}

impl Default for UniQos {
    fn default() -> Self {
        Self::best_effort()
    }
}

impl UniQos {
    pub fn best_effort() -> Self {
        Self {
            reliability: Reliability::BestEffort,
            history: History::KeepLast(10),
            durability: Durability::Volatile,
            durability_service: DurabilityService::default(),
            deadline: Deadline::infinite(),
            lifespan: Lifespan::infinite(),
            time_based_filter: TimeBasedFilter::zero(),
            destination_order: DestinationOrder::by_reception_timestamp(),
            presentation: Presentation::instance(),
            latency_budget: LatencyBudget::zero(),
            transport_priority: TransportPriority::normal(),
            liveliness: Liveliness::infinite(),
            ownership: Ownership::shared(),
            ownership_strength: OwnershipStrength::default(),
            partition: Partition::default(),
            resource_limits: ResourceLimits::default(),
            user_data: UserData::default(),
            group_data: GroupData::default(),
            topic_data: TopicData::default(),
            entity_factory: EntityFactory::default(),
            writer_data_lifecycle: WriterDataLifecycle::default(),
            reader_data_lifecycle: ReaderDataLifecycle::default(),
        }
    }

    pub fn reliable() -> Self {
        Self {
            reliability: Reliability::Reliable,
            ..Self::best_effort()
        }
    }

    /// Returns `Err` describing the first inconsistency found, mirroring
    /// `QosProfile::validate`'s fail-fast validation at entity creation.
    pub fn validate(&self) -> Result<(), String> {
        if let History::KeepLast(0) = self.history {
            return Err("History::KeepLast(n) requires n > 0".to_string());
        }
        if matches!(self.history, History::KeepAll) && self.resource_limits.max_samples == 0 {
            return Err("History::KeepAll requires ResourceLimits.max_samples > 0".to_string());
        }
        if !self.resource_limits.is_consistent() {
            return Err(
                "ResourceLimits.max_samples must be >= max_samples_per_instance * max_instances"
                    .to_string(),
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_valid() {
        assert!(UniQos::default().validate().is_ok());
    }

    #[test]
    fn keep_last_zero_is_invalid() {
        let mut qos = UniQos::best_effort();
        qos.history = History::KeepLast(0);
        assert!(qos.validate().is_err());
    }

    #[test]
    fn reliable_preserves_other_defaults() {
        let qos = UniQos::reliable();
        assert_eq!(qos.reliability, Reliability::Reliable);
        assert_eq!(qos.durability, Durability::Volatile);
    }
}
