// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! RELIABILITY, HISTORY, DURABILITY and RESOURCE_LIMITS policies.
//!
//! These four are grouped together (as the teacher crate's top-level
//! `qos` module groups them) because the reliable reader protocol
//! (`crate::reliability`) and the history cache (`crate::cache`) both
//! read all four together when deciding admission and retransmission
//! behavior.

/// Delivery guarantee for samples.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum Reliability {
    /// Fire-and-forget; no ACKs, no retransmission.
    #[default]
    BestEffort,
    /// NACK-driven retransmission per `crate::reliability`.
    Reliable,
}

/// How many samples per instance to retain.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum History {
    /// Keep the last `n` samples (bounded, drops oldest).
    KeepLast(u32),
    /// Keep all samples within `ResourceLimits`.
    KeepAll,
}

impl Default for History {
    fn default() -> Self {
        Self::KeepLast(10)
    }
}

/// Sample persistence for late joiners.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum Durability {
    /// No persistence; samples are lost once the writer stops caching them.
    #[default]
    Volatile,
    /// Writer caches samples for late-joining readers, for its lifetime.
    TransientLocal,
    /// Writer persists samples to disk; survives writer restarts.
    Persistent,
}

/// Bounds on the history cache's (`crate::cache`) memory footprint.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ResourceLimits {
    pub max_samples: usize,
    pub max_instances: usize,
    pub max_samples_per_instance: usize,
    pub max_quota_bytes: usize,
}

impl Default for ResourceLimits {
    fn default() -> Self {
        Self {
            max_samples: 1 << 20,
            max_instances: 1 << 16,
            max_samples_per_instance: 1 << 16,
            max_quota_bytes: usize::MAX,
        }
    }
}

impl ResourceLimits {
    /// Validate the internal consistency rule DDS v1.4 Sec.2.2.3 requires:
    /// `max_samples >= max_samples_per_instance * max_instances` (when both
    /// the latter are finite/bounded).
    pub fn is_consistent(&self) -> bool {
        match self
            .max_samples_per_instance
            .checked_mul(self.max_instances)
        {
            Some(product) => self.max_samples >= product,
            None => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resource_limits_consistency_rule() {
        let ok = ResourceLimits {
            max_samples: 100,
            max_instances: 10,
            max_samples_per_instance: 10,
            max_quota_bytes: usize::MAX,
        };
        assert!(ok.is_consistent());

        let bad = ResourceLimits {
            max_samples: 5,
            max_instances: 10,
            max_samples_per_instance: 10,
            max_quota_bytes: usize::MAX,
        };
        assert!(!bad.is_consistent());
    }

    #[test]
    fn history_default_is_keep_last_ten() {
        assert_eq!(History::default(), History::KeepLast(10));
    }
}
