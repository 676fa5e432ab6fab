// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! TRANSPORT_PRIORITY QoS policy (DDS v1.4 Sec.2.2.3.16)
//!
//! Provides a hint to the DDS implementation about the importance of data,
//! which can be used to control network stack priority (DSCP/ToS fields).
//!
//! # QoS Compatibility (Request vs Offered)
//!
//! **Rule:** TRANSPORT_PRIORITY is a hint (no RxO check required)
//!
//! This policy does not affect compatibility between readers and writers.
//! It provides optimization hints to the transport layer but doesn't
//! enforce any guarantees.
//!
//! # Use Cases
//!
//! - **High-priority data**:
//!   - Emergency alerts (highest priority)
//!   - Control commands (high priority)
//!   - Real-time telemetry (medium-high priority)
//!
//! - **Normal-priority data**:
//!   - Sensor data (default priority)
//!   - Status updates (default priority)
//!
//! - **Low-priority data**:
//!   - Logs (low priority)
//!   - Diagnostics (low priority)
//!   - Bulk transfers (lowest priority)
//!
//! # Network Priority Mapping
//!
//! The `value` field is typically mapped to:
//! - **DSCP (Differentiated Services Code Point)**: 0-63 (6 bits)
//! - **ToS (Type of Service)**: 0-255 (8 bits, legacy)
//!
//! Common DSCP values:
//! - 0: Best Effort (default)
//! - 46: Expedited Forwarding (low-latency, low-loss)
//! - 34: Assured Forwarding 4 (high priority)
//! - 26: Assured Forwarding 3 (medium-high priority)
//! - 18: Assured Forwarding 2 (medium priority)
//! - 10: Assured Forwarding 1 (low priority)
//!
//! # Examples
//!
//! ```no_run
//! use hdds::qos::transport_priority::TransportPriority;
//!
//! // Emergency alerts: highest priority
//! let emergency = TransportPriority::new(100);
//! assert_eq!(emergency.value, 100);
//!
//! // Normal data: default priority
//! let default = TransportPriority::default();
//! assert_eq!(default.value, 0);
//! ```

/// TRANSPORT_PRIORITY QoS policy
///
/// Specifies the importance of the data, used as a hint for
/// transport-layer prioritization (e.g., DSCP/ToS marking).
///
/// Default: 0 (normal priority).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct TransportPriority {
    /// Priority value (higher = more important)
    ///
    /// Typically mapped to DSCP (0-63) or ToS (0-255) by the transport.
    /// Applications can use arbitrary values; the implementation
    /// scales them to the available network priority range.
    pub value: i32,
}

impl Default for TransportPriority {
    /// Default: Priority 0 (normal priority)
    fn default() -> Self {
        Self::normal()
    }
}

impl TransportPriority {
    /// Create new TRANSPORT_PRIORITY policy with specified value
    ///
    /// # Arguments
    ///
    /// * `value` - Priority value (higher = more important)
    ///
    /// # Examples
    ///
    /// ```
    /// use hdds::qos::transport_priority::TransportPriority;
    ///
    /// // High-priority control commands
    /// let priority = TransportPriority::new(50);
    /// assert_eq!(priority.value, 50);
    /// ```
    pub fn new(value: i32) -> Self {
        Self { value }
    }

    /// Create TRANSPORT_PRIORITY with normal priority (0)
    ///
    /// # Examples
    ///
    /// ```
    /// use hdds::qos::transport_priority::TransportPriority;
    ///
    /// let priority = TransportPriority::normal();
    /// assert_eq!(priority.value, 0);
    /// assert!(priority.is_normal());
    /// ```
    pub fn normal() -> Self {
        Self { value: 0 }
    }

    /// Create TRANSPORT_PRIORITY with high priority
    ///
    /// Convenience method for common high-priority data.
    ///
    /// # Examples
    ///
    /// ```
    /// use hdds::qos::transport_priority::TransportPriority;
    ///
    /// let priority = TransportPriority::high();
    /// assert_eq!(priority.value, 50);
    /// ```
    pub fn high() -> Self {
        Self { value: 50 }
    }

    /// Create TRANSPORT_PRIORITY with low priority
    ///
    /// Convenience method for background/bulk data.
    ///
    /// # Examples
    ///
    /// ```
    /// use hdds::qos::transport_priority::TransportPriority;
    ///
    /// let priority = TransportPriority::low();
    /// assert_eq!(priority.value, -50);
    /// ```
    pub fn low() -> Self {
        Self { value: -50 }
    }

    /// Check if priority is normal (0)
    pub fn is_normal(&self) -> bool {
        self.value == 0
    }

    /// Check if priority is high (positive value)
    pub fn is_high(&self) -> bool {
        self.value > 0
    }

    /// Check if priority is low (negative value)
    pub fn is_low(&self) -> bool {
        self.value < 0
    }
}
