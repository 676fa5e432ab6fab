// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Per-instance state tracked by [`super::HistoryCache`] (spec.md §3
//! Data Model: "Instance" and "Change").

use std::collections::VecDeque;
use std::time::Duration;

/// Whether a reader has seen any sample for this instance before.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewState {
    New,
    NotNew,
}

/// Liveliness of an instance as observed through writes/dispose/unregister.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstanceState {
    Alive,
    NotAliveDisposed,
    NotAliveNoWriters,
}

/// Whether a sample has been returned to a reader yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleState {
    Read,
    NotRead,
}

/// The kind of state transition a [`Change`] represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    Alive,
    NotAliveDisposed,
    NotAliveUnregistered,
    /// Fully superseded sample kept only until every matched reliable
    /// reader has acknowledged it, per spec.md §3.
    Zombie,
}

/// One admitted sample. `payload` is the serialized CDR2 representation
/// produced by `xtypes`; this cache does not interpret it.
#[derive(Debug, Clone)]
pub struct Change {
    pub kind: ChangeKind,
    pub writer_handle: u64,
    pub source_time: Duration,
    pub sequence_number: u64,
    pub sample_state: SampleState,
    pub absolute_generation: u32,
    pub payload: Vec<u8>,
}

/// One key-equivalence class's retained samples and lifecycle counters.
#[derive(Debug)]
pub struct Instance {
    pub key_bytes: Vec<u8>,
    pub view_state: ViewState,
    pub instance_state: InstanceState,
    pub disposed_generation: u32,
    pub no_writers_generation: u32,
    pub samples: VecDeque<Change>,
}

impl Instance {
    pub fn new(key_bytes: Vec<u8>) -> Self {
        Self {
            key_bytes,
            view_state: ViewState::New,
            instance_state: InstanceState::Alive,
            disposed_generation: 0,
            no_writers_generation: 0,
            samples: VecDeque::new(),
        }
    }
}
