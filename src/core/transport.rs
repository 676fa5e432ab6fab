// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Transport contract for the reliable reader/writer protocol.
//!
//! `reliability::writer`/`reliability::reader` need to send encoded
//! RTPS submessages (HEARTBEAT, ACKNACK, GAP) to a peer locator; real
//! UDP/TCP socket code is out of scope (spec.md §1), so both depend
//! only on this trait. [`ChannelTransport`] is the in-crate test
//! double used by the reliability test suite: it loops packets between
//! matched endpoints over an in-memory queue, mirroring the
//! `AcknackContext { transport: Arc<dyn ... > }` collaborator shape the
//! teacher crate already uses in `dds/reader/heartbeat.rs`.

use crate::core::locator::Locator;
use dashmap::DashMap;
use parking_lot::Mutex;
use std::sync::Arc;

pub trait Transport: Send + Sync {
    fn send(&self, locator: &Locator, bytes: &[u8]) -> std::io::Result<()>;
}

/// In-memory loopback transport: `send` enqueues onto the destination
/// locator's inbox instead of touching a socket.
#[derive(Default)]
pub struct ChannelTransport {
    inboxes: DashMap<Locator, Arc<Mutex<Vec<Vec<u8>>>>>,
}

impl ChannelTransport {
    pub fn new() -> Self {
        Self::default()
    }

    fn inbox(&self, locator: &Locator) -> Arc<Mutex<Vec<Vec<u8>>>> {
        self.inboxes
            .entry(*locator)
            .or_insert_with(|| Arc::new(Mutex::new(Vec::new())))
            .clone()
    }

    /// Drain all packets queued for `locator`, in send order.
    pub fn drain(&self, locator: &Locator) -> Vec<Vec<u8>> {
        std::mem::take(&mut *self.inbox(locator).lock())
    }
}

impl Transport for ChannelTransport {
    fn send(&self, locator: &Locator, bytes: &[u8]) -> std::io::Result<()> {
        self.inbox(locator).lock().push(bytes.to_vec());
        Ok(())
    }
}
