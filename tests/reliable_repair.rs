// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Reliable reader recovery (spec.md §4.8, §8 scenario 4).
//!
//! A writer publishes samples `14..43`; a reader that has seen nothing
//! yet receives a HEARTBEAT(first=14, last=43) and must compute the
//! full 30-sample missing range `[14, 43]`. After every sample has
//! since been delivered, a terminating HEARTBEAT with no further gap
//! produces an empty missing range.

use hdds::reliability::{HeartbeatMsg, HeartbeatRx};

#[test]
fn heartbeat_with_full_gap_requests_every_missing_sample() {
    let mut rx = HeartbeatRx::new();
    let hb = HeartbeatMsg::new(14, 43, 1);

    // A reader newly matched against this writer has seen nothing, so
    // its watermark is one below the writer's announced first sample
    // (spec.md §4.8: missing-set = [max(current_first, first), last]).
    // The reported gap must be exactly the 30 samples 14..=43.
    let missing = rx.on_heartbeat(&hb, hb.first_seq - 1).expect("gap expected");
    assert_eq!(missing.len(), 1);
    let range = &missing[0];
    assert_eq!(range.start, 14);
    assert_eq!(range.end, 44);
    assert_eq!(range.end - range.start, 30);
}

#[test]
fn terminating_heartbeat_with_no_gap_yields_no_missing_range() {
    let mut rx = HeartbeatRx::new();
    let first = HeartbeatMsg::new(14, 43, 1);
    rx.on_heartbeat(&first, 0);

    // All 30 samples have since been delivered (reader_last_seen = 43).
    let final_hb = HeartbeatMsg::new(14, 43, 2);
    let missing = rx.on_heartbeat(&final_hb, 43);
    assert!(missing.is_none(), "fully-acked reader should report no gap");
}

#[test]
fn stale_heartbeat_count_is_ignored() {
    let mut rx = HeartbeatRx::new();
    let hb = HeartbeatMsg::new(14, 43, 5);
    rx.on_heartbeat(&hb, 0);
    assert_eq!(rx.last_count(), Some(5));

    // A heartbeat with a count that doesn't advance is a stale/replayed
    // message and must not reset state or report a new gap.
    let stale = HeartbeatMsg::new(14, 20, 5);
    assert!(rx.on_heartbeat(&stale, 0).is_none());
    assert_eq!(rx.last_count(), Some(5));
}
