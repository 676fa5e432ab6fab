// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! MD5-based instance and topic key hashing (spec.md §4.4, §6).
//!
//! Two distinct uses share the same primitive: deriving a 16-byte
//! `InstanceHandle` digest from marshalled key bytes when they exceed
//! 16 bytes, and hashing `(name, type_name)` pairs for discovered-topic
//! lookup. Reuses the `md-5` dependency already pulled in by the
//! `xtypes` feature for TypeObject equivalence hashing
//! (`crate::xtypes::type_identifier`), rather than adding a second hash
//! crate.

/// Compute the 16-byte instance key hash.
///
/// Per spec.md §8 scenario 1: key bytes shorter than 16 are zero-padded
/// in place rather than hashed (`01 02 03 04` becomes `01 02 03 04 00
/// ... 00`). Key bytes of exactly 16 bytes are returned unchanged. Only
/// keys longer than 16 bytes are actually passed through MD5.
pub fn instance_key_hash(key_bytes: &[u8]) -> [u8; 16] {
    if key_bytes.len() <= 16 {
        let mut out = [0u8; 16];
        out[..key_bytes.len()].copy_from_slice(key_bytes);
        out
    } else {
        md5::compute(key_bytes).0
    }
}

/// Topic key derivation for discovered-topic lookup (spec.md §4.4):
/// `(u32 name_len, name, u32 type_len, type)` hashed with MD5.
pub fn topic_key_hash(topic_name: &str, type_name: &str) -> [u8; 16] {
    let mut buf = Vec::with_capacity(8 + topic_name.len() + type_name.len());
    buf.extend_from_slice(&(topic_name.len() as u32).to_le_bytes());
    buf.extend_from_slice(topic_name.as_bytes());
    buf.extend_from_slice(&(type_name.len() as u32).to_le_bytes());
    buf.extend_from_slice(type_name.as_bytes());
    md5::compute(&buf).0
}
