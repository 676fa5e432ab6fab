// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! CDR2 encode/decode contract shared by `crate::xtypes`.
//!
//! Every XTypes v1.3 type (TypeIdentifier, TypeObject and its members,
//! and the PL-CDR2 discovery payloads) implements [`Cdr2Encode`] and
//! [`Cdr2Decode`] against a flat `&[u8]` buffer rather than a generic
//! `Write`/`Read`, matching spec.md §6's zero-copy framing.

use std::fmt;

/// Error returned by a CDR2 encode or decode operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CdrError {
    /// The destination buffer did not have enough room for the value.
    BufferTooSmall,
    /// The source buffer ran out before the value was fully decoded.
    UnexpectedEof,
    /// The bytes read do not correspond to a valid encoding (bad
    /// discriminant, bad UTF-8, bad length code, ...).
    InvalidEncoding,
    /// Any other failure, with a human-readable reason.
    Other(String),
}

impl fmt::Display for CdrError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CdrError::BufferTooSmall => write!(f, "CDR2 buffer too small"),
            CdrError::UnexpectedEof => write!(f, "unexpected end of CDR2 buffer"),
            CdrError::InvalidEncoding => write!(f, "invalid CDR2 encoding"),
            CdrError::Other(reason) => write!(f, "CDR2 error: {reason}"),
        }
    }
}

impl std::error::Error for CdrError {}

/// Encode a value to CDR2 little-endian format.
pub trait Cdr2Encode {
    /// Write this value into `dst`, returning the number of bytes written.
    fn encode_cdr2_le(&self, dst: &mut [u8]) -> Result<usize, CdrError>;

    /// Upper bound on the encoded size, used to size scratch buffers.
    ///
    /// The default is deliberately generous; types with a known tight
    /// bound override it.
    fn max_cdr2_size(&self) -> usize {
        4096
    }
}

/// Decode a value from CDR2 little-endian format.
pub trait Cdr2Decode: Sized {
    /// Parse a value out of the front of `src`, returning the value and
    /// the number of bytes consumed.
    fn decode_cdr2_le(src: &[u8]) -> Result<(Self, usize), CdrError>;
}
