// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Buffer-level serialization primitives shared by `crate::xtypes` and
//! `crate::discovery`.
//!
//! [`cursor`] provides bounds-checked little-endian read/write cursors
//! over a plain `&[u8]`/`&mut [u8]`; [`traits`] defines the CDR2
//! encode/decode contract built on top of them. Nothing here is
//! specific to any one wire format — PL-CDR discovery framing lives in
//! `crate::discovery::plcdr`.

pub mod cursor;
pub mod traits;

pub use cursor::{Cursor, CursorMut};
pub use traits::{Cdr2Decode, Cdr2Encode, CdrError};

/// Error from the low-level cursor primitives, distinct from
/// [`CdrError`] which describes a type-level encode/decode failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SerError {
    WriteFailed { offset: usize, reason: String },
    ReadFailed { offset: usize, reason: String },
}

impl std::fmt::Display for SerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SerError::WriteFailed { offset, reason } => {
                write!(f, "write failed at offset {offset}: {reason}")
            }
            SerError::ReadFailed { offset, reason } => {
                write!(f, "read failed at offset {offset}: {reason}")
            }
        }
    }
}

impl std::error::Error for SerError {}

pub type SerResult<T> = Result<T, SerError>;
