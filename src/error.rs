// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Top-level DCPS return codes.
//!
//! Every subsystem (PL-CDR codec, SQL filter, history cache, entity
//! graph) keeps its own narrow error enum and converts into
//! [`ReturnCode`] only at the DCPS API boundary, mirroring how the rest
//! of this crate never reaches for `anyhow`/`thiserror`.

use crate::discovery::plcdr::CodecError;
use crate::filter::FilterError;

/// DDS-style return code, returned from DCPS-boundary operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReturnCode {
    Ok,
    Error,
    BadParameter,
    Unsupported,
    AlreadyDeleted,
    Timeout,
    NoData,
    PreconditionNotMet,
    OutOfResources,
    NotEnabled,
    ImmutablePolicy,
    InconsistentPolicy,
}

impl std::fmt::Display for ReturnCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ReturnCode::Ok => "ok",
            ReturnCode::Error => "error",
            ReturnCode::BadParameter => "bad parameter",
            ReturnCode::Unsupported => "unsupported",
            ReturnCode::AlreadyDeleted => "already deleted",
            ReturnCode::Timeout => "timeout",
            ReturnCode::NoData => "no data",
            ReturnCode::PreconditionNotMet => "precondition not met",
            ReturnCode::OutOfResources => "out of resources",
            ReturnCode::NotEnabled => "not enabled",
            ReturnCode::ImmutablePolicy => "immutable policy",
            ReturnCode::InconsistentPolicy => "inconsistent policy",
        };
        write!(f, "{s}")
    }
}

impl std::error::Error for ReturnCode {}

impl From<CodecError> for ReturnCode {
    fn from(err: CodecError) -> Self {
        log::debug!("codec error mapped to ReturnCode::Error: {err}");
        ReturnCode::Error
    }
}

impl From<FilterError> for ReturnCode {
    fn from(err: FilterError) -> Self {
        log::debug!("filter error mapped to ReturnCode::BadParameter: {err}");
        ReturnCode::BadParameter
    }
}

pub type Result<T> = std::result::Result<T, ReturnCode>;
