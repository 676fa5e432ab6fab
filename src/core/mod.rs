// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! # Core primitives
//!
//! Small, dependency-light building blocks shared by every other module:
//! entity handle allocation, locator lists, string interning, and the
//! two ambient collaborator traits ([`clock::Clock`],
//! [`transport::Transport`]) that keep timer- and I/O-driven code
//! testable without real sleeps or sockets.

pub mod clock;
pub mod handle;
pub mod intern;
pub mod locator;
pub mod ser;
pub mod transport;

pub use clock::{Clock, ManualClock, SystemClock};
pub use handle::{Handle, HandleTable};
pub use intern::InternPool;
pub use locator::{Locator, LocatorKind, LocatorList};
pub use ser::{Cdr2Decode, Cdr2Encode, CdrError};
pub use transport::{ChannelTransport, Transport};
