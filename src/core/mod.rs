//! Core types and constants for the FBP client
//!
//! This module contains the fundamental building blocks used throughout the library.

pub mod error;
pub mod serde;
pub mod types;

pub use self::error::{Error, Result};
pub use self::types::{Config, Day, InvocationSemantics};

use std::time::Duration;

/// Default server port for the facility booking protocol
pub const DEFAULT_PORT: u16 = 2222;

/// Maximum datagram size in bytes
pub const MAX_DATAGRAM_SIZE: usize = 1024;

/// Per-attempt wait before a retransmission
pub const DEFAULT_SUB_TIMEOUT: Duration = Duration::from_secs(10);

/// Total wall-clock budget of an at-most-once invocation
pub const DEFAULT_TOTAL_DEADLINE: Duration = Duration::from_secs(30);

/// Poll interval inside a monitor window
pub const DEFAULT_POLL_TIMEOUT: Duration = Duration::from_secs(1);
