//! Datagram transport for the protocol layers
//!
//! This module provides the transport capability the invocation controller
//! and monitor session run on, and its UDP implementation.

mod transport;

#[cfg(test)]
pub(crate) use self::transport::testing;
pub use self::transport::{Transport, UdpTransport};
