//! FBP client: UDP endpoint for the Facility Booking Protocol
//!
//! This library implements the client side of a compact binary
//! request/response protocol over UDP: a frame codec, an invocation
//! controller that masks datagram loss through timed retransmission under
//! at-least-once or at-most-once semantics, and a bounded monitor window for
//! unsolicited server-pushed updates.
pub mod core;

mod network;
mod protocol;
mod session;

// Re-export commonly used items
pub use crate::core::{Config, Day, Error, InvocationSemantics, Result};
pub use crate::network::{Transport, UdpTransport};
pub use crate::protocol::{Extra, FrameCodec, Operation, RequestMessage, ResponseMessage};
pub use crate::session::{ClientSession, InvocationController, MonitorSession};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
