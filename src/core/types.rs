use std::net::SocketAddr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Day of the week a booking refers to (Monday = 0 on the wire)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Day {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl Day {
    /// All days in wire order
    pub const ALL: [Day; 7] = [
        Day::Monday,
        Day::Tuesday,
        Day::Wednesday,
        Day::Thursday,
        Day::Friday,
        Day::Saturday,
        Day::Sunday,
    ];

    /// Creates a day from its wire index (0 = Monday .. 6 = Sunday)
    pub fn from_index(index: u8) -> Option<Self> {
        Day::ALL.get(usize::from(index)).copied()
    }

    /// Returns the wire index of this day
    pub fn index(&self) -> u8 {
        *self as u8
    }
}

/// Delivery guarantee applied to every request/response exchange in a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InvocationSemantics {
    /// Retransmit until any reply arrives; never gives up on its own
    AtLeastOnce,
    /// Retransmit within a bounded total wait, then report no answer
    AtMostOnce,
}

/// Configuration for an FBP client session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Remote server endpoint
    pub server_addr: SocketAddr,
    /// Invocation semantics applied to every exchange in this session
    pub semantics: InvocationSemantics,
    /// Per-attempt wait before retransmitting
    #[serde(serialize_with = "super::serde::serialize_duration")]
    #[serde(deserialize_with = "super::serde::deserialize_duration")]
    pub sub_timeout: Duration,
    /// Total wall-clock budget for an at-most-once invocation
    #[serde(serialize_with = "super::serde::serialize_duration")]
    #[serde(deserialize_with = "super::serde::deserialize_duration")]
    pub total_deadline: Duration,
    /// Poll interval inside a monitor window
    #[serde(serialize_with = "super::serde::serialize_duration")]
    #[serde(deserialize_with = "super::serde::deserialize_duration")]
    pub poll_timeout: Duration,
    /// Whether a reply must echo the outgoing request id to be accepted.
    /// The reference behavior accepts any datagram, so this is off by default.
    pub validate_request_id: bool,
}

impl Config {
    /// Creates a configuration for the given server with default timing
    pub fn new(server_addr: SocketAddr, semantics: InvocationSemantics) -> Self {
        Config {
            server_addr,
            semantics,
            ..Config::default()
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            server_addr: format!("127.0.0.1:{}", super::DEFAULT_PORT).parse().unwrap(),
            semantics: InvocationSemantics::AtMostOnce,
            sub_timeout: super::DEFAULT_SUB_TIMEOUT,
            total_deadline: super::DEFAULT_TOTAL_DEADLINE,
            poll_timeout: super::DEFAULT_POLL_TIMEOUT,
            validate_request_id: false,
        }
    }
}
