//! Facility booking protocol messages and their wire encoding
//!
//! This module defines the request/response message types and the frame codec
//! that translates them to and from their single-datagram byte layout.

pub mod codec;
pub mod message;

pub use self::codec::FrameCodec;
pub use self::message::{Extra, Operation, RequestMessage, ResponseMessage};
