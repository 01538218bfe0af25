use bytes::{Buf, BufMut, Bytes, BytesMut};

use super::message::{Extra, RequestMessage, ResponseMessage};
use crate::core::{Error, Result};

/// Fixed response header length: requestId(4) + status(1) + msgLen(2)
pub const RESPONSE_HEADER_LEN: usize = 7;

/// Frame codec for the facility booking wire format.
///
/// All multi-byte integers are big-endian. The codec is stateless: encoding
/// is deterministic and decoding retains nothing between calls.
#[derive(Debug, Clone, Copy, Default)]
pub struct FrameCodec;

impl FrameCodec {
    /// Creates a new frame codec
    pub fn new() -> Self {
        FrameCodec
    }

    /// Encodes a request into its single-datagram wire form:
    /// `requestId(4) | op(1) | nameLen(2) | name | day(1) | start(2) | end(2) | extra`
    /// where `extra` is 8 bytes for Change/Extend, 4 for Monitor/Cancel,
    /// absent for Query/Book.
    pub fn encode_request(&self, request: &RequestMessage) -> Result<Bytes> {
        let name = request.facility_name.as_bytes();
        if name.len() > usize::from(u16::MAX) {
            return Err(Error::encoding(format!(
                "facility name is {} bytes, limit is {}",
                name.len(),
                u16::MAX
            )));
        }
        if !request.extra.matches(request.operation) {
            return Err(Error::encoding(format!(
                "extra payload {:?} does not belong to operation {:?}",
                request.extra, request.operation
            )));
        }

        let mut buf = BytesMut::with_capacity(12 + name.len() + request.extra.wire_len());
        buf.put_u32(request.request_id);
        buf.put_u8(request.operation.code());
        buf.put_u16(name.len() as u16);
        buf.put_slice(name);
        buf.put_u8(request.day);
        buf.put_u16(request.start_time);
        buf.put_u16(request.end_time);
        match request.extra {
            Extra::None => {}
            Extra::Booking {
                booking_id,
                delta_minutes,
            } => {
                buf.put_u32(booking_id);
                buf.put_i32(delta_minutes);
            }
            Extra::Window { seconds } => buf.put_u32(seconds),
            Extra::CancelBooking { booking_id } => buf.put_u32(booking_id),
        }

        Ok(buf.freeze())
    }

    /// Decodes a response frame from the front of a datagram:
    /// `requestId(4) | status(1) | msgLen(2) | message(msgLen)`.
    /// Trailing bytes beyond the declared message are ignored.
    pub fn decode_response(&self, datagram: &[u8]) -> Result<ResponseMessage> {
        if datagram.len() < RESPONSE_HEADER_LEN {
            return Err(Error::decoding(format!(
                "datagram is {} bytes, response header needs {}",
                datagram.len(),
                RESPONSE_HEADER_LEN
            )));
        }

        let mut buf = datagram;
        let request_id = buf.get_u32();
        let status = buf.get_u8();
        let msg_len = usize::from(buf.get_u16());
        if buf.remaining() < msg_len {
            return Err(Error::decoding(format!(
                "message length {} exceeds {} remaining bytes",
                msg_len,
                buf.remaining()
            )));
        }

        let message = std::str::from_utf8(&buf[..msg_len])
            .map_err(|e| Error::decoding(format!("message is not valid UTF-8: {}", e)))?
            .to_owned();

        Ok(ResponseMessage {
            request_id,
            status,
            message,
        })
    }
}
