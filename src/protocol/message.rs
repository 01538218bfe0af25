use std::fmt;

use crate::core::Day;

/// Facility booking operations, by wire opcode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Operation {
    /// Query facility availability
    Query = 1,
    /// Book a facility slot
    Book = 2,
    /// Shift an existing booking by a signed minute offset
    Change = 3,
    /// Subscribe to availability updates for a bounded window
    Monitor = 4,
    /// Extend an existing booking
    Extend = 5,
    /// Cancel an existing booking
    Cancel = 6,
}

impl Operation {
    /// Returns the wire opcode for this operation
    pub fn code(&self) -> u8 {
        *self as u8
    }

    /// Maps a wire opcode back to an operation
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            1 => Some(Operation::Query),
            2 => Some(Operation::Book),
            3 => Some(Operation::Change),
            4 => Some(Operation::Monitor),
            5 => Some(Operation::Extend),
            6 => Some(Operation::Cancel),
            _ => None,
        }
    }
}

/// Operation-dependent trailing payload of a request frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Extra {
    /// Query, Book: no trailing payload
    None,
    /// Change, Extend: booking id plus a signed minute offset
    Booking { booking_id: u32, delta_minutes: i32 },
    /// Monitor: subscription window in seconds
    Window { seconds: u32 },
    /// Cancel: the booking id to cancel
    CancelBooking { booking_id: u32 },
}

impl Extra {
    /// Encoded length of this payload in bytes
    pub fn wire_len(&self) -> usize {
        match self {
            Extra::None => 0,
            Extra::Booking { .. } => 8,
            Extra::Window { .. } | Extra::CancelBooking { .. } => 4,
        }
    }

    /// Whether this payload variant is the one the operation carries
    pub fn matches(&self, operation: Operation) -> bool {
        matches!(
            (operation, self),
            (Operation::Query, Extra::None)
                | (Operation::Book, Extra::None)
                | (Operation::Change, Extra::Booking { .. })
                | (Operation::Extend, Extra::Booking { .. })
                | (Operation::Monitor, Extra::Window { .. })
                | (Operation::Cancel, Extra::CancelBooking { .. })
        )
    }
}

/// One logical request. Constructed immediately before the first send and
/// immutable thereafter; every retransmission reuses the same bytes, so the
/// request id names the logical operation, not the datagram.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestMessage {
    /// Monotonic identifier assigned by the session, starting at 1
    pub request_id: u32,
    /// The requested operation
    pub operation: Operation,
    /// Facility name (UTF-8, at most 65535 bytes encoded)
    pub facility_name: String,
    /// Day of week; sent as 0 for Change/Extend/Cancel
    pub day: u8,
    /// Slot start as hour*100 + minute (e.g. 900 = 9:00); 0 when not meaningful
    pub start_time: u16,
    /// Slot end as hour*100 + minute; 0 when not meaningful
    pub end_time: u16,
    /// Operation-dependent trailing payload
    pub extra: Extra,
}

impl RequestMessage {
    /// Builds a Query request for one facility slot
    pub fn query(
        request_id: u32,
        facility_name: impl Into<String>,
        day: Day,
        start_time: u16,
        end_time: u16,
    ) -> Self {
        RequestMessage {
            request_id,
            operation: Operation::Query,
            facility_name: facility_name.into(),
            day: day.index(),
            start_time,
            end_time,
            extra: Extra::None,
        }
    }

    /// Builds a Book request for one facility slot
    pub fn book(
        request_id: u32,
        facility_name: impl Into<String>,
        day: Day,
        start_time: u16,
        end_time: u16,
    ) -> Self {
        RequestMessage {
            request_id,
            operation: Operation::Book,
            facility_name: facility_name.into(),
            day: day.index(),
            start_time,
            end_time,
            extra: Extra::None,
        }
    }

    /// Builds a Change request shifting a booking by a signed minute offset
    pub fn change(
        request_id: u32,
        facility_name: impl Into<String>,
        booking_id: u32,
        delta_minutes: i32,
    ) -> Self {
        RequestMessage {
            request_id,
            operation: Operation::Change,
            facility_name: facility_name.into(),
            day: 0,
            start_time: 0,
            end_time: 0,
            extra: Extra::Booking {
                booking_id,
                delta_minutes,
            },
        }
    }

    /// Builds an Extend request lengthening a booking by some minutes
    pub fn extend(
        request_id: u32,
        facility_name: impl Into<String>,
        booking_id: u32,
        extend_minutes: i32,
    ) -> Self {
        RequestMessage {
            request_id,
            operation: Operation::Extend,
            facility_name: facility_name.into(),
            day: 0,
            start_time: 0,
            end_time: 0,
            extra: Extra::Booking {
                booking_id,
                delta_minutes: extend_minutes,
            },
        }
    }

    /// Builds a Monitor request subscribing to updates for `window_seconds`
    pub fn monitor(
        request_id: u32,
        facility_name: impl Into<String>,
        day: Day,
        start_time: u16,
        end_time: u16,
        window_seconds: u32,
    ) -> Self {
        RequestMessage {
            request_id,
            operation: Operation::Monitor,
            facility_name: facility_name.into(),
            day: day.index(),
            start_time,
            end_time,
            extra: Extra::Window {
                seconds: window_seconds,
            },
        }
    }

    /// Builds a Cancel request for a booking id
    pub fn cancel(request_id: u32, facility_name: impl Into<String>, booking_id: u32) -> Self {
        RequestMessage {
            request_id,
            operation: Operation::Cancel,
            facility_name: facility_name.into(),
            day: 0,
            start_time: 0,
            end_time: 0,
            extra: Extra::CancelBooking { booking_id },
        }
    }
}

/// One decoded response frame. Constructed fresh from each received datagram
/// and discarded once consumed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseMessage {
    /// Request id echoed by the server (not enforced, see Config)
    pub request_id: u32,
    /// Result code; 0 = success by convention, otherwise opaque to this layer
    pub status: u8,
    /// Human-readable payload
    pub message: String,
}

impl ResponseMessage {
    /// Returns true for the conventional success status
    pub fn is_success(&self) -> bool {
        self.status == 0
    }
}

impl fmt::Display for ResponseMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "request {} status {}: {}",
            self.request_id, self.status, self.message
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opcode_round_trip() {
        for op in [
            Operation::Query,
            Operation::Book,
            Operation::Change,
            Operation::Monitor,
            Operation::Extend,
            Operation::Cancel,
        ] {
            assert_eq!(Operation::from_code(op.code()), Some(op));
        }
        assert_eq!(Operation::from_code(0), None);
        assert_eq!(Operation::from_code(7), None);
    }

    #[test]
    fn test_constructors_pair_operation_and_extra() {
        let query = RequestMessage::query(1, "Gym", Day::Monday, 900, 1000);
        assert!(query.extra.matches(query.operation));
        assert_eq!(query.extra.wire_len(), 0);

        let change = RequestMessage::change(2, "Gym", 1000, -30);
        assert!(change.extra.matches(change.operation));
        assert_eq!(change.extra.wire_len(), 8);
        assert_eq!(change.day, 0);

        let monitor = RequestMessage::monitor(3, "Gym", Day::Friday, 900, 1400, 300);
        assert!(monitor.extra.matches(monitor.operation));
        assert_eq!(monitor.extra.wire_len(), 4);

        let cancel = RequestMessage::cancel(4, "Gym", 1000);
        assert!(cancel.extra.matches(cancel.operation));
        assert_eq!(cancel.extra.wire_len(), 4);
    }

    #[test]
    fn test_response_display() {
        let resp = ResponseMessage {
            request_id: 7,
            status: 0,
            message: "Booking confirmed".into(),
        };
        assert!(resp.is_success());
        assert_eq!(resp.to_string(), "request 7 status 0: Booking confirmed");
    }
}
