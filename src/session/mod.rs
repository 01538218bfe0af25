//! Client session: request-id assignment and operation entry points
//!
//! A session owns the transport and drives exactly one logical operation at a
//! time: a request/response exchange, or the monitor window that follows a
//! successful Monitor invocation.

mod invoker;
mod monitor;

pub use self::invoker::InvocationController;
pub use self::monitor::MonitorSession;

use std::time::Duration;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::core::{Config, Day, InvocationSemantics, Result};
use crate::network::{Transport, UdpTransport};
use crate::protocol::{RequestMessage, ResponseMessage};

/// One client session against a single server endpoint.
///
/// Request ids are assigned monotonically starting at 1 and are never reused,
/// even across the retransmissions of one logical call. The configured
/// invocation semantics apply to every exchange; batch queries and the
/// Monitor handshake always run bounded.
pub struct ClientSession<T: Transport = UdpTransport> {
    transport: T,
    config: Config,
    cancel: CancellationToken,
    next_request_id: u32,
}

impl ClientSession<UdpTransport> {
    /// Binds a UDP socket and connects it to the configured server
    pub async fn connect(config: Config) -> Result<Self> {
        let transport = UdpTransport::connect(config.server_addr).await?;
        Ok(Self::with_transport(transport, config))
    }
}

impl<T: Transport> ClientSession<T> {
    /// Creates a session over an already-established transport
    pub fn with_transport(transport: T, config: Config) -> Self {
        ClientSession {
            transport,
            config,
            cancel: CancellationToken::new(),
            next_request_id: 1,
        }
    }

    /// Returns a token that aborts the in-flight invocation when cancelled.
    /// This is the only way out of an at-least-once call that never gets a
    /// reply.
    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Returns the session configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    fn next_id(&mut self) -> u32 {
        let id = self.next_request_id;
        self.next_request_id = self.next_request_id.wrapping_add(1);
        id
    }

    /// Runs one fully-formed request under the session semantics
    pub async fn invoke(&mut self, request: &RequestMessage) -> Result<ResponseMessage> {
        let controller = InvocationController::new(&self.config, self.cancel.clone());
        controller.invoke(&mut self.transport, request).await
    }

    async fn invoke_bounded(&mut self, request: &RequestMessage) -> Result<ResponseMessage> {
        let controller = InvocationController::with_semantics(
            &self.config,
            InvocationSemantics::AtMostOnce,
            self.cancel.clone(),
        );
        controller.invoke(&mut self.transport, request).await
    }

    /// Queries availability of a facility slot
    pub async fn query(
        &mut self,
        facility_name: &str,
        day: Day,
        start_time: u16,
        end_time: u16,
    ) -> Result<ResponseMessage> {
        let id = self.next_id();
        let request = RequestMessage::query(id, facility_name, day, start_time, end_time);
        self.invoke(&request).await
    }

    /// Books a facility slot
    pub async fn book(
        &mut self,
        facility_name: &str,
        day: Day,
        start_time: u16,
        end_time: u16,
    ) -> Result<ResponseMessage> {
        let id = self.next_id();
        let request = RequestMessage::book(id, facility_name, day, start_time, end_time);
        self.invoke(&request).await
    }

    /// Shifts an existing booking by a signed minute offset
    pub async fn change(
        &mut self,
        facility_name: &str,
        booking_id: u32,
        delta_minutes: i32,
    ) -> Result<ResponseMessage> {
        let id = self.next_id();
        let request = RequestMessage::change(id, facility_name, booking_id, delta_minutes);
        self.invoke(&request).await
    }

    /// Extends an existing booking by some minutes
    pub async fn extend(
        &mut self,
        facility_name: &str,
        booking_id: u32,
        extend_minutes: i32,
    ) -> Result<ResponseMessage> {
        let id = self.next_id();
        let request = RequestMessage::extend(id, facility_name, booking_id, extend_minutes);
        self.invoke(&request).await
    }

    /// Cancels an existing booking
    pub async fn cancel_booking(
        &mut self,
        facility_name: &str,
        booking_id: u32,
    ) -> Result<ResponseMessage> {
        let id = self.next_id();
        let request = RequestMessage::cancel(id, facility_name, booking_id);
        self.invoke(&request).await
    }

    /// Issues the same query once per day, sequentially. Each invocation is
    /// independent and always runs bounded, whatever the session semantics.
    pub async fn query_batch(
        &mut self,
        facility_name: &str,
        days: &[Day],
        start_time: u16,
        end_time: u16,
    ) -> Vec<Result<ResponseMessage>> {
        let mut results = Vec::with_capacity(days.len());
        for &day in days {
            let id = self.next_id();
            let request = RequestMessage::query(id, facility_name, day, start_time, end_time);
            results.push(self.invoke_bounded(&request).await);
        }
        results
    }

    /// Subscribes to availability updates for `window_seconds`. On a
    /// successful handshake the monitor window runs to expiry, forwarding
    /// each update through `updates`, before the ack is returned. A rejected
    /// subscription returns the server's ack without opening the window.
    pub async fn monitor(
        &mut self,
        facility_name: &str,
        day: Day,
        start_time: u16,
        end_time: u16,
        window_seconds: u32,
        updates: mpsc::Sender<ResponseMessage>,
    ) -> Result<ResponseMessage> {
        let id = self.next_id();
        let request = RequestMessage::monitor(
            id,
            facility_name,
            day,
            start_time,
            end_time,
            window_seconds,
        );
        let ack = self.invoke_bounded(&request).await?;

        if ack.is_success() {
            let session = MonitorSession::new(&mut self.transport, self.config.poll_timeout);
            session
                .run(Duration::from_secs(u64::from(window_seconds)), &updates)
                .await?;
        }

        Ok(ack)
    }
}
