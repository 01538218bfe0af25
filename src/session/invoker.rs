use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::core::{Config, Error, InvocationSemantics, Result};
use crate::network::Transport;
use crate::protocol::{FrameCodec, RequestMessage, ResponseMessage};

/// Drives exactly one logical request to completion over an unreliable
/// datagram transport, masking loss through timed retransmission.
///
/// The request is encoded once; every retransmission reuses the same bytes.
/// AtLeastOnce retransmits until any reply arrives (or the cancellation token
/// fires), AtMostOnce retransmits only while the elapsed time since the first
/// transmission is under the total deadline.
pub struct InvocationController {
    codec: FrameCodec,
    semantics: InvocationSemantics,
    sub_timeout: std::time::Duration,
    total_deadline: std::time::Duration,
    validate_request_id: bool,
    cancel: CancellationToken,
}

impl InvocationController {
    /// Creates a controller using the session-wide semantics
    pub fn new(config: &Config, cancel: CancellationToken) -> Self {
        Self::with_semantics(config, config.semantics, cancel)
    }

    /// Creates a controller with explicit semantics, overriding the session
    /// choice (batch calls always run bounded)
    pub fn with_semantics(
        config: &Config,
        semantics: InvocationSemantics,
        cancel: CancellationToken,
    ) -> Self {
        InvocationController {
            codec: FrameCodec::new(),
            semantics,
            sub_timeout: config.sub_timeout,
            total_deadline: config.total_deadline,
            validate_request_id: config.validate_request_id,
            cancel,
        }
    }

    /// Sends the request and waits for a reply, retransmitting on each
    /// sub-timeout according to the selected semantics.
    ///
    /// A decode failure aborts the invocation: a reply that arrived but
    /// cannot be read is not "no reply", so no retransmission masks it.
    pub async fn invoke<T: Transport>(
        &self,
        transport: &mut T,
        request: &RequestMessage,
    ) -> Result<ResponseMessage> {
        let frame = self.codec.encode_request(request)?;
        let first_send = Instant::now();
        let mut attempt: u32 = 0;

        loop {
            if self.cancel.is_cancelled() {
                return Err(Error::Cancelled);
            }
            if attempt > 0 {
                debug!(
                    request_id = request.request_id,
                    attempt, "retransmitting request"
                );
            }
            transport.send(&frame).await?;
            attempt += 1;

            if let Some(response) = self.await_reply(transport, request.request_id).await? {
                return Ok(response);
            }

            if self.semantics == InvocationSemantics::AtMostOnce {
                let waited = first_send.elapsed();
                if waited >= self.total_deadline {
                    debug!(
                        request_id = request.request_id,
                        attempts = attempt,
                        ?waited,
                        "giving up"
                    );
                    return Err(Error::InvocationTimeout { waited });
                }
            }
        }
    }

    /// Waits out one sub-timeout for an acceptable reply. Returns `None` when
    /// the attempt window elapsed without one.
    async fn await_reply<T: Transport>(
        &self,
        transport: &mut T,
        request_id: u32,
    ) -> Result<Option<ResponseMessage>> {
        let attempt_start = Instant::now();
        let mut wait = self.sub_timeout;

        loop {
            let datagram = tokio::select! {
                _ = self.cancel.cancelled() => return Err(Error::Cancelled),
                received = transport.recv(wait) => match received? {
                    Some(datagram) => datagram,
                    None => return Ok(None),
                },
            };

            let response = self.codec.decode_response(&datagram)?;
            if self.validate_request_id && response.request_id != request_id {
                warn!(
                    expected = request_id,
                    received = response.request_id,
                    "discarding reply for a different request"
                );
                wait = self.sub_timeout.saturating_sub(attempt_start.elapsed());
                if wait.is_zero() {
                    return Ok(None);
                }
                continue;
            }
            return Ok(Some(response));
        }
    }
}
