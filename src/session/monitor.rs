use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::Instant;
use tracing::{debug, warn};

use crate::core::Result;
use crate::network::Transport;
use crate::protocol::{FrameCodec, ResponseMessage};

/// Bounded-duration receive loop for unsolicited server-pushed update frames,
/// entered after a successful Monitor invocation.
///
/// The session polls the transport in short bounded waits until the window
/// expires. A malformed frame is logged and skipped so the window keeps
/// listening; a transport failure is fatal. No update arriving at all is a
/// perfectly normal outcome.
pub struct MonitorSession<'a, T: Transport> {
    transport: &'a mut T,
    codec: FrameCodec,
    poll_timeout: Duration,
}

impl<'a, T: Transport> MonitorSession<'a, T> {
    /// Creates a session polling the transport at `poll_timeout` granularity
    pub fn new(transport: &'a mut T, poll_timeout: Duration) -> Self {
        MonitorSession {
            transport,
            codec: FrameCodec::new(),
            poll_timeout,
        }
    }

    /// Runs the window for `window`, forwarding each decoded update through
    /// `updates`. Returns the number of updates delivered. Control returns to
    /// the caller as soon as the expiry instant is reached; the final poll is
    /// clamped so the window never overruns.
    pub async fn run(
        mut self,
        window: Duration,
        updates: &mpsc::Sender<ResponseMessage>,
    ) -> Result<usize> {
        let expiry = Instant::now() + window;
        let mut delivered = 0usize;
        debug!(?window, "monitor window opened");

        loop {
            let now = Instant::now();
            if now >= expiry {
                break;
            }
            let wait = self.poll_timeout.min(expiry - now);

            match self.transport.recv(wait).await? {
                Some(datagram) => match self.codec.decode_response(&datagram) {
                    Ok(update) => {
                        debug!(request_id = update.request_id, "monitor update");
                        delivered += 1;
                        if updates.send(update).await.is_err() {
                            // Receiver dropped; nobody is listening anymore.
                            break;
                        }
                    }
                    Err(e) => warn!(error = %e, "skipping malformed update frame"),
                },
                None => {}
            }
        }

        debug!(delivered, "monitor window expired");
        Ok(delivered)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::testing::MockTransport;
    use bytes::Bytes;

    const POLL: Duration = Duration::from_secs(1);

    fn update_frame(message: &str) -> Bytes {
        let mut buf = Vec::new();
        buf.extend_from_slice(&0u32.to_be_bytes());
        buf.push(0);
        buf.extend_from_slice(&(message.len() as u16).to_be_bytes());
        buf.extend_from_slice(message.as_bytes());
        Bytes::from(buf)
    }

    #[tokio::test(start_paused = true)]
    async fn test_single_update_within_window() {
        let mut transport = MockTransport::scripted(vec![(
            Duration::from_secs(2),
            update_frame("Gym booked 900-1000 on Monday"),
        )]);
        let (tx, mut rx) = mpsc::channel(8);

        let started = Instant::now();
        let delivered = MonitorSession::new(&mut transport, POLL)
            .run(Duration::from_secs(5), &tx)
            .await
            .unwrap();

        assert_eq!(delivered, 1);
        assert_eq!(started.elapsed(), Duration::from_secs(5));

        let update = rx.try_recv().unwrap();
        assert_eq!(update.message, "Gym booked 900-1000 on Monday");
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_empty_window_expires_quietly() {
        let mut transport = MockTransport::silent();
        let (tx, mut rx) = mpsc::channel(8);

        let started = Instant::now();
        let delivered = MonitorSession::new(&mut transport, POLL)
            .run(Duration::from_secs(3), &tx)
            .await
            .unwrap();

        assert_eq!(delivered, 0);
        assert_eq!(started.elapsed(), Duration::from_secs(3));
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_malformed_frame_is_skipped() {
        let mut transport = MockTransport::scripted(vec![
            (Duration::from_millis(500), Bytes::from_static(&[1, 2, 3])),
            (Duration::from_secs(2), update_frame("Cancelled booking 1000")),
        ]);
        let (tx, mut rx) = mpsc::channel(8);

        let delivered = MonitorSession::new(&mut transport, POLL)
            .run(Duration::from_secs(4), &tx)
            .await
            .unwrap();

        assert_eq!(delivered, 1);
        assert_eq!(rx.try_recv().unwrap().message, "Cancelled booking 1000");
    }

    #[tokio::test(start_paused = true)]
    async fn test_final_poll_is_clamped_to_expiry() {
        let mut transport = MockTransport::silent();
        let (tx, _rx) = mpsc::channel(8);

        let started = Instant::now();
        MonitorSession::new(&mut transport, POLL)
            .run(Duration::from_millis(2500), &tx)
            .await
            .unwrap();

        assert_eq!(started.elapsed(), Duration::from_millis(2500));
    }
}
