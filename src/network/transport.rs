use std::net::SocketAddr;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use tokio::net::UdpSocket;
use tracing::trace;

use crate::core::{Error, Result, MAX_DATAGRAM_SIZE};

/// Datagram capability the protocol layers run on: fire-and-forget send plus
/// a bounded receive. Exclusively owned by the active controller or monitor
/// session for the duration of its operation.
#[async_trait]
pub trait Transport: Send {
    /// Sends one frame to the remote endpoint
    async fn send(&mut self, frame: &[u8]) -> Result<()>;

    /// Waits up to `wait` for one datagram; `None` means the wait elapsed
    async fn recv(&mut self, wait: Duration) -> Result<Option<Bytes>>;
}

/// UDP transport bound to an ephemeral local port and connected to the
/// remote endpoint supplied once at session start.
pub struct UdpTransport {
    socket: UdpSocket,
    recv_buf: [u8; MAX_DATAGRAM_SIZE],
}

impl UdpTransport {
    /// Binds a local socket and connects it to the server endpoint
    pub async fn connect(server_addr: SocketAddr) -> Result<Self> {
        let socket = UdpSocket::bind("0.0.0.0:0")
            .await
            .map_err(|e| Error::transport(format!("Failed to bind socket: {}", e)))?;
        socket
            .connect(server_addr)
            .await
            .map_err(|e| Error::transport(format!("Failed to connect to {}: {}", server_addr, e)))?;

        Ok(UdpTransport {
            socket,
            recv_buf: [0u8; MAX_DATAGRAM_SIZE],
        })
    }

    /// Returns the local socket address
    pub fn local_addr(&self) -> Result<SocketAddr> {
        self.socket
            .local_addr()
            .map_err(|e| Error::transport(format!("Failed to get local address: {}", e)))
    }
}

#[async_trait]
impl Transport for UdpTransport {
    async fn send(&mut self, frame: &[u8]) -> Result<()> {
        let sent = self
            .socket
            .send(frame)
            .await
            .map_err(|e| Error::transport(format!("Failed to send datagram: {}", e)))?;
        trace!(bytes = sent, "sent datagram");
        Ok(())
    }

    async fn recv(&mut self, wait: Duration) -> Result<Option<Bytes>> {
        match tokio::time::timeout(wait, self.socket.recv(&mut self.recv_buf)).await {
            Ok(Ok(size)) => {
                trace!(bytes = size, "received datagram");
                Ok(Some(Bytes::copy_from_slice(&self.recv_buf[..size])))
            }
            Ok(Err(e)) => Err(Error::transport(format!(
                "Failed to receive datagram: {}",
                e
            ))),
            Err(_) => Ok(None),
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use tokio_test::assert_ok;

    #[tokio::test]
    async fn test_loopback_exchange() {
        let server = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        let server_addr = server.local_addr().unwrap();

        let mut transport = UdpTransport::connect(server_addr).await.unwrap();
        assert_ne!(transport.local_addr().unwrap(), server_addr);

        assert_ok!(transport.send(b"ping").await);

        let mut buf = [0u8; 64];
        let (size, client_addr) = server.recv_from(&mut buf).await.unwrap();
        assert_eq!(&buf[..size], b"ping");

        server.send_to(b"pong", client_addr).await.unwrap();
        let reply = transport.recv(Duration::from_secs(2)).await.unwrap();
        assert_eq!(reply.as_deref(), Some(&b"pong"[..]));
    }

    #[tokio::test]
    async fn test_recv_times_out() {
        let server = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        let mut transport = UdpTransport::connect(server.local_addr().unwrap())
            .await
            .unwrap();

        let reply = transport.recv(Duration::from_millis(50)).await.unwrap();
        assert!(reply.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_mock_schedule() {
        use super::testing::MockTransport;
        use tokio::time::Instant;

        let mut mock = MockTransport::scripted(vec![(
            Duration::from_secs(2),
            Bytes::from_static(b"update"),
        )]);

        let start = Instant::now();
        // First poll window ends before the frame is due.
        assert!(mock.recv(Duration::from_secs(1)).await.unwrap().is_none());
        // Second window covers t=2s.
        let frame = mock.recv(Duration::from_secs(1)).await.unwrap();
        assert_eq!(frame.as_deref(), Some(&b"update"[..]));
        assert_eq!(start.elapsed(), Duration::from_secs(2));
    }
}
