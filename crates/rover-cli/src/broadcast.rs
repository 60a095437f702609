//! Best-effort TCP status broadcast.
//!
//! Dials the configured address fresh for every report and writes the
//! status block padded into a fixed 100-byte buffer, the framing the
//! listening dongle expects. Connect and write failures bubble up as
//! transport errors; the reporter logs them and carries on.

use rover_control::reporter::StatusSink;
use rover_types::RoverError;
use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;

/// On-wire size of one status report.
pub const STATUS_BUFFER_LEN: usize = 100;

pub struct TcpStatusSink {
    addr: String,
}

impl TcpStatusSink {
    pub fn new(addr: &str) -> Self {
        Self {
            addr: addr.to_string(),
        }
    }

    /// Pad (or truncate) a status block into the fixed wire buffer.
    fn frame(status: &str) -> [u8; STATUS_BUFFER_LEN] {
        let mut buf = [0u8; STATUS_BUFFER_LEN];
        let bytes = status.as_bytes();
        let n = bytes.len().min(STATUS_BUFFER_LEN);
        buf[..n].copy_from_slice(&bytes[..n]);
        buf
    }
}

#[async_trait::async_trait]
impl StatusSink for TcpStatusSink {
    async fn publish(&self, status: &str) -> Result<(), RoverError> {
        let mut stream = TcpStream::connect(&self.addr)
            .await
            .map_err(|e| RoverError::transport("broadcast", e))?;
        stream
            .write_all(&Self::frame(status))
            .await
            .map_err(|e| RoverError::transport("broadcast", e))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::AsyncReadExt;
    use tokio::net::TcpListener;

    #[test]
    fn frame_pads_with_zeroes() {
        let buf = TcpStatusSink::frame("speed: 1\n");
        assert_eq!(&buf[..9], b"speed: 1\n");
        assert!(buf[9..].iter().all(|&b| b == 0));
    }

    #[test]
    fn frame_truncates_oversized_blocks() {
        let long = "x".repeat(500);
        let buf = TcpStatusSink::frame(&long);
        assert_eq!(buf.len(), STATUS_BUFFER_LEN);
        assert!(buf.iter().all(|&b| b == b'x'));
    }

    #[tokio::test]
    async fn publish_delivers_a_full_buffer() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let sink = TcpStatusSink::new(&addr.to_string());
        let publisher = tokio::spawn(async move { sink.publish("mode: 32, orders\n").await });

        let (mut conn, _) = listener.accept().await.unwrap();
        let mut received = Vec::new();
        conn.read_to_end(&mut received).await.unwrap();

        publisher.await.unwrap().unwrap();
        assert_eq!(received.len(), STATUS_BUFFER_LEN);
        assert!(received.starts_with(b"mode: 32, orders\n"));
    }

    #[tokio::test]
    async fn publish_to_nobody_is_a_transport_error() {
        // Bind then drop to get a port with no listener.
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let sink = TcpStatusSink::new(&addr.to_string());
        assert!(sink.publish("speed: 0\n").await.is_err());
    }
}
