//! Async frame transport over any byte channel.
//!
//! [`FrameWriter`] and [`FrameReader`] are generic over tokio's I/O traits
//! so the same codec drives the physical serial device, an in-memory pipe
//! in tests, or anything else that moves bytes.
//!
//! Every outgoing frame is logged before transmission. The physical system
//! has no other feedback channel for commands sent, so this trace is part
//! of the operator contract, not optional diagnostics.

use rover_types::RoverError;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tracing::info;

use crate::{Frame, Opcode};

/// Writes 2-byte frames to an underlying byte sink.
pub struct FrameWriter<W> {
    inner: W,
    /// Channel label used in error and log context, e.g. `"serial"`.
    channel: String,
}

impl<W: AsyncWrite + Unpin> FrameWriter<W> {
    pub fn new(inner: W, channel: &str) -> Self {
        Self {
            inner,
            channel: channel.to_string(),
        }
    }

    /// Encode and transmit one frame, logging it first.
    ///
    /// # Errors
    ///
    /// Returns [`RoverError::Transport`] when the underlying write fails;
    /// the frame may have been partially transmitted in that case.
    pub async fn send(&mut self, opcode: Opcode, value: u8) -> Result<(), RoverError> {
        info!(
            command = opcode.name(),
            opcode = format_args!("0x{:02X}", opcode.wire()),
            value,
            value_hex = format_args!("0x{:02X}", value),
            "sending command"
        );

        let bytes = Frame::new(opcode, value).encode();
        self.inner
            .write_all(&bytes)
            .await
            .map_err(|e| RoverError::transport(&self.channel, e))?;
        self.inner
            .flush()
            .await
            .map_err(|e| RoverError::transport(&self.channel, e))?;
        Ok(())
    }
}

/// Reads protocol bytes from an underlying byte source.
///
/// The stream is not self-synchronising: a dropped byte shifts every
/// following frame. Callers decide per opcode whether a value byte follows
/// (see the command-ingress task).
pub struct FrameReader<R> {
    inner: R,
    channel: String,
}

impl<R: AsyncRead + Unpin> FrameReader<R> {
    pub fn new(inner: R, channel: &str) -> Self {
        Self {
            inner,
            channel: channel.to_string(),
        }
    }

    /// Read one opcode byte. `Ok(None)` on clean end of stream.
    pub async fn read_opcode(&mut self) -> Result<Option<Opcode>, RoverError> {
        Ok(self.read_byte().await?.map(Opcode::from_wire))
    }

    /// Read one argument byte. `Ok(None)` on clean end of stream.
    pub async fn read_value(&mut self) -> Result<Option<u8>, RoverError> {
        self.read_byte().await
    }

    async fn read_byte(&mut self) -> Result<Option<u8>, RoverError> {
        let mut buf = [0u8; 1];
        match self.inner.read(&mut buf).await {
            Ok(0) => Ok(None),
            Ok(_) => Ok(Some(buf[0])),
            Err(e) => Err(RoverError::transport(&self.channel, e)),
        }
    }
}
