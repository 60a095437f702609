//! Transmission seam between command producers and the serial channel.
//!
//! The decision loop and the interactive shell both issue frames; the
//! physical channel is a single half-duplex byte stream, so transmissions
//! are serialised behind one [`CommandSink`]. Replies from the controller
//! are *not* correlated with requests — command ingress matches purely on
//! opcode identity.

use std::sync::Arc;

use async_trait::async_trait;
use rover_proto::{FrameWriter, Opcode};
use rover_types::RoverError;
use tokio::io::AsyncWrite;
use tokio::sync::Mutex;

/// Anything that can transmit a 2-byte command frame.
#[async_trait]
pub trait CommandSink: Send + Sync {
    /// Transmit one frame.
    ///
    /// # Errors
    ///
    /// [`RoverError::Transport`] when the underlying channel fails. Callers
    /// log and continue; a failed transmission never stops a control loop.
    async fn send(&self, opcode: Opcode, value: u8) -> Result<(), RoverError>;
}

/// Production sink: a [`FrameWriter`] behind a mutex so the pilot and the
/// shell interleave whole frames, never half of one.
pub struct SerialCommandSink<W> {
    writer: Mutex<FrameWriter<W>>,
}

impl<W: AsyncWrite + Unpin + Send> SerialCommandSink<W> {
    pub fn new(writer: FrameWriter<W>) -> Arc<Self> {
        Arc::new(Self {
            writer: Mutex::new(writer),
        })
    }
}

#[async_trait]
impl<W: AsyncWrite + Unpin + Send> CommandSink for SerialCommandSink<W> {
    async fn send(&self, opcode: Opcode, value: u8) -> Result<(), RoverError> {
        self.writer.lock().await.send(opcode, value).await
    }
}
