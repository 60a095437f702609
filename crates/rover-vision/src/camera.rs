//! [`Frame`] buffer type and the generic [`Camera`] trait.

use rover_types::RoverError;

/// A raw interleaved pixel buffer with explicit row stride.
///
/// Channel layout is BGR-style: three channels per pixel, channel index 2
/// being the red-like channel. The classifier tests all three channels, so
/// the exact ordering only matters to capture plumbing.
#[derive(Debug, Clone)]
pub struct Frame {
    /// Frame width in pixels.
    pub width: usize,
    /// Frame height in pixels.
    pub height: usize,
    /// Bytes per row; may exceed `width * channels` for padded buffers.
    pub stride: usize,
    /// Channels per pixel; always 3 for supported captures.
    pub channels: usize,
    /// Interleaved pixel data, `stride` bytes per row.
    pub data: Vec<u8>,
}

impl Frame {
    /// Build a tightly packed 3-channel frame.
    pub fn packed(width: usize, height: usize, data: Vec<u8>) -> Self {
        Self {
            width,
            height,
            stride: width * 3,
            channels: 3,
            data,
        }
    }

    /// Check the geometry invariants the pixel loop relies on.
    ///
    /// # Errors
    ///
    /// [`RoverError::BadFrame`] when the frame is too small to split into
    /// three segments (width < 3), has zero height, is not 3-channel, has
    /// a stride shorter than a row, or the buffer does not cover every
    /// addressable pixel. Rejecting these here keeps division and indexing
    /// in the classifier total.
    pub fn validate(&self) -> Result<(), RoverError> {
        if self.width < 3 || self.height == 0 {
            return Err(RoverError::BadFrame(format!(
                "frame too small: {}x{}",
                self.width, self.height
            )));
        }
        if self.channels != 3 {
            return Err(RoverError::BadFrame(format!(
                "expected 3 channels, got {}",
                self.channels
            )));
        }
        if self.stride < self.width * self.channels {
            return Err(RoverError::BadFrame(format!(
                "stride {} shorter than row of {} pixels",
                self.stride, self.width
            )));
        }
        let needed = self.stride * (self.height - 1) + self.width * self.channels;
        if self.data.len() < needed {
            return Err(RoverError::BadFrame(format!(
                "buffer holds {} bytes, geometry needs {}",
                self.data.len(),
                needed
            )));
        }
        Ok(())
    }
}

/// A camera or image-capture device.
///
/// Device access (V4L2, OpenCV, …) is plumbing outside this crate; drivers
/// implement the trait and the perception task only ever talks to it.
pub trait Camera: Send {
    /// Stable identifier for this camera, e.g. `"front_rgb"`.
    fn id(&self) -> &str;

    /// Capture and return the next available frame.
    ///
    /// # Errors
    ///
    /// Returns [`RoverError::Transport`] when the frame cannot be captured
    /// (device disconnected, buffer unavailable).
    fn capture(&mut self) -> Result<Frame, RoverError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn packed_frame_validates() {
        let frame = Frame::packed(6, 2, vec![0u8; 6 * 2 * 3]);
        assert!(frame.validate().is_ok());
    }

    #[test]
    fn zero_height_is_rejected() {
        let frame = Frame::packed(6, 0, vec![]);
        assert!(frame.validate().is_err());
    }

    #[test]
    fn width_under_three_is_rejected() {
        // Two columns cannot be split into three segments.
        let frame = Frame::packed(2, 4, vec![0u8; 2 * 4 * 3]);
        assert!(frame.validate().is_err());
    }

    #[test]
    fn short_buffer_is_rejected() {
        let mut frame = Frame::packed(6, 2, vec![0u8; 6 * 2 * 3]);
        frame.data.truncate(10);
        assert!(frame.validate().is_err());
    }

    #[test]
    fn padded_stride_is_accepted() {
        let stride = 6 * 3 + 4; // 4 bytes of row padding
        let frame = Frame {
            width: 6,
            height: 2,
            stride,
            channels: 3,
            data: vec![0u8; stride * 2],
        };
        assert!(frame.validate().is_ok());
    }
}
