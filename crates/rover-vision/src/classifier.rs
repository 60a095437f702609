//! Segment-wise bright-patch classifier.
//!
//! The frame is split into three vertical segments of `width / 3` columns.
//! A pixel qualifies when all three channels sit at or above the qualify
//! threshold — a wide bright-patch detector, not a colour test. Each
//! qualifying pixel tallies into the segment its column falls in, columns
//! at or beyond `2 × segment` count as the right segment (so up to two
//! remainder columns land there when the width is not divisible by three —
//! an accepted approximation that can push the right percentage past 100).
//!
//! Percentages are of segment capacity (`segment width × height`). The
//! verdict rules run in strict priority order, first match wins:
//!
//! 1. left ≥ 95 → victory
//! 2. right strictly greatest and ≥ 59 → steer left
//! 3. left strictly greatest and ≥ 59 → steer right
//! 4. middle strictly greatest and ≥ 59 → forward
//! 5. otherwise → no consensus
//!
//! Ties never satisfy a strict-greater rule, so they fall through to
//! no-consensus. Classification is pure: identical buffers always produce
//! identical verdicts.

use rover_types::{PerceptionVerdict, RoverError};
use tracing::debug;

use crate::camera::Frame;

/// Minimum per-channel brightness for a pixel to count (of 255).
pub const QUALIFY_THRESHOLD: u8 = 83;
/// Left-segment percentage that declares the finish marker.
pub const VICTORY_THRESHOLD: f64 = 95.0;
/// Minimum winning-segment percentage for a steering verdict.
pub const DIRECTION_THRESHOLD: f64 = 59.0;

/// Converts a [`Frame`] into a [`PerceptionVerdict`].
#[derive(Debug, Clone)]
pub struct Classifier {
    qualify: u8,
    victory: f64,
    direction: f64,
}

impl Classifier {
    /// Classifier with the stock thresholds.
    pub fn new() -> Self {
        Self::with_thresholds(QUALIFY_THRESHOLD, VICTORY_THRESHOLD, DIRECTION_THRESHOLD)
    }

    /// Classifier with custom thresholds, for tuning against a different
    /// track or lighting rig.
    pub fn with_thresholds(qualify: u8, victory: f64, direction: f64) -> Self {
        Self {
            qualify,
            victory,
            direction,
        }
    }

    /// Classify one frame.
    ///
    /// # Errors
    ///
    /// Returns [`RoverError::BadFrame`] when the frame fails
    /// [`Frame::validate`]; the pixel loop is never entered on a malformed
    /// buffer.
    pub fn classify(&self, frame: &Frame) -> Result<PerceptionVerdict, RoverError> {
        frame.validate()?;

        let [left, middle, right] = self.segment_percentages(frame);

        let verdict = if left >= self.victory {
            PerceptionVerdict::Victory
        } else if right > middle && right > left && right >= self.direction {
            // Bright right segment steers left; see the verdict type docs
            // for the mapping rationale.
            PerceptionVerdict::SteerLeft
        } else if left > middle && left > right && left >= self.direction {
            PerceptionVerdict::SteerRight
        } else if middle > left && middle > right && middle >= self.direction {
            PerceptionVerdict::Forward
        } else {
            PerceptionVerdict::NoConsensus
        };

        debug!(
            left_pct = left,
            middle_pct = middle,
            right_pct = right,
            ?verdict,
            "frame classified"
        );

        Ok(verdict)
    }

    /// Percentage of qualifying pixels per segment, `[left, middle, right]`.
    ///
    /// Caller must have validated the frame; `segment` and `height` are
    /// non-zero here.
    fn segment_percentages(&self, frame: &Frame) -> [f64; 3] {
        let segment = frame.width / 3;
        let mut counts = [0u64; 3];

        for row in 0..frame.height {
            let base = row * frame.stride;
            for col in 0..frame.width {
                let px = base + col * frame.channels;
                if frame.data[px] >= self.qualify
                    && frame.data[px + 1] >= self.qualify
                    && frame.data[px + 2] >= self.qualify
                {
                    let idx = if col >= segment * 2 {
                        2
                    } else if col >= segment {
                        1
                    } else {
                        0
                    };
                    counts[idx] += 1;
                }
            }
        }

        let capacity = (segment * frame.height) as f64;
        counts.map(|c| 100.0 * c as f64 / capacity)
    }
}

impl Default for Classifier {
    fn default() -> Self {
        Self::new()
    }
}
