//! Perception task: capture, classify, publish.
//!
//! Each pass captures one frame, classifies it, and overwrites the
//! blackboard verdict — no history, the latest frame always wins. Capture
//! and classification failures drop the frame and leave the previous
//! verdict standing.

use std::sync::Arc;
use std::time::Duration;

use rover_state::Blackboard;
use rover_vision::{Camera, Classifier};
use tracing::{info, warn};

use crate::shutdown::Shutdown;

/// Pause between processed frames. The camera paces capture itself; this
/// just keeps a failing capture from spinning the task hot.
pub const FRAME_PAUSE: Duration = Duration::from_millis(1);

/// Run perception until shutdown.
pub async fn run<C: Camera>(
    mut camera: C,
    classifier: Classifier,
    board: Arc<Blackboard>,
    frame_pause: Duration,
    mut shutdown: Shutdown,
) {
    info!(camera = camera.id(), "perception task started");

    while !shutdown.is_triggered() {
        match camera.capture() {
            Ok(frame) => match classifier.classify(&frame) {
                Ok(verdict) => board.set_verdict(verdict),
                Err(e) => warn!(error = %e, "dropping malformed frame"),
            },
            Err(e) => warn!(error = %e, "frame capture failed"),
        }

        if !shutdown.sleep(frame_pause).await {
            return;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rover_types::{PerceptionVerdict, RoverError};
    use rover_vision::{Frame, SimCamera, SimScene};

    #[tokio::test]
    async fn verdicts_reach_the_blackboard() {
        let board = Arc::new(Blackboard::new());
        let (handle, shutdown) = crate::shutdown::channel();
        let camera = SimCamera::new(96, 32, SimScene::FinishMarker);

        let task = tokio::spawn(run(
            camera,
            Classifier::new(),
            Arc::clone(&board),
            FRAME_PAUSE,
            shutdown,
        ));

        tokio::time::sleep(Duration::from_millis(10)).await;
        handle.trigger();
        task.await.unwrap();

        assert_eq!(board.verdict(), PerceptionVerdict::Victory);
    }

    /// Camera producing buffers the classifier must reject.
    struct BrokenCamera;

    impl Camera for BrokenCamera {
        fn id(&self) -> &str {
            "broken"
        }

        fn capture(&mut self) -> Result<Frame, RoverError> {
            Ok(Frame::packed(0, 0, vec![]))
        }
    }

    #[tokio::test]
    async fn malformed_frames_leave_previous_verdict_standing() {
        let board = Arc::new(Blackboard::new());
        board.set_verdict(PerceptionVerdict::Forward);
        let (handle, shutdown) = crate::shutdown::channel();

        let task = tokio::spawn(run(
            BrokenCamera,
            Classifier::new(),
            Arc::clone(&board),
            FRAME_PAUSE,
            shutdown,
        ));

        tokio::time::sleep(Duration::from_millis(10)).await;
        handle.trigger();
        task.await.unwrap();

        assert_eq!(board.verdict(), PerceptionVerdict::Forward);
    }
}
