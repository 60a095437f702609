//! Telemetry reporter: periodic human-readable status broadcast.
//!
//! Serialises the blackboard into a flat text block and hands it to a
//! [`StatusSink`] on a fixed cadence. Sink failures are logged and the
//! loop continues — best effort, no retry, no backoff.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use rover_state::Blackboard;
use rover_types::{DIST_FAR, OperatingState, RoverError, TelemetrySnapshot};
use tracing::{info, warn};

use crate::shutdown::Shutdown;

/// Rendered in place of a distance that reads at or beyond sensor range.
pub const OUT_OF_RANGE_TEXT: &str = "Far, far, away...";

/// Transport for rendered status blocks.
#[async_trait]
pub trait StatusSink: Send + Sync {
    /// Deliver one status block. Best effort; the reporter logs failures
    /// and moves on.
    async fn publish(&self, status: &str) -> Result<(), RoverError>;
}

/// Render the status block.
///
/// One `key: value` pair per line; the mode line carries both the raw wire
/// id and the resolved name (empty for an unknown id), and out-of-range
/// distances render as [`OUT_OF_RANGE_TEXT`], never as the numeral 255.
pub fn render_status(snapshot: &TelemetrySnapshot) -> String {
    let mode = OperatingState::from_wire(snapshot.mode);
    format!(
        "mode: {}, {}\nspeed: {}\ndistance.center: {}\ndistance.left: {}\ndistance.right: {}\n",
        snapshot.mode,
        mode.name(),
        snapshot.speed,
        render_distance(snapshot.dist_center),
        render_distance(snapshot.dist_left),
        render_distance(snapshot.dist_right),
    )
}

fn render_distance(d: u8) -> String {
    if d < DIST_FAR {
        d.to_string()
    } else {
        OUT_OF_RANGE_TEXT.to_string()
    }
}

/// Run the reporter until shutdown.
pub async fn run(
    board: Arc<Blackboard>,
    sink: Arc<dyn StatusSink>,
    interval: Duration,
    mut shutdown: Shutdown,
) {
    info!(?interval, "telemetry reporter started");

    while !shutdown.is_triggered() {
        let status = render_status(&board.snapshot());
        if let Err(e) = sink.publish(&status).await {
            warn!(error = %e, "status broadcast failed; will retry next interval");
        }

        if !shutdown.sleep(interval).await {
            return;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::Mutex;

    #[test]
    fn status_block_renders_every_field_in_order() {
        let snapshot = TelemetrySnapshot {
            mode: OperatingState::Orders.wire(),
            speed: 127,
            dist_left: 60,
            dist_center: 80,
            dist_right: 42,
        };
        assert_eq!(
            render_status(&snapshot),
            "mode: 32, orders\n\
             speed: 127\n\
             distance.center: 80\n\
             distance.left: 60\n\
             distance.right: 42\n"
        );
    }

    #[test]
    fn out_of_range_distance_renders_as_text_not_numeral() {
        let snapshot = TelemetrySnapshot {
            mode: 0x00,
            speed: 0,
            dist_left: DIST_FAR,
            dist_center: 10,
            dist_right: 254,
        };
        let status = render_status(&snapshot);
        assert!(status.contains(&format!("distance.left: {OUT_OF_RANGE_TEXT}")));
        assert!(!status.contains("distance.left: 255"));
        // 254 is still a numeral.
        assert!(status.contains("distance.right: 254"));
    }

    #[test]
    fn unknown_mode_renders_with_empty_name() {
        let snapshot = TelemetrySnapshot {
            mode: 0x42,
            speed: 0,
            dist_left: 1,
            dist_center: 1,
            dist_right: 1,
        };
        assert!(render_status(&snapshot).starts_with("mode: 66, \n"));
    }

    /// Sink that fails every publish; the reporter must keep looping.
    struct FailingSink {
        attempts: Mutex<u32>,
    }

    #[async_trait]
    impl StatusSink for FailingSink {
        async fn publish(&self, _status: &str) -> Result<(), RoverError> {
            *self.attempts.lock().await += 1;
            Err(RoverError::transport("broadcast", "connection refused"))
        }
    }

    #[tokio::test]
    async fn sink_failures_do_not_stop_the_loop() {
        let board = Arc::new(Blackboard::new());
        let sink = Arc::new(FailingSink {
            attempts: Mutex::new(0),
        });
        let (handle, shutdown) = crate::shutdown::channel();

        let task = tokio::spawn(run(
            board,
            Arc::clone(&sink) as Arc<dyn StatusSink>,
            Duration::from_millis(2),
            shutdown,
        ));

        tokio::time::sleep(Duration::from_millis(10)).await;
        handle.trigger();
        task.await.unwrap();

        // More than one attempt: the first failure did not end the loop.
        assert!(*sink.attempts.lock().await > 1);
    }
}
