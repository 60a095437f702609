//! Command ingress: controller replies into the blackboard.
//!
//! Blocks reading one opcode byte at a time. Distance and mode reports
//! consume one value byte and update the matching blackboard field; any
//! other byte is discarded with **no value byte consumed** — the stream has
//! no framing beyond the opcode/value convention and cannot resynchronise
//! after a dropped byte. Replies are matched purely on opcode identity,
//! never correlated with an outstanding request.

use std::sync::Arc;

use rover_proto::{FrameReader, Opcode};
use rover_state::Blackboard;
use tokio::io::AsyncRead;
use tracing::{debug, info, warn};

use crate::shutdown::Shutdown;

/// Run ingress until the stream ends, a read fails, or shutdown fires.
///
/// Stream end and read failures stop this task with a warning; they never
/// take the process down.
pub async fn run<R: AsyncRead + Unpin>(
    mut reader: FrameReader<R>,
    board: Arc<Blackboard>,
    mut shutdown: Shutdown,
) {
    info!("command ingress started");

    loop {
        let opcode = tokio::select! {
            _ = shutdown.triggered() => return,
            result = reader.read_opcode() => match result {
                Ok(Some(opcode)) => opcode,
                Ok(None) => {
                    warn!("controller stream closed");
                    return;
                }
                Err(e) => {
                    warn!(error = %e, "controller read failed");
                    return;
                }
            },
        };

        match opcode {
            Opcode::DistLeft | Opcode::DistRight | Opcode::DistCenter | Opcode::Mode => {
                let value = match reader.read_value().await {
                    Ok(Some(value)) => value,
                    Ok(None) => {
                        warn!(command = opcode.name(), "stream closed mid-frame");
                        return;
                    }
                    Err(e) => {
                        warn!(error = %e, "controller read failed");
                        return;
                    }
                };
                debug!(command = opcode.name(), value, "telemetry update");
                match opcode {
                    Opcode::DistLeft => board.set_dist_left(value),
                    Opcode::DistRight => board.set_dist_right(value),
                    Opcode::DistCenter => board.set_dist_center(value),
                    Opcode::Mode => board.set_mode(value),
                    _ => unreachable!(),
                }
            }
            other => {
                debug!(
                    opcode = format_args!("0x{:02X}", other.wire()),
                    "unrecognised opcode discarded"
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rover_types::DIST_FAR;

    async fn run_over(bytes: &'static [u8]) -> Arc<Blackboard> {
        let board = Arc::new(Blackboard::new());
        let (_handle, shutdown) = crate::shutdown::channel();
        let reader = FrameReader::new(bytes, "test");
        run(reader, Arc::clone(&board), shutdown).await;
        board
    }

    #[tokio::test]
    async fn center_distance_report_updates_only_center() {
        let board = run_over(&[0xA1, 0x2A]).await;
        assert_eq!(board.dist_center(), 42);
        assert_eq!(board.dist_left(), DIST_FAR);
        assert_eq!(board.dist_right(), DIST_FAR);
    }

    #[tokio::test]
    async fn all_recognised_reports_land() {
        let board = run_over(&[0xA2, 10, 0xA3, 20, 0xA1, 30, 0x81, 0x20]).await;
        assert_eq!(board.dist_left(), 10);
        assert_eq!(board.dist_right(), 20);
        assert_eq!(board.dist_center(), 30);
        assert_eq!(board.mode(), 0x20);
    }

    #[tokio::test]
    async fn unrecognised_opcode_consumes_no_value_byte() {
        // 0x99 is discarded alone; the following bytes still parse as a
        // complete dist-center frame.
        let board = run_over(&[0x99, 0xA1, 0x2A]).await;
        assert_eq!(board.dist_center(), 42);
    }

    #[tokio::test]
    async fn stream_closing_mid_frame_leaves_state_untouched() {
        let board = run_over(&[0xA1]).await;
        assert_eq!(board.dist_center(), DIST_FAR);
    }

    #[tokio::test]
    async fn shutdown_stops_a_blocked_read() {
        let (client, _server) = tokio::io::duplex(8);
        let (handle, shutdown) = crate::shutdown::channel();
        let board = Arc::new(Blackboard::new());

        let task = tokio::spawn(run(FrameReader::new(client, "test"), board, shutdown));
        tokio::time::sleep(std::time::Duration::from_millis(2)).await;
        handle.trigger();

        tokio::time::timeout(std::time::Duration::from_secs(1), task)
            .await
            .expect("ingress ignored shutdown")
            .unwrap();
    }
}
