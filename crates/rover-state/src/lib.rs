//! Shared telemetry blackboard.
//!
//! One owned container for the last-known scalar readings: the three sonar
//! distances and the controller mode (written by command ingress), the
//! commanded speed (written by the decision loop), and the most recent
//! perception verdict (written by the perception task only).
//!
//! # Concurrency discipline
//!
//! Every field is an independent atomic scalar accessed only through the
//! typed get/set methods below, with relaxed ordering. Each write is
//! independently and immediately visible; there is **no cross-field
//! consistency** — a reader may pair this tick's verdict with a distance
//! reading taken at a different instant. That matches the control model:
//! each scalar is the freshest value available, and the decision loop is
//! tolerant of one-tick skew by construction. Anything needing a coherent
//! multi-field view would need a different container.

use std::sync::atomic::{AtomicU8, Ordering};

use rover_types::{DIST_FAR, PerceptionVerdict, TelemetrySnapshot};

/// Last-known telemetry scalars plus the latest perception verdict.
///
/// Cheap to share: wrap in an `Arc` and hand a clone of the handle to every
/// task.
#[derive(Debug)]
pub struct Blackboard {
    dist_left: AtomicU8,
    dist_center: AtomicU8,
    dist_right: AtomicU8,
    mode: AtomicU8,
    speed: AtomicU8,
    verdict: AtomicU8,
}

impl Blackboard {
    /// Fresh blackboard: distances start at [`DIST_FAR`] so the decision
    /// loop does not run an obstacle recovery before the first sensor
    /// report arrives; mode starts at `nothing` (wire `0x00`), speed at 0,
    /// verdict at no-consensus.
    pub fn new() -> Self {
        Self {
            dist_left: AtomicU8::new(DIST_FAR),
            dist_center: AtomicU8::new(DIST_FAR),
            dist_right: AtomicU8::new(DIST_FAR),
            mode: AtomicU8::new(0x00),
            speed: AtomicU8::new(0),
            verdict: AtomicU8::new(PerceptionVerdict::NoConsensus.as_u8()),
        }
    }

    pub fn dist_left(&self) -> u8 {
        self.dist_left.load(Ordering::Relaxed)
    }

    pub fn set_dist_left(&self, v: u8) {
        self.dist_left.store(v, Ordering::Relaxed);
    }

    pub fn dist_center(&self) -> u8 {
        self.dist_center.load(Ordering::Relaxed)
    }

    pub fn set_dist_center(&self, v: u8) {
        self.dist_center.store(v, Ordering::Relaxed);
    }

    pub fn dist_right(&self) -> u8 {
        self.dist_right.load(Ordering::Relaxed)
    }

    pub fn set_dist_right(&self, v: u8) {
        self.dist_right.store(v, Ordering::Relaxed);
    }

    /// Raw wire id of the controller's reported mode.
    pub fn mode(&self) -> u8 {
        self.mode.load(Ordering::Relaxed)
    }

    pub fn set_mode(&self, wire_id: u8) {
        self.mode.store(wire_id, Ordering::Relaxed);
    }

    /// Last speed the decision loop commanded.
    pub fn speed(&self) -> u8 {
        self.speed.load(Ordering::Relaxed)
    }

    pub fn set_speed(&self, v: u8) {
        self.speed.store(v, Ordering::Relaxed);
    }

    /// Most recent perception verdict. Defaults to no-consensus until the
    /// first frame has been classified.
    pub fn verdict(&self) -> PerceptionVerdict {
        PerceptionVerdict::from_u8(self.verdict.load(Ordering::Relaxed))
    }

    /// Written by the perception task only; each frame's verdict replaces
    /// the previous one, no history is kept.
    pub fn set_verdict(&self, v: PerceptionVerdict) {
        self.verdict.store(v.as_u8(), Ordering::Relaxed);
    }

    /// Copy the scalar fields into a [`TelemetrySnapshot`].
    ///
    /// Each field is read independently; the snapshot is not a transaction
    /// (see the module-level discipline note).
    pub fn snapshot(&self) -> TelemetrySnapshot {
        TelemetrySnapshot {
            mode: self.mode(),
            speed: self.speed(),
            dist_left: self.dist_left(),
            dist_center: self.dist_center(),
            dist_right: self.dist_right(),
        }
    }
}

impl Default for Blackboard {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn fresh_board_reads_far_and_idle() {
        let board = Blackboard::new();
        assert_eq!(board.dist_left(), DIST_FAR);
        assert_eq!(board.dist_center(), DIST_FAR);
        assert_eq!(board.dist_right(), DIST_FAR);
        assert_eq!(board.mode(), 0x00);
        assert_eq!(board.speed(), 0);
        assert_eq!(board.verdict(), PerceptionVerdict::NoConsensus);
    }

    #[test]
    fn writes_are_independently_visible() {
        let board = Blackboard::new();
        board.set_dist_center(42);
        assert_eq!(board.dist_center(), 42);
        // Neighbouring fields untouched.
        assert_eq!(board.dist_left(), DIST_FAR);
        assert_eq!(board.dist_right(), DIST_FAR);

        board.set_mode(0x20);
        board.set_speed(127);
        board.set_verdict(PerceptionVerdict::Forward);

        let snap = board.snapshot();
        assert_eq!(snap.mode, 0x20);
        assert_eq!(snap.speed, 127);
        assert_eq!(snap.dist_center, 42);
        assert_eq!(board.verdict(), PerceptionVerdict::Forward);
    }

    #[test]
    fn concurrent_writers_do_not_corrupt_fields() {
        let board = Arc::new(Blackboard::new());

        let ingress = {
            let board = Arc::clone(&board);
            std::thread::spawn(move || {
                for i in 0..1000u32 {
                    board.set_dist_center((i % 200) as u8);
                }
            })
        };
        let pilot = {
            let board = Arc::clone(&board);
            std::thread::spawn(move || {
                for _ in 0..1000 {
                    board.set_speed(127);
                }
            })
        };

        ingress.join().unwrap();
        pilot.join().unwrap();

        // Last writes win; every read is a value some writer stored.
        assert!(board.dist_center() < 200);
        assert_eq!(board.speed(), 127);
    }
}
