//! Decision loop: telemetry plus verdict in, prioritised commands out.
//!
//! Once per tick the pilot reads the blackboard and plans exactly one
//! [`Maneuver`], evaluated in strict priority order:
//!
//! 1. victory verdict → dance, dwell, back to orders (blocks this task for
//!    the dwell; every other task keeps running)
//! 2. obstacle dead ahead (center < 35) → fixed recovery sequence
//! 3. left wall close (< 55) or steer-right verdict → soft turn right
//! 4. right wall close (< 55) or steer-left verdict → soft turn left
//! 5. otherwise → clear the turn, cruise speed, forward
//!
//! The branches are mutually exclusive by construction; the obstacle branch
//! always preempts the steering branches regardless of verdict. Planning is
//! a pure function so every branch is testable without I/O; the async task
//! expands the manoeuvre into [`Step`]s and pushes them through a
//! [`CommandSink`], recording each speed it commands back onto the
//! blackboard.

use std::sync::Arc;
use std::time::Duration;

use rover_proto::Opcode;
use rover_state::Blackboard;
use rover_types::{Move, OperatingState, PerceptionVerdict, TelemetrySnapshot, Turn};
use tracing::{debug, info, warn};

use crate::shutdown::Shutdown;
use crate::sink::CommandSink;

// ─────────────────────────────────────────────────────────────────────────────
// Thresholds and defaults
// ─────────────────────────────────────────────────────────────────────────────

/// Center distance below which the obstacle recovery fires.
pub const OBSTACLE_THRESHOLD: u8 = 35;
/// Side distance below which a soft turn away from the wall fires.
pub const SIDE_THRESHOLD: u8 = 55;
/// Default cruise speed commanded when the track is clear.
pub const CRUISE_SPEED: u8 = 127;

/// Timing and speed knobs for the decision loop.
#[derive(Debug, Clone)]
pub struct PilotConfig {
    /// Cadence of the decision loop.
    pub tick: Duration,
    /// How long the victory dance holds before resuming orders.
    pub dwell: Duration,
    /// Pause between the stages of the obstacle recovery.
    pub recovery_pause: Duration,
    /// Speed commanded when cruising and when resuming after recovery.
    pub cruise_speed: u8,
}

impl Default for PilotConfig {
    fn default() -> Self {
        Self {
            tick: Duration::from_secs(1),
            dwell: Duration::from_secs(10),
            recovery_pause: Duration::from_secs(1),
            cruise_speed: CRUISE_SPEED,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Planning
// ─────────────────────────────────────────────────────────────────────────────

/// The single manoeuvre chosen for one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Maneuver {
    /// Dance, dwell, resume orders.
    VictoryDance,
    /// Stop, pause, resume speed, hard-turn left, pause, clear the turn.
    ObstacleRecovery,
    SoftTurnRight,
    SoftTurnLeft,
    /// Clear any turn, cruise speed, forward.
    Cruise,
}

/// One unit of manoeuvre execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Transmit a frame.
    Send(Opcode, u8),
    /// Hold for a fixed interval (cancellation-aware at runtime).
    Pause(Duration),
}

/// Pick the tick's manoeuvre. Pure; strict priority order, first match
/// wins.
pub fn plan(snapshot: &TelemetrySnapshot, verdict: PerceptionVerdict) -> Maneuver {
    if verdict == PerceptionVerdict::Victory {
        Maneuver::VictoryDance
    } else if snapshot.dist_center < OBSTACLE_THRESHOLD {
        Maneuver::ObstacleRecovery
    } else if snapshot.dist_left < SIDE_THRESHOLD || verdict == PerceptionVerdict::SteerRight {
        Maneuver::SoftTurnRight
    } else if snapshot.dist_right < SIDE_THRESHOLD || verdict == PerceptionVerdict::SteerLeft {
        Maneuver::SoftTurnLeft
    } else {
        Maneuver::Cruise
    }
}

/// Expand a manoeuvre into its fixed step sequence.
pub fn steps(maneuver: Maneuver, config: &PilotConfig) -> Vec<Step> {
    match maneuver {
        Maneuver::VictoryDance => vec![
            Step::Send(Opcode::State, OperatingState::Dance.wire()),
            Step::Pause(config.dwell),
            Step::Send(Opcode::State, OperatingState::Orders.wire()),
        ],
        Maneuver::ObstacleRecovery => vec![
            Step::Send(Opcode::Speed, 0),
            Step::Pause(config.recovery_pause),
            Step::Send(Opcode::Speed, config.cruise_speed),
            Step::Send(Opcode::HardTurn, Turn::Left.wire()),
            Step::Pause(config.recovery_pause),
            Step::Send(Opcode::HardTurn, Turn::None.wire()),
        ],
        Maneuver::SoftTurnRight => vec![Step::Send(Opcode::SoftTurn, Turn::Right.wire())],
        Maneuver::SoftTurnLeft => vec![Step::Send(Opcode::SoftTurn, Turn::Left.wire())],
        Maneuver::Cruise => vec![
            Step::Send(Opcode::HardTurn, Turn::None.wire()),
            Step::Send(Opcode::Speed, config.cruise_speed),
            Step::Send(Opcode::SetDirection, Move::Forward.wire()),
        ],
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Task
// ─────────────────────────────────────────────────────────────────────────────

/// Run the decision loop until shutdown.
///
/// Announces `state: orders` once, then plans and executes one manoeuvre
/// per tick. Transport failures are logged and the loop continues; only
/// shutdown ends it.
pub async fn run(
    board: Arc<Blackboard>,
    sink: Arc<dyn CommandSink>,
    config: PilotConfig,
    mut shutdown: Shutdown,
) {
    info!(tick = ?config.tick, cruise = config.cruise_speed, "decision loop started");

    transmit(&board, &sink, Opcode::State, OperatingState::Orders.wire()).await;

    while !shutdown.is_triggered() {
        let snapshot = board.snapshot();
        let verdict = board.verdict();
        let maneuver = plan(&snapshot, verdict);
        debug!(?maneuver, ?verdict, ?snapshot, "tick");

        for step in steps(maneuver, &config) {
            match step {
                Step::Send(opcode, value) => transmit(&board, &sink, opcode, value).await,
                Step::Pause(duration) => {
                    if !shutdown.sleep(duration).await {
                        return;
                    }
                }
            }
        }

        if !shutdown.sleep(config.tick).await {
            return;
        }
    }
}

/// Send one frame, mirroring commanded speeds onto the blackboard so the
/// telemetry reporter sees what the controller was last told.
async fn transmit(board: &Blackboard, sink: &Arc<dyn CommandSink>, opcode: Opcode, value: u8) {
    if opcode == Opcode::Speed {
        board.set_speed(value);
    }
    if let Err(e) = sink.send(opcode, value).await {
        warn!(error = %e, command = opcode.name(), "command transmission failed");
    }
}
