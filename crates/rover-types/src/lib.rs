//! Shared vocabulary for the RoverOS stack.
//!
//! Holds the symbolic tables spoken on the motor-controller wire
//! ([`OperatingState`], [`Turn`], [`Move`]), the classifier output type
//! ([`PerceptionVerdict`]), the telemetry snapshot exchanged between tasks,
//! and the global [`RoverError`] type.
//!
//! Every wire table carries an explicit unknown sentinel (`0xFF`) that is
//! distinct from every real value — in particular `OperatingState::Unknown`
//! never compares equal to `OperatingState::Nothing` (wire id `0x00`).
//! Lookups are total: unmapped ids decode to the sentinel, unmapped or
//! missing names resolve to the sentinel, and the sentinel's name is the
//! empty string.

use thiserror::Error;

/// Distance value reported by the controller when a sonar reads at or
/// beyond its range. Rendered as a human-readable phrase by the telemetry
/// reporter, never as the numeral.
pub const DIST_FAR: u8 = 0xFF;

// ─────────────────────────────────────────────────────────────────────────────
// Operating state
// ─────────────────────────────────────────────────────────────────────────────

/// Motor-controller operating mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperatingState {
    /// Controller idles; actuators unpowered.
    Nothing,
    /// Built-in reactive behaviour on the controller itself.
    Basic,
    /// Controller obeys commands from this host.
    Orders,
    /// Celebration routine.
    Dance,
    /// Sentinel for unmapped wire ids. Never a real mode.
    Unknown,
}

impl OperatingState {
    /// Decode a wire id. Total: unmapped ids yield [`OperatingState::Unknown`].
    pub fn from_wire(id: u8) -> Self {
        match id {
            0x00 => OperatingState::Nothing,
            0x10 => OperatingState::Basic,
            0x20 => OperatingState::Orders,
            0x30 => OperatingState::Dance,
            _ => OperatingState::Unknown,
        }
    }

    /// The one-byte wire id for this state.
    pub fn wire(self) -> u8 {
        match self {
            OperatingState::Nothing => 0x00,
            OperatingState::Basic => 0x10,
            OperatingState::Orders => 0x20,
            OperatingState::Dance => 0x30,
            OperatingState::Unknown => 0xFF,
        }
    }

    /// Canonical name, `""` for the sentinel.
    pub fn name(self) -> &'static str {
        match self {
            OperatingState::Nothing => "nothing",
            OperatingState::Basic => "basic",
            OperatingState::Orders => "orders",
            OperatingState::Dance => "dance",
            OperatingState::Unknown => "",
        }
    }

    /// Resolve a name. `None`, empty, and unmapped names all yield the
    /// sentinel — callers must check before treating the result as real.
    pub fn from_name(name: Option<&str>) -> Self {
        match name {
            Some("nothing") => OperatingState::Nothing,
            Some("basic") => OperatingState::Basic,
            Some("orders") => OperatingState::Orders,
            Some("dance") => OperatingState::Dance,
            _ => OperatingState::Unknown,
        }
    }
}

impl std::fmt::Display for OperatingState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Turn
// ─────────────────────────────────────────────────────────────────────────────

/// Steering command argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Turn {
    /// No turn; wheels straight.
    None,
    Right,
    Left,
    /// Sentinel for unmapped wire ids.
    Unknown,
}

impl Turn {
    /// Decode a wire id. Total: unmapped ids yield [`Turn::Unknown`].
    pub fn from_wire(id: u8) -> Self {
        match id {
            0x00 => Turn::None,
            0x10 => Turn::Right,
            0x20 => Turn::Left,
            _ => Turn::Unknown,
        }
    }

    /// The one-byte wire id for this turn.
    pub fn wire(self) -> u8 {
        match self {
            Turn::None => 0x00,
            Turn::Right => 0x10,
            Turn::Left => 0x20,
            Turn::Unknown => 0xFF,
        }
    }

    /// Canonical name, `""` for the sentinel.
    pub fn name(self) -> &'static str {
        match self {
            Turn::None => "none",
            Turn::Right => "right",
            Turn::Left => "left",
            Turn::Unknown => "",
        }
    }

    /// Resolve a name; sentinel for `None`, empty, or unmapped input.
    pub fn from_name(name: Option<&str>) -> Self {
        match name {
            Some("none") => Turn::None,
            Some("right") => Turn::Right,
            Some("left") => Turn::Left,
            _ => Turn::Unknown,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Move
// ─────────────────────────────────────────────────────────────────────────────

/// Drive direction command argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Move {
    Forward,
    Backward,
    /// Sentinel for unmapped wire ids.
    Unknown,
}

impl Move {
    /// Decode a wire id. Total: unmapped ids yield [`Move::Unknown`].
    pub fn from_wire(id: u8) -> Self {
        match id {
            0x10 => Move::Forward,
            0x20 => Move::Backward,
            _ => Move::Unknown,
        }
    }

    /// The one-byte wire id for this direction.
    pub fn wire(self) -> u8 {
        match self {
            Move::Forward => 0x10,
            Move::Backward => 0x20,
            Move::Unknown => 0xFF,
        }
    }

    /// Canonical name, `""` for the sentinel.
    pub fn name(self) -> &'static str {
        match self {
            Move::Forward => "forward",
            Move::Backward => "backward",
            Move::Unknown => "",
        }
    }

    /// Resolve a name; sentinel for `None`, empty, or unmapped input.
    pub fn from_name(name: Option<&str>) -> Self {
        match name {
            Some("forward") => Move::Forward,
            Some("backward") => Move::Backward,
            _ => Move::Unknown,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Perception verdict
// ─────────────────────────────────────────────────────────────────────────────

/// Directional verdict produced by the perception classifier for one frame.
///
/// This type is written **only** by the classifier; the decision loop
/// consumes it and emits manoeuvres, never the other way around. Variant
/// names state the steering intent, not the screen segment that produced
/// it: a bright right-hand segment yields [`PerceptionVerdict::SteerLeft`]
/// (the camera is mounted looking back along the track).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PerceptionVerdict {
    /// The finish marker fills the left segment.
    Victory,
    /// Steer left to recentre the track.
    SteerLeft,
    /// Steer right to recentre the track.
    SteerRight,
    /// Track is centred; keep going.
    Forward,
    /// No segment won; hold course.
    NoConsensus,
}

impl PerceptionVerdict {
    /// Compact encoding used by the telemetry blackboard.
    pub fn as_u8(self) -> u8 {
        match self {
            PerceptionVerdict::Victory => 0,
            PerceptionVerdict::SteerLeft => 1,
            PerceptionVerdict::SteerRight => 2,
            PerceptionVerdict::Forward => 3,
            PerceptionVerdict::NoConsensus => 4,
        }
    }

    /// Inverse of [`PerceptionVerdict::as_u8`]. Total: unmapped values
    /// decode to [`PerceptionVerdict::NoConsensus`].
    pub fn from_u8(v: u8) -> Self {
        match v {
            0 => PerceptionVerdict::Victory,
            1 => PerceptionVerdict::SteerLeft,
            2 => PerceptionVerdict::SteerRight,
            3 => PerceptionVerdict::Forward,
            _ => PerceptionVerdict::NoConsensus,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Telemetry snapshot
// ─────────────────────────────────────────────────────────────────────────────

/// Point-in-time copy of the shared telemetry scalars.
///
/// Built from independent per-field reads: two fields may come from
/// different wall-clock moments. Cross-field consistency is deliberately
/// not guaranteed (see `rover-state`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TelemetrySnapshot {
    /// Raw wire id of the controller's reported mode.
    pub mode: u8,
    /// Last speed commanded by the decision loop.
    pub speed: u8,
    /// Left sonar distance; [`DIST_FAR`] when out of range.
    pub dist_left: u8,
    /// Center sonar distance.
    pub dist_center: u8,
    /// Right sonar distance.
    pub dist_right: u8,
}

// ─────────────────────────────────────────────────────────────────────────────
// Error type
// ─────────────────────────────────────────────────────────────────────────────

/// Global error type spanning transport failures, malformed camera frames,
/// and configuration problems.
///
/// Protocol decode failures are *not* represented here: unknown opcodes and
/// names resolve to their sentinel values and the caller decides whether to
/// skip or complain.
#[derive(Error, Debug)]
pub enum RoverError {
    #[error("transport failure on {channel}: {details}")]
    Transport { channel: String, details: String },

    #[error("malformed frame: {0}")]
    BadFrame(String),

    #[error("configuration error: {0}")]
    Config(String),
}

impl RoverError {
    /// Wrap an I/O error with the channel it occurred on.
    pub fn transport(channel: &str, err: impl std::fmt::Display) -> Self {
        RoverError::Transport {
            channel: channel.to_string(),
            details: err.to_string(),
        }
    }
}
