//! Wire protocol spoken with the motor controller.
//!
//! Every frame on the serial channel is exactly two bytes: an opcode
//! followed by a one-byte argument. Opcodes with the high bit set address
//! the controller (modes, turns, distances, speed); opcodes with the high
//! bit clear (`help`, `quit`) are handled locally and never transmitted.
//!
//! | Opcode | Name | Argument |
//! |---|---|---|
//! | `0x81` | `mode` | operating-state id |
//! | `0x82` | `state` | operating-state id |
//! | `0x91` | `hard-turn` | turn id |
//! | `0x92` | `soft-turn` | turn id |
//! | `0x93` | `set-direction` | move id |
//! | `0xA1` | `dist-center` | 0–255, 255 = out of range |
//! | `0xA2` | `dist-left` | 0–255 |
//! | `0xA3` | `dist-right` | 0–255 |
//! | `0xB1` | `speed` | 0–255 |
//! | `0x01` | `help` | optional command name |
//! | `0x02` | `quit` | none |
//! | `0xFF` | unknown sentinel | never transmitted |
//!
//! Lookups are total and direct: an unmapped byte decodes to
//! [`Opcode::Unknown`], never silently to a real command, and an unmapped
//! or missing name resolves to the sentinel, which is distinct from every
//! valid opcode (including any zero-valued one).

mod link;

pub use link::{FrameReader, FrameWriter};

// ─────────────────────────────────────────────────────────────────────────────
// Opcode table
// ─────────────────────────────────────────────────────────────────────────────

/// One-byte command identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Opcode {
    Mode,
    State,
    HardTurn,
    SoftTurn,
    SetDirection,
    DistCenter,
    DistLeft,
    DistRight,
    Speed,
    Help,
    Quit,
    /// Sentinel for unmapped bytes and names. Never transmitted.
    Unknown,
}

/// Every real opcode, in table order. Used by the command shell to print
/// the command list.
pub const OPCODES: [Opcode; 11] = [
    Opcode::Mode,
    Opcode::State,
    Opcode::HardTurn,
    Opcode::SoftTurn,
    Opcode::SetDirection,
    Opcode::DistCenter,
    Opcode::DistLeft,
    Opcode::DistRight,
    Opcode::Speed,
    Opcode::Help,
    Opcode::Quit,
];

impl Opcode {
    /// Decode a wire byte. Total: unmapped bytes yield [`Opcode::Unknown`].
    pub fn from_wire(byte: u8) -> Self {
        match byte {
            0x81 => Opcode::Mode,
            0x82 => Opcode::State,
            0x91 => Opcode::HardTurn,
            0x92 => Opcode::SoftTurn,
            0x93 => Opcode::SetDirection,
            0xA1 => Opcode::DistCenter,
            0xA2 => Opcode::DistLeft,
            0xA3 => Opcode::DistRight,
            0xB1 => Opcode::Speed,
            0x01 => Opcode::Help,
            0x02 => Opcode::Quit,
            _ => Opcode::Unknown,
        }
    }

    /// The wire byte for this opcode.
    pub fn wire(self) -> u8 {
        match self {
            Opcode::Mode => 0x81,
            Opcode::State => 0x82,
            Opcode::HardTurn => 0x91,
            Opcode::SoftTurn => 0x92,
            Opcode::SetDirection => 0x93,
            Opcode::DistCenter => 0xA1,
            Opcode::DistLeft => 0xA2,
            Opcode::DistRight => 0xA3,
            Opcode::Speed => 0xB1,
            Opcode::Help => 0x01,
            Opcode::Quit => 0x02,
            Opcode::Unknown => 0xFF,
        }
    }

    /// Canonical command name, `""` for the sentinel. Never panics.
    pub fn name(self) -> &'static str {
        match self {
            Opcode::Mode => "mode",
            Opcode::State => "state",
            Opcode::HardTurn => "hard-turn",
            Opcode::SoftTurn => "soft-turn",
            Opcode::SetDirection => "set-direction",
            Opcode::DistCenter => "dist-center",
            Opcode::DistLeft => "dist-left",
            Opcode::DistRight => "dist-right",
            Opcode::Speed => "speed",
            Opcode::Help => "help",
            Opcode::Quit => "quit",
            Opcode::Unknown => "",
        }
    }

    /// Resolve a command name. `None`, empty, and unmapped names all yield
    /// the sentinel, which callers must check before dispatch.
    pub fn from_name(name: Option<&str>) -> Self {
        match name {
            Some("mode") => Opcode::Mode,
            Some("state") => Opcode::State,
            Some("hard-turn") => Opcode::HardTurn,
            Some("soft-turn") => Opcode::SoftTurn,
            Some("set-direction") => Opcode::SetDirection,
            Some("dist-center") => Opcode::DistCenter,
            Some("dist-left") => Opcode::DistLeft,
            Some("dist-right") => Opcode::DistRight,
            Some("speed") => Opcode::Speed,
            Some("help") => Opcode::Help,
            Some("quit") => Opcode::Quit,
            _ => Opcode::Unknown,
        }
    }

    /// `true` for opcodes addressed to the controller (high bit set);
    /// `false` for host-local commands like `help` and `quit`.
    pub fn is_remote(self) -> bool {
        self.wire() & 0x80 != 0 && self != Opcode::Unknown
    }
}

impl std::fmt::Display for Opcode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Frame
// ─────────────────────────────────────────────────────────────────────────────

/// A decoded 2-byte protocol frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Frame {
    pub opcode: Opcode,
    pub value: u8,
}

impl Frame {
    pub fn new(opcode: Opcode, value: u8) -> Self {
        Self { opcode, value }
    }

    /// Encode into the on-wire byte pair: opcode, then value.
    pub fn encode(self) -> [u8; 2] {
        [self.opcode.wire(), self.value]
    }

    /// Decode an on-wire byte pair. Total: an unmapped opcode byte decodes
    /// to [`Opcode::Unknown`] with the value preserved.
    pub fn decode(bytes: [u8; 2]) -> Self {
        Self {
            opcode: Opcode::from_wire(bytes[0]),
            value: bytes[1],
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Argument parsing
// ─────────────────────────────────────────────────────────────────────────────

/// Parse a decimal command argument into one byte.
///
/// A missing or unparsable string is 0, never an error. Values outside
/// 0–255 wrap modulo 256 — `"300"` is 44 and `"-1"` is 255. This is the
/// documented truncating-cast behaviour of the wire argument, not an
/// accident; callers wanting saturation must clamp beforehand.
pub fn decimal_value(s: Option<&str>) -> u8 {
    match s {
        Some(raw) => raw.trim().parse::<i64>().unwrap_or(0) as u8,
        None => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_roundtrip_all_valid_opcodes() {
        for op in OPCODES {
            for val in [0u8, 1, 42, 0x7F, 0xFF] {
                let frame = Frame::new(op, val);
                let back = Frame::decode(frame.encode());
                assert_eq!(back.opcode, op);
                assert_eq!(back.value, val);
            }
        }
    }

    #[test]
    fn name_id_roundtrip_for_every_table_entry() {
        for op in OPCODES {
            assert_eq!(Opcode::from_name(Some(op.name())), op);
        }
    }

    #[test]
    fn unknown_lookups_yield_sentinel() {
        assert_eq!(Opcode::from_name(Some("warp-drive")), Opcode::Unknown);
        assert_eq!(Opcode::from_name(Some("")), Opcode::Unknown);
        assert_eq!(Opcode::from_name(None), Opcode::Unknown);
        assert_eq!(Opcode::Unknown.name(), "");
        // 0x00 is unmapped wire space, never a real command.
        assert_eq!(Opcode::from_wire(0x00), Opcode::Unknown);
        assert_eq!(Opcode::from_wire(0x42), Opcode::Unknown);
    }

    #[test]
    fn remote_opcodes_have_high_bit_set() {
        assert!(Opcode::Mode.is_remote());
        assert!(Opcode::Speed.is_remote());
        assert!(!Opcode::Help.is_remote());
        assert!(!Opcode::Quit.is_remote());
        assert!(!Opcode::Unknown.is_remote());
    }

    #[test]
    fn decimal_value_parses_and_wraps() {
        assert_eq!(decimal_value(Some("42")), 42);
        assert_eq!(decimal_value(Some("255")), 255);
        assert_eq!(decimal_value(Some(" 7 ")), 7);
        // Wrapping cast, documented behaviour.
        assert_eq!(decimal_value(Some("300")), 44);
        assert_eq!(decimal_value(Some("-1")), 255);
        // Missing or unparsable input is zero, not an error.
        assert_eq!(decimal_value(None), 0);
        assert_eq!(decimal_value(Some("")), 0);
        assert_eq!(decimal_value(Some("fast")), 0);
    }
}
