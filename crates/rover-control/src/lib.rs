//! The rover's control runtime.
//!
//! Five independent, always-running tasks share one [`Blackboard`]:
//!
//! | Task | Module | Reads | Writes |
//! |---|---|---|---|
//! | Perception | [`perceive`] | camera frames | verdict |
//! | Decision loop | [`pilot`] | distances + verdict | speed, serial commands |
//! | Telemetry reporter | [`reporter`] | full snapshot | broadcast channel |
//! | Command ingress | [`ingress`] | serial bytes | distances, mode |
//! | Command shell | (in the CLI crate) | operator input | serial commands |
//!
//! Each task holds a [`Shutdown`] handle and checks it at every iteration
//! boundary; every sleep — including the pilot's victory dwell — is raced
//! against it, so the whole runtime winds down promptly on Ctrl-C or a
//! `quit` command.
//!
//! [`Blackboard`]: rover_state::Blackboard

pub mod ingress;
pub mod perceive;
pub mod pilot;
pub mod reporter;
pub mod shutdown;
pub mod sink;

pub use shutdown::{Shutdown, ShutdownHandle};
pub use sink::{CommandSink, SerialCommandSink};
