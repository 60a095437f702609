//! Perception: turning a camera frame into a directional verdict.
//!
//! - [`camera`] – the [`Frame`] buffer type and the [`Camera`] trait the
//!   perception task drives.
//! - [`classifier`] – segment-wise bright-patch classification.
//! - [`sim`] – a synthetic camera for tests and camera-less bring-up.

pub mod camera;
pub mod classifier;
pub mod sim;

pub use camera::{Camera, Frame};
pub use classifier::Classifier;
pub use sim::{SimCamera, SimScene};
