//! Platform abstraction layer
//!
//! Host-facing pieces that sit between a real frame loop and the simulation:
//! - Time: wall-clock deltas to whole ticks
//! - Input: key/joystick events to per-tick commands

pub mod clock;
pub mod input;

pub use clock::FixedStep;
pub use input::{InputState, Key};
