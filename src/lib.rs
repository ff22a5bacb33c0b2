//! Ballpit library
//!
//! Click-to-spawn circles that fall under gravity, bounce off the window
//! edges, and collide with each other through equal-mass impulses.  The
//! physics core (`body`, `collision`, `simulation::Bodies`) is plain Rust; the
//! remaining modules wire it into a Bevy app.

pub mod body;
pub mod collision;
pub mod config;
pub mod constants;
pub mod error;
pub mod graphics;
pub mod input;
pub mod rendering;
pub mod simulation;
pub mod test_mode;
pub mod testing;
