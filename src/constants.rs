//! Centralised physics and presentation constants.
//!
//! The physical values (radius, gravity, restitution, free-fall offset) are
//! fixed at compile time and are deliberately absent from
//! [`crate::config::AppConfig`].  Everything under "Window" and "Rendering"
//! only provides the defaults that `assets/ballpit.toml` may override.

// ── Physics: Body ─────────────────────────────────────────────────────────────

/// Collision radius shared by every body (screen units).
pub const BODY_RADIUS: f32 = 16.5;

/// Downward acceleration applied in the free-fall regime (units/s²).
///
/// Screen space grows downward, so a positive value pulls bodies to the floor.
pub const GRAVITY: f32 = 9.8;

/// Fraction of speed kept after a wall bounce or a body–body impact.
pub const RESTITUTION: f32 = 0.8;

/// Offset used by the free-fall test `y + FREE_FALL_FLOOR_OFFSET < height`.
///
/// This is intentionally not [`BODY_RADIUS`]: a body resting exactly on the
/// floor (`y = height - 16.5`) still satisfies the free-fall test and keeps
/// accelerating until it sinks the remaining half unit.
pub const FREE_FALL_FLOOR_OFFSET: f32 = 16.0;

// ── Tags ──────────────────────────────────────────────────────────────────────

/// Smallest tag value handed out at spawn.
pub const TAG_MIN: u8 = 1;

/// Largest tag value handed out at spawn.
pub const TAG_MAX: u8 = 5;

// ── Window ────────────────────────────────────────────────────────────────────

/// Default playfield width (logical pixels).
pub const WINDOW_WIDTH: f32 = 800.0;

/// Default playfield height (logical pixels).
pub const WINDOW_HEIGHT: f32 = 600.0;

pub const WINDOW_TITLE: &str = "Physics simulator";

/// Maximum number of live bodies; `0` keeps the collection unbounded.
pub const MAX_BODIES: usize = 0;

// ── Rendering ─────────────────────────────────────────────────────────────────

/// Rim vertex count of the shared circle mesh.
pub const CIRCLE_SIDES: u32 = 32;

/// Visual radius of a body.
///
/// Half a unit smaller than [`BODY_RADIUS`]; touching bodies show a thin gap.
pub const DRAW_RADIUS: f32 = 16.0;

/// Path of the optional runtime configuration file.
pub const CONFIG_PATH: &str = "assets/ballpit.toml";
