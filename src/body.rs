//! A single bouncing circle and its per-body integrator.
//!
//! ## Coordinates
//!
//! Bodies live in *screen space*: origin at the top-left corner of the window,
//! `y` grows downward and the floor sits at `y = height`.  This matches the
//! cursor position Bevy reports, so a click spawns a body exactly where it
//! lands.  Rendering converts to world space (see `rendering.rs`).
//!
//! ## Per-body clock
//!
//! There is no global delta time.  Each body measures elapsed time from its
//! own `clock`, which is only reset when the vertical regime changes:
//!
//! | Regime      | Condition                     | Clock reset      |
//! |-------------|-------------------------------|------------------|
//! | Top bound   | `y + r <= 0`                  | always           |
//! | Free fall   | `y + 16 < height`             | only if `vy == 0`|
//! | Floor       | otherwise                     | always           |
//!
//! During free fall the elapsed time therefore keeps growing frame after
//! frame, and both the position update and the gravity update use that
//! cumulative value.  Bounce dynamics depend on exactly these reset triggers.

use std::time::Duration;

use bevy::prelude::*;
use rand::Rng;

use crate::constants::{
    BODY_RADIUS, FREE_FALL_FLOOR_OFFSET, GRAVITY, RESTITUTION, TAG_MAX, TAG_MIN,
};
use crate::error::{SimError, SimResult};

/// Display identity of a body, always within `[TAG_MIN, TAG_MAX]`.
///
/// Never read by the physics; `rendering::tag_color` maps it to a fill color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BodyTag(u8);

impl BodyTag {
    pub fn new(value: u8) -> SimResult<Self> {
        if (TAG_MIN..=TAG_MAX).contains(&value) {
            Ok(Self(value))
        } else {
            Err(SimError::InvalidTag { value })
        }
    }

    /// Uniform draw over every valid tag.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self(rng.gen_range(TAG_MIN..=TAG_MAX))
    }

    /// Tag for the `n`-th body of a scripted sequence, cycling through every
    /// value so neighbours get different colors.
    pub fn cycle(n: usize) -> Self {
        let span = (TAG_MAX - TAG_MIN + 1) as usize;
        Self(TAG_MIN + (n % span) as u8)
    }

    #[inline]
    pub fn get(self) -> u8 {
        self.0
    }
}

/// Extents the integrator bounces against, in screen units.
///
/// Refreshed from the primary window every frame by
/// `simulation::sync_playfield_system`.
#[derive(Resource, Debug, Clone, Copy, PartialEq)]
pub struct Playfield {
    pub width: f32,
    pub height: f32,
}

impl Playfield {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

impl Default for Playfield {
    fn default() -> Self {
        Self::new(
            crate::constants::WINDOW_WIDTH,
            crate::constants::WINDOW_HEIGHT,
        )
    }
}

/// One simulated circle.
///
/// Fields are private so the radius invariant cannot be broken from outside;
/// the collision resolver in `collision.rs` is the only other writer of
/// position and velocity.
#[derive(Debug, Clone, PartialEq)]
pub struct Body {
    pub(crate) position: Vec2,
    pub(crate) velocity: Vec2,
    radius: f32,
    clock: Duration,
    tag: BodyTag,
}

impl Body {
    /// A body at rest at `position`, with its clock started at `now`.
    pub fn new(position: Vec2, tag: BodyTag, now: Duration) -> Self {
        Self {
            position,
            velocity: Vec2::ZERO,
            radius: BODY_RADIUS,
            clock: now,
            tag,
        }
    }

    /// Builder used by scripted scenarios and tests to launch a body.
    pub fn with_velocity(mut self, velocity: Vec2) -> Self {
        self.velocity = velocity;
        self
    }

    #[inline]
    pub fn position(&self) -> Vec2 {
        self.position
    }

    #[inline]
    pub fn velocity(&self) -> Vec2 {
        self.velocity
    }

    #[inline]
    pub fn radius(&self) -> f32 {
        self.radius
    }

    #[inline]
    pub fn tag(&self) -> BodyTag {
        self.tag
    }

    /// Start of the current free-motion interval.
    #[inline]
    pub fn clock(&self) -> Duration {
        self.clock
    }

    /// Seconds since the last clock reset, as seen at `now`.
    ///
    /// Saturates to zero if `now` is earlier than the clock.
    pub fn elapsed(&self, now: Duration) -> f32 {
        now.saturating_sub(self.clock).as_secs_f32()
    }

    /// Advance this body to `now`: drift, reflect off the side walls, then run
    /// the vertical regime chain.
    pub fn advance(&mut self, now: Duration, playfield: Playfield) {
        let elapsed = self.elapsed(now);

        // Horizontal motion is pure drift; only `vy` is touched by gravity.
        self.position += self.velocity * elapsed;

        if self.position.x - self.radius <= 0.0 {
            self.position.x = self.radius;
            self.velocity.x *= -RESTITUTION;
        }
        if self.position.x + self.radius >= playfield.width {
            self.position.x = playfield.width - self.radius;
            self.velocity.x *= -RESTITUTION;
        }

        if self.position.y + self.radius <= 0.0 {
            self.position.y = self.radius;
            self.velocity.y *= -RESTITUTION;
            self.clock = now;
        } else if self.position.y + FREE_FALL_FLOOR_OFFSET < playfield.height {
            self.velocity.y += GRAVITY * elapsed;
            if self.velocity.y == 0.0 {
                self.clock = now;
            }
        } else {
            self.position.y = playfield.height - self.radius;
            self.velocity.y *= -RESTITUTION;
            self.clock = now;
        }
    }
}
