//! Narrow-phase circle collision: overlap test and impulse resolution.
//!
//! Both functions work on any pair of bodies; the all-pairs loop that feeds
//! them lives in `simulation.rs`.  Every body has unit mass, so the impulse is
//! split evenly and there is no angular term.

use crate::body::Body;
use crate::constants::RESTITUTION;

/// True iff the two circles interpenetrate (touching exactly is not overlap).
pub fn overlaps(a: &Body, b: &Body) -> bool {
    a.position().distance(b.position()) < a.radius() + b.radius()
}

/// Outcome of [`resolve`], mostly useful for logging and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// Centers coincide; no normal exists, nothing was changed.
    Degenerate,
    /// Positions were separated but the pair was already moving apart.
    Separating,
    /// Positions were separated and an impulse was applied.
    Impulse,
}

/// Push an overlapping pair apart along the contact normal and exchange an
/// equal-mass impulse with restitution [`RESTITUTION`].
pub fn resolve(a: &mut Body, b: &mut Body) -> Resolution {
    let delta = b.position - a.position;
    let distance = delta.length();
    if distance == 0.0 {
        return Resolution::Degenerate;
    }

    let normal = delta / distance;

    let overlap = (a.radius() + b.radius()) - distance;
    if overlap > 0.0 {
        let correction = normal * (overlap * 0.5);
        a.position -= correction;
        b.position += correction;
    }

    let relative = b.velocity - a.velocity;
    let velocity_along_normal = relative.dot(normal);
    if velocity_along_normal > 0.0 {
        return Resolution::Separating;
    }

    let impulse = -(1.0 + RESTITUTION) * velocity_along_normal / 2.0;
    let impulse = normal * impulse;
    a.velocity -= impulse;
    b.velocity += impulse;
    Resolution::Impulse
}
