//! Scripted scenarios for the `BALLPIT_TEST` run mode.
//!
//! Each scenario seeds the world at startup, runs for a fixed number of
//! frames against the real clock, and prints a PASS/FAIL verdict before
//! exiting.  The verdict is computed by [`verify`], which is plain data in and
//! out so it is unit-tested below without an `App`.

use std::io::Write;

use bevy::prelude::*;

use crate::body::{Body, BodyTag, Playfield};
use crate::constants::BODY_RADIUS;
use crate::simulation::{Bodies, StepStats};

/// Bodies in the `pile` column; the lowest starts above the floor.
const PILE_SIZE: usize = 15;

/// Scenario selected by `BALLPIT_TEST`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scenario {
    /// One body dropped from rest near the top.
    Settle,
    /// Two bodies launched at each other.
    HeadOn,
    /// A body thrown hard at the left wall.
    WallBounce,
    /// A column of bodies dropped onto each other.
    Pile,
}

impl Scenario {
    /// Unknown names fall back to [`Scenario::Settle`].
    pub fn from_name(name: &str) -> Self {
        match name {
            "head_on" => Self::HeadOn,
            "wall_bounce" => Self::WallBounce,
            "pile" => Self::Pile,
            _ => Self::Settle,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Settle => "settle",
            Self::HeadOn => "head_on",
            Self::WallBounce => "wall_bounce",
            Self::Pile => "pile",
        }
    }

    pub fn frame_limit(self) -> u32 {
        match self {
            Self::Settle => 1800,
            Self::HeadOn => 600,
            Self::WallBounce => 600,
            Self::Pile => 900,
        }
    }

    /// Bodies this scenario starts with (screen space, clock at `now`).
    pub fn bodies(self, now: std::time::Duration) -> Vec<Body> {
        match self {
            Self::Settle => vec![Body::new(Vec2::new(400.0, 50.0), BodyTag::cycle(0), now)],
            Self::HeadOn => vec![
                Body::new(Vec2::new(300.0, 300.0), BodyTag::cycle(1), now)
                    .with_velocity(Vec2::new(60.0, 0.0)),
                Body::new(Vec2::new(500.0, 300.0), BodyTag::cycle(2), now)
                    .with_velocity(Vec2::new(-60.0, 0.0)),
            ],
            Self::WallBounce => vec![
                Body::new(Vec2::new(100.0, 300.0), BodyTag::cycle(3), now)
                    .with_velocity(Vec2::new(-400.0, 0.0)),
            ],
            Self::Pile => (0..PILE_SIZE)
                .map(|i| {
                    let y = 30.0 + 34.0 * i as f32;
                    let x = 400.0 + if i % 2 == 0 { 2.0 } else { -2.0 };
                    Body::new(Vec2::new(x, y), BodyTag::cycle(i), now)
                })
                .collect(),
        }
    }
}

/// Test-mode bookkeeping.
#[derive(Resource)]
pub struct TestConfig {
    pub enabled: bool,
    pub scenario: Scenario,
    pub frame_limit: u32,
    pub frame_count: u32,
    pub initial_body_count: usize,
    /// Largest `|vy|` seen on body 0 over the run.
    pub peak_vertical_speed: f32,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            scenario: Scenario::Settle,
            frame_limit: 100,
            frame_count: 0,
            initial_body_count: 0,
            peak_vertical_speed: 0.0,
        }
    }
}

impl TestConfig {
    pub fn for_scenario(scenario: Scenario) -> Self {
        Self {
            enabled: true,
            scenario,
            frame_limit: scenario.frame_limit(),
            ..Default::default()
        }
    }
}

/// Check the end state of a scenario.  `Err` carries the failure reason.
pub fn verify(
    scenario: Scenario,
    bodies: &Bodies,
    playfield: Playfield,
    stats: &StepStats,
    peak_vertical_speed: f32,
) -> Result<(), String> {
    if let Some((i, b)) = bodies
        .iter()
        .enumerate()
        .find(|(_, b)| !b.position().is_finite() || !b.velocity().is_finite())
    {
        return Err(format!("body {} has non-finite state {:?}", i, b));
    }
    // Resolution runs after integration and may nudge a crowded body past a
    // wall for one frame, so multi-body runs only require centers on screen.
    let strict = bodies.len() == 1;
    for (i, b) in bodies.iter().enumerate() {
        let x = b.position().x;
        let margin = if strict { b.radius() } else { 0.0 };
        if x - margin < 0.0 || x + margin > playfield.width {
            return Err(format!("body {} escaped horizontally at x={:.2}", i, x));
        }
    }

    match scenario {
        Scenario::Settle => {
            let b = bodies.get(0).ok_or("no body spawned")?;
            let bottom = b.position().y + b.radius();
            if !(playfield.height - 5.0..=playfield.height + 0.5).contains(&bottom) {
                return Err(format!("body not resting on the floor: bottom={:.2}", bottom));
            }
            if b.velocity().y.abs() > 12.0 {
                return Err(format!("body still bouncing: vy={:.2}", b.velocity().y));
            }
            if peak_vertical_speed < 50.0 {
                return Err(format!(
                    "body never fell properly: peak |vy|={:.2}",
                    peak_vertical_speed
                ));
            }
            Ok(())
        }
        Scenario::HeadOn => {
            if stats.total_contacts == 0 {
                return Err("bodies never touched".to_string());
            }
            let (a, b) = (
                bodies.get(0).ok_or("missing body 0")?,
                bodies.get(1).ok_or("missing body 1")?,
            );
            let gap = a.position().distance(b.position());
            if gap < 2.0 * BODY_RADIUS - 0.01 {
                return Err(format!("bodies still overlap: distance={:.3}", gap));
            }
            Ok(())
        }
        Scenario::WallBounce => {
            let b = bodies.get(0).ok_or("no body spawned")?;
            if b.velocity().x.abs() > 400.0 * 0.8 + 1e-3 {
                return Err(format!("wall did not damp vx: {:.2}", b.velocity().x));
            }
            Ok(())
        }
        Scenario::Pile => {
            if bodies.len() != PILE_SIZE {
                return Err(format!(
                    "expected {} bodies, found {}",
                    PILE_SIZE,
                    bodies.len()
                ));
            }
            if stats.total_contacts == 0 {
                return Err("pile never collided".to_string());
            }
            Ok(())
        }
    }
}

// ── Systems ───────────────────────────────────────────────────────────────────

/// Startup: seed the world with the configured scenario.
pub fn spawn_scenario_system(
    mut bodies: ResMut<Bodies>,
    mut test_config: ResMut<TestConfig>,
    time: Res<Time<Real>>,
) {
    let scenario = test_config.scenario;
    for body in scenario.bodies(time.elapsed()) {
        if let Err(err) = bodies.insert(body) {
            warn!("{}", err);
        }
    }
    test_config.initial_body_count = bodies.len();
    println!(
        "✓ Spawned test: {} ({} bodies, {} frames)",
        scenario.name(),
        bodies.len(),
        test_config.frame_limit
    );
}

pub fn test_logging_system(
    mut test_config: ResMut<TestConfig>,
    bodies: Res<Bodies>,
    stats: Res<StepStats>,
) {
    if !test_config.enabled {
        return;
    }

    test_config.frame_count += 1;
    if let Some(b) = bodies.get(0) {
        test_config.peak_vertical_speed = test_config.peak_vertical_speed.max(b.velocity().y.abs());
    }

    if test_config.frame_count == 1
        || test_config.frame_count.is_multiple_of(120)
        || test_config.frame_count == test_config.frame_limit
    {
        println!(
            "[Frame {}] bodies: {} | contacts: {} (total {})",
            test_config.frame_count,
            bodies.len(),
            stats.last.contacts,
            stats.total_contacts
        );
        for (i, b) in bodies.iter().enumerate().take(4) {
            println!(
                "  #{} pos ({:.1}, {:.1}) vel ({:.2}, {:.2})",
                i,
                b.position().x,
                b.position().y,
                b.velocity().x,
                b.velocity().y
            );
        }
    }
}

/// Verify test results at the end and exit.
pub fn test_verification_system(
    test_config: Res<TestConfig>,
    bodies: Res<Bodies>,
    playfield: Res<Playfield>,
    stats: Res<StepStats>,
    mut exit: MessageWriter<AppExit>,
) {
    if !test_config.enabled || test_config.frame_count != test_config.frame_limit {
        return;
    }

    println!("\n╔════════════════════════════════════════════╗");
    println!("║           TEST COMPLETE                    ║");
    println!("╚════════════════════════════════════════════╝");
    println!("Test: {}", test_config.scenario.name());
    println!("Frames: {}", test_config.frame_count);
    println!("Initial bodies: {}", test_config.initial_body_count);
    println!("Final bodies:   {}", bodies.len());
    println!("Total contacts: {}", stats.total_contacts);

    let verdict = verify(
        test_config.scenario,
        &bodies,
        *playfield,
        &stats,
        test_config.peak_vertical_speed,
    );
    match verdict {
        Ok(()) => {
            println!("✓ PASS: {}", test_config.scenario.name());
            let _ = std::io::stdout().flush();
            exit.write(AppExit::Success);
        }
        Err(reason) => {
            println!("✗ FAIL: {} — {}", test_config.scenario.name(), reason);
            let _ = std::io::stdout().flush();
            exit.write(AppExit::from_code(1));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    const DT: f64 = 1.0 / 60.0;

    fn run(scenario: Scenario) -> (Bodies, StepStats, f32) {
        let field = Playfield::new(800.0, 600.0);
        let mut bodies = Bodies::new();
        for b in scenario.bodies(Duration::ZERO) {
            bodies.insert(b).expect("unbounded");
        }
        let mut stats = StepStats::default();
        let mut peak = 0.0_f32;
        for frame in 1..=scenario.frame_limit() {
            let now = Duration::from_secs_f64(frame as f64 * DT);
            stats.record(bodies.step(now, field));
            if let Some(b) = bodies.get(0) {
                peak = peak.max(b.velocity().y.abs());
            }
        }
        (bodies, stats, peak)
    }

    #[test]
    fn unknown_name_falls_back_to_settle() {
        assert_eq!(Scenario::from_name("nope"), Scenario::Settle);
        assert_eq!(Scenario::from_name("pile"), Scenario::Pile);
    }

    #[test]
    fn names_round_trip() {
        for s in [
            Scenario::Settle,
            Scenario::HeadOn,
            Scenario::WallBounce,
            Scenario::Pile,
        ] {
            assert_eq!(Scenario::from_name(s.name()), s);
        }
    }

    #[test]
    fn settle_passes_at_60hz() {
        let (bodies, stats, peak) = run(Scenario::Settle);
        let field = Playfield::new(800.0, 600.0);
        assert_eq!(verify(Scenario::Settle, &bodies, field, &stats, peak), Ok(()));
    }

    #[test]
    fn head_on_passes_at_60hz() {
        let (bodies, stats, peak) = run(Scenario::HeadOn);
        let field = Playfield::new(800.0, 600.0);
        assert_eq!(verify(Scenario::HeadOn, &bodies, field, &stats, peak), Ok(()));
    }

    #[test]
    fn pile_column_starts_inside_the_playfield() {
        let column = Scenario::Pile.bodies(Duration::ZERO);
        assert_eq!(column.len(), PILE_SIZE);
        for b in &column {
            assert!(b.position().y - b.radius() > 0.0);
            assert!(
                b.position().y + b.radius() < 600.0,
                "starts below the floor: {:?}",
                b.position()
            );
        }
    }

    #[test]
    fn untouched_head_on_fails() {
        let mut bodies = Bodies::new();
        for b in Scenario::HeadOn.bodies(Duration::ZERO) {
            bodies.insert(b).expect("unbounded");
        }
        let field = Playfield::new(800.0, 600.0);
        let verdict = verify(Scenario::HeadOn, &bodies, field, &StepStats::default(), 0.0);
        assert!(verdict.is_err());
    }

    #[test]
    fn escaped_body_fails_any_scenario() {
        let mut bodies = Bodies::new();
        let tag = BodyTag::new(1).expect("valid tag");
        bodies
            .insert(Body::new(Vec2::new(-50.0, 300.0), tag, Duration::ZERO))
            .expect("unbounded");
        let field = Playfield::new(800.0, 600.0);
        let verdict = verify(Scenario::WallBounce, &bodies, field, &StepStats::default(), 0.0);
        assert!(verdict.is_err_and(|e| e.contains("escaped")));
    }
}
