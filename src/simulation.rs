//! Body collection, per-frame step, and the Bevy plugin that drives them.
//!
//! ## Frame order
//!
//! | Set              | Systems                                         |
//! |------------------|-------------------------------------------------|
//! | `SimSet::Input`  | `sync_playfield_system`, click input (input.rs) |
//! | `SimSet::Spawn`  | `spawn_body_system`                             |
//! | `SimSet::Step`   | `step_simulation_system`                        |
//! | `SimSet::Sync`   | transform sync (rendering.rs)                   |
//!
//! The step first integrates every body, then walks all unordered pairs in
//! increasing index order and resolves each overlapping pair once.  A pair is
//! not re-tested after resolution in the same frame, so a pile of three or
//! more bodies can keep a small residual overlap until the next frame.

use std::time::Duration;

use bevy::prelude::*;
use bevy::window::PrimaryWindow;

use crate::body::{Body, BodyTag, Playfield};
use crate::collision::{overlaps, resolve};
use crate::config::AppConfig;
use crate::error::{SimError, SimResult};

/// Request to append a body at a screen-space position.
#[derive(Message, Debug, Clone, Copy)]
pub struct SpawnBody {
    pub position: Vec2,
    pub tag: BodyTag,
}

/// Ordering of the per-frame simulation work inside `Update`.
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SimSet {
    Input,
    Spawn,
    Step,
    Sync,
}

/// Counters from a single [`Bodies::step`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StepReport {
    /// Bodies advanced by the integrator.
    pub integrated: usize,
    /// Overlapping pairs handed to the resolver.
    pub contacts: usize,
}

/// Running totals of the step system, read by the scripted test mode.
#[derive(Resource, Debug, Clone, Copy, Default)]
pub struct StepStats {
    pub steps: u64,
    pub total_contacts: u64,
    pub last: StepReport,
}

impl StepStats {
    pub fn record(&mut self, report: StepReport) {
        self.steps += 1;
        self.total_contacts += report.contacts as u64;
        self.last = report;
    }
}

/// The owning collection of every body in the world.
///
/// Bodies are only ever appended, so an index stays valid for the life of the
/// process; the renderer relies on that to pair each body with one entity.
#[derive(Resource, Debug, Default)]
pub struct Bodies {
    items: Vec<Body>,
    /// `None` = unbounded.
    limit: Option<usize>,
}

impl Bodies {
    pub fn new() -> Self {
        Self::default()
    }

    /// Collection that rejects spawns beyond `max_bodies` (`0` = unbounded).
    pub fn with_limit(max_bodies: usize) -> Self {
        let mut bodies = Self::new();
        bodies.set_limit(max_bodies);
        bodies
    }

    pub fn set_limit(&mut self, max_bodies: usize) {
        self.limit = (max_bodies > 0).then_some(max_bodies);
    }

    pub fn limit(&self) -> Option<usize> {
        self.limit
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Body> {
        self.items.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Body> {
        self.items.iter()
    }

    pub fn as_slice(&self) -> &[Body] {
        &self.items
    }

    /// Append a resting body at `position` whose clock starts at `now`.
    ///
    /// Returns the new body's index.
    pub fn spawn(&mut self, position: Vec2, tag: BodyTag, now: Duration) -> SimResult<usize> {
        self.insert(Body::new(position, tag, now))
    }

    /// Append an already-built body (scripted scenarios launch bodies with a
    /// velocity).
    pub fn insert(&mut self, body: Body) -> SimResult<usize> {
        if let Some(limit) = self.limit {
            if self.items.len() >= limit {
                return Err(SimError::CapacityReached { limit });
            }
        }
        self.items.push(body);
        Ok(self.items.len() - 1)
    }

    /// Advance the whole collection by one frame.
    pub fn step(&mut self, now: Duration, playfield: Playfield) -> StepReport {
        for body in self.items.iter_mut() {
            body.advance(now, playfield);
        }

        let mut contacts = 0;
        let n = self.items.len();
        for i in 0..n {
            for j in (i + 1)..n {
                let (head, tail) = self.items.split_at_mut(j);
                let (a, b) = (&mut head[i], &mut tail[0]);
                if overlaps(a, b) {
                    resolve(a, b);
                    contacts += 1;
                }
            }
        }

        StepReport {
            integrated: n,
            contacts,
        }
    }
}

impl<'a> IntoIterator for &'a Bodies {
    type Item = &'a Body;
    type IntoIter = std::slice::Iter<'a, Body>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

pub struct SimulationPlugin;

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<AppConfig>()
            .init_resource::<Bodies>()
            .init_resource::<Playfield>()
            .init_resource::<StepStats>()
            .add_message::<SpawnBody>()
            .configure_sets(
                Update,
                (SimSet::Input, SimSet::Spawn, SimSet::Step, SimSet::Sync).chain(),
            )
            .add_systems(Startup, apply_config_system)
            .add_systems(
                Update,
                (
                    sync_playfield_system.in_set(SimSet::Input),
                    spawn_body_system.in_set(SimSet::Spawn),
                    step_simulation_system.in_set(SimSet::Step),
                ),
            );
    }
}

/// Startup: validate the config resource, then copy the body limit and the
/// initial playfield out of it.
///
/// A config that fails validation is replaced by the defaults.
pub fn apply_config_system(
    mut config: ResMut<AppConfig>,
    mut bodies: ResMut<Bodies>,
    mut playfield: ResMut<Playfield>,
) {
    if let Err(err) = config.validate() {
        warn!("{}; falling back to default config", err);
        *config = AppConfig::default();
    }
    bodies.set_limit(config.max_bodies);
    *playfield = Playfield::new(config.window_width, config.window_height);
    match bodies.limit() {
        Some(limit) => info!("Body limit set to {}", limit),
        None => info!("Body collection is unbounded"),
    }
}

/// Track the primary window's logical size.  Headless apps keep whatever
/// playfield is already in place.
pub fn sync_playfield_system(
    windows: Query<&Window, With<PrimaryWindow>>,
    mut playfield: ResMut<Playfield>,
) {
    let Ok(window) = windows.single() else {
        return;
    };
    playfield.set_if_neq(Playfield::new(window.width(), window.height()));
}

/// Drain [`SpawnBody`] requests into the collection.
pub fn spawn_body_system(
    mut requests: MessageReader<SpawnBody>,
    mut bodies: ResMut<Bodies>,
    time: Res<Time<Real>>,
) {
    let now = time.elapsed();
    for request in requests.read() {
        match bodies.spawn(request.position, request.tag, now) {
            Ok(index) => debug!(
                "Spawned body #{} at ({:.1}, {:.1}) tag {}",
                index,
                request.position.x,
                request.position.y,
                request.tag.get()
            ),
            Err(err) => warn!("{}", err),
        }
    }
}

/// Run one [`Bodies::step`] against the monotonic wall clock.
pub fn step_simulation_system(
    mut bodies: ResMut<Bodies>,
    playfield: Res<Playfield>,
    time: Res<Time<Real>>,
    config: Res<AppConfig>,
    mut stats: ResMut<StepStats>,
) {
    if bodies.is_empty() {
        return;
    }
    let report = bodies.step(time.elapsed(), *playfield);
    stats.record(report);
    if config.log_steps {
        trace!(
            "step t={:.3}s bodies={} contacts={}",
            time.elapsed_secs(),
            report.integrated,
            report.contacts
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tag(v: u8) -> BodyTag {
        BodyTag::new(v).expect("valid tag")
    }

    fn field() -> Playfield {
        Playfield::new(800.0, 600.0)
    }

    #[test]
    fn spawn_returns_sequential_indices() {
        let mut bodies = Bodies::new();
        let first = bodies.spawn(Vec2::new(10.0, 10.0), tag(1), Duration::ZERO);
        let second = bodies.spawn(Vec2::new(100.0, 10.0), tag(2), Duration::ZERO);
        assert_eq!(first, Ok(0));
        assert_eq!(second, Ok(1));
        assert_eq!(bodies.len(), 2);
    }

    #[test]
    fn zero_limit_means_unbounded() {
        let mut bodies = Bodies::with_limit(0);
        assert_eq!(bodies.limit(), None);
        for i in 0..100 {
            let x = 20.0 + i as f32;
            assert!(bodies.spawn(Vec2::new(x, 50.0), tag(3), Duration::ZERO).is_ok());
        }
    }

    #[test]
    fn limit_rejects_extra_spawns() {
        let mut bodies = Bodies::with_limit(2);
        assert!(bodies.spawn(Vec2::new(50.0, 50.0), tag(1), Duration::ZERO).is_ok());
        assert!(bodies.spawn(Vec2::new(150.0, 50.0), tag(1), Duration::ZERO).is_ok());
        assert_eq!(
            bodies.spawn(Vec2::new(250.0, 50.0), tag(1), Duration::ZERO),
            Err(SimError::CapacityReached { limit: 2 })
        );
        assert_eq!(bodies.len(), 2);
    }

    #[test]
    fn step_counts_contacts_after_integration() {
        let mut bodies = Bodies::new();
        let a = Body::new(Vec2::new(100.0, 100.0), tag(1), Duration::ZERO)
            .with_velocity(Vec2::new(5.0, 0.0));
        let b = Body::new(Vec2::new(120.0, 100.0), tag(2), Duration::ZERO)
            .with_velocity(Vec2::new(-5.0, 0.0));
        let far = Body::new(Vec2::new(600.0, 100.0), tag(3), Duration::ZERO);
        bodies.insert(a).expect("unbounded");
        bodies.insert(b).expect("unbounded");
        bodies.insert(far).expect("unbounded");

        let report = bodies.step(Duration::ZERO, field());
        assert_eq!(
            report,
            StepReport {
                integrated: 3,
                contacts: 1
            }
        );
        let a = bodies.get(0).expect("body 0");
        let b = bodies.get(1).expect("body 1");
        assert!(a.velocity().x < 0.0);
        assert!(b.velocity().x > 0.0);
    }

    #[test]
    fn resolved_pair_is_not_retested_in_same_step() {
        // Three bodies stacked on one point: (0,1) is degenerate, (0,2) and
        // (1,2) each resolve once, giving exactly three contacts.
        let mut bodies = Bodies::new();
        for x in [200.0, 200.0, 210.0] {
            bodies
                .insert(Body::new(Vec2::new(x, 300.0), tag(4), Duration::ZERO))
                .expect("unbounded");
        }
        let report = bodies.step(Duration::ZERO, field());
        assert_eq!(report.contacts, 3);
    }

    #[test]
    fn contacts_are_detected_on_integrated_positions() {
        // 40 apart at spawn, 28 apart once 0.1 s of drift is applied.
        let mut bodies = Bodies::new();
        let a = Body::new(Vec2::new(100.0, 300.0), tag(1), Duration::ZERO)
            .with_velocity(Vec2::new(60.0, 0.0));
        let b = Body::new(Vec2::new(140.0, 300.0), tag(2), Duration::ZERO)
            .with_velocity(Vec2::new(-60.0, 0.0));
        bodies.insert(a).expect("unbounded");
        bodies.insert(b).expect("unbounded");

        let report = bodies.step(Duration::from_millis(100), field());
        assert_eq!(report.contacts, 1);

        let a = bodies.get(0).expect("body 0");
        let b = bodies.get(1).expect("body 1");
        assert!(a.position().distance(b.position()) >= 33.0 - 1e-3);
        assert!(a.velocity().x < 0.0 && b.velocity().x > 0.0);
    }

    #[test]
    fn stats_accumulate_contacts() {
        let mut stats = StepStats::default();
        stats.record(StepReport {
            integrated: 4,
            contacts: 2,
        });
        stats.record(StepReport {
            integrated: 4,
            contacts: 1,
        });
        assert_eq!(stats.steps, 2);
        assert_eq!(stats.total_contacts, 3);
        assert_eq!(stats.last.contacts, 1);
    }

    #[test]
    fn empty_step_is_a_no_op() {
        let mut bodies = Bodies::new();
        assert_eq!(bodies.step(Duration::from_secs(1), field()), StepReport::default());
    }
}
