//! Headless tests for [`SimulationPlugin`].
//!
//! These tests use [`MinimalPlugins`] — no window, no rendering — so they run
//! fast in CI.  Without a primary window the playfield keeps the size taken
//! from [`AppConfig`] at startup.
//!
//! Covered scenarios:
//! 1. A `SpawnBody` message becomes a body on the next update.
//! 2. `max_bodies` from the config caps the collection.
//! 3. Bodies stay within the horizontal bounds across frames.
//! 4. The step system records its runs in `StepStats`.
//! 5. An invalid config resource is replaced by the defaults at startup.

use bevy::prelude::*;

use ballpit::body::{BodyTag, Playfield};
use ballpit::config::AppConfig;
use ballpit::simulation::{Bodies, SimulationPlugin, SpawnBody, StepStats};

// ── Helpers ───────────────────────────────────────────────────────────────────

fn app_with_config(config: AppConfig) -> App {
    let mut app = App::new();
    app.add_plugins(MinimalPlugins);
    app.insert_resource(config);
    app.add_plugins(SimulationPlugin);
    app.update(); // run Startup so the config is applied
    app
}

fn spawn(app: &mut App, x: f32, y: f32, tag: u8) {
    let tag = BodyTag::new(tag).expect("valid tag");
    app.world_mut().write_message(SpawnBody {
        position: Vec2::new(x, y),
        tag,
    });
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[test]
fn spawn_message_appends_body_at_rest() {
    let mut app = app_with_config(AppConfig::default());
    spawn(&mut app, 200.0, 150.0, 3);
    app.update();

    let bodies = app.world().resource::<Bodies>();
    assert_eq!(bodies.len(), 1);
    let b = bodies.get(0).expect("spawned body");
    assert_eq!(b.tag().get(), 3);
    assert!((b.position().x - 200.0).abs() < 1e-3, "x drifted: {}", b.position().x);
}

#[test]
fn playfield_follows_config_without_window() {
    let app = app_with_config(AppConfig {
        window_width: 1024.0,
        window_height: 512.0,
        ..Default::default()
    });
    let playfield = app.world().resource::<Playfield>();
    assert_eq!(*playfield, Playfield::new(1024.0, 512.0));
}

#[test]
fn config_limit_caps_collection() {
    let mut app = app_with_config(AppConfig {
        max_bodies: 3,
        ..Default::default()
    });
    for i in 0..5 {
        spawn(&mut app, 50.0 + 100.0 * i as f32, 100.0, 1);
    }
    app.update();

    assert_eq!(app.world().resource::<Bodies>().len(), 3);
}

#[test]
fn bodies_remain_inside_horizontal_bounds_over_frames() {
    let mut app = app_with_config(AppConfig::default());
    for i in 0..8 {
        spawn(&mut app, 40.0 + 90.0 * i as f32, 60.0 + 10.0 * i as f32, 2);
    }
    for _ in 0..30 {
        app.update();
    }

    let bodies = app.world().resource::<Bodies>();
    assert_eq!(bodies.len(), 8);
    for b in bodies.iter() {
        assert!(b.position().is_finite());
        assert!(b.position().x >= 0.0 && b.position().x <= 800.0);
    }
}

#[test]
fn step_system_records_stats_once_bodies_exist() {
    let mut app = app_with_config(AppConfig::default());
    app.update();
    assert_eq!(app.world().resource::<StepStats>().steps, 0, "empty world is not stepped");

    spawn(&mut app, 400.0, 300.0, 5);
    app.update();
    app.update();

    let stats = app.world().resource::<StepStats>();
    assert_eq!(stats.steps, 2);
    assert_eq!(stats.last.integrated, 1);
}

#[test]
fn invalid_config_resource_falls_back_to_defaults() {
    let app = app_with_config(AppConfig {
        window_width: 0.0,
        circle_sides: 2,
        max_bodies: 4,
        ..Default::default()
    });

    let config = app.world().resource::<AppConfig>();
    assert!(config.validate().is_ok());
    assert_eq!(config.circle_sides, AppConfig::default().circle_sides);
    assert_eq!(config.max_bodies, 0);
    assert_eq!(*app.world().resource::<Playfield>(), Playfield::new(800.0, 600.0));
    assert_eq!(app.world().resource::<Bodies>().limit(), None);
}
