use bevy::prelude::*;
use bevy::window::WindowResolution;
use std::env;

use ballpit::config::AppConfig;
use ballpit::constants::CONFIG_PATH;
use ballpit::graphics;
use ballpit::input::ClickSpawnPlugin;
use ballpit::rendering::RenderingPlugin;
use ballpit::simulation::SimulationPlugin;
use ballpit::test_mode::{self, TEST_ENV_VAR};

fn main() {
    // Check for test mode
    let test_mode = env::var(TEST_ENV_VAR).ok();

    // The window is created before Startup, so the config is read up front.
    let config = AppConfig::load_or_default(CONFIG_PATH);

    let mut app = App::new();

    app.add_plugins(DefaultPlugins.set(WindowPlugin {
        primary_window: Some(Window {
            title: config.window_title.clone(),
            resolution: WindowResolution::new(
                config.window_width as u32,
                config.window_height as u32,
            ),
            resizable: config.resizable,
            ..Default::default()
        }),
        ..Default::default()
    }))
    .insert_resource(ClearColor(Color::BLACK))
    .insert_resource(config)
    .add_plugins((SimulationPlugin, RenderingPlugin))
    .add_systems(Startup, graphics::setup_camera);

    match test_mode {
        Some(test_name) => test_mode::configure_test_mode(&mut app, &test_name),
        None => {
            app.add_plugins(ClickSpawnPlugin);
        }
    }

    app.run();
}
