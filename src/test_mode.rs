use bevy::prelude::*;

use crate::simulation::{self, SimSet};
use crate::testing::{self, Scenario, TestConfig};

/// Environment variable that switches the binary into scripted test mode.
pub const TEST_ENV_VAR: &str = "BALLPIT_TEST";

/// Wire a scripted scenario into `app`: seed bodies at startup, log and
/// verify after every step.
pub fn configure_test_mode(app: &mut App, test_name: &str) {
    let scenario = Scenario::from_name(test_name);
    app.insert_resource(TestConfig::for_scenario(scenario));

    app.add_systems(
        Startup,
        testing::spawn_scenario_system.after(simulation::apply_config_system),
    );

    app.add_systems(
        Update,
        (
            testing::test_logging_system,
            testing::test_verification_system,
        )
            .chain()
            .after(SimSet::Step),
    );

    println!("Running test: {}", scenario.name());
}
