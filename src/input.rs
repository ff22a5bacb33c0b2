//! Mouse input: a left click inside the window spawns a body under the cursor.

use bevy::input::ButtonInput;
use bevy::prelude::*;
use bevy::window::PrimaryWindow;

use crate::body::BodyTag;
use crate::simulation::{SimSet, SpawnBody};

pub struct ClickSpawnPlugin;

impl Plugin for ClickSpawnPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Update, click_spawn_system.in_set(SimSet::Input));
    }
}

/// Handle user input for spawning bodies (left click only).
///
/// Bevy reports the cursor with a top-left origin and `y` growing downward,
/// which is already the simulation's screen space, so no conversion happens
/// here.
pub fn click_spawn_system(
    buttons: Res<ButtonInput<MouseButton>>,
    windows: Query<&Window, With<PrimaryWindow>>,
    mut spawns: MessageWriter<SpawnBody>,
) {
    if !buttons.just_pressed(MouseButton::Left) {
        return;
    }
    let Ok(window) = windows.single() else {
        return;
    };
    let Some(cursor) = window.cursor_position() else {
        return;
    };

    let tag = BodyTag::random(&mut rand::thread_rng());
    spawns.write(SpawnBody {
        position: cursor,
        tag,
    });
}
