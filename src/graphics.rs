use bevy::prelude::*;

/// Setup camera for 2D rendering.
///
/// A default `Camera2d` maps one world unit to one logical pixel, so the
/// visible world spans exactly the window and `rendering::screen_to_world`
/// needs no scale factor.
pub fn setup_camera(mut commands: Commands) {
    commands.spawn(Camera2d);
    eprintln!("[SETUP] Camera spawned");
}
