//! Mesh2d rendering of bodies.
//!
//! | Piece                        | Schedule      | Purpose                                   |
//! |------------------------------|---------------|-------------------------------------------|
//! | `init_body_assets`           | Startup       | Shared circle mesh + one material per tag |
//! | `attach_body_sprites_system` | Update (Sync) | One `BodySprite` entity per new body      |
//! | `sync_body_sprites_system`   | Update (Sync) | Copy body positions into `Transform`s     |
//!
//! The physics runs in screen space (top-left origin, `y` down) while the
//! `Camera2d` looks at a world centred on the origin with `y` up;
//! [`screen_to_world`] bridges the two.

use bevy::prelude::*;
use bevy_asset::RenderAssetUsages;
use bevy_mesh::{Indices, PrimitiveTopology};

use crate::body::{BodyTag, Playfield};
use crate::config::AppConfig;
use crate::constants::{TAG_MAX, TAG_MIN};
use crate::simulation::{apply_config_system, Bodies, SimSet};

// ── Resources & components ────────────────────────────────────────────────────

/// Shared render assets, created once at startup.
#[derive(Resource)]
pub struct BodyAssets {
    pub mesh: Handle<Mesh>,
    /// Indexed by `tag - TAG_MIN`.
    pub materials: Vec<Handle<ColorMaterial>>,
}

impl BodyAssets {
    pub fn material_for(&self, tag: BodyTag) -> Handle<ColorMaterial> {
        self.materials[(tag.get() - TAG_MIN) as usize].clone()
    }
}

/// Render entity for the body at this index of [`Bodies`].
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct BodySprite(pub usize);

// ── Plugin ────────────────────────────────────────────────────────────────────

pub struct RenderingPlugin;

impl Plugin for RenderingPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, init_body_assets.after(apply_config_system))
            .add_systems(
                Update,
                (attach_body_sprites_system, sync_body_sprites_system)
                    .chain()
                    .in_set(SimSet::Sync),
            );
    }
}

// ── Color & coordinates ───────────────────────────────────────────────────────

/// Fill color for a tag.
///
/// Tag 5 gets orange so every tag a click can produce has its own color.
pub fn tag_color(tag: BodyTag) -> Color {
    match tag.get() {
        1 => Color::srgb_u8(255, 0, 0),
        2 => Color::srgb_u8(0, 200, 0),
        3 => Color::srgb_u8(0, 0, 255),
        4 => Color::srgb_u8(128, 0, 128),
        _ => Color::srgb_u8(255, 165, 0),
    }
}

/// Map a screen-space point into the centred, y-up world the camera sees.
pub fn screen_to_world(screen: Vec2, playfield: Playfield) -> Vec2 {
    Vec2::new(
        screen.x - playfield.width / 2.0,
        playfield.height / 2.0 - screen.y,
    )
}

// ── Systems ───────────────────────────────────────────────────────────────────

fn init_body_assets(
    mut commands: Commands,
    config: Res<AppConfig>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<ColorMaterial>>,
) {
    let mesh = meshes.add(circle_mesh(config.draw_radius, config.circle_sides));
    let materials = (TAG_MIN..=TAG_MAX)
        .filter_map(|v| BodyTag::new(v).ok())
        .map(|tag| materials.add(ColorMaterial::from_color(tag_color(tag))))
        .collect();
    commands.insert_resource(BodyAssets { mesh, materials });
    eprintln!("[SETUP] Body mesh and tag materials created");
}

/// Spawn a sprite for every body appended since the previous frame.
///
/// Bodies are never removed, so a running count is enough to find new ones.
pub fn attach_body_sprites_system(
    mut commands: Commands,
    bodies: Res<Bodies>,
    assets: Res<BodyAssets>,
    playfield: Res<Playfield>,
    mut rendered: Local<usize>,
) {
    for (index, body) in bodies.iter().enumerate().skip(*rendered) {
        let world = screen_to_world(body.position(), *playfield);
        commands.spawn((
            BodySprite(index),
            Mesh2d(assets.mesh.clone()),
            MeshMaterial2d(assets.material_for(body.tag())),
            Transform::from_translation(world.extend(0.0)),
        ));
    }
    *rendered = bodies.len();
}

pub fn sync_body_sprites_system(
    bodies: Res<Bodies>,
    playfield: Res<Playfield>,
    mut sprites: Query<(&BodySprite, &mut Transform)>,
) {
    for (sprite, mut transform) in sprites.iter_mut() {
        if let Some(body) = bodies.get(sprite.0) {
            let world = screen_to_world(body.position(), *playfield);
            transform.translation.x = world.x;
            transform.translation.y = world.y;
        }
    }
}

// ── Geometry helpers ──────────────────────────────────────────────────────────

/// Fan-triangulated filled circle centred on the origin, built like the
/// particle mesh: centre vertex first, then `sides` rim vertices.
pub fn circle_mesh(radius: f32, sides: u32) -> Mesh {
    let n = sides as usize;
    let mut positions: Vec<[f32; 3]> = Vec::with_capacity(n + 1);
    let mut normals: Vec<[f32; 3]> = Vec::with_capacity(n + 1);
    let mut uvs: Vec<[f32; 2]> = Vec::with_capacity(n + 1);

    positions.push([0.0, 0.0, 0.0]);
    normals.push([0.0, 0.0, 1.0]);
    uvs.push([0.5, 0.5]);

    for i in 0..n {
        let angle = std::f32::consts::TAU * i as f32 / n as f32;
        let (x, y) = (radius * angle.cos(), radius * angle.sin());
        positions.push([x, y, 0.0]);
        normals.push([0.0, 0.0, 1.0]);
        uvs.push([x / (2.0 * radius) + 0.5, y / (2.0 * radius) + 0.5]);
    }

    let indices: Vec<u32> = (0..sides)
        .flat_map(|i| [0, i + 1, (i + 1) % sides + 1])
        .collect();

    let mut mesh = Mesh::new(
        PrimitiveTopology::TriangleList,
        RenderAssetUsages::RENDER_WORLD,
    );
    mesh.insert_attribute(Mesh::ATTRIBUTE_POSITION, positions);
    mesh.insert_attribute(Mesh::ATTRIBUTE_NORMAL, normals);
    mesh.insert_attribute(Mesh::ATTRIBUTE_UV_0, uvs);
    mesh.insert_indices(Indices::U32(indices));
    mesh
}
