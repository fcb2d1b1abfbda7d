#![cfg(feature = "test-support")]
//! Helpers for exercising the town map systems without loading assets.
//!
//! Tiled normally spawns `Collidable` tiles and `PlayerSpawn` markers while
//! hydrating a map; these helpers plant the same marker entities by hand and
//! raise the map-created event, so the indexing and spawn systems run
//! against a world no `.tmx` file ever touched.

use bevy::prelude::*;
use bevy_ecs_tiled::prelude::{MapCreated, TiledEvent, TilePos};
use oakhollow::map::{Collidable, PlayerSpawn};
use oakhollow::Player;

/// Plants a `PlayerSpawn` marker at `position`.
pub fn spawn_player_spawn_point(world: &mut World, position: Vec3) -> Entity {
    world
        .spawn((PlayerSpawn, Transform::from_translation(position)))
        .id()
}

/// Plants a `Collidable` tile at grid coordinate (`x`, `y`).
pub fn spawn_collidable_tile(world: &mut World, x: u32, y: u32) -> Entity {
    world.spawn((Collidable, TilePos { x, y })).id()
}

/// Raises the map-created event the map systems listen for.
#[expect(deprecated, reason = "bevy_ecs_tiled 0.10 uses the legacy Event API.")]
pub fn raise_map_created(world: &mut World) {
    world.send_event(TiledEvent::new(Entity::PLACEHOLDER, MapCreated));
}

/// Raises the map-created event and runs one schedule pass.
pub fn run_map_created_pass(app: &mut App) {
    raise_map_created(app.world_mut());
    app.update();
}

/// First entity carrying the `Player` marker, if any.
pub fn find_player(world: &mut World) -> Option<Entity> {
    let mut query = world.query_filtered::<Entity, With<Player>>();
    query.iter(world).next()
}

/// Number of entities carrying the `Player` marker.
pub fn count_players(world: &mut World) -> usize {
    let mut query = world.query_filtered::<Entity, With<Player>>();
    query.iter(world).count()
}
