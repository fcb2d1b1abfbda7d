//! Town map plugin wiring Tiled maps into the game.
//!
//! `TownMapPlugin` owns the "load the authored town into ECS" entry point
//! and the translation of authored annotations into game state:
//!
//! - It registers `bevy_ecs_tiled::TiledPlugin` so `.tmx` assets can load.
//! - It spawns a root entity with a `TiledMap` component, which triggers the
//!   `bevy_ecs_tiled` spawn pipeline (layers, tilemaps, etc).
//! - It feeds tiles marked `Collidable` into the [`CollisionIndex`] so they
//!   block grid movement.
//! - It places the player at the authored `PlayerSpawn` point with a
//!   [`GridMover`] driven by the current [`MovementSettings`].
//!
//! Rendering, tile parsing, and animation playback stay with the engine;
//! this module only translates authored data into typed game state.

use bevy::asset::RecursiveDependencyLoadState;
use bevy::ecs::prelude::On;
use bevy::prelude::*;
use bevy_ecs_tiled::prelude::{MapCreated, TiledEvent, TiledMap, TiledMapAsset, TiledPlugin, TilePos};
use log::error;
use thiserror::Error;

use crate::collision::CollisionIndex;
use crate::components::{AnimationKey, BodyVelocity, Player};
use crate::constants::PLAYER_Z_LAYER;
use crate::movement::{GridMover, MovementSettings};

/// Default Tiled map asset path for the town.
pub const TOWN_MAP_PATH: &str = "maps/oak-hollow-town.tmx";

/// Errors emitted by the map plugin when it cannot load the requested map.
#[derive(Event, Debug, Clone, PartialEq, Eq, Error)]
pub enum TownMapError {
    /// The configured path was invalid for filesystem-backed assets.
    #[error("invalid town map asset path: {path}")]
    InvalidMapAssetPath {
        /// Asset-server path configured for the town map.
        path: String,
    },
    /// The town map asset failed to load.
    #[error("town map '{path}' failed to load: {detail}")]
    MapLoadFailed {
        /// Asset-server path configured for the town map.
        path: String,
        /// Human-readable detail describing why the load failed.
        detail: String,
    },
}

/// Newtype representing a Bevy asset-server path (relative to the asset root).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MapAssetPath(String);

impl MapAssetPath {
    /// Creates a new asset path.
    ///
    /// The path must be relative to the Bevy asset root.
    pub fn new(path: impl Into<String>) -> Self {
        Self(path.into())
    }

    /// Borrows the underlying asset path string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for MapAssetPath {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl From<&str> for MapAssetPath {
    fn from(path: &str) -> Self {
        Self::new(path)
    }
}

impl Default for MapAssetPath {
    fn default() -> Self {
        Self::new(TOWN_MAP_PATH)
    }
}

/// Runtime configuration for map loading.
#[derive(Resource, Clone, Debug)]
pub struct TownMapSettings {
    /// Selected `.tmx` file to load as the town map.
    pub town_map: MapAssetPath,
    /// When true, the plugin spawns the town map in `PostStartup`.
    pub should_spawn_town_map: bool,
    /// When true, the plugin spawns a minimal `Camera2d` if none exists.
    pub should_bootstrap_camera: bool,
}

impl Default for TownMapSettings {
    fn default() -> Self {
        Self {
            town_map: MapAssetPath::default(),
            should_spawn_town_map: true,
            should_bootstrap_camera: true,
        }
    }
}

/// Marker set by Tiled to flag tiles that block movement.
#[derive(Component, Reflect, Default, Debug, Clone, Copy, PartialEq, Eq)]
#[reflect(Component, Default)]
pub struct Collidable;

/// Marker describing where the player should spawn.
#[derive(Component, Reflect, Default, Debug, Clone, Copy, PartialEq, Eq)]
#[reflect(Component, Default)]
pub struct PlayerSpawn;

/// Marker indicating that this `PlayerSpawn` point has been consumed.
///
/// Ensures idempotent spawning: the spawn system skips entities with this
/// marker, making it safe to run multiple times.
#[derive(Component, Reflect, Default, Debug, Clone, Copy, PartialEq, Eq)]
#[reflect(Component, Default)]
pub struct PlayerSpawnConsumed;

/// Marker indicating that a `Collidable` tile is already in the index.
#[derive(Component, Reflect, Default, Debug, Clone, Copy, PartialEq, Eq)]
#[reflect(Component, Default)]
pub struct CollisionIndexed;

/// Marker for entities spawned by the map spawn system.
#[derive(Component, Reflect, Default, Debug, Clone, Copy, PartialEq, Eq)]
#[reflect(Component, Default)]
pub struct MapSpawned;

/// Marker component for the root entity of the loaded town map.
///
/// Tests can spawn entities with this marker to simulate an existing map
/// without loading assets.
#[derive(Component, Debug, Default)]
pub struct TownMap;

#[cfg(feature = "render")]
#[derive(Component, Debug)]
struct MapBootstrapCamera;

#[derive(Resource, Default)]
struct TownMapPluginInstalled;

/// Resource tracking the town map asset loading state.
///
/// Persists the asset handle and path so load failures can be reported even
/// if the map entity is despawned during error handling.
#[derive(Resource, Debug, Default)]
pub struct TownMapAssetTracking {
    /// Asset-server path of the currently loaded or loading map.
    pub asset_path: Option<String>,
    /// Strong handle to the map asset, kept alive during loading.
    pub handle: Option<Handle<TiledMapAsset>>,
    /// Whether loading has completed (successfully or with failure).
    pub has_finalised: bool,
}

/// Bundle of components for the player entity.
///
/// Provides the minimal set needed to participate in grid movement,
/// collision response, and animation key selection.
#[derive(Bundle)]
pub struct PlayerBundle {
    /// Player marker for player-specific queries.
    pub player: Player,
    /// Map-spawned marker for origin tracking.
    pub map_spawned: MapSpawned,
    /// Grid movement state machine.
    pub mover: GridMover,
    /// Per-frame body velocity (initialised to zero).
    pub velocity: BodyVelocity,
    /// Current animation key (initially standing, facing down).
    pub animation: AnimationKey,
    /// World-space transform from the spawn point.
    pub transform: Transform,
    /// Human-readable name for debugging.
    pub name: Name,
}

impl PlayerBundle {
    /// Creates the player bundle at the given spawn transform.
    #[must_use]
    pub fn new(spawn_transform: &Transform, settings: &MovementSettings) -> Self {
        Self {
            player: Player,
            map_spawned: MapSpawned,
            mover: GridMover::new(&settings.stepper_config()),
            velocity: BodyVelocity::default(),
            animation: AnimationKey::default(),
            transform: Transform::from_xyz(
                spawn_transform.translation.x,
                spawn_transform.translation.y,
                PLAYER_Z_LAYER,
            ),
            name: Name::new("Player"),
        }
    }
}

fn validate_asset_path(asset_path: &str) -> Result<(), TownMapError> {
    if asset_path.is_empty() || asset_path.starts_with('/') || asset_path.contains("..") {
        return Err(TownMapError::InvalidMapAssetPath {
            path: asset_path.to_owned(),
        });
    }

    Ok(())
}

#[cfg(feature = "render")]
#[expect(
    clippy::needless_pass_by_value,
    reason = "Bevy system parameters use `Res<T>` by value."
)]
fn bootstrap_camera_if_missing(
    mut commands: Commands,
    settings: Res<TownMapSettings>,
    cameras: Query<(), With<Camera2d>>,
) {
    if !settings.should_bootstrap_camera || !cameras.is_empty() {
        return;
    }

    commands.spawn((
        Camera2d,
        Name::new("MapBootstrapCamera"),
        MapBootstrapCamera,
    ));
}

/// Keeps the bootstrap camera centred on the player.
#[cfg(feature = "render")]
#[expect(
    clippy::type_complexity,
    reason = "Bevy ECS query with filter combinators is inherently verbose."
)]
fn follow_player_camera(
    players: Query<&Transform, (With<Player>, Without<MapBootstrapCamera>)>,
    mut cameras: Query<&mut Transform, With<MapBootstrapCamera>>,
) {
    let Some(player) = players.iter().next() else {
        return;
    };
    for mut camera in &mut cameras {
        camera.translation.x = player.translation.x;
        camera.translation.y = player.translation.y;
    }
}

#[expect(
    clippy::needless_pass_by_value,
    reason = "Bevy system parameters use `Res<T>` by value."
)]
fn spawn_town_map_if_enabled(
    mut commands: Commands,
    asset_server: Res<AssetServer>,
    settings: Res<TownMapSettings>,
    existing_maps: Query<(), With<TownMap>>,
    mut tracking: ResMut<TownMapAssetTracking>,
) {
    if !settings.should_spawn_town_map {
        return;
    }

    // A committed asset path means a load is already in flight or done.
    if tracking.asset_path.is_some() || !existing_maps.is_empty() {
        return;
    }

    let asset_path = settings.town_map.as_str().to_owned();
    if let Err(err) = validate_asset_path(&asset_path) {
        commands.trigger(err);
        return;
    }

    let handle = asset_server.load(asset_path.clone());
    tracking.asset_path = Some(asset_path);
    tracking.handle = Some(handle.clone());
    tracking.has_finalised = false;
    commands.spawn((Name::new("TownMap"), TownMap, TiledMap(handle)));
}

fn try_spawn_town_map_on_build(app: &mut App) {
    let world = app.world_mut();

    let (should_spawn, asset_path) = world
        .get_resource::<TownMapSettings>()
        .map_or((false, String::new()), |settings| {
            (
                settings.should_spawn_town_map,
                settings.town_map.as_str().to_owned(),
            )
        });

    if !should_spawn {
        return;
    }

    let mut existing_maps = world.query_filtered::<Entity, With<TownMap>>();
    if existing_maps.iter(world).next().is_some() {
        return;
    }

    if let Err(err) = validate_asset_path(&asset_path) {
        world.trigger(err);
        return;
    }

    let Some(asset_server) = world.get_resource::<AssetServer>() else {
        return;
    };

    let handle = asset_server.load(asset_path.clone());
    {
        let mut tracking = world.resource_mut::<TownMapAssetTracking>();
        tracking.asset_path = Some(asset_path);
        tracking.handle = Some(handle.clone());
        tracking.has_finalised = false;
    }
    world.spawn((Name::new("TownMap"), TownMap, TiledMap(handle)));
}

#[expect(
    clippy::needless_pass_by_value,
    reason = "Bevy system parameters use `Res<T>` by value."
)]
fn monitor_town_map_load_state(
    mut commands: Commands,
    asset_server: Res<AssetServer>,
    mut tracking: ResMut<TownMapAssetTracking>,
) {
    if tracking.has_finalised {
        return;
    }

    let Some(handle) = tracking.handle.clone() else {
        return;
    };

    match asset_server.recursive_dependency_load_state(handle.id()) {
        RecursiveDependencyLoadState::Loaded => {
            tracking.has_finalised = true;
        }
        RecursiveDependencyLoadState::Failed(load_error) => {
            commands.trigger(TownMapError::MapLoadFailed {
                path: tracking.asset_path.clone().unwrap_or_default(),
                detail: load_error.to_string(),
            });
            tracking.has_finalised = true;
        }
        RecursiveDependencyLoadState::NotLoaded | RecursiveDependencyLoadState::Loading => {}
    }
}

/// Feeds tiles authored as `Collidable` into the [`CollisionIndex`].
///
/// Runs on `TiledEvent<MapCreated>` so all tiles are spawned and their
/// custom properties hydrated first. Idempotent: indexed tiles carry
/// [`CollisionIndexed`] and are skipped on later events.
///
/// Tile coordinates map directly onto collision grid coordinates: the map
/// is anchored at the world origin and `bevy_ecs_tilemap` tile positions
/// are y-up like the world.
#[expect(deprecated, reason = "bevy_ecs_tiled 0.10 uses the legacy Event API.")]
#[expect(
    clippy::type_complexity,
    reason = "Bevy ECS query with filter combinators is inherently verbose."
)]
pub fn index_collidable_tiles(
    mut commands: Commands,
    mut map_events: EventReader<TiledEvent<MapCreated>>,
    collidable_tiles: Query<(Entity, &TilePos), (With<Collidable>, Without<CollisionIndexed>)>,
    mut index: ResMut<CollisionIndex>,
) {
    // Only process when a map has just finished loading.
    if map_events.is_empty() {
        return;
    }
    for _ in map_events.read() {}

    let mut indexed = 0_usize;
    for (entity, tile_pos) in &collidable_tiles {
        #[expect(
            clippy::cast_possible_wrap,
            reason = "Tile coordinates in practical maps fit comfortably in i32."
        )]
        let tile = IVec2::new(tile_pos.x as i32, tile_pos.y as i32);
        index.block(tile);
        commands.entity(entity).insert(CollisionIndexed);
        indexed += 1;
    }

    if indexed > 0 {
        log::info!("indexed {indexed} collidable tiles ({} total)", index.len());
    }
}

/// Spawns the player at the authored `PlayerSpawn` point.
///
/// Listens for `TiledEvent<MapCreated>`; when multiple spawn points exist,
/// the one with the lowest entity ID wins so behaviour is deterministic.
/// Consumed spawn points are marked and skipped, making the system
/// idempotent across repeated events.
#[expect(deprecated, reason = "bevy_ecs_tiled 0.10 uses the legacy Event API.")]
#[expect(
    clippy::type_complexity,
    reason = "Bevy ECS query with filter combinators is inherently verbose."
)]
#[expect(
    clippy::needless_pass_by_value,
    reason = "Bevy system parameters use `Res<T>` by value."
)]
pub fn spawn_player_at_spawn_point(
    mut commands: Commands,
    mut map_events: EventReader<TiledEvent<MapCreated>>,
    player_spawns: Query<(Entity, &Transform), (With<PlayerSpawn>, Without<PlayerSpawnConsumed>)>,
    movement_settings: Res<MovementSettings>,
) {
    if map_events.is_empty() {
        return;
    }
    for _ in map_events.read() {}

    let mut spawns: Vec<_> = player_spawns.iter().collect();
    spawns.sort_by_key(|(entity, _)| *entity);

    if let Some((spawn_entity, transform)) = spawns.first() {
        let player_entity = commands
            .spawn(PlayerBundle::new(transform, &movement_settings))
            .id();

        commands.entity(*spawn_entity).insert(PlayerSpawnConsumed);

        log::info!(
            "spawned player at ({}, {}) from spawn point {spawn_entity:?} -> {player_entity:?}",
            transform.translation.x,
            transform.translation.y,
        );
    }
}

#[expect(
    clippy::needless_pass_by_value,
    reason = "Observer systems must accept On<T> by value."
)]
fn log_map_error(event: On<TownMapError>) {
    error!("map error: {}", event.event());
}

/// Bevy plugin exposing Tiled town map support.
///
/// The plugin is safe to add multiple times: it guarantees `TiledPlugin` is
/// present, and installs game-specific systems only once.
#[derive(Debug)]
pub struct TownMapPlugin;

impl Plugin for TownMapPlugin {
    fn build(&self, app: &mut App) {
        if !app.is_plugin_added::<TiledPlugin>() {
            app.add_plugins(TiledPlugin::default());
        }

        if app.world().contains_resource::<TownMapPluginInstalled>() {
            return;
        }

        app.insert_resource(TownMapPluginInstalled);
        app.register_type::<Collidable>()
            .register_type::<PlayerSpawn>()
            .register_type::<PlayerSpawnConsumed>()
            .register_type::<CollisionIndexed>()
            .register_type::<MapSpawned>();
        app.add_observer(log_map_error);
        app.init_resource::<TownMapSettings>();
        app.init_resource::<TownMapAssetTracking>();
        app.init_resource::<CollisionIndex>();
        app.init_resource::<MovementSettings>();
        try_spawn_town_map_on_build(app);
        #[cfg(feature = "render")]
        app.add_systems(Startup, bootstrap_camera_if_missing);
        app.add_systems(PostStartup, spawn_town_map_if_enabled);
        app.add_systems(
            Update,
            (
                monitor_town_map_load_state,
                index_collidable_tiles,
                spawn_player_at_spawn_point,
            ),
        );
        #[cfg(feature = "render")]
        app.add_systems(PostUpdate, follow_player_camera);
    }

    fn is_unique(&self) -> bool {
        false
    }
}
