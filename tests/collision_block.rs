//! Integration tests for static collision response against blocked tiles.

use bevy::prelude::*;
use oakhollow::input::Direction;
use oakhollow::{
    AnimationKey, BodyVelocity, CollisionIndex, DebugOverlayPlugin, DebugOverlaySettings,
    GridMovementPlugin, GridMover, HeldDirection, MovementTelemetry, Player, StepperConfig,
};
use rstest::rstest;

fn blocked_world() -> (App, Entity) {
    let mut app = App::new();
    app.add_plugins(MinimalPlugins)
        .add_plugins(GridMovementPlugin)
        .add_plugins(DebugOverlayPlugin);
    app.insert_resource(DebugOverlaySettings { enabled: true });

    let mut index = CollisionIndex::new(32);
    index.block(IVec2::new(1, 0));
    app.insert_resource(index);

    let config = StepperConfig {
        distance_per_step: Some(32),
        velocity: Some(8),
        ..StepperConfig::default()
    };
    let entity = app
        .world_mut()
        .spawn((
            Player,
            GridMover::new(&config),
            BodyVelocity::default(),
            AnimationKey::default(),
            Transform::from_xyz(0.0, 0.0, 0.0),
        ))
        .id();
    (app, entity)
}

#[rstest]
fn wall_tile_blocks_the_step() {
    let (mut app, entity) = blocked_world();

    app.insert_resource(HeldDirection(Some(Direction::Right)));
    // A full step's worth of ticks: every frame advances into the wall and
    // is pushed straight back out.
    for _ in 0..4 {
        app.update();
    }

    let transform = app.world().get::<Transform>(entity).copied();
    let translation = transform.map(|t| t.translation).unwrap_or_default();
    assert_eq!(translation.x, 0.0, "mover should be pushed back out");
    assert_eq!(translation.y, 0.0);

    let velocity = app.world().get::<BodyVelocity>(entity).copied();
    assert_eq!(velocity, Some(BodyVelocity::default()));
}

#[rstest]
fn collision_is_reported_to_the_overlay() {
    let (mut app, _entity) = blocked_world();

    app.insert_resource(HeldDirection(Some(Direction::Right)));
    app.update();

    let telemetry = app.world().resource::<MovementTelemetry>();
    assert_eq!(telemetry.last_collision.as_deref(), Some("tile (1, 0)"));
}

#[rstest]
fn open_directions_remain_walkable() {
    let (mut app, entity) = blocked_world();

    app.insert_resource(HeldDirection(Some(Direction::Up)));
    for _ in 0..4 {
        app.update();
    }

    let transform = app.world().get::<Transform>(entity).copied();
    let translation = transform.map(|t| t.translation).unwrap_or_default();
    assert_eq!(translation.y, 32.0, "vertical path is unblocked");
    assert_eq!(translation.x, 0.0);
}
