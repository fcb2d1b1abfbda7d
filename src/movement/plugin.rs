//! Bevy plugin wiring the movement pipeline into the schedule.

use bevy::prelude::*;

use crate::animation::{set_stand_animation, set_walk_animation};
use crate::collision::{resolve_static_collisions, CollisionIndex};
use crate::input::{poll_held_direction, Axis, Controls, Direction, HeldDirection};
use crate::movement::systems::{apply_body_velocity, step_grid_movers};
use crate::movement::MovementSettings;

/// Event raised on each tick an entity covers ground.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Moved {
    /// Entity that moved.
    pub entity: Entity,
    /// Unsigned pixels covered this frame.
    pub velocity: u32,
    /// Direction of travel.
    pub direction: Direction,
    /// Axis the motion happened on.
    pub axis: Axis,
}

/// Event raised once when an entity's tile-step completes.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Stopped {
    /// Entity that finished its step.
    pub entity: Entity,
    /// Direction the finished step travelled in.
    pub direction: Direction,
}

/// Event raised on ticks where an entity is at rest with no input held.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Idled {
    /// Entity standing still.
    pub entity: Entity,
}

/// Bevy plugin installing the grid movement pipeline.
///
/// Update order is input poll, stepper tick, velocity application, then
/// static collision response, all chained so a tick is fully resolved
/// before the next system observes it. Animation observers react to the
/// triggered movement events.
#[derive(Default)]
pub struct GridMovementPlugin;

impl Plugin for GridMovementPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<Controls>();
        app.init_resource::<HeldDirection>();
        app.init_resource::<MovementSettings>();
        app.init_resource::<CollisionIndex>();

        app.add_observer(set_walk_animation);
        app.add_observer(set_stand_animation);

        app.add_systems(
            Update,
            (
                poll_held_direction.run_if(resource_exists::<ButtonInput<KeyCode>>),
                step_grid_movers,
                apply_body_velocity,
                resolve_static_collisions,
            )
                .chain(),
        );
    }
}
