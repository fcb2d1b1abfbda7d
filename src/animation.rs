//! Movement-to-animation glue.
//!
//! Playback belongs to the engine; this module only decides which
//! animation key an entity should be showing. Keys follow the
//! `walk_<direction>` / `stand_<direction>` convention the sprite sheets
//! are authored against.

use bevy::ecs::prelude::On;
use bevy::prelude::*;

use crate::components::AnimationKey;
use crate::input::Direction;
use crate::movement::{Moved, Stopped};

/// Walking animation key for `direction`.
#[must_use]
pub const fn walk_animation(direction: Direction) -> &'static str {
    match direction {
        Direction::Up => "walk_up",
        Direction::Down => "walk_down",
        Direction::Left => "walk_left",
        Direction::Right => "walk_right",
    }
}

/// Standing animation key facing `direction`.
#[must_use]
pub const fn stand_animation(direction: Direction) -> &'static str {
    match direction {
        Direction::Up => "stand_up",
        Direction::Down => "stand_down",
        Direction::Left => "stand_left",
        Direction::Right => "stand_right",
    }
}

/// Frame delay in milliseconds for walk cycles.
///
/// Faster steppers get shorter frames: the delay is the frame rate plus
/// its share per velocity pixel, which keeps the walk cycle in phase with
/// one tile-step.
#[must_use]
pub fn walk_frame_delay(frame_rate: u32, step_velocity: u32) -> f32 {
    let rate = f64::from(frame_rate);
    let delay = rate + rate / f64::from(step_velocity.max(1));
    #[expect(
        clippy::cast_possible_truncation,
        reason = "Frame delays are small positive values well inside f32 range."
    )]
    let delay_ms = delay as f32;
    delay_ms
}

/// Switches a moving entity to its walk animation.
#[expect(
    clippy::needless_pass_by_value,
    reason = "Observer systems must accept On<T> by value."
)]
pub fn set_walk_animation(event: On<Moved>, mut keys: Query<&mut AnimationKey>) {
    let Moved {
        entity, direction, ..
    } = *event.event();
    if let Ok(mut key) = keys.get_mut(entity) {
        let name = walk_animation(direction);
        if key.0 != name {
            key.0 = name;
        }
    }
}

/// Faces a stopped entity along its finished step.
#[expect(
    clippy::needless_pass_by_value,
    reason = "Observer systems must accept On<T> by value."
)]
pub fn set_stand_animation(event: On<Stopped>, mut keys: Query<&mut AnimationKey>) {
    let Stopped { entity, direction } = *event.event();
    if let Ok(mut key) = keys.get_mut(entity) {
        key.0 = stand_animation(direction);
    }
}
