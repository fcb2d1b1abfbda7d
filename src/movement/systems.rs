//! Per-tick systems running the grid steppers on the app schedule.

use bevy::prelude::*;

use crate::components::BodyVelocity;
use crate::input::{Controls, DirectionSource, HeldDirection};
use crate::movement::plugin::{Idled, Moved, Stopped};
use crate::movement::{GridMover, StepAction};

/// Advances every [`GridMover`] by one tick and writes its body velocity.
///
/// Movement events are triggered for observers: [`Stopped`] on the tick a
/// step completes, then either [`Idled`] or [`Moved`] depending on input.
/// Bookkeeping ticks without motion leave the body still.
#[expect(
    clippy::needless_pass_by_value,
    reason = "Bevy system parameters use `Res<T>` by value."
)]
pub fn step_grid_movers(
    mut commands: Commands,
    held: Res<HeldDirection>,
    controls: Res<Controls>,
    mut movers: Query<(Entity, &mut GridMover, &mut BodyVelocity)>,
) {
    for (entity, mut mover, mut body) in &mut movers {
        let outcome = mover.stepper.step(held.held_direction(), &*controls);

        if let Some(direction) = outcome.stopped {
            commands.trigger(Stopped { entity, direction });
        }

        match outcome.action {
            StepAction::Idle => {
                body.0 = IVec2::ZERO;
                commands.trigger(Idled { entity });
            }
            StepAction::Hold => {
                body.0 = IVec2::ZERO;
            }
            StepAction::Move {
                velocity,
                direction,
                axis,
            } => {
                #[expect(
                    clippy::cast_possible_wrap,
                    reason = "Per-frame velocities are bounded by the tile size."
                )]
                let signed = direction.unit_offset() * (velocity as i32);
                // unit_offset is zero on the perpendicular axis, so this
                // assignment also rules out diagonal motion.
                body.0 = signed;
                commands.trigger(Moved {
                    entity,
                    velocity,
                    direction,
                    axis,
                });
            }
        }
    }
}

/// Applies body velocities to transforms, one frame's pixels at a time.
pub fn apply_body_velocity(mut bodies: Query<(&BodyVelocity, &mut Transform), With<GridMover>>) {
    for (velocity, mut transform) in &mut bodies {
        if !velocity.is_moving() {
            continue;
        }
        let delta = velocity.0.as_vec2();
        transform.translation.x += delta.x;
        transform.translation.y += delta.y;
    }
}
