//! ECS component types shared between movement, collision, and animation.

use bevy::prelude::*;
use glam::IVec2;

/// Marker for the player-controlled entity.
#[derive(Component, Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Player;

/// Per-frame body velocity in whole pixels.
///
/// Written by the movement stepper each tick and consumed by
/// [`crate::movement::apply_body_velocity`]; the collision response zeroes
/// components on overlap. At most one component is non-zero on any tick.
#[derive(Component, Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BodyVelocity(pub IVec2);

impl BodyVelocity {
    /// True when the body has motion on either axis.
    #[must_use]
    pub const fn is_moving(self) -> bool {
        self.0.x != 0 || self.0.y != 0
    }
}

/// Name of the animation the renderer should currently play.
///
/// Movement observers switch this between `walk_<dir>` and `stand_<dir>`
/// keys; playback itself belongs to the engine.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnimationKey(pub &'static str);

impl Default for AnimationKey {
    fn default() -> Self {
        Self("stand_down")
    }
}
