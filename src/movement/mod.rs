//! Grid-snapping movement subsystem.
//!
//! [`stepper`] holds the engine-free state machine; [`systems`] runs it on
//! the app schedule and applies its velocities to transforms; [`plugin`]
//! wires everything together and delivers movement events to observers.

pub mod plugin;
pub mod stepper;
pub mod systems;

pub use plugin::{GridMovementPlugin, Idled, Moved, Stopped};
pub use stepper::{derived_step_velocity, GridStepper, StepAction, StepOutcome, StepperConfig};
pub use systems::{apply_body_velocity, step_grid_movers};

use bevy::prelude::*;

use crate::constants::DEFAULT_SPEED;

/// Component driving an entity with a [`GridStepper`].
#[derive(Component, Debug, Clone, PartialEq, Eq)]
pub struct GridMover {
    /// Stepper state machine owning this entity's buffered distance.
    pub stepper: GridStepper,
}

impl GridMover {
    /// Creates a mover with the given stepper configuration.
    #[must_use]
    pub fn new(config: &StepperConfig) -> Self {
        Self {
            stepper: GridStepper::new(config),
        }
    }
}

impl Default for GridMover {
    fn default() -> Self {
        Self::new(&StepperConfig::default())
    }
}

/// Runtime movement tuning applied when movers are spawned.
///
/// The map plugin reads this when it creates the player, so a CLI speed
/// override reaches the stepper without threading through every spawn site.
#[derive(Resource, Debug, Clone, Copy, PartialEq, Eq)]
pub struct MovementSettings {
    /// Speed multiplier for the derived step velocity.
    pub speed: u32,
    /// Explicit per-frame velocity override, bypassing derivation.
    pub velocity: Option<u32>,
}

impl Default for MovementSettings {
    fn default() -> Self {
        Self {
            speed: DEFAULT_SPEED,
            velocity: None,
        }
    }
}

impl MovementSettings {
    /// Stepper configuration carrying these settings.
    #[must_use]
    pub fn stepper_config(&self) -> StepperConfig {
        StepperConfig {
            speed: self.speed,
            velocity: self.velocity,
            ..StepperConfig::default()
        }
    }
}
