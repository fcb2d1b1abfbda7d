#![cfg_attr(docsrs, feature(doc_cfg))]
//! Library crate providing core Oak Hollow game logic.
//!
//! Bevy owns rendering, assets, and the entity world; the crate's own core
//! is the grid-snapping movement stepper plus the glue that feeds it input,
//! resolves static collisions, and picks animation keys. Re-exports cover
//! the items the binary and tests use most.

pub mod animation;
pub mod collision;
pub mod components;
pub mod constants;
pub mod debug_overlay;
pub mod input;
pub mod logging;
#[cfg(feature = "map")]
#[cfg_attr(docsrs, doc(cfg(feature = "map")))]
pub mod map;
pub mod movement;

pub use constants::*;

// Re-export commonly used items
pub use animation::{stand_animation, walk_animation, walk_frame_delay};
pub use collision::{resolve_static_collisions, Collided, CollisionIndex};
pub use components::{AnimationKey, BodyVelocity, Player};
pub use debug_overlay::{DebugOverlayPlugin, DebugOverlaySettings, MovementTelemetry};
pub use input::{Axis, AxisMap, Controls, Direction, DirectionSource, HeldDirection};
pub use logging::init as init_logging;
#[cfg(feature = "map")]
#[cfg_attr(docsrs, doc(cfg(feature = "map")))]
pub use map::{TownMapError, TownMapPlugin, TownMapSettings};
pub use movement::{
    GridMovementPlugin, GridMover, GridStepper, Idled, MovementSettings, Moved, StepAction,
    StepOutcome, StepperConfig, Stopped,
};

pub mod prelude {
    //! Prelude exports used in documentation examples.
    //!
    //! ```rust,no_run
    //! use oakhollow::prelude::*;
    //! ```

    pub use crate::collision::CollisionIndex;
    pub use crate::components::{BodyVelocity, Player};
    pub use crate::input::{Controls, Direction, HeldDirection};
    pub use crate::movement::{GridMovementPlugin, GridMover, StepAction, StepperConfig};
    pub use crate::DebugOverlayPlugin;
    #[cfg(feature = "map")]
    pub use crate::map::TownMapPlugin;
}
