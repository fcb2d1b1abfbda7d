//! Directional input model and polling.
//!
//! The stepper itself never reads the keyboard: it consumes a
//! [`Direction`] resolved once per tick. This module owns that resolution:
//! key bindings, the direction-to-axis table, and the [`DirectionSource`]
//! seam that keeps the stepper testable without an engine loop.

use bevy::prelude::*;
use glam::IVec2;
use hashbrown::HashMap;
use serde::Serialize;

#[cfg(test)]
use mockall::automock;

/// One of the four cardinal movement directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Direction {
    /// Towards the top of the map (positive Y in world space).
    Up,
    /// Towards the bottom of the map.
    Down,
    /// Towards negative X.
    Left,
    /// Towards positive X.
    Right,
}

impl Direction {
    /// All directions in polling priority order.
    pub const ALL: [Self; 4] = [Self::Up, Self::Down, Self::Left, Self::Right];

    /// Lower-case name used to build animation keys.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Up => "up",
            Self::Down => "down",
            Self::Left => "left",
            Self::Right => "right",
        }
    }

    /// Unit grid offset of this direction in world space.
    ///
    /// Bevy worlds are y-up, so [`Direction::Up`] maps to positive Y. The
    /// perpendicular component is always zero, which is what rules out
    /// diagonal motion once the offset is scaled by a velocity.
    #[must_use]
    pub const fn unit_offset(self) -> IVec2 {
        match self {
            Self::Up => IVec2::new(0, 1),
            Self::Down => IVec2::new(0, -1),
            Self::Left => IVec2::new(-1, 0),
            Self::Right => IVec2::new(1, 0),
        }
    }
}

/// A movement axis in the 2D plane.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Axis {
    /// Horizontal axis.
    X,
    /// Vertical axis.
    Y,
}

impl Axis {
    /// The perpendicular axis, zeroed on every moving tick.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::X => Self::Y,
            Self::Y => Self::X,
        }
    }
}

/// Maps a direction to the axis it moves along, if any.
///
/// Implemented by [`Controls`]; the stepper takes this as an injected
/// collaborator so unit tests can drop mappings to exercise the
/// "unmapped direction produces no motion" path.
pub trait AxisMap {
    /// Returns the axis bound to `direction`, or `None` when unbound.
    fn axis_for(&self, direction: Direction) -> Option<Axis>;
}

/// Supplies the direction currently held by the player, if any.
///
/// The engine-facing implementation is [`HeldDirection`], refreshed from the
/// keyboard once per tick; tests substitute a mock.
#[cfg_attr(test, automock)]
pub trait DirectionSource {
    /// Currently held direction, or `None` when no movement key is down.
    fn held_direction(&self) -> Option<Direction>;
}

/// Key bindings and the direction-to-axis table.
///
/// Defaults bind the arrow keys and WASD. When several movement keys are
/// held at once the winner is deterministic: directions are polled in
/// [`Direction::ALL`] order.
#[derive(Resource, Debug, Clone)]
pub struct Controls {
    bindings: HashMap<KeyCode, Direction>,
    axes: HashMap<Direction, Axis>,
}

impl Default for Controls {
    fn default() -> Self {
        let mut bindings = HashMap::new();
        bindings.insert(KeyCode::ArrowUp, Direction::Up);
        bindings.insert(KeyCode::ArrowDown, Direction::Down);
        bindings.insert(KeyCode::ArrowLeft, Direction::Left);
        bindings.insert(KeyCode::ArrowRight, Direction::Right);
        bindings.insert(KeyCode::KeyW, Direction::Up);
        bindings.insert(KeyCode::KeyS, Direction::Down);
        bindings.insert(KeyCode::KeyA, Direction::Left);
        bindings.insert(KeyCode::KeyD, Direction::Right);

        let mut axes = HashMap::new();
        axes.insert(Direction::Up, Axis::Y);
        axes.insert(Direction::Down, Axis::Y);
        axes.insert(Direction::Left, Axis::X);
        axes.insert(Direction::Right, Axis::X);

        Self { bindings, axes }
    }
}

impl Controls {
    /// Binds `key` to `direction`, replacing any previous binding of `key`.
    pub fn bind_key(&mut self, key: KeyCode, direction: Direction) {
        self.bindings.insert(key, direction);
    }

    /// Removes the axis mapping for `direction`.
    ///
    /// Unmapped directions are skipped by [`Controls::pressed_direction`],
    /// so they never begin a step. A stepper fed one directly still drains
    /// its buffer without producing motion.
    pub fn unbind_axis(&mut self, direction: Direction) {
        self.axes.remove(&direction);
    }

    /// Returns the direction bound to `key`, if any.
    #[must_use]
    pub fn direction_for(&self, key: KeyCode) -> Option<Direction> {
        self.bindings.get(&key).copied()
    }

    /// Resolves the held direction from the keyboard state.
    ///
    /// Directions are checked in [`Direction::ALL`] order, so e.g. holding
    /// both an up and a left key yields `Up` every tick. Directions with no
    /// axis mapping are ignored here: a key whose direction cannot move
    /// must not latch a step, so an unmapped press falls through to the
    /// next held direction (or to none).
    #[must_use]
    pub fn pressed_direction(&self, keyboard: &ButtonInput<KeyCode>) -> Option<Direction> {
        Direction::ALL.into_iter().find(|direction| {
            self.axes.contains_key(direction)
                && self
                    .bindings
                    .iter()
                    .any(|(key, bound)| bound == direction && keyboard.pressed(*key))
        })
    }
}

impl AxisMap for Controls {
    fn axis_for(&self, direction: Direction) -> Option<Axis> {
        self.axes.get(&direction).copied()
    }
}

/// Resource holding the direction resolved for the current tick.
///
/// Written by [`poll_held_direction`] when a keyboard exists; headless tests
/// write it directly.
#[derive(Resource, Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct HeldDirection(pub Option<Direction>);

impl DirectionSource for HeldDirection {
    fn held_direction(&self) -> Option<Direction> {
        self.0
    }
}

/// Refreshes [`HeldDirection`] from the keyboard.
///
/// Registered with a `resource_exists` run condition so headless apps
/// without an input plugin skip it and drive [`HeldDirection`] themselves.
#[expect(
    clippy::needless_pass_by_value,
    reason = "Bevy system parameters use `Res<T>` by value."
)]
pub fn poll_held_direction(
    keyboard: Res<ButtonInput<KeyCode>>,
    controls: Res<Controls>,
    mut held: ResMut<HeldDirection>,
) {
    held.0 = controls.pressed_direction(&keyboard);
}
