//! The grid-snapping movement stepper.
//!
//! A [`GridStepper`] converts a held direction into tile-aligned motion: a
//! step begun at rest buffers one tile's worth of pixels and drains it over
//! the following ticks, emitting a per-frame velocity that lands the body
//! exactly on the next grid cell. The stepper is a plain state machine with
//! no engine types; input polling and the direction-to-axis table are
//! injected collaborators so it can be exercised in isolation.

use serde::Serialize;

use crate::constants::{DEFAULT_SPEED, TARGET_FRAME_RATE, TILE_SIZE_PX};
use crate::input::{Axis, AxisMap, Direction, DirectionSource};

/// Construction-time configuration for a [`GridStepper`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StepperConfig {
    /// Side length of one grid tile, in pixels.
    pub tile_size: u32,
    /// Pixels covered by one tile-step. Defaults to `tile_size`.
    pub distance_per_step: Option<u32>,
    /// Speed multiplier applied to the derived step velocity.
    pub speed: u32,
    /// Frame rate the per-frame velocity is derived against.
    pub frame_rate: u32,
    /// Explicit per-frame velocity, bypassing derivation entirely.
    pub velocity: Option<u32>,
}

impl Default for StepperConfig {
    fn default() -> Self {
        Self {
            tile_size: TILE_SIZE_PX,
            distance_per_step: None,
            speed: DEFAULT_SPEED,
            frame_rate: TARGET_FRAME_RATE,
            velocity: None,
        }
    }
}

/// What the body should do on this tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepAction {
    /// No direction held and no step in flight.
    Idle,
    /// Bookkeeping tick with no motion: the drained velocity was zero or
    /// the direction has no axis mapping.
    Hold,
    /// Apply `velocity` pixels along `axis`, signed by `direction`. The
    /// perpendicular axis must be zeroed on the same tick.
    Move {
        /// Unsigned pixels to cover this frame.
        velocity: u32,
        /// Direction of travel for this step.
        direction: Direction,
        /// Axis the motion happens on.
        axis: Axis,
    },
}

/// Outcome of one stepper tick.
///
/// `stopped` is edge-triggered: it carries the finished step's direction on
/// exactly one tick, and can co-occur with any action (a key still held when
/// a step completes stops and immediately begins the next step).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepOutcome {
    /// Direction of a step that just completed, reported once.
    pub stopped: Option<Direction>,
    /// Motion to apply this tick.
    pub action: StepAction,
}

/// Finite-state stepper producing tile-aligned per-frame velocities.
///
/// The state is the pixel buffer of the current step plus the latched
/// direction. The buffer never exceeds the distance-per-step and is only
/// refilled when a new step begins from rest, so a body driven by this
/// stepper can never overshoot a grid cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridStepper {
    distance_per_step: u32,
    step_velocity: u32,
    buffer: u32,
    last_direction: Option<Direction>,
    last_velocity: u32,
}

impl GridStepper {
    /// Builds a stepper from `config`.
    ///
    /// Unless overridden, the per-frame velocity is derived from the tile
    /// size and frame rate: floored at 1 pixel, scaled by the speed
    /// multiplier, and rounded up to the nearest even integer so a tile
    /// width divides into whole half-steps.
    #[must_use]
    pub fn new(config: &StepperConfig) -> Self {
        let distance_per_step = config.distance_per_step.unwrap_or(config.tile_size).max(1);
        let step_velocity = config.velocity.unwrap_or_else(|| {
            derived_step_velocity(config.tile_size, config.frame_rate, config.speed)
        });

        Self {
            distance_per_step,
            step_velocity,
            buffer: 0,
            last_direction: None,
            last_velocity: 0,
        }
    }

    /// Pixels remaining in the current tile-step.
    #[must_use]
    pub const fn buffered_distance(&self) -> u32 {
        self.buffer
    }

    /// Pixels covered by one full tile-step.
    #[must_use]
    pub const fn distance_per_step(&self) -> u32 {
        self.distance_per_step
    }

    /// Per-frame velocity drained from the buffer on a full tick.
    #[must_use]
    pub const fn step_velocity(&self) -> u32 {
        self.step_velocity
    }

    /// Direction latched for the step in flight, if any.
    #[must_use]
    pub const fn last_direction(&self) -> Option<Direction> {
        self.last_direction
    }

    /// Velocity emitted on the most recent tick.
    #[must_use]
    pub const fn last_velocity(&self) -> u32 {
        self.last_velocity
    }

    /// True while a tile-step is in flight.
    #[must_use]
    pub const fn is_moving(&self) -> bool {
        self.buffer > 0
    }

    /// Advances the stepper by one tick.
    ///
    /// `held` is the direction resolved from input for this tick; `axes`
    /// maps it to a movement axis. Mid-step the latched direction wins and
    /// `held` is ignored, so a turn only takes effect once the current tile
    /// is reached.
    pub fn step(&mut self, held: Option<Direction>, axes: &dyn AxisMap) -> StepOutcome {
        self.last_velocity = 0;

        // A finished step reports its direction exactly once, then the
        // latch clears so the next held key starts a fresh step.
        let mut stopped = None;
        if !self.is_moving() {
            if let Some(finished) = self.last_direction.take() {
                stopped = Some(finished);
            }
        }

        let active = if self.is_moving() {
            self.last_direction
        } else {
            held
        };
        let Some(direction) = active else {
            return StepOutcome {
                stopped,
                action: StepAction::Idle,
            };
        };

        if self.last_direction.is_none() {
            self.last_direction = Some(direction);
        }
        if !self.is_moving() {
            self.buffer = self.distance_per_step;
        }

        // The buffer drains before the axis lookup, so an unmapped
        // direction still consumes its step without producing motion.
        let velocity = self.drain_velocity();
        if velocity == 0 {
            return StepOutcome {
                stopped,
                action: StepAction::Hold,
            };
        }

        let Some(axis) = axes.axis_for(direction) else {
            return StepOutcome {
                stopped,
                action: StepAction::Hold,
            };
        };

        self.last_velocity = velocity;
        StepOutcome {
            stopped,
            action: StepAction::Move {
                velocity,
                direction,
                axis,
            },
        }
    }

    /// Polls `source` and advances one tick.
    pub fn poll_and_step(
        &mut self,
        source: &dyn DirectionSource,
        axes: &dyn AxisMap,
    ) -> StepOutcome {
        self.step(source.held_direction(), axes)
    }

    /// Consumes up to one frame's velocity from the buffer.
    ///
    /// The final tick of a step returns the remainder rather than the full
    /// step velocity, leaving the buffer at zero with no overshoot.
    fn drain_velocity(&mut self) -> u32 {
        if self.buffer >= self.step_velocity {
            self.buffer -= self.step_velocity;
            return self.step_velocity;
        }

        let remainder = self.buffer;
        self.buffer = 0;
        remainder
    }
}

/// Derives the per-frame step velocity from tile size and frame rate.
///
/// The raw pixels-per-frame value is floored at 1 when it would round to
/// zero, multiplied by the speed factor, and rounded up to the nearest even
/// integer.
#[must_use]
pub fn derived_step_velocity(tile_size: u32, frame_rate: u32, speed: u32) -> u32 {
    let per_frame = f64::from(tile_size) / f64::from(frame_rate.max(1));
    #[expect(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        reason = "Rounded pixels-per-frame for practical tile sizes fits comfortably in u32."
    )]
    let base = if per_frame <= 0.5 {
        1
    } else {
        per_frame.round() as u32
    };
    let scaled = base.max(1) * speed.max(1);
    scaled.div_ceil(2) * 2
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::{Controls, MockDirectionSource};
    use rstest::rstest;

    fn stepper(distance: u32, velocity: u32) -> GridStepper {
        GridStepper::new(&StepperConfig {
            distance_per_step: Some(distance),
            velocity: Some(velocity),
            ..StepperConfig::default()
        })
    }

    #[rstest]
    #[case::sixty_fps(32, 60, 1, 2)]
    #[case::thirty_fps(32, 30, 1, 2)]
    #[case::rounds_up_to_even(32, 10, 1, 4)]
    #[case::exact_division(32, 2, 1, 16)]
    #[case::speed_multiplier(32, 60, 3, 4)]
    #[case::tiny_tile_floors_at_one(8, 60, 1, 2)]
    #[case::zero_frame_rate_clamped(32, 0, 1, 32)]
    fn velocity_derivation(
        #[case] tile_size: u32,
        #[case] frame_rate: u32,
        #[case] speed: u32,
        #[case] expected: u32,
    ) {
        let velocity = derived_step_velocity(tile_size, frame_rate, speed);
        assert_eq!(velocity, expected);
        assert_eq!(velocity % 2, 0, "derived velocity must be even");
    }

    #[test]
    fn step_emits_remainder_on_final_tick() {
        let controls = Controls::default();
        let mut mover = stepper(32, 10);

        let mut emitted = Vec::new();
        for _ in 0..4 {
            match mover.step(Some(Direction::Right), &controls).action {
                StepAction::Move { velocity, .. } => emitted.push(velocity),
                other => panic!("expected motion, got {other:?}"),
            }
        }

        assert_eq!(emitted, vec![10, 10, 10, 2]);
        assert_eq!(mover.buffered_distance(), 0);

        // The tick after the final drain reports the stop, and with the key
        // released the stepper is idle again.
        let outcome = mover.step(None, &controls);
        assert_eq!(outcome.stopped, Some(Direction::Right));
        assert_eq!(outcome.action, StepAction::Idle);
        assert_eq!(mover.last_direction(), None);
    }

    #[test]
    fn step_completes_in_ceil_distance_over_velocity_ticks() {
        let controls = Controls::default();
        for (distance, velocity) in [(32, 10), (32, 2), (48, 32), (1, 2), (17, 4)] {
            let mut mover = stepper(distance, velocity);
            let expected_ticks = distance.div_ceil(velocity);

            let mut ticks = 0;
            mover.step(Some(Direction::Down), &controls);
            ticks += 1;
            while mover.is_moving() {
                mover.step(None, &controls);
                ticks += 1;
            }

            assert_eq!(
                ticks, expected_ticks,
                "distance {distance} velocity {velocity}"
            );
        }
    }

    #[test]
    fn buffer_never_exceeds_distance_per_step() {
        let controls = Controls::default();
        let mut mover = stepper(32, 10);
        let inputs = [
            Some(Direction::Right),
            Some(Direction::Right),
            None,
            Some(Direction::Up),
            Some(Direction::Left),
            None,
            None,
            Some(Direction::Down),
        ];

        for held in inputs.iter().cycle().take(64) {
            mover.step(*held, &controls);
            assert!(mover.buffered_distance() <= mover.distance_per_step());
        }
    }

    #[test]
    fn stop_fires_exactly_once_per_completed_step() {
        let controls = Controls::default();
        let mut mover = stepper(32, 16);

        mover.step(Some(Direction::Up), &controls);
        mover.step(None, &controls);
        assert!(!mover.is_moving());

        let mut stops = 0;
        for _ in 0..5 {
            if mover.step(None, &controls).stopped.is_some() {
                stops += 1;
            }
        }
        assert_eq!(stops, 1);
    }

    #[test]
    fn held_key_chains_stop_into_next_step() {
        let controls = Controls::default();
        let mut mover = stepper(32, 16);

        mover.step(Some(Direction::Left), &controls);
        mover.step(Some(Direction::Left), &controls);
        assert!(!mover.is_moving());

        // Same tick: previous step stops, next one begins.
        let outcome = mover.step(Some(Direction::Left), &controls);
        assert_eq!(outcome.stopped, Some(Direction::Left));
        assert!(matches!(
            outcome.action,
            StepAction::Move {
                velocity: 16,
                direction: Direction::Left,
                axis: Axis::X,
            }
        ));
        assert!(mover.is_moving());
    }

    #[test]
    fn direction_changes_are_ignored_mid_step() {
        let controls = Controls::default();
        let mut mover = stepper(32, 10);

        mover.step(Some(Direction::Right), &controls);
        let outcome = mover.step(Some(Direction::Up), &controls);

        match outcome.action {
            StepAction::Move { direction, .. } => assert_eq!(direction, Direction::Right),
            other => panic!("expected motion, got {other:?}"),
        }
        assert_eq!(mover.last_direction(), Some(Direction::Right));
    }

    #[test]
    fn unmapped_axis_consumes_buffer_without_motion() {
        let mut controls = Controls::default();
        controls.unbind_axis(Direction::Up);
        let mut mover = stepper(32, 10);

        let outcome = mover.step(Some(Direction::Up), &controls);
        assert_eq!(outcome.action, StepAction::Hold);
        assert_eq!(mover.buffered_distance(), 22);
        assert_eq!(mover.last_velocity(), 0);
    }

    #[test]
    fn idle_ticks_report_idle_without_state_changes() {
        let controls = Controls::default();
        let mut mover = stepper(32, 10);

        for _ in 0..3 {
            let outcome = mover.step(None, &controls);
            assert_eq!(outcome.action, StepAction::Idle);
            assert_eq!(outcome.stopped, None);
        }
        assert_eq!(mover.buffered_distance(), 0);
        assert_eq!(mover.last_direction(), None);
    }

    #[test]
    fn poll_and_step_consults_the_injected_source() {
        let controls = Controls::default();
        let mut mover = stepper(32, 16);

        let mut source = MockDirectionSource::new();
        source
            .expect_held_direction()
            .times(3)
            .returning(|| Some(Direction::Down));

        // Two ticks complete the first step; the third chains straight into
        // a new one because the mocked source still reports Down.
        for expected_buffer in [16, 0, 16] {
            mover.poll_and_step(&source, &controls);
            assert_eq!(mover.buffered_distance(), expected_buffer);
        }
        assert!(mover.is_moving());
    }

    #[test]
    fn config_defaults_derive_an_even_velocity() {
        let mover = GridStepper::new(&StepperConfig::default());
        assert_eq!(mover.distance_per_step(), TILE_SIZE_PX);
        assert_eq!(mover.step_velocity() % 2, 0);
        assert!(mover.step_velocity() >= 1);
        assert!(!mover.is_moving());
    }
}
