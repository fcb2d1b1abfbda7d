//! Movement telemetry overlay.
//!
//! The original overlay rendered an HTML table next to the canvas; here the
//! same fields land on the `log` facade at debug level, so `RUST_LOG=debug`
//! (or `--verbose`) plays the role of the `#debug` location hash.

use bevy::ecs::prelude::On;
use bevy::prelude::*;
use serde::Serialize;

use crate::collision::Collided;
use crate::components::Player;
use crate::input::Direction;
use crate::movement::GridMover;

/// Snapshot of the player's movement state for diagnostics.
#[derive(Resource, Debug, Clone, Default, PartialEq, Serialize)]
pub struct MovementTelemetry {
    /// Frames per second estimated from the last tick's delta.
    pub fps: u32,
    /// Last tick's delta time in milliseconds.
    pub delta_ms: f32,
    /// Per-frame step velocity of the player's stepper.
    pub velocity_per_frame: u32,
    /// Pixels covered by one full tile-step.
    pub distance_per_step: u32,
    /// Pixels remaining in the step currently in flight.
    pub buffered_distance: u32,
    /// Velocity emitted on the most recent tick.
    pub last_velocity: u32,
    /// Direction latched for the current or finished step.
    pub last_direction: Option<Direction>,
    /// Human-readable tag of the last blocking tile hit.
    pub last_collision: Option<String>,
}

impl MovementTelemetry {
    /// Renders the telemetry as an aligned key/value table.
    ///
    /// Unset values print as `-`, matching the original overlay.
    #[must_use]
    pub fn format_table(&self) -> String {
        let rows = [
            ("FPS", self.fps.to_string()),
            ("Delta time (ms)", format!("{:.2}", self.delta_ms)),
            (
                "Velocity (pixels per frame)",
                self.velocity_per_frame.to_string(),
            ),
            (
                "Distance (pixels per move)",
                self.distance_per_step.to_string(),
            ),
            ("Distance (current move)", self.buffered_distance.to_string()),
            ("Velocity (current move)", self.last_velocity.to_string()),
            (
                "Direction",
                self.last_direction
                    .map_or_else(|| "-".to_owned(), |direction| direction.name().to_owned()),
            ),
            (
                "Last collision",
                self.last_collision
                    .clone()
                    .unwrap_or_else(|| "-".to_owned()),
            ),
        ];

        let width = rows.iter().map(|(label, _)| label.len()).max().unwrap_or(0);
        rows.iter()
            .map(|(label, value)| format!("{label:<width$}  {value}"))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Serialises the telemetry as a JSON object.
    ///
    /// # Errors
    ///
    /// Returns any `serde_json` serialisation failure.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

/// Switches the overlay on or off at runtime.
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DebugOverlaySettings {
    /// When true, telemetry is collected and logged each tick.
    pub enabled: bool,
}

/// Refreshes [`MovementTelemetry`] from the player's stepper.
#[expect(
    clippy::needless_pass_by_value,
    reason = "Bevy system parameters use `Res<T>` by value."
)]
pub fn update_movement_telemetry(
    time: Res<Time>,
    settings: Res<DebugOverlaySettings>,
    movers: Query<&GridMover, With<Player>>,
    mut telemetry: ResMut<MovementTelemetry>,
) {
    if !settings.enabled {
        return;
    }

    let delta = time.delta_secs();
    telemetry.delta_ms = delta * 1000.0;
    #[expect(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        reason = "Rounded positive frame rates fit easily in u32."
    )]
    let fps = if delta > 0.0 {
        (1.0 / delta).round() as u32
    } else {
        0
    };
    telemetry.fps = fps;

    if let Some(mover) = movers.iter().next() {
        telemetry.velocity_per_frame = mover.stepper.step_velocity();
        telemetry.distance_per_step = mover.stepper.distance_per_step();
        telemetry.buffered_distance = mover.stepper.buffered_distance();
        telemetry.last_velocity = mover.stepper.last_velocity();
        telemetry.last_direction = mover.stepper.last_direction();
    }
}

/// Logs the telemetry table at debug level while the overlay is enabled.
#[expect(
    clippy::needless_pass_by_value,
    reason = "Bevy system parameters use `Res<T>` by value."
)]
pub fn log_movement_telemetry(
    settings: Res<DebugOverlaySettings>,
    telemetry: Res<MovementTelemetry>,
) {
    if settings.enabled && telemetry.is_changed() {
        log::debug!("movement overlay\n{}", telemetry.format_table());
    }
}

/// Records the last blocking tile hit by any mover.
#[expect(
    clippy::needless_pass_by_value,
    reason = "Observer systems must accept On<T> by value."
)]
pub fn record_collision(event: On<Collided>, mut telemetry: ResMut<MovementTelemetry>) {
    let Collided { tile, .. } = *event.event();
    telemetry.last_collision = Some(format!("tile ({}, {})", tile.x, tile.y));
}

/// Bevy plugin installing the telemetry overlay.
#[derive(Default)]
pub struct DebugOverlayPlugin;

impl Plugin for DebugOverlayPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<MovementTelemetry>();
        app.init_resource::<DebugOverlaySettings>();
        app.add_observer(record_collision);
        app.add_systems(
            Update,
            (update_movement_telemetry, log_movement_telemetry).chain(),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> MovementTelemetry {
        MovementTelemetry {
            fps: 60,
            delta_ms: 16.67,
            velocity_per_frame: 2,
            distance_per_step: 32,
            buffered_distance: 12,
            last_velocity: 2,
            last_direction: Some(Direction::Left),
            last_collision: None,
        }
    }

    #[test]
    fn table_renders_all_rows_with_dashes_for_unset() {
        let table = sample().format_table();
        assert_eq!(table.lines().count(), 8);
        assert!(table.contains("FPS"));
        assert!(table.contains("left"));
        let Some(last_row) = table.lines().last() else {
            panic!("table should not be empty");
        };
        assert!(last_row.ends_with('-'));
    }

    #[test]
    fn json_dump_round_trips_field_names() {
        let json = sample().to_json().unwrap_or_default();
        assert!(json.contains("\"buffered_distance\":12"));
        assert!(json.contains("\"last_direction\":\"Left\""));
        assert!(json.contains("\"last_collision\":null"));
    }
}
