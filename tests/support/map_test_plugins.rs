#![cfg(feature = "test-support")]
//! Shared plugin setup for town map integration tests.
//!
//! Under `--all-features` these binaries carry Bevy's full render stack,
//! and the renderer owns process-global state (notably the empty bind
//! group layout). Creating a second render device inside one test binary
//! panics, hence the house rule: a binary whose test ticks the map-loading
//! app holds exactly that one test, and neighbours that merely construct
//! apps never call `app.update()`.

use bevy::prelude::*;
use oakhollow::map::TownMapError;
use rstest::fixture;

/// Configures a headless app that runs schedules, loads assets, and hosts
/// `bevy_ecs_tiled` (with its render feature when enabled).
///
/// The window is suppressed and the renderer is pinned to the fallback
/// adapter so the suite passes on machines without a GPU.
pub fn add_map_test_plugins(app: &mut App) {
    use bevy::log::LogPlugin;
    use bevy::render::settings::WgpuSettings;
    use bevy::render::RenderPlugin;
    use bevy::window::{ExitCondition, WindowPlugin};

    app.add_plugins(
        DefaultPlugins
            .build()
            .disable::<LogPlugin>()
            .set(WindowPlugin {
                primary_window: None,
                exit_condition: ExitCondition::DontExit,
                ..default()
            })
            .set(RenderPlugin {
                synchronous_pipeline_compilation: true,
                render_creation: bevy::render::settings::RenderCreation::Automatic(WgpuSettings {
                    force_fallback_adapter: true,
                    ..default()
                }),
                ..default()
            })
            .disable::<bevy::winit::WinitPlugin>(),
    );

    // Tile sets arrive as images; register the asset types Tiled expects.
    app.init_asset::<Image>();
    app.init_asset::<TextureAtlasLayout>();
}

/// Collects [`TownMapError`] events triggered during a test run.
#[derive(Resource, Default)]
pub struct CapturedMapErrors(pub Vec<TownMapError>);

fn capture_map_error(event: On<TownMapError>, mut captured: ResMut<CapturedMapErrors>) {
    captured.0.push(event.event().clone());
}

/// Test app with asset support and a [`CapturedMapErrors`] observer installed.
#[fixture]
pub fn map_test_app() -> App {
    let mut app = App::new();
    add_map_test_plugins(&mut app);
    app.init_resource::<CapturedMapErrors>();
    app.add_observer(capture_map_error);
    app
}
