//! Game binary: CLI parsing, logger bootstrap, and Bevy app assembly.

use bevy::log::LogPlugin;
use bevy::prelude::*;
use clap::Parser;
use oakhollow::map::MapAssetPath;
use oakhollow::{
    init_logging, DebugOverlayPlugin, DebugOverlaySettings, GridMovementPlugin, MovementSettings,
    TownMapPlugin, TownMapSettings,
};

/// A retro top-down tile adventure game
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Tiled map to load instead of the default town
    #[arg(long)]
    map: Option<String>,

    /// Movement speed multiplier
    #[arg(long)]
    speed: Option<u32>,

    /// Log the movement telemetry overlay each tick
    #[arg(long)]
    overlay: bool,
}

fn main() {
    let args = Args::parse();
    init_logging(args.verbose);

    let mut map_settings = TownMapSettings::default();
    if let Some(path) = args.map {
        map_settings.town_map = MapAssetPath::new(path);
    }

    let mut movement_settings = MovementSettings::default();
    if let Some(speed) = args.speed {
        movement_settings.speed = speed.max(1);
    }

    App::new()
        .add_plugins(DefaultPlugins.build().disable::<LogPlugin>())
        .insert_resource(map_settings)
        .insert_resource(movement_settings)
        .insert_resource(DebugOverlaySettings {
            enabled: args.overlay,
        })
        .add_plugins((TownMapPlugin, GridMovementPlugin, DebugOverlayPlugin))
        .run();
}
