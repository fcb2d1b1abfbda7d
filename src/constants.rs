//! Game-wide constants shared across systems.
//!
//! Movement works in whole pixels per frame, so the tile geometry and the
//! frame-rate target live here rather than in per-entity configuration.

/// The side length of one map tile, in pixels.
pub const TILE_SIZE_PX: u32 = 32;
/// Frame rate the per-frame step velocity is derived against.
pub const TARGET_FRAME_RATE: u32 = 60;
/// Default speed multiplier applied to the derived step velocity.
pub const DEFAULT_SPEED: u32 = 1;
/// Z offset that keeps the player sprite above the map layers.
pub const PLAYER_Z_LAYER: f32 = 10.0;
