//! Static collision response for grid movers.
//!
//! Blocked tiles behave like the original static bodies: an overlapping
//! mover is pushed back out along the axis of least penetration and its
//! velocity on that axis is zeroed, so it stops dead without bouncing.
//! There is no gravity and nothing falls; this is a top-down world.

use bevy::prelude::*;
use glam::{IVec2, Vec2};
use hashbrown::HashSet;

use crate::components::BodyVelocity;
use crate::constants::TILE_SIZE_PX;
use crate::movement::GridMover;

/// Set of grid tiles that block movement.
///
/// Populated by the map plugin from tiles authored as collidable; tests
/// insert tiles directly. Coordinates are tile indices, not pixels.
#[derive(Resource, Debug, Clone)]
pub struct CollisionIndex {
    tile_size: u32,
    blocked: HashSet<IVec2>,
}

impl Default for CollisionIndex {
    fn default() -> Self {
        Self::new(TILE_SIZE_PX)
    }
}

impl CollisionIndex {
    /// Creates an empty index for tiles of `tile_size` pixels.
    #[must_use]
    pub fn new(tile_size: u32) -> Self {
        Self {
            tile_size: tile_size.max(1),
            blocked: HashSet::new(),
        }
    }

    /// Marks `tile` as blocking.
    pub fn block(&mut self, tile: IVec2) {
        self.blocked.insert(tile);
    }

    /// True when `tile` blocks movement.
    #[must_use]
    pub fn is_blocked(&self, tile: IVec2) -> bool {
        self.blocked.contains(&tile)
    }

    /// Number of blocked tiles.
    #[must_use]
    pub fn len(&self) -> usize {
        self.blocked.len()
    }

    /// True when no tile blocks movement.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.blocked.is_empty()
    }

    /// Tile side length in pixels.
    #[must_use]
    pub const fn tile_size(&self) -> u32 {
        self.tile_size
    }

    /// Tile side length as world units.
    #[must_use]
    pub fn tile_size_px(&self) -> f32 {
        #[expect(
            clippy::cast_precision_loss,
            reason = "Tile sizes are tiny; f32 represents them exactly."
        )]
        let size = self.tile_size as f32;
        size
    }

    /// Blocked tiles whose area intersects the square at `min`.
    ///
    /// `min` is the bottom-left corner of a `tile_size`-sized axis-aligned
    /// box (sprites anchor at their bottom-left corner).
    #[must_use]
    pub fn blocked_tiles_overlapping(&self, min: Vec2) -> Vec<IVec2> {
        let size = self.tile_size_px();
        let lo = (min / size).floor().as_ivec2();
        let hi = ((min + Vec2::splat(size)) / size).ceil().as_ivec2();

        let mut hits = Vec::new();
        for x in lo.x..hi.x {
            for y in lo.y..hi.y {
                let tile = IVec2::new(x, y);
                if self.is_blocked(tile) {
                    hits.push(tile);
                }
            }
        }
        hits
    }
}

/// Event raised when a mover is pushed out of a blocked tile.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Collided {
    /// Entity that hit the tile.
    pub entity: Entity,
    /// Grid coordinate of the blocking tile.
    pub tile: IVec2,
}

/// Minimal translation that separates a box at `min` from `tile`.
///
/// Returns `None` when the shapes merely touch or do not intersect.
/// Penetration is resolved along the shallower axis, pushing away from the
/// tile centre.
#[must_use]
pub fn push_out_of_tile(min: Vec2, size: f32, tile: IVec2, tile_size: f32) -> Option<Vec2> {
    let tile_min = tile.as_vec2() * tile_size;
    let overlap_x = (min.x + size).min(tile_min.x + tile_size) - min.x.max(tile_min.x);
    let overlap_y = (min.y + size).min(tile_min.y + tile_size) - min.y.max(tile_min.y);
    if overlap_x <= 0.0 || overlap_y <= 0.0 {
        return None;
    }

    if overlap_x <= overlap_y {
        let away = if min.x + size * 0.5 < tile_min.x + tile_size * 0.5 {
            -overlap_x
        } else {
            overlap_x
        };
        Some(Vec2::new(away, 0.0))
    } else {
        let away = if min.y + size * 0.5 < tile_min.y + tile_size * 0.5 {
            -overlap_y
        } else {
            overlap_y
        };
        Some(Vec2::new(0.0, away))
    }
}

/// Pushes movers out of blocked tiles and kills the overlapped velocity.
///
/// Runs after velocity application so a frame that stepped into a wall is
/// corrected before anything renders. Each push zeroes only the axis it
/// acted on, matching the original static-body response.
#[expect(
    clippy::needless_pass_by_value,
    reason = "Bevy system parameters use `Res<T>` by value."
)]
pub fn resolve_static_collisions(
    mut commands: Commands,
    index: Res<CollisionIndex>,
    mut movers: Query<(Entity, &mut Transform, &mut BodyVelocity), With<GridMover>>,
) {
    if index.is_empty() {
        return;
    }

    let size = index.tile_size_px();
    for (entity, mut transform, mut body) in &mut movers {
        let mut min = transform.translation.truncate();
        for tile in index.blocked_tiles_overlapping(min) {
            let Some(push) = push_out_of_tile(min, size, tile, size) else {
                continue;
            };

            min += push;
            transform.translation.x = min.x;
            transform.translation.y = min.y;
            if push.x != 0.0 {
                body.0.x = 0;
            }
            if push.y != 0.0 {
                body.0.y = 0;
            }

            log::debug!("entity {entity:?} pushed out of tile ({}, {})", tile.x, tile.y);
            commands.trigger(Collided { entity, tile });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::from_the_left(Vec2::new(4.0, 0.0), Vec2::new(0.0, 0.0))]
    #[case::from_the_right(Vec2::new(60.0, 0.0), Vec2::new(64.0, 0.0))]
    #[case::from_below(Vec2::new(0.0, 4.0), Vec2::new(0.0, 0.0))]
    #[case::from_above(Vec2::new(0.0, 60.0), Vec2::new(0.0, 64.0))]
    fn push_resolves_along_shallow_axis(#[case] min: Vec2, #[case] expected_min: Vec2) {
        // Blocking tile (1, 0) for horizontal cases, (0, 1) for vertical.
        let tile = if min.x > min.y {
            IVec2::new(1, 0)
        } else {
            IVec2::new(0, 1)
        };
        let push = push_out_of_tile(min, 32.0, tile, 32.0).unwrap_or(Vec2::ZERO);
        assert_eq!(min + push, expected_min);
    }

    #[test]
    fn touching_boxes_do_not_collide() {
        assert_eq!(
            push_out_of_tile(Vec2::new(32.0, 0.0), 32.0, IVec2::new(2, 0), 32.0),
            None
        );
        assert_eq!(
            push_out_of_tile(Vec2::new(0.0, 0.0), 32.0, IVec2::new(1, 0), 32.0),
            None
        );
    }

    #[test]
    fn overlap_query_reports_only_blocked_tiles() {
        let mut index = CollisionIndex::new(32);
        index.block(IVec2::new(1, 0));
        index.block(IVec2::new(5, 5));

        let hits = index.blocked_tiles_overlapping(Vec2::new(40.0, 0.0));
        assert_eq!(hits, vec![IVec2::new(1, 0)]);
        assert!(index
            .blocked_tiles_overlapping(Vec2::new(200.0, 200.0))
            .is_empty());
    }

    #[test]
    fn aligned_mover_overlaps_exactly_one_tile() {
        let mut index = CollisionIndex::new(32);
        index.block(IVec2::new(1, 1));
        index.block(IVec2::new(2, 1));

        // Sitting exactly on tile (1, 1): the neighbouring tile only
        // touches and must not be reported as a hit after push-out.
        let hits = index.blocked_tiles_overlapping(Vec2::new(32.0, 32.0));
        assert_eq!(hits, vec![IVec2::new(1, 1)]);
    }
}
