//! Swept AABB collision: exact time of impact along a full 2D displacement.
//!
//! Unlike the axis-separated resolver this treats the displacement as one
//! linear path, and reports how far along that path the moving rect got before
//! first touching a tile, along with the face of the tile it touched.

use crate::{
    aa_rect::AaRect,
    basic::assert_sizes,
    collision_map::CollisionMap,
    flags::CollisionFlags,
};
use tile_grid::{
    AXES,
    Axis,
    Face,
    PerAxis,
    Pole,
    Sign,
};
use vek::*;


/// Collision found by `sweep_aabb`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct SweptHit {
    /// Fraction of the displacement completed at the moment of contact, in
    /// `[0, 1]`.
    pub toi: f32,
    /// Face of the stationary rect that was touched. Its direction is the
    /// contact surface normal.
    pub barrier_face: Face,
}

/// Sweep `moving` by `vel` and find when it first touches `block`, if it does
/// so within the sweep.
///
/// Rects which already overlap at the start, or which only touch without
/// overlapping, do not collide.
pub fn sweep_aabb(moving: AaRect, vel: Vec2<f32>, block: AaRect) -> Option<SweptHit> {
    let mut entry = PerAxis::repeat(f32::NEG_INFINITY);
    let mut exit = PerAxis::repeat(f32::INFINITY);

    for axis in AXES {
        let axis_vel = vel[axis as usize];
        match Pole::from_sign(Sign::of_f32(axis_vel)) {
            // distance to close and to part along this axis, over the speed
            Some(Pole::Pos) => {
                entry[axis] = (block.min_on(axis) - moving.max_on(axis)) / axis_vel;
                exit[axis] = (block.max_on(axis) - moving.min_on(axis)) / axis_vel;
            }
            Some(Pole::Neg) => {
                entry[axis] = (block.max_on(axis) - moving.min_on(axis)) / axis_vel;
                exit[axis] = (block.min_on(axis) - moving.max_on(axis)) / axis_vel;
            }
            // not moving on this axis, so overlapping on it either always or never
            None => {
                let overlaps = moving.min_on(axis) < block.max_on(axis)
                    && moving.max_on(axis) > block.min_on(axis);
                if !overlaps {
                    return None;
                }
            }
        }
    }

    let entry_time = f32::max(entry[Axis::X], entry[Axis::Y]);
    let exit_time = f32::min(exit[Axis::X], exit[Axis::Y]);

    if entry_time > exit_time
        || (entry[Axis::X] < 0.0 && entry[Axis::Y] < 0.0)
        || entry[Axis::X] > 1.0
        || entry[Axis::Y] > 1.0
    {
        return None;
    }

    // the axis which closed last is the one contact happened on
    let axis = if entry[Axis::X] > entry[Axis::Y] { Axis::X } else { Axis::Y };
    let pole = Pole::from_sign(Sign::of_f32(vel[axis as usize]))?;

    Some(SweptHit {
        toi: entry_time,
        barrier_face: -Face::from_axis_pole(axis, pole),
    })
}

/// Outcome of `sweep_map`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Sweep {
    /// Position at the moment of first contact, or the target if there was
    /// none, in world units.
    pub pos: Vec2<f32>,
    /// Fraction of the displacement completed, `1.0` without a collision.
    pub toi: f32,
    /// Face of the tile that was touched, if any.
    pub hit: Option<Face>,
    /// Side of the moving body that was blocked, if any.
    pub flags: CollisionFlags,
}

/// Sweep a box of extent `ext` from `pos` to `target` through `map`, all in
/// world units, stopping at the earliest contact with any occupied tile.
///
/// Tiles are considered within the bounding rect of the whole movement. Among
/// contacts at exactly the same time, the first in row-major order from the
/// bottom-left wins.
///
/// Panics if the map's tile size or `ext` is not finite and positive.
pub fn sweep_map<M: CollisionMap>(
    map: &M,
    pos: Vec2<f32>,
    target: Vec2<f32>,
    ext: Extent2<f32>,
) -> Sweep {
    let tile_size = map.tile_size();
    assert_sizes(tile_size, ext);

    let moving = AaRect::new(pos, ext);
    let vel = target - pos;
    let mut first: Option<SweptHit> = None;

    for cell in broadphase(map, moving, vel) {
        if !map.is_occupied(cell.x, cell.y) {
            continue;
        }
        let block = AaRect::new(
            Vec2::new(cell.x as f32 * tile_size.w, cell.y as f32 * tile_size.h),
            tile_size,
        );
        if let Some(hit) = sweep_aabb(moving, vel, block) {
            if first
                .as_ref()
                .map(|first| hit.toi < first.toi)
                .unwrap_or(true)
            {
                first = Some(hit);
            }
        }
    }

    match first {
        Some(hit) => {
            trace!(toi = hit.toi, face = ?hit.barrier_face, "sweep hit tile");
            Sweep {
                pos: pos + vel * hit.toi,
                toi: hit.toi,
                hit: Some(hit.barrier_face),
                flags: CollisionFlags::from_face(-hit.barrier_face),
            }
        }
        None => Sweep {
            pos: target,
            toi: 1.0,
            hit: None,
            flags: CollisionFlags::NONE,
        },
    }
}

// in-bounds cells which the moving rect may touch over the whole sweep,
// row-major from the bottom-left
fn broadphase<M: CollisionMap>(
    map: &M,
    moving: AaRect,
    vel: Vec2<f32>,
) -> impl Iterator<Item=Vec2<i64>> + Clone {
    let tile_size = map.tile_size();
    let bounds = moving.union(moving.translate(vel));
    let max = bounds.max();

    let min_cell = Vec2::new(
        (bounds.pos.x / tile_size.w).floor() as i64,
        (bounds.pos.y / tile_size.h).floor() as i64,
    );
    let max_cell = Vec2::new(
        (max.x / tile_size.w).ceil() as i64 - 1,
        (max.y / tile_size.h).ceil() as i64 - 1,
    );

    // clamp to the grid
    let min_cell = min_cell.map(|n| n.max(0));
    let max_cell = Vec2::new(
        max_cell.x.min(map.width() as i64 - 1),
        max_cell.y.min(map.height() as i64 - 1),
    );

    (min_cell.y..=max_cell.y)
        .flat_map(move |y| (min_cell.x..=max_cell.x)
            .map(move |x| Vec2 { x, y }))
}


#[cfg(test)]
use crate::collision_map::{
    NoCollisions,
    TileLayerCollisionMap,
};
#[cfg(test)]
use tile_grid::TileLayer;

#[cfg(test)]
fn unit_at(x: f32, y: f32) -> AaRect {
    AaRect::UNIT_RECT.translate([x, y])
}

#[test]
fn test_head_on_hit() {
    let hit = sweep_aabb(unit_at(0.0, 0.0), Vec2::new(4.0, 0.0), unit_at(3.0, 0.0));
    assert_eq!(
        hit,
        Some(SweptHit {
            toi: 0.5,
            barrier_face: Face::NegX,
        }),
    );

    let hit = sweep_aabb(unit_at(0.0, 3.0), Vec2::new(0.0, -4.0), unit_at(0.0, 0.0));
    assert_eq!(
        hit,
        Some(SweptHit {
            toi: 0.5,
            barrier_face: Face::PosY,
        }),
    );
}

#[test]
fn test_diagonal_hit_uses_last_axis_to_close() {
    let moving = unit_at(0.0, 0.0);
    let block = unit_at(2.0, 1.5);
    let hit = sweep_aabb(moving, Vec2::new(2.0, 2.0), block).unwrap();
    assert_eq!(hit.toi, 0.5);
    assert_eq!(hit.barrier_face, Face::NegX);
}

#[test]
fn test_no_hit() {
    let moving = unit_at(0.0, 0.0);
    // moving away
    assert_eq!(sweep_aabb(moving, Vec2::new(-4.0, 0.0), unit_at(3.0, 0.0)), None);
    // passing beside without moving on the other axis
    assert_eq!(sweep_aabb(moving, Vec2::new(4.0, 0.0), unit_at(3.0, 2.0)), None);
    // not going far enough
    assert_eq!(sweep_aabb(moving, Vec2::new(1.0, 0.0), unit_at(3.0, 0.0)), None);
    // not moving at all
    assert_eq!(sweep_aabb(moving, Vec2::zero(), unit_at(1.0, 0.0)), None);
    // passing below the corner diagonally
    assert_eq!(sweep_aabb(moving, Vec2::new(3.0, 3.0), unit_at(2.5, 0.0)), None);
}

#[test]
fn test_sweep_map_lands_on_floor() {
    let layer = TileLayer::from_rows(
        &[
            "....",
            "....",
            "####",
        ],
        Extent2::new(64.0, 64.0),
    );
    let map = TileLayerCollisionMap::new(&layer);
    let sweep = sweep_map(
        &map,
        Vec2::new(70.0, 80.0),
        Vec2::new(70.0, 16.0),
        Extent2::new(32.0, 32.0),
    );
    assert_eq!(sweep.toi, 0.25);
    assert_eq!(sweep.pos, Vec2::new(70.0, 64.0));
    assert_eq!(sweep.hit, Some(Face::PosY));
    assert_eq!(sweep.flags, CollisionFlags::from_face(Face::NegY));
}

#[test]
fn test_sweep_map_takes_earliest_hit() {
    // the far wall comes first in scan order
    let layer = TileLayer::from_rows(
        &[
            "..#...",
            "....#.",
        ],
        Extent2::new(64.0, 64.0),
    );
    let map = TileLayerCollisionMap::new(&layer);
    let sweep = sweep_map(
        &map,
        Vec2::new(0.0, 48.0),
        Vec2::new(300.0, 48.0),
        Extent2::new(32.0, 32.0),
    );
    assert!((sweep.toi - 96.0 / 300.0).abs() < 1e-6);
    assert!((sweep.pos.x - 96.0).abs() < 1e-3);
    assert_eq!(sweep.pos.y, 48.0);
    assert_eq!(sweep.hit, Some(Face::NegX));
    assert!(sweep.flags.right);
}

#[test]
fn test_sweep_map_unblocked() {
    let sweep = sweep_map(
        &NoCollisions,
        Vec2::new(5.0, 5.0),
        Vec2::new(-300.0, 42.0),
        Extent2::new(4.0, 4.0),
    );
    assert_eq!(sweep.pos, Vec2::new(-300.0, 42.0));
    assert_eq!(sweep.toi, 1.0);
    assert_eq!(sweep.hit, None);
    assert!(!sweep.flags.any());
}

#[test]
#[should_panic(expected = "collision body extent must be positive")]
fn test_sweep_map_rejects_empty_extent() {
    sweep_map(&NoCollisions, Vec2::zero(), Vec2::new(1.0, 1.0), Extent2::new(4.0, 0.0));
}
