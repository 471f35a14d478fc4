//! Moving bodies which collide with the world each step.

use crate::{
    basic::BasicCollision,
    collision_map::CollisionMap,
    flags::CollisionFlags,
};
use vek::*;


/// The part of a body which collides, relative to the body's position.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct CollisionRect {
    pub offset: Vec2<f32>,
    pub ext: Extent2<f32>,
}

impl Default for CollisionRect {
    fn default() -> Self {
        CollisionRect {
            offset: Vec2::zero(),
            ext: Extent2::new(64.0, 64.0),
        }
    }
}

/// A body that requests movement over the course of a step, then has that
/// movement applied against a collision map all at once.
#[derive(Debug, Clone, PartialEq)]
pub struct MovingBody {
    pos: Vec2<f32>,
    target: Vec2<f32>,
    /// Visual footprint, used for staying inside the world and for
    /// `outside`.
    pub size: Extent2<f32>,
    pub collision: CollisionRect,
    /// When false, movement ignores the collision map entirely.
    pub collide_with_world: bool,
    /// When true, the body is clamped between the left and right edges of
    /// the world after moving.
    pub keep_within_horizontal_world: bool,
    last_flags: CollisionFlags,
    removed: bool,
}

impl MovingBody {
    pub fn new(pos: Vec2<f32>, size: Extent2<f32>) -> Self {
        MovingBody {
            pos,
            target: pos,
            size,
            collision: CollisionRect::default(),
            collide_with_world: true,
            keep_within_horizontal_world: false,
            last_flags: CollisionFlags::NONE,
            removed: false,
        }
    }

    pub fn with_collision(mut self, collision: CollisionRect) -> Self {
        self.collision = collision;
        self
    }

    pub fn pos(&self) -> Vec2<f32> {
        self.pos
    }

    /// Where the body will try to move to on the next step.
    pub fn target(&self) -> Vec2<f32> {
        self.target
    }

    /// Sides that were blocked by the most recent movement.
    pub fn last_flags(&self) -> CollisionFlags {
        self.last_flags
    }

    /// Place the body at `pos` immediately, discarding any pending movement.
    pub fn teleport(&mut self, pos: Vec2<f32>) {
        self.pos = pos;
        self.target = pos;
    }

    /// Request movement by `delta`, on top of any movement already requested
    /// this step.
    pub fn move_by(&mut self, delta: Vec2<f32>) {
        self.target += delta;
    }

    /// Mark the body for removal at the end of the current step.
    pub fn remove(&mut self) {
        self.removed = true;
    }

    pub fn is_removed(&self) -> bool {
        self.removed
    }

    /// Apply the requested movement against `map` and clear the request.
    pub fn apply_movement<M: CollisionMap>(
        &mut self,
        map: &M,
        resolver: &mut BasicCollision,
    ) -> CollisionFlags {
        let offset = self.collision.offset;
        let resolved = resolver.resolve(
            map,
            self.pos + offset,
            self.target + offset,
            self.collision.ext,
        );
        self.last_flags = resolved.flags;

        self.pos = if self.collide_with_world {
            resolved.pos - offset
        } else {
            self.target
        };

        if self.keep_within_horizontal_world {
            let world_w = map.world_size().w;
            if self.pos.x < 0.0 {
                self.pos.x = 0.0;
                self.last_flags.left = true;
            }
            if self.pos.x + self.size.w > world_w {
                self.pos.x = world_w - self.size.w;
                self.last_flags.right = true;
            }
        }

        self.target = self.pos;
        self.last_flags
    }

    /// Which edges of a world of size `world` the body has completely left.
    pub fn outside(&self, world: Extent2<f32>) -> CollisionFlags {
        CollisionFlags {
            left: self.pos.x + self.size.w < 0.0,
            right: self.pos.x > world.w,
            down: self.pos.y + self.size.h < 0.0,
            up: self.pos.y > world.h,
        }
    }
}


#[cfg(test)]
use crate::collision_map::{
    TileLayerCollisionMap,
    NoCollisions,
};
#[cfg(test)]
use tile_grid::TileLayer;

#[test]
fn test_move_accumulates_until_applied() {
    let mut body = MovingBody::new(Vec2::new(10.0, 10.0), Extent2::new(4.0, 4.0))
        .with_collision(CollisionRect {
            offset: Vec2::zero(),
            ext: Extent2::new(4.0, 4.0),
        });
    body.move_by(Vec2::new(3.0, 0.0));
    body.move_by(Vec2::new(2.0, -5.0));
    assert_eq!(body.pos(), Vec2::new(10.0, 10.0));
    assert_eq!(body.target(), Vec2::new(15.0, 5.0));

    let flags = body.apply_movement(&NoCollisions, &mut BasicCollision::new());
    assert!(!flags.any());
    assert_eq!(body.pos(), Vec2::new(15.0, 5.0));
    assert_eq!(body.target(), body.pos());

    body.move_by(Vec2::new(1.0, 1.0));
    body.teleport(Vec2::new(-3.0, 2.0));
    assert_eq!(body.pos(), Vec2::new(-3.0, 2.0));
    assert_eq!(body.target(), Vec2::new(-3.0, 2.0));
}

#[test]
fn test_collision_rect_offset() {
    let layer = TileLayer::from_rows(
        &[
            "....",
            "....",
            "####",
        ],
        Extent2::new(64.0, 64.0),
    );
    let map = TileLayerCollisionMap::new(&layer);

    // a 64 tall sprite whose feet are a 32 wide box, 16 in from its left
    let mut body = MovingBody::new(Vec2::new(64.0, 100.0), Extent2::new(64.0, 64.0))
        .with_collision(CollisionRect {
            offset: Vec2::new(16.0, 0.0),
            ext: Extent2::new(32.0, 32.0),
        });
    body.move_by(Vec2::new(0.0, -60.0));
    let flags = body.apply_movement(&map, &mut BasicCollision::new());
    assert!(flags.down);
    assert_eq!(body.pos(), Vec2::new(64.0, 64.0));
    assert_eq!(body.last_flags(), flags);
}

#[test]
fn test_ignoring_world_collision() {
    let layer = TileLayer::from_rows(&["####"], Extent2::new(64.0, 64.0));
    let map = TileLayerCollisionMap::new(&layer);
    let mut body = MovingBody::new(Vec2::new(0.0, 100.0), Extent2::new(32.0, 32.0))
        .with_collision(CollisionRect {
            offset: Vec2::zero(),
            ext: Extent2::new(32.0, 32.0),
        });
    body.collide_with_world = false;
    body.move_by(Vec2::new(0.0, -80.0));
    let flags = body.apply_movement(&map, &mut BasicCollision::new());
    // the collision is still reported, just not acted on
    assert!(flags.down);
    assert_eq!(body.pos(), Vec2::new(0.0, 20.0));
}

#[test]
fn test_keep_within_horizontal_world() {
    let layer = TileLayer::new(Extent2::new(4, 4), Extent2::new(16.0, 16.0));
    let map = TileLayerCollisionMap::new(&layer);
    let mut resolver = BasicCollision::new();
    let mut body = MovingBody::new(Vec2::new(8.0, 8.0), Extent2::new(8.0, 8.0))
        .with_collision(CollisionRect {
            offset: Vec2::zero(),
            ext: Extent2::new(8.0, 8.0),
        });
    body.keep_within_horizontal_world = true;

    body.move_by(Vec2::new(-20.0, 0.0));
    let flags = body.apply_movement(&map, &mut resolver);
    assert_eq!(body.pos(), Vec2::new(0.0, 8.0));
    assert!(flags.left && !flags.right);

    body.move_by(Vec2::new(100.0, 0.0));
    let flags = body.apply_movement(&map, &mut resolver);
    assert_eq!(body.pos(), Vec2::new(64.0 - 8.0, 8.0));
    assert!(flags.right && !flags.left);

    // vertical movement is not clamped
    body.move_by(Vec2::new(0.0, 100.0));
    let flags = body.apply_movement(&map, &mut resolver);
    assert_eq!(body.pos(), Vec2::new(56.0, 108.0));
    assert!(!flags.blocked_y());
}

#[test]
fn test_outside() {
    let world = Extent2::new(100.0, 50.0);
    let size = Extent2::new(10.0, 10.0);
    let inside = MovingBody::new(Vec2::new(-5.0, 45.0), size);
    assert!(!inside.outside(world).any());

    let left = MovingBody::new(Vec2::new(-10.5, 0.0), size);
    assert_eq!(left.outside(world), CollisionFlags { left: true, ..CollisionFlags::NONE });

    let up_right = MovingBody::new(Vec2::new(101.0, 51.0), size);
    assert_eq!(
        up_right.outside(world),
        CollisionFlags { up: true, right: true, ..CollisionFlags::NONE },
    );

    let below = MovingBody::new(Vec2::new(0.0, -11.0), size);
    assert!(below.outside(world).down);
}
