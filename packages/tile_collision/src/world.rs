//! A collision map together with the bodies moving through it.

use crate::{
    basic::BasicCollision,
    body::MovingBody,
    collision_map::CollisionMap,
};
use slab::Slab;
use vek::*;


/// Handle to a body in a `PhysicsWorld`. Not reused while the body lives, but
/// may be reused after it is removed.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct BodyKey(pub usize);

/// Owns a collision map and the bodies moving through it, and applies their
/// movement once per step.
#[derive(Debug)]
pub struct PhysicsWorld<M> {
    map: M,
    bodies: Slab<MovingBody>,
    resolver: BasicCollision,
}

impl<M: CollisionMap> PhysicsWorld<M> {
    pub fn new(map: M) -> Self {
        PhysicsWorld {
            map,
            bodies: Slab::new(),
            resolver: BasicCollision::new(),
        }
    }

    pub fn map(&self) -> &M {
        &self.map
    }

    /// Size of the world in world units.
    pub fn world_size(&self) -> Extent2<f32> {
        self.map.world_size()
    }

    pub fn add(&mut self, body: MovingBody) -> BodyKey {
        BodyKey(self.bodies.insert(body))
    }

    pub fn get(&self, key: BodyKey) -> Option<&MovingBody> {
        self.bodies.get(key.0)
    }

    pub fn get_mut(&mut self, key: BodyKey) -> Option<&mut MovingBody> {
        self.bodies.get_mut(key.0)
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item=(BodyKey, &MovingBody)> + '_ {
        self.bodies.iter().map(|(key, body)| (BodyKey(key), body))
    }

    /// Apply every body's requested movement, in key order, then drop bodies
    /// marked for removal. Returns the keys of the dropped bodies.
    pub fn step(&mut self) -> Vec<BodyKey> {
        let mut removed = Vec::new();
        for (key, body) in self.bodies.iter_mut() {
            body.apply_movement(&self.map, &mut self.resolver);
            if body.is_removed() {
                removed.push(BodyKey(key));
            }
        }
        for &key in &removed {
            self.bodies.remove(key.0);
            debug!(key = key.0, "removed body");
        }
        removed
    }
}


#[cfg(test)]
use crate::{
    body::CollisionRect,
    collision_map::TileLayerCollisionMap,
};
#[cfg(test)]
use tile_grid::TileLayer;

#[cfg(test)]
fn square_body(pos: Vec2<f32>, side: f32) -> MovingBody {
    MovingBody::new(pos, Extent2::new(side, side))
        .with_collision(CollisionRect {
            offset: Vec2::zero(),
            ext: Extent2::new(side, side),
        })
}

#[test]
fn test_bodies_fall_to_floor() {
    let layer = TileLayer::from_rows(
        &[
            "......",
            "......",
            "......",
            "######",
        ],
        Extent2::new(16.0, 16.0),
    );
    let mut world = PhysicsWorld::new(TileLayerCollisionMap::new(&layer));
    let a = world.add(square_body(Vec2::new(0.0, 48.0), 8.0));
    let b = world.add(square_body(Vec2::new(40.0, 60.0), 12.0));

    let mut landed_steps = 0;
    for _ in 0..20 {
        for key in [a, b] {
            world.get_mut(key).unwrap().move_by(Vec2::new(0.0, -4.0));
        }
        world.step();
        if world.get(a).unwrap().last_flags().down {
            landed_steps += 1;
        }
    }

    assert_eq!(world.get(a).unwrap().pos(), Vec2::new(0.0, 16.0));
    assert_eq!(world.get(b).unwrap().pos(), Vec2::new(40.0, 16.0));
    assert!(world.get(b).unwrap().last_flags().down);
    assert!(landed_steps > 0);
}

#[test]
fn test_removed_bodies_are_dropped_after_moving() {
    let layer = TileLayer::new(Extent2::new(8, 8), Extent2::new(16.0, 16.0));
    let mut world = PhysicsWorld::new(TileLayerCollisionMap::new(&layer));
    let a = world.add(square_body(Vec2::new(0.0, 0.0), 4.0));
    let b = world.add(square_body(Vec2::new(20.0, 20.0), 4.0));
    assert_eq!(world.len(), 2);

    world.get_mut(b).unwrap().remove();
    world.get_mut(a).unwrap().move_by(Vec2::new(8.0, 8.0));
    let removed = world.step();

    assert_eq!(removed, vec![b]);
    assert_eq!(world.len(), 1);
    assert!(world.get(b).is_none());
    assert_eq!(world.get(a).unwrap().pos(), Vec2::new(8.0, 8.0));
    assert_eq!(world.iter().map(|(key, _)| key).collect::<Vec<_>>(), vec![a]);
    assert_eq!(world.world_size(), Extent2::new(128.0, 128.0));
}
