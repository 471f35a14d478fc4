//! Collision of moving boxes against tile grids.
//!
//! `basic` is the axis-separated resolver most movement goes through. `swept`
//! finds exact times of impact instead. `body` and `world` wrap the resolver
//! into bodies which request movement and have it applied once per step, and
//! `scenario` drives those from JSON for the command line runner.

#[macro_use]
extern crate tracing;

pub mod aa_rect;
pub mod collision_map;
pub mod flags;
pub mod basic;
pub mod swept;
pub mod body;
pub mod world;
pub mod scenario;
pub mod settings;
pub mod logging;


pub mod prelude {
    pub use crate::{
        aa_rect::AaRect,
        collision_map::{
            CollisionMap,
            TileLayerCollisionMap,
            NoCollisions,
        },
        flags::CollisionFlags,
        basic::{
            BasicCollision,
            Resolved,
            resolve,
        },
        swept::{
            sweep_aabb,
            sweep_map,
            SweptHit,
            Sweep,
        },
        body::{
            MovingBody,
            CollisionRect,
        },
        world::{
            PhysicsWorld,
            BodyKey,
        },
    };
}
