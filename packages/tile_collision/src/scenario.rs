//! Scripted scenarios: a tile layer and some bodies to simulate in it, loaded
//! from JSON.

use crate::{
    body::{
        CollisionRect,
        MovingBody,
    },
    collision_map::TileLayerCollisionMap,
    flags::CollisionFlags,
    world::{
        BodyKey,
        PhysicsWorld,
    },
};
use tile_grid::TileLayer;
use std::{
    path::Path,
    fs,
};
use serde::{Serialize, Deserialize};
use anyhow::*;
use vek::*;


/// A tile layer and the bodies in it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    /// Width and height of one tile in world units.
    pub tile_size: [f32; 2],
    /// Rows of ASCII art, top row first. See `TileLayer::from_rows`.
    pub rows: Vec<String>,
    pub bodies: Vec<BodySpec>,
    /// Number of steps to simulate, if the scenario wants a specific amount.
    #[serde(default)]
    pub steps: Option<u32>,
}

/// A body in a `Scenario`, with its starting state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BodySpec {
    pub name: String,
    pub pos: [f32; 2],
    pub size: [f32; 2],
    /// Defaults to the whole of `size`.
    #[serde(default)]
    pub collision: Option<CollisionSpec>,
    /// Movement per step, in world units.
    #[serde(default)]
    pub velocity: [f32; 2],
    /// Subtracted from the vertical velocity every step.
    #[serde(default)]
    pub gravity: f32,
    #[serde(default)]
    pub keep_within_horizontal_world: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollisionSpec {
    #[serde(default)]
    pub offset: [f32; 2],
    pub ext: [f32; 2],
}

/// State of one body after a step.
#[derive(Debug, Clone, PartialEq)]
pub struct BodyState {
    pub name: String,
    pub pos: Vec2<f32>,
    pub velocity: Vec2<f32>,
    pub flags: CollisionFlags,
}

fn positive(n: f32) -> bool {
    n.is_finite() && n > 0.0
}

impl Scenario {
    /// Read and validate a scenario file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path)
            .with_context(|| format!("unable to read scenario {}", path.display()))?;
        Self::parse(&json)
            .with_context(|| format!("invalid scenario {}", path.display()))
    }

    /// Parse and validate a scenario from JSON.
    pub fn parse(json: &str) -> Result<Self> {
        let scenario: Scenario = serde_json::from_str(json)?;
        scenario.validate()?;
        Ok(scenario)
    }

    pub fn validate(&self) -> Result<()> {
        ensure!(
            self.tile_size.iter().copied().all(positive),
            "tile size must be positive, got {:?}", self.tile_size,
        );
        ensure!(
            self.rows.iter().any(|row| !row.is_empty()),
            "scenario has no tiles",
        );
        for body in &self.bodies {
            ensure!(
                body.size.iter().copied().all(positive),
                "body {:?} size must be positive, got {:?}", body.name, body.size,
            );
            if let Some(collision) = body.collision.as_ref() {
                ensure!(
                    collision.ext.iter().copied().all(positive),
                    "body {:?} collision extent must be positive, got {:?}",
                    body.name, collision.ext,
                );
            }
            let finite = body.pos.iter()
                .chain(&body.velocity)
                .chain(Some(&body.gravity))
                .all(|n| n.is_finite());
            if !finite {
                bail!("body {:?} has a non-finite position, velocity, or gravity", body.name);
            }
        }
        Ok(())
    }

    pub fn build_layer(&self) -> TileLayer {
        TileLayer::from_rows(&self.rows, Extent2::from(self.tile_size))
    }

    /// Step count to use, given the count to fall back to.
    pub fn steps_or(&self, default: u32) -> u32 {
        self.steps.unwrap_or(default)
    }

    /// Simulate `steps` steps, returning the state of every body at the end.
    pub fn run(&self, steps: u32) -> Vec<BodyState> {
        self.run_with(steps, |_, _| ())
    }

    /// Simulate `steps` steps, passing the state of every body to `on_step`
    /// after each, and returning the state at the end.
    ///
    /// With zero steps, the starting state is returned.
    pub fn run_with<F>(&self, steps: u32, mut on_step: F) -> Vec<BodyState>
    where
        F: FnMut(u32, &[BodyState]),
    {
        let layer = self.build_layer();
        debug!(
            size = ?layer.size(),
            occupied = layer.occupied_count(),
            bodies = self.bodies.len(),
            "running scenario",
        );
        let mut world = PhysicsWorld::new(TileLayerCollisionMap::new(&layer));

        let mut bodies = self.bodies
            .iter()
            .map(|spec| {
                let key = world.add(spec.build_body());
                (key, spec, Vec2::from(spec.velocity))
            })
            .collect::<Vec<(BodyKey, &BodySpec, Vec2<f32>)>>();

        let mut states = self.bodies
            .iter()
            .map(|spec| BodyState {
                name: spec.name.clone(),
                pos: Vec2::from(spec.pos),
                velocity: Vec2::from(spec.velocity),
                flags: CollisionFlags::NONE,
            })
            .collect::<Vec<_>>();

        for step in 0..steps {
            for (key, spec, velocity) in &mut bodies {
                velocity.y -= spec.gravity;
                if let Some(body) = world.get_mut(*key) {
                    body.move_by(*velocity);
                }
            }
            world.step();

            states.clear();
            for (key, spec, velocity) in &mut bodies {
                let body = match world.get(*key) {
                    Some(body) => body,
                    None => continue,
                };
                let flags = body.last_flags();
                if flags.blocked_y() {
                    velocity.y = 0.0;
                }
                trace!(step, name = %spec.name, pos = ?body.pos(), ?flags, "stepped body");
                states.push(BodyState {
                    name: spec.name.clone(),
                    pos: body.pos(),
                    velocity: *velocity,
                    flags,
                });
            }
            on_step(step, &states);
        }
        states
    }
}

impl BodySpec {
    pub fn build_body(&self) -> MovingBody {
        let size = Extent2::from(self.size);
        let collision = match self.collision.as_ref() {
            Some(collision) => CollisionRect {
                offset: Vec2::from(collision.offset),
                ext: Extent2::from(collision.ext),
            },
            None => CollisionRect {
                offset: Vec2::zero(),
                ext: size,
            },
        };
        let mut body = MovingBody::new(Vec2::from(self.pos), size)
            .with_collision(collision);
        body.keep_within_horizontal_world = self.keep_within_horizontal_world;
        body
    }
}


#[cfg(test)]
const FALLING_SCENARIO: &'static str = r#####"{
    "tile_size": [16, 16],
    "rows": [
        "....",
        "....",
        "####"
    ],
    "bodies": [
        {
            "name": "faller",
            "pos": [0, 40],
            "size": [8, 8],
            "gravity": 4
        },
        {
            "name": "walker",
            "pos": [0, 16],
            "size": [8, 8],
            "velocity": [8, 0],
            "keep_within_horizontal_world": true
        }
    ],
    "steps": 10
}"#####;

#[test]
fn test_parse_scenario() {
    let scenario = Scenario::parse(FALLING_SCENARIO).unwrap();
    assert_eq!(scenario.steps_or(60), 10);
    assert_eq!(scenario.bodies.len(), 2);
    assert_eq!(scenario.bodies[0].velocity, [0.0, 0.0]);
    assert_eq!(scenario.bodies[0].collision, None);
    assert!(scenario.bodies[1].keep_within_horizontal_world);

    let layer = scenario.build_layer();
    assert_eq!(layer.size(), Extent2::new(4, 3));
    assert_eq!(layer.occupied_count(), 4);

    let body = scenario.bodies[0].build_body();
    assert_eq!(body.collision.ext, Extent2::new(8.0, 8.0));
    assert_eq!(body.collision.offset, Vec2::zero());
}

#[test]
fn test_run_scenario() {
    let scenario = Scenario::parse(FALLING_SCENARIO).unwrap();
    let mut results = Vec::new();
    let last = scenario.run_with(10, |step, states| {
        assert_eq!(step as usize, results.len());
        results.push(states.to_vec());
    });
    assert_eq!(results.len(), 10);
    assert_eq!(last, results[9]);

    // falls 4, 8, 12, then lands on the floor on the fourth step
    let faller = |step: usize| results[step][0].clone();
    assert_eq!(faller(0).pos, Vec2::new(0.0, 36.0));
    assert_eq!(faller(2).pos, Vec2::new(0.0, 16.0));
    assert!(!faller(2).flags.down);
    assert_eq!(faller(3).pos, Vec2::new(0.0, 16.0));
    assert!(faller(3).flags.down);
    assert_eq!(faller(3).velocity, Vec2::zero());
    assert_eq!(faller(9).pos, Vec2::new(0.0, 16.0));
    assert!(faller(9).flags.down);

    // walks until held in by the right edge of the world
    let walker = |step: usize| results[step][1].clone();
    assert_eq!(walker(0).pos, Vec2::new(8.0, 16.0));
    assert_eq!(walker(6).pos, Vec2::new(56.0, 16.0));
    assert!(!walker(6).flags.right);
    assert_eq!(walker(7).pos, Vec2::new(56.0, 16.0));
    assert!(walker(7).flags.right);
    assert_eq!(walker(9).name, "walker");
}

#[test]
fn test_run_keeps_only_latest_state() {
    let scenario = Scenario::parse(FALLING_SCENARIO).unwrap();

    let start = scenario.run(0);
    assert_eq!(start.len(), 2);
    assert_eq!(start[0].pos, Vec2::new(0.0, 40.0));
    assert_eq!(start[1].velocity, Vec2::new(8.0, 0.0));
    assert!(!start[1].flags.any());

    let end = scenario.run(200_000);
    assert_eq!(end.len(), 2);
    assert_eq!(end[0].pos, Vec2::new(0.0, 16.0));
    assert!(end[0].flags.down);
    assert_eq!(end[1].pos, Vec2::new(56.0, 16.0));
    assert!(end[1].flags.right);
}

#[test]
fn test_invalid_scenarios() {
    let bad_tile = r##"{ "tile_size": [0, 16], "rows": ["#"], "bodies": [] }"##;
    assert!(Scenario::parse(bad_tile).is_err());

    let no_rows = r#"{ "tile_size": [16, 16], "rows": [], "bodies": [] }"#;
    assert!(Scenario::parse(no_rows).is_err());

    let bad_body = r##"{
        "tile_size": [16, 16],
        "rows": ["#"],
        "bodies": [{ "name": "flat", "pos": [0, 0], "size": [8, -1] }]
    }"##;
    assert!(Scenario::parse(bad_body).is_err());

    let not_json = "tile_size = 16";
    assert!(Scenario::parse(not_json).is_err());

    assert!(Scenario::load("this/scenario/does/not/exist.json").is_err());
}
