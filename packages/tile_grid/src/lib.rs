//! Engine-neutral storage for 2D tile grids.
//!
//! Basic example:
//!
//! ```
//! use tile_grid::{
//!     TileLayer,
//!     TileId,
//!     Face,
//!     Axis,
//!     Pole,
//! };
//! use vek::*;
//!
//! // a 4x3 map of 16 unit tiles, with a floor
//! let mut layer = TileLayer::from_rows(
//!     &[
//!         "....",
//!         "....",
//!         "####",
//!     ],
//!     Extent2::new(16.0, 16.0),
//! );
//! assert_eq!(layer.world_size(), Extent2::new(64.0, 48.0));
//!
//! // put a block on the floor
//! layer.set([2, 1], Some(TileId(1)));
//! assert!(layer.is_occupied([2, 1]));
//!
//! // faces are an axis and a pole
//! assert_eq!(Face::from_axis_pole(Axis::Y, Pole::Neg), Face::NegY);
//! assert_eq!(-Face::NegY, Face::PosY);
//! ```

mod axis;
mod per_cell;
mod tile_layer;


pub use crate::{
    axis::{
        Axis,
        PerAxis,
        AXES,
        NUM_AXES,
        Pole,
        Sign,
        Face,
        PerFace,
        FACES,
        NUM_FACES,
    },
    per_cell::PerCell,
    tile_layer::{
        TileLayer,
        TileId,
    },
};
