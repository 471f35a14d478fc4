//! A layer of tiles with a world-unit cell size.

use crate::per_cell::PerCell;
use std::fmt::{
    self,
    Display,
    Formatter,
};
use vek::*;


/// Tile identifier within some tile set. Meaningless to this crate beyond
/// being present or absent.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct TileId(pub u16);

/// Grid of optional tiles, each cell `tile_size` world units large.
///
/// World space has its origin at the bottom-left corner of cell `(0, 0)`.
#[derive(Debug, Clone, PartialEq)]
pub struct TileLayer {
    pub tiles: PerCell<Option<TileId>>,
    pub tile_size: Extent2<f32>,
}

impl TileLayer {
    /// Empty layer.
    pub fn new(size: Extent2<u32>, tile_size: Extent2<f32>) -> Self {
        TileLayer {
            tiles: PerCell::new(size),
            tile_size,
        }
    }

    /// Build a layer from rows of ASCII art, given top row first.
    ///
    /// `.` and ` ` are empty cells, any other character is a tile whose id is
    /// the character's code point (truncated). Rows shorter than the longest
    /// row are padded with empty cells.
    ///
    /// ```
    /// use tile_grid::TileLayer;
    /// use vek::*;
    ///
    /// let layer = TileLayer::from_rows(
    ///     &[
    ///         "#..",
    ///         "###",
    ///     ],
    ///     Extent2::new(16.0, 16.0),
    /// );
    /// assert!(layer.is_occupied([0, 1]));
    /// assert!(!layer.is_occupied([1, 1]));
    /// assert!(layer.is_occupied([2, 0]));
    /// assert!(!layer.is_occupied([3, 0]));
    /// ```
    pub fn from_rows<S: AsRef<str>>(rows: &[S], tile_size: Extent2<f32>) -> Self {
        let rows = rows
            .iter()
            .map(|row| row.as_ref().chars().collect::<Vec<char>>())
            .collect::<Vec<_>>();
        let width = rows.iter().map(Vec::len).max().unwrap_or(0) as u32;
        let height = rows.len() as u32;
        let tiles = PerCell::from_fn(Extent2::new(width, height), |col, row| {
            // the first given row is the top of the grid
            let line = &rows[(height - 1 - row) as usize];
            match line.get(col as usize) {
                None | Some('.') | Some(' ') => None,
                Some(&c) => Some(TileId(c as u32 as u16)),
            }
        });
        TileLayer {
            tiles,
            tile_size,
        }
    }

    pub fn size(&self) -> Extent2<u32> {
        self.tiles.size()
    }

    /// Size of the whole layer in world units.
    pub fn world_size(&self) -> Extent2<f32> {
        let size = self.tiles.size();
        Extent2::new(
            size.w as f32 * self.tile_size.w,
            size.h as f32 * self.tile_size.h,
        )
    }

    /// Tile at `cell`, if the cell is in bounds and has one.
    pub fn get<V: Into<Vec2<i64>>>(&self, cell: V) -> Option<TileId> {
        self.tiles.get(cell).copied().flatten()
    }

    pub fn set<V: Into<Vec2<i64>>>(&mut self, cell: V, tile: Option<TileId>) -> bool {
        match self.tiles.get_mut(cell) {
            Some(slot) => {
                *slot = tile;
                true
            }
            None => false,
        }
    }

    /// Whether `cell` holds a tile. Out-of-bounds cells never do.
    pub fn is_occupied<V: Into<Vec2<i64>>>(&self, cell: V) -> bool {
        self.get(cell).is_some()
    }

    /// Number of cells which hold a tile.
    pub fn occupied_count(&self) -> usize {
        self.tiles.iter().filter(|(_, tile)| tile.is_some()).count()
    }
}

impl Display for TileLayer {
    /// Renders in the same top-row-first form `from_rows` accepts, with `#`
    /// for every tile.
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        let size = self.size();
        for row in (0..size.h).rev() {
            for col in 0..size.w {
                let c = if self.is_occupied([col as i64, row as i64]) { '#' } else { '.' };
                write!(f, "{}", c)?;
            }
            if row > 0 {
                writeln!(f)?;
            }
        }
        Ok(())
    }
}


#[test]
fn test_from_rows_orientation() {
    let layer = TileLayer::from_rows(
        &[
            "..#",
            "#",
        ],
        Extent2::new(32.0, 32.0),
    );
    assert_eq!(layer.size(), Extent2::new(3, 2));
    assert_eq!(layer.get([0, 0]), Some(TileId('#' as u16)));
    assert_eq!(layer.get([1, 0]), None);
    assert_eq!(layer.get([2, 0]), None);
    assert_eq!(layer.get([2, 1]), Some(TileId('#' as u16)));
    assert_eq!(layer.occupied_count(), 2);
    assert_eq!(layer.world_size(), Extent2::new(96.0, 64.0));
    assert_eq!(layer.to_string(), "..#\n#..");
}

#[test]
fn test_set_out_of_bounds() {
    let mut layer = TileLayer::new(Extent2::new(2, 2), Extent2::new(8.0, 8.0));
    assert!(layer.set([1, 1], Some(TileId(3))));
    assert!(!layer.set([2, 1], Some(TileId(3))));
    assert!(!layer.set([-1, 0], Some(TileId(3))));
    assert!(layer.is_occupied([1, 1]));
    assert!(!layer.is_occupied([-1, -1]));
    assert_eq!(layer.occupied_count(), 1);
}
