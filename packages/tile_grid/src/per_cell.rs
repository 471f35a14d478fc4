//! Dense storage of a value for each cell of a fixed-size grid.

use std::{
    ops::{
        Index,
        IndexMut,
    },
    fmt::{
        self,
        Debug,
        Formatter,
    },
};
use vek::*;


/// A value for every cell in a `size.w` by `size.h` grid.
///
/// Cells are addressed by `(col, row)` with the origin at the bottom-left, so
/// row 0 is the bottom row. Lookups take signed coordinates so that callers
/// working in world space can ask about cells off the edge of the grid; such
/// lookups answer `None` rather than panicking.
#[derive(Clone, PartialEq, Eq)]
pub struct PerCell<T> {
    size: Extent2<u32>,
    cells: Box<[T]>,
}

impl<T> PerCell<T> {
    /// Construct with each cell initialized by `f(col, row)`.
    pub fn from_fn<F>(size: Extent2<u32>, mut f: F) -> Self
    where
        F: FnMut(u32, u32) -> T,
    {
        let mut cells = Vec::with_capacity(size.w as usize * size.h as usize);
        for row in 0..size.h {
            for col in 0..size.w {
                cells.push(f(col, row));
            }
        }
        PerCell {
            size,
            cells: cells.into_boxed_slice(),
        }
    }

    pub fn size(&self) -> Extent2<u32> {
        self.size
    }

    pub fn width(&self) -> u32 {
        self.size.w
    }

    pub fn height(&self) -> u32 {
        self.size.h
    }

    /// Whether `(col, row)` names a cell of this grid.
    pub fn contains<V: Into<Vec2<i64>>>(&self, cell: V) -> bool {
        self.idx(cell.into()).is_some()
    }

    fn idx(&self, cell: Vec2<i64>) -> Option<usize> {
        if cell.x >= 0
            && cell.y >= 0
            && cell.x < self.size.w as i64
            && cell.y < self.size.h as i64
        {
            Some(cell.y as usize * self.size.w as usize + cell.x as usize)
        } else {
            None
        }
    }

    pub fn get<V: Into<Vec2<i64>>>(&self, cell: V) -> Option<&T> {
        self.idx(cell.into()).map(|i| &self.cells[i])
    }

    pub fn get_mut<V: Into<Vec2<i64>>>(&mut self, cell: V) -> Option<&mut T> {
        self.idx(cell.into()).map(move |i| &mut self.cells[i])
    }

    /// Iterate over every cell's coordinate and value, row by row from the
    /// bottom.
    pub fn iter(&self) -> impl Iterator<Item=(Vec2<u32>, &T)> + '_ {
        let w = self.size.w.max(1);
        self.cells
            .iter()
            .enumerate()
            .map(move |(i, val)| {
                let i = i as u32;
                (Vec2::new(i % w, i / w), val)
            })
    }
}

impl<T: Clone> PerCell<T> {
    pub fn repeat(size: Extent2<u32>, val: T) -> Self {
        PerCell::from_fn(size, |_, _| val.clone())
    }
}

impl<T: Default> PerCell<T> {
    pub fn new(size: Extent2<u32>) -> Self {
        PerCell::from_fn(size, |_, _| T::default())
    }
}

impl<T> Index<Vec2<u32>> for PerCell<T> {
    type Output = T;

    fn index(&self, cell: Vec2<u32>) -> &T {
        self.get(cell.map(|n| n as i64))
            .unwrap_or_else(|| panic!("cell {:?} out of bounds for {:?}", cell, self.size))
    }
}

impl<T> IndexMut<Vec2<u32>> for PerCell<T> {
    fn index_mut(&mut self, cell: Vec2<u32>) -> &mut T {
        let size = self.size;
        self.get_mut(cell.map(|n| n as i64))
            .unwrap_or_else(|| panic!("cell {:?} out of bounds for {:?}", cell, size))
    }
}

impl<T: Debug> Debug for PerCell<T> {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        f.debug_struct("PerCell")
            .field("size", &self.size)
            .field("cells", &self.cells)
            .finish()
    }
}


#[test]
fn test_per_cell_bounds() {
    let mut grid: PerCell<u8> = PerCell::new(Extent2::new(3, 2));
    *grid.get_mut([2, 1]).unwrap() = 7;
    assert_eq!(grid.get([2, 1]), Some(&7));
    assert_eq!(grid[Vec2::new(2, 1)], 7);
    assert_eq!(grid.get([3, 1]), None);
    assert_eq!(grid.get([2, 2]), None);
    assert_eq!(grid.get([-1, 0]), None);
    assert_eq!(grid.get([0, -1]), None);
    assert_eq!(grid.get([i64::MIN, i64::MAX]), None);
    assert!(grid.contains([0, 0]));
    assert!(!grid.contains([0, 2]));
}

#[test]
fn test_per_cell_iter_order() {
    let grid = PerCell::from_fn(Extent2::new(2, 2), |col, row| col * 10 + row);
    let visited = grid.iter()
        .map(|(cell, &val)| (cell.x, cell.y, val))
        .collect::<Vec<_>>();
    assert_eq!(
        visited,
        vec![(0, 0, 0), (1, 0, 10), (0, 1, 1), (1, 1, 11)],
    );
}
