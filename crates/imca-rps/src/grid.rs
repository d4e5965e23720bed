//! Rectangular grid of weapon indices.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::weapon::Weapon;

/// A `width × height` grid of weapons, stored row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct WeaponGrid {
    cells: Vec<Weapon>,
    width: usize,
    height: usize,
}

impl WeaponGrid {
    /// Creates a grid filled with weapon 0.
    pub fn new(width: usize, height: usize) -> Self {
        Self::filled(width, height, 0)
    }

    /// Creates a grid filled with one weapon.
    pub fn filled(width: usize, height: usize, weapon: Weapon) -> Self {
        Self {
            cells: vec![weapon; width * height],
            width,
            height,
        }
    }

    /// Creates a grid from row-major cells.
    ///
    /// Returns `None` if `cells.len() != width * height`.
    pub fn from_cells(width: usize, height: usize, cells: Vec<Weapon>) -> Option<Self> {
        (cells.len() == width * height).then_some(Self {
            cells,
            width,
            height,
        })
    }

    /// Creates a grid by evaluating `f(x, y)` for every cell.
    pub fn from_fn(width: usize, height: usize, mut f: impl FnMut(usize, usize) -> Weapon) -> Self {
        let mut cells = Vec::with_capacity(width * height);
        for y in 0..height {
            for x in 0..width {
                cells.push(f(x, y));
            }
        }
        Self {
            cells,
            width,
            height,
        }
    }

    /// Creates a grid from rows of equal length.
    ///
    /// Returns `None` if the rows are ragged.
    pub fn from_rows<R: AsRef<[Weapon]>>(rows: &[R]) -> Option<Self> {
        let height = rows.len();
        let width = rows.first().map_or(0, |r| r.as_ref().len());
        let mut cells = Vec::with_capacity(width * height);
        for row in rows {
            let row = row.as_ref();
            if row.len() != width {
                return None;
            }
            cells.extend_from_slice(row);
        }
        Self::from_cells(width, height, cells)
    }

    /// Returns the width.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Returns the height.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns the number of cells.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Returns true if the grid has no cells.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Gets the weapon at a cell.
    ///
    /// # Panics
    ///
    /// Panics if the coordinate is outside the grid.
    pub fn get(&self, x: usize, y: usize) -> Weapon {
        self.cells[self.index(x, y)]
    }

    /// Sets the weapon at a cell.
    ///
    /// # Panics
    ///
    /// Panics if the coordinate is outside the grid.
    pub fn set(&mut self, x: usize, y: usize, weapon: Weapon) {
        let i = self.index(x, y);
        self.cells[i] = weapon;
    }

    /// Returns the row-major cells.
    pub fn cells(&self) -> &[Weapon] {
        &self.cells
    }

    /// Returns true if every cell holds a weapon below `weapons`.
    pub fn within(&self, weapons: u32) -> bool {
        self.cells.iter().all(|&w| (w as u32) < weapons)
    }

    /// Counts cells per weapon.
    ///
    /// Weapons at or above `weapons` are not counted.
    pub fn census(&self, weapons: u32) -> Vec<usize> {
        let mut counts = vec![0; weapons as usize];
        for &w in &self.cells {
            if let Some(c) = counts.get_mut(w as usize) {
                *c += 1;
            }
        }
        counts
    }

    fn index(&self, x: usize, y: usize) -> usize {
        assert!(
            x < self.width && y < self.height,
            "cell ({x}, {y}) outside {}x{} grid",
            self.width,
            self.height
        );
        y * self.width + x
    }
}

/// Order in which a sweep visits cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Traversal {
    /// Column by column: `x` outer, `y` inner.
    #[default]
    ColumnMajor,
    /// Row by row: `y` outer, `x` inner.
    RowMajor,
}

impl Traversal {
    /// Returns every coordinate of a `width × height` grid in this order.
    pub fn coords(self, width: usize, height: usize) -> impl Iterator<Item = (usize, usize)> {
        let (outer, inner) = match self {
            Traversal::ColumnMajor => (width, height),
            Traversal::RowMajor => (height, width),
        };
        (0..outer).flat_map(move |o| {
            (0..inner).map(move |i| match self {
                Traversal::ColumnMajor => (o, i),
                Traversal::RowMajor => (i, o),
            })
        })
    }
}
