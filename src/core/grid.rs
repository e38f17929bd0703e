//! Grid positions and the derived occupancy index
//!
//! The index is not authoritative: it is rebuilt from the product collection
//! at every store mutation boundary and holds nothing that cannot be
//! re-derived from the collection alone.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

use crate::core::identity::ProductId;
use crate::core::product::{Placement, Product};

/// A cell coordinate on the grid, zero-based
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub row: u32,
    pub col: u32,
}

impl Position {
    pub fn new(row: u32, col: u32) -> Self {
        Self { row, col }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Fixed grid dimensions, read once at startup from configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridDims {
    pub rows: u32,
    pub cols: u32,
}

impl GridDims {
    pub fn new(rows: u32, cols: u32) -> Self {
        Self { rows, cols }
    }

    pub fn contains(&self, pos: Position) -> bool {
        pos.row < self.rows && pos.col < self.cols
    }

    pub fn cell_count(&self) -> usize {
        self.rows as usize * self.cols as usize
    }
}

impl fmt::Display for GridDims {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.rows, self.cols)
    }
}

/// Derived (row, col) -> product id mapping
///
/// Rebuilding silently skips products with no position or an out-of-bounds
/// one, and on a duplicate cell keeps the first writer (imported data may be
/// corrupt; the rebuild never fails).
#[derive(Debug, Clone)]
pub struct GridIndex {
    dims: GridDims,
    cells: HashMap<Position, ProductId>,
}

impl GridIndex {
    pub fn new(dims: GridDims) -> Self {
        Self {
            dims,
            cells: HashMap::new(),
        }
    }

    pub fn dims(&self) -> GridDims {
        self.dims
    }

    /// O(n) scan producing a fresh mapping from the collection
    pub fn rebuild(&mut self, products: &[Product]) {
        self.cells.clear();
        for product in products {
            if let Placement::Cell(pos) = product.placement {
                if !self.dims.contains(pos) {
                    continue;
                }
                // first writer wins; a second product on the same cell is a
                // corrupt record and must not displace the first
                self.cells
                    .entry(pos)
                    .or_insert_with(|| product.id.clone());
            }
        }
    }

    pub fn product_at(&self, pos: Position) -> Option<&ProductId> {
        self.cells.get(&pos)
    }

    pub fn is_free(&self, pos: Position) -> bool {
        !self.cells.contains_key(&pos)
    }

    pub fn occupied_count(&self) -> usize {
        self.cells.len()
    }
}
