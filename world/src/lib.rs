#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative grid state for Wumpus Hunt.
//!
//! The [`Grid`] owns the dense cell array every system reads; it is created
//! by the generation system, mutated only by the replay driver and by
//! challenge updates, and cloned when a caller needs an independent what-if
//! snapshot. The [`TeleportMap`] records which teleport cells form pairs and
//! is built once per generation alongside the grid.

use std::collections::BTreeMap;

use wumpus_hunt_core::{CellCoord, CellKind, GridError};

/// Dense square grid of cell kinds stored in row-major order.
///
/// Cloning is cheap enough for what-if queries; no locking discipline is
/// defined for shared mutation, so concurrent callers must operate on their
/// own copies.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    size: u32,
    cells: Vec<CellKind>,
}

impl Grid {
    /// Creates a `size` by `size` grid with every cell empty.
    #[must_use]
    pub fn new(size: u32) -> Self {
        let capacity_u64 = u64::from(size) * u64::from(size);
        let capacity = usize::try_from(capacity_u64).unwrap_or(0);
        Self {
            size,
            cells: vec![CellKind::Empty; capacity],
        }
    }

    /// Side length of the grid in cells.
    #[must_use]
    pub const fn size(&self) -> u32 {
        self.size
    }

    /// Reports whether the coordinate lies inside the grid.
    #[must_use]
    pub const fn contains(&self, cell: CellCoord) -> bool {
        cell.row() < self.size && cell.column() < self.size
    }

    /// Retrieves the kind stored at the provided cell.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::OutOfBounds`] when the coordinate lies outside
    /// the grid.
    pub fn get(&self, cell: CellCoord) -> Result<CellKind, GridError> {
        self.index(cell)
            .and_then(|index| self.cells.get(index).copied())
            .ok_or(GridError::OutOfBounds {
                cell,
                size: self.size,
            })
    }

    /// Stores the provided kind at the cell.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::OutOfBounds`] when the coordinate lies outside
    /// the grid.
    pub fn set(&mut self, cell: CellCoord, kind: CellKind) -> Result<(), GridError> {
        let slot = self
            .index(cell)
            .and_then(|index| self.cells.get_mut(index))
            .ok_or(GridError::OutOfBounds {
                cell,
                size: self.size,
            })?;
        *slot = kind;
        Ok(())
    }

    /// Locates the first cell holding the provided kind in row-major order.
    #[must_use]
    pub fn find(&self, kind: CellKind) -> Option<CellCoord> {
        self.cells
            .iter()
            .position(|candidate| *candidate == kind)
            .map(|index| self.coord_at(index))
    }

    /// Counts the cells holding the provided kind.
    #[must_use]
    pub fn count(&self, kind: CellKind) -> usize {
        self.cells
            .iter()
            .filter(|candidate| **candidate == kind)
            .count()
    }

    /// Dense cell contents in row-major order.
    #[must_use]
    pub fn cells(&self) -> &[CellKind] {
        &self.cells
    }

    /// In-bounds cardinal neighbours of the cell.
    ///
    /// The iteration order is fixed as up, down, left, right. Pathfinder
    /// tie-breaking depends on this order, so it is part of the contract.
    #[must_use]
    pub fn neighbors(&self, cell: CellCoord) -> NeighborIter {
        let mut neighbors = NeighborIter::default();

        if let Some(row) = cell.row().checked_sub(1) {
            neighbors.push(CellCoord::new(row, cell.column()));
        }
        if cell.row() + 1 < self.size {
            neighbors.push(CellCoord::new(cell.row() + 1, cell.column()));
        }
        if let Some(column) = cell.column().checked_sub(1) {
            neighbors.push(CellCoord::new(cell.row(), column));
        }
        if cell.column() + 1 < self.size {
            neighbors.push(CellCoord::new(cell.row(), cell.column() + 1));
        }

        neighbors
    }

    /// Flattened index of the cell, if it lies inside the grid.
    #[must_use]
    pub fn index(&self, cell: CellCoord) -> Option<usize> {
        if self.contains(cell) {
            let row = usize::try_from(cell.row()).ok()?;
            let column = usize::try_from(cell.column()).ok()?;
            let width = usize::try_from(self.size).ok()?;
            Some(row * width + column)
        } else {
            None
        }
    }

    fn coord_at(&self, index: usize) -> CellCoord {
        let width = usize::try_from(self.size).unwrap_or(1).max(1);
        let row = u32::try_from(index / width).unwrap_or(0);
        let column = u32::try_from(index % width).unwrap_or(0);
        CellCoord::new(row, column)
    }
}

/// Fixed-capacity iterator over the cardinal neighbours of a cell.
#[derive(Clone, Debug, Default)]
pub struct NeighborIter {
    buffer: [Option<CellCoord>; 4],
    len: usize,
    cursor: usize,
}

impl NeighborIter {
    fn push(&mut self, cell: CellCoord) {
        if self.len < self.buffer.len() {
            self.buffer[self.len] = Some(cell);
            self.len += 1;
        }
    }
}

impl Iterator for NeighborIter {
    type Item = CellCoord;

    fn next(&mut self) -> Option<Self::Item> {
        if self.cursor >= self.len {
            return None;
        }

        let value = self.buffer[self.cursor];
        self.cursor += 1;
        value
    }
}

/// Symmetric, injective pairing between teleport cells.
///
/// If `a` maps to `b` then `b` maps back to `a`, a cell never maps to
/// itself, and every key refers to a `Teleport` cell in the grid the map was
/// generated with. A teleport cell absent from the map is a dead teleport:
/// stepping onto it has no effect. Backed by an ordered map so iteration is
/// deterministic.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TeleportMap {
    partners: BTreeMap<CellCoord, CellCoord>,
}

impl TeleportMap {
    /// Creates an empty pairing table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Links two cells as a bidirectional pair.
    ///
    /// Self-links and cells that already belong to a pair are rejected to
    /// preserve the injectivity invariant. Returns whether the link was
    /// recorded.
    pub fn link(&mut self, first: CellCoord, second: CellCoord) -> bool {
        if first == second
            || self.partners.contains_key(&first)
            || self.partners.contains_key(&second)
        {
            return false;
        }

        let _ = self.partners.insert(first, second);
        let _ = self.partners.insert(second, first);
        true
    }

    /// Destination paired with the provided cell, if any.
    #[must_use]
    pub fn partner(&self, cell: CellCoord) -> Option<CellCoord> {
        self.partners.get(&cell).copied()
    }

    /// Reports whether no pairs exist.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.partners.is_empty()
    }

    /// Number of linked pairs.
    #[must_use]
    pub fn pair_count(&self) -> usize {
        self.partners.len() / 2
    }

    /// Iterates each pair exactly once, smaller endpoint first.
    pub fn pairs(&self) -> impl Iterator<Item = (CellCoord, CellCoord)> + '_ {
        self.partners
            .iter()
            .filter(|(cell, partner)| cell < partner)
            .map(|(cell, partner)| (*cell, *partner))
    }
}
