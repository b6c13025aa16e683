#![forbid(unsafe_code)]

//! Viewer grid allocation.
//!
//! A [`ViewerGrid`] is a rectangular arrangement of viewer slots that grows
//! on demand. Placement is deterministic and is a behavioral contract:
//!
//! 1. Fill the first empty slot in row-major order.
//! 2. Only when the grid is fully occupied, grow toward squareness:
//!    `rows >= cols` grows a column, otherwise a row.
//!
//! Every operation takes the grid by reference and returns a new value; the
//! state container owning the current snapshot serializes updates.

use std::fmt;

use cellscope_core::{ViewerId, trace};
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

/// A rectangular arrangement of optional viewer slots.
///
/// Invariants: `rows >= 1`, `cols >= 1`, `cells` is exactly `rows x cols`,
/// and a placed [`ViewerId`] appears at most once. The operations preserve
/// these; [`ViewerGrid::validate`] checks them on deserialized input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewerGrid {
    cells: Vec<Vec<Option<ViewerId>>>,
    rows: usize,
    cols: usize,
}

impl ViewerGrid {
    /// Create an all-empty grid of the given shape.
    ///
    /// Zero rows or columns is undefined behavior: asserted in debug builds,
    /// unchecked in release. Callers must never construct such a grid.
    #[must_use]
    pub fn new(rows: usize, cols: usize) -> Self {
        debug_assert!(rows >= 1 && cols >= 1, "grid shape must be at least 1x1");
        Self {
            cells: vec![vec![None; cols]; rows],
            rows,
            cols,
        }
    }

    /// Number of rows.
    #[must_use]
    pub const fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns.
    #[must_use]
    pub const fn cols(&self) -> usize {
        self.cols
    }

    /// The viewer occupying a slot, if any. Out-of-range coordinates read as
    /// empty.
    #[must_use]
    pub fn slot(&self, row: usize, col: usize) -> Option<ViewerId> {
        self.cells.get(row).and_then(|r| r.get(col)).copied().flatten()
    }

    /// Iterate occupied slots in row-major order as `(row, col, viewer)`.
    pub fn viewers(&self) -> impl Iterator<Item = (usize, usize, ViewerId)> + '_ {
        self.cells.iter().enumerate().flat_map(|(row, cells)| {
            cells
                .iter()
                .enumerate()
                .filter_map(move |(col, slot)| slot.map(|viewer| (row, col, viewer)))
        })
    }

    /// True when no slot is empty.
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.first_empty_slot().is_none()
    }

    /// Return a grid with one more column; every row gains an empty slot at
    /// the end.
    #[must_use]
    pub fn append_col(&self) -> Self {
        let mut next = self.clone();
        for row in &mut next.cells {
            row.push(None);
        }
        next.cols += 1;
        next
    }

    /// Return a grid with one more all-empty row at the bottom.
    #[must_use]
    pub fn append_row(&self) -> Self {
        let mut next = self.clone();
        next.cells.push(vec![None; next.cols]);
        next.rows += 1;
        next
    }

    /// Place `viewer` deterministically.
    ///
    /// Fills the first empty slot in row-major order; a fully occupied grid
    /// grows toward squareness first (`rows >= cols` grows a column, placing
    /// at its first row; otherwise a row, placing at its first column).
    #[must_use]
    pub fn place_viewer(&self, viewer: ViewerId) -> Self {
        if let Some((row, col)) = self.first_empty_slot() {
            let mut next = self.clone();
            next.cells[row][col] = Some(viewer);
            trace!(viewer = viewer.get(), row, col, "placed viewer in empty slot");
            return next;
        }

        if self.rows >= self.cols {
            let mut next = self.append_col();
            next.cells[0][next.cols - 1] = Some(viewer);
            trace!(viewer = viewer.get(), cols = next.cols, "grid full, grew a column");
            next
        } else {
            let mut next = self.append_row();
            next.cells[next.rows - 1][0] = Some(viewer);
            trace!(viewer = viewer.get(), rows = next.rows, "grid full, grew a row");
            next
        }
    }

    /// Remove the row at `index`.
    ///
    /// No-op when the grid has a single row or `index` is out of range; the
    /// grid never degenerates below 1x1.
    #[must_use]
    pub fn remove_row(&self, index: usize) -> Self {
        if self.rows <= 1 || index >= self.rows {
            return self.clone();
        }
        let mut next = self.clone();
        let _ = next.cells.remove(index);
        next.rows -= 1;
        next
    }

    /// Remove the column at `index`. Symmetric to [`ViewerGrid::remove_row`].
    #[must_use]
    pub fn remove_col(&self, index: usize) -> Self {
        if self.cols <= 1 || index >= self.cols {
            return self.clone();
        }
        let mut next = self.clone();
        for row in &mut next.cells {
            let _ = row.remove(index);
        }
        next.cols -= 1;
        next
    }

    /// Check shape and uniqueness invariants.
    ///
    /// Operations preserve these by construction; this is for deserialized
    /// or hand-assembled grids.
    pub fn validate(&self) -> Result<(), GridError> {
        if self.rows == 0 || self.cols == 0 {
            return Err(GridError::EmptyDimension {
                rows: self.rows,
                cols: self.cols,
            });
        }
        if self.cells.len() != self.rows {
            return Err(GridError::RowCountMismatch {
                declared: self.rows,
                found: self.cells.len(),
            });
        }
        for (row, cells) in self.cells.iter().enumerate() {
            if cells.len() != self.cols {
                return Err(GridError::RaggedRow {
                    row,
                    declared: self.cols,
                    found: cells.len(),
                });
            }
        }
        let mut seen = FxHashSet::default();
        for (_, _, viewer) in self.viewers() {
            if !seen.insert(viewer) {
                return Err(GridError::DuplicateViewer { viewer });
            }
        }
        Ok(())
    }

    /// Deterministic structural hash of the grid state.
    ///
    /// Intended for operation logs and replay diagnostics.
    #[must_use]
    pub fn state_hash(&self) -> u64 {
        const OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
        const PRIME: u64 = 0x0000_0001_0000_01b3;

        fn mix(hash: &mut u64, byte: u8) {
            *hash ^= u64::from(byte);
            *hash = hash.wrapping_mul(PRIME);
        }

        fn mix_u64(hash: &mut u64, value: u64) {
            for byte in value.to_le_bytes() {
                mix(hash, byte);
            }
        }

        let mut hash = OFFSET_BASIS;
        mix_u64(&mut hash, self.rows as u64);
        mix_u64(&mut hash, self.cols as u64);
        for row in &self.cells {
            for slot in row {
                match slot {
                    Some(viewer) => {
                        mix(&mut hash, 1);
                        mix_u64(&mut hash, u64::from(viewer.get()));
                    }
                    None => mix(&mut hash, 0),
                }
            }
        }
        hash
    }

    fn first_empty_slot(&self) -> Option<(usize, usize)> {
        for (row, cells) in self.cells.iter().enumerate() {
            if let Some(col) = cells.iter().position(Option::is_none) {
                return Some((row, col));
            }
        }
        None
    }
}

/// Errors from grid invariant checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridError {
    /// A dimension is zero.
    EmptyDimension { rows: usize, cols: usize },
    /// The declared row count does not match the cell storage.
    RowCountMismatch { declared: usize, found: usize },
    /// A row's length does not match the declared column count.
    RaggedRow {
        row: usize,
        declared: usize,
        found: usize,
    },
    /// A viewer id occupies more than one slot.
    DuplicateViewer { viewer: ViewerId },
}

impl fmt::Display for GridError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyDimension { rows, cols } => {
                write!(f, "grid shape {rows}x{cols} has an empty dimension")
            }
            Self::RowCountMismatch { declared, found } => {
                write!(f, "grid declares {declared} rows but stores {found}")
            }
            Self::RaggedRow {
                row,
                declared,
                found,
            } => {
                write!(f, "row {row} has {found} slots, expected {declared}")
            }
            Self::DuplicateViewer { viewer } => {
                write!(f, "{viewer} occupies more than one slot")
            }
        }
    }
}

impl std::error::Error for GridError {}
