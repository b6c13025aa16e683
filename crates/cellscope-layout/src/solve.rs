#![forbid(unsafe_code)]

//! Pure region solvers.
//!
//! Maps the two layout structures plus a pixel area onto screen regions for
//! the renderer. Splits halve the area with integer arithmetic, remainder
//! pixels going to the second child; grid cells partition the area evenly,
//! remainder pixels going to the last row and column. Rendering itself
//! stays external.

use cellscope_core::{Rect, ViewerId};

use crate::grid::ViewerGrid;
use crate::tree::{Container, Layout, SplitAxis};

/// Solved leaf regions for a [`Layout`], in ascending node-index order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutRegions {
    regions: Vec<(usize, Rect)>,
}

impl LayoutRegions {
    /// The region of the leaf at `index`, if it is a solved leaf.
    #[must_use]
    pub fn rect(&self, index: usize) -> Option<Rect> {
        self.regions
            .binary_search_by_key(&index, |(i, _)| *i)
            .ok()
            .map(|pos| self.regions[pos].1)
    }

    /// Iterate `(leaf index, region)` pairs in ascending index order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, Rect)> + '_ {
        self.regions.iter().copied()
    }

    /// Number of solved leaves.
    #[must_use]
    pub fn len(&self) -> usize {
        self.regions.len()
    }

    /// True when the layout solved to no leaves.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }
}

/// Solve the split tree over a pixel area.
///
/// Each split halves its area along the axis recovered from the children's
/// fractional units; the second child absorbs the odd pixel. Leaf order
/// matches [`Layout::leaves`].
#[must_use]
pub fn solve_regions(layout: &Layout, area: Rect) -> LayoutRegions {
    let mut regions = Vec::with_capacity(layout.leaf_count());
    solve_node(layout, 0, area, &mut regions);
    regions.sort_unstable_by_key(|(index, _)| *index);
    LayoutRegions { regions }
}

fn solve_node(layout: &Layout, index: usize, area: Rect, out: &mut Vec<(usize, Rect)>) {
    match layout.node(index) {
        None => {}
        Some(Container::View { .. }) => out.push((index, area)),
        Some(Container::Split { .. }) => {
            let axis = layout
                .split_axis(index)
                .unwrap_or(SplitAxis::Vertical);
            let (first, second) = match axis {
                SplitAxis::Vertical => {
                    let left = area.width / 2;
                    (
                        Rect::new(area.x, area.y, left, area.height),
                        Rect::new(
                            area.x.saturating_add(left),
                            area.y,
                            area.width - left,
                            area.height,
                        ),
                    )
                }
                SplitAxis::Horizontal => {
                    let top = area.height / 2;
                    (
                        Rect::new(area.x, area.y, area.width, top),
                        Rect::new(
                            area.x,
                            area.y.saturating_add(top),
                            area.width,
                            area.height - top,
                        ),
                    )
                }
            };
            solve_node(layout, 2 * index + 1, first, out);
            solve_node(layout, 2 * index + 2, second, out);
        }
    }
}

/// One grid cell mapped to a screen region.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridRegion {
    pub row: usize,
    pub col: usize,
    /// The occupying viewer, `None` for an empty slot.
    pub viewer: Option<ViewerId>,
    pub rect: Rect,
}

/// Partition a pixel area evenly into the grid's cells, row-major.
///
/// Every cell gets `area / dimension` pixels along each axis; the last row
/// and column absorb the remainder so the cells tile the area exactly.
#[must_use]
pub fn grid_regions(grid: &ViewerGrid, area: Rect) -> Vec<GridRegion> {
    let rows = grid.rows();
    let cols = grid.cols();
    if rows == 0 || cols == 0 {
        return Vec::new();
    }

    let cell_width = area.width / cols as u16;
    let cell_height = area.height / rows as u16;

    let mut regions = Vec::with_capacity(rows * cols);
    for row in 0..rows {
        let y = area.y.saturating_add(cell_height * row as u16);
        let height = if row == rows - 1 {
            area.height - cell_height * (rows as u16 - 1)
        } else {
            cell_height
        };
        for col in 0..cols {
            let x = area.x.saturating_add(cell_width * col as u16);
            let width = if col == cols - 1 {
                area.width - cell_width * (cols as u16 - 1)
            } else {
                cell_width
            };
            regions.push(GridRegion {
                row,
                col,
                viewer: grid.slot(row, col),
                rect: Rect::new(x, y, width, height),
            });
        }
    }
    regions
}
