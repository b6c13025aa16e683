//! Property tests for the viewer grid placement contract.
//!
//! The placement policy (first empty slot in row-major order, then grow
//! toward squareness with column growth winning ties) is a behavioral
//! contract; these laws pin it down over arbitrary shapes and fill states.

use cellscope_layout::{ViewerGrid, ViewerId};
use proptest::prelude::*;

/// Build a grid of the given shape with the first `occupied` slots filled
/// in row-major order with ids 0..occupied.
fn grid_with(rows: usize, cols: usize, occupied: usize) -> ViewerGrid {
    let mut grid = ViewerGrid::new(rows, cols);
    for raw in 0..occupied.min(rows * cols) {
        grid = grid.place_viewer(ViewerId::new(raw as u32));
    }
    grid
}

fn occupied_count(grid: &ViewerGrid) -> usize {
    grid.viewers().count()
}

proptest! {
    #[test]
    fn new_grid_has_the_requested_shape(rows in 1usize..8, cols in 1usize..8) {
        let grid = ViewerGrid::new(rows, cols);
        prop_assert_eq!(grid.rows(), rows);
        prop_assert_eq!(grid.cols(), cols);
        prop_assert_eq!(occupied_count(&grid), 0);
    }

    #[test]
    fn placing_into_a_gappy_grid_never_changes_shape(
        rows in 1usize..6,
        cols in 1usize..6,
        occupied in 0usize..35,
    ) {
        let capacity = rows * cols;
        prop_assume!(occupied < capacity);
        let grid = grid_with(rows, cols, occupied);
        let placed = grid.place_viewer(ViewerId::new(1000));
        prop_assert_eq!(placed.rows(), rows);
        prop_assert_eq!(placed.cols(), cols);
        prop_assert_eq!(occupied_count(&placed), occupied + 1);
    }

    #[test]
    fn placing_into_a_full_grid_grows_toward_squareness(
        rows in 1usize..6,
        cols in 1usize..6,
    ) {
        let grid = grid_with(rows, cols, rows * cols);
        let grown = grid.place_viewer(ViewerId::new(1000));
        if rows >= cols {
            prop_assert_eq!((grown.rows(), grown.cols()), (rows, cols + 1));
            prop_assert_eq!(grown.slot(0, cols), Some(ViewerId::new(1000)));
        } else {
            prop_assert_eq!((grown.rows(), grown.cols()), (rows + 1, cols));
            prop_assert_eq!(grown.slot(rows, 0), Some(ViewerId::new(1000)));
        }
    }

    #[test]
    fn placement_fills_the_first_empty_slot_in_row_major_order(
        rows in 1usize..5,
        cols in 1usize..5,
        occupied in 0usize..24,
    ) {
        let capacity = rows * cols;
        prop_assume!(occupied < capacity);
        let grid = grid_with(rows, cols, occupied);

        let expected_row = occupied / cols;
        let expected_col = occupied % cols;
        let placed = grid.place_viewer(ViewerId::new(1000));
        prop_assert_eq!(placed.slot(expected_row, expected_col), Some(ViewerId::new(1000)));
    }

    #[test]
    fn placement_never_overwrites_or_duplicates(
        rows in 1usize..5,
        cols in 1usize..5,
        extra in 1usize..12,
    ) {
        let mut grid = ViewerGrid::new(rows, cols);
        for raw in 0..(rows * cols + extra) {
            grid = grid.place_viewer(ViewerId::new(raw as u32));
        }
        prop_assert_eq!(occupied_count(&grid), rows * cols + extra);
        prop_assert!(grid.validate().is_ok());
    }

    #[test]
    fn append_preserves_placements_at_their_coordinates(
        rows in 1usize..5,
        cols in 1usize..5,
        occupied in 0usize..24,
    ) {
        let grid = grid_with(rows, cols, occupied.min(rows * cols));

        let wider = grid.append_col();
        let taller = grid.append_row();
        prop_assert_eq!((wider.rows(), wider.cols()), (rows, cols + 1));
        prop_assert_eq!((taller.rows(), taller.cols()), (rows + 1, cols));
        for (row, col, viewer) in grid.viewers() {
            prop_assert_eq!(wider.slot(row, col), Some(viewer));
            prop_assert_eq!(taller.slot(row, col), Some(viewer));
        }
    }

    #[test]
    fn removal_guards_the_last_row_and_column(index in 0usize..4) {
        let row_grid = ViewerGrid::new(1, 3);
        prop_assert_eq!(row_grid.remove_row(index), row_grid.clone());

        let col_grid = ViewerGrid::new(3, 1);
        prop_assert_eq!(col_grid.remove_col(index), col_grid.clone());
    }

    #[test]
    fn removal_shrinks_exactly_one_dimension(
        rows in 2usize..6,
        cols in 2usize..6,
        occupied in 0usize..36,
    ) {
        let grid = grid_with(rows, cols, occupied.min(rows * cols));
        let shrunk = grid.remove_row(rows - 1);
        prop_assert_eq!((shrunk.rows(), shrunk.cols()), (rows - 1, cols));
        prop_assert!(shrunk.validate().is_ok());

        let shrunk = grid.remove_col(0);
        prop_assert_eq!((shrunk.rows(), shrunk.cols()), (rows, cols - 1));
        prop_assert!(shrunk.validate().is_ok());
    }

    #[test]
    fn identical_operation_sequences_hash_identically(
        rows in 1usize..5,
        cols in 1usize..5,
        placements in 0usize..20,
    ) {
        let a = grid_with(rows, cols, placements);
        let b = grid_with(rows, cols, placements);
        prop_assert_eq!(a.state_hash(), b.state_hash());
        prop_assert_eq!(a, b);
    }
}
