#![forbid(unsafe_code)]

//! Layout structures for the cellscope viewer.
//!
//! # Role in cellscope
//! Two independent pure data structures drive the viewer's screen layout:
//!
//! - [`ViewerGrid`]: an auto-growing 2-D grid of viewer slots with
//!   deterministic first-fit placement and a grow-toward-squareness policy.
//! - [`Layout`]: a recursively-splittable workspace stored as a flat
//!   heap-indexed binary tree, for side-by-side dataset comparison.
//!
//! Every operation takes an immutable snapshot and returns a new one; the
//! UI state container holds the current value and serializes updates. The
//! region solvers in [`solve`] map either structure plus a pixel area onto
//! screen regions, and [`session`] wraps both in a versioned, serializable
//! session snapshot.

pub mod grid;
pub mod session;
pub mod solve;
pub mod tree;

pub use cellscope_core::{Rect, View, ViewerId, ViewerIdError, ViewerIds};
pub use grid::{GridError, ViewerGrid};
pub use session::{
    MigrationResult, SESSION_SCHEMA_VERSION, SessionError, SessionMetadata,
    SessionMigrationError, SessionSnapshot, migrate_session, needs_migration,
};
pub use solve::{GridRegion, LayoutRegions, grid_regions, solve_regions};
pub use tree::{Container, Layout, SplitAxis, TreeError};
