#![forbid(unsafe_code)]

//! Core: viewer identity, view payloads, and geometry.
//!
//! # Role in cellscope
//! `cellscope-core` is the vocabulary layer. It owns the types the layout
//! structures agree on (viewer handles, dataset view payloads, and the
//! pixel rectangles the region solvers emit) plus the logging shim.
//!
//! # Primary responsibilities
//! - **ViewerId / ViewerIds**: monotonic viewer handles, modeled as explicit
//!   values rather than ambient counters.
//! - **View**: what a leaf pane displays (empty, or a dataset scatter view).
//! - **Rect**: pixel-space regions for proportional layout output.
//!
//! # How it fits in the system
//! The layout crate (`cellscope-layout`) builds its grid and split-tree
//! snapshots out of these types; UI state containers hold the snapshots and
//! re-render from them.

pub mod geometry;
pub mod logging;
pub mod view;
pub mod viewer;

pub use geometry::Rect;
pub use view::View;
pub use viewer::{ViewerId, ViewerIdError, ViewerIds};

// Re-export tracing macros at crate root for ergonomic use.
#[cfg(feature = "tracing")]
pub use logging::{debug, error, info, trace, warn};
