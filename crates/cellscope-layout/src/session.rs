#![forbid(unsafe_code)]

//! Persisted session schema with versioning and migration scaffolding.
//!
//! A [`SessionSnapshot`] is the bundle a UI state container holds between
//! commands: the viewer grid, the comparison split tree, the id counter, and
//! which viewer is active. Snapshots carry their schema version; loaders
//! reject unknown versions with actionable diagnostics.
//!
//! # Schema Versioning Policy
//!
//! - Breaking field or semantic changes must bump
//!   [`SESSION_SCHEMA_VERSION`] and add a migration path.
//! - All snapshots carry their schema version.

use std::collections::hash_map::DefaultHasher;
use std::fmt;
use std::hash::{Hash, Hasher};

use cellscope_core::{ViewerId, ViewerIdError, ViewerIds, debug};
use serde::{Deserialize, Serialize};

use crate::grid::{GridError, ViewerGrid};
use crate::tree::{Layout, TreeError};

/// Current session schema version.
pub const SESSION_SCHEMA_VERSION: u16 = 1;

/// Persisted session state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    /// Schema version for migration detection.
    #[serde(default = "default_session_version")]
    pub schema_version: u16,
    /// The viewer grid.
    pub grid: ViewerGrid,
    /// The comparison split tree.
    pub layout: Layout,
    /// Monotonic viewer-id counter; ids below it are spent.
    #[serde(default)]
    pub viewer_ids: ViewerIds,
    /// Which viewer had focus when the session was persisted.
    #[serde(default)]
    pub active_viewer: Option<ViewerId>,
    /// Session metadata (name, save generation, host version).
    pub metadata: SessionMetadata,
}

fn default_session_version() -> u16 {
    SESSION_SCHEMA_VERSION
}

impl SessionSnapshot {
    /// A fresh session: 1x1 empty grid, single-leaf layout, counter at zero.
    #[must_use]
    pub fn new(metadata: SessionMetadata) -> Self {
        Self {
            schema_version: SESSION_SCHEMA_VERSION,
            grid: ViewerGrid::new(1, 1),
            layout: Layout::new(),
            viewer_ids: ViewerIds::new(),
            active_viewer: None,
            metadata,
        }
    }

    /// Create a snapshot with a focused viewer.
    #[must_use]
    pub fn with_active_viewer(mut self, viewer: ViewerId) -> Self {
        self.active_viewer = Some(viewer);
        self
    }

    /// Allocate the next viewer id and place it in the grid.
    ///
    /// The one fallible operation in the model, inherited from the id
    /// counter; everything else stays total.
    pub fn add_viewer(&self) -> Result<(Self, ViewerId), ViewerIdError> {
        let (viewer, viewer_ids) = self.viewer_ids.allocate()?;
        let next = Self {
            grid: self.grid.place_viewer(viewer),
            viewer_ids,
            ..self.clone()
        };
        debug!(viewer = viewer.get(), "added viewer to session");
        Ok((next, viewer))
    }

    /// Validate the snapshot against schema and structural invariants.
    pub fn validate(&self) -> Result<(), SessionError> {
        if self.schema_version != SESSION_SCHEMA_VERSION {
            return Err(SessionError::UnsupportedVersion {
                found: self.schema_version,
                expected: SESSION_SCHEMA_VERSION,
            });
        }

        self.grid.validate()?;
        self.layout.validate()?;

        if let Some(active) = self.active_viewer {
            let placed = self.grid.viewers().any(|(_, _, viewer)| viewer == active);
            if !placed {
                return Err(SessionError::ActiveViewerNotPlaced { viewer: active });
            }
        }

        let next = self.viewer_ids.peek();
        for (_, _, viewer) in self.grid.viewers() {
            if viewer >= next {
                return Err(SessionError::CounterBehindPlacedViewer { next, viewer });
            }
        }

        if self.metadata.name.is_empty() {
            return Err(SessionError::EmptySessionName);
        }

        Ok(())
    }

    /// Deterministic hash for state diagnostics.
    #[must_use]
    pub fn state_hash(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.schema_version.hash(&mut hasher);
        self.grid.state_hash().hash(&mut hasher);
        self.layout.state_hash().hash(&mut hasher);
        self.viewer_ids.peek().get().hash(&mut hasher);
        self.active_viewer.map(ViewerId::get).hash(&mut hasher);
        self.metadata.name.hash(&mut hasher);
        self.metadata.saved_generation.hash(&mut hasher);
        hasher.finish()
    }
}

/// Session metadata for provenance and diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionMetadata {
    /// Human-readable session name.
    pub name: String,
    /// Last-saved generation counter.
    #[serde(default)]
    pub saved_generation: u64,
    /// Application version that created/saved this session.
    #[serde(default)]
    pub app_version: String,
}

impl SessionMetadata {
    /// Create metadata with a session name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            saved_generation: 0,
            app_version: String::new(),
        }
    }

    /// Set the application version.
    #[must_use]
    pub fn with_app_version(mut self, version: impl Into<String>) -> Self {
        self.app_version = version.into();
        self
    }

    /// Increment the save generation counter.
    pub fn increment_generation(&mut self) {
        self.saved_generation = self.saved_generation.saturating_add(1);
    }
}

/// Errors from session validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// Schema version is not supported.
    UnsupportedVersion { found: u16, expected: u16 },
    /// Grid invariant violation.
    Grid(GridError),
    /// Split-tree invariant violation.
    Tree(TreeError),
    /// The active viewer is not placed anywhere in the grid.
    ActiveViewerNotPlaced { viewer: ViewerId },
    /// The id counter would re-issue an id that is already placed.
    CounterBehindPlacedViewer { next: ViewerId, viewer: ViewerId },
    /// Session name is empty.
    EmptySessionName,
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnsupportedVersion { found, expected } => {
                write!(
                    f,
                    "unsupported session schema version {found} (expected {expected})"
                )
            }
            Self::Grid(e) => write!(f, "grid error: {e}"),
            Self::Tree(e) => write!(f, "layout error: {e}"),
            Self::ActiveViewerNotPlaced { viewer } => {
                write!(f, "active {viewer} is not placed in the grid")
            }
            Self::CounterBehindPlacedViewer { next, viewer } => {
                write!(f, "id counter at {next} would re-issue placed {viewer}")
            }
            Self::EmptySessionName => write!(f, "session name must not be empty"),
        }
    }
}

impl std::error::Error for SessionError {}

impl From<GridError> for SessionError {
    fn from(err: GridError) -> Self {
        Self::Grid(err)
    }
}

impl From<TreeError> for SessionError {
    fn from(err: TreeError) -> Self {
        Self::Tree(err)
    }
}

// =========================================================================
// Migration scaffolding
// =========================================================================

/// Result of migrating a session from an older schema version.
#[derive(Debug, Clone)]
pub struct MigrationResult {
    /// The migrated snapshot.
    pub snapshot: SessionSnapshot,
    /// Source version before migration.
    pub from_version: u16,
    /// Target version after migration.
    pub to_version: u16,
}

/// Errors from session migration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionMigrationError {
    /// Version is newer than this build understands.
    UnsupportedVersion { version: u16 },
    /// Migration from the given version is not implemented.
    NoMigrationPath { from: u16, to: u16 },
}

impl fmt::Display for SessionMigrationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnsupportedVersion { version } => {
                write!(f, "unsupported schema version {version} for migration")
            }
            Self::NoMigrationPath { from, to } => {
                write!(f, "no migration path from v{from} to v{to}")
            }
        }
    }
}

impl std::error::Error for SessionMigrationError {}

/// Migrate a session snapshot to the current schema version.
///
/// For v1 (current) this is an identity migration. Future versions chain
/// through each intermediate version.
pub fn migrate_session(
    snapshot: SessionSnapshot,
) -> Result<MigrationResult, SessionMigrationError> {
    match snapshot.schema_version {
        SESSION_SCHEMA_VERSION => Ok(MigrationResult {
            from_version: SESSION_SCHEMA_VERSION,
            to_version: SESSION_SCHEMA_VERSION,
            snapshot,
        }),
        v if v > SESSION_SCHEMA_VERSION => {
            Err(SessionMigrationError::UnsupportedVersion { version: v })
        }
        v => Err(SessionMigrationError::NoMigrationPath {
            from: v,
            to: SESSION_SCHEMA_VERSION,
        }),
    }
}

/// Check whether a snapshot requires migration.
#[must_use]
pub fn needs_migration(snapshot: &SessionSnapshot) -> bool {
    snapshot.schema_version != SESSION_SCHEMA_VERSION
}
