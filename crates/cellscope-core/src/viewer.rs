#![forbid(unsafe_code)]

//! Viewer identity.
//!
//! Viewer panes are addressed by an integer handle unique within a session.
//! The original design kept a global "last assigned id" counter next to the
//! layout state; here that counter is an explicit value ([`ViewerIds`]) the
//! state container owns and threads through its own updates.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Stable identifier for one viewer pane.
///
/// Ids start at 0 and are assigned monotonically; they are never reused
/// within a session.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct ViewerId(u32);

impl ViewerId {
    /// First id handed out in a fresh session.
    pub const FIRST: Self = Self(0);

    /// Create an id from its raw value.
    #[must_use]
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    /// Get the raw numeric value.
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }

    /// Return the next id, or an error on overflow.
    pub fn checked_next(self) -> Result<Self, ViewerIdError> {
        let Some(next) = self.0.checked_add(1) else {
            return Err(ViewerIdError::Exhausted { current: self });
        };
        Ok(Self(next))
    }
}

impl fmt::Display for ViewerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "viewer#{}", self.0)
    }
}

/// Monotonic viewer-id counter.
///
/// A pure allocator: [`ViewerIds::allocate`] returns the handed-out id
/// together with the advanced counter, so state containers can keep both in
/// one immutable snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ViewerIds {
    next: ViewerId,
}

impl ViewerIds {
    /// Counter for a fresh session; the first allocation yields
    /// [`ViewerId::FIRST`].
    #[must_use]
    pub const fn new() -> Self {
        Self {
            next: ViewerId::FIRST,
        }
    }

    /// The id the next allocation will yield.
    #[must_use]
    pub const fn peek(self) -> ViewerId {
        self.next
    }

    /// Hand out the next id and advance.
    pub fn allocate(self) -> Result<(ViewerId, Self), ViewerIdError> {
        let id = self.next;
        let next = id.checked_next()?;
        Ok((id, Self { next }))
    }
}

/// Errors from viewer-id bookkeeping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewerIdError {
    /// The id space is exhausted.
    Exhausted { current: ViewerId },
}

impl fmt::Display for ViewerIdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exhausted { current } => {
                write!(f, "viewer id space exhausted at {current}")
            }
        }
    }
}

impl std::error::Error for ViewerIdError {}
