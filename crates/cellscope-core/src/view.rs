#![forbid(unsafe_code)]

//! View payloads carried by leaf panes.

use serde::{Deserialize, Serialize};

/// What a leaf pane is currently displaying.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum View {
    /// Pane not yet bound to a dataset.
    #[default]
    Empty,
    /// A dataset-bound 2-D embedding view.
    Scatter {
        /// Owning project identifier.
        project: String,
        /// Dataset index within the project.
        dataset: u32,
    },
}

impl View {
    /// Build a dataset-bound scatter view.
    #[must_use]
    pub fn scatter(project: impl Into<String>, dataset: u32) -> Self {
        Self::Scatter {
            project: project.into(),
            dataset,
        }
    }

    /// True when the pane has no dataset bound.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }
}
