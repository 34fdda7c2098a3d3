//! Workspace boundary — the containment rule every tool effect obeys.
//!
//! The boundary is a single canonical absolute directory, fixed when the
//! registry is built. Containment is path-segment comparison, never naive
//! string-prefix comparison: `/workspace-evil` is not inside `/workspace`.
//! Symlink and `..` resolution happens in the infrastructure path guard;
//! this type only encodes the pure rule.

use std::path::{Path, PathBuf};

/// The single absolute root directory outside which no tool may read,
/// write, or execute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkspaceBoundary {
    root: PathBuf,
}

impl WorkspaceBoundary {
    /// Build a boundary from an already-canonical absolute path.
    ///
    /// Callers canonicalize (the infrastructure guard does this once at
    /// registry construction); the domain type assumes the invariant.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Segment-wise containment check: the candidate is the root itself or
    /// a descendant of it. The candidate must already be canonical.
    pub fn contains(&self, candidate: &Path) -> bool {
        candidate.starts_with(&self.root)
    }
}

impl std::fmt::Display for WorkspaceBoundary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.root.display())
    }
}
