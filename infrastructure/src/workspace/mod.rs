//! Workspace adapters — path resolution against the boundary.

mod guard;

pub use guard::PathGuard;
