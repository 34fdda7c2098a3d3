//! Path guard — resolves candidate paths against the workspace boundary.
//!
//! Every tool resolves every path-shaped argument through [`PathGuard`]
//! before any I/O. The guard:
//!
//! 1. rejects relative input (a relative path is a validation error, never
//!    silently joined to the workspace);
//! 2. folds `.`/`..` segments lexically;
//! 3. resolves symlinks by canonicalizing the deepest existing ancestor,
//!    so not-yet-existing write targets are still checked through any
//!    symlinked parent;
//! 4. checks segment-wise containment against the boundary.
//!
//! The guard performs read-only filesystem queries only.

use corral_domain::WorkspaceBoundary;
use corral_domain::tool::value_objects::ToolError;
use std::ffi::OsString;
use std::path::{Component, Path, PathBuf};
use tracing::trace;

/// Resolves and validates paths against one workspace boundary.
#[derive(Debug, Clone)]
pub struct PathGuard {
    boundary: WorkspaceBoundary,
}

impl PathGuard {
    /// Create a guard rooted at `root`.
    ///
    /// The root is canonicalized once here; it must exist and be a
    /// directory.
    pub fn new(root: impl AsRef<Path>) -> Result<Self, ToolError> {
        let root = root.as_ref();
        let canonical = std::fs::canonicalize(root)
            .map_err(|e| ToolError::from_io(&e, root.display().to_string()))?;
        if !canonical.is_dir() {
            return Err(ToolError::validation(format!(
                "Workspace root is not a directory: {}",
                root.display()
            )));
        }
        Ok(Self {
            boundary: WorkspaceBoundary::new(canonical),
        })
    }

    pub fn boundary(&self) -> &WorkspaceBoundary {
        &self.boundary
    }

    pub fn root(&self) -> &Path {
        self.boundary.root()
    }

    /// Resolve a candidate path and verify it lies inside the boundary.
    ///
    /// Returns the canonical absolute path on success. The target does not
    /// have to exist (write targets are resolved through their deepest
    /// existing ancestor).
    pub fn resolve(&self, candidate: &str) -> Result<PathBuf, ToolError> {
        let path = Path::new(candidate);
        if !path.is_absolute() {
            return Err(ToolError::validation(format!(
                "Path must be absolute: {}",
                candidate
            )));
        }

        let normalized = lexical_normalize(path);
        let resolved = resolve_existing_prefix(&normalized);

        if self.boundary.contains(&resolved) {
            Ok(resolved)
        } else {
            trace!(candidate, resolved = %resolved.display(), "Path rejected by boundary");
            Err(ToolError::outside_workspace(candidate))
        }
    }
}

/// Fold `.` and `..` components without touching the filesystem.
///
/// `..` at the root is a no-op, so `/../etc` normalizes to `/etc` and is
/// then rejected by containment rather than slipping through.
fn lexical_normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::Prefix(_) | Component::RootDir => out.push(component.as_os_str()),
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            Component::Normal(segment) => out.push(segment),
        }
    }
    out
}

/// Canonicalize the deepest existing ancestor of `path` (resolving
/// symlinks), then re-append the non-existing remainder.
///
/// For an existing path this is plain canonicalization. For a write target
/// that does not exist yet, any symlink in the existing parent chain is
/// still resolved, so a symlinked parent cannot smuggle the target outside
/// the boundary.
fn resolve_existing_prefix(path: &Path) -> PathBuf {
    let mut existing: &Path = path;
    let mut remainder: Vec<OsString> = Vec::new();

    loop {
        match std::fs::canonicalize(existing) {
            Ok(canonical) => {
                let mut out = canonical;
                for segment in remainder.iter().rev() {
                    out.push(segment);
                }
                return out;
            }
            Err(_) => match existing.parent() {
                Some(parent) => {
                    if let Some(name) = existing.file_name() {
                        remainder.push(name.to_os_string());
                    }
                    existing = parent;
                }
                // Nothing on the way to the filesystem root exists;
                // fall back to the lexical form.
                None => return path.to_path_buf(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use corral_domain::tool::value_objects::ErrorKind;
    use tempfile::tempdir;

    fn guard(root: &Path) -> PathGuard {
        PathGuard::new(root).unwrap()
    }

    #[test]
    fn test_relative_path_is_validation_error() {
        let dir = tempdir().unwrap();
        let guard = guard(dir.path());

        let err = guard.resolve("src/main.rs").unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
    }

    #[test]
    fn test_inside_paths_accepted() {
        let dir = tempdir().unwrap();
        std::fs::create_dir(dir.path().join("src")).unwrap();
        std::fs::write(dir.path().join("src/a.txt"), "x").unwrap();
        let guard = guard(dir.path());

        let resolved = guard
            .resolve(&dir.path().join("src/a.txt").display().to_string())
            .unwrap();
        assert!(resolved.ends_with("src/a.txt"));

        // The root itself is inside
        assert!(guard.resolve(&dir.path().display().to_string()).is_ok());
    }

    #[test]
    fn test_nonexistent_write_target_accepted() {
        let dir = tempdir().unwrap();
        let guard = guard(dir.path());

        let candidate = dir.path().join("new/deep/file.txt");
        let resolved = guard.resolve(&candidate.display().to_string()).unwrap();
        assert!(resolved.ends_with("new/deep/file.txt"));
    }

    #[test]
    fn test_dotdot_escape_rejected() {
        let dir = tempdir().unwrap();
        let guard = guard(dir.path());

        let candidate = format!("{}/../etc/passwd", dir.path().display());
        let err = guard.resolve(&candidate).unwrap_err();
        assert_eq!(err.kind, ErrorKind::PathOutsideWorkspace);
    }

    #[test]
    fn test_dotdot_within_boundary_accepted() {
        let dir = tempdir().unwrap();
        std::fs::create_dir(dir.path().join("src")).unwrap();
        std::fs::write(dir.path().join("a.txt"), "x").unwrap();
        let guard = guard(dir.path());

        let candidate = format!("{}/src/../a.txt", dir.path().display());
        let resolved = guard.resolve(&candidate).unwrap();
        assert!(resolved.ends_with("a.txt"));
    }

    #[test]
    fn test_root_escape_via_leading_dotdot() {
        let dir = tempdir().unwrap();
        let guard = guard(dir.path());

        let err = guard.resolve("/../etc/passwd").unwrap_err();
        assert_eq!(err.kind, ErrorKind::PathOutsideWorkspace);
    }

    #[cfg(unix)]
    #[test]
    fn test_symlink_escape_rejected() {
        let outside = tempdir().unwrap();
        std::fs::write(outside.path().join("secret.txt"), "secret").unwrap();

        let dir = tempdir().unwrap();
        std::os::unix::fs::symlink(outside.path(), dir.path().join("leak")).unwrap();
        let guard = guard(dir.path());

        let candidate = dir.path().join("leak/secret.txt");
        let err = guard.resolve(&candidate.display().to_string()).unwrap_err();
        assert_eq!(err.kind, ErrorKind::PathOutsideWorkspace);
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinked_parent_of_write_target_rejected() {
        let outside = tempdir().unwrap();

        let dir = tempdir().unwrap();
        std::os::unix::fs::symlink(outside.path(), dir.path().join("leak")).unwrap();
        let guard = guard(dir.path());

        // Target does not exist; its parent is a symlink out of the workspace
        let candidate = dir.path().join("leak/new.txt");
        let err = guard.resolve(&candidate.display().to_string()).unwrap_err();
        assert_eq!(err.kind, ErrorKind::PathOutsideWorkspace);
    }

    #[cfg(unix)]
    #[test]
    fn test_internal_symlink_accepted() {
        let dir = tempdir().unwrap();
        std::fs::create_dir(dir.path().join("real")).unwrap();
        std::fs::write(dir.path().join("real/f.txt"), "x").unwrap();
        std::os::unix::fs::symlink(dir.path().join("real"), dir.path().join("alias")).unwrap();
        let guard = guard(dir.path());

        let candidate = dir.path().join("alias/f.txt");
        let resolved = guard.resolve(&candidate.display().to_string()).unwrap();
        assert!(resolved.ends_with("real/f.txt"));
    }

    #[test]
    fn test_sibling_prefix_rejected() {
        // A sibling directory sharing a name prefix with the root must not
        // pass containment.
        let parent = tempdir().unwrap();
        let root = parent.path().join("proj");
        let evil = parent.path().join("proj-evil");
        std::fs::create_dir(&root).unwrap();
        std::fs::create_dir(&evil).unwrap();
        std::fs::write(evil.join("f.txt"), "x").unwrap();
        let guard = guard(&root);

        let err = guard
            .resolve(&evil.join("f.txt").display().to_string())
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::PathOutsideWorkspace);
    }
}
