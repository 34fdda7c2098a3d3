//! Per-path write locks.
//!
//! Write-class invocations targeting the same resolved path are serialized
//! through a lightweight async mutex keyed by canonical path; writes to
//! different paths proceed independently. The table is scoped to one
//! registry instance, not process-wide.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// Table of per-canonical-path write locks.
#[derive(Debug, Default)]
pub struct PathLocks {
    inner: Mutex<HashMap<PathBuf, Arc<tokio::sync::Mutex<()>>>>,
}

impl PathLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get (or create) the lock handle for a canonical path. The caller
    /// holds the guard for the duration of its write; RAII releases it on
    /// every exit path, including cancellation and error.
    pub fn handle(&self, path: &Path) -> Arc<tokio::sync::Mutex<()>> {
        let mut table = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        table
            .entry(path.to_path_buf())
            .or_insert_with(|| Arc::new(tokio::sync::Mutex::new(())))
            .clone()
    }

    /// Number of paths a lock has been created for.
    pub fn len(&self) -> usize {
        self.inner.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
