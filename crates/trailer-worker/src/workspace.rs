//! Scoped scratch directories.
//!
//! A [`Workspace`] owns a freshly created directory. The directory is removed
//! when [`Workspace::release`] is awaited, or synchronously in `Drop` if the
//! holder unwinds or is cancelled first. Either way it is removed at most once.

use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, error, warn};
use uuid::Uuid;

use crate::error::WorkspaceError;

#[derive(Debug)]
pub struct Workspace {
    path: PathBuf,
    released: bool,
}

impl Workspace {
    /// Create `{base_dir}/{prefix}_{uuid}`.
    pub async fn acquire(base_dir: impl AsRef<Path>, prefix: &str) -> Result<Self, WorkspaceError> {
        let name = format!("{}_{}", prefix, Uuid::new_v4().simple());
        Self::create(base_dir.as_ref(), &name).await
    }

    /// Create `{base_dir}/{name}`. Fails if the directory already exists,
    /// so two holders never share one.
    pub async fn acquire_named(base_dir: impl AsRef<Path>, name: &str) -> Result<Self, WorkspaceError> {
        if name.is_empty() || name == "." || name == ".." || name.contains(['/', '\\']) {
            return Err(WorkspaceError::InvalidName(name.to_string()));
        }
        Self::create(base_dir.as_ref(), name).await
    }

    async fn create(base_dir: &Path, name: &str) -> Result<Self, WorkspaceError> {
        let path = base_dir.join(name);
        let create_err = |source| WorkspaceError::Create {
            path: path.clone(),
            source,
        };

        tokio::fs::create_dir_all(base_dir).await.map_err(create_err)?;
        tokio::fs::create_dir(&path).await.map_err(create_err)?;

        debug!("Created workspace {}", path.display());
        Ok(Self {
            path,
            released: false,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn join(&self, name: impl AsRef<Path>) -> PathBuf {
        self.path.join(name)
    }

    /// Remove the directory and everything in it.
    ///
    /// Returns `false` if removal failed; the failure is logged and never
    /// propagated.
    pub async fn release(mut self) -> bool {
        let result = remove_dir(&self.path).await;
        self.released = true;

        match result {
            Ok(()) => {
                debug!("Removed workspace {}", self.path.display());
                true
            }
            Err(e) => {
                error!("Failed to remove workspace {}: {}", self.path.display(), e);
                false
            }
        }
    }
}

impl Drop for Workspace {
    fn drop(&mut self) {
        if self.released {
            return;
        }

        warn!("Workspace {} dropped without release, removing", self.path.display());
        match std::fs::remove_dir_all(&self.path) {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => error!("Failed to remove workspace {}: {}", self.path.display(), e),
        }
    }
}

async fn remove_dir(path: &Path) -> io::Result<()> {
    match tokio::fs::remove_dir_all(path).await {
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_acquire_creates_prefixed_directory() {
        let base = TempDir::new().unwrap();
        let workspace = Workspace::acquire(base.path().join("nested"), "trailer").await.unwrap();

        assert!(workspace.path().is_dir());
        let name = workspace.path().file_name().unwrap().to_string_lossy().to_string();
        assert!(name.starts_with("trailer_"));

        let path = workspace.path().to_path_buf();
        assert!(workspace.release().await);
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn test_release_removes_contents() {
        let base = TempDir::new().unwrap();
        let workspace = Workspace::acquire_named(base.path(), "job-1").await.unwrap();
        tokio::fs::write(workspace.join("movie.mp4"), b"data").await.unwrap();
        tokio::fs::create_dir(workspace.join("sub")).await.unwrap();

        let path = workspace.path().to_path_buf();
        assert!(workspace.release().await);
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn test_release_tolerates_missing_directory() {
        let base = TempDir::new().unwrap();
        let workspace = Workspace::acquire_named(base.path(), "gone").await.unwrap();
        std::fs::remove_dir_all(workspace.path()).unwrap();

        assert!(workspace.release().await);
    }

    #[tokio::test]
    async fn test_drop_removes_directory() {
        let base = TempDir::new().unwrap();
        let workspace = Workspace::acquire(base.path(), "trailer").await.unwrap();
        let path = workspace.path().to_path_buf();

        drop(workspace);
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn test_named_workspace_is_exclusive() {
        let base = TempDir::new().unwrap();
        let first = Workspace::acquire_named(base.path(), "job-1").await.unwrap();

        let err = Workspace::acquire_named(base.path(), "job-1").await.unwrap_err();
        assert!(matches!(err, WorkspaceError::Create { .. }));

        first.release().await;
    }

    #[tokio::test]
    async fn test_rejects_path_like_names() {
        let base = TempDir::new().unwrap();
        for name in ["", ".", "..", "a/b"] {
            let err = Workspace::acquire_named(base.path(), name).await.unwrap_err();
            assert!(matches!(err, WorkspaceError::InvalidName(_)));
        }
    }
}
