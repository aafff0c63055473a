//! Filesystem persistence for accepted submissions.
//!
//! One flat directory of JSON files, one file per submission. The store
//! owns the canonical output directory path and enforces that every write
//! lands strictly inside it. Writes deliberately take no lock: identical
//! filenames race at the filesystem and the last write wins.

use std::path::{Path, PathBuf};

use tracing::{debug, error};

use crate::{
    error::{IngestError, Result},
    submission::SubmissionRecord,
};

/// Repository for submission files under a single output directory.
#[derive(Debug, Clone)]
pub struct SubmissionStore {
    root: PathBuf,
}

impl SubmissionStore {
    /// Opens the output directory, creating it if missing.
    ///
    /// The directory path is canonicalized once here; all subsequent
    /// containment checks compare against this canonical form.
    ///
    /// # Errors
    ///
    /// Returns the underlying I/O error if the directory cannot be created
    /// or resolved.
    pub fn open(root: impl AsRef<Path>) -> std::io::Result<Self> {
        let root = root.as_ref();
        std::fs::create_dir_all(root)?;
        let root = root.canonicalize()?;

        Ok(Self { root })
    }

    /// Returns the canonical output directory path.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Writes a submission record to disk, overwriting any existing file
    /// with the same name.
    ///
    /// Returns the path of the written file.
    ///
    /// # Errors
    ///
    /// Returns `PathEscape` if the target does not resolve strictly inside
    /// the output directory, `PermissionDenied`/`StorageFailure` for I/O
    /// failures. I/O detail is logged here and not carried in the error.
    pub async fn persist(&self, record: &SubmissionRecord) -> Result<PathBuf> {
        let target = self.resolve_target(record.filename()).await?;
        let body = record.to_pretty_json()?;

        if let Err(e) = tokio::fs::write(&target, &body).await {
            error!(error = %e, path = %target.display(), "failed to write submission file");
            return Err(IngestError::from(e));
        }

        debug!(path = %target.display(), bytes = body.len(), "submission file written");
        Ok(target)
    }

    /// Resolves a filename against the output directory and verifies
    /// containment.
    ///
    /// The sanitizer already strips separator characters from generated
    /// filenames; this check is an independent safety net. `Path::starts_with`
    /// compares lexically and would accept `..` components, so the target's
    /// parent is canonicalized and required to be the output directory
    /// itself. Any resolution failure is treated as an escape.
    async fn resolve_target(&self, filename: &str) -> Result<PathBuf> {
        let candidate = self.root.join(filename);

        let file_name = candidate.file_name().ok_or(IngestError::PathEscape)?;
        let parent = candidate.parent().ok_or(IngestError::PathEscape)?;

        let parent =
            tokio::fs::canonicalize(parent).await.map_err(|_| IngestError::PathEscape)?;
        if parent != self.root {
            return Err(IngestError::PathEscape);
        }

        Ok(parent.join(file_name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> (tempfile::TempDir, SubmissionStore) {
        let dir = tempfile::tempdir().expect("create temp dir");
        let store = SubmissionStore::open(dir.path()).expect("open store");
        (dir, store)
    }

    #[tokio::test]
    async fn plain_filenames_resolve_inside_root() {
        let (_dir, store) = store();

        let target = store
            .resolve_target("alice_session_s1_20240301_120000.json")
            .await
            .expect("plain filename resolves");

        assert_eq!(target, store.root().join("alice_session_s1_20240301_120000.json"));
    }

    #[tokio::test]
    async fn parent_traversal_rejected() {
        let (_dir, store) = store();

        let result = store.resolve_target("../evil.json").await;

        assert!(matches!(result, Err(IngestError::PathEscape)));
    }

    #[tokio::test]
    async fn nested_paths_rejected() {
        let (_dir, store) = store();

        // Missing subdirectory fails resolution.
        assert!(matches!(store.resolve_target("a/b.json").await, Err(IngestError::PathEscape)));

        // An existing subdirectory is still outside the flat layout.
        std::fs::create_dir(store.root().join("sub")).expect("create subdir");
        assert!(matches!(
            store.resolve_target("sub/x.json").await,
            Err(IngestError::PathEscape)
        ));
    }

    #[tokio::test]
    async fn absolute_paths_rejected() {
        let (_dir, store) = store();

        let result = store.resolve_target("/etc/passwd").await;

        assert!(matches!(result, Err(IngestError::PathEscape)));
    }

    #[tokio::test]
    async fn bare_dot_components_rejected() {
        let (_dir, store) = store();

        assert!(matches!(store.resolve_target("..").await, Err(IngestError::PathEscape)));
    }
}
