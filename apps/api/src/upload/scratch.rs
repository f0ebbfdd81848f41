use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tempfile::TempPath;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::upload::artifact::Artifact;

/// Directory where request artifacts are staged for the external script.
#[derive(Debug, Clone)]
pub struct ScratchDir {
    root: PathBuf,
}

/// A staged artifact owned by one request. Removed by [`ScratchFile::discard`],
/// or on drop if the request ends early.
#[derive(Debug)]
pub struct ScratchFile {
    path: TempPath,
}

impl ScratchDir {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Creates the directory if absent. Safe to call on every request.
    pub async fn ensure(&self) -> Result<()> {
        tokio::fs::create_dir_all(&self.root)
            .await
            .with_context(|| format!("Failed to create scratch directory {:?}", self.root))
    }

    /// Writes `artifact` to a uniquely named file tagged with the job id.
    pub async fn stage(
        &self,
        job_id: Uuid,
        label: &str,
        extension: &str,
        artifact: &Artifact,
    ) -> Result<ScratchFile> {
        self.ensure().await?;

        let path = tempfile::Builder::new()
            .prefix(&format!("{job_id}-{label}-"))
            .suffix(&format!(".{extension}"))
            .tempfile_in(&self.root)
            .with_context(|| format!("Failed to create scratch file in {:?}", self.root))?
            .into_temp_path();

        tokio::fs::write(&path, artifact.bytes())
            .await
            .with_context(|| format!("Failed to write scratch file {:?}", &*path))?;

        debug!(
            "Staged {label} ({} bytes) at {:?}",
            artifact.bytes().len(),
            &*path
        );
        Ok(ScratchFile { path })
    }
}

impl ScratchFile {
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Deletes the file. Failures are logged and otherwise ignored.
    pub fn discard(self) {
        let path = self.path.to_path_buf();
        if let Err(e) = self.path.close() {
            warn!("Failed to remove scratch file {path:?}: {e}");
        }
    }
}
