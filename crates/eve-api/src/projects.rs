//! # Project Storage
//!
//! Named YAML documents stored flat in one directory. Names are validated
//! by [`ProjectName`] before any path is built, so a name can never escape
//! the directory.

use std::path::{Path, PathBuf};

use eve_core::ProjectName;
use thiserror::Error;

/// Error in project storage.
#[derive(Error, Debug)]
pub enum ProjectError {
    /// No document with that name exists.
    #[error("Project not found.")]
    NotFound(ProjectName),

    /// Filesystem failure.
    #[error("project io error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Directory of `<name>.yaml` / `<name>.yml` documents.
#[derive(Debug, Clone)]
pub struct ProjectStore {
    dir: PathBuf,
}

impl ProjectStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Create the directory if missing. Failures are logged and ignored;
    /// writes retry creation.
    pub async fn ensure_dir(&self) {
        if let Err(e) = tokio::fs::create_dir_all(&self.dir).await {
            tracing::warn!(dir = %self.dir.display(), error = %e, "cannot create projects directory");
        }
    }

    /// `<name>.yaml`, unless only `<name>.yml` exists.
    async fn path_for(&self, name: &ProjectName) -> PathBuf {
        let yaml = self.dir.join(format!("{name}.yaml"));
        let yml = self.dir.join(format!("{name}.yml"));
        if tokio::fs::try_exists(&yaml).await.unwrap_or(false)
            || !tokio::fs::try_exists(&yml).await.unwrap_or(false)
        {
            yaml
        } else {
            yml
        }
    }

    /// Sorted, de-duplicated stems of every `*.yaml`/`*.yml` file. A missing
    /// directory lists as empty.
    pub async fn list(&self) -> Result<Vec<String>, ProjectError> {
        let mut entries = match tokio::fs::read_dir(&self.dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(source) => {
                return Err(ProjectError::Io {
                    path: self.dir.clone(),
                    source,
                })
            }
        };

        let mut names = Vec::new();
        loop {
            let entry = entries.next_entry().await.map_err(|source| ProjectError::Io {
                path: self.dir.clone(),
                source,
            })?;
            let Some(entry) = entry else { break };
            let path = entry.path();
            let is_yaml = matches!(
                path.extension().and_then(|e| e.to_str()),
                Some("yaml") | Some("yml")
            );
            if !is_yaml {
                continue;
            }
            let is_file = match entry.file_type().await {
                Ok(kind) if kind.is_symlink() => tokio::fs::metadata(&path)
                    .await
                    .is_ok_and(|meta| meta.is_file()),
                Ok(kind) => kind.is_file(),
                Err(_) => false,
            };
            if !is_file {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                names.push(stem.to_string());
            }
        }
        names.sort();
        names.dedup();
        Ok(names)
    }

    pub async fn read(&self, name: &ProjectName) -> Result<String, ProjectError> {
        let path = self.path_for(name).await;
        match tokio::fs::read_to_string(&path).await {
            Ok(text) => Ok(text),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(ProjectError::NotFound(name.clone()))
            }
            Err(source) => Err(ProjectError::Io { path, source }),
        }
    }

    pub async fn write(&self, name: &ProjectName, yaml: &str) -> Result<(), ProjectError> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|source| ProjectError::Io {
                path: self.dir.clone(),
                source,
            })?;
        let path = self.path_for(name).await;
        tokio::fs::write(&path, yaml)
            .await
            .map_err(|source| ProjectError::Io {
                path: path.clone(),
                source,
            })?;
        tracing::info!(project = %name, path = %path.display(), "project saved");
        Ok(())
    }
}
