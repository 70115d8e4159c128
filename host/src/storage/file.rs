//! Plans stored as JSON files, one per plan.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use mjop_engine::domain::{Plan, PlanId};
use mjop_engine::{PlanRepository, RepositoryError};
use tracing::{debug, instrument};

/// Stores each plan as `<dir>/<plan-id>.json`.
#[derive(Debug, Clone)]
pub struct FilePlanRepository {
    dir: PathBuf,
}

impl FilePlanRepository {
    /// Uses `dir`, which is created on the first save.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Storage directory.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the file for `id`. Ids that could escape the directory have
    /// no file.
    fn path_for(&self, id: &PlanId) -> Option<PathBuf> {
        let valid = !id.is_empty()
            && id
                .as_str()
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        valid.then(|| self.dir.join(format!("{id}.json")))
    }

    fn io_error(path: &Path, source: std::io::Error) -> RepositoryError {
        RepositoryError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

#[async_trait]
impl PlanRepository for FilePlanRepository {
    #[instrument(skip_all, fields(plan_id = %id))]
    async fn fetch_plan(&self, id: &PlanId) -> Result<Plan, RepositoryError> {
        let path = self
            .path_for(id)
            .ok_or_else(|| RepositoryError::NotFound(id.clone()))?;
        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(RepositoryError::NotFound(id.clone()));
            }
            Err(e) => return Err(Self::io_error(&path, e)),
        };
        let plan = serde_json::from_slice(&bytes)?;
        debug!(bytes = bytes.len(), "Loaded plan");
        Ok(plan)
    }

    #[instrument(skip_all, fields(plan_id = ?id))]
    async fn save_plan(&self, id: Option<&PlanId>, plan: &Plan) -> Result<PlanId, RepositoryError> {
        let id = match id {
            Some(id) => {
                let path = self
                    .path_for(id)
                    .ok_or_else(|| RepositoryError::NotFound(id.clone()))?;
                let exists = tokio::fs::try_exists(&path)
                    .await
                    .map_err(|e| Self::io_error(&path, e))?;
                if !exists {
                    return Err(RepositoryError::NotFound(id.clone()));
                }
                id.clone()
            }
            None => PlanId::generate(),
        };
        let path = self
            .path_for(&id)
            .ok_or_else(|| RepositoryError::NotFound(id.clone()))?;

        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| Self::io_error(&self.dir, e))?;

        // Write then rename, so readers never see a half-written plan.
        let bytes = serde_json::to_vec_pretty(plan)?;
        let staging = path.with_extension("json.tmp");
        tokio::fs::write(&staging, &bytes)
            .await
            .map_err(|e| Self::io_error(&staging, e))?;
        tokio::fs::rename(&staging, &path)
            .await
            .map_err(|e| Self::io_error(&path, e))?;

        debug!(plan_id = %id, bytes = bytes.len(), "Saved plan");
        Ok(id)
    }
}
