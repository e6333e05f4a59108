//! Reference tables loaded from a single JSON document.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use pathsheet_domain::ReferenceTables;
use tokio::fs;
use tokio::sync::OnceCell;

use crate::infrastructure::ports::{ReferenceDataPort, RepoError};

/// Reads the tables file on first use and serves the cached copy after.
pub struct JsonReferenceData {
    path: PathBuf,
    tables: OnceCell<Arc<ReferenceTables>>,
}

impl JsonReferenceData {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            tables: OnceCell::new(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load(&self) -> Result<Arc<ReferenceTables>, RepoError> {
        let bytes = match fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(RepoError::not_found(
                    "ReferenceTables",
                    self.path.display(),
                ))
            }
            Err(e) => return Err(RepoError::io("reference.load", &self.path)(e)),
        };
        let tables: ReferenceTables = serde_json::from_slice(&bytes)
            .map_err(RepoError::malformed("ReferenceTables", &self.path))?;

        tracing::debug!(
            path = %self.path.display(),
            ancestries = tables.ancestries.len(),
            classes = tables.classes.len(),
            weapons = tables.weapons.len(),
            armor = tables.armor.len(),
            "Loaded reference tables"
        );
        Ok(Arc::new(tables))
    }
}

#[async_trait]
impl ReferenceDataPort for JsonReferenceData {
    async fn tables(&self) -> Result<Arc<ReferenceTables>, RepoError> {
        self.tables
            .get_or_try_init(|| self.load())
            .await
            .cloned()
    }
}
