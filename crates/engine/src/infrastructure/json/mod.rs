//! JSON file implementations.
//!
//! Character snapshots live one-per-file in a data directory; reference
//! tables come from a single JSON document loaded once and cached.

use std::path::PathBuf;
use std::sync::Arc;

mod character_repo;
mod reference_repo;

pub use character_repo::JsonCharacterRepo;
pub use reference_repo::JsonReferenceData;

/// Create all JSON-backed repositories.
pub struct JsonRepositories {
    pub character: Arc<JsonCharacterRepo>,
    pub reference: Arc<JsonReferenceData>,
}

impl JsonRepositories {
    pub fn new(data_dir: impl Into<PathBuf>, reference_path: impl Into<PathBuf>) -> Self {
        Self {
            character: Arc::new(JsonCharacterRepo::new(data_dir)),
            reference: Arc::new(JsonReferenceData::new(reference_path)),
        }
    }
}
