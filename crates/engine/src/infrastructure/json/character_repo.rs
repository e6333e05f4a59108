//! File-per-character snapshot storage.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use pathsheet_domain::{Character, CharacterId};
use tokio::fs;

use crate::infrastructure::ports::{CharacterRepo, RepoError};

const EXTENSION: &str = "json";

/// Repository for character snapshots, one pretty-printed JSON file each.
pub struct JsonCharacterRepo {
    dir: PathBuf,
}

impl JsonCharacterRepo {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, id: CharacterId) -> PathBuf {
        self.dir.join(format!("{id}.{EXTENSION}"))
    }
}

#[async_trait]
impl CharacterRepo for JsonCharacterRepo {
    async fn get(&self, id: CharacterId) -> Result<Option<Character>, RepoError> {
        let path = self.path_for(id);
        let bytes = match fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(RepoError::io("character.get", &path)(e)),
        };
        let character =
            serde_json::from_slice(&bytes).map_err(RepoError::malformed("Character", &path))?;
        Ok(Some(character))
    }

    async fn save(&self, character: &Character) -> Result<(), RepoError> {
        fs::create_dir_all(&self.dir)
            .await
            .map_err(RepoError::io("character.save", &self.dir))?;

        let mut json =
            serde_json::to_vec_pretty(character).map_err(RepoError::encode("Character"))?;
        json.push(b'\n');

        // Write then rename so a crash never leaves a half-written snapshot.
        let path = self.path_for(character.id);
        let staging = path.with_extension("json.tmp");
        fs::write(&staging, &json)
            .await
            .map_err(RepoError::io("character.save", &staging))?;
        fs::rename(&staging, &path)
            .await
            .map_err(RepoError::io("character.save", &path))?;
        Ok(())
    }

    async fn delete(&self, id: CharacterId) -> Result<(), RepoError> {
        let path = self.path_for(id);
        match fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Err(RepoError::not_found("Character", id)),
            Err(e) => Err(RepoError::io("character.delete", &path)(e)),
        }
    }

    async fn list(&self) -> Result<Vec<CharacterId>, RepoError> {
        let mut entries = match fs::read_dir(&self.dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(RepoError::io("character.list", &self.dir)(e)),
        };

        let mut ids = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(RepoError::io("character.list", &self.dir))?
        {
            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some(EXTENSION) {
                continue;
            }
            // Stray files that are not named by id are skipped
            if let Some(id) = path
                .file_stem()
                .and_then(|stem| stem.to_str())
                .and_then(|stem| stem.parse::<CharacterId>().ok())
            {
                ids.push(id);
            }
        }
        ids.sort();
        Ok(ids)
    }
}
