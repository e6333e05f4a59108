//! Storage and reference-data ports.

use std::sync::Arc;

use async_trait::async_trait;
use pathsheet_domain::{Character, CharacterId, ReferenceTables};

use super::RepoError;

// =============================================================================
// Storage Ports
// =============================================================================

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CharacterRepo: Send + Sync {
    async fn get(&self, id: CharacterId) -> Result<Option<Character>, RepoError>;
    async fn save(&self, character: &Character) -> Result<(), RepoError>;
    async fn delete(&self, id: CharacterId) -> Result<(), RepoError>;
    async fn list(&self) -> Result<Vec<CharacterId>, RepoError>;
}

/// Source of the ancestry, class, item and spell tables.
///
/// Implementations are expected to cache; use cases call this once per
/// operation.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReferenceDataPort: Send + Sync {
    async fn tables(&self) -> Result<Arc<ReferenceTables>, RepoError>;
}
