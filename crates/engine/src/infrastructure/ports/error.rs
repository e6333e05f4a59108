//! Error types for port operations.

use std::io;
use std::path::{Path, PathBuf};

/// Storage and reference-data failures.
#[derive(Debug, thiserror::Error)]
pub enum RepoError {
    /// Nothing stored under this id.
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    #[error("{operation} failed on {}: {source}", path.display())]
    Io {
        operation: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A stored document that does not parse as the expected type.
    #[error("{} is not a valid {entity} document: {source}", path.display())]
    Malformed {
        entity: &'static str,
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Could not encode {entity}: {source}")]
    Encode {
        entity: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

impl RepoError {
    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    /// For `map_err` on filesystem calls.
    pub fn io(operation: &'static str, path: &Path) -> impl FnOnce(io::Error) -> Self {
        let path = path.to_path_buf();
        move |source| Self::Io {
            operation,
            path,
            source,
        }
    }

    /// For `map_err` on deserialization of a stored document.
    pub fn malformed(entity: &'static str, path: &Path) -> impl FnOnce(serde_json::Error) -> Self {
        let path = path.to_path_buf();
        move |source| Self::Malformed {
            entity,
            path,
            source,
        }
    }

    pub fn encode(entity: &'static str) -> impl FnOnce(serde_json::Error) -> Self {
        move |source| Self::Encode { entity, source }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_names_the_entity() {
        let err = RepoError::not_found("Character", "abc");
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "Character not found: abc");
    }

    #[test]
    fn io_errors_name_the_file() {
        let source = io::Error::new(io::ErrorKind::PermissionDenied, "read-only");
        let err = RepoError::io("character.save", Path::new("/data/a.json"))(source);
        assert!(!err.is_not_found());
        assert_eq!(
            err.to_string(),
            "character.save failed on /data/a.json: read-only"
        );
    }

    #[test]
    fn malformed_keeps_the_parse_error() {
        let source = serde_json::from_str::<u32>("nope").expect_err("not a number");
        let err = RepoError::malformed("Character", Path::new("x.json"))(source);
        assert!(err.to_string().starts_with("x.json is not a valid Character document"));
        assert!(std::error::Error::source(&err).is_some());
    }
}
