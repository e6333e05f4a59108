//! Rest operation errors.

use crate::use_cases::character_sheet::CharacterSheetError;

/// Errors that can occur during rest activities.
#[derive(Debug, thiserror::Error)]
pub enum RestError {
    #[error(transparent)]
    Sheet(#[from] CharacterSheetError),
}
