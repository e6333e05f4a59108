//! Use cases - User story orchestration.
//!
//! Each module contains use cases for a specific domain area.
//! Use cases orchestrate the ports and the domain calculators to fulfill
//! one named sheet operation.

pub mod character_sheet;
pub mod rest;

// Re-export main types
pub use character_sheet::{CharacterSheetError, CharacterSheetUseCases, NewCharacter, SheetUpdate};
pub use rest::{RestError, RestUseCases};
