//! Application state and composition.

use std::sync::Arc;

use pathsheet_domain::RestResolver;

use crate::infrastructure::{
    clock::SystemClock,
    json::JsonRepositories,
    ports::{CharacterRepo, ClockPort, ReferenceDataPort},
    settings::EngineSettings,
};
use crate::use_cases;

/// Main application state.
///
/// Holds the injected ports and the use cases built on them.
pub struct App {
    pub repositories: Repositories,
    pub use_cases: UseCases,
}

/// Container for the port implementations in use.
pub struct Repositories {
    pub character: Arc<dyn CharacterRepo>,
    pub reference: Arc<dyn ReferenceDataPort>,
    pub clock: Arc<dyn ClockPort>,
}

/// Container for all use cases.
pub struct UseCases {
    pub sheets: Arc<use_cases::CharacterSheetUseCases>,
    pub rest: use_cases::RestUseCases,
}

impl App {
    /// Wire the JSON file adapters and the system clock from settings.
    pub fn from_settings(settings: &EngineSettings) -> Self {
        let json = JsonRepositories::new(&settings.data_dir, &settings.reference_path);
        Self::new(
            settings,
            Repositories {
                character: json.character,
                reference: json.reference,
                clock: Arc::new(SystemClock::new()),
            },
        )
    }

    pub fn new(settings: &EngineSettings, repositories: Repositories) -> Self {
        let sheets = Arc::new(use_cases::CharacterSheetUseCases::new(
            repositories.character.clone(),
            repositories.reference.clone(),
            settings.proficiency_engine(),
        ));
        let rest = use_cases::RestUseCases::new(
            sheets.clone(),
            repositories.clock.clone(),
            RestResolver::new(settings.rest_policy()),
        );

        Self {
            repositories,
            use_cases: UseCases { sheets, rest },
        }
    }
}
