//! Engine settings from the environment.
//!
//! `.env.local` then `.env` at the repo root are loaded first (neither
//! overrides a variable that is already set), then `PATHSHEET_*` variables
//! are read with defaults.

use std::env;
use std::path::{Path, PathBuf};

use chrono::Duration;
use pathsheet_domain::game_systems::pf2e::ProficiencyWithoutLevel;
use pathsheet_domain::{ProficiencyEngine, RestPolicy};

pub const DEFAULT_DATA_DIR: &str = "./data";
pub const DEFAULT_REFERENCE_PATH: &str = "./data/reference.json";
pub const DEFAULT_TREAT_WOUNDS_COOLDOWN_MINUTES: i64 = 50;

/// Runtime configuration for the engine host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineSettings {
    /// Directory holding one JSON snapshot per character
    pub data_dir: PathBuf,
    /// Reference tables JSON document
    pub reference_path: PathBuf,
    /// Use the proficiency-without-level variant rule
    pub proficiency_without_level: bool,
    pub treat_wounds_cooldown_minutes: i64,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            reference_path: PathBuf::from(DEFAULT_REFERENCE_PATH),
            proficiency_without_level: false,
            treat_wounds_cooldown_minutes: DEFAULT_TREAT_WOUNDS_COOLDOWN_MINUTES,
        }
    }
}

impl EngineSettings {
    /// Load settings from environment variables, falling back to defaults
    /// for anything unset or unparseable.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) with an injectable variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            data_dir: lookup("PATHSHEET_DATA_DIR")
                .filter(|s| !s.trim().is_empty())
                .map(PathBuf::from)
                .unwrap_or(defaults.data_dir),
            reference_path: lookup("PATHSHEET_REFERENCE_PATH")
                .filter(|s| !s.trim().is_empty())
                .map(PathBuf::from)
                .unwrap_or(defaults.reference_path),
            proficiency_without_level: lookup("PATHSHEET_PROFICIENCY_WITHOUT_LEVEL")
                .map(|s| parse_flag(&s))
                .unwrap_or(defaults.proficiency_without_level),
            treat_wounds_cooldown_minutes: lookup("PATHSHEET_TREAT_WOUNDS_COOLDOWN_MINUTES")
                .and_then(|s| s.trim().parse().ok())
                .filter(|minutes: &i64| *minutes >= 0)
                .unwrap_or(defaults.treat_wounds_cooldown_minutes),
        }
    }

    pub fn proficiency_engine(&self) -> ProficiencyEngine {
        if self.proficiency_without_level {
            ProficiencyEngine::without_level(ProficiencyWithoutLevel::default())
        } else {
            ProficiencyEngine::new()
        }
    }

    pub fn rest_policy(&self) -> RestPolicy {
        RestPolicy::default()
            .with_treat_wounds_cooldown(Duration::minutes(self.treat_wounds_cooldown_minutes))
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

/// Load `.env.local` and `.env` from the repo root, preferring local overrides.
pub fn load_dotenv_from_repo_root() {
    let repo_root = Path::new(env!("CARGO_MANIFEST_DIR")).join("..").join("..");

    for filename in [".env.local", ".env"] {
        let path = repo_root.join(filename);
        if path.exists() {
            let _ = dotenvy::from_path(path);
        }
    }
}
