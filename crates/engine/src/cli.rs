//! Command-line surface.
//!
//! Every subcommand maps onto exactly one use case and prints the resulting
//! snapshot (plus the operation's outcome, when it has one) as JSON.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use pathsheet_domain::{
    ActiveCondition, BoostSource, Buff, Character, CharacterId, Condition, DegreeOfSuccess,
    ModifierTarget,
};
use pathsheet_domain::value_objects::{determine_success, TargetedModifier};
use serde::Serialize;
use serde_json::{json, Value};

use crate::app::App;
use crate::infrastructure::settings::EngineSettings;
use crate::use_cases::{CharacterSheetError, NewCharacter, RestError, SheetUpdate};

#[derive(Debug, Parser)]
#[command(name = "pathsheet", version, about = "Pathfinder 2e character sheet engine")]
pub struct Cli {
    /// Directory holding character snapshots (overrides PATHSHEET_DATA_DIR)
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Reference tables JSON (overrides PATHSHEET_REFERENCE_PATH)
    #[arg(long, global = true)]
    pub reference: Option<PathBuf>,

    /// Use the proficiency-without-level variant rule
    #[arg(long, global = true)]
    pub without_level: bool,

    /// Print compact JSON instead of pretty JSON
    #[arg(long, global = true)]
    pub compact: bool,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Flags win over the environment.
    pub fn apply_to(&self, settings: &mut EngineSettings) {
        if let Some(dir) = &self.data_dir {
            settings.data_dir = dir.clone();
        }
        if let Some(path) = &self.reference {
            settings.reference_path = path.clone();
        }
        if self.without_level {
            settings.proficiency_without_level = true;
        }
    }
}

#[derive(Debug, Args)]
pub struct Target {
    /// Character id
    #[arg(long, short = 'c')]
    pub character: CharacterId,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Create a new character
    Create {
        #[arg(long)]
        name: String,
        #[arg(long)]
        level: Option<u8>,
        #[arg(long)]
        ancestry: Option<String>,
        #[arg(long)]
        heritage: Option<String>,
        #[arg(long)]
        background: Option<String>,
        #[arg(long)]
        class: Option<String>,
    },
    /// Recalculate and save a snapshot read from a JSON file
    Import {
        #[arg(long)]
        file: PathBuf,
    },
    /// List saved character ids
    List,
    Show(Target),
    Delete(Target),
    Recalculate(Target),
    SetLevel {
        #[command(flatten)]
        target: Target,
        #[arg(long)]
        level: u8,
    },
    /// Record an ability boost
    Boost {
        #[command(flatten)]
        target: Target,
        #[arg(long, value_enum)]
        source: BoostSlot,
        /// Milestone level, required with `--source level`
        #[arg(long)]
        milestone: Option<u8>,
        /// Ability id: str, dex, con, int, wis or cha
        #[arg(long)]
        ability: String,
    },
    AddCondition {
        #[command(flatten)]
        target: Target,
        /// Condition id, e.g. frightened or offGuard
        #[arg(long)]
        condition: String,
        #[arg(long)]
        value: Option<u32>,
        /// Rounds until it expires; omit for indefinite
        #[arg(long)]
        duration: Option<u32>,
    },
    RemoveCondition {
        #[command(flatten)]
        target: Target,
        #[arg(long)]
        condition: String,
    },
    /// Tick condition and buff durations by one round
    AdvanceRound(Target),
    AddBuff {
        #[command(flatten)]
        target: Target,
        #[arg(long)]
        buff: String,
        /// `target=value`, e.g. `attack=1` or `save:will=-1`; repeatable
        #[arg(long = "modifier", value_parser = parse_modifier)]
        modifiers: Vec<TargetedModifier>,
        #[arg(long)]
        duration: Option<u32>,
    },
    RemoveBuff {
        #[command(flatten)]
        target: Target,
        #[arg(long)]
        buff: String,
    },
    RaiseShield(Target),
    LowerShield(Target),
    DamageShield {
        #[command(flatten)]
        target: Target,
        #[arg(long)]
        amount: u32,
    },
    RepairShield {
        #[command(flatten)]
        target: Target,
        #[arg(long)]
        amount: u32,
    },
    /// Spend a spell slot of the given rank
    CastSpell {
        #[command(flatten)]
        target: Target,
        #[arg(long)]
        rank: u8,
    },
    CastFocus(Target),
    CastInnate {
        #[command(flatten)]
        target: Target,
        #[arg(long)]
        spell: String,
    },
    SpendResource {
        #[command(flatten)]
        target: Target,
        #[arg(long)]
        resource: String,
        #[arg(long, default_value_t = 1)]
        amount: u32,
    },
    TreatWounds {
        #[command(flatten)]
        target: Target,
        #[arg(long, default_value_t = 15)]
        dc: u32,
        /// critical-failure, failure, success or critical-success
        #[arg(long, required_unless_present = "roll", conflicts_with = "roll")]
        degree: Option<DegreeOfSuccess>,
        /// Natural d20 result of the Medicine check, instead of --degree
        #[arg(long, value_parser = clap::value_parser!(u8).range(1..=20))]
        roll: Option<u8>,
        /// Medicine modifier added to --roll
        #[arg(long, default_value_t = 0, allow_hyphen_values = true)]
        bonus: i32,
    },
    Refocus(Target),
    LongRest(Target),
}

/// Boost sources as spelled on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum BoostSlot {
    AncestryFree,
    BackgroundChoice,
    BackgroundFree,
    ClassKey,
    CreationFree,
    Level,
}

impl BoostSlot {
    fn source(self, milestone: Option<u8>) -> Result<BoostSource, CliError> {
        Ok(match self {
            BoostSlot::AncestryFree => BoostSource::AncestryFree,
            BoostSlot::BackgroundChoice => BoostSource::BackgroundChoice,
            BoostSlot::BackgroundFree => BoostSource::BackgroundFree,
            BoostSlot::ClassKey => BoostSource::ClassKey,
            BoostSlot::CreationFree => BoostSource::CreationFree,
            BoostSlot::Level => BoostSource::Level(milestone.ok_or_else(|| {
                CliError::InvalidArgument("--milestone is required for level boosts".into())
            })?),
        })
    }
}

/// Errors surfaced by [`execute`].
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Could not read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Sheet(#[from] CharacterSheetError),

    #[error(transparent)]
    Rest(#[from] RestError),
}

/// `target=value` into a modifier.
pub fn parse_modifier(raw: &str) -> Result<TargetedModifier, String> {
    let (target, value) = raw
        .rsplit_once('=')
        .ok_or_else(|| format!("expected target=value, got `{raw}`"))?;
    let target: ModifierTarget = target.parse().map_err(|e| format!("{e}"))?;
    let value: i32 = value
        .trim()
        .parse()
        .map_err(|_| format!("modifier value must be an integer, got `{value}`"))?;
    Ok(TargetedModifier::new(target, value))
}

/// Build a condition from its id and optional value.
pub fn condition_from_id(id: &str, value: Option<u32>) -> Result<Condition, CliError> {
    let mut raw = serde_json::Map::new();
    raw.insert("id".into(), Value::from(id));
    if let Some(value) = value {
        raw.insert("value".into(), Value::from(value));
    }
    let condition: Condition = serde_json::from_value(Value::Object(raw))
        .map_err(|e| CliError::InvalidArgument(format!("condition `{id}`: {e}")))?;
    if condition == Condition::Unknown {
        return Err(CliError::InvalidArgument(format!("unknown condition `{id}`")));
    }
    if condition.value() == Some(0) {
        return Err(CliError::InvalidArgument(format!(
            "condition `{id}` needs a --value of at least 1"
        )));
    }
    Ok(condition)
}

/// The stated degree, or the one a natural `roll` plus `bonus` earns against `dc`.
pub fn check_degree(
    degree: Option<DegreeOfSuccess>,
    roll: Option<u8>,
    bonus: i32,
    dc: u32,
) -> Result<DegreeOfSuccess, CliError> {
    match (degree, roll) {
        (Some(degree), _) => Ok(degree),
        (None, Some(roll)) => {
            let dc = i32::try_from(dc)
                .map_err(|_| CliError::InvalidArgument(format!("DC {dc} is out of range")))?;
            Ok(determine_success(
                i32::from(roll),
                bonus,
                dc,
                roll == 20,
                roll == 1,
            ))
        }
        (None, None) => Err(CliError::InvalidArgument(
            "either --degree or --roll is required".into(),
        )),
    }
}

/// Run one command against the app, returning the JSON to print.
pub async fn execute(app: &App, command: Command) -> Result<Value, CliError> {
    let sheets = &app.use_cases.sheets;
    let rest = &app.use_cases.rest;

    let output = match command {
        Command::Create {
            name,
            level,
            ancestry,
            heritage,
            background,
            class,
        } => {
            let character = sheets
                .create(NewCharacter {
                    name,
                    level,
                    ancestry_id: ancestry,
                    heritage_id: heritage,
                    background_id: background,
                    class_id: class,
                })
                .await?;
            serde_json::to_value(character)?
        }
        Command::Import { file } => {
            let bytes = tokio::fs::read(&file).await.map_err(|source| CliError::Read {
                path: file.clone(),
                source,
            })?;
            let character: Character = serde_json::from_slice(&bytes)?;
            serde_json::to_value(sheets.import(character).await?)?
        }
        Command::List => serde_json::to_value(sheets.list().await?)?,
        Command::Show(t) => serde_json::to_value(sheets.get(t.character).await?)?,
        Command::Delete(t) => {
            sheets.delete(t.character).await?;
            json!({ "deleted": t.character })
        }
        Command::Recalculate(t) => serde_json::to_value(sheets.recalculate(t.character).await?)?,
        Command::SetLevel { target, level } => {
            serde_json::to_value(sheets.set_level(target.character, level).await?)?
        }
        Command::Boost {
            target,
            source,
            milestone,
            ability,
        } => {
            let source = source.source(milestone)?;
            report(sheets.record_boost(target.character, source, &ability).await?)?
        }
        Command::AddCondition {
            target,
            condition,
            value,
            duration,
        } => {
            let mut active = ActiveCondition::new(condition_from_id(&condition, value)?);
            if let Some(rounds) = duration {
                active = active.with_duration(rounds);
            }
            report(sheets.add_condition(target.character, active).await?)?
        }
        Command::RemoveCondition { target, condition } => {
            report(sheets.remove_condition(target.character, &condition).await?)?
        }
        Command::AdvanceRound(t) => serde_json::to_value(sheets.advance_round(t.character).await?)?,
        Command::AddBuff {
            target,
            buff,
            modifiers,
            duration,
        } => {
            if modifiers.is_empty() {
                return Err(CliError::InvalidArgument(
                    "a buff needs at least one --modifier".into(),
                ));
            }
            let mut buff = Buff::new(buff, modifiers);
            if let Some(rounds) = duration {
                buff = buff.with_duration(rounds);
            }
            report(sheets.add_buff(target.character, buff).await?)?
        }
        Command::RemoveBuff { target, buff } => {
            report(sheets.remove_buff(target.character, &buff).await?)?
        }
        Command::RaiseShield(t) => report(sheets.raise_shield(t.character).await?)?,
        Command::LowerShield(t) => report(sheets.lower_shield(t.character).await?)?,
        Command::DamageShield { target, amount } => {
            report(sheets.damage_shield(target.character, amount).await?)?
        }
        Command::RepairShield { target, amount } => {
            report(sheets.repair_shield(target.character, amount).await?)?
        }
        Command::CastSpell { target, rank } => {
            report(sheets.cast_spell(target.character, rank).await?)?
        }
        Command::CastFocus(t) => report(sheets.cast_focus_spell(t.character).await?)?,
        Command::CastInnate { target, spell } => {
            report(sheets.cast_innate(target.character, &spell).await?)?
        }
        Command::SpendResource {
            target,
            resource,
            amount,
        } => report(
            sheets
                .spend_resource(target.character, &resource, amount)
                .await?,
        )?,
        Command::TreatWounds {
            target,
            dc,
            degree,
            roll,
            bonus,
        } => {
            let degree = check_degree(degree, roll, bonus, dc)?;
            report(rest.treat_wounds(target.character, dc, degree).await?)?
        }
        Command::Refocus(t) => report(rest.refocus(t.character).await?)?,
        Command::LongRest(t) => report(rest.long_rest(t.character).await?)?,
    };

    Ok(output)
}

fn report<O: Serialize>(update: SheetUpdate<O>) -> Result<Value, CliError> {
    Ok(json!({
        "outcome": serde_json::to_value(update.outcome)?,
        "character": serde_json::to_value(update.character)?,
    }))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::TimeZone;
    use chrono::Utc;

    use super::*;
    use crate::app::Repositories;
    use crate::infrastructure::clock::FixedClock;
    use crate::infrastructure::json::{JsonCharacterRepo, JsonReferenceData};
    use pathsheet_domain::SaveKind;

    const REFERENCE: &str = r#"{
        "ancestries": {"dwarf": {"name": "Dwarf", "hp": 10, "speed": 20}},
        "classes": {"fighter": {"name": "Fighter", "hpPerLevel": 10, "keyAbilityOptions": ["str", "dex"]}}
    }"#;

    fn app(dir: &std::path::Path) -> (App, Arc<FixedClock>) {
        let reference_path = dir.join("reference.json");
        std::fs::write(&reference_path, REFERENCE).expect("write reference");
        let now = Utc
            .with_ymd_and_hms(2026, 3, 14, 9, 0, 0)
            .single()
            .expect("valid time");

        let clock = Arc::new(FixedClock::new(now));

        let app = App::new(
            &EngineSettings::default(),
            Repositories {
                character: Arc::new(JsonCharacterRepo::new(dir.join("characters"))),
                reference: Arc::new(JsonReferenceData::new(reference_path)),
                clock: clock.clone(),
            },
        );
        (app, clock)
    }

    async fn create_fighter(app: &App) -> CharacterId {
        let created = execute(
            app,
            Command::Create {
                name: "Harsk".into(),
                level: Some(2),
                ancestry: Some("dwarf".into()),
                heritage: None,
                background: None,
                class: Some("fighter".into()),
            },
        )
        .await
        .expect("create");
        serde_json::from_value(created["id"].clone()).expect("id")
    }

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("pathsheet").chain(args.iter().copied()))
            .expect("parse")
    }

    #[test]
    fn parses_modifiers() {
        assert_eq!(
            parse_modifier("save:will=-1"),
            Ok(TargetedModifier::new(ModifierTarget::Save(SaveKind::Will), -1))
        );
        assert_eq!(
            parse_modifier("attack=2"),
            Ok(TargetedModifier::new(ModifierTarget::Attack, 2))
        );
        assert!(parse_modifier("attack").is_err());
        assert!(parse_modifier("luck=1").is_err());
        assert!(parse_modifier("ac=lots").is_err());
    }

    #[test]
    fn builds_conditions() {
        assert_eq!(
            condition_from_id("frightened", Some(2)).expect("frightened"),
            Condition::Frightened { value: 2 }
        );
        assert_eq!(
            condition_from_id("offGuard", None).expect("off-guard"),
            Condition::OffGuard
        );
        assert!(condition_from_id("frightened", None).is_err());
        assert!(condition_from_id("sickened", Some(0)).is_err());
        assert!(condition_from_id("bewildered", None).is_err());
    }

    #[test]
    fn level_boost_needs_a_milestone() {
        assert!(BoostSlot::Level.source(None).is_err());
        assert_eq!(
            BoostSlot::Level.source(Some(5)).expect("level"),
            BoostSource::Level(5)
        );
    }

    #[test]
    fn flags_override_settings() {
        let cli = parse(&["--data-dir", "/tmp/sheets", "--without-level", "list"]);
        let mut settings = EngineSettings::default();
        cli.apply_to(&mut settings);

        assert_eq!(settings.data_dir, PathBuf::from("/tmp/sheets"));
        assert!(settings.proficiency_without_level);
        assert_eq!(settings.reference_path, EngineSettings::default().reference_path);
    }

    #[test]
    fn parses_subcommand_arguments() {
        let id = CharacterId::new().to_string();
        let cli = parse(&[
            "add-buff", "--character", &id, "--buff", "heroism", "--modifier", "attack=1",
            "--modifier", "skill:str=1", "--duration", "10",
        ]);
        match cli.command {
            Command::AddBuff {
                modifiers, duration, ..
            } => {
                assert_eq!(modifiers.len(), 2);
                assert_eq!(duration, Some(10));
            }
            other => panic!("unexpected command {other:?}"),
        }

        let cli = parse(&["treat-wounds", "-c", &id, "--degree", "critical-success"]);
        assert!(matches!(
            cli.command,
            Command::TreatWounds {
                dc: 15,
                degree: Some(DegreeOfSuccess::CriticalSuccess),
                roll: None,
                ..
            }
        ));

        let cli = parse(&["treat-wounds", "-c", &id, "--dc", "20", "--roll", "14", "--bonus", "-2"]);
        assert!(matches!(
            cli.command,
            Command::TreatWounds {
                dc: 20,
                degree: None,
                roll: Some(14),
                bonus: -2,
                ..
            }
        ));

        let missing = Cli::try_parse_from(["pathsheet", "treat-wounds", "-c", id.as_str()]);
        assert!(missing.is_err());
        let both = Cli::try_parse_from([
            "pathsheet", "treat-wounds", "-c", id.as_str(), "--degree", "success", "--roll", "12",
        ]);
        assert!(both.is_err());
        let out_of_range =
            Cli::try_parse_from(["pathsheet", "treat-wounds", "-c", id.as_str(), "--roll", "21"]);
        assert!(out_of_range.is_err());
    }

    #[test]
    fn rolls_resolve_to_a_degree() {
        // 12 + 8 = 20 meets DC 20
        assert_eq!(
            check_degree(None, Some(12), 8, 20).expect("degree"),
            DegreeOfSuccess::Success
        );
        // 5 + 3 misses DC 20 by 12
        assert_eq!(
            check_degree(None, Some(5), 3, 20).expect("degree"),
            DegreeOfSuccess::CriticalFailure
        );
        // a natural 20 lifts a failure to a success
        assert_eq!(
            check_degree(None, Some(20), -5, 20).expect("degree"),
            DegreeOfSuccess::Success
        );
        assert_eq!(
            check_degree(Some(DegreeOfSuccess::Failure), None, 0, 15).expect("degree"),
            DegreeOfSuccess::Failure
        );
        assert!(check_degree(None, None, 0, 15).is_err());
    }

    #[tokio::test]
    async fn create_then_operate_through_files() {
        let dir = tempfile::tempdir().expect("tempdir");
        let (app, _) = app(dir.path());

        let created = execute(
            &app,
            Command::Create {
                name: "Harsk".into(),
                level: Some(2),
                ancestry: Some("dwarf".into()),
                heritage: None,
                background: None,
                class: Some("fighter".into()),
            },
        )
        .await
        .expect("create");
        let id: CharacterId = serde_json::from_value(created["id"].clone()).expect("id");
        assert_eq!(created["derived"]["maxHp"], json!(30));
        assert_eq!(created["derived"]["speed"], json!(20));

        let update = execute(
            &app,
            Command::AddCondition {
                target: Target { character: id },
                condition: "sickened".into(),
                value: Some(1),
                duration: None,
            },
        )
        .await
        .expect("add condition");
        assert_eq!(update["outcome"], json!(true));
        assert_eq!(update["character"]["derived"]["skills"]["athletics"], json!(-1));

        let rested = execute(&app, Command::LongRest(Target { character: id }))
            .await
            .expect("long rest");
        assert_eq!(rested["outcome"]["type"], json!("longRested"));
        assert_eq!(rested["outcome"]["clearedConditions"], json!(1));

        let listed = execute(&app, Command::List).await.expect("list");
        assert_eq!(listed, json!([id]));
    }

    #[tokio::test]
    async fn missing_character_surfaces_not_found() {
        let dir = tempfile::tempdir().expect("tempdir");
        let (app, _) = app(dir.path());

        let err = execute(&app, Command::Show(Target { character: CharacterId::new() }))
            .await
            .expect_err("missing");
        assert!(matches!(
            err,
            CliError::Sheet(CharacterSheetError::CharacterNotFound(_))
        ));
    }

    #[tokio::test]
    async fn treat_wounds_cooldown_follows_the_clock() {
        let dir = tempfile::tempdir().expect("tempdir");
        let (app, clock) = app(dir.path());
        let id = create_fighter(&app).await;
        let treat = || Command::TreatWounds {
            target: Target { character: id },
            dc: 15,
            degree: None,
            roll: Some(10),
            bonus: 7,
        };

        let first = execute(&app, treat()).await.expect("first");
        assert_eq!(first["outcome"]["type"], json!("treatedWounds"));

        clock.advance_minutes(20);
        let early = execute(&app, treat()).await.expect("early");
        assert_eq!(
            early["outcome"],
            json!({
                "type": "rejected",
                "reason": {"kind": "cooldownActive", "remainingMinutes": 30}
            })
        );

        clock.advance_minutes(30);
        let later = execute(&app, treat()).await.expect("later");
        assert_eq!(later["outcome"]["type"], json!("treatedWounds"));
    }
}
