//! Ability score resolution from the boost ledger.

use crate::entities::{parse_boosts, BoostLedger, BoostSource, MILESTONE_LEVELS};
use crate::reference::{AncestryEntry, BackgroundEntry, ClassEntry};
use crate::value_objects::{Ability, AbilityScoreSet};

/// Scores at or above this only gain +1 per boost.
pub const BOOST_SOFT_CAP: i32 = 18;

/// Replays the boost ledger from 10 in the canonical order.
pub struct AbilityScoreResolver;

impl AbilityScoreResolver {
    /// +2, or +1 once the score has reached 18.
    pub fn apply_boost(score: i32) -> i32 {
        if score >= BOOST_SOFT_CAP {
            score + 1
        } else {
            score + 2
        }
    }

    pub fn apply_flaw(score: i32) -> i32 {
        (score - 2).max(AbilityScoreSet::MIN_SCORE)
    }

    /// Final scores.
    ///
    /// Order matters near 18: ancestry fixed, ancestry free, background
    /// choice, background free, class key, creation free, then level-up
    /// boosts by ascending milestone up to `level`. Flaws land first.
    pub fn resolve(
        ledger: &BoostLedger,
        level: u8,
        ancestry: Option<&AncestryEntry>,
        background: Option<&BackgroundEntry>,
        class: Option<&ClassEntry>,
    ) -> AbilityScoreSet {
        let mut scores = AbilityScoreSet::baseline();
        let boost = |scores: &mut AbilityScoreSet, abilities: &[Ability]| {
            for &ability in abilities {
                scores.set(ability, Self::apply_boost(scores.score(ability)));
            }
        };

        if let Some(ancestry) = ancestry {
            for &flaw in &ancestry.flaws {
                scores.set(flaw, Self::apply_flaw(scores.score(flaw)));
            }
            boost(&mut scores, &ancestry.boosts);
        }

        let free_limit = ancestry
            .map(|a| usize::from(a.free_boosts))
            .unwrap_or(BoostSource::AncestryFree.capacity());
        let ancestry_free = newest(&ledger.ancestry_free, BoostSource::AncestryFree);
        let skip = ancestry_free.len().saturating_sub(free_limit);
        boost(&mut scores, &ancestry_free[skip..]);

        for source in [BoostSource::BackgroundChoice, BoostSource::BackgroundFree] {
            let entries = match source {
                BoostSource::BackgroundChoice => &ledger.background_choice,
                _ => &ledger.background_free,
            };
            let accepted: Vec<Ability> = newest(entries, source)
                .into_iter()
                .filter(|a| Self::accepts(source, *a, background, class))
                .collect();
            boost(&mut scores, &accepted);
        }

        if let Some(key) = Self::key_ability(ledger, class) {
            boost(&mut scores, &[key]);
        }

        boost(
            &mut scores,
            &newest(&ledger.creation_free, BoostSource::CreationFree),
        );

        for milestone in MILESTONE_LEVELS.into_iter().filter(|m| *m <= level) {
            if let Some(entries) = ledger.level_ups.get(&milestone) {
                boost(&mut scores, &newest(entries, BoostSource::Level(milestone)));
            }
        }

        scores
    }

    /// Whether a boost from `source` to `ability` counts for this background
    /// and class. Unknown backgrounds and classes restrict nothing.
    pub fn accepts(
        source: BoostSource,
        ability: Ability,
        background: Option<&BackgroundEntry>,
        class: Option<&ClassEntry>,
    ) -> bool {
        let background_options = background
            .map(|b| b.boost_options.as_slice())
            .unwrap_or(&[]);
        let key_options = class.map(|c| c.key_ability_options.as_slice()).unwrap_or(&[]);
        match source {
            BoostSource::BackgroundChoice => {
                background_options.is_empty() || background_options.contains(&ability)
            }
            BoostSource::BackgroundFree => !background_options.contains(&ability),
            BoostSource::ClassKey => key_options.is_empty() || key_options.contains(&ability),
            _ => true,
        }
    }

    /// The class key ability: the ledger's pick when the class allows it,
    /// otherwise the class's only option.
    pub fn key_ability(ledger: &BoostLedger, class: Option<&ClassEntry>) -> Option<Ability> {
        let options = class.map(|c| c.key_ability_options.as_slice()).unwrap_or(&[]);
        let picked = newest(&ledger.class_key, BoostSource::ClassKey)
            .into_iter()
            .find(|a| Self::accepts(BoostSource::ClassKey, *a, None, class));
        match (picked, options) {
            (Some(ability), _) => Some(ability),
            (None, [only]) => Some(*only),
            _ => None,
        }
    }
}

/// Valid entries of a source, trimmed to its capacity keeping the newest.
fn newest(entries: &[String], source: BoostSource) -> Vec<Ability> {
    let parsed = parse_boosts(entries);
    let skip = parsed.len().saturating_sub(source.capacity());
    parsed[skip..].to_vec()
}
