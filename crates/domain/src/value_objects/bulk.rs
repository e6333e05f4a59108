//! Bulk - the abstract carrying-capacity unit.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Bulk of a single item.
///
/// Snapshots write negligible items as `"-"`, light items as `"L"` and
/// everything else as a whole number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Bulk {
    /// Too small to count
    #[default]
    Negligible,
    /// A tenth of one bulk
    Light,
    Whole(u32),
}

impl Bulk {
    /// Light items per whole bulk.
    pub const LIGHT_PER_BULK: u32 = 10;

    /// Bulk in tenths, the unit encumbrance sums in.
    pub fn tenths(&self) -> u32 {
        match self {
            Bulk::Negligible => 0,
            Bulk::Light => 1,
            Bulk::Whole(n) => n.saturating_mul(Self::LIGHT_PER_BULK),
        }
    }
}

impl Serialize for Bulk {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Bulk::Negligible => serializer.serialize_str("-"),
            Bulk::Light => serializer.serialize_str("L"),
            Bulk::Whole(n) => serializer.serialize_u32(*n),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawBulk {
    Number(u32),
    Text(String),
}

impl<'de> Deserialize<'de> for Bulk {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match RawBulk::deserialize(deserializer)? {
            RawBulk::Number(0) => Ok(Bulk::Negligible),
            RawBulk::Number(n) => Ok(Bulk::Whole(n)),
            RawBulk::Text(text) => match text.trim() {
                "" | "-" | "—" => Ok(Bulk::Negligible),
                "L" | "l" => Ok(Bulk::Light),
                other => other
                    .parse::<u32>()
                    .map(|n| if n == 0 { Bulk::Negligible } else { Bulk::Whole(n) })
                    .map_err(|_| serde::de::Error::custom(format!("invalid bulk: {}", other))),
            },
        }
    }
}
