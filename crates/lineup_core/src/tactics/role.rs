use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::field::ClampRange;

/// Lower edge of the goalkeeper zone (own goal line is Y = 100)
pub const GK_ZONE_START: f32 = 90.0;
/// Lower edge of the defensive zone
pub const DEF_ZONE_START: f32 = 70.0;
/// Lower edge of the midfield zone; everything above it is attack
pub const MID_ZONE_START: f32 = 20.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema)]
pub enum TacticalRole {
    #[serde(rename = "GK")]
    Goalkeeper,
    #[serde(rename = "DEF")]
    Defender,
    #[serde(rename = "MID")]
    Midfielder,
    #[serde(rename = "ATT")]
    Attacker,
    #[serde(rename = "SUB")]
    Substitute,
}

impl TacticalRole {
    pub const FIELD_ROLES: [TacticalRole; 4] =
        [Self::Goalkeeper, Self::Defender, Self::Midfielder, Self::Attacker];

    pub fn short_name(&self) -> &'static str {
        match self {
            Self::Goalkeeper => "GK",
            Self::Defender => "DEF",
            Self::Midfielder => "MID",
            Self::Attacker => "ATT",
            Self::Substitute => "SUB",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Goalkeeper => "Goalkeeper",
            Self::Defender => "Defender",
            Self::Midfielder => "Midfielder",
            Self::Attacker => "Attacker",
            Self::Substitute => "Substitute",
        }
    }

    /// Parses the short code used on the wire ("GK", "DEF", ...). Case-insensitive.
    pub fn from_short_name(code: &str) -> Option<Self> {
        match code.trim().to_ascii_uppercase().as_str() {
            "GK" => Some(Self::Goalkeeper),
            "DEF" => Some(Self::Defender),
            "MID" => Some(Self::Midfielder),
            "ATT" => Some(Self::Attacker),
            "SUB" => Some(Self::Substitute),
            _ => None,
        }
    }
}

/// Tactical role from the vertical coordinate alone.
///
/// Out-of-domain input is clamped to [0, 100] first (NaN reads as 0).
pub fn classify(y: f32) -> TacticalRole {
    let y = ClampRange::PERCENT.clamp(y);
    if y >= GK_ZONE_START {
        TacticalRole::Goalkeeper
    } else if y >= DEF_ZONE_START {
        TacticalRole::Defender
    } else if y >= MID_ZONE_START {
        TacticalRole::Midfielder
    } else {
        TacticalRole::Attacker
    }
}
