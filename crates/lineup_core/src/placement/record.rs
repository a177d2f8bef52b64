use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::PlacementError;
use crate::field::{ClampRange, NormalizedPos};
use crate::tactics::TacticalRole;

/// Opaque player identifier owned by the roster collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct PlayerId(String);

impl PlayerId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PlayerId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for PlayerId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl AsRef<PlayerId> for PlayerId {
    fn as_ref(&self) -> &PlayerId {
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
}

impl Player {
    pub fn new(id: impl Into<PlayerId>, name: impl Into<String>) -> Self {
        Self { id: id.into(), name: name.into() }
    }
}

impl AsRef<PlayerId> for Player {
    fn as_ref(&self) -> &PlayerId {
        &self.id
    }
}

/// Where one selected player stands.
///
/// A starter always holds a position inside [0, 100]; a bench player never does.
/// The type makes the two states unrepresentable any other way.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(into = "PlacementRecordShape", try_from = "PlacementRecordShape")]
pub struct PlacementRecord {
    role: TacticalRole,
    position: Option<NormalizedPos>,
}

impl PlacementRecord {
    pub fn starter(role: TacticalRole, position: NormalizedPos) -> Self {
        Self { role, position: Some(position.clamped(ClampRange::PERCENT)) }
    }

    pub fn bench(role: TacticalRole) -> Self {
        Self { role, position: None }
    }

    /// Freshly selected player with no position yet.
    pub fn unplaced() -> Self {
        Self::bench(TacticalRole::Substitute)
    }

    pub fn role(&self) -> TacticalRole {
        self.role
    }

    pub fn position(&self) -> Option<NormalizedPos> {
        self.position
    }

    pub fn is_starter(&self) -> bool {
        self.position.is_some()
    }

    pub fn x(&self) -> Option<f32> {
        self.position.map(|pos| pos.x)
    }

    pub fn y(&self) -> Option<f32> {
        self.position.map(|pos| pos.y)
    }
}

/// Logical record shape handed to the persistence collaborator:
/// `{x?, y?, role, isStarter}`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct PlacementRecordShape {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<f32>,
    pub role: TacticalRole,
    pub is_starter: bool,
}

impl From<PlacementRecord> for PlacementRecordShape {
    fn from(record: PlacementRecord) -> Self {
        Self { x: record.x(), y: record.y(), role: record.role, is_starter: record.is_starter() }
    }
}

impl TryFrom<PlacementRecordShape> for PlacementRecord {
    type Error = PlacementError;

    fn try_from(shape: PlacementRecordShape) -> Result<Self, Self::Error> {
        match (shape.is_starter, shape.x, shape.y) {
            (true, Some(x), Some(y)) => {
                let pos = NormalizedPos::new(x, y);
                if !(x.is_finite() && y.is_finite() && pos.is_within(ClampRange::PERCENT)) {
                    return Err(PlacementError::InvalidRecord(format!(
                        "starter position ({x}, {y}) outside [0, 100]"
                    )));
                }
                Ok(Self { role: shape.role, position: Some(pos) })
            }
            (true, _, _) => {
                Err(PlacementError::InvalidRecord("starter without x/y".to_string()))
            }
            (false, None, None) => Ok(Self::bench(shape.role)),
            (false, _, _) => {
                Err(PlacementError::InvalidRecord("bench player with x/y".to_string()))
            }
        }
    }
}
