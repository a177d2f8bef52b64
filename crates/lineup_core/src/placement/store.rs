//! The only mutable state of the engine.
//!
//! Every operation completes under one `&mut self` borrow, so readers never see
//! a half-applied mutation. `revision` advances once per effective change.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use super::record::{PlacementRecord, PlacementRecordShape, PlayerId};
use crate::error::PlacementError;
use crate::field::{ClampRange, NormalizedPos};
use crate::tactics::{classify, FormationTemplate, TacticalRole};

/// player id -> placement record. Ordered so exports are deterministic.
pub type PlacementMap = BTreeMap<PlayerId, PlacementRecord>;

/// Field coordinate given to a player moved onto the field by role.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Validate)]
#[validate(schema(function = "validate_role_defaults"))]
pub struct RoleDefaults {
    pub goalkeeper: NormalizedPos,
    pub defender: NormalizedPos,
    pub midfielder: NormalizedPos,
    pub attacker: NormalizedPos,
    pub substitute: NormalizedPos,
}

impl Default for RoleDefaults {
    fn default() -> Self {
        Self {
            goalkeeper: NormalizedPos::new(50.0, 95.0),
            defender: NormalizedPos::new(50.0, 78.0),
            midfielder: NormalizedPos::new(50.0, 50.0),
            attacker: NormalizedPos::new(50.0, 15.0),
            substitute: NormalizedPos::new(50.0, 50.0),
        }
    }
}

impl RoleDefaults {
    pub fn for_role(&self, role: TacticalRole) -> NormalizedPos {
        match role {
            TacticalRole::Goalkeeper => self.goalkeeper,
            TacticalRole::Defender => self.defender,
            TacticalRole::Midfielder => self.midfielder,
            TacticalRole::Attacker => self.attacker,
            TacticalRole::Substitute => self.substitute,
        }
    }

    fn all(&self) -> [NormalizedPos; 5] {
        [self.goalkeeper, self.defender, self.midfielder, self.attacker, self.substitute]
    }
}

fn validate_role_defaults(defaults: &RoleDefaults) -> Result<(), ValidationError> {
    if defaults.all().iter().all(|pos| pos.is_within(ClampRange::PERCENT)) {
        Ok(())
    } else {
        Err(ValidationError::new("role_default_out_of_field"))
    }
}

#[derive(Debug, Clone, Default)]
pub struct PlacementStore {
    records: PlacementMap,
    field_defaults: RoleDefaults,
    revision: u64,
}

impl PlacementStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_defaults(field_defaults: RoleDefaults) -> Self {
        Self { records: PlacementMap::new(), field_defaults, revision: 0 }
    }

    pub fn records(&self) -> &PlacementMap {
        &self.records
    }

    pub fn get(&self, player: &PlayerId) -> Option<&PlacementRecord> {
        self.records.get(player)
    }

    pub fn contains(&self, player: &PlayerId) -> bool {
        self.records.contains_key(player)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn field_defaults(&self) -> &RoleDefaults {
        &self.field_defaults
    }

    pub fn starters(&self) -> impl Iterator<Item = (&PlayerId, &PlacementRecord)> {
        self.records.iter().filter(|(_, record)| record.is_starter())
    }

    pub fn bench(&self) -> impl Iterator<Item = (&PlayerId, &PlacementRecord)> {
        self.records.iter().filter(|(_, record)| !record.is_starter())
    }

    /// True iff every listed player has a record and holds a field position.
    pub fn all_starters<P: AsRef<PlayerId>>(&self, players: &[P]) -> bool {
        players
            .iter()
            .all(|player| self.get(player.as_ref()).is_some_and(PlacementRecord::is_starter))
    }

    /// Bulk-writes one starter record per player from the matching slot.
    ///
    /// Roles are taken verbatim from the slots. On any mismatch nothing is written.
    /// Players outside `players` keep their records.
    pub fn assign_formation<P: AsRef<PlayerId>>(
        &mut self,
        template: &FormationTemplate,
        players: &[P],
    ) -> Result<(), PlacementError> {
        if !template.verify_for(players.len()) {
            tracing::warn!(
                formation = template.name(),
                slots = template.slots().len(),
                players = players.len(),
                "rejected formation: slot count does not match squad"
            );
            return Err(PlacementError::FormationSizeMismatch {
                expected: template.slots().len(),
                found: players.len(),
            });
        }

        let mut seen = BTreeSet::new();
        for player in players {
            if !seen.insert(player.as_ref()) {
                tracing::warn!(player = %player.as_ref(), "rejected formation: duplicate player");
                return Err(PlacementError::DuplicatePlayer(player.as_ref().to_string()));
            }
        }

        for (player, slot) in players.iter().zip(template.slots()) {
            self.records
                .insert(player.as_ref().clone(), PlacementRecord::starter(slot.role, slot.position()));
        }
        self.revision += 1;

        tracing::info!(formation = template.name(), players = players.len(), "formation assigned");
        Ok(())
    }

    /// Places a player at `pos` (clamped to the field) and re-derives the role from Y.
    pub fn set_position(&mut self, player: &PlayerId, pos: NormalizedPos) -> TacticalRole {
        let pos = pos.clamped(ClampRange::PERCENT);
        let role = classify(pos.y);
        let record = PlacementRecord::starter(role, pos);

        if self.records.get(player) != Some(&record) {
            self.records.insert(player.clone(), record);
            self.revision += 1;
            tracing::debug!(player = %player, x = pos.x, y = pos.y, role = role.short_name(), "position set");
        }
        role
    }

    /// Clears the coordinate but keeps the role (SUB for a player with no record).
    pub fn move_to_bench(&mut self, player: &PlayerId) {
        let role = self.records.get(player).map(PlacementRecord::role).unwrap_or(TacticalRole::Substitute);
        let record = PlacementRecord::bench(role);

        if self.records.get(player) != Some(&record) {
            self.records.insert(player.clone(), record);
            self.revision += 1;
            tracing::debug!(player = %player, role = role.short_name(), "moved to bench");
        }
    }

    /// Puts a player on the field at the configured default coordinate for `role`.
    pub fn move_to_field(&mut self, player: &PlayerId, role: TacticalRole) -> NormalizedPos {
        let pos = self.field_defaults.for_role(role);
        let record = PlacementRecord::starter(role, pos);

        if self.records.get(player) != Some(&record) {
            self.records.insert(player.clone(), record);
            self.revision += 1;
            tracing::debug!(player = %player, role = role.short_name(), "moved to field");
        }
        pos
    }

    pub fn clear(&mut self, player: &PlayerId) -> Option<PlacementRecord> {
        let removed = self.records.remove(player);
        if removed.is_some() {
            self.revision += 1;
        }
        removed
    }

    pub fn clear_all(&mut self) {
        if !self.records.is_empty() {
            self.records.clear();
            self.revision += 1;
            tracing::debug!("all placements cleared");
        }
    }

    /// Replaces every record with a saved map in the persisted shape.
    ///
    /// All records are checked first; one inconsistent record rejects the
    /// whole map and the store is left as it was.
    pub fn load(&mut self, saved: BTreeMap<PlayerId, PlacementRecordShape>) -> Result<(), PlacementError> {
        let records = saved
            .into_iter()
            .map(|(player, shape)| match PlacementRecord::try_from(shape) {
                Ok(record) => Ok((player, record)),
                Err(PlacementError::InvalidRecord(reason)) => {
                    Err(PlacementError::InvalidRecord(format!("{}: {}", player, reason)))
                }
                Err(e) => Err(e),
            })
            .collect::<Result<PlacementMap, PlacementError>>()
            .map_err(|e| {
                tracing::warn!(error = %e, "rejected saved placements");
                e
            })?;

        if records != self.records {
            self.records = records;
            self.revision += 1;
        }
        tracing::debug!(records = self.records.len(), "placements loaded");
        Ok(())
    }

    /// Mirrors the squad selection: new players get an unplaced record,
    /// deselected players lose theirs, everyone else is untouched.
    pub fn sync_selection<P: AsRef<PlayerId>>(&mut self, players: &[P]) {
        let selected: BTreeSet<&PlayerId> = players.iter().map(AsRef::as_ref).collect();
        let before = self.records.len();
        self.records.retain(|player, _| selected.contains(player));
        let mut changed = self.records.len() != before;

        for player in selected {
            if !self.records.contains_key(player) {
                self.records.insert(player.clone(), PlacementRecord::unplaced());
                changed = true;
            }
        }

        if changed {
            self.revision += 1;
            tracing::debug!(selected = self.records.len(), "selection synced");
        }
    }
}
