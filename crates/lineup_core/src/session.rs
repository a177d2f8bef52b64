//! Wizard-facing facade over the placement engine.
//!
//! Owns the ordered selection, the store and the chosen template, and queues
//! the events the hosting wizard reacts to.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::config::LineupConfig;
use crate::error::{self, PlacementError};
use crate::placement::{PlacementMap, PlacementRecordShape, PlacementStore, Player, PlayerId};
use crate::render::RenderInput;
use crate::tactics::{FormationCatalog, FormationTemplate};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LineupEvent {
    /// A template was applied to the whole selection.
    FormationSelected { name: String },
    /// The ordered selection changed size or membership.
    SelectionChanged { size: usize },
}

#[derive(Debug, Clone)]
pub struct LineupSession {
    roster: Vec<Player>,
    store: PlacementStore,
    formation: Option<FormationTemplate>,
    events: Vec<LineupEvent>,
}

impl Default for LineupSession {
    fn default() -> Self {
        Self::new(&LineupConfig::default())
    }
}

impl LineupSession {
    pub fn new(config: &LineupConfig) -> Self {
        Self {
            roster: Vec::new(),
            store: PlacementStore::with_defaults(config.field_defaults),
            formation: None,
            events: Vec::new(),
        }
    }

    pub fn roster(&self) -> &[Player] {
        &self.roster
    }

    pub fn squad_size(&self) -> usize {
        self.roster.len()
    }

    pub fn store(&self) -> &PlacementStore {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut PlacementStore {
        &mut self.store
    }

    pub fn formation(&self) -> Option<&FormationTemplate> {
        self.formation.as_ref()
    }

    /// Replaces the ordered selection; squad size is derived from it alone.
    pub fn set_selection(&mut self, players: Vec<Player>) {
        let unchanged = players.len() == self.roster.len()
            && players.iter().zip(&self.roster).all(|(a, b)| a.id == b.id);

        self.store.sync_selection(&players);
        self.roster = players;

        if self.formation.as_ref().is_some_and(|t| !t.verify_for(self.roster.len())) {
            tracing::debug!("selection size changed, formation selection dropped");
            self.formation = None;
        }
        if !unchanged {
            self.events.push(LineupEvent::SelectionChanged { size: self.roster.len() });
        }
    }

    pub fn suggestions(&self) -> &'static [FormationTemplate] {
        FormationCatalog::global().suggestions(self.roster.len())
    }

    /// Looks up `name` for the current squad size and applies it to the whole selection.
    pub fn select_formation(&mut self, name: &str) -> Result<(), PlacementError> {
        let template = FormationCatalog::global().find(self.roster.len(), name).ok_or_else(|| {
            PlacementError::UnknownFormation { name: name.to_string(), squad_size: self.roster.len() }
        })?;
        self.apply_template(template.clone())
    }

    /// Applies an arbitrary template. Nothing changes if it does not fit the selection.
    pub fn apply_template(&mut self, template: FormationTemplate) -> Result<(), PlacementError> {
        self.store.assign_formation(&template, &self.roster)?;
        self.events.push(LineupEvent::FormationSelected { name: template.name().to_string() });
        self.formation = Some(template);
        Ok(())
    }

    /// "Next step" gate: a non-empty selection with every player on the field.
    pub fn is_ready(&self) -> bool {
        !self.roster.is_empty() && self.store.all_starters(&self.roster)
    }

    /// Players still waiting for a field position, in selection order.
    pub fn unplaced(&self) -> Vec<&PlayerId> {
        self.roster
            .iter()
            .map(|player| &player.id)
            .filter(|id| !self.store.get(id).is_some_and(|record| record.is_starter()))
            .collect()
    }

    /// Record map handed to the persistence collaborator on final save.
    pub fn placement_map(&self) -> &PlacementMap {
        self.store.records()
    }

    pub fn export_json(&self) -> error::Result<String> {
        Ok(serde_json::to_string(self.store.records())?)
    }

    /// Shows a saved team: replaces the placements of the current selection.
    ///
    /// Works in read-only mode too; only the host's interaction wiring is
    /// detached there. Records for players outside the selection are rejected,
    /// selected players missing from `saved` stay unplaced.
    pub fn load_placements(
        &mut self,
        saved: BTreeMap<PlayerId, PlacementRecordShape>,
    ) -> Result<(), PlacementError> {
        if let Some(stranger) = saved.keys().find(|id| !self.roster.iter().any(|player| &player.id == *id)) {
            return Err(PlacementError::InvalidRecord(format!("player {} is not selected", stranger)));
        }

        self.store.load(saved)?;
        self.store.sync_selection(&self.roster);
        self.formation = None;
        Ok(())
    }

    /// `load_placements` from the persisted JSON map.
    pub fn load_placements_json(&mut self, json: &str) -> error::Result<()> {
        let saved: BTreeMap<PlayerId, PlacementRecordShape> = serde_json::from_str(json)?;
        self.load_placements(saved)?;
        Ok(())
    }

    pub fn render_input(&self) -> RenderInput<'_> {
        RenderInput::new(&self.store, &self.roster).with_template(self.formation.as_ref())
    }

    pub fn drain_events(&mut self) -> Vec<LineupEvent> {
        std::mem::take(&mut self.events)
    }

    /// Clears positions of the whole selection, keeping everyone selected.
    pub fn clear_positions(&mut self) {
        self.store.clear_all();
        self.store.sync_selection(&self.roster);
        self.formation = None;
    }
}
