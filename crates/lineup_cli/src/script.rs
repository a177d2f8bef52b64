//! Scripted lineup sessions.
//!
//! A script is a JSON array of steps tagged by `op`. Pointer coordinates are in
//! the active renderer's field space, the same space a hosting page would report.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{bail, Context, Result};
use lineup_core::field::FieldBounds;
use lineup_core::placement::PlacementRecordShape;
use lineup_core::render::{HeadlessScene, PointerOutcome};
use lineup_core::{DualRenderer, Frame, LineupConfig, LineupEvent, LineupSession, PlacementMap, Player, PlayerId, TacticalRole};
use nalgebra::Point2;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Step {
    Select { players: Vec<Player> },
    Formation { name: String },
    /// Saved placements of the current selection, in the persisted shape.
    Load { placements: BTreeMap<PlayerId, PlacementRecordShape> },
    /// Pointer down on the first point, moves through the rest, up on the last.
    Drag { player: PlayerId, path: Vec<[f32; 2]> },
    Place { player: PlayerId, x: f32, y: f32 },
    Bench { player: PlayerId },
    Field { player: PlayerId, role: TacticalRole },
    Toggle,
    ReadOnly { enabled: bool },
    Render,
}

#[derive(Debug, Serialize)]
pub struct ScriptReport {
    pub placements: PlacementMap,
    pub ready: bool,
    pub events: Vec<LineupEvent>,
    pub frame: Option<Frame>,
    pub notice: Option<String>,
}

pub fn load_steps(path: &Path) -> Result<Vec<Step>> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read script {}", path.display()))?;
    serde_json::from_str(&json).with_context(|| format!("failed to parse script {}", path.display()))
}

pub struct ScriptRunner {
    session: LineupSession,
    view: DualRenderer,
    events: Vec<LineupEvent>,
    frame: Option<Frame>,
}

impl ScriptRunner {
    pub fn new(config: &LineupConfig) -> Self {
        Self {
            session: LineupSession::new(config),
            view: DualRenderer::new(config, FieldBounds::percent(), HeadlessScene::default(), false),
            events: Vec::new(),
            frame: None,
        }
    }

    pub fn run(mut self, steps: &[Step]) -> Result<ScriptReport> {
        for (index, step) in steps.iter().enumerate() {
            tracing::debug!(index, step = ?step, "running step");
            self.apply(step).with_context(|| format!("step {} failed", index + 1))?;
            self.events.extend(self.session.drain_events());
        }

        Ok(ScriptReport {
            placements: self.session.placement_map().clone(),
            ready: self.session.is_ready(),
            events: self.events,
            frame: self.frame,
            notice: self.view.notice(),
        })
    }

    fn apply(&mut self, step: &Step) -> Result<()> {
        match step {
            Step::Select { players } => {
                self.view.teardown();
                self.session.set_selection(players.clone());
            }
            Step::Formation { name } => {
                self.ensure_editable()?;
                self.session.select_formation(name)?;
            }
            Step::Load { placements } => {
                self.view.teardown();
                self.session.load_placements(placements.clone())?;
            }
            Step::Drag { player, path } => {
                let Some((first, rest)) = path.split_first() else {
                    bail!("drag path for {} is empty", player);
                };
                let outcome = self.view.pointer_down(player, point(first), self.session.store());
                if outcome != PointerOutcome::DragStarted {
                    bail!("could not start dragging {} ({:?})", player, outcome);
                }
                for p in rest {
                    self.view.pointer_move(point(p), self.session.store_mut());
                }
                let last = rest.last().unwrap_or(first);
                self.view.pointer_up(point(last), self.session.store_mut());
            }
            Step::Place { player, x, y } => {
                let at = Point2::new(*x, *y);
                let outcome = self.view.pointer_down(player, at, self.session.store());
                if outcome != PointerOutcome::PlacementArmed {
                    bail!("{} cannot be placed from the list ({:?})", player, outcome);
                }
                self.view.pointer_up(at, self.session.store_mut());
            }
            Step::Bench { player } => {
                self.ensure_selected(player)?;
                self.view.teardown();
                self.session.store_mut().move_to_bench(player);
            }
            Step::Field { player, role } => {
                self.ensure_selected(player)?;
                self.view.teardown();
                self.session.store_mut().move_to_field(player, *role);
            }
            Step::Toggle => {
                let active = self.view.toggle();
                tracing::info!(renderer = ?active, "renderer toggled");
            }
            Step::ReadOnly { enabled } => self.view.set_read_only(*enabled),
            Step::Render => {
                self.frame = Some(self.view.render(self.session.render_input()));
            }
        }
        Ok(())
    }

    fn ensure_editable(&self) -> Result<()> {
        if self.view.is_read_only() {
            bail!("lineup is read-only");
        }
        Ok(())
    }

    fn ensure_selected(&self, player: &PlayerId) -> Result<()> {
        self.ensure_editable()?;
        if !self.session.store().contains(player) {
            bail!("player {} is not selected", player);
        }
        Ok(())
    }
}

fn point(p: &[f32; 2]) -> Point2<f32> {
    Point2::new(p[0], p[1])
}
