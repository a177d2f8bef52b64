//! Two view adapters over the same placement state.
//!
//! Both read the store and the selected template on every paint and keep no
//! private copy of placements. `DualRenderer` chooses between them and owns the
//! interaction wiring.

pub mod host;
pub mod planar;
pub mod volumetric;

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::error::RenderingFault;
use crate::field::{world_to_normalized, ClampRange, FieldBounds, NormalizedPos};
use crate::placement::{PlacementStore, Player, PlayerId};
use crate::tactics::{FormationTemplate, TacticalRole};

pub use host::{DualRenderer, PointerOutcome};
pub use planar::{PlanarFrame, PlanarMarker, PlanarRenderer};
pub use volumetric::{HeadlessScene, SceneBackend, SceneMarker, VolumetricFrame, VolumetricRenderer};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RendererKind {
    Planar,
    Volumetric,
}

impl RendererKind {
    pub fn other(self) -> Self {
        match self {
            RendererKind::Planar => RendererKind::Volumetric,
            RendererKind::Volumetric => RendererKind::Planar,
        }
    }
}

/// Everything an adapter may read for one paint.
#[derive(Debug, Clone, Copy)]
pub struct RenderInput<'a> {
    pub store: &'a PlacementStore,
    pub roster: &'a [Player],
    pub template: Option<&'a FormationTemplate>,
    /// False when the host has no interaction wiring (read-only).
    pub interactive: bool,
}

impl<'a> RenderInput<'a> {
    pub fn new(store: &'a PlacementStore, roster: &'a [Player]) -> Self {
        Self { store, roster, template: None, interactive: true }
    }

    pub fn with_template(mut self, template: Option<&'a FormationTemplate>) -> Self {
        self.template = template;
        self
    }

    pub fn interactive(mut self, interactive: bool) -> Self {
        self.interactive = interactive;
        self
    }

    pub(crate) fn labels(&self) -> HashMap<&'a PlayerId, &'a str> {
        self.roster.iter().map(|player| (&player.id, player.name.as_str())).collect()
    }

    pub(crate) fn formation_name(&self) -> Option<String> {
        self.template.map(|template| template.name().to_string())
    }

    pub(crate) fn bench(&self) -> Vec<BenchEntry> {
        let labels = self.labels();
        self.store
            .bench()
            .map(|(id, record)| BenchEntry {
                player_id: id.clone(),
                label: label_for(&labels, id),
                role: record.role(),
                placeable: self.interactive,
            })
            .collect()
    }
}

pub(crate) fn label_for(labels: &HashMap<&PlayerId, &str>, id: &PlayerId) -> String {
    labels.get(id).map(|name| name.to_string()).unwrap_or_else(|| id.to_string())
}

/// Bench list item, rendered identically by both adapters.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BenchEntry {
    pub player_id: PlayerId,
    pub label: String,
    pub role: TacticalRole,
    /// Whether the place-from-list gesture is wired.
    pub placeable: bool,
}

/// Output of one paint, tagged by the adapter that produced it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "renderer", rename_all = "snake_case")]
pub enum Frame {
    Planar(PlanarFrame),
    Volumetric(VolumetricFrame),
}

impl Frame {
    pub fn kind(&self) -> RendererKind {
        match self {
            Frame::Planar(_) => RendererKind::Planar,
            Frame::Volumetric(_) => RendererKind::Volumetric,
        }
    }

    /// Store revision this frame was painted from.
    pub fn revision(&self) -> u64 {
        match self {
            Frame::Planar(frame) => frame.revision,
            Frame::Volumetric(frame) => frame.revision,
        }
    }

    pub fn bench(&self) -> &[BenchEntry] {
        match self {
            Frame::Planar(frame) => &frame.bench,
            Frame::Volumetric(frame) => &frame.bench,
        }
    }

    pub fn marker_count(&self) -> usize {
        match self {
            Frame::Planar(frame) => frame.markers.len(),
            Frame::Volumetric(frame) => frame.markers.len(),
        }
    }

    /// Whether any marker accepts drag input.
    pub fn has_draggable_markers(&self) -> bool {
        match self {
            Frame::Planar(frame) => frame.markers.iter().any(|marker| marker.draggable),
            Frame::Volumetric(frame) => frame.markers.iter().any(|marker| marker.draggable),
        }
    }

    /// Marker positions mapped back to normalized coordinates, for comparing adapters.
    pub fn normalized_positions(&self) -> BTreeMap<PlayerId, (TacticalRole, NormalizedPos)> {
        match self {
            Frame::Planar(frame) => frame
                .markers
                .iter()
                .map(|m| (m.player_id.clone(), (m.role, NormalizedPos::new(m.left_pct, m.top_pct))))
                .collect(),
            Frame::Volumetric(frame) => frame
                .markers
                .iter()
                .map(|m| {
                    let pos = world_to_normalized(&m.position, &frame.geometry, ClampRange::PERCENT);
                    (m.player_id.clone(), (m.role, pos))
                })
                .collect(),
        }
    }
}

/// A view back-end. Rendering reads placement state and never writes it.
pub trait RenderAdapter {
    fn kind(&self) -> RendererKind;

    /// Rectangle in which this adapter reports pointer positions.
    fn field_bounds(&self) -> FieldBounds;

    fn render(&mut self, input: &RenderInput<'_>) -> Result<Frame, RenderingFault>;
}
