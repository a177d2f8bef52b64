//! Flat overlay view: markers positioned by percentage over a field image.

use serde::Serialize;

use super::{label_for, BenchEntry, Frame, RenderAdapter, RenderInput, RendererKind};
use crate::error::RenderingFault;
use crate::field::FieldBounds;
use crate::placement::PlayerId;
use crate::tactics::TacticalRole;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlanarMarker {
    pub player_id: PlayerId,
    pub label: String,
    pub role: TacticalRole,
    /// Horizontal offset as a percentage of the overlay width
    pub left_pct: f32,
    /// Vertical offset as a percentage of the overlay height
    pub top_pct: f32,
    pub draggable: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlanarFrame {
    pub revision: u64,
    pub formation: Option<String>,
    pub markers: Vec<PlanarMarker>,
    pub bench: Vec<BenchEntry>,
}

#[derive(Debug, Clone)]
pub struct PlanarRenderer {
    viewport: FieldBounds,
}

impl PlanarRenderer {
    /// `viewport` is the overlay's on-screen rectangle, in the same space as pointer events.
    pub fn new(viewport: FieldBounds) -> Self {
        Self { viewport }
    }

    pub fn set_viewport(&mut self, viewport: FieldBounds) {
        self.viewport = viewport;
    }

    pub fn paint(&self, input: &RenderInput<'_>) -> PlanarFrame {
        let labels = input.labels();
        let markers = input
            .store
            .starters()
            .filter_map(|(id, record)| {
                let pos = record.position()?;
                Some(PlanarMarker {
                    player_id: id.clone(),
                    label: label_for(&labels, id),
                    role: record.role(),
                    left_pct: pos.x,
                    top_pct: pos.y,
                    draggable: input.interactive,
                })
            })
            .collect();

        PlanarFrame {
            revision: input.store.revision(),
            formation: input.formation_name(),
            markers,
            bench: input.bench(),
        }
    }
}

impl RenderAdapter for PlanarRenderer {
    fn kind(&self) -> RendererKind {
        RendererKind::Planar
    }

    fn field_bounds(&self) -> FieldBounds {
        self.viewport
    }

    fn render(&mut self, input: &RenderInput<'_>) -> Result<Frame, RenderingFault> {
        Ok(Frame::Planar(self.paint(input)))
    }
}
