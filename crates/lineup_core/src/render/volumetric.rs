//! Volumetric scene view. Presentation (meshes, textures, lighting) is left to a
//! `SceneBackend`; this adapter only lays markers out in world space.

use nalgebra::Point3;
use serde::Serialize;

use super::{label_for, BenchEntry, Frame, RenderAdapter, RenderInput, RendererKind};
use crate::error::RenderingFault;
use crate::field::{to_world, FieldBounds, FieldGeometry};
use crate::placement::PlayerId;
use crate::tactics::TacticalRole;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SceneMarker {
    pub player_id: PlayerId,
    pub label: String,
    pub role: TacticalRole,
    pub position: Point3<f32>,
    pub draggable: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VolumetricFrame {
    pub revision: u64,
    pub formation: Option<String>,
    pub geometry: FieldGeometry,
    pub markers: Vec<SceneMarker>,
    pub bench: Vec<BenchEntry>,
}

/// Presents laid-out markers. Any error here is a rendering fault.
pub trait SceneBackend {
    fn present(&mut self, markers: &[SceneMarker]) -> Result<(), RenderingFault>;
}

/// Backend that keeps counters only; used when no graphics context is attached.
#[derive(Debug, Clone, Default)]
pub struct HeadlessScene {
    frames_presented: u64,
    last_marker_count: usize,
}

impl HeadlessScene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn frames_presented(&self) -> u64 {
        self.frames_presented
    }

    pub fn last_marker_count(&self) -> usize {
        self.last_marker_count
    }
}

impl SceneBackend for HeadlessScene {
    fn present(&mut self, markers: &[SceneMarker]) -> Result<(), RenderingFault> {
        self.frames_presented += 1;
        self.last_marker_count = markers.len();
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct VolumetricRenderer<S: SceneBackend> {
    geometry: FieldGeometry,
    scene: S,
}

impl<S: SceneBackend> VolumetricRenderer<S> {
    pub fn new(geometry: FieldGeometry, scene: S) -> Self {
        Self { geometry, scene }
    }

    pub fn geometry(&self) -> &FieldGeometry {
        &self.geometry
    }

    pub fn scene(&self) -> &S {
        &self.scene
    }

    pub fn scene_mut(&mut self) -> &mut S {
        &mut self.scene
    }

    pub fn layout(&self, input: &RenderInput<'_>) -> VolumetricFrame {
        let labels = input.labels();
        let markers = input
            .store
            .starters()
            .filter_map(|(id, record)| {
                let pos = record.position()?;
                Some(SceneMarker {
                    player_id: id.clone(),
                    label: label_for(&labels, id),
                    role: record.role(),
                    position: to_world(pos, &self.geometry),
                    draggable: input.interactive,
                })
            })
            .collect();

        VolumetricFrame {
            revision: input.store.revision(),
            formation: input.formation_name(),
            geometry: self.geometry,
            markers,
            bench: input.bench(),
        }
    }
}

impl<S: SceneBackend> RenderAdapter for VolumetricRenderer<S> {
    fn kind(&self) -> RendererKind {
        RendererKind::Volumetric
    }

    /// Pointer positions arrive as ground-plane hits in world units.
    fn field_bounds(&self) -> FieldBounds {
        self.geometry.bounds()
    }

    fn render(&mut self, input: &RenderInput<'_>) -> Result<Frame, RenderingFault> {
        let frame = self.layout(input);
        self.scene.present(&frame.markers)?;
        Ok(Frame::Volumetric(frame))
    }
}
