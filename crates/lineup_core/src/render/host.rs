//! Hosts both adapters, switches between them and owns interaction wiring.
//!
//! Fallback contract: a volumetric fault switches to planar for the same paint,
//! leaves a persistent notice, and the host never switches back on its own.
//! Read-only mode drops the wiring entirely; there is no mutation path left.

use nalgebra::Point2;
use serde::Serialize;

use super::planar::PlanarRenderer;
use super::volumetric::{HeadlessScene, SceneBackend, VolumetricRenderer};
use super::{Frame, RenderAdapter, RenderInput, RendererKind};
use crate::config::LineupConfig;
use crate::error::RenderingFault;
use crate::field::{ClampRange, FieldBounds};
use crate::interaction::{CursorStyle, DragController, ListenerKind, ListenerRegistry, PlaceFromList};
use crate::placement::{PlacementStore, PlayerId};
use crate::tactics::TacticalRole;

/// What a pointer-down on a player resolved to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PointerOutcome {
    /// Read-only, unknown player, or a gesture already in progress.
    Ignored,
    DragStarted,
    /// Bench player armed for the place-from-list drop.
    PlacementArmed,
}

#[derive(Debug)]
struct InteractionWiring {
    drag: DragController,
    place: PlaceFromList,
}

#[derive(Debug)]
pub struct DualRenderer<S: SceneBackend = HeadlessScene> {
    planar: PlanarRenderer,
    volumetric: VolumetricRenderer<S>,
    active: RendererKind,
    fault: Option<RenderingFault>,
    registry: ListenerRegistry,
    wiring: Option<InteractionWiring>,
    drag_clamp: ClampRange,
    place_clamp: ClampRange,
}

impl<S: SceneBackend> DualRenderer<S> {
    /// `viewport` is the planar overlay rectangle in pointer-event space.
    pub fn new(config: &LineupConfig, viewport: FieldBounds, scene: S, read_only: bool) -> Self {
        let mut host = Self {
            planar: PlanarRenderer::new(viewport),
            volumetric: VolumetricRenderer::new(config.geometry, scene),
            active: config.initial_renderer,
            fault: None,
            registry: ListenerRegistry::new(),
            wiring: None,
            drag_clamp: config.drag_clamp,
            place_clamp: config.place_clamp,
        };
        host.set_read_only(read_only);
        host
    }

    pub fn active(&self) -> RendererKind {
        self.active
    }

    pub fn fault(&self) -> Option<&RenderingFault> {
        self.fault.as_ref()
    }

    pub fn has_faulted(&self) -> bool {
        self.fault.is_some()
    }

    /// Persistent, non-blocking notice shown once the volumetric view has failed.
    pub fn notice(&self) -> Option<String> {
        self.fault
            .as_ref()
            .map(|fault| format!("3D view unavailable ({}); showing the 2D field instead.", fault.kind))
    }

    pub fn is_read_only(&self) -> bool {
        self.wiring.is_none()
    }

    pub fn registry(&self) -> &ListenerRegistry {
        &self.registry
    }

    pub fn volumetric(&self) -> &VolumetricRenderer<S> {
        &self.volumetric
    }

    pub fn volumetric_mut(&mut self) -> &mut VolumetricRenderer<S> {
        &mut self.volumetric
    }

    pub fn set_viewport(&mut self, viewport: FieldBounds) {
        self.planar.set_viewport(viewport);
    }

    /// Pointer-event rectangle of the active adapter.
    pub fn field_bounds(&self) -> FieldBounds {
        match self.active {
            RendererKind::Planar => self.planar.field_bounds(),
            RendererKind::Volumetric => self.volumetric.field_bounds(),
        }
    }

    pub fn cursor(&self) -> CursorStyle {
        self.wiring.as_ref().map(|w| w.drag.cursor()).unwrap_or(CursorStyle::Default)
    }

    pub fn is_dragging(&self) -> bool {
        self.wiring.as_ref().is_some_and(|w| w.drag.is_dragging())
    }

    /// Paints with the active adapter, falling back to planar on a volumetric fault.
    pub fn render(&mut self, input: RenderInput<'_>) -> Frame {
        let input = input.interactive(self.wiring.is_some());

        if self.active == RendererKind::Volumetric {
            match self.volumetric.render(&input) {
                Ok(frame) => return frame,
                Err(fault) => self.fall_back(fault),
            }
        }
        Frame::Planar(self.planar.paint(&input))
    }

    fn fall_back(&mut self, fault: RenderingFault) {
        tracing::warn!(kind = %fault.kind, message = %fault.message, "volumetric view failed, falling back to planar");
        self.teardown();
        self.active = RendererKind::Planar;
        self.fault = Some(fault);
    }

    /// Manual switch. Always allowed, including after a fault.
    pub fn set_renderer(&mut self, kind: RendererKind) {
        if self.active == kind {
            return;
        }
        self.teardown();
        self.active = kind;
        tracing::info!(renderer = ?kind, "renderer switched");
    }

    pub fn toggle(&mut self) -> RendererKind {
        self.set_renderer(self.active.other());
        self.active
    }

    /// Read-only detaches drag and place-from-list wiring; leaving it re-attaches fresh wiring.
    pub fn set_read_only(&mut self, read_only: bool) {
        match (read_only, self.wiring.is_some()) {
            (true, true) => {
                self.teardown();
                self.wiring = None;
                tracing::debug!("interaction detached");
            }
            (false, false) => {
                self.wiring = Some(InteractionWiring {
                    drag: DragController::new(self.registry.clone(), self.drag_clamp),
                    place: PlaceFromList::new(self.place_clamp),
                });
                tracing::debug!("interaction attached");
            }
            _ => {}
        }
    }

    /// Starters start a drag; bench players arm place-from-list.
    pub fn pointer_down(
        &mut self,
        player: &PlayerId,
        pointer: Point2<f32>,
        store: &PlacementStore,
    ) -> PointerOutcome {
        let bounds = self.field_bounds();
        let Some(wiring) = self.wiring.as_mut() else {
            return PointerOutcome::Ignored;
        };
        if wiring.drag.is_dragging() {
            return PointerOutcome::Ignored;
        }

        let outcome = match store.get(player) {
            Some(record) if record.is_starter() => {
                if wiring.drag.pointer_down(player, pointer, &bounds, store) {
                    PointerOutcome::DragStarted
                } else {
                    PointerOutcome::Ignored
                }
            }
            Some(_) => {
                if wiring.place.begin(player, store) {
                    PointerOutcome::PlacementArmed
                } else {
                    PointerOutcome::Ignored
                }
            }
            None => PointerOutcome::Ignored,
        };

        // Only the latest pointer-down may own the pending drop.
        if outcome != PointerOutcome::PlacementArmed {
            wiring.place.cancel();
        }
        outcome
    }

    /// Dispatched only while the drag's move listener is registered.
    pub fn pointer_move(&mut self, pointer: Point2<f32>, store: &mut PlacementStore) -> Option<TacticalRole> {
        if !self.registry.is_registered(ListenerKind::PointerMove) {
            return None;
        }
        let bounds = self.field_bounds();
        let wiring = self.wiring.as_mut()?;
        wiring.drag.pointer_move(pointer, &bounds, store)
    }

    /// Ends a drag through its up listener, or drops an armed bench player at `pointer`.
    pub fn pointer_up(&mut self, pointer: Point2<f32>, store: &mut PlacementStore) -> Option<PlayerId> {
        let bounds = self.field_bounds();
        let listening = self.registry.is_registered(ListenerKind::PointerUp);
        let wiring = self.wiring.as_mut()?;
        if listening {
            return wiring.drag.pointer_up();
        }
        wiring.place.drop_at(pointer, &bounds, store).map(|(player, _)| player)
    }

    /// Forced return to Idle (unmount, mode switch). Discards any gesture in flight.
    pub fn teardown(&mut self) {
        if let Some(wiring) = self.wiring.as_mut() {
            wiring.drag.teardown();
            wiring.place.cancel();
        }
    }
}

impl<S: SceneBackend> Drop for DualRenderer<S> {
    fn drop(&mut self) {
        self.teardown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FaultKind;
    use crate::field::NormalizedPos;
    use crate::placement::Player;
    use crate::render::SceneMarker;
    use crate::tactics::FormationCatalog;

    /// Fails every present call once `fail` is set.
    #[derive(Debug, Default)]
    struct FlakyScene {
        fail: bool,
        presented: u32,
    }

    impl SceneBackend for FlakyScene {
        fn present(&mut self, _markers: &[SceneMarker]) -> Result<(), RenderingFault> {
            if self.fail {
                return Err(RenderingFault::new(FaultKind::ContextLost, "gpu context lost"));
            }
            self.presented += 1;
            Ok(())
        }
    }

    fn roster() -> Vec<Player> {
        (1..=6).map(|i| Player::new(format!("p{i}"), format!("Player {i}"))).collect()
    }

    fn formed_store(roster: &[Player]) -> PlacementStore {
        let mut store = PlacementStore::new();
        store.sync_selection(roster);
        let template = FormationCatalog::global().find(6, "1-4-1").unwrap();
        store.assign_formation(template, roster).unwrap();
        store
    }

    fn host<S: SceneBackend>(scene: S, read_only: bool) -> DualRenderer<S> {
        DualRenderer::new(&LineupConfig::default(), FieldBounds::percent(), scene, read_only)
    }

    #[test]
    fn test_both_adapters_agree() {
        let roster = roster();
        let store = formed_store(&roster);
        let template = FormationCatalog::global().find(6, "1-4-1");
        let mut host = host(HeadlessScene::new(), false);

        let volumetric = host.render(RenderInput::new(&store, &roster).with_template(template));
        host.set_renderer(RendererKind::Planar);
        let planar = host.render(RenderInput::new(&store, &roster).with_template(template));

        assert_eq!(volumetric.kind(), RendererKind::Volumetric);
        assert_eq!(planar.kind(), RendererKind::Planar);
        let a = volumetric.normalized_positions();
        let b = planar.normalized_positions();
        assert_eq!(a.len(), 6);
        for (id, (role, pos)) in &a {
            let (other_role, other_pos) = b[id];
            assert_eq!(*role, other_role);
            assert!(pos.distance(&other_pos) < 1e-3, "{id} differs: {pos:?} vs {other_pos:?}");
        }
    }

    #[test]
    fn test_fault_falls_back_and_keeps_state() {
        let roster = roster();
        let store = formed_store(&roster);
        let before = store.records().clone();
        let mut host = host(FlakyScene { fail: true, presented: 0 }, false);

        let frame = host.render(RenderInput::new(&store, &roster));

        assert_eq!(frame.kind(), RendererKind::Planar);
        assert_eq!(frame.marker_count(), 6);
        assert_eq!(host.active(), RendererKind::Planar);
        assert!(host.has_faulted());
        assert!(host.notice().unwrap().contains("context lost"));
        assert_eq!(store.records(), &before);
    }

    #[test]
    fn test_no_automatic_revert_after_fault() {
        let roster = roster();
        let store = formed_store(&roster);
        let mut host = host(FlakyScene { fail: true, presented: 0 }, false);
        host.render(RenderInput::new(&store, &roster));

        // Backend recovers, host stays planar until toggled by hand.
        host.volumetric_mut().scene_mut().fail = false;
        for _ in 0..3 {
            assert_eq!(host.render(RenderInput::new(&store, &roster)).kind(), RendererKind::Planar);
        }
        assert_eq!(host.volumetric().scene().presented, 0);
        assert!(host.notice().is_some());

        assert_eq!(host.toggle(), RendererKind::Volumetric);
        assert_eq!(host.render(RenderInput::new(&store, &roster)).kind(), RendererKind::Volumetric);
        assert!(host.notice().is_some(), "notice is persistent");
    }

    #[test]
    fn test_manual_toggle_without_fault() {
        let mut host = host(HeadlessScene::new(), false);
        assert_eq!(host.active(), RendererKind::Volumetric);
        assert_eq!(host.toggle(), RendererKind::Planar);
        assert_eq!(host.toggle(), RendererKind::Volumetric);
        assert!(!host.has_faulted());
    }

    #[test]
    fn test_drag_through_host_updates_store() {
        let roster = roster();
        let mut store = formed_store(&roster);
        let mut host = host(HeadlessScene::new(), false);
        host.set_renderer(RendererKind::Planar);
        let player = PlayerId::from("p2");
        store.set_position(&player, NormalizedPos::new(40.0, 40.0));

        assert_eq!(host.pointer_down(&player, Point2::new(40.0, 40.0), &store), PointerOutcome::DragStarted);
        assert_eq!(host.cursor(), CursorStyle::Grabbing);
        host.pointer_move(Point2::new(50.0, 40.0), &mut store);
        assert_eq!(host.pointer_up(Point2::new(50.0, 40.0), &mut store), Some(player.clone()));

        let record = store.get(&player).unwrap();
        assert!((record.x().unwrap() - 50.0).abs() < 1e-3);
        assert_eq!(record.role(), TacticalRole::Midfielder);
        assert_eq!(host.cursor(), CursorStyle::Default);
        assert_eq!(host.registry().active_count(), 0);
    }

    #[test]
    fn test_drag_in_volumetric_world_space() {
        let roster = roster();
        let mut store = formed_store(&roster);
        let mut host = host(HeadlessScene::new(), false);
        let player = PlayerId::from("p2");
        store.set_position(&player, NormalizedPos::new(40.0, 40.0));

        // Ground-plane hits in meters on a 68 x 105 pitch centered at the origin.
        let grab = Point2::new(-34.0 + 0.40 * 68.0, -52.5 + 0.40 * 105.0);
        let to = Point2::new(grab.x + 0.10 * 68.0, grab.y);
        assert_eq!(host.pointer_down(&player, grab, &store), PointerOutcome::DragStarted);
        host.pointer_move(to, &mut store);
        host.pointer_up(to, &mut store);

        let pos = store.get(&player).unwrap().position().unwrap();
        assert!((pos.x - 50.0).abs() < 1e-3);
        assert!((pos.y - 40.0).abs() < 1e-3);
    }

    #[test]
    fn test_read_only_has_no_mutation_path() {
        let roster = roster();
        let mut store = formed_store(&roster);
        let mut host = host(HeadlessScene::new(), true);
        let snapshot = store.records().clone();
        let revision = store.revision();

        let player = PlayerId::from("p2");
        let pos = store.get(&player).unwrap().position().unwrap();
        assert_eq!(
            host.pointer_down(&player, Point2::new(pos.x, pos.y), &store),
            PointerOutcome::Ignored
        );
        assert_eq!(host.pointer_move(Point2::new(pos.x + 10.0, pos.y), &mut store), None);
        assert_eq!(host.pointer_up(Point2::new(pos.x + 10.0, pos.y), &mut store), None);

        assert_eq!(store.records(), &snapshot);
        assert_eq!(store.revision(), revision);
        assert_eq!(host.registry().active_count(), 0);

        let frame = host.render(RenderInput::new(&store, &roster));
        assert_eq!(frame.marker_count(), 6);
        assert!(!frame.has_draggable_markers());
    }

    #[test]
    fn test_switching_to_read_only_mid_drag_tears_down() {
        let roster = roster();
        let mut store = formed_store(&roster);
        let mut host = host(HeadlessScene::new(), false);
        host.set_renderer(RendererKind::Planar);
        let player = PlayerId::from("p1");
        let pos = store.get(&player).unwrap().position().unwrap();

        host.pointer_down(&player, Point2::new(pos.x, pos.y), &store);
        assert_eq!(host.registry().active_count(), 2);

        host.set_read_only(true);
        assert!(host.is_read_only());
        assert!(!host.is_dragging());
        assert_eq!(host.registry().active_count(), 0);

        // Re-enabling starts from a clean Idle state.
        host.set_read_only(false);
        let revision = store.revision();
        assert_eq!(host.pointer_move(Point2::new(10.0, 10.0), &mut store), None);
        assert_eq!(store.revision(), revision);
    }

    #[test]
    fn test_renderer_switch_tears_down_drag() {
        let roster = roster();
        let store = formed_store(&roster);
        let mut host = host(HeadlessScene::new(), false);
        let player = PlayerId::from("p1");
        let pos = store.get(&player).unwrap().position().unwrap();
        let grab = crate::field::to_surface(pos, &host.field_bounds());

        assert_eq!(host.pointer_down(&player, grab, &store), PointerOutcome::DragStarted);
        host.toggle();
        assert!(!host.is_dragging());
        assert_eq!(host.registry().active_count(), 0);
    }

    #[test]
    fn test_place_from_list_through_host() {
        let roster = roster();
        let mut store = PlacementStore::new();
        store.sync_selection(&roster);
        let mut host = host(HeadlessScene::new(), false);
        host.set_renderer(RendererKind::Planar);
        let player = PlayerId::from("p3");

        assert_eq!(host.pointer_down(&player, Point2::new(0.0, 0.0), &store), PointerOutcome::PlacementArmed);
        assert!(!host.is_dragging());
        assert_eq!(host.registry().active_count(), 0);

        assert_eq!(host.pointer_up(Point2::new(50.0, 75.0), &mut store), Some(player.clone()));
        let record = store.get(&player).unwrap();
        assert_eq!(record.position(), Some(NormalizedPos::new(50.0, 75.0)));
        assert_eq!(record.role(), TacticalRole::Defender);
    }

    #[test]
    fn test_drag_cancels_armed_placement() {
        let roster = roster();
        let mut store = formed_store(&roster);
        let mut host = host(HeadlessScene::new(), false);
        host.set_renderer(RendererKind::Planar);
        let bench = PlayerId::from("p3");
        let starter = PlayerId::from("p1");
        store.move_to_bench(&bench);

        assert_eq!(host.pointer_down(&bench, Point2::new(0.0, 0.0), &store), PointerOutcome::PlacementArmed);

        let pos = store.get(&starter).unwrap().position().unwrap();
        let grab = Point2::new(pos.x, pos.y);
        assert_eq!(host.pointer_down(&starter, grab, &store), PointerOutcome::DragStarted);
        host.pointer_move(grab, &mut store);
        assert_eq!(host.pointer_up(grab, &mut store), Some(starter.clone()));
        let revision = store.revision();

        // A bare pointer-up afterwards has nothing to drop.
        assert_eq!(host.pointer_up(Point2::new(80.0, 5.0), &mut store), None);
        assert!(!store.get(&bench).unwrap().is_starter());
        assert_eq!(store.revision(), revision);
    }

    #[test]
    fn test_ignored_pointer_down_cancels_armed_placement() {
        let roster = roster();
        let mut store = PlacementStore::new();
        store.sync_selection(&roster);
        let mut host = host(HeadlessScene::new(), false);
        host.set_renderer(RendererKind::Planar);
        let player = PlayerId::from("p3");

        host.pointer_down(&player, Point2::new(0.0, 0.0), &store);
        assert_eq!(
            host.pointer_down(&PlayerId::from("nobody"), Point2::new(0.0, 0.0), &store),
            PointerOutcome::Ignored
        );
        assert_eq!(host.pointer_up(Point2::new(50.0, 50.0), &mut store), None);
        assert!(!store.get(&player).unwrap().is_starter());
    }

    #[test]
    fn test_moves_dispatch_only_through_gesture_listeners() {
        let roster = roster();
        let mut store = formed_store(&roster);
        let mut host = host(HeadlessScene::new(), false);
        host.set_renderer(RendererKind::Planar);
        let player = PlayerId::from("p2");
        store.set_position(&player, NormalizedPos::new(40.0, 40.0));

        assert!(!host.registry().is_registered(ListenerKind::PointerMove));
        assert_eq!(host.pointer_move(Point2::new(45.0, 40.0), &mut store), None);

        host.pointer_down(&player, Point2::new(40.0, 40.0), &store);
        assert!(host.registry().is_registered(ListenerKind::PointerMove));
        assert!(host.registry().is_registered(ListenerKind::PointerUp));
        assert_eq!(host.pointer_move(Point2::new(45.0, 40.0), &mut store), Some(TacticalRole::Midfielder));

        host.pointer_up(Point2::new(45.0, 40.0), &mut store);
        let revision = store.revision();
        assert_eq!(host.pointer_move(Point2::new(60.0, 10.0), &mut store), None);
        assert_eq!(store.revision(), revision);
    }

    #[test]
    fn test_unknown_player_is_ignored() {
        let store = PlacementStore::new();
        let mut host = host(HeadlessScene::new(), false);
        assert_eq!(
            host.pointer_down(&PlayerId::from("nobody"), Point2::new(1.0, 1.0), &store),
            PointerOutcome::Ignored
        );
    }
}
