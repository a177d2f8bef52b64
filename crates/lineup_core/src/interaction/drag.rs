//! Drag-to-reposition state machine.
//!
//! Idle -> Dragging on pointer-down over a starter marker. Each pointer-move
//! commits the candidate coordinate to the store. Pointer-up or a forced
//! teardown returns to Idle and drops the gesture listeners with it.

use nalgebra::{Point2, Vector2};
use serde::Serialize;

use super::listeners::{ListenerGuard, ListenerKind, ListenerRegistry};
use crate::field::{to_normalized, to_surface, ClampRange, FieldBounds};
use crate::placement::{PlacementRecord, PlacementStore, PlayerId};
use crate::tactics::TacticalRole;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DragPhase {
    Idle,
    Dragging,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CursorStyle {
    Default,
    Grabbing,
}

#[derive(Debug)]
struct ActiveDrag {
    player: PlayerId,
    /// pointer minus marker center at grab time
    offset: Vector2<f32>,
    _on_move: ListenerGuard,
    _on_up: ListenerGuard,
}

#[derive(Debug)]
pub struct DragController {
    registry: ListenerRegistry,
    clamp: ClampRange,
    active: Option<ActiveDrag>,
}

impl DragController {
    pub fn new(registry: ListenerRegistry, clamp: ClampRange) -> Self {
        Self { registry, clamp, active: None }
    }

    pub fn phase(&self) -> DragPhase {
        if self.active.is_some() {
            DragPhase::Dragging
        } else {
            DragPhase::Idle
        }
    }

    pub fn is_dragging(&self) -> bool {
        self.active.is_some()
    }

    pub fn cursor(&self) -> CursorStyle {
        if self.active.is_some() {
            CursorStyle::Grabbing
        } else {
            CursorStyle::Default
        }
    }

    pub fn dragged_player(&self) -> Option<&PlayerId> {
        self.active.as_ref().map(|drag| &drag.player)
    }

    /// Grabs the marker of `player`. Only starters can be grabbed; a second
    /// pointer while a drag is active is ignored.
    pub fn pointer_down(
        &mut self,
        player: &PlayerId,
        pointer: Point2<f32>,
        bounds: &FieldBounds,
        store: &PlacementStore,
    ) -> bool {
        if self.active.is_some() {
            return false;
        }
        let Some(position) = store.get(player).and_then(PlacementRecord::position) else {
            return false;
        };

        let center = to_surface(position, bounds);
        self.active = Some(ActiveDrag {
            player: player.clone(),
            offset: pointer - center,
            _on_move: self.registry.register(ListenerKind::PointerMove),
            _on_up: self.registry.register(ListenerKind::PointerUp),
        });
        tracing::debug!(player = %player, "drag started");
        true
    }

    /// Commits the candidate coordinate under the pointer and returns the
    /// re-derived role. `None` when idle.
    ///
    /// A marker that left the field underneath the gesture (benched, cleared)
    /// ends the drag instead of being recreated.
    pub fn pointer_move(
        &mut self,
        pointer: Point2<f32>,
        bounds: &FieldBounds,
        store: &mut PlacementStore,
    ) -> Option<TacticalRole> {
        let drag = self.active.as_ref()?;
        if !store.get(&drag.player).is_some_and(PlacementRecord::is_starter) {
            tracing::debug!(player = %drag.player, "dragged marker left the field, aborting drag");
            self.teardown();
            return None;
        }

        let candidate = to_normalized(pointer - drag.offset, bounds, self.clamp);
        Some(store.set_position(&drag.player, candidate))
    }

    /// Releases capture. Returns the player that was being dragged.
    pub fn pointer_up(&mut self) -> Option<PlayerId> {
        let drag = self.active.take()?;
        tracing::debug!(player = %drag.player, "drag released");
        Some(drag.player)
    }

    /// Forced transition to Idle (unmount, read-only switch, renderer switch).
    pub fn teardown(&mut self) {
        if let Some(drag) = self.active.take() {
            tracing::debug!(player = %drag.player, "drag torn down");
        }
    }
}

impl Drop for DragController {
    fn drop(&mut self) {
        self.teardown();
    }
}
