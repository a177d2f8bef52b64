//! "Place from list": pick a bench player, then drop them onto the field.

use nalgebra::Point2;

use crate::field::{to_normalized, ClampRange, FieldBounds};
use crate::placement::{PlacementStore, PlayerId};
use crate::tactics::TacticalRole;

#[derive(Debug)]
pub struct PlaceFromList {
    clamp: ClampRange,
    pending: Option<PlayerId>,
}

impl PlaceFromList {
    pub fn new(clamp: ClampRange) -> Self {
        Self { clamp, pending: None }
    }

    pub fn pending(&self) -> Option<&PlayerId> {
        self.pending.as_ref()
    }

    /// Arms the gesture for a selected player that is not on the field.
    pub fn begin(&mut self, player: &PlayerId, store: &PlacementStore) -> bool {
        match store.get(player) {
            Some(record) if !record.is_starter() => {
                self.pending = Some(player.clone());
                true
            }
            _ => false,
        }
    }

    /// Drop target: commits the pending player at `point`.
    pub fn drop_at(
        &mut self,
        point: Point2<f32>,
        bounds: &FieldBounds,
        store: &mut PlacementStore,
    ) -> Option<(PlayerId, TacticalRole)> {
        let player = self.pending.take()?;
        if !store.contains(&player) {
            return None;
        }
        let pos = to_normalized(point, bounds, self.clamp);
        let role = store.set_position(&player, pos);
        tracing::debug!(player = %player, x = pos.x, y = pos.y, "placed from list");
        Some((player, role))
    }

    pub fn cancel(&mut self) {
        self.pending = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::NormalizedPos;

    #[test]
    fn test_place_bench_player() {
        let mut store = PlacementStore::new();
        let player = PlayerId::from("p1");
        store.sync_selection(&[player.clone()]);

        let mut place = PlaceFromList::new(ClampRange::PERCENT);
        assert!(place.begin(&player, &store));

        let bounds = FieldBounds::new(0.0, 0.0, 200.0, 200.0);
        let placed = place.drop_at(Point2::new(100.0, 190.0), &bounds, &mut store);
        assert_eq!(placed, Some((player.clone(), TacticalRole::Goalkeeper)));
        assert_eq!(store.get(&player).unwrap().position(), Some(NormalizedPos::new(50.0, 95.0)));
        assert!(place.pending().is_none());
    }

    #[test]
    fn test_place_clamps_to_full_field() {
        let mut store = PlacementStore::new();
        let player = PlayerId::from("p1");
        store.move_to_bench(&player);

        let mut place = PlaceFromList::new(ClampRange::PERCENT);
        place.begin(&player, &store);
        place.drop_at(Point2::new(-10.0, 250.0), &FieldBounds::percent(), &mut store);
        assert_eq!(store.get(&player).unwrap().position(), Some(NormalizedPos::new(0.0, 100.0)));
    }

    #[test]
    fn test_starter_cannot_be_placed_from_list() {
        let mut store = PlacementStore::new();
        let player = PlayerId::from("p1");
        store.set_position(&player, NormalizedPos::new(50.0, 50.0));

        let mut place = PlaceFromList::new(ClampRange::PERCENT);
        assert!(!place.begin(&player, &store));
        assert!(!place.begin(&PlayerId::from("unknown"), &store));
    }

    #[test]
    fn test_cancel_and_drop_without_pending() {
        let mut store = PlacementStore::new();
        let player = PlayerId::from("p1");
        store.move_to_bench(&player);

        let mut place = PlaceFromList::new(ClampRange::PERCENT);
        place.begin(&player, &store);
        place.cancel();
        assert_eq!(place.drop_at(Point2::new(50.0, 50.0), &FieldBounds::percent(), &mut store), None);
        assert!(!store.get(&player).unwrap().is_starter());
    }
}
