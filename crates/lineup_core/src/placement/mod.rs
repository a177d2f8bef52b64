// Authoritative player placement state

pub mod record;
pub mod store;

pub use record::{PlacementRecord, PlacementRecordShape, Player, PlayerId};
pub use store::{PlacementMap, PlacementStore, RoleDefaults};
