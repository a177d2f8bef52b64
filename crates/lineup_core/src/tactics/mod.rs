// Tactical roles, role classification and the formation catalog

pub mod catalog;
pub mod role;

pub use catalog::{FormationCatalog, FormationSlot, FormationTemplate, MAX_SQUAD_SIZE, MIN_SQUAD_SIZE};
pub use role::{classify, TacticalRole};
