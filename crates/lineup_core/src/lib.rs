//! # lineup_core - Team Formation and Player Placement Engine
//!
//! Assigns each selected player a tactical role and a normalized field
//! coordinate, lets the user drag starters around, and paints the same
//! placement state through a flat overlay or a 3D scene.
//!
//! ## Features
//! - Role classification from the vertical field coordinate
//! - Formation templates for squads of 5 to 11
//! - Drag and place-from-list interaction with scoped pointer listeners
//! - Dual renderer host with automatic fallback to the flat view
//! - JSON API for the hosting page

// Doc formatting lints - purely cosmetic, fix incrementally
#![allow(clippy::doc_lazy_continuation)]
// Large enum variants - boxing would require API changes
#![allow(clippy::large_enum_variant)]

pub mod api;
pub mod config;
pub mod error;
pub mod field;
pub mod interaction;
pub mod placement;
pub mod render;
pub mod session;
pub mod tactics;

// Re-export main API functions
pub use api::{
    bench_json, export_placements_json, load_placements_json, place_json, pointer_json, render_json, reset_session_json,
    select_formation_json, set_read_only_json, set_selection_json, suggest_formations_json,
    toggle_renderer_json,
};
pub use config::LineupConfig;
pub use error::{ConfigError, FaultKind, LineupError, PlacementError, RenderingFault, Result};
pub use field::{ClampRange, FieldBounds, FieldGeometry, NormalizedPos};
pub use interaction::DragController;
pub use placement::{PlacementMap, PlacementRecord, PlacementStore, Player, PlayerId};
pub use render::{DualRenderer, Frame, RendererKind};
pub use session::{LineupEvent, LineupSession};
pub use tactics::{classify, FormationCatalog, FormationSlot, FormationTemplate, TacticalRole};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
