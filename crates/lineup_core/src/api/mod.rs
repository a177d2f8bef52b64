// JSON API layer for the hosting UI runtime

pub mod lineup_json;

pub use lineup_json::{
    bench_json, export_placements_json, load_placements_json, place_json, pointer_json, render_json, reset_session_json,
    select_formation_json, set_read_only_json, set_selection_json, suggest_formations_json,
    toggle_renderer_json,
};
