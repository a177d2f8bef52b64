// Lineup JSON API Layer
// String-in / string-out entry points for the hosting page.
// The engine is single-threaded, so the workspace lives per thread.

use std::cell::RefCell;
use std::collections::BTreeMap;

use nalgebra::Point2;
use serde::{Deserialize, Serialize};

use crate::config::LineupConfig;
use crate::field::FieldBounds;
use crate::placement::{PlacementMap, PlacementRecordShape, Player, PlayerId};
use crate::render::{DualRenderer, Frame, HeadlessScene, PointerOutcome, RendererKind};
use crate::session::{LineupEvent, LineupSession};
use crate::tactics::{FormationTemplate, TacticalRole};

// ========== Request/Response Structures ==========

#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    fn ok(data: T) -> Self {
        Self { success: true, data: Some(data), error: None }
    }

    fn fail(error: impl Into<String>) -> Self {
        Self { success: false, data: None, error: Some(error.into()) }
    }

    fn to_json(&self) -> String {
        serde_json::to_string(self)
            .unwrap_or_else(|_| r#"{"success":false,"data":null,"error":"Serialization failed"}"#.to_string())
    }
}

#[derive(Debug, Deserialize)]
pub struct ResetRequest {
    #[serde(default)]
    pub config: Option<LineupConfig>,
    #[serde(default)]
    pub viewport: Option<FieldBounds>,
    #[serde(default)]
    pub read_only: bool,
}

#[derive(Debug, Deserialize)]
pub struct SuggestRequest {
    pub squad_size: usize,
}

#[derive(Debug, Deserialize)]
pub struct SelectionRequest {
    pub players: Vec<Player>,
}

#[derive(Debug, Serialize)]
pub struct SelectionResponse {
    pub squad_size: usize,
    pub suggestions: Vec<String>,
    pub ready: bool,
}

#[derive(Debug, Deserialize)]
pub struct LoadRequest {
    pub placements: BTreeMap<PlayerId, PlacementRecordShape>,
}

#[derive(Debug, Deserialize)]
pub struct FormationRequest {
    pub name: String,
}

#[derive(Debug, Serialize)]
pub struct StateResponse {
    pub placements: PlacementMap,
    pub ready: bool,
    pub events: Vec<LineupEvent>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "phase", rename_all = "snake_case")]
pub enum PointerRequest {
    Down { player_id: PlayerId, x: f32, y: f32 },
    Move { x: f32, y: f32 },
    Up { x: f32, y: f32 },
}

#[derive(Debug, Serialize)]
pub struct PointerResponse {
    pub outcome: Option<PointerOutcome>,
    pub role: Option<TacticalRole>,
    pub released: Option<PlayerId>,
    pub dragging: bool,
}

#[derive(Debug, Deserialize)]
pub struct PlaceRequest {
    pub player_id: PlayerId,
    pub x: f32,
    pub y: f32,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "to", rename_all = "snake_case")]
pub enum BenchRequest {
    Bench { player_id: PlayerId },
    Field { player_id: PlayerId, role: TacticalRole },
}

#[derive(Debug, Serialize)]
pub struct RenderResponse {
    pub frame: Frame,
    pub notice: Option<String>,
    pub active: RendererKind,
}

#[derive(Debug, Deserialize)]
pub struct ReadOnlyRequest {
    pub read_only: bool,
}

#[derive(Debug, Deserialize)]
pub struct ToggleRequest {
    #[serde(default)]
    pub renderer: Option<RendererKind>,
}

// ========== Per-thread Workspace ==========

struct Workspace {
    session: LineupSession,
    view: DualRenderer<HeadlessScene>,
}

impl Workspace {
    fn new(config: &LineupConfig, viewport: FieldBounds, read_only: bool) -> Self {
        Self {
            session: LineupSession::new(config),
            view: DualRenderer::new(config, viewport, HeadlessScene::new(), read_only),
        }
    }

    fn state(&mut self) -> StateResponse {
        StateResponse {
            placements: self.session.placement_map().clone(),
            ready: self.session.is_ready(),
            events: self.session.drain_events(),
        }
    }
}

impl Default for Workspace {
    fn default() -> Self {
        Self::new(&LineupConfig::default(), FieldBounds::percent(), false)
    }
}

thread_local! {
    static WORKSPACE: RefCell<Workspace> = RefCell::new(Workspace::default());
}

fn with_workspace<R>(f: impl FnOnce(&mut Workspace) -> R) -> R {
    WORKSPACE.with(|workspace| f(&mut workspace.borrow_mut()))
}

fn parse<T: for<'de> Deserialize<'de>>(request_json: &str) -> Result<T, String> {
    serde_json::from_str(request_json).map_err(|e| format!("Invalid request format: {}", e))
}

// ========== Public API Functions ==========

/// Replaces the workspace with a fresh session (optionally configured).
pub fn reset_session_json(request_json: &str) -> String {
    let request: ResetRequest = match parse(request_json) {
        Ok(req) => req,
        Err(e) => return ApiResponse::<()>::fail(e).to_json(),
    };
    let config = request.config.unwrap_or_default();
    if let Err(e) = validator::Validate::validate(&config) {
        return ApiResponse::<()>::fail(format!("Invalid config: {}", e)).to_json();
    }

    let viewport = request.viewport.unwrap_or_else(FieldBounds::percent);
    with_workspace(|ws| *ws = Workspace::new(&config, viewport, request.read_only));
    ApiResponse::ok(()).to_json()
}

pub fn suggest_formations_json(request_json: &str) -> String {
    let request: SuggestRequest = match parse(request_json) {
        Ok(req) => req,
        Err(e) => return ApiResponse::<Vec<FormationTemplate>>::fail(e).to_json(),
    };
    let templates = crate::tactics::catalog::suggestions(request.squad_size).to_vec();
    ApiResponse::ok(templates).to_json()
}

pub fn set_selection_json(request_json: &str) -> String {
    let request: SelectionRequest = match parse(request_json) {
        Ok(req) => req,
        Err(e) => return ApiResponse::<SelectionResponse>::fail(e).to_json(),
    };

    let response = with_workspace(|ws| {
        ws.view.teardown();
        ws.session.set_selection(request.players);
        SelectionResponse {
            squad_size: ws.session.squad_size(),
            suggestions: ws.session.suggestions().iter().map(|t| t.name().to_string()).collect(),
            ready: ws.session.is_ready(),
        }
    });
    ApiResponse::ok(response).to_json()
}

pub fn select_formation_json(request_json: &str) -> String {
    let request: FormationRequest = match parse(request_json) {
        Ok(req) => req,
        Err(e) => return ApiResponse::<StateResponse>::fail(e).to_json(),
    };

    with_workspace(|ws| {
        if ws.view.is_read_only() {
            return ApiResponse::<StateResponse>::fail("Lineup is read-only").to_json();
        }
        match ws.session.select_formation(&request.name) {
            Ok(()) => ApiResponse::ok(ws.state()).to_json(),
            Err(e) => ApiResponse::<StateResponse>::fail(e.to_string()).to_json(),
        }
    })
}

/// Loads a saved team's placements. Allowed in read-only mode.
pub fn load_placements_json(request_json: &str) -> String {
    let request: LoadRequest = match parse(request_json) {
        Ok(req) => req,
        Err(e) => return ApiResponse::<StateResponse>::fail(e).to_json(),
    };

    with_workspace(|ws| {
        ws.view.teardown();
        match ws.session.load_placements(request.placements) {
            Ok(()) => ApiResponse::ok(ws.state()).to_json(),
            Err(e) => ApiResponse::<StateResponse>::fail(e.to_string()).to_json(),
        }
    })
}

/// Pointer events in the active renderer's field space.
pub fn pointer_json(request_json: &str) -> String {
    let request: PointerRequest = match parse(request_json) {
        Ok(req) => req,
        Err(e) => return ApiResponse::<PointerResponse>::fail(e).to_json(),
    };

    let response = with_workspace(|ws| {
        let Workspace { session, view } = ws;
        let mut response = PointerResponse { outcome: None, role: None, released: None, dragging: false };
        match request {
            PointerRequest::Down { player_id, x, y } => {
                response.outcome = Some(view.pointer_down(&player_id, Point2::new(x, y), session.store()));
            }
            PointerRequest::Move { x, y } => {
                response.role = view.pointer_move(Point2::new(x, y), session.store_mut());
            }
            PointerRequest::Up { x, y } => {
                response.released = view.pointer_up(Point2::new(x, y), session.store_mut());
            }
        }
        response.dragging = view.is_dragging();
        response
    });
    ApiResponse::ok(response).to_json()
}

/// Direct place-from-list drop for hosts that resolve the gesture themselves.
pub fn place_json(request_json: &str) -> String {
    let request: PlaceRequest = match parse(request_json) {
        Ok(req) => req,
        Err(e) => return ApiResponse::<StateResponse>::fail(e).to_json(),
    };

    with_workspace(|ws| {
        let Workspace { session, view } = ws;
        let armed = view.pointer_down(&request.player_id, Point2::new(request.x, request.y), session.store());
        if armed != PointerOutcome::PlacementArmed {
            return ApiResponse::<StateResponse>::fail(format!(
                "Player {} cannot be placed from the list",
                request.player_id
            ))
            .to_json();
        }
        view.pointer_up(Point2::new(request.x, request.y), session.store_mut());
        ApiResponse::ok(ws.state()).to_json()
    })
}

pub fn bench_json(request_json: &str) -> String {
    let request: BenchRequest = match parse(request_json) {
        Ok(req) => req,
        Err(e) => return ApiResponse::<StateResponse>::fail(e).to_json(),
    };

    with_workspace(|ws| {
        if ws.view.is_read_only() {
            return ApiResponse::<StateResponse>::fail("Lineup is read-only").to_json();
        }
        let player_id = match &request {
            BenchRequest::Bench { player_id } | BenchRequest::Field { player_id, .. } => player_id,
        };
        if !ws.session.store().contains(player_id) {
            return ApiResponse::<StateResponse>::fail(format!("Player {} is not selected", player_id))
                .to_json();
        }

        ws.view.teardown();
        match &request {
            BenchRequest::Bench { player_id } => ws.session.store_mut().move_to_bench(player_id),
            BenchRequest::Field { player_id, role } => {
                ws.session.store_mut().move_to_field(player_id, *role);
            }
        }
        ApiResponse::ok(ws.state()).to_json()
    })
}

pub fn render_json(_request_json: &str) -> String {
    let response = with_workspace(|ws| {
        let Workspace { session, view } = ws;
        let frame = view.render(session.render_input());
        RenderResponse { frame, notice: view.notice(), active: view.active() }
    });
    ApiResponse::ok(response).to_json()
}

pub fn set_read_only_json(request_json: &str) -> String {
    let request: ReadOnlyRequest = match parse(request_json) {
        Ok(req) => req,
        Err(e) => return ApiResponse::<bool>::fail(e).to_json(),
    };
    let read_only = with_workspace(|ws| {
        ws.view.set_read_only(request.read_only);
        ws.view.is_read_only()
    });
    ApiResponse::ok(read_only).to_json()
}

/// Flips the renderer, or selects the one named in the request.
pub fn toggle_renderer_json(request_json: &str) -> String {
    let request: ToggleRequest = match parse(request_json) {
        Ok(req) => req,
        Err(e) => return ApiResponse::<RendererKind>::fail(e).to_json(),
    };
    let active = with_workspace(|ws| match request.renderer {
        Some(kind) => {
            ws.view.set_renderer(kind);
            kind
        }
        None => ws.view.toggle(),
    });
    ApiResponse::ok(active).to_json()
}

pub fn export_placements_json(_request_json: &str) -> String {
    let placements = with_workspace(|ws| ws.session.placement_map().clone());
    ApiResponse::ok(placements).to_json()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn call(f: fn(&str) -> String, request: Value) -> Value {
        serde_json::from_str(&f(&request.to_string())).unwrap()
    }

    fn six_players() -> Value {
        json!({
            "players": (1..=6).map(|i| json!({"id": format!("p{i}"), "name": format!("Player {i}")})).collect::<Vec<_>>()
        })
    }

    #[test]
    fn test_full_flow() {
        call(reset_session_json, json!({"config": {"initial_renderer": "planar"}}));

        let selection = call(set_selection_json, six_players());
        assert_eq!(selection["success"], true);
        assert_eq!(selection["data"]["squad_size"], 6);
        assert!(selection["data"]["suggestions"].as_array().unwrap().contains(&json!("1-4-1")));

        let state = call(select_formation_json, json!({"name": "1-4-1"}));
        assert_eq!(state["success"], true);
        assert_eq!(state["data"]["ready"], true);
        assert_eq!(state["data"]["placements"]["p1"]["role"], "GK");
        let events = state["data"]["events"].as_array().unwrap();
        assert!(events.contains(&json!({"type": "formation_selected", "name": "1-4-1"})));

        let p2 = &state["data"]["placements"]["p2"];
        let (x, y) = (p2["x"].as_f64().unwrap() as f32, p2["y"].as_f64().unwrap() as f32);
        let down = call(pointer_json, json!({"phase": "down", "player_id": "p2", "x": x, "y": y}));
        assert_eq!(down["data"]["outcome"], "drag_started");
        let moved = call(pointer_json, json!({"phase": "move", "x": x, "y": 10.0}));
        assert_eq!(moved["data"]["role"], "ATT");
        let up = call(pointer_json, json!({"phase": "up", "x": x, "y": 10.0}));
        assert_eq!(up["data"]["released"], "p2");
        assert_eq!(up["data"]["dragging"], false);

        let rendered = call(render_json, json!({}));
        assert_eq!(rendered["data"]["frame"]["renderer"], "planar");
        assert_eq!(rendered["data"]["frame"]["markers"].as_array().unwrap().len(), 6);

        let exported = call(export_placements_json, json!({}));
        assert_eq!(exported["data"]["p2"]["role"], "ATT");
        assert_eq!(exported["data"]["p2"]["isStarter"], true);
    }

    #[test]
    fn test_mismatched_formation_reports_failure() {
        call(reset_session_json, json!({}));
        call(set_selection_json, six_players());

        let response = call(select_formation_json, json!({"name": "1-4-4-2"}));
        assert_eq!(response["success"], false);
        assert!(response["error"].as_str().unwrap().contains("Unknown formation"));

        let exported = call(export_placements_json, json!({}));
        assert_eq!(exported["data"]["p1"], json!({"role": "SUB", "isStarter": false}));
    }

    #[test]
    fn test_read_only_blocks_mutation() {
        call(reset_session_json, json!({"read_only": true}));
        call(set_selection_json, six_players());

        let formation = call(select_formation_json, json!({"name": "1-4-1"}));
        assert_eq!(formation["success"], false);

        let down = call(pointer_json, json!({"phase": "down", "player_id": "p1", "x": 50.0, "y": 50.0}));
        assert_eq!(down["data"]["outcome"], "ignored");
        let place = call(place_json, json!({"player_id": "p1", "x": 50.0, "y": 50.0}));
        assert_eq!(place["success"], false);
        let bench = call(bench_json, json!({"to": "field", "player_id": "p1", "role": "MID"}));
        assert_eq!(bench["success"], false);

        let exported = call(export_placements_json, json!({}));
        assert_eq!(exported["data"]["p1"]["isStarter"], false);
    }

    #[test]
    fn test_load_saved_team_while_read_only() {
        call(reset_session_json, json!({"read_only": true, "config": {"initial_renderer": "planar"}}));
        call(set_selection_json, six_players());

        let loaded = call(load_placements_json, json!({"placements": {
            "p1": {"x": 50.0, "y": 95.0, "role": "GK", "isStarter": true},
            "p2": {"x": 40.0, "y": 60.0, "role": "MID", "isStarter": true}
        }}));
        assert_eq!(loaded["success"], true);
        assert_eq!(loaded["data"]["placements"]["p2"]["role"], "MID");
        assert_eq!(loaded["data"]["placements"]["p3"], json!({"role": "SUB", "isStarter": false}));

        let rendered = call(render_json, json!({}));
        let markers = rendered["data"]["frame"]["markers"].as_array().unwrap();
        assert_eq!(markers.len(), 2);
        assert!(markers.iter().all(|m| m["draggable"] == false));

        let rejected = call(load_placements_json, json!({"placements": {
            "p1": {"x": 50.0, "role": "GK", "isStarter": true}
        }}));
        assert_eq!(rejected["success"], false);
        assert!(rejected["error"].as_str().unwrap().contains("Invalid placement record"));
        assert_eq!(call(export_placements_json, json!({}))["data"]["p2"]["x"], 40.0);
    }

    #[test]
    fn test_bench_and_field_moves() {
        call(reset_session_json, json!({}));
        call(set_selection_json, six_players());
        call(select_formation_json, json!({"name": "1-4-1"}));

        let benched = call(bench_json, json!({"to": "bench", "player_id": "p6"}));
        assert_eq!(benched["data"]["placements"]["p6"], json!({"role": "ATT", "isStarter": false}));
        assert_eq!(benched["data"]["ready"], false);

        let fielded = call(bench_json, json!({"to": "field", "player_id": "p6", "role": "MID"}));
        assert_eq!(fielded["data"]["placements"]["p6"]["isStarter"], true);
        assert_eq!(fielded["data"]["placements"]["p6"]["x"], 50.0);

        let unknown = call(bench_json, json!({"to": "bench", "player_id": "nobody"}));
        assert_eq!(unknown["success"], false);
    }

    #[test]
    fn test_place_from_list() {
        call(reset_session_json, json!({"config": {"initial_renderer": "planar"}}));
        call(set_selection_json, json!({"players": [{"id": "solo", "name": "Solo"}]}));

        let placed = call(place_json, json!({"player_id": "solo", "x": 50.0, "y": 120.0}));
        assert_eq!(placed["data"]["placements"]["solo"], json!({"x": 50.0, "y": 100.0, "role": "GK", "isStarter": true}));
    }

    #[test]
    fn test_toggle_renderer() {
        call(reset_session_json, json!({}));
        assert_eq!(call(toggle_renderer_json, json!({}))["data"], "planar");
        assert_eq!(call(toggle_renderer_json, json!({"renderer": "volumetric"}))["data"], "volumetric");
    }

    #[test]
    fn test_invalid_request() {
        let response: Value = serde_json::from_str(&suggest_formations_json("{oops")).unwrap();
        assert_eq!(response["success"], false);
        assert!(response["error"].as_str().unwrap().starts_with("Invalid request format"));

        let response = call(suggest_formations_json, json!({"squad_size": 6}));
        assert_eq!(response["data"].as_array().unwrap().len(), 3);
    }

    #[test]
    fn test_reset_rejects_invalid_config() {
        let response = call(reset_session_json, json!({"config": {"drag_clamp": {"min": 60.0, "max": 40.0}}}));
        assert_eq!(response["success"], false);
    }
}
