use super::assets::INDEX_HTML;
use super::data::GraphData;
use crate::analysis::{self, PlacementOptions, ZoomStyle};
use crate::input::Dataset;
use crate::model::{ClusterReport, Placement, Point, PositionSnapshot};
use crate::style;
use crate::view::ViewState;
use axum::{
    Json, Router,
    extract::{Query, State},
    response::{Html, IntoResponse},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing::{debug, info};

/// Application state shared across handlers. Read-only once serving starts.
pub struct AppState {
    pub dataset: Dataset,
    pub report: ClusterReport,
    pub placement: PlacementOptions,
    pub graph_data: GraphData,
}

#[derive(Debug, Deserialize)]
pub struct PlacementRequest {
    /// Node id → `[x, y]` from the page's layout engine.
    pub positions: HashMap<String, [f64; 2]>,
    #[serde(default = "default_zoom")]
    pub zoom: f64,
}

fn default_zoom() -> f64 {
    1.0
}

#[derive(Debug, Serialize)]
pub struct PlacementResponse {
    pub style: ZoomStyle,
    pub placements: Vec<Placement>,
}

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub q: String,
}

#[derive(Debug, Deserialize)]
pub struct SelectParams {
    pub id: String,
}

impl AppState {
    pub fn new(
        dataset: Dataset,
        report: ClusterReport,
        placement: PlacementOptions,
        title: &str,
    ) -> Self {
        let graph_data = GraphData::build(&dataset, &report, &placement, title);
        Self {
            dataset,
            report,
            placement,
            graph_data,
        }
    }

    pub fn placements(&self, request: &PlacementRequest) -> PlacementResponse {
        let positions: PositionSnapshot = request
            .positions
            .iter()
            .map(|(id, [x, y])| (id.clone(), Point::new(*x, *y)))
            .collect();

        let placements =
            analysis::place_labels(&self.report, &positions, request.zoom, &self.placement);
        debug!(
            zoom = request.zoom,
            positioned = positions.len(),
            placed = placements.len(),
            "Resolved label placements"
        );

        PlacementResponse {
            style: ZoomStyle::for_scale(request.zoom),
            placements,
        }
    }

    pub fn search(&self, term: &str) -> ViewState {
        ViewState::search(&self.dataset.graph, &self.dataset.details, term)
    }

    pub fn select(&self, id: &str) -> ViewState {
        ViewState::select(&self.dataset.graph, id)
    }
}

pub fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(index_handler))
        .route("/api/graph", get(graph_handler))
        .route("/api/placements", post(placements_handler))
        .route("/api/search", get(search_handler))
        .route("/api/select", get(select_handler))
        .layer(cors)
        .with_state(state)
}

/// Start the HTTP server for graph visualization
pub async fn serve(
    state: AppState,
    port: u16,
    open_browser: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let app = router(Arc::new(state));

    let addr = format!("127.0.0.1:{}", port);
    let url = format!("http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(%addr, "Visualization server listening");

    style::status(&format!("Serving topic map at {}", style::url(&url)));
    style::hint("Press Ctrl+C to stop");

    if open_browser && let Err(e) = open::that(&url) {
        style::warning(&format!("Could not open browser: {}", e));
    }

    axum::serve(listener, app).await?;

    Ok(())
}

async fn index_handler() -> impl IntoResponse {
    Html(INDEX_HTML)
}

async fn graph_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(state.graph_data.clone())
}

async fn placements_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<PlacementRequest>,
) -> impl IntoResponse {
    Json(state.placements(&request))
}

async fn search_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchParams>,
) -> impl IntoResponse {
    Json(state.search(&params.q))
}

async fn select_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SelectParams>,
) -> impl IntoResponse {
    Json(state.select(&params.id))
}
