mod assets;
mod data;
mod routes;
pub mod style;

pub use data::{GraphCluster, GraphData, GraphLink, GraphMetadata, GraphNode, LabelMetrics};
pub use routes::{AppState, PlacementRequest, PlacementResponse, router, serve};

/// Self-contained page with the graph embedded; labels are placed in the browser.
pub fn generate_static_html(data: &GraphData) -> Result<String, serde_json::Error> {
    // `</` would end the script element early
    let json = serde_json::to_string(data)?.replace("</", "<\\/");
    Ok(assets::INDEX_HTML.replacen(assets::DATA_PLACEHOLDER, &json, 1))
}
