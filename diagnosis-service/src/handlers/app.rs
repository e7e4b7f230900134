use crate::AppState;
use askama::Template;
use axum::{extract::State, response::IntoResponse, Json};
use serde_json::json;

#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexTemplate {}

/// Landing page: the questionnaire shell with no diagnosis pre-filled.
pub async fn index() -> impl IntoResponse {
    IndexTemplate {}
}

/// Liveness probe. Only reachable once the artifacts loaded, so it also
/// reports a short summary of the model the process is serving.
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "service": "diagnosis-service",
        "version": env!("CARGO_PKG_VERSION"),
        "model": {
            "nodes": state.artifacts.tree.n_nodes(),
            "features": state.artifacts.feature_names.len(),
            "classes": state.artifacts.classes.len(),
        }
    }))
}
