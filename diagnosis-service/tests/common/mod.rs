use axum::Router;
use diagnosis_service::services::artifacts::ModelArtifacts;
use diagnosis_service::startup::build_router;
use diagnosis_service::AppState;
use std::path::Path;
use std::sync::Arc;

/// Router wired against the artifacts shipped in `model/`, exactly as the
/// binary serves them. Cargo runs integration tests with the package root as
/// working directory.
pub fn test_app() -> Router {
    let artifacts =
        ModelArtifacts::load(Path::new("model")).expect("shipped model artifacts should load");
    build_router(AppState::new(Arc::new(artifacts)))
}
