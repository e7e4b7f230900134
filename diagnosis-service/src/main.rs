use diagnosis_service::config::get_configuration;
use diagnosis_service::services::artifacts::ModelArtifacts;
use diagnosis_service::startup::build_router;
use diagnosis_service::AppState;
use dotenvy::dotenv;
use service_core::observability::logging::init_tracing;
use std::path::Path;
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let configuration = get_configuration().map_err(|e| {
        eprintln!("Failed to read configuration: {}", e);
        anyhow::anyhow!("Configuration error: {}", e)
    })?;

    // Initialize tracing using shared logic
    init_tracing(
        "diagnosis-service",
        &configuration.telemetry.log_level,
        &configuration.telemetry.otlp_endpoint,
    );

    diagnosis_service::services::metrics::init_metrics();

    // Fail fast: a process that cannot load its model must not serve.
    let artifact_dir = Path::new(&configuration.model.artifact_dir);
    let artifacts = Arc::new(ModelArtifacts::load(artifact_dir).map_err(|e| {
        tracing::error!("Failed to load model artifacts from {:?}: {}", artifact_dir, e);
        anyhow::anyhow!("Artifact load error: {}", e)
    })?);
    info!(
        "Loaded decision tree: {} nodes, {} features, {} classes",
        artifacts.tree.n_nodes(),
        artifacts.feature_names.len(),
        artifacts.classes.len()
    );

    let app = build_router(AppState::new(artifacts));

    let address = format!(
        "{}:{}",
        configuration.server.host, configuration.server.port
    );
    let listener = tokio::net::TcpListener::bind(&address).await.map_err(|e| {
        tracing::error!("Failed to bind TCP listener to {}: {}", address, e);
        anyhow::anyhow!("Failed to bind to address {}: {}", address, e)
    })?;

    info!("Starting diagnosis-service on {}", address);
    axum::serve(listener, app).await.map_err(|e| {
        tracing::error!("Server error: {}", e);
        anyhow::anyhow!("Server error: {}", e)
    })?;

    Ok(())
}
