pub mod config;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;
pub mod startup;
pub mod tree;

use services::artifacts::ModelArtifacts;
use std::sync::Arc;

/// Shared application state: the model artifacts, loaded once at startup and
/// read-only afterwards.
#[derive(Clone)]
pub struct AppState {
    pub artifacts: Arc<ModelArtifacts>,
}

impl AppState {
    pub fn new(artifacts: Arc<ModelArtifacts>) -> Self {
        Self { artifacts }
    }
}
