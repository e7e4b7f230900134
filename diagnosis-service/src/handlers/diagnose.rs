use crate::models::{DiagnosisRequest, DiagnosisResponse, DiagnosisStatus};
use crate::services::metrics::{DIAGNOSES_COMPLETED_TOTAL, QUESTIONS_SERVED_TOTAL};
use crate::tree::{self, Answer};
use crate::AppState;
use axum::{extract::State, response::IntoResponse, Json};
use service_core::error::AppError;
use validator::Validate;

/// One questionnaire step: optionally apply a yes/no answer to the
/// client-held `node_id`, then return either the next question or the final
/// ranked diagnoses.
pub async fn diagnose(
    State(state): State<AppState>,
    Json(request): Json<DiagnosisRequest>,
) -> Result<impl IntoResponse, AppError> {
    request.validate()?;

    let answer = match request.answer {
        Some(code) => Some(Answer::from_code(code).ok_or_else(|| {
            AppError::BadRequest(anyhow::anyhow!("answer must be 0 (no) or 1 (yes)"))
        })?),
        None => None,
    };

    let artifacts = &state.artifacts;
    let step = tree::step(
        &artifacts.tree,
        &artifacts.feature_names,
        &artifacts.classes,
        request.node_id,
        answer,
    )?;

    let response = DiagnosisResponse::from(step);
    match response.status {
        DiagnosisStatus::Final => {
            tracing::info!(node_id = request.node_id, "questionnaire reached a leaf");
            if let Some(counter) = DIAGNOSES_COMPLETED_TOTAL.get() {
                counter.inc();
            }
        }
        DiagnosisStatus::Question => {
            if let Some(counter) = QUESTIONS_SERVED_TOTAL.get() {
                counter.inc();
            }
        }
    }

    Ok(Json(response))
}
