use crate::tree::{Prediction, Step};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// One questionnaire exchange. `node_id` is the client-held traversal token
/// (0 = root); `answer` applies one yes/no reply before reporting the next
/// state.
#[derive(Debug, Deserialize, Validate)]
pub struct DiagnosisRequest {
    #[serde(default)]
    pub node_id: usize,

    /// 0 = no, 1 = yes. Anything else is rejected at the boundary.
    #[validate(range(min = 0, max = 1, message = "answer must be 0 (no) or 1 (yes)"))]
    pub answer: Option<u8>,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DiagnosisStatus {
    Question,
    Final,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct PredictionResult {
    pub disease: String,
    pub confidence: String,
}

impl From<Prediction> for PredictionResult {
    fn from(prediction: Prediction) -> Self {
        Self {
            disease: prediction.disease,
            confidence: prediction.confidence,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DiagnosisResponse {
    pub status: DiagnosisStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub node_id: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub question: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub results: Option<Vec<PredictionResult>>,
}

impl From<Step> for DiagnosisResponse {
    fn from(step: Step) -> Self {
        match step {
            Step::Question { node_id, feature } => Self {
                status: DiagnosisStatus::Question,
                node_id: Some(node_id),
                question: Some(format!("Do you have {}?", feature.replace('_', " "))),
                results: None,
            },
            Step::Final { results } => Self {
                status: DiagnosisStatus::Final,
                node_id: None,
                question: None,
                results: Some(results.into_iter().map(PredictionResult::from).collect()),
            },
        }
    }
}
