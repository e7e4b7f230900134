mod diagnosis;

pub use diagnosis::{DiagnosisRequest, DiagnosisResponse, DiagnosisStatus, PredictionResult};
