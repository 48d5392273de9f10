use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct PredictionResponse {
    pub prediction: String,
}
