use serde::{Deserialize, Serialize};

/// Success body for `POST /predict`. The calories field carries the model's
/// textual answer, not a validated number.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictResponse {
    pub calories: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}
