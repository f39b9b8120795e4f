use std::sync::Arc;

use axum::{
    extract::{DefaultBodyLimit, Multipart, State},
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router,
};

use crate::models::{ErrorResponse, PredictResponse};
use crate::services::CalorieEstimator;

pub struct AppState {
    pub estimator: Arc<dyn CalorieEstimator>,
}

pub fn create_router(estimator: Arc<dyn CalorieEstimator>) -> Router {
    let state = Arc::new(AppState { estimator });

    // No size constraint is enforced before forwarding; axum's default 2 MB
    // body limit would reject ordinary phone-camera photos.
    Router::new()
        .route("/", get(root_handler))
        .route("/health", get(health_check))
        .route("/predict", post(predict_handler))
        .layer(DefaultBodyLimit::disable())
        .with_state(state)
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn client_error(message: impl Into<String>) -> ApiError {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse {
            error: message.into(),
        }),
    )
}

/// `POST /predict` — accept a multipart image upload and return the model's
/// calorie estimate. One outbound call per request, no caching.
async fn predict_handler(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Json<PredictResponse>, ApiError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| client_error(format!("invalid multipart body: {}", e)))?
    {
        if field.name() != Some("image") {
            continue;
        }

        let mime_type = field.content_type().unwrap_or("image/jpeg").to_string();
        let data = field
            .bytes()
            .await
            .map_err(|e| client_error(format!("failed to read image field: {}", e)))?;

        log::info!("📸 Received image upload: {} bytes ({})", data.len(), mime_type);

        let answer = state
            .estimator
            .estimate_calories(&data, &mime_type)
            .await
            .map_err(|e| {
                log::error!("❌ Calorie estimation failed: {:#}", e);
                (
                    StatusCode::BAD_GATEWAY,
                    Json(ErrorResponse {
                        error: "calorie estimation service unavailable".to_string(),
                    }),
                )
            })?;

        return Ok(Json(PredictResponse { calories: answer }));
    }

    Err(client_error("missing 'image' form field"))
}

async fn root_handler() -> &'static str {
    "Calorie estimation service - POST an image to /predict"
}

async fn health_check() -> StatusCode {
    StatusCode::OK
}
