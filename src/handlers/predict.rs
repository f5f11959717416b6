//! Prediction handler

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};

use crate::models::{PredictRequest, PredictResponse};
use crate::{AppResult, AppState};

/// Predict days until compost readiness
pub async fn predict(
    State(state): State<AppState>,
    payload: Result<Json<PredictRequest>, JsonRejection>,
) -> AppResult<Json<PredictResponse>> {
    let Json(req) = payload?;

    let result = state.predictor.predict(req)?;

    Ok(Json(PredictResponse {
        predicted_days: result.predicted_days,
    }))
}
