use axum::{extract::State, http::StatusCode, Json};
use common_utils::consts;
use serde_json::json;

use crate::http::state::AppState;

pub async fn health(State(state): State<AppState>) -> Result<Json<serde_json::Value>, StatusCode> {
    Ok(Json(json!({
        "status": "healthy",
        "service": consts::SERVICE_NAME,
        "connector": state.walletone.id(),
    })))
}
