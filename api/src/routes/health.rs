use actix_web::{web, HttpResponse};
use chrono::Utc;
use serde_json::json;

use super::AppState;

/// Handler for GET /health
///
/// Reports liveness together with the upstream circuit state. The circuit is
/// read from the shared store, so every instance reports the same value.
pub async fn health_check(state: web::Data<AppState>) -> HttpResponse {
    let circuit = state.proxy.circuit_state().await;

    HttpResponse::Ok().json(json!({
        "status": "ok",
        "timestamp": Utc::now().to_rfc3339(),
        "circuit": circuit.as_str(),
    }))
}
