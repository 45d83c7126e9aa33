//! `lowergi serve` -- HTTP JSON API host for the triage engine.
//!
//! Exposes the engine as an async HTTP service using `axum` + `tokio`.
//! Stateless by design: every request carries the full encounter state,
//! so the server keeps no per-encounter state and nothing is shared
//! between concurrent encounters. No patient data is stored.
//!
//! Endpoints:
//! - GET  /health        - Server status
//! - GET  /symptoms      - The fixed symptom catalogue
//! - POST /triage/next   - Next question or terminal recommendation for
//!                         an encounter state
//!
//! All responses use Content-Type: application/json.

use axum::http::{Method, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use tower_http::cors::{Any, CorsLayer};

use lowergi_engine::{next_step, Symptom, TriageState};

/// Construct a JSON error response with the given status code and message.
fn json_error(status: StatusCode, message: &str) -> impl IntoResponse {
    (status, Json(serde_json::json!({ "error": message })))
}

/// Start the HTTP server on the given port.
///
/// CORS is permissive (any origin) so a local web form can drive the
/// engine directly.
pub(crate) async fn start_server(port: u16) -> Result<(), Box<dyn std::error::Error>> {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers(Any);

    let app = Router::new()
        .route("/health", get(handle_health))
        .route("/symptoms", get(handle_symptoms))
        .route("/triage/next", post(handle_next))
        .fallback(handle_not_found)
        .layer(cors);

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port)).await?;
    eprintln!("lowergi API listening on port {}", port);
    axum::serve(listener, app).await?;
    Ok(())
}

/// Fallback handler for unmatched routes.
async fn handle_not_found() -> impl IntoResponse {
    json_error(StatusCode::NOT_FOUND, "not found")
}

/// GET /health
async fn handle_health() -> impl IntoResponse {
    let response = serde_json::json!({
        "status": "ok",
        "engine_version": env!("CARGO_PKG_VERSION"),
    });
    (StatusCode::OK, Json(response))
}

/// GET /symptoms
async fn handle_symptoms() -> impl IntoResponse {
    let symptoms: Vec<serde_json::Value> = Symptom::ALL
        .iter()
        .enumerate()
        .map(|(index, symptom)| {
            serde_json::json!({
                "key": index + 1,
                "id": symptom,
                "label": symptom.label(),
                "fit_not_required": symptom.fit_not_required(),
            })
        })
        .collect();
    (StatusCode::OK, Json(serde_json::json!({ "symptoms": symptoms })))
}

/// POST /triage/next
///
/// Body: a `TriageState` JSON object (answers so far). Responds with the
/// next question prompt or the terminal recommendation, plus any advisory
/// notes. Inconsistent states get a 422 with the engine's error message.
async fn handle_next(Json(state): Json<TriageState>) -> axum::response::Response {
    match next_step(&state) {
        Ok(step) => {
            let notes: Vec<&str> = state.advisory_notes().iter().map(|n| n.text()).collect();
            let body = serde_json::json!({ "notes": notes, "next": step });
            (StatusCode::OK, Json(body)).into_response()
        }
        Err(e) => json_error(StatusCode::UNPROCESSABLE_ENTITY, &e.to_string()).into_response(),
    }
}
