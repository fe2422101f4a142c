//! HTTP front end for the StudentVibe humanizer
//!
//! Routes:
//! - `POST /api/humanize`: run one request through the pipeline
//! - `GET /api/personas`: available personas and their tone
//! - `GET /health`: liveness plus the active engine and rate limiter

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::{HeaderMap, HeaderName, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use serde::Serialize;
use studentvibe_core::{
    ClientContext, ErrorBody, ErrorKind, HumanizeOutcome, Humanizer, PersonaTag, RateLimitStatus,
    RawHumanizeRequest,
};
use tower_http::cors::CorsLayer;
use tracing::{debug, warn};

/// Shared handler state
#[derive(Clone)]
pub struct AppState {
    pub humanizer: Arc<Humanizer>,
    /// Rate-limit identity when `X-Forwarded-For` is absent
    pub fallback_identity: String,
}

impl AppState {
    pub fn new(humanizer: Humanizer) -> Self {
        let fallback_identity = humanizer.guard().config().rate_limit.fallback_identity.clone();
        Self {
            humanizer: Arc::new(humanizer),
            fallback_identity,
        }
    }
}

/// Build the application router
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(health_handler))
        .route("/health", get(health_handler))
        .route("/api/personas", get(personas_handler))
        .route("/api/humanize", post(humanize_handler))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

// ─────────────────────────────────────────────────────────────────────────────
// Response types
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct HealthResponse {
    status: &'static str,
    engine: &'static str,
    rate_limiter: &'static str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PersonaInfo {
    tag: PersonaTag,
    display_name: &'static str,
    tone: &'static str,
}

#[derive(Serialize)]
struct PersonasResponse {
    personas: Vec<PersonaInfo>,
    default: PersonaTag,
}

// ─────────────────────────────────────────────────────────────────────────────
// Handlers
// ─────────────────────────────────────────────────────────────────────────────

async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        engine: state.humanizer.generator_name(),
        rate_limiter: state.humanizer.guard().rate_limiter_name(),
    })
}

async fn personas_handler() -> Json<PersonasResponse> {
    let personas = PersonaTag::ALL
        .iter()
        .map(|tag| {
            let profile = tag.profile();
            PersonaInfo {
                tag: *tag,
                display_name: profile.display_name,
                tone: profile.tone,
            }
        })
        .collect();

    Json(PersonasResponse {
        personas,
        default: PersonaTag::default(),
    })
}

async fn humanize_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Json<RawHumanizeRequest>, JsonRejection>,
) -> Response {
    let Json(request) = match body {
        Ok(body) => body,
        Err(rejection) => {
            debug!(error = %rejection.body_text(), "Rejected request body");
            return (
                StatusCode::BAD_REQUEST,
                Json(ErrorBody {
                    error: "Invalid JSON body".to_string(),
                    kind: ErrorKind::InvalidInput,
                }),
            )
                .into_response();
        }
    };

    let forwarded = headers.get("x-forwarded-for").and_then(|v| v.to_str().ok());
    let context = ClientContext::from_forwarded_for(forwarded, &state.fallback_identity);

    let outcome = state.humanizer.process(request, &context).await;
    outcome_response(&outcome)
}

/// Map a pipeline outcome onto status, headers and JSON body
pub fn outcome_response(outcome: &HumanizeOutcome) -> Response {
    let status = StatusCode::from_u16(outcome.status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    let mut response = (status, Json(outcome.body())).into_response();

    if let HumanizeOutcome::Rejected {
        rate_limit: Some(limit),
        ..
    } = outcome
    {
        insert_rate_limit_headers(response.headers_mut(), limit);
    }

    response
}

fn insert_rate_limit_headers(headers: &mut HeaderMap, status: &RateLimitStatus) {
    let retry_after = (status.reset_at - Utc::now()).num_seconds().max(0);
    let values = [
        ("x-ratelimit-limit", status.limit.to_string()),
        ("x-ratelimit-remaining", status.remaining.to_string()),
        ("x-ratelimit-reset", status.reset_at.timestamp().to_string()),
        ("retry-after", retry_after.to_string()),
    ];

    for (name, value) in values {
        match HeaderValue::from_str(&value) {
            Ok(value) => {
                headers.insert(HeaderName::from_static(name), value);
            }
            Err(e) => warn!(header = name, error = %e, "Skipping rate limit header"),
        }
    }
}
