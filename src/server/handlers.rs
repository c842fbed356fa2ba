//! HTTP request handlers

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Json, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use serde::Serialize;

use crate::engine::Pipeline;
use crate::error::Error;
use crate::model::FeatureVector;

/// Shared application state
pub struct AppState {
    pub pipeline: Arc<Pipeline>,
}

impl AppState {
    pub fn new(pipeline: Arc<Pipeline>) -> Self {
        Self { pipeline }
    }
}

/// Readiness endpoint: 200 when a model is bound, 503 otherwise
pub async fn health(State(state): State<Arc<AppState>>) -> Response {
    let report = state.pipeline.status();
    let status = if report.ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (status, Json(report)).into_response()
}

/// Prediction endpoint
pub async fn predict(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<FeatureVector>, JsonRejection>,
) -> Response {
    let Json(vector) = match payload {
        Ok(payload) => payload,
        Err(rejection) => {
            return error_response(
                rejection.status(),
                rejection_kind(&rejection),
                rejection.body_text(),
            );
        }
    };

    match state.pipeline.handle_predict(&vector).await {
        Ok(result) => (StatusCode::OK, Json(result)).into_response(),
        Err(e) => {
            let (status, kind) = classify(&e);
            error_response(status, kind, e.to_string())
        }
    }
}

/// Prometheus scrape endpoint
pub async fn metrics(State(state): State<Arc<AppState>>) -> Response {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, prometheus::TEXT_FORMAT)],
        state.pipeline.metrics().gather(),
    )
        .into_response()
}

/// Map a pipeline error to a status code and stable error type
fn classify(err: &Error) -> (StatusCode, &'static str) {
    match err {
        Error::Validation(_) => (StatusCode::UNPROCESSABLE_ENTITY, "validation_error"),
        Error::ModelUnavailable => (StatusCode::SERVICE_UNAVAILABLE, "model_unavailable"),
        Error::Prediction(_) => (StatusCode::INTERNAL_SERVER_ERROR, "prediction_error"),
        _ => (StatusCode::INTERNAL_SERVER_ERROR, "server_error"),
    }
}

/// Stable error type for a body that never reached the pipeline
fn rejection_kind(rejection: &JsonRejection) -> &'static str {
    match rejection {
        JsonRejection::JsonDataError(_) => "validation_error",
        JsonRejection::JsonSyntaxError(_) => "malformed_json",
        JsonRejection::MissingJsonContentType(_) => "unsupported_media_type",
        _ => "invalid_body",
    }
}

fn error_response(status: StatusCode, kind: &str, message: String) -> Response {
    (
        status,
        Json(ErrorResponse {
            error: ErrorDetail {
                message,
                r#type: kind.to_string(),
            },
        }),
    )
        .into_response()
}

// Response types

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Serialize)]
pub struct ErrorDetail {
    pub message: String,
    pub r#type: String,
}
