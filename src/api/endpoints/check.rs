//! `POST /check`: run the contradiction pipeline on one manuscript.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;

use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::pipeline::contradiction::Outcome;

/// Largest manuscript accepted in one request (characters).
pub const MAX_MANUSCRIPT_CHARS: usize = 500_000;

#[derive(Deserialize)]
pub struct CheckRequest {
    pub text: String,
}

/// Runs the check on the blocking pool. If the client goes away the
/// inference call still completes and its result is dropped.
pub async fn check(
    State(ctx): State<ApiContext>,
    Json(req): Json<CheckRequest>,
) -> Result<Response, ApiError> {
    let char_count = req.text.chars().count();
    if char_count > MAX_MANUSCRIPT_CHARS {
        return Err(ApiError::BadRequest(format!(
            "Manuscript too long ({char_count} characters, max {MAX_MANUSCRIPT_CHARS})"
        )));
    }

    let checker = Arc::clone(&ctx.checker);
    let outcome = tokio::task::spawn_blocking(move || checker.check(&req.text)).await?;

    Ok(outcome_response(outcome))
}

/// Map an outcome onto its HTTP response.
pub fn outcome_response(outcome: Outcome) -> Response {
    match outcome {
        Outcome::Empty => StatusCode::NO_CONTENT.into_response(),
        Outcome::Error(finding) => {
            (StatusCode::INTERNAL_SERVER_ERROR, Json(vec![finding])).into_response()
        }
        Outcome::Findings(findings) => (StatusCode::OK, Json(findings)).into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::contradiction::{Finding, FindingType};
    use axum::body::to_bytes;

    #[tokio::test]
    async fn empty_maps_to_204() {
        let response = outcome_response(Outcome::Empty);
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        let body = to_bytes(response.into_body(), 1024).await.unwrap();
        assert!(body.is_empty());
    }

    #[tokio::test]
    async fn error_maps_to_500_with_single_finding() {
        let response = outcome_response(Outcome::Error(Finding::error("timed out")));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = to_bytes(response.into_body(), 4096).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json.as_array().unwrap().len(), 1);
        assert_eq!(json[0]["type"], "Error");
        assert_eq!(json[0]["quote"], "ERROR");
    }

    #[tokio::test]
    async fn findings_map_to_200_with_list() {
        let finding = Finding {
            id: 1,
            finding_type: FindingType::Setting,
            line: 5,
            page: 1,
            quote: "bright noon sunlight".into(),
            explanation: "Line 1 says night.".into(),
        };
        let response = outcome_response(Outcome::Findings(vec![finding]));
        assert_eq!(response.status(), StatusCode::OK);
        let body = to_bytes(response.into_body(), 4096).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json[0]["type"], "Setting");
        assert_eq!(json[0]["line"], 5);
    }
}
