//! Axum route handlers for the Forge API.

use axum::extract::rejection::JsonRejection;
use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::errors::{AppError, ErrorBody};
use crate::forge::generator::forge_roadmap;
use crate::forge::validation::validate_narrative;
use crate::models::roadmap::RoadmapDocument;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ForgeRequest {
    pub narrative: String,
}

/// Success envelope. The error arm is shaped by [`AppError`]'s
/// `IntoResponse`, so both arms share `{success, data, error}`.
#[derive(Debug, Serialize)]
pub struct ForgeResponse {
    pub success: bool,
    pub data: RoadmapDocument,
    pub error: Option<ErrorBody>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/forge
///
/// Validates the narrative, runs the forge pipeline, and wraps the
/// normalized roadmap in the success envelope. A body that fails JSON
/// deserialization is a 400, same as an out-of-bounds narrative.
pub async fn handle_forge(
    State(state): State<AppState>,
    payload: Result<Json<ForgeRequest>, JsonRejection>,
) -> Result<Json<ForgeResponse>, AppError> {
    let Json(request) = payload.map_err(|_| {
        AppError::InvalidInput(
            "request body must be JSON with a string `narrative` field".to_string(),
        )
    })?;

    let verdict = validate_narrative(&request.narrative);
    if !verdict.valid {
        return Err(AppError::InvalidInput(
            verdict
                .reason
                .unwrap_or_else(|| "invalid narrative".to_string()),
        ));
    }

    let document = forge_roadmap(state.llm.as_ref(), request.narrative.trim()).await?;

    Ok(Json(ForgeResponse {
        success: true,
        data: document,
        error: None,
    }))
}
