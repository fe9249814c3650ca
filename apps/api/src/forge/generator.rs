//! Forge pipeline — orchestrates one narrative through prompt construction,
//! the model call, and reply normalization.
//!
//! Flow: build_forge_prompt → ModelCaller::generate → extract_json →
//! normalize_roadmap. Handlers stay thin; this is the only place the
//! pieces meet.

use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::forge::normalizer::{extract_json, normalize_roadmap};
use crate::forge::prompts::{build_forge_prompt, FORGE_SYSTEM};
use crate::llm_client::ModelCaller;
use crate::models::roadmap::RoadmapDocument;

/// Runs the full forge pipeline for one validated narrative.
///
/// Logs lifecycle markers only, never the narrative content or the raw
/// model reply.
pub async fn forge_roadmap(
    llm: &dyn ModelCaller,
    narrative: &str,
) -> Result<RoadmapDocument, AppError> {
    let request_id = Uuid::new_v4();
    info!(
        "forge {request_id}: narrative accepted ({} chars)",
        narrative.chars().count()
    );

    let prompt = build_forge_prompt(narrative);

    let reply = llm
        .generate(&prompt, FORGE_SYSTEM)
        .await
        .map_err(|e| AppError::Ai(format!("model call failed: {e}")))?;
    info!("forge {request_id}: reply received ({} chars)", reply.len());

    let parsed =
        extract_json(&reply).map_err(|e| AppError::Ai(format!("reply normalization failed: {e}")))?;
    let document = normalize_roadmap(&parsed);
    info!(
        "forge {request_id}: roadmap normalized ({} phases, {} learning resources)",
        document.roadmap.phases.len(),
        document.roadmap.resources.learning.len()
    );

    Ok(document)
}
