//! Narration Handlers

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::application::{GetNarrationStateQuery, PlayNarrationCommand, StopNarrationCommand};
use crate::infrastructure::http::dto::ApiResponse;
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::state::AppState;

// ============================================================================
// Play
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct PlayNarrationRequest {
    pub session_id: String,
    #[serde(default)]
    pub step_index: usize,
}

#[derive(Debug, Serialize)]
pub struct PlayNarrationResponseDto {
    pub session_id: String,
    pub step_index: usize,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skip_reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u64>,
}

pub async fn play_narration(
    State(state): State<Arc<AppState>>,
    Json(req): Json<PlayNarrationRequest>,
) -> Result<Json<ApiResponse<PlayNarrationResponseDto>>, ApiError> {
    let cmd = PlayNarrationCommand {
        session_id: req.session_id,
        step_index: req.step_index,
    };

    let result = state.play_narration_handler.handle(cmd).await?;

    Ok(Json(ApiResponse::success(PlayNarrationResponseDto {
        session_id: result.session_id,
        step_index: result.step_index,
        status: result.status,
        skip_reason: result.skip_reason,
        duration_ms: result.duration_ms,
    })))
}

// ============================================================================
// Stop
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct StopNarrationRequest {
    pub session_id: String,
}

#[derive(Debug, Serialize)]
pub struct StopNarrationResponseDto {
    pub session_id: String,
    pub status: String,
}

pub async fn stop_narration(
    State(state): State<Arc<AppState>>,
    Json(req): Json<StopNarrationRequest>,
) -> Result<Json<ApiResponse<StopNarrationResponseDto>>, ApiError> {
    let cmd = StopNarrationCommand {
        session_id: req.session_id,
    };

    let result = state.stop_narration_handler.handle(cmd).await?;

    Ok(Json(ApiResponse::success(StopNarrationResponseDto {
        session_id: result.session_id,
        status: result.status,
    })))
}

// ============================================================================
// Status
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct NarrationStatusRequest {
    pub session_id: String,
}

#[derive(Debug, Serialize)]
pub struct NarrationStatusResponseDto {
    pub session_id: String,
    pub status: String,
}

pub async fn narration_status(
    State(state): State<Arc<AppState>>,
    Json(req): Json<NarrationStatusRequest>,
) -> Result<Json<ApiResponse<NarrationStatusResponseDto>>, ApiError> {
    let query = GetNarrationStateQuery {
        session_id: req.session_id,
    };

    let result = state.get_narration_state_handler.handle(query).await?;

    Ok(Json(ApiResponse::success(NarrationStatusResponseDto {
        session_id: result.session_id,
        status: result.status,
    })))
}
