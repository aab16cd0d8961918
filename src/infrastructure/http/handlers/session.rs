//! Session Handlers

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::application::{CloseSessionCommand, CreateSessionCommand, UpdatePreferencesCommand};
use crate::domain::recipe::{Language, UserPlan};
use crate::infrastructure::http::dto::ApiResponse;
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::state::AppState;

// ============================================================================
// Create Session
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct CreateSessionRequest {
    #[serde(default)]
    pub plan: UserPlan,
    #[serde(default)]
    pub language: Language,
}

#[derive(Debug, Serialize)]
pub struct CreateSessionResponseDto {
    pub session_id: String,
    pub plan: UserPlan,
    pub language: Language,
}

pub async fn create_session(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateSessionRequest>,
) -> Result<Json<ApiResponse<CreateSessionResponseDto>>, ApiError> {
    let cmd = CreateSessionCommand {
        plan: req.plan,
        language: req.language,
    };

    let result = state.create_session_handler.handle(cmd).await?;

    Ok(Json(ApiResponse::success(CreateSessionResponseDto {
        session_id: result.session_id,
        plan: result.plan,
        language: result.language,
    })))
}

// ============================================================================
// Update Preferences
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct UpdatePreferencesRequest {
    pub session_id: String,
    pub audio_enabled: Option<bool>,
    pub online: Option<bool>,
    pub language: Option<Language>,
}

#[derive(Debug, Serialize)]
pub struct UpdatePreferencesResponseDto {
    pub session_id: String,
    pub audio_enabled: bool,
    pub online: bool,
    pub language: Language,
}

pub async fn update_preferences(
    State(state): State<Arc<AppState>>,
    Json(req): Json<UpdatePreferencesRequest>,
) -> Result<Json<ApiResponse<UpdatePreferencesResponseDto>>, ApiError> {
    let cmd = UpdatePreferencesCommand {
        session_id: req.session_id,
        audio_enabled: req.audio_enabled,
        online: req.online,
        language: req.language,
    };

    let result = state.update_preferences_handler.handle(cmd).await?;

    Ok(Json(ApiResponse::success(UpdatePreferencesResponseDto {
        session_id: result.session_id,
        audio_enabled: result.audio_enabled,
        online: result.online,
        language: result.language,
    })))
}

// ============================================================================
// Close Session
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct CloseSessionRequest {
    pub session_id: String,
}

#[derive(Debug, Serialize)]
pub struct CloseSessionResponseDto {
    pub session_id: String,
}

pub async fn close_session(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CloseSessionRequest>,
) -> Result<Json<ApiResponse<CloseSessionResponseDto>>, ApiError> {
    let cmd = CloseSessionCommand {
        session_id: req.session_id,
    };

    let result = state.close_session_handler.handle(cmd).await?;

    Ok(Json(ApiResponse::success(CloseSessionResponseDto {
        session_id: result.session_id,
    })))
}
