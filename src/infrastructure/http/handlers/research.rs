//! Research Handlers

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::application::ResearchQuery;
use crate::infrastructure::http::dto::ApiResponse;
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ResearchRequest {
    pub session_id: String,
    pub topic: String,
}

#[derive(Debug, Serialize)]
pub struct ResearchResponseDto {
    pub session_id: String,
    pub topic: String,
    pub content: String,
}

pub async fn research(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ResearchRequest>,
) -> Result<Json<ApiResponse<ResearchResponseDto>>, ApiError> {
    if req.topic.trim().is_empty() {
        return Err(ApiError::BadRequest("Topic must not be empty".to_string()));
    }

    let query = ResearchQuery {
        session_id: req.session_id,
        topic: req.topic,
    };

    let result = state.research_handler.handle(query).await?;

    Ok(Json(ApiResponse::success(ResearchResponseDto {
        session_id: result.session_id,
        topic: result.topic,
        content: result.content,
    })))
}
