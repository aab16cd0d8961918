//! Recipe Handlers

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::application::{GenerateRecipeCommand, GetRecipeQuery};
use crate::domain::recipe::{Recipe, Region};
use crate::infrastructure::http::dto::ApiResponse;
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::state::AppState;

// ============================================================================
// Generate Recipe
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct GenerateRecipeRequest {
    pub session_id: String,
    pub input: String,
    #[serde(default)]
    pub region: Region,
    #[serde(default)]
    pub correction_feedback: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct RecipeResponseDto {
    pub session_id: String,
    pub recipe: Recipe,
}

pub async fn generate_recipe(
    State(state): State<Arc<AppState>>,
    Json(req): Json<GenerateRecipeRequest>,
) -> Result<Json<ApiResponse<RecipeResponseDto>>, ApiError> {
    if req.input.trim().is_empty() {
        return Err(ApiError::BadRequest("Input must not be empty".to_string()));
    }

    let cmd = GenerateRecipeCommand {
        session_id: req.session_id,
        input: req.input,
        region: req.region,
        correction_feedback: req.correction_feedback,
    };

    let result = state.generate_recipe_handler.handle(cmd).await?;

    Ok(Json(ApiResponse::success(RecipeResponseDto {
        session_id: result.session_id,
        recipe: result.recipe,
    })))
}

// ============================================================================
// Get Recipe
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct GetRecipeRequest {
    pub session_id: String,
}

#[derive(Debug, Serialize)]
pub struct GetRecipeResponseDto {
    pub session_id: String,
    pub recipe: Option<Recipe>,
    pub current_step: usize,
}

pub async fn get_recipe(
    State(state): State<Arc<AppState>>,
    Json(req): Json<GetRecipeRequest>,
) -> Result<Json<ApiResponse<GetRecipeResponseDto>>, ApiError> {
    let query = GetRecipeQuery {
        session_id: req.session_id,
    };

    let result = state.get_recipe_handler.handle(query).await?;

    Ok(Json(ApiResponse::success(GetRecipeResponseDto {
        session_id: result.session_id,
        recipe: result.recipe,
        current_step: result.current_step,
    })))
}
