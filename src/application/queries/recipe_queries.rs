//! Recipe Queries - 菜谱与播放状态查询

use crate::domain::recipe::Recipe;

/// 获取当前菜谱查询
#[derive(Debug, Clone)]
pub struct GetRecipeQuery {
    pub session_id: String,
}

/// 获取当前菜谱响应
#[derive(Debug, Clone)]
pub struct GetRecipeResponse {
    pub session_id: String,
    pub recipe: Option<Recipe>,
    pub current_step: usize,
}

/// 获取播放状态查询
#[derive(Debug, Clone)]
pub struct GetNarrationStateQuery {
    pub session_id: String,
}

/// 获取播放状态响应
#[derive(Debug, Clone)]
pub struct GetNarrationStateResponse {
    pub session_id: String,
    pub status: String,
}
