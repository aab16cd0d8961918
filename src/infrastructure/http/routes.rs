//! HTTP Routes
//!
//! API Endpoints:
//! - /api/ping                 GET   健康检查
//! - /api/session/create       POST  创建会话
//! - /api/session/preferences  POST  更新偏好（语言/旁白开关/网络状态）
//! - /api/session/close        POST  关闭会话
//! - /api/recipe/generate      POST  生成/修正菜谱
//! - /api/recipe/get           POST  获取当前菜谱
//! - /api/research             POST  文化研究查询
//! - /api/narration/play       POST  播放步骤旁白
//! - /api/narration/stop       POST  停止旁白
//! - /api/narration/status     POST  查询播放状态
//! - /ws/session/{id}          WS    会话事件推送

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use super::handlers;
use super::state::AppState;

/// 创建所有路由
pub fn create_routes() -> Router<Arc<AppState>> {
    Router::new()
        .nest("/api", api_routes())
        .route("/ws/session/:session_id", get(handlers::websocket_handler))
}

/// API 路由
fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/ping", get(handlers::ping))
        .nest("/session", session_routes())
        .nest("/recipe", recipe_routes())
        .route("/research", post(handlers::research))
        .nest("/narration", narration_routes())
}

/// Session 路由
fn session_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/create", post(handlers::create_session))
        .route("/preferences", post(handlers::update_preferences))
        .route("/close", post(handlers::close_session))
}

/// Recipe 路由
fn recipe_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/generate", post(handlers::generate_recipe))
        .route("/get", post(handlers::get_recipe))
}

/// Narration 路由
fn narration_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/play", post(handlers::play_narration))
        .route("/stop", post(handlers::stop_narration))
        .route("/status", post(handlers::narration_status))
}
