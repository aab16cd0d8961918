//! Session Commands - 会话相关命令

use crate::domain::recipe::{Language, UserPlan};

/// 创建会话命令
#[derive(Debug, Clone)]
pub struct CreateSessionCommand {
    pub plan: UserPlan,
    pub language: Language,
}

/// 创建会话响应
#[derive(Debug, Clone)]
pub struct CreateSessionResponse {
    pub session_id: String,
    pub plan: UserPlan,
    pub language: Language,
}

/// 更新偏好命令（None 字段保持不变）
#[derive(Debug, Clone, Default)]
pub struct UpdatePreferencesCommand {
    pub session_id: String,
    pub audio_enabled: Option<bool>,
    pub online: Option<bool>,
    pub language: Option<Language>,
}

/// 更新偏好响应
#[derive(Debug, Clone)]
pub struct UpdatePreferencesResponse {
    pub session_id: String,
    pub audio_enabled: bool,
    pub online: bool,
    pub language: Language,
}

/// 关闭会话命令
#[derive(Debug, Clone)]
pub struct CloseSessionCommand {
    pub session_id: String,
}

/// 关闭会话响应
#[derive(Debug, Clone)]
pub struct CloseSessionResponse {
    pub session_id: String,
}
