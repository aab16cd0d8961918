//! Session Manager Port - 会话生命周期管理
//!
//! 会话承载 UI 壳的用户状态：套餐、语言、音频偏好、上报的
//! 网络状态、当前加载的菜谱与步骤。具体实现在 infrastructure/memory 层

use chrono::{DateTime, Utc};
use thiserror::Error;
use uuid::Uuid;

use crate::domain::recipe::{Language, Recipe, UserPlan};

/// Session Manager 错误
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Session not found: {0}")]
    NotFound(String),

    #[error("Session already exists: {0}")]
    AlreadyExists(String),
}

/// 会话状态（in-memory）
#[derive(Debug, Clone)]
pub struct Session {
    pub id: String,
    pub plan: UserPlan,
    pub language: Language,
    /// 用户是否开启旁白
    pub audio_enabled: bool,
    /// 客户端上报的网络连通性
    pub online: bool,
    /// 当前加载的菜谱
    pub recipe: Option<Recipe>,
    /// 烹饪视图当前步骤
    pub current_step: usize,
    pub created_at: DateTime<Utc>,
    pub last_activity: DateTime<Utc>,
}

impl Session {
    pub fn new(plan: UserPlan, language: Language) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            plan,
            language,
            audio_enabled: true,
            online: true,
            recipe: None,
            current_step: 0,
            created_at: now,
            last_activity: now,
        }
    }
}

/// 偏好更新（字段为 None 表示保持不变）
#[derive(Debug, Clone, Default)]
pub struct PreferencesUpdate {
    pub audio_enabled: Option<bool>,
    pub online: Option<bool>,
    pub language: Option<Language>,
}

/// Session Manager Port
///
/// 管理会话生命周期，所有状态存储在内存中
pub trait SessionManagerPort: Send + Sync {
    /// 创建新会话
    fn create(&self, session: Session) -> Result<String, SessionError>;

    /// 获取会话快照
    fn get(&self, id: &str) -> Result<Session, SessionError>;

    /// 载入菜谱并把当前步骤归零
    fn set_recipe(&self, id: &str, recipe: Recipe) -> Result<(), SessionError>;

    /// 更新当前步骤
    fn set_step(&self, id: &str, step: usize) -> Result<(), SessionError>;

    /// 更新偏好，返回更新后的快照
    fn set_preferences(
        &self,
        id: &str,
        update: PreferencesUpdate,
    ) -> Result<Session, SessionError>;

    /// 检查会话是否有效
    fn is_valid(&self, id: &str) -> bool;

    /// 关闭会话
    fn close(&self, id: &str) -> Result<(), SessionError>;

    /// 更新最后活动时间
    fn touch(&self, id: &str);

    /// 获取所有过期会话的 ID
    fn get_expired_sessions(&self, idle_timeout_secs: u64) -> Vec<String>;
}
