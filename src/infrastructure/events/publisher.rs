//! Event Publisher Implementation
//!
//! WebSocket 事件推送实现

use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::broadcast;

/// WebSocket 事件类型
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "event", content = "data")]
pub enum WsEvent {
    /// 菜谱生成完成
    RecipeReady {
        session_id: String,
        recipe_id: String,
        title: String,
        step_count: usize,
    },
    /// 菜谱生成失败
    RecipeFailed {
        session_id: String,
        error: String,
    },
    /// 旁白开始播放
    NarrationStarted {
        session_id: String,
        step_index: usize,
        duration_ms: u64,
    },
    /// 旁白播放完成
    NarrationFinished {
        session_id: String,
        step_index: usize,
    },
    /// 旁白被跳过
    NarrationSkipped {
        session_id: String,
        step_index: usize,
        reason: String,
    },
    /// 旁白被停止
    NarrationStopped {
        session_id: String,
    },
    /// 会话关闭
    SessionClosed {
        session_id: String,
        reason: String,
    },
}

/// 事件发布器
pub struct EventPublisher {
    /// session_id -> broadcast sender
    session_channels: DashMap<String, broadcast::Sender<WsEvent>>,
}

impl EventPublisher {
    pub fn new() -> Self {
        Self {
            session_channels: DashMap::new(),
        }
    }

    pub fn arc(self) -> Arc<Self> {
        Arc::new(self)
    }

    /// 注册会话的事件通道
    pub fn register_session(&self, session_id: &str) -> broadcast::Receiver<WsEvent> {
        if let Some(sender) = self.session_channels.get(session_id) {
            return sender.subscribe();
        }

        let (tx, rx) = broadcast::channel(100);
        self.session_channels.insert(session_id.to_string(), tx);
        rx
    }

    /// 取消注册会话
    pub fn unregister_session(&self, session_id: &str) {
        self.session_channels.remove(session_id);
    }

    /// 获取会话的事件接收器
    pub fn subscribe(&self, session_id: &str) -> Option<broadcast::Receiver<WsEvent>> {
        self.session_channels.get(session_id).map(|s| s.subscribe())
    }

    /// 发布菜谱生成完成事件
    pub fn publish_recipe_ready(
        &self,
        session_id: &str,
        recipe_id: &str,
        title: &str,
        step_count: usize,
    ) {
        self.publish_to_session(
            session_id,
            WsEvent::RecipeReady {
                session_id: session_id.to_string(),
                recipe_id: recipe_id.to_string(),
                title: title.to_string(),
                step_count,
            },
        );
    }

    /// 发布菜谱生成失败事件
    pub fn publish_recipe_failed(&self, session_id: &str, error: &str) {
        self.publish_to_session(
            session_id,
            WsEvent::RecipeFailed {
                session_id: session_id.to_string(),
                error: error.to_string(),
            },
        );
    }

    /// 发布旁白开始事件
    pub fn publish_narration_started(&self, session_id: &str, step_index: usize, duration_ms: u64) {
        self.publish_to_session(
            session_id,
            WsEvent::NarrationStarted {
                session_id: session_id.to_string(),
                step_index,
                duration_ms,
            },
        );
    }

    /// 发布旁白完成事件
    pub fn publish_narration_finished(&self, session_id: &str, step_index: usize) {
        self.publish_to_session(
            session_id,
            WsEvent::NarrationFinished {
                session_id: session_id.to_string(),
                step_index,
            },
        );
    }

    /// 发布旁白跳过事件
    pub fn publish_narration_skipped(&self, session_id: &str, step_index: usize, reason: &str) {
        self.publish_to_session(
            session_id,
            WsEvent::NarrationSkipped {
                session_id: session_id.to_string(),
                step_index,
                reason: reason.to_string(),
            },
        );
    }

    /// 发布旁白停止事件
    pub fn publish_narration_stopped(&self, session_id: &str) {
        self.publish_to_session(
            session_id,
            WsEvent::NarrationStopped {
                session_id: session_id.to_string(),
            },
        );
    }

    /// 发布会话关闭事件
    pub fn publish_session_closed(&self, session_id: &str, reason: &str) {
        self.publish_to_session(
            session_id,
            WsEvent::SessionClosed {
                session_id: session_id.to_string(),
                reason: reason.to_string(),
            },
        );
    }

    /// 发布事件到指定会话
    fn publish_to_session(&self, session_id: &str, event: WsEvent) {
        if let Some(sender) = self.session_channels.get(session_id) {
            if let Err(e) = sender.send(event) {
                tracing::debug!(
                    session_id = %session_id,
                    error = %e,
                    "Failed to publish event (no receivers)"
                );
            }
        }
    }
}

impl Default for EventPublisher {
    fn default() -> Self {
        Self::new()
    }
}
