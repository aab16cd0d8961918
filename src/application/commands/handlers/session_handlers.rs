//! Session Command Handlers

use std::sync::Arc;

use crate::application::commands::session_commands::*;
use crate::application::error::ApplicationError;
use crate::application::narrator::Narrator;
use crate::application::ports::{PreferencesUpdate, Session, SessionManagerPort};
use crate::infrastructure::events::EventPublisher;

/// CreateSession Handler - 创建会话
pub struct CreateSessionHandler {
    session_manager: Arc<dyn SessionManagerPort>,
}

impl CreateSessionHandler {
    pub fn new(session_manager: Arc<dyn SessionManagerPort>) -> Self {
        Self { session_manager }
    }

    pub async fn handle(
        &self,
        cmd: CreateSessionCommand,
    ) -> Result<CreateSessionResponse, ApplicationError> {
        let session = Session::new(cmd.plan, cmd.language);
        let session_id = self.session_manager.create(session)?;

        tracing::info!(
            session_id = %session_id,
            plan = ?cmd.plan,
            language = ?cmd.language,
            "Session created"
        );

        Ok(CreateSessionResponse {
            session_id,
            plan: cmd.plan,
            language: cmd.language,
        })
    }
}

/// UpdatePreferences Handler - 更新偏好
///
/// 关闭旁白或转入离线时立即静默当前播放
pub struct UpdatePreferencesHandler {
    session_manager: Arc<dyn SessionManagerPort>,
    narrator: Arc<Narrator>,
}

impl UpdatePreferencesHandler {
    pub fn new(session_manager: Arc<dyn SessionManagerPort>, narrator: Arc<Narrator>) -> Self {
        Self {
            session_manager,
            narrator,
        }
    }

    pub async fn handle(
        &self,
        cmd: UpdatePreferencesCommand,
    ) -> Result<UpdatePreferencesResponse, ApplicationError> {
        let update = PreferencesUpdate {
            audio_enabled: cmd.audio_enabled,
            online: cmd.online,
            language: cmd.language,
        };
        let session = self.session_manager.set_preferences(&cmd.session_id, update)?;

        if cmd.audio_enabled == Some(false) || cmd.online == Some(false) {
            self.narrator.stop().await;
        }

        tracing::info!(
            session_id = %cmd.session_id,
            audio_enabled = session.audio_enabled,
            online = session.online,
            language = ?session.language,
            "Session preferences updated"
        );

        Ok(UpdatePreferencesResponse {
            session_id: cmd.session_id,
            audio_enabled: session.audio_enabled,
            online: session.online,
            language: session.language,
        })
    }
}

/// CloseSession Handler - 关闭会话
pub struct CloseSessionHandler {
    session_manager: Arc<dyn SessionManagerPort>,
    narrator: Arc<Narrator>,
    event_publisher: Arc<EventPublisher>,
}

impl CloseSessionHandler {
    pub fn new(
        session_manager: Arc<dyn SessionManagerPort>,
        narrator: Arc<Narrator>,
        event_publisher: Arc<EventPublisher>,
    ) -> Self {
        Self {
            session_manager,
            narrator,
            event_publisher,
        }
    }

    pub async fn handle(
        &self,
        cmd: CloseSessionCommand,
    ) -> Result<CloseSessionResponse, ApplicationError> {
        // 会话关闭前先静默播放
        self.narrator.stop().await;

        self.event_publisher
            .publish_session_closed(&cmd.session_id, "client_close");

        self.session_manager.close(&cmd.session_id)?;
        self.event_publisher.unregister_session(&cmd.session_id);

        tracing::info!(session_id = %cmd.session_id, "Session closed");

        Ok(CloseSessionResponse {
            session_id: cmd.session_id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::narrator::NarratorConfig;
    use crate::infrastructure::adapters::gen_ai::FakeGenAiClient;
    use crate::infrastructure::adapters::playback::NullAudioOutput;
    use crate::infrastructure::memory::InMemorySessionManager;
    use crate::domain::recipe::{Language, UserPlan};

    fn test_narrator() -> Arc<Narrator> {
        Arc::new(Narrator::new(
            Arc::new(FakeGenAiClient::new()),
            Arc::new(NullAudioOutput::new()),
            NarratorConfig::default(),
        ))
    }

    #[tokio::test]
    async fn test_create_and_close_session() {
        let manager: Arc<dyn SessionManagerPort> = Arc::new(InMemorySessionManager::new());
        let publisher = EventPublisher::new().arc();
        let narrator = test_narrator();

        let create = CreateSessionHandler::new(manager.clone());
        let resp = create
            .handle(CreateSessionCommand {
                plan: UserPlan::Premium,
                language: Language::Pt,
            })
            .await
            .unwrap();
        assert!(manager.is_valid(&resp.session_id));

        let close = CloseSessionHandler::new(manager.clone(), narrator, publisher);
        close
            .handle(CloseSessionCommand {
                session_id: resp.session_id.clone(),
            })
            .await
            .unwrap();
        assert!(!manager.is_valid(&resp.session_id));
    }

    #[tokio::test]
    async fn test_update_preferences_partial() {
        let manager: Arc<dyn SessionManagerPort> = Arc::new(InMemorySessionManager::new());
        let narrator = test_narrator();

        let session_id = manager
            .create(Session::new(UserPlan::Free, Language::Pt))
            .unwrap();

        let handler = UpdatePreferencesHandler::new(manager.clone(), narrator);
        let resp = handler
            .handle(UpdatePreferencesCommand {
                session_id: session_id.clone(),
                audio_enabled: Some(false),
                online: None,
                language: Some(Language::En),
            })
            .await
            .unwrap();

        assert!(!resp.audio_enabled);
        assert!(resp.online);
        assert_eq!(resp.language, Language::En);
    }

    #[tokio::test]
    async fn test_close_unknown_session() {
        let manager: Arc<dyn SessionManagerPort> = Arc::new(InMemorySessionManager::new());
        let handler =
            CloseSessionHandler::new(manager, test_narrator(), EventPublisher::new().arc());

        let result = handler
            .handle(CloseSessionCommand {
                session_id: "missing".to_string(),
            })
            .await;
        assert!(matches!(result, Err(ApplicationError::NotFound { .. })));
    }
}
