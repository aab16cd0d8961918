//! Research Query Handlers

use std::sync::Arc;

use crate::application::error::ApplicationError;
use crate::application::ports::{GenAiPort, SessionManagerPort};
use crate::application::queries::research_queries::*;

/// Research Handler - 文化研究查询
pub struct ResearchHandler {
    session_manager: Arc<dyn SessionManagerPort>,
    gen_ai: Arc<dyn GenAiPort>,
}

impl ResearchHandler {
    pub fn new(session_manager: Arc<dyn SessionManagerPort>, gen_ai: Arc<dyn GenAiPort>) -> Self {
        Self {
            session_manager,
            gen_ai,
        }
    }

    pub async fn handle(&self, query: ResearchQuery) -> Result<ResearchResponse, ApplicationError> {
        let session = self.session_manager.get(&query.session_id)?;

        if !session.online {
            return Err(ApplicationError::business_rule(
                "Research requires network connectivity",
            ));
        }

        let content = self
            .gen_ai
            .research(&query.topic, session.language)
            .await
            .map_err(|e| {
                tracing::error!(
                    session_id = %query.session_id,
                    topic = %query.topic,
                    error = %e,
                    "Research query failed"
                );
                ApplicationError::from(e)
            })?;

        self.session_manager.touch(&query.session_id);

        Ok(ResearchResponse {
            session_id: query.session_id,
            topic: query.topic,
            content,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::{PreferencesUpdate, Session};
    use crate::domain::recipe::{Language, UserPlan};
    use crate::infrastructure::adapters::gen_ai::FakeGenAiClient;
    use crate::infrastructure::memory::InMemorySessionManager;

    #[tokio::test]
    async fn test_research_returns_markdown() {
        let manager: Arc<dyn SessionManagerPort> = Arc::new(InMemorySessionManager::new());
        let session_id = manager
            .create(Session::new(UserPlan::Researcher, Language::Pt))
            .unwrap();
        let handler = ResearchHandler::new(manager, Arc::new(FakeGenAiClient::new()));

        let resp = handler
            .handle(ResearchQuery {
                session_id,
                topic: "Cachupa".to_string(),
            })
            .await
            .unwrap();
        assert!(!resp.content.is_empty());
    }

    #[tokio::test]
    async fn test_research_rejected_offline() {
        let manager: Arc<dyn SessionManagerPort> = Arc::new(InMemorySessionManager::new());
        let session_id = manager
            .create(Session::new(UserPlan::Researcher, Language::Pt))
            .unwrap();
        manager
            .set_preferences(
                &session_id,
                PreferencesUpdate {
                    online: Some(false),
                    ..Default::default()
                },
            )
            .unwrap();
        let handler = ResearchHandler::new(manager, Arc::new(FakeGenAiClient::new()));

        let result = handler
            .handle(ResearchQuery {
                session_id,
                topic: "Cachupa".to_string(),
            })
            .await;
        assert!(matches!(
            result,
            Err(ApplicationError::BusinessRuleViolation(_))
        ));
    }
}
