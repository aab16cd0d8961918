//! Recipe Query Handlers

use std::sync::Arc;

use crate::application::error::ApplicationError;
use crate::application::narrator::Narrator;
use crate::application::ports::SessionManagerPort;
use crate::application::queries::recipe_queries::*;

/// GetRecipe Handler - 获取当前菜谱
pub struct GetRecipeHandler {
    session_manager: Arc<dyn SessionManagerPort>,
}

impl GetRecipeHandler {
    pub fn new(session_manager: Arc<dyn SessionManagerPort>) -> Self {
        Self { session_manager }
    }

    pub async fn handle(
        &self,
        query: GetRecipeQuery,
    ) -> Result<GetRecipeResponse, ApplicationError> {
        let session = self.session_manager.get(&query.session_id)?;

        Ok(GetRecipeResponse {
            session_id: query.session_id,
            recipe: session.recipe,
            current_step: session.current_step,
        })
    }
}

/// GetNarrationState Handler - 获取播放状态
pub struct GetNarrationStateHandler {
    session_manager: Arc<dyn SessionManagerPort>,
    narrator: Arc<Narrator>,
}

impl GetNarrationStateHandler {
    pub fn new(session_manager: Arc<dyn SessionManagerPort>, narrator: Arc<Narrator>) -> Self {
        Self {
            session_manager,
            narrator,
        }
    }

    pub async fn handle(
        &self,
        query: GetNarrationStateQuery,
    ) -> Result<GetNarrationStateResponse, ApplicationError> {
        self.session_manager.get(&query.session_id)?;
        let state = self.narrator.state().await;

        Ok(GetNarrationStateResponse {
            session_id: query.session_id,
            status: state.as_str().to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::Session;
    use crate::domain::recipe::{Language, UserPlan};
    use crate::infrastructure::memory::InMemorySessionManager;

    #[tokio::test]
    async fn test_get_recipe_empty_session() {
        let manager: Arc<dyn SessionManagerPort> = Arc::new(InMemorySessionManager::new());
        let session_id = manager
            .create(Session::new(UserPlan::Free, Language::Pt))
            .unwrap();
        let handler = GetRecipeHandler::new(manager);

        let resp = handler.handle(GetRecipeQuery { session_id }).await.unwrap();
        assert!(resp.recipe.is_none());
        assert_eq!(resp.current_step, 0);
    }

    #[tokio::test]
    async fn test_get_recipe_unknown_session() {
        let manager: Arc<dyn SessionManagerPort> = Arc::new(InMemorySessionManager::new());
        let handler = GetRecipeHandler::new(manager);

        let result = handler
            .handle(GetRecipeQuery {
                session_id: "missing".to_string(),
            })
            .await;
        assert!(matches!(result, Err(ApplicationError::NotFound { .. })));
    }
}
