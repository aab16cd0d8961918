//! In-Memory Session Manager Implementation

use chrono::Utc;
use dashmap::DashMap;
use std::sync::Arc;

use crate::application::ports::{PreferencesUpdate, Session, SessionError, SessionManagerPort};
use crate::domain::recipe::Recipe;

/// 内存会话管理器
pub struct InMemorySessionManager {
    sessions: DashMap<String, Session>,
}

impl InMemorySessionManager {
    pub fn new() -> Self {
        Self {
            sessions: DashMap::new(),
        }
    }

    pub fn arc(self) -> Arc<Self> {
        Arc::new(self)
    }
}

impl Default for InMemorySessionManager {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionManagerPort for InMemorySessionManager {
    fn create(&self, session: Session) -> Result<String, SessionError> {
        let session_id = session.id.clone();
        if self.sessions.contains_key(&session_id) {
            return Err(SessionError::AlreadyExists(session_id));
        }
        self.sessions.insert(session_id.clone(), session);
        tracing::info!(session_id = %session_id, "Session created");
        Ok(session_id)
    }

    fn get(&self, id: &str) -> Result<Session, SessionError> {
        self.sessions
            .get(id)
            .map(|s| s.clone())
            .ok_or_else(|| SessionError::NotFound(id.to_string()))
    }

    fn set_recipe(&self, id: &str, recipe: Recipe) -> Result<(), SessionError> {
        let mut session = self
            .sessions
            .get_mut(id)
            .ok_or_else(|| SessionError::NotFound(id.to_string()))?;
        // 新菜谱从第一步开始
        session.recipe = Some(recipe);
        session.current_step = 0;
        session.last_activity = Utc::now();
        tracing::debug!(session_id = %id, "Session recipe updated");
        Ok(())
    }

    fn set_step(&self, id: &str, step: usize) -> Result<(), SessionError> {
        let mut session = self
            .sessions
            .get_mut(id)
            .ok_or_else(|| SessionError::NotFound(id.to_string()))?;
        session.current_step = step;
        session.last_activity = Utc::now();
        tracing::debug!(session_id = %id, step = step, "Session step updated");
        Ok(())
    }

    fn set_preferences(
        &self,
        id: &str,
        update: PreferencesUpdate,
    ) -> Result<Session, SessionError> {
        let mut session = self
            .sessions
            .get_mut(id)
            .ok_or_else(|| SessionError::NotFound(id.to_string()))?;
        if let Some(audio_enabled) = update.audio_enabled {
            session.audio_enabled = audio_enabled;
        }
        if let Some(online) = update.online {
            session.online = online;
        }
        if let Some(language) = update.language {
            session.language = language;
        }
        session.last_activity = Utc::now();
        Ok(session.clone())
    }

    fn is_valid(&self, id: &str) -> bool {
        self.sessions.contains_key(id)
    }

    fn close(&self, id: &str) -> Result<(), SessionError> {
        self.sessions
            .remove(id)
            .map(|_| {
                tracing::info!(session_id = %id, "Session closed");
            })
            .ok_or_else(|| SessionError::NotFound(id.to_string()))
    }

    fn touch(&self, id: &str) {
        if let Some(mut session) = self.sessions.get_mut(id) {
            session.last_activity = Utc::now();
        }
    }

    fn get_expired_sessions(&self, idle_timeout_secs: u64) -> Vec<String> {
        let now = Utc::now();
        let timeout = chrono::Duration::seconds(idle_timeout_secs as i64);

        self.sessions
            .iter()
            .filter_map(|entry| {
                let elapsed = now - entry.last_activity;
                if elapsed > timeout {
                    Some(entry.key().clone())
                } else {
                    None
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::recipe::{CookingStep, Language, UserPlan};

    fn recipe() -> Recipe {
        Recipe {
            title: "Feijoada".to_string(),
            description: "Clássico brasileiro.".to_string(),
            prep_time: "2h".to_string(),
            difficulty: "Médio".to_string(),
            origin: "Brasil".to_string(),
            continent_detected: "América".to_string(),
            steps: vec![CookingStep {
                title: "Preparar".to_string(),
                instruction: "Deixe o feijão de molho.".to_string(),
                tip: None,
            }],
            ..Default::default()
        }
    }

    #[test]
    fn test_session_lifecycle() {
        let manager = InMemorySessionManager::new();
        let session = Session::new(UserPlan::Premium, Language::Pt);
        let session_id = session.id.clone();

        // Create
        let result = manager.create(session);
        assert!(result.is_ok());

        // Get
        let session = manager.get(&session_id);
        assert!(session.is_ok());
        assert_eq!(session.unwrap().current_step, 0);

        // Set step
        let result = manager.set_step(&session_id, 3);
        assert!(result.is_ok());
        assert_eq!(manager.get(&session_id).unwrap().current_step, 3);

        // Is valid
        assert!(manager.is_valid(&session_id));

        // Close
        let result = manager.close(&session_id);
        assert!(result.is_ok());
        assert!(!manager.is_valid(&session_id));
    }

    #[test]
    fn test_set_recipe_resets_step() {
        let manager = InMemorySessionManager::new();
        let session_id = manager
            .create(Session::new(UserPlan::Premium, Language::Pt))
            .unwrap();

        manager.set_step(&session_id, 5).unwrap();
        manager.set_recipe(&session_id, recipe()).unwrap();

        let session = manager.get(&session_id).unwrap();
        assert_eq!(session.current_step, 0);
        assert!(session.recipe.is_some());
    }

    #[test]
    fn test_set_preferences_keeps_unset_fields() {
        let manager = InMemorySessionManager::new();
        let session_id = manager
            .create(Session::new(UserPlan::Free, Language::Pt))
            .unwrap();

        let session = manager
            .set_preferences(
                &session_id,
                PreferencesUpdate {
                    audio_enabled: Some(false),
                    ..Default::default()
                },
            )
            .unwrap();

        assert!(!session.audio_enabled);
        assert!(session.online);
        assert_eq!(session.language, Language::Pt);
    }
}
