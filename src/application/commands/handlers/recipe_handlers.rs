//! Recipe Command Handlers

use std::sync::Arc;

use crate::application::commands::recipe_commands::*;
use crate::application::error::ApplicationError;
use crate::application::ports::{GenAiPort, RecipeRequest, SessionManagerPort};
use crate::infrastructure::events::EventPublisher;

/// 配图提示词模板
fn image_prompt(title: &str) -> String {
    format!(
        "Authentic food photography of {}. Traditional presentation, high-end culinary lighting.",
        title
    )
}

/// GenerateRecipe Handler - 生成或修正菜谱
///
/// 生成失败是用户可见错误；配图失败静默降级到占位图
pub struct GenerateRecipeHandler {
    session_manager: Arc<dyn SessionManagerPort>,
    gen_ai: Arc<dyn GenAiPort>,
    event_publisher: Arc<EventPublisher>,
    fallback_image_url: String,
}

impl GenerateRecipeHandler {
    pub fn new(
        session_manager: Arc<dyn SessionManagerPort>,
        gen_ai: Arc<dyn GenAiPort>,
        event_publisher: Arc<EventPublisher>,
        fallback_image_url: String,
    ) -> Self {
        Self {
            session_manager,
            gen_ai,
            event_publisher,
            fallback_image_url,
        }
    }

    pub async fn handle(
        &self,
        cmd: GenerateRecipeCommand,
    ) -> Result<GenerateRecipeResponse, ApplicationError> {
        let session = self.session_manager.get(&cmd.session_id)?;

        if !session.online {
            return Err(ApplicationError::business_rule(
                "Recipe generation requires network connectivity",
            ));
        }

        // 修正重生成是研究员专属能力
        if cmd.correction_feedback.is_some() && !session.plan.allows_correction() {
            return Err(ApplicationError::business_rule(
                "Correction feedback requires the researcher plan",
            ));
        }

        let request = RecipeRequest {
            input: cmd.input.clone(),
            language: session.language,
            region: cmd.region,
            correction_feedback: cmd.correction_feedback.clone(),
        };

        // is_refined 由模型在响应中声明，这里不做覆盖
        let mut recipe = match self.gen_ai.generate_recipe(request).await {
            Ok(recipe) => recipe,
            Err(e) => {
                tracing::error!(
                    session_id = %cmd.session_id,
                    input = %cmd.input,
                    error = %e,
                    "Recipe generation failed"
                );
                self.event_publisher
                    .publish_recipe_failed(&cmd.session_id, &e.to_string());
                return Err(e.into());
            }
        };

        // 只有在没有修正反馈时才复用已有配图；修正后重新生成
        let previous_image = session
            .recipe
            .as_ref()
            .and_then(|r| r.image_url.clone())
            .filter(|_| cmd.correction_feedback.is_none());

        recipe.image_url = Some(match previous_image {
            Some(url) => url,
            None => self.generate_image(&cmd.session_id, &recipe.title).await,
        });

        self.session_manager
            .set_recipe(&cmd.session_id, recipe.clone())?;

        self.event_publisher.publish_recipe_ready(
            &cmd.session_id,
            &recipe.id.to_string(),
            &recipe.title,
            recipe.step_count(),
        );

        tracing::info!(
            session_id = %cmd.session_id,
            recipe_id = %recipe.id,
            title = %recipe.title,
            steps = recipe.step_count(),
            refined = recipe.is_refined,
            "Recipe ready"
        );

        Ok(GenerateRecipeResponse {
            session_id: cmd.session_id,
            recipe,
        })
    }

    async fn generate_image(&self, session_id: &str, title: &str) -> String {
        match self
            .gen_ai
            .generate_image(&image_prompt(title), "16:9")
            .await
        {
            Ok(payload) => payload.into_image_url(),
            Err(e) => {
                tracing::warn!(
                    session_id = %session_id,
                    title = %title,
                    error = %e,
                    "Image generation failed, using fallback"
                );
                self.fallback_image_url.clone()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::{Session, SessionManagerPort};
    use crate::domain::recipe::{Language, Region, UserPlan};
    use crate::infrastructure::adapters::gen_ai::FakeGenAiClient;
    use crate::infrastructure::memory::InMemorySessionManager;

    const FALLBACK: &str = "https://picsum.photos/800/450";

    fn setup(plan: UserPlan) -> (GenerateRecipeHandler, Arc<FakeGenAiClient>, String) {
        let manager: Arc<dyn SessionManagerPort> = Arc::new(InMemorySessionManager::new());
        let gen_ai = Arc::new(FakeGenAiClient::new());
        let session_id = manager
            .create(Session::new(plan, Language::Pt))
            .unwrap();
        let handler = GenerateRecipeHandler::new(
            manager,
            gen_ai.clone(),
            EventPublisher::new().arc(),
            FALLBACK.to_string(),
        );
        (handler, gen_ai, session_id)
    }

    #[tokio::test]
    async fn test_generate_recipe_sets_image_and_resets_step() {
        let (handler, gen_ai, session_id) = setup(UserPlan::Premium);

        let resp = handler
            .handle(GenerateRecipeCommand {
                session_id,
                input: "Cachupa".to_string(),
                region: Region::Africa,
                correction_feedback: None,
            })
            .await
            .unwrap();

        assert!(resp.recipe.image_url.is_some());
        assert!(!resp.recipe.is_refined);
        assert_eq!(gen_ai.recipe_calls(), 1);
        assert_eq!(gen_ai.image_calls(), 1);
    }

    #[tokio::test]
    async fn test_correction_requires_researcher_plan() {
        let (handler, gen_ai, session_id) = setup(UserPlan::Premium);

        let result = handler
            .handle(GenerateRecipeCommand {
                session_id,
                input: "Cachupa".to_string(),
                region: Region::Africa,
                correction_feedback: Some("Too much salt".to_string()),
            })
            .await;

        assert!(matches!(
            result,
            Err(ApplicationError::BusinessRuleViolation(_))
        ));
        assert_eq!(gen_ai.recipe_calls(), 0);
    }

    #[tokio::test]
    async fn test_correction_regenerates_image() {
        let (handler, gen_ai, session_id) = setup(UserPlan::Researcher);

        handler
            .handle(GenerateRecipeCommand {
                session_id: session_id.clone(),
                input: "Cachupa".to_string(),
                region: Region::Africa,
                correction_feedback: None,
            })
            .await
            .unwrap();

        let resp = handler
            .handle(GenerateRecipeCommand {
                session_id,
                input: "Cachupa".to_string(),
                region: Region::Africa,
                correction_feedback: Some("Use fresh corn".to_string()),
            })
            .await
            .unwrap();

        // 修正后不复用旧图
        assert!(resp.recipe.is_refined);
        assert_eq!(gen_ai.image_calls(), 2);
    }

    #[tokio::test]
    async fn test_is_refined_taken_from_model_response() {
        // 研究员提交了反馈，但模型声明本次并未吸收：以模型为准
        let manager: Arc<dyn SessionManagerPort> = Arc::new(InMemorySessionManager::new());
        let gen_ai = Arc::new(FakeGenAiClient::never_refined());
        let session_id = manager
            .create(Session::new(UserPlan::Researcher, Language::Pt))
            .unwrap();
        let handler = GenerateRecipeHandler::new(
            manager,
            gen_ai,
            EventPublisher::new().arc(),
            FALLBACK.to_string(),
        );

        let resp = handler
            .handle(GenerateRecipeCommand {
                session_id,
                input: "Cachupa".to_string(),
                region: Region::Africa,
                correction_feedback: Some("Use fresh corn".to_string()),
            })
            .await
            .unwrap();

        assert!(!resp.recipe.is_refined);
    }

    #[tokio::test]
    async fn test_regeneration_without_feedback_reuses_image() {
        let (handler, gen_ai, session_id) = setup(UserPlan::Premium);

        handler
            .handle(GenerateRecipeCommand {
                session_id: session_id.clone(),
                input: "Cachupa".to_string(),
                region: Region::Africa,
                correction_feedback: None,
            })
            .await
            .unwrap();

        handler
            .handle(GenerateRecipeCommand {
                session_id,
                input: "Moqueca".to_string(),
                region: Region::America,
                correction_feedback: None,
            })
            .await
            .unwrap();

        assert_eq!(gen_ai.image_calls(), 1);
    }

    #[tokio::test]
    async fn test_generation_rejected_offline() {
        let manager: Arc<dyn SessionManagerPort> = Arc::new(InMemorySessionManager::new());
        let gen_ai = Arc::new(FakeGenAiClient::new());
        let session_id = manager
            .create(Session::new(UserPlan::Premium, Language::Pt))
            .unwrap();
        manager
            .set_preferences(
                &session_id,
                crate::application::ports::PreferencesUpdate {
                    online: Some(false),
                    ..Default::default()
                },
            )
            .unwrap();

        let handler = GenerateRecipeHandler::new(
            manager,
            gen_ai.clone(),
            EventPublisher::new().arc(),
            FALLBACK.to_string(),
        );

        let result = handler
            .handle(GenerateRecipeCommand {
                session_id,
                input: "Cachupa".to_string(),
                region: Region::Global,
                correction_feedback: None,
            })
            .await;

        assert!(matches!(
            result,
            Err(ApplicationError::BusinessRuleViolation(_))
        ));
        assert_eq!(gen_ai.recipe_calls(), 0);
    }

    #[tokio::test]
    async fn test_generation_failure_surfaces_error() {
        let manager: Arc<dyn SessionManagerPort> = Arc::new(InMemorySessionManager::new());
        let gen_ai = Arc::new(FakeGenAiClient::failing());
        let session_id = manager
            .create(Session::new(UserPlan::Premium, Language::Pt))
            .unwrap();
        let handler = GenerateRecipeHandler::new(
            manager,
            gen_ai,
            EventPublisher::new().arc(),
            FALLBACK.to_string(),
        );

        let result = handler
            .handle(GenerateRecipeCommand {
                session_id,
                input: "Cachupa".to_string(),
                region: Region::Global,
                correction_feedback: None,
            })
            .await;

        assert!(matches!(
            result,
            Err(ApplicationError::ExternalServiceError(_))
        ));
    }
}
