//! Fake GenAI Client - 用于测试的生成式 AI 客户端
//!
//! 返回固定的菜谱/图像/音频，不发起任何网络调用，
//! 并记录各端口的调用次数

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::application::ports::{
    GenAiError, GenAiPort, ImagePayload, RecipeRequest, SpeechPort, SpeechRequest,
};
use crate::domain::recipe::{CookingStep, Ingredient, Language, Recipe};

/// Fake GenAI Client
pub struct FakeGenAiClient {
    recipe_calls: AtomicUsize,
    image_calls: AtomicUsize,
    research_calls: AtomicUsize,
    speech_calls: AtomicUsize,
    fail: bool,
    /// 模型在菜谱响应中声明的 is_refined；None 表示跟随请求是否带反馈
    refined: Option<bool>,
}

impl FakeGenAiClient {
    pub fn new() -> Self {
        Self {
            recipe_calls: AtomicUsize::new(0),
            image_calls: AtomicUsize::new(0),
            research_calls: AtomicUsize::new(0),
            speech_calls: AtomicUsize::new(0),
            fail: false,
            refined: None,
        }
    }

    /// 所有调用都返回服务错误的变体
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::new()
        }
    }

    /// 模型始终声明未吸收反馈的变体
    pub fn never_refined() -> Self {
        Self {
            refined: Some(false),
            ..Self::new()
        }
    }

    pub fn recipe_calls(&self) -> usize {
        self.recipe_calls.load(Ordering::SeqCst)
    }

    pub fn image_calls(&self) -> usize {
        self.image_calls.load(Ordering::SeqCst)
    }

    pub fn research_calls(&self) -> usize {
        self.research_calls.load(Ordering::SeqCst)
    }

    pub fn speech_calls(&self) -> usize {
        self.speech_calls.load(Ordering::SeqCst)
    }

    /// 固定返回的菜谱
    pub fn canned_recipe() -> Recipe {
        Recipe {
            title: "Cachupa Rica".to_string(),
            description: "Prato nacional de Cabo Verde.".to_string(),
            category: "Prato Principal".to_string(),
            prep_time: "3h".to_string(),
            servings: "6".to_string(),
            difficulty: "Médio".to_string(),
            origin: "Cabo Verde".to_string(),
            continent_detected: "África".to_string(),
            ingredients: vec![Ingredient {
                item: "Milho".to_string(),
                quantity: "500g".to_string(),
            }],
            steps: vec![
                CookingStep {
                    title: "Demolhar".to_string(),
                    instruction: "Deixe o milho de molho durante a noite.".to_string(),
                    tip: None,
                },
                CookingStep {
                    title: "Cozinhar".to_string(),
                    instruction: "Cozinhe em fogo baixo por duas horas.".to_string(),
                    tip: Some("Use panela de pressão para reduzir o tempo.".to_string()),
                },
            ],
            ..Default::default()
        }
    }

    /// 固定返回的音频负载：24 帧 16-bit 单声道 PCM 的 base64
    pub fn canned_speech_payload() -> String {
        let bytes: Vec<u8> = (0..24i16).flat_map(|s| (s * 100).to_le_bytes()).collect();
        STANDARD.encode(bytes)
    }

    fn check_fail(&self) -> Result<(), GenAiError> {
        if self.fail {
            Err(GenAiError::ServiceError("fake failure".to_string()))
        } else {
            Ok(())
        }
    }
}

impl Default for FakeGenAiClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl GenAiPort for FakeGenAiClient {
    async fn generate_recipe(&self, request: RecipeRequest) -> Result<Recipe, GenAiError> {
        self.recipe_calls.fetch_add(1, Ordering::SeqCst);
        self.check_fail()?;
        tracing::debug!(input = %request.input, "FakeGenAiClient: returning canned recipe");
        let mut recipe = Self::canned_recipe();
        recipe.is_refined = self
            .refined
            .unwrap_or_else(|| request.correction_feedback.is_some());
        Ok(recipe)
    }

    async fn generate_image(
        &self,
        _prompt: &str,
        _aspect_ratio: &str,
    ) -> Result<ImagePayload, GenAiError> {
        self.image_calls.fetch_add(1, Ordering::SeqCst);
        self.check_fail()?;
        Ok(ImagePayload::Inline {
            mime_type: "image/png".to_string(),
            data: "iVBORw0KGgo=".to_string(),
        })
    }

    async fn research(&self, topic: &str, _language: Language) -> Result<String, GenAiError> {
        self.research_calls.fetch_add(1, Ordering::SeqCst);
        self.check_fail()?;
        Ok(format!("## {}\n\nResumo cultural de teste.", topic))
    }
}

#[async_trait]
impl SpeechPort for FakeGenAiClient {
    async fn synthesize(&self, _request: SpeechRequest) -> Result<Option<String>, GenAiError> {
        self.speech_calls.fetch_add(1, Ordering::SeqCst);
        self.check_fail()?;
        Ok(Some(Self::canned_speech_payload()))
    }
}
