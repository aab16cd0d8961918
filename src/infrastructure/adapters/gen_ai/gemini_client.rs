//! Gemini Client - 调用 Gemini generateContent REST API
//!
//! 同一个客户端实现三种内容端口：结构化菜谱（JSON schema 约束）、
//! 配图（inline 图像数据）、语音合成（base64 PCM）
//!
//! 外部 API:
//! POST {base_url}/v1beta/models/{model}:generateContent
//! 认证通过 x-goog-api-key 请求头

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::time::Duration;

use crate::application::ports::{
    GenAiError, GenAiPort, ImagePayload, RecipeRequest, SpeechPort, SpeechRequest,
};
use crate::domain::recipe::{Language, Recipe, Region};

/// Gemini 客户端配置
#[derive(Debug, Clone)]
pub struct GeminiClientConfig {
    /// API 基础 URL
    pub base_url: String,
    /// API Key
    pub api_key: String,
    /// 菜谱生成模型
    pub recipe_model: String,
    /// 配图生成模型
    pub image_model: String,
    /// 语音合成模型
    pub tts_model: String,
    /// 请求超时时间（秒）
    pub timeout_secs: u64,
    /// 配图生成失败时的占位图
    pub fallback_image_url: String,
}

impl Default for GeminiClientConfig {
    fn default() -> Self {
        Self {
            base_url: "https://generativelanguage.googleapis.com".to_string(),
            api_key: String::new(),
            recipe_model: "gemini-3-pro-preview".to_string(),
            image_model: "gemini-2.5-flash-image".to_string(),
            tts_model: "gemini-2.5-flash-preview-tts".to_string(),
            timeout_secs: 120,
            fallback_image_url: "https://picsum.photos/800/450".to_string(),
        }
    }
}

impl GeminiClientConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            ..Default::default()
        }
    }

    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

// ========== 请求/响应结构 ==========

#[derive(Debug, Serialize)]
struct GenerateContentRequest {
    contents: Vec<RequestContent>,
    #[serde(rename = "generationConfig", skip_serializing_if = "Option::is_none")]
    generation_config: Option<serde_json::Value>,
}

#[derive(Debug, Serialize)]
struct RequestContent {
    parts: Vec<RequestPart>,
}

#[derive(Debug, Serialize)]
struct RequestPart {
    text: String,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<ResponseContent>,
}

#[derive(Debug, Deserialize)]
struct ResponseContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
    #[serde(rename = "inlineData")]
    inline_data: Option<InlineData>,
}

#[derive(Debug, Deserialize)]
struct InlineData {
    #[serde(rename = "mimeType")]
    mime_type: String,
    data: String,
}

/// 菜谱输出的 JSON schema（generationConfig.responseSchema）
fn recipe_response_schema() -> serde_json::Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "title": { "type": "STRING" },
            "description": { "type": "STRING" },
            "category": { "type": "STRING" },
            "prepTime": { "type": "STRING" },
            "servings": { "type": "STRING" },
            "difficulty": { "type": "STRING" },
            "origin": { "type": "STRING" },
            "continentDetected": { "type": "STRING" },
            "isRefined": {
                "type": "BOOLEAN",
                "description": "True if the recipe was adjusted based on researcher correction feedback"
            },
            "ingredients": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "item": { "type": "STRING" },
                        "quantity": { "type": "STRING" }
                    },
                    "required": ["item", "quantity"]
                }
            },
            "steps": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "title": { "type": "STRING" },
                        "instruction": { "type": "STRING" },
                        "tip": { "type": "STRING" }
                    },
                    "required": ["title", "instruction"]
                }
            }
        },
        "required": [
            "title", "description", "ingredients", "steps",
            "prepTime", "difficulty", "origin", "continentDetected"
        ]
    })
}

fn recipe_prompt(request: &RecipeRequest) -> String {
    let mut prompt = format!(
        "You are a culinary historian and master chef specializing in traditional world \
         cuisine. Create an authentic, faithful recipe for: {}.",
        request.input
    );
    if request.region != Region::Global {
        prompt.push_str(&format!(
            " The dish must belong to the culinary tradition of {}.",
            request.region.as_str()
        ));
    }
    if let Some(feedback) = &request.correction_feedback {
        prompt.push_str(&format!(
            " A cultural researcher reviewed a previous version and submitted this \
             correction, which you must incorporate: {}.",
            feedback
        ));
    }
    prompt.push_str(&format!(
        " Detect the continent of origin. Respond in {}.",
        request.language.display_name()
    ));
    prompt
}

fn research_prompt(topic: &str, language: Language) -> String {
    format!(
        "Provide a brief, engaging summary of the cultural and historical significance \
         of: {}. Format the answer in Markdown. Respond in {}.",
        topic,
        language.display_name()
    )
}

/// Gemini 客户端
pub struct GeminiClient {
    client: Client,
    config: GeminiClientConfig,
}

impl GeminiClient {
    /// 创建新的 Gemini 客户端
    pub fn new(config: GeminiClientConfig) -> Result<Self, GenAiError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| GenAiError::NetworkError(e.to_string()))?;

        Ok(Self { client, config })
    }

    fn generate_url(&self, model: &str) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.config.base_url, model
        )
    }

    /// 发送 generateContent 请求并解析响应
    async fn generate(
        &self,
        model: &str,
        request: GenerateContentRequest,
    ) -> Result<GenerateContentResponse, GenAiError> {
        let url = self.generate_url(model);
        tracing::debug!(url = %url, model = %model, "Sending generateContent request");

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.config.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    GenAiError::Timeout
                } else if e.is_connect() {
                    GenAiError::NetworkError(format!("Cannot connect to GenAI service: {}", e))
                } else {
                    GenAiError::NetworkError(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(GenAiError::ServiceError(format!(
                "HTTP {}: {}",
                status, error_text
            )));
        }

        response
            .json::<GenerateContentResponse>()
            .await
            .map_err(|e| GenAiError::InvalidResponse(format!("Failed to parse response: {}", e)))
    }
}

/// 响应中的第一个文本 part
fn first_text(response: &GenerateContentResponse) -> Option<&str> {
    response
        .candidates
        .iter()
        .filter_map(|c| c.content.as_ref())
        .flat_map(|c| c.parts.iter())
        .find_map(|p| p.text.as_deref())
}

/// 响应中的第一个 inline 数据 part
fn first_inline_data(response: &GenerateContentResponse) -> Option<&InlineData> {
    response
        .candidates
        .iter()
        .filter_map(|c| c.content.as_ref())
        .flat_map(|c| c.parts.iter())
        .find_map(|p| p.inline_data.as_ref())
}

#[async_trait]
impl GenAiPort for GeminiClient {
    async fn generate_recipe(&self, request: RecipeRequest) -> Result<Recipe, GenAiError> {
        let body = GenerateContentRequest {
            contents: vec![RequestContent {
                parts: vec![RequestPart {
                    text: recipe_prompt(&request),
                }],
            }],
            generation_config: Some(json!({
                "responseMimeType": "application/json",
                "responseSchema": recipe_response_schema(),
            })),
        };

        let response = self.generate(&self.config.recipe_model, body).await?;
        let text = first_text(&response).ok_or_else(|| {
            GenAiError::InvalidResponse("No text part in recipe response".to_string())
        })?;

        let recipe: Recipe = serde_json::from_str(text).map_err(|e| {
            GenAiError::InvalidResponse(format!("Recipe JSON does not match schema: {}", e))
        })?;

        tracing::info!(
            title = %recipe.title,
            origin = %recipe.origin,
            steps = recipe.step_count(),
            "Recipe generated"
        );

        Ok(recipe)
    }

    async fn generate_image(
        &self,
        prompt: &str,
        aspect_ratio: &str,
    ) -> Result<ImagePayload, GenAiError> {
        let body = GenerateContentRequest {
            contents: vec![RequestContent {
                parts: vec![RequestPart {
                    text: prompt.to_string(),
                }],
            }],
            generation_config: Some(json!({
                "responseModalities": ["IMAGE"],
                "imageConfig": { "aspectRatio": aspect_ratio },
            })),
        };

        let response = self.generate(&self.config.image_model, body).await?;

        // 没有图像 part 时回退到占位图，不作为错误上报
        match first_inline_data(&response) {
            Some(inline) => {
                tracing::debug!(
                    mime_type = %inline.mime_type,
                    data_len = inline.data.len(),
                    "Image generated"
                );
                Ok(ImagePayload::Inline {
                    mime_type: inline.mime_type.clone(),
                    data: inline.data.clone(),
                })
            }
            None => {
                tracing::warn!("No image part in response, using fallback");
                Ok(ImagePayload::Url(self.config.fallback_image_url.clone()))
            }
        }
    }

    async fn research(&self, topic: &str, language: Language) -> Result<String, GenAiError> {
        let body = GenerateContentRequest {
            contents: vec![RequestContent {
                parts: vec![RequestPart {
                    text: research_prompt(topic, language),
                }],
            }],
            generation_config: None,
        };

        let response = self.generate(&self.config.recipe_model, body).await?;
        first_text(&response)
            .map(|t| t.to_string())
            .ok_or_else(|| {
                GenAiError::InvalidResponse("No text part in research response".to_string())
            })
    }
}

#[async_trait]
impl SpeechPort for GeminiClient {
    async fn synthesize(&self, request: SpeechRequest) -> Result<Option<String>, GenAiError> {
        let body = GenerateContentRequest {
            contents: vec![RequestContent {
                parts: vec![RequestPart {
                    text: request.text.clone(),
                }],
            }],
            generation_config: Some(json!({
                "responseModalities": ["AUDIO"],
                "speechConfig": {
                    "voiceConfig": {
                        "prebuiltVoiceConfig": {
                            "voiceName": request.language.voice_name(),
                        }
                    }
                },
            })),
        };

        let response = self.generate(&self.config.tts_model, body).await?;

        // 空音频是有效结果：上层保持静默而不是报错
        Ok(first_inline_data(&response).map(|inline| {
            tracing::debug!(
                mime_type = %inline.mime_type,
                data_len = inline.data.len(),
                "Speech synthesized"
            );
            inline.data.clone()
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = GeminiClientConfig::default();
        assert_eq!(config.base_url, "https://generativelanguage.googleapis.com");
        assert_eq!(config.timeout_secs, 120);
    }

    #[test]
    fn test_recipe_schema_lets_model_declare_is_refined() {
        let schema = recipe_response_schema();
        assert_eq!(schema["properties"]["isRefined"]["type"], "BOOLEAN");
    }

    #[test]
    fn test_recipe_prompt_includes_region_and_feedback() {
        let prompt = recipe_prompt(&RecipeRequest {
            input: "Cachupa".to_string(),
            language: Language::Pt,
            region: Region::Africa,
            correction_feedback: Some("Use hominy corn".to_string()),
        });
        assert!(prompt.contains("Cachupa"));
        assert!(prompt.contains("África"));
        assert!(prompt.contains("Use hominy corn"));
        assert!(prompt.contains("Português do Brasil"));
    }

    #[test]
    fn test_recipe_prompt_global_region_unconstrained() {
        let prompt = recipe_prompt(&RecipeRequest {
            input: "Ramen".to_string(),
            language: Language::En,
            region: Region::Global,
            correction_feedback: None,
        });
        assert!(!prompt.contains("culinary tradition of"));
    }

    #[test]
    fn test_response_part_extraction() {
        let json = r#"{
            "candidates": [{
                "content": {
                    "parts": [
                        { "text": "hello" },
                        { "inlineData": { "mimeType": "audio/pcm", "data": "AAAA" } }
                    ]
                }
            }]
        }"#;
        let response: GenerateContentResponse = serde_json::from_str(json).unwrap();
        assert_eq!(first_text(&response), Some("hello"));
        assert_eq!(first_inline_data(&response).unwrap().data, "AAAA");
    }

    #[test]
    fn test_empty_response_has_no_parts() {
        let response: GenerateContentResponse = serde_json::from_str("{}").unwrap();
        assert!(first_text(&response).is_none());
        assert!(first_inline_data(&response).is_none());
    }
}
