//! GenAI Port - 生成式内容服务抽象
//!
//! 定义菜谱/配图/研究文本生成的抽象接口，具体实现在 infrastructure/adapters 层

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::recipe::{Language, Recipe, Region};

/// 生成式服务错误
#[derive(Debug, Error)]
pub enum GenAiError {
    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Request timeout")]
    Timeout,

    #[error("Service error: {0}")]
    ServiceError(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// 菜谱生成请求
#[derive(Debug, Clone)]
pub struct RecipeRequest {
    /// 菜名或配料的自由文本描述
    pub input: String,
    /// 响应语言
    pub language: Language,
    /// 大洲提示（识别出具体国家后模型会忽略）
    pub region: Region,
    /// 研究员纠错反馈（可选）
    pub correction_feedback: Option<String>,
}

/// 配图生成结果
///
/// 生成失败或响应中没有图片 part 时返回占位图 URL，不让配图
/// 失败打断菜谱主流程
#[derive(Debug, Clone)]
pub enum ImagePayload {
    /// 内联图片（base64 编码）
    Inline { mime_type: String, data: String },
    /// 占位图 URL
    Url(String),
}

impl ImagePayload {
    /// 转换为 UI 可直接引用的图片地址
    pub fn into_image_url(self) -> String {
        match self {
            ImagePayload::Inline { mime_type, data } => {
                format!("data:{};base64,{}", mime_type, data)
            }
            ImagePayload::Url(url) => url,
        }
    }
}

/// GenAI Port
///
/// 外部生成式内容服务的抽象接口
#[async_trait]
pub trait GenAiPort: Send + Sync {
    /// 生成结构化菜谱
    ///
    /// 响应缺失 required 字段时返回 `GenAiError::InvalidResponse`
    async fn generate_recipe(&self, request: RecipeRequest) -> Result<Recipe, GenAiError>;

    /// 生成菜品配图
    async fn generate_image(
        &self,
        prompt: &str,
        aspect_ratio: &str,
    ) -> Result<ImagePayload, GenAiError>;

    /// 深度美食研究，返回 Markdown 文本
    async fn research(&self, topic: &str, language: Language) -> Result<String, GenAiError>;
}
