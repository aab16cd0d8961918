//! Speech Port - 语音合成抽象
//!
//! 与 GenAiPort 分开定义：旁白管线的失败语义不同（静默降级，
//! 绝不向用户弹错）

use async_trait::async_trait;

use super::gen_ai::GenAiError;
use crate::domain::recipe::Language;

/// 语音合成请求
#[derive(Debug, Clone)]
pub struct SpeechRequest {
    /// 要朗读的文本
    pub text: String,
    /// 目标语言（决定音色）
    pub language: Language,
}

/// Speech Port
#[async_trait]
pub trait SpeechPort: Send + Sync {
    /// 合成语音，返回 base64 编码的原始 PCM 负载
    ///
    /// `Ok(None)` 表示本次没有音频，是有效结果而非错误
    async fn synthesize(&self, request: SpeechRequest) -> Result<Option<String>, GenAiError>;
}
