//! 生成式 AI 适配器

pub mod fake_gen_ai;
pub mod gemini_client;

pub use fake_gen_ai::FakeGenAiClient;
pub use gemini_client::{GeminiClient, GeminiClientConfig};
