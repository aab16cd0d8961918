//! Configuration Types
//!
//! 定义所有配置结构体

use serde::Deserialize;

/// 应用主配置
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// 服务器配置
    #[serde(default)]
    pub server: ServerConfig,

    /// 生成式 AI 服务配置
    #[serde(default)]
    pub genai: GenAiConfig,

    /// 音频播放配置
    #[serde(default)]
    pub audio: AudioConfig,

    /// 会话配置
    #[serde(default)]
    pub session: SessionConfig,

    /// 日志配置
    #[serde(default)]
    pub log: LogConfig,
}

/// 服务器配置
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// 监听地址
    #[serde(default = "default_host")]
    pub host: String,

    /// 监听端口
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5080
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl ServerConfig {
    /// 获取服务器地址
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// 生成式 AI 服务配置
#[derive(Debug, Clone, Deserialize)]
pub struct GenAiConfig {
    /// API 基础 URL
    #[serde(default = "default_genai_url")]
    pub base_url: String,

    /// API Key（必填，也可通过环境变量注入）
    #[serde(default)]
    pub api_key: String,

    /// 菜谱生成模型
    #[serde(default = "default_recipe_model")]
    pub recipe_model: String,

    /// 配图生成模型
    #[serde(default = "default_image_model")]
    pub image_model: String,

    /// 语音合成模型
    #[serde(default = "default_tts_model")]
    pub tts_model: String,

    /// 请求超时时间（秒）
    #[serde(default = "default_genai_timeout")]
    pub timeout_secs: u64,

    /// 配图生成失败时的占位图
    #[serde(default = "default_fallback_image_url")]
    pub fallback_image_url: String,
}

fn default_genai_url() -> String {
    "https://generativelanguage.googleapis.com".to_string()
}

fn default_recipe_model() -> String {
    "gemini-3-pro-preview".to_string()
}

fn default_image_model() -> String {
    "gemini-2.5-flash-image".to_string()
}

fn default_tts_model() -> String {
    "gemini-2.5-flash-preview-tts".to_string()
}

fn default_genai_timeout() -> u64 {
    120
}

fn default_fallback_image_url() -> String {
    "https://picsum.photos/800/450".to_string()
}

impl Default for GenAiConfig {
    fn default() -> Self {
        Self {
            base_url: default_genai_url(),
            api_key: String::new(),
            recipe_model: default_recipe_model(),
            image_model: default_image_model(),
            tts_model: default_tts_model(),
            timeout_secs: default_genai_timeout(),
            fallback_image_url: default_fallback_image_url(),
        }
    }
}

/// 音频播放配置
#[derive(Debug, Clone, Deserialize)]
pub struct AudioConfig {
    /// 输出后端
    /// 可选: cpal（宿主扬声器）, null（无声，headless 部署）
    #[serde(default = "default_audio_backend")]
    pub backend: String,

    /// 语音服务返回的 PCM 采样率（Hz）
    #[serde(default = "default_sample_rate")]
    pub sample_rate: u32,

    /// 语音服务返回的声道数
    #[serde(default = "default_channels")]
    pub channels: usize,
}

fn default_audio_backend() -> String {
    "cpal".to_string()
}

fn default_sample_rate() -> u32 {
    24000
}

fn default_channels() -> usize {
    1
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            backend: default_audio_backend(),
            sample_rate: default_sample_rate(),
            channels: default_channels(),
        }
    }
}

/// 会话配置
#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    /// Session 过期时间（秒）
    #[serde(default = "default_session_expire")]
    pub expire_secs: u64,

    /// 过期清理间隔（秒）
    #[serde(default = "default_cleanup_interval")]
    pub cleanup_interval_secs: u64,
}

fn default_session_expire() -> u64 {
    86400 // 24 小时
}

fn default_cleanup_interval() -> u64 {
    3600 // 1 小时
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            expire_secs: default_session_expire(),
            cleanup_interval_secs: default_cleanup_interval(),
        }
    }
}

/// 日志配置
#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    /// 日志级别
    #[serde(default = "default_log_level")]
    pub level: String,

    /// 是否启用 JSON 格式
    #[serde(default)]
    pub json: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 5080);
        assert_eq!(config.genai.base_url, "https://generativelanguage.googleapis.com");
        assert_eq!(config.audio.sample_rate, 24000);
        assert_eq!(config.audio.channels, 1);
    }

    #[test]
    fn test_server_addr() {
        let config = ServerConfig::default();
        assert_eq!(config.addr(), "0.0.0.0:5080");
    }
}
