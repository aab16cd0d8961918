//! Configuration Loader
//!
//! 实现多源配置加载与合并逻辑
//!
//! 优先级（从高到低）：
//! 1. 环境变量
//! 2. 配置文件（config.toml）
//! 3. 默认值

use config::{Config, ConfigError as ConfigCrateError, Environment, File};
use std::path::Path;
use thiserror::Error;

use super::types::AppConfig;

/// 配置加载错误
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    LoadError(String),

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

impl From<ConfigCrateError> for ConfigError {
    fn from(err: ConfigCrateError) -> Self {
        ConfigError::LoadError(err.to_string())
    }
}

/// 配置文件搜索路径
const CONFIG_FILE_NAMES: &[&str] = &["config", "config.local"];

/// 加载应用配置
///
/// 按优先级从高到低合并配置：
/// 1. 环境变量（前缀 `GUSTO_`，层级分隔符 `__`）
/// 2. 配置文件（config.toml 或 config.local.toml）
/// 3. 默认值
///
/// # 环境变量示例
/// - `GUSTO_SERVER__HOST=127.0.0.1`
/// - `GUSTO_SERVER__PORT=8080`
/// - `GUSTO_GENAI__API_KEY=...`
/// - `GUSTO_AUDIO__BACKEND=null`
pub fn load_config() -> Result<AppConfig, ConfigError> {
    load_config_from_path(None)
}

/// 从指定路径加载配置
pub fn load_config_from_path(config_path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    let mut builder = Config::builder();

    // 1. 首先设置默认值（最低优先级）
    builder = builder
        .set_default("server.host", "0.0.0.0")?
        .set_default("server.port", 5080)?
        .set_default("genai.base_url", "https://generativelanguage.googleapis.com")?
        .set_default("genai.api_key", "")?
        .set_default("genai.recipe_model", "gemini-3-pro-preview")?
        .set_default("genai.image_model", "gemini-2.5-flash-image")?
        .set_default("genai.tts_model", "gemini-2.5-flash-preview-tts")?
        .set_default("genai.timeout_secs", 120)?
        .set_default("genai.fallback_image_url", "https://picsum.photos/800/450")?
        .set_default("audio.backend", "cpal")?
        .set_default("audio.sample_rate", 24000)?
        .set_default("audio.channels", 1)?
        .set_default("session.expire_secs", 86400)?
        .set_default("session.cleanup_interval_secs", 3600)?
        .set_default("log.level", "info")?
        .set_default("log.json", false)?;

    // 2. 添加配置文件（如果存在）
    if let Some(path) = config_path {
        builder = builder.add_source(File::from(path).required(true));
    } else {
        for name in CONFIG_FILE_NAMES {
            builder = builder.add_source(File::with_name(name).required(false));
        }
    }

    // 3. 添加环境变量（最高优先级）
    // 前缀: GUSTO_
    // 层级分隔符: __ (双下划线)
    // 例如: GUSTO_GENAI__API_KEY=...
    builder = builder.add_source(
        Environment::with_prefix("GUSTO")
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true),
    );

    // 4. 构建配置
    let config = builder.build()?;

    // 5. 反序列化为 AppConfig
    let app_config: AppConfig = config
        .try_deserialize()
        .map_err(|e| ConfigError::ParseError(format!("Failed to deserialize config: {}", e)))?;

    // 6. 验证配置
    validate_config(&app_config)?;

    Ok(app_config)
}

/// 验证配置有效性
fn validate_config(config: &AppConfig) -> Result<(), ConfigError> {
    if config.server.port == 0 {
        return Err(ConfigError::ValidationError(
            "Server port cannot be 0".to_string(),
        ));
    }

    if config.genai.base_url.is_empty() {
        return Err(ConfigError::ValidationError(
            "GenAI base URL cannot be empty".to_string(),
        ));
    }

    match config.audio.backend.as_str() {
        "cpal" | "null" => {}
        other => {
            return Err(ConfigError::ValidationError(format!(
                "Unknown audio backend: {} (expected cpal or null)",
                other
            )));
        }
    }

    if config.audio.sample_rate == 0 {
        return Err(ConfigError::ValidationError(
            "Audio sample rate cannot be 0".to_string(),
        ));
    }

    if config.audio.channels == 0 {
        return Err(ConfigError::ValidationError(
            "Audio channel count cannot be 0".to_string(),
        ));
    }

    Ok(())
}

/// 打印配置信息（用于启动时日志）
pub fn print_config(config: &AppConfig) {
    tracing::info!("=== Application Configuration ===");
    tracing::info!("Server: {}:{}", config.server.host, config.server.port);
    tracing::info!("GenAI Base URL: {}", config.genai.base_url);
    tracing::info!("GenAI Timeout: {}s", config.genai.timeout_secs);
    tracing::info!("Recipe Model: {}", config.genai.recipe_model);
    tracing::info!("Image Model: {}", config.genai.image_model);
    tracing::info!("TTS Model: {}", config.genai.tts_model);
    tracing::info!("Audio Backend: {}", config.audio.backend);
    tracing::info!(
        "Audio Format: {} Hz, {} channel(s)",
        config.audio.sample_rate,
        config.audio.channels
    );
    tracing::info!("Session Expire: {}s", config.session.expire_secs);
    tracing::info!("Log Level: {}", config.log.level);
    tracing::info!("=================================");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 5080);
    }

    #[test]
    fn test_validation_passes_for_valid_config() {
        let config = AppConfig::default();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_validation_error_for_zero_port() {
        let mut config = AppConfig::default();
        config.server.port = 0;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validation_error_for_unknown_backend() {
        let mut config = AppConfig::default();
        config.audio.backend = "jack".to_string();
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validation_error_for_zero_channels() {
        let mut config = AppConfig::default();
        config.audio.channels = 0;
        assert!(validate_config(&config).is_err());
    }
}
