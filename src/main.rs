//! Gusto - 文化菜谱生成与烹饪旁白系统
//!
//! - Domain: audio/, recipe/ (Bounded Contexts)
//! - Application: commands, queries, ports, narrator
//! - Infrastructure: http, memory, adapters, events

use std::sync::Arc;
use std::time::Duration;

use gusto::application::{AudioOutputPort, NarratorConfig, SessionManagerPort};
use gusto::config::{load_config, print_config};
use gusto::infrastructure::adapters::gen_ai::{GeminiClient, GeminiClientConfig};
use gusto::infrastructure::adapters::playback::{CpalAudioOutput, NullAudioOutput};
use gusto::infrastructure::events::EventPublisher;
use gusto::infrastructure::http::{AppState, HttpServer, ServerConfig};
use gusto::infrastructure::memory::InMemorySessionManager;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 加载配置（优先级：环境变量 > 配置文件 > 默认值）
    let config = load_config().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;

    // 初始化日志
    let log_filter = format!(
        "{},gusto={},tower_http=debug",
        config.log.level, config.log.level
    );
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log_filter)),
        )
        .init();

    tracing::info!("Gusto - 文化菜谱生成与烹饪旁白系统");
    print_config(&config);

    // 创建 Gemini 客户端（同时提供菜谱/配图/语音三种能力）
    let genai_config = GeminiClientConfig {
        base_url: config.genai.base_url.clone(),
        api_key: config.genai.api_key.clone(),
        recipe_model: config.genai.recipe_model.clone(),
        image_model: config.genai.image_model.clone(),
        tts_model: config.genai.tts_model.clone(),
        timeout_secs: config.genai.timeout_secs,
        fallback_image_url: config.genai.fallback_image_url.clone(),
    };
    let gemini = Arc::new(GeminiClient::new(genai_config)?);

    // 创建音频输出后端
    let audio_output: Arc<dyn AudioOutputPort> = match config.audio.backend.as_str() {
        "null" => {
            tracing::warn!("Audio backend is null, narration will be silent");
            Arc::new(NullAudioOutput::new())
        }
        _ => Arc::new(CpalAudioOutput::new()),
    };

    // 创建事件发布器与会话管理器
    let event_publisher = Arc::new(EventPublisher::new());
    let session_manager = Arc::new(InMemorySessionManager::new());

    // 过期会话清理
    {
        let session_manager = session_manager.clone();
        let event_publisher = event_publisher.clone();
        let expire_secs = config.session.expire_secs;
        let interval_secs = config.session.cleanup_interval_secs;
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(Duration::from_secs(interval_secs));
            loop {
                interval.tick().await;
                for session_id in session_manager.get_expired_sessions(expire_secs) {
                    tracing::info!(session_id = %session_id, "Closing expired session");
                    event_publisher.publish_session_closed(&session_id, "expired");
                    if let Err(e) = session_manager.close(&session_id) {
                        tracing::warn!(session_id = %session_id, error = %e, "Failed to close session");
                    }
                    event_publisher.unregister_session(&session_id);
                }
            }
        });
    }

    // 创建 HTTP 服务器
    let server_config = ServerConfig::new(&config.server.host, config.server.port);
    let state = AppState::new(
        session_manager,
        gemini.clone(),
        gemini,
        audio_output,
        event_publisher,
        NarratorConfig {
            sample_rate: config.audio.sample_rate,
            channel_count: config.audio.channels,
        },
        config.genai.fallback_image_url.clone(),
    );

    let server = HttpServer::new(server_config, state);

    tracing::info!("Starting HTTP server...");

    // 启动服务器（带优雅关闭）
    server
        .run_with_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "Failed to listen for ctrl-c");
            }
            tracing::info!("Received shutdown signal");
        })
        .await?;

    tracing::info!("Server shutdown complete");

    Ok(())
}
