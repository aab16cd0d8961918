//! Audio Output Port - 音频输出设备抽象
//!
//! 播放上下文（输出设备连接）在首次播放时惰性创建，
//! 会话期间复用，宿主退出时释放

use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

use crate::domain::audio::AudioBuffer;

/// 播放设备错误
///
/// 设备不可用时上层按"音频被禁用"降级处理，不中断主流程
#[derive(Debug, Error)]
pub enum PlaybackError {
    #[error("Output device unavailable: {0}")]
    DeviceUnavailable(String),

    #[error("Unsupported stream format: {0}")]
    UnsupportedFormat(String),

    #[error("Output worker stopped")]
    WorkerStopped,
}

/// 播放句柄 - 一次播放的存活实例
///
/// 由播放控制器独占持有；被新播放压制或上下文销毁时停止并释放
pub trait PlaybackHandle: Send + Sync {
    /// 停止播放
    ///
    /// 幂等：对已自然结束或已停止的句柄调用视为成功，绝不报错
    fn stop(&self);

    /// 是否已结束（自然播完或被停止）
    fn is_finished(&self) -> bool;
}

/// Audio Output Port
#[async_trait]
pub trait AudioOutputPort: Send + Sync {
    /// 开始播放一个缓冲，返回可停止的句柄
    ///
    /// 实现内部保证同一输出上下文同时只有一路声音（调用方仍需
    /// 先停旧句柄再启新播放以满足压制顺序）
    async fn play(&self, buffer: AudioBuffer) -> Result<Arc<dyn PlaybackHandle>, PlaybackError>;
}
