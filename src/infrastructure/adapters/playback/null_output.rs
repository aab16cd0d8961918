//! Null Audio Output - 无设备环境的输出实现
//!
//! 用于 headless 部署与测试：接受所有播放请求但不产生声音，
//! 记录播放的缓冲参数供断言

use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::application::ports::{AudioOutputPort, PlaybackError, PlaybackHandle};
use crate::domain::audio::AudioBuffer;

/// 一次无声播放的记录
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayedBuffer {
    pub sample_rate: u32,
    pub channel_count: usize,
    pub frame_count: usize,
}

struct NullPlaybackHandle {
    stopped: AtomicBool,
    /// 缓冲按原时长"播完"的时刻，用于模拟自然结束
    deadline: Instant,
}

impl PlaybackHandle for NullPlaybackHandle {
    fn stop(&self) {
        self.stopped.store(true, Ordering::SeqCst);
    }

    fn is_finished(&self) -> bool {
        self.stopped.load(Ordering::SeqCst) || Instant::now() >= self.deadline
    }
}

/// Null 音频输出适配器
pub struct NullAudioOutput {
    played: Mutex<Vec<PlayedBuffer>>,
}

impl NullAudioOutput {
    pub fn new() -> Self {
        Self {
            played: Mutex::new(Vec::new()),
        }
    }

    pub fn arc(self) -> Arc<Self> {
        Arc::new(self)
    }

    /// 已播放缓冲的快照
    pub fn played(&self) -> Vec<PlayedBuffer> {
        self.played.lock().clone()
    }
}

impl Default for NullAudioOutput {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AudioOutputPort for NullAudioOutput {
    async fn play(&self, buffer: AudioBuffer) -> Result<Arc<dyn PlaybackHandle>, PlaybackError> {
        let record = PlayedBuffer {
            sample_rate: buffer.sample_rate(),
            channel_count: buffer.channel_count(),
            frame_count: buffer.frame_count(),
        };
        tracing::debug!(
            sample_rate = record.sample_rate,
            channels = record.channel_count,
            frames = record.frame_count,
            "NullAudioOutput: discarding buffer"
        );
        self.played.lock().push(record);

        Ok(Arc::new(NullPlaybackHandle {
            stopped: AtomicBool::new(false),
            deadline: Instant::now() + Duration::from_millis(buffer.duration_ms()),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_records_played_buffers() {
        let output = NullAudioOutput::new();
        // 1 秒的缓冲，保证断言时尚未自然播完
        let buffer = AudioBuffer::from_pcm16_le(&[0u8; 48000], 24000, 1).unwrap();

        let handle = output.play(buffer).await.unwrap();
        assert!(!handle.is_finished());
        handle.stop();
        assert!(handle.is_finished());

        let played = output.played();
        assert_eq!(played.len(), 1);
        assert_eq!(played[0].frame_count, 24000);
    }

    #[tokio::test]
    async fn test_handle_finishes_after_buffer_duration() {
        let output = NullAudioOutput::new();
        // 2 毫秒的缓冲
        let buffer = AudioBuffer::from_pcm16_le(&[0u8; 96], 24000, 1).unwrap();

        let handle = output.play(buffer).await.unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(20)).await;

        // 未调用 stop 也应按时长自然结束
        assert!(handle.is_finished());
    }
}
