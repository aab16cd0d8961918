//! Narrator - 旁白播放控制器
//!
//! 管线：前置守卫 → 语音合成 → base64/PCM 解码 → 播放。
//!
//! 并发模型：单个共享播放句柄由异步互斥锁做单写者串行化，
//! 同一时刻只有一个 stop-then-start 序列在进行；在途请求用
//! 单调递增令牌标记，await 返回后令牌已过期的结果直接丢弃，
//! 不会启动过期的播放

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use thiserror::Error;
use tokio::sync::Mutex;

use crate::application::ports::{
    AudioOutputPort, PlaybackHandle, Session, SpeechPort, SpeechRequest,
};
use crate::domain::audio::{decode_base64_payload, AudioBuffer, DecodeError};

/// 跳过旁白的原因
///
/// 四个条件相互独立，任一为真即整体跳过：不触碰播放上下文，
/// 也不调用语音合成服务
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// 用户关闭了旁白
    AudioDisabled,
    /// 没有加载菜谱
    NoRecipe,
    /// 套餐不含旁白
    PlanWithoutNarration,
    /// 网络不可用
    Offline,
}

impl SkipReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            SkipReason::AudioDisabled => "audio_disabled",
            SkipReason::NoRecipe => "no_recipe",
            SkipReason::PlanWithoutNarration => "plan_without_narration",
            SkipReason::Offline => "offline",
        }
    }
}

/// 旁白前置守卫
///
/// 把散落在调用点的条件收敛为一个可独立测试的判定
pub fn narration_gate(session: &Session) -> Result<(), SkipReason> {
    if !session.audio_enabled {
        return Err(SkipReason::AudioDisabled);
    }
    if session.recipe.is_none() {
        return Err(SkipReason::NoRecipe);
    }
    if !session.plan.allows_narration() {
        return Err(SkipReason::PlanWithoutNarration);
    }
    if !session.online {
        return Err(SkipReason::Offline);
    }
    Ok(())
}

/// 播放状态
///
/// Stopped 是瞬态：停止完成后立即坍缩为 Idle，对外不可观测
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackState {
    Idle,
    Playing,
}

impl PlaybackState {
    pub fn as_str(&self) -> &'static str {
        match self {
            PlaybackState::Idle => "idle",
            PlaybackState::Playing => "speaking",
        }
    }
}

/// 一次旁白请求的结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NarrationOutcome {
    /// 已开始播放
    Started {
        step_index: usize,
        duration_ms: u64,
        /// 本次播放的请求令牌，被压制或停止后失效
        token: u64,
    },
    /// 前置守卫判定跳过
    Skipped(SkipReason),
    /// 语音服务没有返回音频（失败或空结果），保持非朗读状态
    Silent,
    /// 被更新的请求压制，结果已丢弃
    Superseded,
}

/// 旁白管线错误
#[derive(Debug, Error)]
pub enum NarrationError {
    #[error("Step index out of range: {0}")]
    StepOutOfRange(usize),

    #[error(transparent)]
    Decode(#[from] DecodeError),
}

/// 旁白音频格式（语音服务返回的固定格式）
#[derive(Debug, Clone)]
pub struct NarratorConfig {
    pub sample_rate: u32,
    pub channel_count: usize,
}

impl Default for NarratorConfig {
    fn default() -> Self {
        Self {
            sample_rate: 24000,
            channel_count: 1,
        }
    }
}

/// 旁白播放控制器
///
/// 独占持有当前播放句柄；启动新播放前先静默并释放旧句柄，
/// 保证同一播放上下文同时只有一路声音
pub struct Narrator {
    speech: Arc<dyn SpeechPort>,
    output: Arc<dyn AudioOutputPort>,
    config: NarratorConfig,
    /// 当前播放句柄，互斥锁串行化 stop-then-start 序列
    current: Mutex<Option<Arc<dyn PlaybackHandle>>>,
    /// 单调递增请求令牌
    token: AtomicU64,
}

impl Narrator {
    pub fn new(
        speech: Arc<dyn SpeechPort>,
        output: Arc<dyn AudioOutputPort>,
        config: NarratorConfig,
    ) -> Self {
        Self {
            speech,
            output,
            config,
            current: Mutex::new(None),
            token: AtomicU64::new(0),
        }
    }

    /// 令牌是否仍指向当前播放请求
    ///
    /// 任何新请求或 stop 都会使旧令牌失效
    pub fn is_current(&self, token: u64) -> bool {
        self.token.load(Ordering::SeqCst) == token
    }

    /// 当前可观测的播放状态
    pub async fn state(&self) -> PlaybackState {
        let current = self.current.lock().await;
        match current.as_ref() {
            Some(handle) if !handle.is_finished() => PlaybackState::Playing,
            _ => PlaybackState::Idle,
        }
    }

    /// 停止旁白
    ///
    /// 幂等：Idle 时调用是无害的 no-op；与自然播完竞争时
    /// "已经停止"视为成功
    pub async fn stop(&self) {
        // 令在途的合成请求失效
        self.token.fetch_add(1, Ordering::SeqCst);

        let mut current = self.current.lock().await;
        if let Some(handle) = current.take() {
            handle.stop();
        }
    }

    /// 为指定步骤播放旁白
    ///
    /// 所有失败都在这里降级为非朗读状态；只有解码错误作为
    /// `NarrationError` 上抛供调用方记录，同样不打断主流程
    pub async fn narrate_step(
        &self,
        session: &Session,
        step_index: usize,
    ) -> Result<NarrationOutcome, NarrationError> {
        if let Err(reason) = narration_gate(session) {
            tracing::debug!(
                session_id = %session.id,
                step_index = step_index,
                reason = reason.as_str(),
                "Narration skipped"
            );
            return Ok(NarrationOutcome::Skipped(reason));
        }

        // 守卫已保证菜谱存在
        let recipe = match session.recipe.as_ref() {
            Some(r) => r,
            None => return Ok(NarrationOutcome::Skipped(SkipReason::NoRecipe)),
        };
        let step = recipe
            .step(step_index)
            .ok_or(NarrationError::StepOutOfRange(step_index))?;

        // 新请求先压制旧播放，再取最新令牌
        self.stop().await;
        let token = self.token.fetch_add(1, Ordering::SeqCst) + 1;

        let text = format!(
            "{} {}. {}. {}",
            session.language.step_word(),
            step_index + 1,
            step.title,
            step.instruction
        );

        let payload = match self
            .speech
            .synthesize(SpeechRequest {
                text,
                language: session.language,
            })
            .await
        {
            Ok(Some(payload)) => payload,
            Ok(None) => {
                tracing::debug!(
                    session_id = %session.id,
                    step_index = step_index,
                    "Speech capability returned no payload"
                );
                return Ok(NarrationOutcome::Silent);
            }
            Err(e) => {
                // 旁白失败静默降级，不向用户弹错
                tracing::warn!(
                    session_id = %session.id,
                    step_index = step_index,
                    error = %e,
                    "Speech synthesis failed, staying silent"
                );
                return Ok(NarrationOutcome::Silent);
            }
        };

        // 等待合成期间可能已有更新的请求到达
        if self.token.load(Ordering::SeqCst) != token {
            tracing::debug!(
                session_id = %session.id,
                step_index = step_index,
                "Narration superseded while awaiting synthesis, dropping result"
            );
            return Ok(NarrationOutcome::Superseded);
        }

        let bytes = decode_base64_payload(&payload)?;
        let buffer =
            AudioBuffer::from_pcm16_le(&bytes, self.config.sample_rate, self.config.channel_count)?;
        let duration_ms = buffer.duration_ms();

        // 持锁期间复查令牌，避免新句柄被并发请求的 stop 错杀
        let mut current = self.current.lock().await;
        if self.token.load(Ordering::SeqCst) != token {
            return Ok(NarrationOutcome::Superseded);
        }
        if let Some(prev) = current.take() {
            prev.stop();
        }

        let handle = match self.output.play(buffer).await {
            Ok(handle) => handle,
            Err(e) => {
                // 设备不可用等同于音频被禁用：降级，不崩溃
                tracing::warn!(
                    session_id = %session.id,
                    error = %e,
                    "Playback device unavailable, narration degraded to silence"
                );
                return Ok(NarrationOutcome::Silent);
            }
        };
        *current = Some(handle);

        tracing::info!(
            session_id = %session.id,
            step_index = step_index,
            duration_ms = duration_ms,
            "Narration started"
        );

        Ok(NarrationOutcome::Started {
            step_index,
            duration_ms,
            token,
        })
    }
}
