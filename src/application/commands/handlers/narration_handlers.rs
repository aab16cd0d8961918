//! Narration Command Handlers

use std::sync::Arc;
use std::time::Duration;

use crate::application::commands::narration_commands::*;
use crate::application::error::ApplicationError;
use crate::application::narrator::{NarrationError, NarrationOutcome, Narrator, PlaybackState};
use crate::application::ports::SessionManagerPort;
use crate::infrastructure::events::EventPublisher;

/// PlayNarration Handler - 播放步骤旁白
///
/// 旁白失败绝不打断烹饪流程：除步骤越界外一律降级为 idle 响应
pub struct PlayNarrationHandler {
    session_manager: Arc<dyn SessionManagerPort>,
    narrator: Arc<Narrator>,
    event_publisher: Arc<EventPublisher>,
}

impl PlayNarrationHandler {
    pub fn new(
        session_manager: Arc<dyn SessionManagerPort>,
        narrator: Arc<Narrator>,
        event_publisher: Arc<EventPublisher>,
    ) -> Self {
        Self {
            session_manager,
            narrator,
            event_publisher,
        }
    }

    pub async fn handle(
        &self,
        cmd: PlayNarrationCommand,
    ) -> Result<PlayNarrationResponse, ApplicationError> {
        let session = self.session_manager.get(&cmd.session_id)?;

        let outcome = match self.narrator.narrate_step(&session, cmd.step_index).await {
            Ok(outcome) => outcome,
            Err(NarrationError::StepOutOfRange(index)) => {
                return Err(ApplicationError::validation(format!(
                    "Step index out of range: {}",
                    index
                )));
            }
            Err(NarrationError::Decode(e)) => {
                // 坏负载中止本次播放，不影响后续请求
                tracing::error!(
                    session_id = %cmd.session_id,
                    step_index = cmd.step_index,
                    error = %e,
                    "Narration payload decode failed"
                );
                return Ok(PlayNarrationResponse {
                    session_id: cmd.session_id,
                    step_index: cmd.step_index,
                    status: PlaybackState::Idle.as_str().to_string(),
                    skip_reason: None,
                    duration_ms: None,
                });
            }
        };

        match outcome {
            NarrationOutcome::Started {
                step_index,
                duration_ms,
                token,
            } => {
                self.session_manager
                    .set_step(&cmd.session_id, step_index)?;
                self.event_publisher.publish_narration_started(
                    &cmd.session_id,
                    step_index,
                    duration_ms,
                );
                self.spawn_completion_watcher(cmd.session_id.clone(), step_index, duration_ms, token);

                Ok(PlayNarrationResponse {
                    session_id: cmd.session_id,
                    step_index,
                    status: PlaybackState::Playing.as_str().to_string(),
                    skip_reason: None,
                    duration_ms: Some(duration_ms),
                })
            }
            NarrationOutcome::Skipped(reason) => {
                self.event_publisher.publish_narration_skipped(
                    &cmd.session_id,
                    cmd.step_index,
                    reason.as_str(),
                );
                Ok(PlayNarrationResponse {
                    session_id: cmd.session_id,
                    step_index: cmd.step_index,
                    status: PlaybackState::Idle.as_str().to_string(),
                    skip_reason: Some(reason.as_str().to_string()),
                    duration_ms: None,
                })
            }
            NarrationOutcome::Silent | NarrationOutcome::Superseded => Ok(PlayNarrationResponse {
                session_id: cmd.session_id,
                step_index: cmd.step_index,
                status: PlaybackState::Idle.as_str().to_string(),
                skip_reason: None,
                duration_ms: None,
            }),
        }
    }

    /// 播放时长到期后若已回到 Idle 则推送完成事件
    ///
    /// 被压制或手动停止的播放不产生 Finished：令牌已失效时直接放弃，
    /// 即使后续请求恰好也在本窗口内播完
    fn spawn_completion_watcher(
        &self,
        session_id: String,
        step_index: usize,
        duration_ms: u64,
        token: u64,
    ) {
        let narrator = self.narrator.clone();
        let publisher = self.event_publisher.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(duration_ms + 50)).await;
            if narrator.is_current(token) && narrator.state().await == PlaybackState::Idle {
                publisher.publish_narration_finished(&session_id, step_index);
            }
        });
    }
}

/// StopNarration Handler - 停止旁白
///
/// 幂等：Idle 时也返回成功
pub struct StopNarrationHandler {
    session_manager: Arc<dyn SessionManagerPort>,
    narrator: Arc<Narrator>,
    event_publisher: Arc<EventPublisher>,
}

impl StopNarrationHandler {
    pub fn new(
        session_manager: Arc<dyn SessionManagerPort>,
        narrator: Arc<Narrator>,
        event_publisher: Arc<EventPublisher>,
    ) -> Self {
        Self {
            session_manager,
            narrator,
            event_publisher,
        }
    }

    pub async fn handle(
        &self,
        cmd: StopNarrationCommand,
    ) -> Result<StopNarrationResponse, ApplicationError> {
        // 校验会话仍然有效
        self.session_manager.get(&cmd.session_id)?;

        self.narrator.stop().await;
        self.event_publisher.publish_narration_stopped(&cmd.session_id);

        tracing::debug!(session_id = %cmd.session_id, "Narration stopped");

        Ok(StopNarrationResponse {
            session_id: cmd.session_id,
            status: PlaybackState::Idle.as_str().to_string(),
        })
    }
}
