//! Narration Commands - 旁白播放相关命令

/// 播放步骤旁白命令
#[derive(Debug, Clone)]
pub struct PlayNarrationCommand {
    pub session_id: String,
    pub step_index: usize,
}

/// 播放步骤旁白响应
///
/// `status` 为 "speaking"/"idle"；跳过时附带原因
#[derive(Debug, Clone)]
pub struct PlayNarrationResponse {
    pub session_id: String,
    pub step_index: usize,
    pub status: String,
    pub skip_reason: Option<String>,
    pub duration_ms: Option<u64>,
}

/// 停止旁白命令
#[derive(Debug, Clone)]
pub struct StopNarrationCommand {
    pub session_id: String,
}

/// 停止旁白响应
#[derive(Debug, Clone)]
pub struct StopNarrationResponse {
    pub session_id: String,
    pub status: String,
}
