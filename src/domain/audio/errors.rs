//! Audio Context - Errors

use thiserror::Error;

/// 音频解码错误
///
/// 解码是全有或全无的：任何错误都不产生部分结果
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("Invalid base64 payload: {0}")]
    InvalidBase64(#[from] base64::DecodeError),

    #[error("Invalid channel count: {0}")]
    InvalidChannelCount(usize),

    #[error("Invalid sample rate: {0}")]
    InvalidSampleRate(u32),
}
