//! Audio Context - PCM 音频解码
//!
//! 语音合成服务返回 base64 编码的原始 16-bit LE PCM 字节流，
//! 这里负责把它解码成可播放的归一化采样缓冲

mod buffer;
mod errors;

pub use buffer::{decode_base64_payload, AudioBuffer};
pub use errors::DecodeError;
