//! Domain Layer - 领域层
//!
//! 包含两个限界上下文:
//! - Recipe Context: 菜谱领域模型
//! - Audio Context: PCM 音频解码核心

pub mod audio;
pub mod recipe;
