//! 音频输出适配器

pub mod cpal_output;
pub mod null_output;

pub use cpal_output::CpalAudioOutput;
pub use null_output::NullAudioOutput;
