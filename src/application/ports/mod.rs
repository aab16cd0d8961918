//! Application Ports - 出站端口定义
//!
//! 定义应用层与基础设施层的抽象接口

mod audio_output;
mod gen_ai;
mod session_manager;
mod speech;

pub use audio_output::{AudioOutputPort, PlaybackError, PlaybackHandle};
pub use gen_ai::{GenAiError, GenAiPort, ImagePayload, RecipeRequest};
pub use session_manager::{PreferencesUpdate, Session, SessionError, SessionManagerPort};
pub use speech::{SpeechPort, SpeechRequest};
