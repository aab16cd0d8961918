//! 应用层 - 命令/查询处理器与端口定义
//!
//! 用例编排在这里完成：旁白播放控制器、菜谱生成流程、
//! 会话生命周期。所有对外依赖通过 ports 抽象

pub mod commands;
pub mod error;
pub mod narrator;
pub mod ports;
pub mod queries;

pub use error::ApplicationError;
pub use narrator::{
    narration_gate, NarrationError, NarrationOutcome, Narrator, NarratorConfig, PlaybackState,
    SkipReason,
};

// Command handlers
pub use commands::handlers::{
    CloseSessionHandler, CreateSessionHandler, GenerateRecipeHandler, PlayNarrationHandler,
    StopNarrationHandler, UpdatePreferencesHandler,
};
// Query handlers
pub use queries::handlers::{GetNarrationStateHandler, GetRecipeHandler, ResearchHandler};
// Commands & queries
pub use commands::{
    CloseSessionCommand, CreateSessionCommand, GenerateRecipeCommand, PlayNarrationCommand,
    StopNarrationCommand, UpdatePreferencesCommand,
};
pub use queries::{GetNarrationStateQuery, GetRecipeQuery, ResearchQuery};
// Ports
pub use ports::{
    AudioOutputPort, GenAiError, GenAiPort, ImagePayload, PlaybackError, PlaybackHandle,
    PreferencesUpdate, RecipeRequest, Session, SessionError, SessionManagerPort, SpeechPort,
    SpeechRequest,
};
