//! Application State
//!
//! 包含所有 Command/Query Handlers 的应用状态

use std::sync::Arc;

use crate::application::{
    // Command handlers
    CloseSessionHandler, CreateSessionHandler, GenerateRecipeHandler, PlayNarrationHandler,
    StopNarrationHandler, UpdatePreferencesHandler,
    // Query handlers
    GetNarrationStateHandler, GetRecipeHandler, ResearchHandler,
    // Ports
    AudioOutputPort, GenAiPort, Narrator, NarratorConfig, SessionManagerPort, SpeechPort,
};
use crate::infrastructure::events::EventPublisher;

/// 应用状态
///
/// 旁白播放控制器全局唯一：宿主只有一个扬声器
pub struct AppState {
    // ========== Ports ==========
    pub session_manager: Arc<dyn SessionManagerPort>,
    pub gen_ai: Arc<dyn GenAiPort>,
    pub speech: Arc<dyn SpeechPort>,
    pub audio_output: Arc<dyn AudioOutputPort>,
    pub narrator: Arc<Narrator>,
    pub event_publisher: Arc<EventPublisher>,

    // ========== Command Handlers ==========
    pub create_session_handler: CreateSessionHandler,
    pub update_preferences_handler: UpdatePreferencesHandler,
    pub close_session_handler: CloseSessionHandler,
    pub generate_recipe_handler: GenerateRecipeHandler,
    pub play_narration_handler: PlayNarrationHandler,
    pub stop_narration_handler: StopNarrationHandler,

    // ========== Query Handlers ==========
    pub get_recipe_handler: GetRecipeHandler,
    pub get_narration_state_handler: GetNarrationStateHandler,
    pub research_handler: ResearchHandler,
}

impl AppState {
    /// 创建应用状态
    pub fn new(
        session_manager: Arc<dyn SessionManagerPort>,
        gen_ai: Arc<dyn GenAiPort>,
        speech: Arc<dyn SpeechPort>,
        audio_output: Arc<dyn AudioOutputPort>,
        event_publisher: Arc<EventPublisher>,
        narrator_config: NarratorConfig,
        fallback_image_url: String,
    ) -> Self {
        let narrator = Arc::new(Narrator::new(
            speech.clone(),
            audio_output.clone(),
            narrator_config,
        ));

        Self {
            session_manager: session_manager.clone(),
            gen_ai: gen_ai.clone(),
            speech,
            audio_output,
            narrator: narrator.clone(),
            event_publisher: event_publisher.clone(),

            create_session_handler: CreateSessionHandler::new(session_manager.clone()),
            update_preferences_handler: UpdatePreferencesHandler::new(
                session_manager.clone(),
                narrator.clone(),
            ),
            close_session_handler: CloseSessionHandler::new(
                session_manager.clone(),
                narrator.clone(),
                event_publisher.clone(),
            ),
            generate_recipe_handler: GenerateRecipeHandler::new(
                session_manager.clone(),
                gen_ai.clone(),
                event_publisher.clone(),
                fallback_image_url,
            ),
            play_narration_handler: PlayNarrationHandler::new(
                session_manager.clone(),
                narrator.clone(),
                event_publisher.clone(),
            ),
            stop_narration_handler: StopNarrationHandler::new(
                session_manager.clone(),
                narrator.clone(),
                event_publisher,
            ),

            get_recipe_handler: GetRecipeHandler::new(session_manager.clone()),
            get_narration_state_handler: GetNarrationStateHandler::new(
                session_manager.clone(),
                narrator,
            ),
            research_handler: ResearchHandler::new(session_manager, gen_ai),
        }
    }
}
