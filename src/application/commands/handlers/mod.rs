//! 命令处理器

pub mod narration_handlers;
pub mod recipe_handlers;
pub mod session_handlers;

pub use narration_handlers::{PlayNarrationHandler, StopNarrationHandler};
pub use recipe_handlers::GenerateRecipeHandler;
pub use session_handlers::{CloseSessionHandler, CreateSessionHandler, UpdatePreferencesHandler};
