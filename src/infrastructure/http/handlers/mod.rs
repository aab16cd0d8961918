//! HTTP Handlers

pub mod narration;
pub mod ping;
pub mod recipe;
pub mod research;
pub mod session;
pub mod websocket;

pub use narration::{narration_status, play_narration, stop_narration};
pub use ping::ping;
pub use recipe::{generate_recipe, get_recipe};
pub use research::research;
pub use session::{close_session, create_session, update_preferences};
pub use websocket::websocket_handler;
