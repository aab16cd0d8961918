//! 命令定义与处理器

pub mod handlers;
pub mod narration_commands;
pub mod recipe_commands;
pub mod session_commands;

pub use narration_commands::*;
pub use recipe_commands::*;
pub use session_commands::*;
