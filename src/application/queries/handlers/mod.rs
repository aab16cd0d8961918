//! 查询处理器

pub mod recipe_query_handlers;
pub mod research_handlers;

pub use recipe_query_handlers::{GetNarrationStateHandler, GetRecipeHandler};
pub use research_handlers::ResearchHandler;
