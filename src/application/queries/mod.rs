//! 查询定义与处理器

pub mod handlers;
pub mod recipe_queries;
pub mod research_queries;

pub use recipe_queries::*;
pub use research_queries::*;
