//! Recipe Context - 菜谱领域模型

mod entities;
mod value_objects;

pub use entities::{CookingStep, Ingredient, Recipe};
pub use value_objects::{Language, RecipeId, Region, UserPlan};
