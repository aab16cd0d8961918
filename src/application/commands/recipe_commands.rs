//! Recipe Commands - 菜谱生成相关命令

use crate::domain::recipe::{Recipe, Region};

/// 生成菜谱命令
///
/// `correction_feedback` 为 Some 表示研究员套餐的修正重生成
#[derive(Debug, Clone)]
pub struct GenerateRecipeCommand {
    pub session_id: String,
    /// 菜名或用户描述
    pub input: String,
    pub region: Region,
    pub correction_feedback: Option<String>,
}

/// 生成菜谱响应
#[derive(Debug, Clone)]
pub struct GenerateRecipeResponse {
    pub session_id: String,
    pub recipe: Recipe,
}
