//! Recipe Context - Entities

use serde::{Deserialize, Serialize};

use super::value_objects::RecipeId;

/// 配料 - 条目 + 用量
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ingredient {
    pub item: String,
    pub quantity: String,
}

/// 烹饪步骤 - 最小旁白单位
///
/// 不变量:
/// - title 与 instruction 不可为空（由生成端 schema 保证，反序列化时必填）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CookingStep {
    pub title: String,
    pub instruction: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tip: Option<String>,
}

/// 菜谱聚合
///
/// 由生成式 AI 服务产出的结构化记录；required 字段缺失时
/// 在适配器层反序列化失败并作为外部服务错误上报
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recipe {
    #[serde(default)]
    pub id: RecipeId,
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub category: String,
    #[serde(rename = "prepTime")]
    pub prep_time: String,
    #[serde(default)]
    pub servings: String,
    pub difficulty: String,
    pub origin: String,
    #[serde(rename = "continentDetected")]
    pub continent_detected: String,
    /// 是否吸收了研究员的纠错反馈
    #[serde(rename = "isRefined", default)]
    pub is_refined: bool,
    pub ingredients: Vec<Ingredient>,
    pub steps: Vec<CookingStep>,
    /// 配图（生成失败时为占位图 URL）
    #[serde(rename = "imageUrl", default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl Recipe {
    pub fn step(&self, index: usize) -> Option<&CookingStep> {
        self.steps.get(index)
    }

    pub fn step_count(&self) -> usize {
        self.steps.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recipe_deserializes_model_output() {
        let json = r#"{
            "title": "Cachupa Rica",
            "description": "Prato nacional de Cabo Verde.",
            "category": "Prato Principal",
            "prepTime": "3h",
            "servings": "6",
            "difficulty": "Médio",
            "origin": "Cabo Verde",
            "continentDetected": "África",
            "isRefined": true,
            "ingredients": [{"item": "Milho", "quantity": "500g"}],
            "steps": [{"title": "Demolhar", "instruction": "Deixe o milho de molho."}]
        }"#;

        let recipe: Recipe = serde_json::from_str(json).unwrap();
        assert_eq!(recipe.title, "Cachupa Rica");
        assert_eq!(recipe.origin, "Cabo Verde");
        assert!(recipe.is_refined);
        assert_eq!(recipe.step_count(), 1);
        assert_eq!(recipe.step(0).unwrap().title, "Demolhar");
        assert!(recipe.step(0).unwrap().tip.is_none());
        assert!(recipe.step(1).is_none());
    }

    #[test]
    fn test_recipe_missing_required_field_fails() {
        // 缺 origin
        let json = r#"{
            "title": "X",
            "description": "Y",
            "prepTime": "1h",
            "difficulty": "Fácil",
            "continentDetected": "Global",
            "ingredients": [],
            "steps": []
        }"#;
        assert!(serde_json::from_str::<Recipe>(json).is_err());
    }
}
