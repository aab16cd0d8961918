//! Recipe Context - Value Objects

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 菜谱唯一标识
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RecipeId(Uuid);

impl RecipeId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for RecipeId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RecipeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 响应语言
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    Pt,
    En,
    Es,
    Fr,
}

impl Language {
    /// 提示词里使用的语言全名
    pub fn display_name(&self) -> &'static str {
        match self {
            Language::Pt => "Português do Brasil",
            Language::En => "English",
            Language::Es => "Español",
            Language::Fr => "Français",
        }
    }

    /// 朗读步骤编号时的前缀词
    pub fn step_word(&self) -> &'static str {
        match self {
            Language::Pt => "Passo",
            Language::En => "Step",
            Language::Es => "Paso",
            Language::Fr => "Étape",
        }
    }

    /// 语音合成使用的预置音色
    pub fn voice_name(&self) -> &'static str {
        match self {
            Language::En => "Puck",
            _ => "Kore",
        }
    }
}

/// 大洲提示（用户手动选择，模型可识别出更具体的国家后忽略）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Region {
    #[serde(rename = "África")]
    Africa,
    #[serde(rename = "Europa")]
    Europa,
    #[serde(rename = "Ásia")]
    Asia,
    #[serde(rename = "América")]
    America,
    #[serde(rename = "Oceania")]
    Oceania,
    #[default]
    Global,
}

impl Region {
    pub fn as_str(&self) -> &'static str {
        match self {
            Region::Africa => "África",
            Region::Europa => "Europa",
            Region::Asia => "Ásia",
            Region::America => "América",
            Region::Oceania => "Oceania",
            Region::Global => "Global",
        }
    }
}

/// 用户套餐
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum UserPlan {
    #[default]
    Free,
    Premium,
    Researcher,
}

impl UserPlan {
    /// 是否允许语音旁白
    pub fn allows_narration(&self) -> bool {
        !matches!(self, UserPlan::Free)
    }

    /// 是否允许提交纠错反馈（研究员特权）
    pub fn allows_correction(&self) -> bool {
        matches!(self, UserPlan::Researcher)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plan_entitlements() {
        assert!(!UserPlan::Free.allows_narration());
        assert!(UserPlan::Premium.allows_narration());
        assert!(UserPlan::Researcher.allows_narration());

        assert!(!UserPlan::Premium.allows_correction());
        assert!(UserPlan::Researcher.allows_correction());
    }

    #[test]
    fn test_voice_selection_per_language() {
        assert_eq!(Language::En.voice_name(), "Puck");
        assert_eq!(Language::Pt.voice_name(), "Kore");
        assert_eq!(Language::Fr.voice_name(), "Kore");
    }

    #[test]
    fn test_language_serde() {
        let lang: Language = serde_json::from_str("\"en\"").unwrap();
        assert_eq!(lang, Language::En);
        assert_eq!(serde_json::to_string(&Language::Pt).unwrap(), "\"pt\"");
    }
}
