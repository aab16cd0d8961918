//! Research Queries - 文化研究查询

/// 研究查询 - 菜肴/食材的文化背景
#[derive(Debug, Clone)]
pub struct ResearchQuery {
    pub session_id: String,
    pub topic: String,
}

/// 研究查询响应
#[derive(Debug, Clone)]
pub struct ResearchResponse {
    pub session_id: String,
    pub topic: String,
    /// Markdown 格式的研究摘要
    pub content: String,
}
