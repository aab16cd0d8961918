//! Gusto - 文化菜谱生成与烹饪旁白系统
//!
//! 架构设计: DDD + CQRS + Hexagonal Architecture
//!
//! 领域层 (domain/):
//! - Audio Context: base64/PCM 解码与采样缓冲
//! - Recipe Context: 菜谱聚合与用户套餐/语言/地区值对象
//!
//! 应用层 (application/):
//! - Ports: 端口定义（SessionManager, GenAi, Speech, AudioOutput）
//! - Narrator: 旁白播放控制器（守卫、压制、请求令牌）
//! - Commands: CQRS 命令处理器
//! - Queries: CQRS 查询处理器
//!
//! 基础设施层 (infrastructure/):
//! - HTTP: RESTful API + WebSocket
//! - Memory: SessionManager 内存实现
//! - Adapters: Gemini Client, cpal/null 音频输出
//! - Events: WebSocket 事件发布

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::{load_config, AppConfig};
