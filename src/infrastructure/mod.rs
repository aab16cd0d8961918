//! 基础设施层 - 适配器与对外接口

pub mod adapters;
pub mod events;
pub mod http;
pub mod memory;
