//! 事件基础设施

pub mod publisher;

pub use publisher::{EventPublisher, WsEvent};
