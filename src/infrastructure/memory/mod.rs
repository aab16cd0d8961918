//! 内存存储实现

pub mod session_manager;

pub use session_manager::InMemorySessionManager;
