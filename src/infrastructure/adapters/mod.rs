//! 外部服务与设备适配器

pub mod gen_ai;
pub mod playback;
