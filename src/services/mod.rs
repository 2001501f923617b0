//! 服务层模块
//!
//! 流水线各阶段的具体实现

pub mod daemon;
pub mod desktop;
pub mod health;
pub mod install;
pub mod prefetch;
pub mod probe;
pub mod stack;
