//! 配置模块
//!
//! 命令行/环境变量解析与固定常量

pub mod stack;

pub use stack::{constants, StackConfig};
