//! 基础设施模块
//!
//! 封装外部依赖（命令执行、固定间隔轮询）

pub mod command;
pub mod poll;

pub use command::CommandRunner;
pub use poll::{poll_until, PollOutcome};
