//! 领域模型模块
//!
//! 纯数据结构与纯决策逻辑，不依赖 tokio/reqwest

pub mod environment;
pub mod platform;
pub mod stage;

// Re-exports for convenience
pub use environment::{BootstrapPlan, EnvStatus};
pub use platform::{InstallStrategy, OsFamily, INSTALL_STRATEGIES};
pub use stage::{BootstrapStage, StageStatus};
