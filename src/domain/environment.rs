//! 环境状态与引导决策
//!
//! 容器运行时环境是一个三态值，每次探测都重新计算、绝不缓存。
//! 探测结果显式地沿流水线传递，后续阶段是 (配置, 环境状态) 的纯函数。

use serde::Serialize;

/// 环境状态（三态）
#[derive(Clone, Copy, Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum EnvStatus {
    /// Docker CLI 不存在
    Absent,
    /// CLI 存在但守护进程不可达
    Stopped,
    /// CLI 与守护进程都正常
    Running,
}

impl EnvStatus {
    /// 转换为字符串
    pub fn as_str(&self) -> &'static str {
        match self {
            EnvStatus::Absent => "absent",
            EnvStatus::Stopped => "stopped",
            EnvStatus::Running => "running",
        }
    }
}

/// 引导计划
///
/// 核心策略：只有 CLI 本身缺失才触发安装；CLI 在而守护进程停了，
/// 只尝试启动。否则重复运行会对仅仅停了守护进程的机器做破坏性重装。
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BootstrapPlan {
    /// 安装运行时，然后启动守护进程
    InstallThenStart,
    /// 只启动守护进程
    StartOnly,
    /// 环境已就绪，无需任何动作
    Ready,
}

impl BootstrapPlan {
    /// 根据环境状态得出引导计划
    pub fn for_status(status: EnvStatus) -> Self {
        match status {
            EnvStatus::Absent => BootstrapPlan::InstallThenStart,
            EnvStatus::Stopped => BootstrapPlan::StartOnly,
            EnvStatus::Running => BootstrapPlan::Ready,
        }
    }

    /// 是否需要安装
    pub fn needs_install(&self) -> bool {
        matches!(self, BootstrapPlan::InstallThenStart)
    }

    /// 是否需要启动守护进程
    pub fn needs_start(&self) -> bool {
        matches!(
            self,
            BootstrapPlan::InstallThenStart | BootstrapPlan::StartOnly
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_install_only_when_cli_absent() {
        assert_eq!(
            BootstrapPlan::for_status(EnvStatus::Absent),
            BootstrapPlan::InstallThenStart
        );
        // 守护进程停了绝不触发安装
        assert_eq!(
            BootstrapPlan::for_status(EnvStatus::Stopped),
            BootstrapPlan::StartOnly
        );
        assert!(!BootstrapPlan::for_status(EnvStatus::Stopped).needs_install());
    }

    #[test]
    fn test_healthy_environment_is_noop() {
        let plan = BootstrapPlan::for_status(EnvStatus::Running);
        assert_eq!(plan, BootstrapPlan::Ready);
        assert!(!plan.needs_install());
        assert!(!plan.needs_start());
    }

    #[test]
    fn test_env_status_as_str() {
        assert_eq!(EnvStatus::Absent.as_str(), "absent");
        assert_eq!(EnvStatus::Stopped.as_str(), "stopped");
        assert_eq!(EnvStatus::Running.as_str(), "running");
    }
}
