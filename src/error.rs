//! 统一错误处理
//!
//! 引导流程的致命错误分类。瞬态错误（守护进程/健康端点还没就绪）
//! 在 `infra::poll` 内部消化，只有超出边界后才会变成这里的错误。

use thiserror::Error;

use crate::infra::command::CommandError;

/// 引导错误类型
#[derive(Debug, Error)]
pub enum BootstrapError {
    /// 当前操作系统不在支持范围内
    #[error("Unsupported platform: {0}")]
    UnsupportedPlatform(String),

    /// 没有找到可用的包管理器
    #[error("No supported package manager found (tried apt-get, dnf, brew)")]
    NoPackageManager,

    /// Docker 守护进程在限定时间内没有就绪
    #[error(
        "Docker daemon did not become ready within {waited_secs}s; \
         start it manually and re-run with --skip-docker-check"
    )]
    DaemonStartTimeout { waited_secs: u64 },

    /// 健康检查超出了配置的上限（默认无上限，不会出现）
    #[error("Web UI health endpoint did not respond within {waited_secs}s")]
    HealthCheckTimeout { waited_secs: u64 },

    /// 外部命令以非零状态退出
    #[error("{program} failed: {detail}")]
    CommandFailed { program: String, detail: String },

    /// 外部命令无法执行
    #[error(transparent)]
    Command(#[from] CommandError),

    /// HTTP 请求失败
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// IO 错误
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl BootstrapError {
    /// 构造命令失败错误
    pub fn command_failed(program: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::CommandFailed {
            program: program.into(),
            detail: detail.into(),
        }
    }
}

/// 便捷类型别名
pub type BootstrapResult<T> = Result<T, BootstrapError>;
