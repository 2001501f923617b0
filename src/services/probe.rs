//! 环境探测
//!
//! 两步判定：CLI 是否可调用，守护进程是否可达。
//! 只读，不改变任何宿主机状态。CLI 在而守护进程不可达必须
//! 区分出来（needs start ≠ needs install）。

use std::time::Duration;

use serde::Deserialize;
use tracing::debug;

use crate::config::constants::PROBE_COMMAND_TIMEOUT_SECS;
use crate::domain::EnvStatus;
use crate::infra::command::CommandRunner;

/// `docker info --format '{{json .}}'` 里关心的字段
#[derive(Debug, Deserialize)]
struct DockerInfo {
    #[serde(default, rename = "ServerErrors")]
    server_errors: Option<Vec<String>>,
}

/// 探测当前环境状态，每次调用都重新计算
pub async fn probe_environment() -> EnvStatus {
    if !cli_available().await {
        return EnvStatus::Absent;
    }
    if daemon_reachable().await {
        EnvStatus::Running
    } else {
        EnvStatus::Stopped
    }
}

/// Docker CLI 是否可调用
async fn cli_available() -> bool {
    CommandRunner::run(
        "docker",
        &["--version"],
        Some(Duration::from_secs(PROBE_COMMAND_TIMEOUT_SECS)),
    )
    .await
    .map(|o| o.status.success())
    .unwrap_or(false)
}

/// 守护进程是否可达
///
/// `docker info` 在守护进程不可达时仍可能以 0 退出并把错误塞进
/// ServerErrors，所以要解析 JSON 而不是只看退出码。
pub async fn daemon_reachable() -> bool {
    let output = CommandRunner::run(
        "docker",
        &["info", "--format", "{{json .}}"],
        Some(Duration::from_secs(PROBE_COMMAND_TIMEOUT_SECS)),
    )
    .await;

    match output {
        Ok(output) if output.status.success() => {
            daemon_running(&String::from_utf8_lossy(&output.stdout))
        }
        Ok(output) => {
            debug!(
                stderr = %String::from_utf8_lossy(&output.stderr),
                "docker info exited non-zero"
            );
            false
        }
        Err(e) => {
            debug!(error = %e, "docker info failed to run");
            false
        }
    }
}

/// 从 `docker info` 的 JSON 输出判断守护进程是否在运行
fn daemon_running(raw: &str) -> bool {
    serde_json::from_str::<DockerInfo>(raw)
        .map(|info| info.server_errors.map(|e| e.is_empty()).unwrap_or(true))
        .unwrap_or(false)
}
