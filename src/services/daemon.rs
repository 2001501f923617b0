//! 守护进程启动
//!
//! 发出平台对应的启动动作，然后固定间隔轮询直到守护进程可达
//! 或超出配置的上限。超时即致命，提示操作员手动启动后带
//! --skip-docker-check 重跑。

use std::time::Duration;

use tracing::{info, warn};

use crate::config::StackConfig;
use crate::domain::platform::{self, OsFamily};
use crate::error::{BootstrapError, BootstrapResult};
use crate::infra::command::CommandRunner;
use crate::infra::poll::{poll_until, PollOutcome};
use crate::services::probe;

/// 确保守护进程在运行
pub async fn ensure_daemon_running(config: &StackConfig) -> BootstrapResult<()> {
    let os = OsFamily::current()
        .ok_or_else(|| BootstrapError::UnsupportedPlatform(std::env::consts::OS.to_string()))?;

    issue_start_action(os).await?;

    let interval = Duration::from_secs(config.daemon_poll_secs);
    let bound = Duration::from_secs(config.daemon_timeout_secs);

    info!(
        interval_secs = config.daemon_poll_secs,
        timeout_secs = config.daemon_timeout_secs,
        "Waiting for Docker daemon"
    );

    match poll_until(probe::daemon_reachable, interval, Some(bound)).await {
        PollOutcome::Ready { attempts } => {
            info!(attempts, "Docker daemon is ready");
            Ok(())
        }
        PollOutcome::TimedOut { attempts, waited } => {
            warn!(attempts, waited_secs = waited.as_secs(), "Docker daemon never came up");
            Err(BootstrapError::DaemonStartTimeout {
                waited_secs: config.daemon_timeout_secs,
            })
        }
    }
}

/// 发出平台对应的启动动作
///
/// 启动命令本身失败只记 warn：守护进程可能已经在启动中，
/// 轮询的超时会兜底。
async fn issue_start_action(os: OsFamily) -> BootstrapResult<()> {
    let (program, args): (&str, Vec<&str>) = match os {
        OsFamily::Linux => {
            platform::elevate(os, platform::is_root(), &["systemctl", "start", "docker"])
        }
        OsFamily::MacOs => ("open", vec!["-a", "Docker"]),
        OsFamily::Windows => {
            return Err(BootstrapError::UnsupportedPlatform(
                "windows (start Docker Desktop manually, then re-run with --skip-docker-check)"
                    .to_string(),
            ));
        }
    };

    info!(">>> {} {}", program, args.join(" "));
    match CommandRunner::run(program, &args, Some(Duration::from_secs(60))).await {
        Ok(output) if output.status.success() => {}
        Ok(output) => {
            warn!(
                stderr = %String::from_utf8_lossy(&output.stderr),
                "Start action exited non-zero, polling anyway"
            );
        }
        Err(e) => {
            warn!(error = %e, "Start action failed to run, polling anyway");
        }
    }
    Ok(())
}
