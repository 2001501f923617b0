//! 容器运行时安装
//!
//! 只在 Prober 报告 CLI 缺失时被调用。安装命令全部幂等
//! （包管理器对已安装视为成功，统一 -y 免交互），重复运行安全。

use std::env;
use std::time::Duration;

use tracing::{info, warn};

use crate::domain::platform::{self, OsFamily};
use crate::error::{BootstrapError, BootstrapResult};
use crate::infra::command::{self, CommandRunner};

/// 旧安装方式可能留下的命令残片，换包管理器安装前先清掉
const STALE_SHIMS: &[&str] = &["/usr/local/bin/docker-compose", "/usr/local/bin/docker"];

/// 单条安装命令的超时：apt/dnf 下载可能较慢，给足余量
const INSTALL_COMMAND_TIMEOUT: Duration = Duration::from_secs(900);

/// 安装容器运行时与 compose 插件
pub async fn install_runtime() -> BootstrapResult<()> {
    let os = OsFamily::current()
        .ok_or_else(|| BootstrapError::UnsupportedPlatform(env::consts::OS.to_string()))?;

    if os == OsFamily::Windows {
        // Windows 不走包管理器安装，提示手动装 Docker Desktop
        return Err(BootstrapError::UnsupportedPlatform(
            "windows (install Docker Desktop manually, then re-run)".to_string(),
        ));
    }

    // 先收集实际可用的包管理器，再查静态策略表
    let mut present: Vec<&'static str> = Vec::new();
    for strategy in platform::INSTALL_STRATEGIES {
        if strategy.os == os && command::which(strategy.package_manager).await {
            present.push(strategy.package_manager);
        }
    }

    let strategy = platform::select_strategy(os, |pm| present.contains(&pm))
        .ok_or(BootstrapError::NoPackageManager)?;

    info!(
        os = os.as_str(),
        package_manager = strategy.package_manager,
        "Installing container runtime"
    );

    if os == OsFamily::Linux {
        remove_stale_shims().await;
    }

    let root = platform::is_root();
    for cmd in strategy.commands {
        let (program, args) = platform::elevate(os, root, cmd);
        info!(">>> {} {}", program, args.join(" "));

        let result =
            CommandRunner::run_streamed(program, &args, Some(INSTALL_COMMAND_TIMEOUT)).await?;
        if !result.status.success() {
            return Err(BootstrapError::command_failed(
                cmd[0],
                format!("exit code {}", result.status.code().unwrap_or(-1)),
            ));
        }
    }

    if os == OsFamily::Linux {
        post_install_linux(root).await;
    }

    info!("Container runtime installed");
    Ok(())
}

/// 清理上一种安装方式留下的命令残片
///
/// 失败只记 warn：真正的冲突会在安装那一步自己暴露出来。
async fn remove_stale_shims() {
    let root = platform::is_root();
    for &shim in STALE_SHIMS {
        let (program, args) = platform::elevate(OsFamily::Linux, root, &["rm", "-f", shim]);
        match CommandRunner::run(program, &args, Some(Duration::from_secs(30))).await {
            Ok(output) if output.status.success() => {}
            Ok(output) => {
                warn!(
                    shim,
                    stderr = %String::from_utf8_lossy(&output.stderr),
                    "Failed to remove stale shim, continuing"
                );
            }
            Err(e) => {
                warn!(shim, error = %e, "Failed to remove stale shim, continuing");
            }
        }
    }
}

/// Linux 安装后的收尾动作，全部尽力而为
async fn post_install_linux(root: bool) {
    // 开机自启
    let (program, args) = platform::elevate(OsFamily::Linux, root, &["systemctl", "enable", "docker"]);
    if let Err(e) = CommandRunner::run(program, &args, Some(Duration::from_secs(30))).await {
        warn!(error = %e, "Failed to enable docker service, continuing");
    }

    // 把当前用户加进 docker 组，下次登录免 sudo
    if let Ok(user) = env::var("USER") {
        let (program, args) =
            platform::elevate(OsFamily::Linux, root, &["usermod", "-aG", "docker", &user]);
        match CommandRunner::run(program, &args, Some(Duration::from_secs(30))).await {
            Ok(output) if output.status.success() => {
                info!(user = %user, "Added user to docker group");
            }
            _ => {
                warn!(user = %user, "Failed to add user to docker group, continuing");
            }
        }
    }
}
