//! ChatStack - 本地 LLM 聊天栈引导器
//!
//! 一次性、严格顺序的流水线：探测/修复容器环境 → 写 compose 定义 →
//! 拉起三个服务 → 等 Web UI 就绪 → 打包桌面应用 → 预取默认模型。
//! 每个阶段完整结束（含轮询）后才进入下一个，结束时打印阶段汇总。

pub mod config;
pub mod domain;
pub mod error;
pub mod infra;
pub mod services;

use std::future::Future;

use tracing::info;

use crate::config::StackConfig;
use crate::domain::stage::{self, BootstrapStage};
use crate::domain::BootstrapPlan;
use crate::error::{BootstrapError, BootstrapResult};
use crate::services::stack::ComposeCommand;
use crate::services::{daemon, desktop, health, install, prefetch, probe, stack};

/// 运行完整引导流水线
pub async fn run(config: StackConfig) -> BootstrapResult<()> {
    info!(
        version = config::constants::VERSION,
        model = %config.model_tag,
        ui_port = config.native_port,
        "ChatStack bootstrap starting"
    );

    let mut stages = vec![
        BootstrapStage::new("environment", "Environment Bootstrap"),
        BootstrapStage::new("compose_write", "Write Compose File"),
        BootstrapStage::new("stack_up", "Launch Stack"),
        BootstrapStage::new("health_wait", "Wait For Web UI"),
        BootstrapStage::new("desktop", "Package Desktop App"),
        BootstrapStage::new("model_prefetch", "Prefetch Model"),
    ];

    let result = execute(&config, &mut stages).await;
    stage::log_summary(&stages);

    if result.is_ok() {
        info!(
            url = %format!("http://localhost:{}", config.native_port),
            "ChatStack is ready"
        );
    }
    result
}

/// 按顺序执行各阶段，首个致命错误即中止
async fn execute(config: &StackConfig, stages: &mut [BootstrapStage]) -> BootstrapResult<()> {
    if config.skip_environment_check {
        stages[0].skip(Some("--skip-docker-check".to_string()));
        info!("Skipping environment check (--skip-docker-check)");
    } else {
        run_stage(&mut stages[0], || bootstrap_environment(config)).await?;
    }

    run_stage(&mut stages[1], || stack::write_compose_file(config)).await?;

    // compose 口味探测一次，启动与预取共用
    let compose = ComposeCommand::detect().await;
    info!(compose = compose.describe(), "Compose flavor detected");

    run_stage(&mut stages[2], || stack::launch_stack(compose, config)).await?;
    run_stage(&mut stages[3], || health::wait_for_ui(config)).await?;
    run_stage(&mut stages[4], || desktop::package_desktop_app(config)).await?;
    run_stage(&mut stages[5], || prefetch::prefetch_model(compose, config)).await?;

    Ok(())
}

/// 环境引导状态机：探测 → 按需安装 → 按需启动
///
/// 探测结果只算一次并据此定计划；只有 CLI 缺失才安装，
/// 守护进程停了只做启动。对已健康的环境是零动作。
async fn bootstrap_environment(config: &StackConfig) -> BootstrapResult<()> {
    let status = probe::probe_environment().await;
    let plan = BootstrapPlan::for_status(status);
    info!(status = status.as_str(), plan = ?plan, "Environment probed");

    if plan.needs_install() {
        install::install_runtime().await?;
    }
    if plan.needs_start() {
        daemon::ensure_daemon_running(config).await?;
    }
    Ok(())
}

/// 执行单个阶段并记录生命周期
async fn run_stage<F, Fut>(stage: &mut BootstrapStage, f: F) -> BootstrapResult<()>
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = BootstrapResult<()>>,
{
    info!(stage = %stage.name, "=== {} ===", stage.display_name);
    stage.start();
    match f().await {
        Ok(()) => {
            stage.finish(true, None);
            Ok(())
        }
        Err(e) => {
            stage.finish(false, Some(e.to_string()));
            Err(e)
        }
    }
}
