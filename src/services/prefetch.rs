//! 默认模型预取
//!
//! 在跑起来的模型服务容器里执行一次 `ollama pull`，
//! 让首次对话不用等模型下载。

use tracing::info;

use crate::config::{constants, StackConfig};
use crate::error::{BootstrapError, BootstrapResult};
use crate::infra::command::CommandRunner;
use crate::services::stack::ComposeCommand;

/// 拉取默认模型
pub async fn prefetch_model(compose: ComposeCommand, config: &StackConfig) -> BootstrapResult<()> {
    let tail = pull_tail(&config.compose_file, &config.model_tag);
    let (program, args) = compose.command_line(&tail);

    info!(model = %config.model_tag, ">>> {} {}", program, args.join(" "));

    // 模型动辄几个 GB，不设超时
    let result = CommandRunner::run_streamed(program, &args, None).await?;
    if !result.status.success() {
        return Err(BootstrapError::command_failed(
            "ollama pull",
            format!("exit code {}", result.status.code().unwrap_or(-1)),
        ));
    }

    info!(model = %config.model_tag, "Model prefetched");
    Ok(())
}

/// compose 后缀参数：`-f <file> exec -T model-runtime ollama pull <tag>`
fn pull_tail<'a>(compose_file: &'a str, model_tag: &'a str) -> Vec<&'a str> {
    vec![
        "-f",
        compose_file,
        "exec",
        "-T",
        constants::MODEL_RUNTIME_SERVICE,
        "ollama",
        "pull",
        model_tag,
    ]
}
