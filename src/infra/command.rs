//! 命令执行器
//!
//! 提供统一的命令执行接口，支持：
//! - 实时日志流式输出（用于 compose pull 这类长耗时命令）
//! - 可选超时控制
//! - stdout/stderr 分离

use std::process::{ExitStatus, Output, Stdio};
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command;
use tracing::error;

/// 命令执行器
pub struct CommandRunner;

/// 命令执行错误
#[derive(Debug)]
pub enum CommandError {
    /// 命令启动失败
    SpawnFailed(std::io::Error),
    /// 命令超时
    Timeout,
    /// 等待命令完成失败
    WaitFailed(std::io::Error),
}

impl std::fmt::Display for CommandError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CommandError::SpawnFailed(e) => write!(f, "Failed to spawn command: {}", e),
            CommandError::Timeout => write!(f, "Command timed out"),
            CommandError::WaitFailed(e) => write!(f, "Failed to wait for command: {}", e),
        }
    }
}

impl std::error::Error for CommandError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CommandError::SpawnFailed(e) | CommandError::WaitFailed(e) => Some(e),
            _ => None,
        }
    }
}

/// 命令执行结果
pub struct CommandResult {
    /// 退出状态
    pub status: ExitStatus,
    /// 是否因超时而终止
    pub timed_out: bool,
}

impl CommandRunner {
    /// 执行简单命令（无流式输出）
    ///
    /// 用于轻量探测场景（如 `docker --version`、`docker info`）
    pub async fn run(
        program: &str,
        args: &[&str],
        timeout: Option<Duration>,
    ) -> Result<Output, CommandError> {
        let child = Command::new(program).args(args).output();

        match timeout {
            Some(limit) => {
                tokio::select! {
                    result = child => {
                        result.map_err(CommandError::SpawnFailed)
                    }
                    _ = tokio::time::sleep(limit) => {
                        Err(CommandError::Timeout)
                    }
                }
            }
            None => child.await.map_err(CommandError::SpawnFailed),
        }
    }

    /// 执行命令并把输出逐行写入日志
    ///
    /// # Arguments
    /// * `program` - 要执行的程序
    /// * `args` - 命令行参数
    /// * `timeout` - 超时时间，None 表示不设限（镜像拉取可能任意慢）
    pub async fn run_streamed(
        program: &str,
        args: &[&str],
        timeout: Option<Duration>,
    ) -> Result<CommandResult, CommandError> {
        let mut child = Command::new(program)
            .args(args)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(CommandError::SpawnFailed)?;

        let stdout = child.stdout.take();
        let stderr = child.stderr.take();

        // 启动 stdout 读取任务
        let stdout_tag = program.to_string();
        let stdout_task = tokio::spawn(async move {
            if let Some(stdout) = stdout {
                let reader = BufReader::new(stdout);
                let mut lines = reader.lines();
                while let Ok(Some(line)) = lines.next_line().await {
                    tracing::info!(command = %stdout_tag, "{}", line);
                }
            }
        });

        // 启动 stderr 读取任务
        // compose/nativefier 的进度信息通常走 stderr，仍按 info 记录
        let stderr_tag = program.to_string();
        let stderr_task = tokio::spawn(async move {
            if let Some(stderr) = stderr {
                let reader = BufReader::new(stderr);
                let mut lines = reader.lines();
                while let Ok(Some(line)) = lines.next_line().await {
                    tracing::info!(command = %stderr_tag, stream = "stderr", "{}", line);
                }
            }
        });

        // 等待命令完成，支持超时
        let result = match timeout {
            Some(limit) => {
                tokio::select! {
                    _ = tokio::time::sleep(limit) => {
                        error!("Command timed out after {:?}", limit);
                        let _ = child.kill().await;
                        // 等待进程实际终止
                        let status = child.wait().await.map_err(CommandError::WaitFailed)?;
                        Ok(CommandResult { status, timed_out: true })
                    }
                    status = child.wait() => {
                        let status = status.map_err(CommandError::WaitFailed)?;
                        Ok(CommandResult { status, timed_out: false })
                    }
                }
            }
            None => {
                let status = child.wait().await.map_err(CommandError::WaitFailed)?;
                Ok(CommandResult {
                    status,
                    timed_out: false,
                })
            }
        };

        // 等待日志读取完成
        let _ = stdout_task.await;
        let _ = stderr_task.await;

        result
    }
}

/// 探测某个二进制是否在 PATH 上
pub async fn which(program: &str) -> bool {
    Command::new("which")
        .arg(program)
        .output()
        .await
        .map(|o| o.status.success())
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_run_success() {
        let result =
            CommandRunner::run("echo", &["hello"], Some(Duration::from_secs(5))).await;

        assert!(result.is_ok());
        let output = result.unwrap();
        assert!(output.status.success());
        assert!(String::from_utf8_lossy(&output.stdout).contains("hello"));
    }

    #[tokio::test]
    async fn test_run_not_found() {
        let result = CommandRunner::run(
            "nonexistent_command_12345",
            &[],
            Some(Duration::from_secs(5)),
        )
        .await;

        assert!(matches!(result, Err(CommandError::SpawnFailed(_))));
    }

    #[tokio::test]
    async fn test_run_streamed_reports_exit_status() {
        let result = CommandRunner::run_streamed("true", &[], None).await.unwrap();
        assert!(result.status.success());
        assert!(!result.timed_out);

        let result = CommandRunner::run_streamed("false", &[], None).await.unwrap();
        assert!(!result.status.success());
    }

    #[tokio::test]
    async fn test_which() {
        assert!(which("sh").await);
        assert!(!which("nonexistent_command_12345").await);
    }
}
