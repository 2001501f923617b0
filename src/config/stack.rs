//! 聊天栈配置
//!
//! 参数解析之后不可变，后续所有阶段只读。
//! CLI 只暴露 `-m/--model` 和 `--skip-docker-check`，
//! 运维相关的轮询策略通过环境变量覆盖。

use std::env;

/// 聊天栈配置
#[derive(Clone, Debug)]
pub struct StackConfig {
    /// 要预取的模型标签（`-m/--model` 覆盖）
    pub model_tag: String,
    /// 跳过 Docker 探测/安装/启动（`--skip-docker-check`）
    pub skip_environment_check: bool,
    /// Web UI 宿主机端口
    pub native_port: u16,
    /// Web UI 容器内端口
    pub internal_port: u16,
    /// 桌面应用名称
    pub app_name: String,
    /// 守护进程轮询间隔（秒）
    pub daemon_poll_secs: u64,
    /// 守护进程启动超时（秒），有界
    pub daemon_timeout_secs: u64,
    /// 健康检查轮询间隔（秒）
    pub health_poll_secs: u64,
    /// 健康检查超时（秒），默认不设上限（镜像拉取可能任意慢）
    pub health_timeout_secs: Option<u64>,
    /// compose 文件名（写入当前工作目录）
    pub compose_file: String,
}

impl StackConfig {
    /// 从环境变量加载配置，缺省值保持与历史脚本一致
    pub fn from_env() -> Self {
        let native_port = env::var("CHATSTACK_UI_PORT")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(3000);

        let app_name =
            env::var("CHATSTACK_APP_NAME").unwrap_or_else(|_| "ChatStack".to_string());

        let daemon_poll_secs = env::var("CHATSTACK_DAEMON_POLL_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(3);

        let daemon_timeout_secs = env::var("CHATSTACK_DAEMON_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(90);

        let health_poll_secs = env::var("CHATSTACK_HEALTH_POLL_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(2);

        let health_timeout_secs = env::var("CHATSTACK_HEALTH_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok());

        Self {
            model_tag: constants::DEFAULT_MODEL_TAG.to_string(),
            skip_environment_check: false,
            native_port,
            internal_port: 8080,
            app_name,
            daemon_poll_secs,
            daemon_timeout_secs,
            health_poll_secs,
            health_timeout_secs,
            compose_file: constants::DEFAULT_COMPOSE_FILE.to_string(),
        }
    }
}

/// 常量
pub mod constants {
    /// 默认预取的模型标签
    pub const DEFAULT_MODEL_TAG: &str = "llama3:8b";

    /// compose 文件名
    pub const DEFAULT_COMPOSE_FILE: &str = "docker-compose.yml";

    /// 模型服务名
    pub const MODEL_RUNTIME_SERVICE: &str = "model-runtime";

    /// Web UI 服务名
    pub const WEB_UI_SERVICE: &str = "web-chat-ui";

    /// 向量数据库服务名
    pub const VECTOR_DB_SERVICE: &str = "vector-database";

    /// 模型服务镜像
    pub const MODEL_RUNTIME_IMAGE: &str = "ollama/ollama:latest";

    /// Web UI 镜像
    pub const WEB_UI_IMAGE: &str = "ghcr.io/open-webui/open-webui:main";

    /// 向量数据库镜像
    pub const VECTOR_DB_IMAGE: &str = "chromadb/chroma:latest";

    /// 模型服务端口（宿主机与容器一致）
    pub const MODEL_RUNTIME_PORT: u16 = 11434;

    /// 向量数据库宿主机端口
    pub const VECTOR_DB_HOST_PORT: u16 = 8001;

    /// 向量数据库容器端口
    pub const VECTOR_DB_CONTAINER_PORT: u16 = 8000;

    /// 模型权重持久化卷
    pub const MODEL_VOLUME: &str = "ollama-models";

    /// 单次命令探测超时（秒），用于 `docker --version` / `docker info` 这类轻量查询
    pub const PROBE_COMMAND_TIMEOUT_SECS: u64 = 10;

    /// 版本号
    pub const VERSION: &str = env!("CARGO_PKG_VERSION");
}

#[cfg(test)]
mod tests {
    use super::*;

    // 默认值和覆盖放同一个测试里，避免并行用例争抢环境变量
    #[test]
    fn test_defaults_and_env_overrides() {
        env::remove_var("CHATSTACK_UI_PORT");
        env::remove_var("CHATSTACK_HEALTH_TIMEOUT_SECS");
        let config = StackConfig::from_env();
        assert_eq!(config.model_tag, "llama3:8b");
        assert!(!config.skip_environment_check);
        assert_eq!(config.native_port, 3000);
        assert_eq!(config.internal_port, 8080);
        assert_eq!(config.daemon_timeout_secs, 90);
        assert_eq!(config.health_poll_secs, 2);
        // 默认无上限：与历史行为保持一致
        assert!(config.health_timeout_secs.is_none());

        env::set_var("CHATSTACK_UI_PORT", "3001");
        env::set_var("CHATSTACK_HEALTH_TIMEOUT_SECS", "600");
        let config = StackConfig::from_env();
        assert_eq!(config.native_port, 3001);
        assert_eq!(config.health_timeout_secs, Some(600));
        env::remove_var("CHATSTACK_UI_PORT");
        env::remove_var("CHATSTACK_HEALTH_TIMEOUT_SECS");
    }
}
