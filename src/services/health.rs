//! Web UI 就绪等待
//!
//! 固定间隔 GET /health，任何非错误响应（状态码 < 400）即就绪。
//! 默认不设上限：首次运行时镜像拉取可能任意慢，有界的等待只会
//! 把慢网络变成假失败。需要硬上限时用 CHATSTACK_HEALTH_TIMEOUT_SECS。

use std::time::Duration;

use tracing::{debug, info};

use crate::config::StackConfig;
use crate::error::{BootstrapError, BootstrapResult};
use crate::infra::poll::{poll_until, PollOutcome};

/// 单次健康请求的超时
const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

/// 等待 Web UI 就绪
pub async fn wait_for_ui(config: &StackConfig) -> BootstrapResult<()> {
    let url = format!("http://127.0.0.1:{}/health", config.native_port);
    let client = reqwest::Client::builder()
        .timeout(REQUEST_TIMEOUT)
        .build()?;

    let interval = Duration::from_secs(config.health_poll_secs);
    let bound = config.health_timeout_secs.map(Duration::from_secs);

    info!(url = %url, interval_secs = config.health_poll_secs, "Waiting for web UI");

    let outcome = poll_until(
        || {
            let client = client.clone();
            let url = url.clone();
            async move { probe_once(&client, &url).await }
        },
        interval,
        bound,
    )
    .await;

    match outcome {
        PollOutcome::Ready { attempts } => {
            info!(attempts, "Web UI is healthy");
            Ok(())
        }
        PollOutcome::TimedOut { .. } => Err(BootstrapError::HealthCheckTimeout {
            // TimedOut 只在配了上限时可能出现
            waited_secs: config.health_timeout_secs.unwrap_or(0),
        }),
    }
}

/// 单次健康探测
async fn probe_once(client: &reqwest::Client, url: &str) -> bool {
    match client.get(url).send().await {
        Ok(response) => {
            let ready = is_ready(response.status().as_u16());
            if !ready {
                debug!(status = response.status().as_u16(), "Health endpoint not ready");
            }
            ready
        }
        Err(e) => {
            debug!(error = %e, "Health request failed");
            false
        }
    }
}

/// 就绪判定：任何非错误响应都算
fn is_ready(status: u16) -> bool {
    status < 400
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_error_statuses_are_ready() {
        assert!(is_ready(200));
        assert!(is_ready(204));
        // 重定向也算服务起来了
        assert!(is_ready(301));
    }

    #[test]
    fn test_error_statuses_are_not_ready() {
        assert!(!is_ready(404));
        assert!(!is_ready(500));
        assert!(!is_ready(502));
    }
}
