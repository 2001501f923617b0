//! 固定间隔轮询
//!
//! 系统里唯一的重试原语：探测、睡眠、再探测，不做退避。
//! 守护进程等待（有界）和健康检查（默认无界）都走这一个函数。

use std::future::Future;
use std::time::Duration;

/// 轮询结果
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PollOutcome {
    /// 探测成功
    Ready {
        /// 总探测次数（含成功那次）
        attempts: u32,
    },
    /// 超出边界仍未成功
    TimedOut {
        /// 总探测次数
        attempts: u32,
        /// 实际等待时长
        waited: Duration,
    },
}

/// 固定间隔轮询直到探测成功或超出边界
///
/// `bound` 为 None 时无限轮询，只在首次探测成功时返回。
/// 首次探测立即执行，之后每次失败睡一个 `interval` 再试；
/// 累计睡眠时间一旦要越过 `bound` 就放弃，保证不超过配置的超时。
pub async fn poll_until<F, Fut>(
    mut probe: F,
    interval: Duration,
    bound: Option<Duration>,
) -> PollOutcome
where
    F: FnMut() -> Fut,
    Fut: Future<Output = bool>,
{
    let mut attempts: u32 = 0;
    let mut waited = Duration::ZERO;

    loop {
        attempts += 1;
        if probe().await {
            return PollOutcome::Ready { attempts };
        }

        if let Some(bound) = bound {
            if waited + interval > bound {
                return PollOutcome::TimedOut { attempts, waited };
            }
        }

        tokio::time::sleep(interval).await;
        waited += interval;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[tokio::test]
    async fn test_first_success_terminates() {
        let outcome = poll_until(|| async { true }, Duration::from_millis(1), None).await;
        assert_eq!(outcome, PollOutcome::Ready { attempts: 1 });
    }

    #[tokio::test]
    async fn test_fails_n_times_then_succeeds_probes_exactly_n_plus_one() {
        let calls = AtomicU32::new(0);
        let outcome = poll_until(
            || {
                let n = calls.fetch_add(1, Ordering::SeqCst);
                async move { n >= 4 }
            },
            Duration::from_millis(1),
            None,
        )
        .await;

        // 失败 4 次后第 5 次成功：恰好 N+1 次探测
        assert_eq!(outcome, PollOutcome::Ready { attempts: 5 });
        assert_eq!(calls.load(Ordering::SeqCst), 5);
    }

    #[tokio::test]
    async fn test_bounded_poll_times_out() {
        let calls = AtomicU32::new(0);
        let outcome = poll_until(
            || {
                calls.fetch_add(1, Ordering::SeqCst);
                async { false }
            },
            Duration::from_millis(2),
            Some(Duration::from_millis(7)),
        )
        .await;

        match outcome {
            PollOutcome::TimedOut { attempts, waited } => {
                // 不会超过配置的边界
                assert!(waited <= Duration::from_millis(7));
                assert_eq!(attempts, calls.load(Ordering::SeqCst));
            }
            other => panic!("expected timeout, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_bounded_poll_succeeds_within_bound() {
        let calls = AtomicU32::new(0);
        let outcome = poll_until(
            || {
                let n = calls.fetch_add(1, Ordering::SeqCst);
                async move { n >= 1 }
            },
            Duration::from_millis(1),
            Some(Duration::from_secs(1)),
        )
        .await;

        assert_eq!(outcome, PollOutcome::Ready { attempts: 2 });
    }

    #[tokio::test]
    async fn test_zero_bound_gives_single_probe() {
        let outcome = poll_until(
            || async { false },
            Duration::from_millis(5),
            Some(Duration::ZERO),
        )
        .await;

        assert_eq!(
            outcome,
            PollOutcome::TimedOut {
                attempts: 1,
                waited: Duration::ZERO
            }
        );
    }
}
