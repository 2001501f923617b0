//! 引导阶段记录
//!
//! 每个流水线阶段记录开始/结束时间、耗时与结果，结束时打印汇总表。

use chrono::{DateTime, Utc};
use serde::Serialize;

/// 阶段状态
#[derive(Clone, Debug, Serialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum StageStatus {
    Pending,
    Running,
    Success,
    Failed,
    Skipped,
}

/// 引导阶段信息
#[derive(Clone, Debug, Serialize)]
pub struct BootstrapStage {
    /// 阶段标识 (e.g., "environment", "stack_up")
    pub name: String,
    /// 显示名称 (e.g., "Environment Bootstrap")
    pub display_name: String,
    /// 开始时间
    pub started_at: Option<DateTime<Utc>>,
    /// 结束时间
    pub finished_at: Option<DateTime<Utc>>,
    /// 持续时间（毫秒）
    pub duration_ms: Option<i64>,
    /// 阶段状态
    pub status: StageStatus,
    /// 附加信息
    pub message: Option<String>,
}

impl BootstrapStage {
    /// 创建新的待执行阶段
    pub fn new(name: &str, display_name: &str) -> Self {
        Self {
            name: name.to_string(),
            display_name: display_name.to_string(),
            started_at: None,
            finished_at: None,
            duration_ms: None,
            status: StageStatus::Pending,
            message: None,
        }
    }

    /// 开始执行阶段
    pub fn start(&mut self) {
        self.started_at = Some(Utc::now());
        self.status = StageStatus::Running;
    }

    /// 完成阶段
    pub fn finish(&mut self, success: bool, message: Option<String>) {
        let now = Utc::now();
        self.finished_at = Some(now);
        self.status = if success {
            StageStatus::Success
        } else {
            StageStatus::Failed
        };
        self.message = message;
        if let Some(started) = self.started_at {
            self.duration_ms = Some((now - started).num_milliseconds());
        }
    }

    /// 跳过阶段
    pub fn skip(&mut self, reason: Option<String>) {
        self.status = StageStatus::Skipped;
        self.message = reason;
    }
}

/// 打印阶段汇总表
pub fn log_summary(stages: &[BootstrapStage]) {
    tracing::info!("=== Stage Summary ===");
    for stage in stages {
        let duration = stage
            .duration_ms
            .map(|d| format!("{}ms", d))
            .unwrap_or_else(|| "-".to_string());
        let status_icon = match stage.status {
            StageStatus::Success => "✓",
            StageStatus::Failed => "✗",
            StageStatus::Skipped => "⊘",
            StageStatus::Running => "⟳",
            StageStatus::Pending => "○",
        };
        tracing::info!("{} {} ({})", status_icon, stage.display_name, duration);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_lifecycle() {
        let mut stage = BootstrapStage::new("environment", "Environment Bootstrap");
        assert_eq!(stage.status, StageStatus::Pending);

        stage.start();
        assert_eq!(stage.status, StageStatus::Running);
        assert!(stage.started_at.is_some());

        stage.finish(true, None);
        assert_eq!(stage.status, StageStatus::Success);
        assert!(stage.finished_at.is_some());
        assert!(stage.duration_ms.is_some());
    }

    #[test]
    fn test_stage_failure_keeps_message() {
        let mut stage = BootstrapStage::new("stack_up", "Launch Stack");
        stage.start();
        stage.finish(false, Some("compose up failed".to_string()));
        assert_eq!(stage.status, StageStatus::Failed);
        assert_eq!(stage.message.as_deref(), Some("compose up failed"));
    }

    #[test]
    fn test_stage_skip() {
        let mut stage = BootstrapStage::new("environment", "Environment Bootstrap");
        stage.skip(Some("--skip-docker-check".to_string()));
        assert_eq!(stage.status, StageStatus::Skipped);
        assert!(stage.started_at.is_none());
    }
}
