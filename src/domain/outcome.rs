// ==========================================
// 违规目录对账工具 - 处理结果
// ==========================================
// 职责: 单元提交结果、逐条违规归类结果、整次运行汇总
// 说明: 跳过与重试耗尽均为显式结果,不再静默丢弃
// ==========================================

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::PathBuf;

/// 单个覆写提交单元的结果
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DispatchResult {
    pub succeeded: bool,
    /// 实际发出的请求次数（演练模式为 0）
    pub attempts: u32,
    /// 最后一次响应的 HTTP 状态（传输层异常时为 None）
    pub last_status: Option<u16>,
}

// ==========================================
// ViolationOutcome - 逐条违规归类
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ViolationOutcome {
    /// 命中模式,全部覆写提交成功
    Dispatched { submissions: usize, succeeded: usize },
    /// 未命中任何模式,写入审计报告
    Unmatched,
    /// 缺少 violation_id 或 package_name
    SkippedMissingFields,
    /// 命中模式,但至少一个提交重试耗尽
    DispatchExhausted { submissions: usize, failed: usize },
}

impl ViolationOutcome {
    /// 由同一违规的全部提交结果归并
    pub fn from_dispatch(results: &[DispatchResult]) -> Self {
        let submissions = results.len();
        let succeeded = results.iter().filter(|r| r.succeeded).count();
        if succeeded == submissions {
            ViolationOutcome::Dispatched {
                submissions,
                succeeded,
            }
        } else {
            ViolationOutcome::DispatchExhausted {
                submissions,
                failed: submissions - succeeded,
            }
        }
    }
}

/// 单条违规及其归类结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ViolationRecord {
    pub violation_id: Option<String>,
    pub package_name: Option<String>,
    pub outcome: ViolationOutcome,
}

// ==========================================
// RunSummary - 运行汇总
// ==========================================
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub run_id: String,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub total_violations: usize,
    pub failed_pages: Vec<u32>,
    pub override_submissions: usize,
    pub override_attempts: u32,
    pub report_path: PathBuf,
    pub outcomes: Vec<ViolationRecord>,
}

impl RunSummary {
    pub fn dispatched(&self) -> usize {
        self.count(|o| matches!(o, ViolationOutcome::Dispatched { .. }))
    }

    pub fn dispatch_exhausted(&self) -> usize {
        self.count(|o| matches!(o, ViolationOutcome::DispatchExhausted { .. }))
    }

    pub fn unmatched(&self) -> usize {
        self.count(|o| matches!(o, ViolationOutcome::Unmatched))
    }

    pub fn skipped_missing_fields(&self) -> usize {
        self.count(|o| matches!(o, ViolationOutcome::SkippedMissingFields))
    }

    /// 按 violation_id 查找归类结果
    pub fn outcome_of(&self, violation_id: &str) -> Option<&ViolationOutcome> {
        self.outcomes
            .iter()
            .find(|r| r.violation_id.as_deref() == Some(violation_id))
            .map(|r| &r.outcome)
    }

    fn count<F>(&self, pred: F) -> usize
    where
        F: Fn(&ViolationOutcome) -> bool,
    {
        self.outcomes.iter().filter(|r| pred(&r.outcome)).count()
    }
}
