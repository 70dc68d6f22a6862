// ==========================================
// 违规目录对账工具 - 跨项目违规报表
// ==========================================
// 职责: 报表任务状态、报表条目、版本索引
// 用途: 为命中模式的包解析具体违规版本
// ==========================================

use crate::domain::violation::scalar_as_string;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

// ==========================================
// ReportStatus - 报表任务状态
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportStatus {
    /// 生成中
    Pending,
    /// 已完成,可拉取
    Completed,
    /// 供应商侧生成失败（终止态）
    Failed,
    /// 其他未知状态,继续轮询
    Other(String),
}

impl ReportStatus {
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "pending" | "queued" | "running" | "in_progress" => ReportStatus::Pending,
            "completed" => ReportStatus::Completed,
            "failed" | "error" => ReportStatus::Failed,
            _ => ReportStatus::Other(raw.to_string()),
        }
    }

    pub fn is_completed(&self) -> bool {
        matches!(self, ReportStatus::Completed)
    }
}

impl fmt::Display for ReportStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReportStatus::Pending => write!(f, "pending"),
            ReportStatus::Completed => write!(f, "completed"),
            ReportStatus::Failed => write!(f, "failed"),
            ReportStatus::Other(s) => write!(f, "{}", s),
        }
    }
}

// ==========================================
// ReportJob - 报表任务（每次运行创建一次）
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportJob {
    pub report_id: String,
    pub status: ReportStatus,
}

impl ReportJob {
    pub fn new(report_id: impl Into<String>) -> Self {
        Self {
            report_id: report_id.into(),
            status: ReportStatus::Pending,
        }
    }
}

// ==========================================
// ReportEntry - 报表条目
// ==========================================
// 多条目可共享 (platform, package),对应不同违规版本
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportEntry {
    #[serde(default, deserialize_with = "scalar_as_string")]
    pub platform: Option<String>,
    #[serde(default, deserialize_with = "scalar_as_string")]
    pub violating_package: Option<String>,
    /// 版本可能以数字形式出现（如 `2`）
    #[serde(default, deserialize_with = "scalar_as_string")]
    pub violating_version: Option<String>,
}

impl ReportEntry {
    pub fn new(platform: &str, package: &str, version: &str) -> Self {
        Self {
            platform: Some(platform.to_string()),
            violating_package: Some(package.to_string()),
            violating_version: Some(version.to_string()),
        }
    }
}

/// 报表响应体: 裸数组或 `{"report": [...]}`
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ReportBody {
    Entries(Vec<ReportEntry>),
    Wrapped { report: Vec<ReportEntry> },
}

impl ReportBody {
    pub fn into_entries(self) -> Vec<ReportEntry> {
        match self {
            ReportBody::Entries(entries) => entries,
            ReportBody::Wrapped { report } => report,
        }
    }
}

// ==========================================
// ReportIndex - (platform, package) → 版本列表
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReportIndex {
    versions: HashMap<(String, String), Vec<String>>,
}

impl ReportIndex {
    /// 由报表条目构建索引
    ///
    /// # 说明
    /// - 缺少任一字段的条目被忽略
    /// - 同一键下版本去重,保持首次出现顺序
    pub fn from_entries<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = ReportEntry>,
    {
        let mut versions: HashMap<(String, String), Vec<String>> = HashMap::new();
        for entry in entries {
            let (Some(platform), Some(package), Some(version)) = (
                entry.platform,
                entry.violating_package,
                entry.violating_version,
            ) else {
                continue;
            };
            if package.is_empty() || version.is_empty() {
                continue;
            }
            let slot = versions.entry((platform, package)).or_default();
            if !slot.contains(&version) {
                slot.push(version);
            }
        }
        Self { versions }
    }

    /// 查询某包的全部违规版本
    ///
    /// # 返回
    /// - 非空: 需要按版本逐一提交覆写
    /// - 空: 无版本数据,调用方提交不带版本的覆写
    pub fn lookup(&self, platform: &str, package_name: &str) -> &[String] {
        self.versions
            .get(&(platform.to_string(), package_name.to_string()))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// 已索引的 (platform, package) 数量
    pub fn len(&self) -> usize {
        self.versions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.versions.is_empty()
    }
}
