// ==========================================
// 违规目录对账工具 - 未匹配违规 CSV 报告
// ==========================================
// 表头: catalog_standard,violation_id,title,package_name,package_platform,task_id
// 规则: 每条未匹配违规一行,缺失字段写空; 运行结束时一次性覆盖写入
// ==========================================

use crate::domain::Violation;
use crate::report::error::{ReportWriteError, ReportWriteResult};
use csv::Writer;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;

/// 固定表头
pub const UNMATCHED_REPORT_HEADER: [&str; 6] = [
    "catalog_standard",
    "violation_id",
    "title",
    "package_name",
    "package_platform",
    "task_id",
];

// ==========================================
// UnmatchedReportWriter
// ==========================================
#[derive(Debug, Clone)]
pub struct UnmatchedReportWriter {
    path: PathBuf,
}

impl UnmatchedReportWriter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// 覆盖写入报告文件
    ///
    /// # 返回
    /// - Ok(usize): 写入的数据行数（不含表头）
    pub fn write(&self, violations: &[Violation]) -> ReportWriteResult<usize> {
        let file = File::create(&self.path).map_err(|source| ReportWriteError::Io {
            path: self.path.display().to_string(),
            source,
        })?;

        let rows = write_report(file, violations)?;
        info!(path = %self.path.display(), rows, "未匹配违规报告已写入");
        Ok(rows)
    }
}

/// 将未匹配违规以 CSV 写入任意输出
pub fn write_report<W: Write>(sink: W, violations: &[Violation]) -> ReportWriteResult<usize> {
    let mut writer = Writer::from_writer(sink);
    writer.write_record(UNMATCHED_REPORT_HEADER)?;

    for violation in violations {
        writer.write_record([
            violation.catalog_standard.as_deref().unwrap_or(""),
            violation.violation_id.as_deref().unwrap_or(""),
            violation.title.as_deref().unwrap_or(""),
            violation.package_name.as_deref().unwrap_or(""),
            violation.package_platform.as_deref().unwrap_or(""),
            violation.task_id.as_deref().unwrap_or(""),
        ])?;
    }

    writer.flush().map_err(csv::Error::from)?;
    Ok(violations.len())
}
