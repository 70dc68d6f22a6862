// ==========================================
// 违规目录对账工具 - 审计报告层
// ==========================================
// 职责: 输出未匹配任何模式的违规记录,供人工复核
// 格式: CSV（固定表头,每次运行覆盖写入）
// ==========================================

pub mod error;
pub mod unmatched_writer;

pub use error::{ReportWriteError, ReportWriteResult};
pub use unmatched_writer::{UnmatchedReportWriter, UNMATCHED_REPORT_HEADER};
