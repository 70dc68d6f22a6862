// ==========================================
// 违规目录对账工具 - 编排层错误类型
// ==========================================
// 范围: 中止整次运行的错误（不写报告、不提交覆写）
// 工具: thiserror 派生宏
// ==========================================

use crate::client::ClientError;
use crate::report::ReportWriteError;
use thiserror::Error;

/// 运行中止错误
#[derive(Error, Debug)]
pub enum ReconcileError {
    #[error("报表生成请求失败: {0}")]
    ReportGeneration(#[source] ClientError),

    #[error("报表生成失败（供应商状态 failed）: report_id={report_id}")]
    ReportFailed { report_id: String },

    #[error("报表轮询超出上限: report_id={report_id}, attempts={attempts}")]
    PollExhausted { report_id: String, attempts: u32 },

    #[error("报表内容拉取失败: {0}")]
    ReportFetch(#[source] ClientError),

    #[error("未拉取到任何违规记录")]
    NoViolations,

    #[error("未匹配报告写入失败: {0}")]
    ReportWrite(#[from] ReportWriteError),
}

/// Result 类型别名
pub type ReconcileResult<T> = Result<T, ReconcileError>;
