// ==========================================
// 违规目录对账工具 - 审计报告错误类型
// ==========================================
// 工具: thiserror 派生宏
// ==========================================

use thiserror::Error;

/// 报告写入错误类型
#[derive(Error, Debug)]
pub enum ReportWriteError {
    #[error("文件写入失败 ({path}): {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV 写入失败: {0}")]
    Csv(#[from] csv::Error),
}

/// Result 类型别名
pub type ReportWriteResult<T> = Result<T, ReportWriteError>;
