// ==========================================
// 违规目录对账工具 - 领域模型层
// ==========================================
// 职责: 定义违规记录、报表、覆写请求与处理结果
// 红线: 不含网络访问逻辑,不含编排逻辑
// ==========================================

pub mod outcome;
pub mod override_request;
pub mod report;
pub mod violation;

// 重导出核心类型
pub use outcome::{DispatchResult, RunSummary, ViolationOutcome, ViolationRecord};
pub use override_request::{OverrideRequest, OverrideStatus};
pub use report::{ReportBody, ReportEntry, ReportIndex, ReportJob, ReportStatus};
pub use violation::{Violation, ViolationPage};
