// ==========================================
// 违规目录对账工具 - 引擎层
// ==========================================
// 职责: 模式匹配、限流、分页拉取、报表流水线、覆写提交、编排
// 红线: 引擎不直接拼 URL / 不直接发 HTTP,一律经 VendorApi
// ==========================================

pub mod error;
pub mod governor;
pub mod orchestrator;
pub mod override_dispatcher;
pub mod pattern_matcher;
pub mod report_pipeline;
pub mod violation_fetcher;

// 重导出核心引擎
pub use error::{ReconcileError, ReconcileResult};
pub use governor::{Governor, GovernorPermit};
pub use orchestrator::{classify, Classification, Orchestrator};
pub use override_dispatcher::OverrideDispatcher;
pub use pattern_matcher::PatternSet;
pub use report_pipeline::ReportPipeline;
pub use violation_fetcher::{FetchedViolations, ViolationFetcher};
