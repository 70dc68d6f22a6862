// ==========================================
// 违规目录对账工具 - 核心库
// ==========================================
// 技术栈: Tokio + reqwest + CSV
// 系统定位: 批量对账工具（单次运行,无持久状态）
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 违规/报表/覆写/结果
pub mod domain;

// 供应商 API 层
pub mod client;

// 引擎层 - 匹配/限流/拉取/提交/编排
pub mod engine;

// 审计报告层
pub mod report;

// 配置层 - 运行参数
pub mod config;

// 日志系统
pub mod logging;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域实体
pub use domain::{
    DispatchResult, OverrideRequest, OverrideStatus, ReportEntry, ReportIndex, ReportJob,
    ReportStatus, RunSummary, Violation, ViolationOutcome,
};

// 供应商 API
pub use client::{ClientError, HttpVendorClient, VendorApi};

// 引擎
pub use engine::{
    Governor, Orchestrator, OverrideDispatcher, PatternSet, ReconcileError, ReportPipeline,
    ViolationFetcher,
};

// 配置
pub use config::{ApiCredential, ReconcileSettings};

// 报告
pub use report::UnmatchedReportWriter;

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "violation-reconciler";
