// ==========================================
// 违规目录对账工具 - 供应商 API Trait
// ==========================================
// 职责: 定义供应商接口（不包含实现）
// 实现者: HttpVendorClient（生产）, 测试中的脚本化替身
// ==========================================

use crate::client::error::ClientResult;
use crate::domain::{OverrideRequest, ReportEntry, ReportJob, ReportStatus, ViolationPage};
use async_trait::async_trait;

// ==========================================
// VendorApi Trait
// ==========================================
// 说明: 非预期状态码统一以 ClientError::UnexpectedStatus 返回,
//       限流由调用方（Governor）负责,实现者不做节流
#[async_trait]
pub trait VendorApi: Send + Sync {
    /// 拉取违规列表
    ///
    /// # 参数
    /// - page: None 为不分页请求（用于获知 total_pages）,Some(n) 为第 n 页
    ///
    /// # 返回
    /// - Ok(ViolationPage): 状态 200
    async fn fetch_violation_page(&self, page: Option<u32>) -> ClientResult<ViolationPage>;

    /// 请求生成跨项目违规报表
    ///
    /// # 返回
    /// - Ok(ReportJob): 状态 200 且响应含 report_id
    async fn generate_report(&self) -> ClientResult<ReportJob>;

    /// 查询报表生成状态
    async fn report_status(&self, report_id: &str) -> ClientResult<ReportStatus>;

    /// 拉取已完成的报表内容
    async fn fetch_report(&self, report_id: &str) -> ClientResult<Vec<ReportEntry>>;

    /// 提交单个覆写
    ///
    /// # 返回
    /// - Ok(()): 状态 201
    /// - Err: 其他状态或传输层异常
    async fn post_override(&self, request: &OverrideRequest) -> ClientResult<()>;
}
