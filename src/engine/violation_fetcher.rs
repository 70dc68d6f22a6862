// ==========================================
// 违规目录对账工具 - 分页拉取器
// ==========================================
// 协议:
// 1. 不分页请求一次,从响应体获知 total_pages
// 2. 从 total_pages 倒序逐页请求至第 1 页,每页经 Governor 准入
// 顺序: 结果按页倒序累积（非 violation_id 顺序）,此为约定行为
// 失败: 单页失败记录后跳过; 首个不分页请求失败则整体返回空
// ==========================================

use crate::client::VendorApi;
use crate::domain::Violation;
use crate::engine::governor::Governor;
use std::sync::Arc;
use tracing::{error, info, instrument, warn};

/// 一次完整拉取的结果
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FetchedViolations {
    pub violations: Vec<Violation>,
    pub total_pages: u32,
    /// 失败被跳过的页码（按请求顺序）
    pub failed_pages: Vec<u32>,
}

// ==========================================
// ViolationFetcher
// ==========================================
pub struct ViolationFetcher {
    api: Arc<dyn VendorApi>,
    governor: Arc<Governor>,
}

impl ViolationFetcher {
    pub fn new(api: Arc<dyn VendorApi>, governor: Arc<Governor>) -> Self {
        Self { api, governor }
    }

    /// 拉取全部违规记录
    pub async fn fetch_all_violations(&self) -> Vec<Violation> {
        self.fetch().await.violations
    }

    /// 拉取全部违规记录（附带分页统计）
    #[instrument(skip(self))]
    pub async fn fetch(&self) -> FetchedViolations {
        let first = match self
            .governor
            .call(self.api.fetch_violation_page(None))
            .await
        {
            Ok(page) => page,
            Err(e) => {
                error!(error = %e, status = ?e.status(), "首次违规列表请求失败");
                return FetchedViolations::default();
            }
        };

        let total_pages = first.total_pages;
        info!(total_pages, "开始分页拉取违规列表");

        let mut result = FetchedViolations {
            total_pages,
            ..FetchedViolations::default()
        };

        // 严格倒序、串行: 上一页完成后才发起下一页
        for page in (1..=total_pages).rev() {
            match self
                .governor
                .call(self.api.fetch_violation_page(Some(page)))
                .await
            {
                Ok(data) => {
                    info!(page, count = data.results.len(), "分页拉取完成");
                    result.violations.extend(data.results);
                }
                Err(e) => {
                    warn!(page, error = %e, status = ?e.status(), "分页拉取失败,已跳过");
                    result.failed_pages.push(page);
                }
            }
        }

        info!(
            total = result.violations.len(),
            failed_pages = result.failed_pages.len(),
            "违规列表拉取完成"
        );
        result
    }
}
