// ==========================================
// 违规目录对账工具 - 报表流水线
// ==========================================
// 状态机: Generate → Poll(固定间隔) → Fetch
// 限流: 生成与轮询不经 Governor（一次性、低频）; 拉取经 Governor
// 终止: 生成失败 / 供应商状态 failed / 轮询超限 / 拉取失败 → 中止运行
// ==========================================

use crate::client::VendorApi;
use crate::domain::{ReportIndex, ReportJob, ReportStatus};
use crate::engine::error::{ReconcileError, ReconcileResult};
use crate::engine::governor::Governor;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, instrument, warn};

// ==========================================
// ReportPipeline
// ==========================================
pub struct ReportPipeline {
    api: Arc<dyn VendorApi>,
    governor: Arc<Governor>,
    poll_interval: Duration,
    /// None = 无限轮询
    max_poll_attempts: Option<u32>,
}

impl ReportPipeline {
    /// 创建报表流水线
    ///
    /// # 参数
    /// - poll_interval: 状态轮询间隔
    /// - max_poll_attempts: 轮询次数上限（None 为不设上限）
    pub fn new(
        api: Arc<dyn VendorApi>,
        governor: Arc<Governor>,
        poll_interval: Duration,
        max_poll_attempts: Option<u32>,
    ) -> Self {
        Self {
            api,
            governor,
            poll_interval,
            max_poll_attempts,
        }
    }

    /// 执行完整流水线并构建版本索引
    #[instrument(skip(self))]
    pub async fn run(&self) -> ReconcileResult<ReportIndex> {
        let mut job = self.generate().await?;
        self.wait_until_completed(&mut job).await?;
        self.fetch_index(&job).await
    }

    /// 请求生成报表
    pub async fn generate(&self) -> ReconcileResult<ReportJob> {
        match self.api.generate_report().await {
            Ok(job) => {
                info!(report_id = %job.report_id, "报表生成请求已受理");
                Ok(job)
            }
            Err(e) => {
                error!(error = %e, status = ?e.status(), "报表生成请求失败");
                Err(ReconcileError::ReportGeneration(e))
            }
        }
    }

    /// 轮询直至报表完成
    ///
    /// # 说明
    /// - 单次状态查询失败记录告警,计为一次尝试后继续
    /// - 未知状态视同进行中
    pub async fn wait_until_completed(&self, job: &mut ReportJob) -> ReconcileResult<()> {
        let mut attempts: u32 = 0;
        loop {
            attempts += 1;
            match self.api.report_status(&job.report_id).await {
                Ok(status) => {
                    debug!(report_id = %job.report_id, attempt = attempts, status = %status, "报表状态");
                    job.status = status;
                }
                Err(e) => {
                    warn!(report_id = %job.report_id, attempt = attempts, error = %e, "报表状态查询失败");
                }
            }

            match job.status {
                ReportStatus::Completed => {
                    info!(report_id = %job.report_id, attempts, "报表生成完成");
                    return Ok(());
                }
                ReportStatus::Failed => {
                    error!(report_id = %job.report_id, "供应商报告报表生成失败");
                    return Err(ReconcileError::ReportFailed {
                        report_id: job.report_id.clone(),
                    });
                }
                ReportStatus::Pending | ReportStatus::Other(_) => {}
            }

            if let Some(limit) = self.max_poll_attempts {
                if attempts >= limit {
                    error!(report_id = %job.report_id, attempts, "报表轮询超出上限");
                    return Err(ReconcileError::PollExhausted {
                        report_id: job.report_id.clone(),
                        attempts,
                    });
                }
            }

            tokio::time::sleep(self.poll_interval).await;
        }
    }

    /// 拉取已完成报表并构建 (platform, package) → 版本 索引
    pub async fn fetch_index(&self, job: &ReportJob) -> ReconcileResult<ReportIndex> {
        let entries = self
            .governor
            .call(self.api.fetch_report(&job.report_id))
            .await
            .map_err(|e| {
                error!(report_id = %job.report_id, error = %e, status = ?e.status(), "报表内容拉取失败");
                ReconcileError::ReportFetch(e)
            })?;

        let total_entries = entries.len();
        let index = ReportIndex::from_entries(entries);
        info!(
            report_id = %job.report_id,
            entries = total_entries,
            packages = index.len(),
            "报表内容拉取完成"
        );
        Ok(index)
    }
}
