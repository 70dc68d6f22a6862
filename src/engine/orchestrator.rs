// ==========================================
// 违规目录对账工具 - 对账编排器
// ==========================================
// 流程: 生成报表 → 轮询完成 → 拉取报表 → 拉取违规 → 归类 → 并发提交覆写 → 写未匹配报告
// 并发: 全部覆写单元一次性发起（受 Governor 约束）,全部结束后才写报告
// ==========================================

use crate::client::VendorApi;
use crate::config::ReconcileSettings;
use crate::domain::{
    DispatchResult, OverrideRequest, OverrideStatus, ReportIndex, RunSummary, Violation,
    ViolationOutcome, ViolationRecord,
};
use crate::engine::error::{ReconcileError, ReconcileResult};
use crate::engine::governor::Governor;
use crate::engine::override_dispatcher::OverrideDispatcher;
use crate::engine::pattern_matcher::PatternSet;
use crate::engine::report_pipeline::ReportPipeline;
use crate::engine::violation_fetcher::ViolationFetcher;
use crate::report::UnmatchedReportWriter;
use chrono::Utc;
use futures::future::join_all;
use std::sync::Arc;
use tracing::{debug, error, info, instrument};
use uuid::Uuid;

// ==========================================
// Classification - 单条违规的归类
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    /// 缺少 violation_id 或 package_name
    MissingFields,
    /// 未命中任何模式
    Unmatched,
    /// 命中模式,附扇出后的覆写请求
    Matched(Vec<OverrideRequest>),
}

/// 归类单条违规
///
/// # 参数
/// - patterns: 包名模式集
/// - index: 报表版本索引（用于扇出）
/// - status / note: 覆写决策与备注
pub fn classify(
    violation: &Violation,
    patterns: &PatternSet,
    index: &ReportIndex,
    status: OverrideStatus,
    note: &str,
) -> Classification {
    let Some((violation_id, package_name)) = violation.required_fields() else {
        return Classification::MissingFields;
    };

    if !patterns.matches(package_name) {
        return Classification::Unmatched;
    }

    let platform = violation.platform();
    let versions = index.lookup(platform, package_name);
    Classification::Matched(OverrideRequest::fan_out(
        violation_id,
        package_name,
        platform,
        versions,
        status,
        note,
    ))
}

// ==========================================
// Orchestrator
// ==========================================
pub struct Orchestrator {
    patterns: PatternSet,
    pipeline: ReportPipeline,
    fetcher: ViolationFetcher,
    dispatcher: OverrideDispatcher,
    writer: UnmatchedReportWriter,
    override_status: OverrideStatus,
    override_note: String,
}

impl Orchestrator {
    /// 创建编排器（Governor 在此构造并注入各组件）
    ///
    /// # 参数
    /// - api: 供应商 API（全组件共享）
    /// - patterns: 启动时加载的模式集
    /// - settings: 运行参数
    pub fn new(api: Arc<dyn VendorApi>, patterns: PatternSet, settings: &ReconcileSettings) -> Self {
        let governor = Arc::new(Governor::with_interval(
            settings.concurrency_limit,
            settings.request_interval(),
        ));

        Self {
            pipeline: ReportPipeline::new(
                api.clone(),
                governor.clone(),
                settings.report_poll_interval,
                settings.poll_attempt_limit(),
            ),
            fetcher: ViolationFetcher::new(api.clone(), governor.clone()),
            dispatcher: OverrideDispatcher::new(
                api,
                governor,
                settings.max_retries,
                settings.retry_backoff_base,
                settings.dry_run,
            ),
            writer: UnmatchedReportWriter::new(settings.output_path.clone()),
            override_status: settings.override_status,
            override_note: settings.override_note.clone(),
            patterns,
        }
    }

    /// 执行一次完整对账
    ///
    /// # 返回
    /// - Ok(RunSummary): 运行汇总（含逐条归类结果）
    /// - Err: 中止运行的错误（此时不写报告、不提交覆写）
    #[instrument(skip(self), fields(run_id = tracing::field::Empty))]
    pub async fn run(&self) -> ReconcileResult<RunSummary> {
        let run_id = Uuid::new_v4().to_string();
        tracing::Span::current().record("run_id", run_id.as_str());
        let started_at = Utc::now();
        info!(run_id = %run_id, "开始对账");

        // === 步骤 1-3: 报表流水线 ===
        let index = self.pipeline.run().await?;

        // === 步骤 4: 拉取违规 ===
        let fetched = self.fetcher.fetch().await;
        if fetched.violations.is_empty() {
            error!("未拉取到任何违规记录,终止运行");
            return Err(ReconcileError::NoViolations);
        }
        info!(count = fetched.violations.len(), "违规记录拉取完成");

        // === 步骤 5: 归类 ===
        let classifications: Vec<Classification> = fetched
            .violations
            .iter()
            .map(|v| {
                classify(
                    v,
                    &self.patterns,
                    &index,
                    self.override_status,
                    &self.override_note,
                )
            })
            .collect();

        let mut unmatched: Vec<Violation> = Vec::new();
        for (violation, classification) in fetched.violations.iter().zip(&classifications) {
            match classification {
                Classification::Unmatched => unmatched.push(violation.clone()),
                Classification::MissingFields => {
                    debug!(violation = ?violation, "违规记录缺少必填字段,已跳过");
                }
                Classification::Matched(_) => {}
            }
        }

        // === 步骤 6: 并发提交覆写（结构化并发,全部完成后继续）===
        let matched: Vec<&[OverrideRequest]> = classifications
            .iter()
            .filter_map(|c| match c {
                Classification::Matched(requests) => Some(requests.as_slice()),
                _ => None,
            })
            .collect();
        let override_submissions: usize = matched.iter().map(|r| r.len()).sum();
        info!(
            matched = matched.len(),
            submissions = override_submissions,
            unmatched = unmatched.len(),
            "开始提交覆写"
        );

        let dispatcher = &self.dispatcher;
        let dispatch_results: Vec<Vec<DispatchResult>> =
            join_all(matched.iter().map(move |&requests| {
                join_all(requests.iter().map(move |r| dispatcher.post_override(r)))
            }))
            .await;

        // === 步骤 7: 写未匹配报告 ===
        self.writer.write(&unmatched)?;

        // === 汇总 ===
        let mut results_iter = dispatch_results.into_iter();
        let mut override_attempts: u32 = 0;
        let mut outcomes = Vec::with_capacity(fetched.violations.len());
        for (violation, classification) in fetched.violations.iter().zip(&classifications) {
            let outcome = match classification {
                Classification::MissingFields => ViolationOutcome::SkippedMissingFields,
                Classification::Unmatched => ViolationOutcome::Unmatched,
                Classification::Matched(_) => {
                    let results = results_iter.next().unwrap_or_default();
                    override_attempts += results.iter().map(|r| r.attempts).sum::<u32>();
                    ViolationOutcome::from_dispatch(&results)
                }
            };
            outcomes.push(ViolationRecord {
                violation_id: violation.violation_id.clone(),
                package_name: violation.package_name.clone(),
                outcome,
            });
        }

        let summary = RunSummary {
            run_id,
            started_at,
            finished_at: Utc::now(),
            total_violations: fetched.violations.len(),
            failed_pages: fetched.failed_pages,
            override_submissions,
            override_attempts,
            report_path: self.writer.path().to_path_buf(),
            outcomes,
        };

        info!(
            total = summary.total_violations,
            dispatched = summary.dispatched(),
            dispatch_exhausted = summary.dispatch_exhausted(),
            unmatched = summary.unmatched(),
            skipped = summary.skipped_missing_fields(),
            attempts = summary.override_attempts,
            "对账完成"
        );
        Ok(summary)
    }
}
