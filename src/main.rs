// ==========================================
// 违规目录对账工具 - 命令行入口
// ==========================================
// 启动顺序: 解析参数 → 日志 → 运行参数 → 凭证 → 模式文件 → API 客户端 → 对账
// 退出: 错误仅记录日志,进程正常退出
// ==========================================

use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info};
use violation_reconciler::config::{ApiCredential, ReconcileSettings};
use violation_reconciler::domain::OverrideStatus;
use violation_reconciler::engine::{Orchestrator, PatternSet};
use violation_reconciler::{logging, HttpVendorClient, VendorApi};

/// 违规目录对账: 命中模式的违规自动提交覆写,其余写入审计报告
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// 包名模式文件（每行一个正则）
    #[arg(short, long)]
    patterns: Option<PathBuf>,

    /// 未匹配违规 CSV 输出路径
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// 组织名
    #[arg(long)]
    org: Option<String>,

    /// 目录名
    #[arg(long)]
    catalog: Option<String>,

    /// 用于筛选违规的目录标准
    #[arg(long)]
    catalog_standard: Option<String>,

    /// 覆写决策 [approved|denied]
    #[arg(long)]
    status: Option<OverrideStatus>,

    /// 覆写备注
    #[arg(long)]
    note: Option<String>,

    /// 同时在途请求上限
    #[arg(long)]
    concurrency: Option<usize>,

    /// 每分钟请求上限
    #[arg(long)]
    rate_limit: Option<u32>,

    /// 单个覆写提交的最大尝试次数
    #[arg(long)]
    max_retries: Option<u32>,

    /// 报表状态轮询间隔（秒）
    #[arg(long)]
    poll_interval_secs: Option<u64>,

    /// 报表轮询次数上限（0 为不设上限）
    #[arg(long)]
    poll_max_attempts: Option<u32>,

    /// 演练模式: 只归类与输出报告,不提交覆写
    #[arg(long)]
    dry_run: bool,

    /// 日志详细程度（可叠加,如 -vv）
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Args {
    /// 命令行参数覆写到运行参数上（最高优先级）
    fn apply_to(&self, settings: &mut ReconcileSettings) {
        if let Some(v) = &self.patterns {
            settings.patterns_path = v.clone();
        }
        if let Some(v) = &self.output {
            settings.output_path = v.clone();
        }
        if let Some(v) = &self.org {
            settings.organization = v.clone();
        }
        if let Some(v) = &self.catalog {
            settings.catalog_name = v.clone();
        }
        if let Some(v) = &self.catalog_standard {
            settings.catalog_standard = v.clone();
        }
        if let Some(v) = self.status {
            settings.override_status = v;
        }
        if let Some(v) = &self.note {
            settings.override_note = v.clone();
        }
        if let Some(v) = self.concurrency {
            settings.concurrency_limit = v;
        }
        if let Some(v) = self.rate_limit {
            settings.rate_limit_per_minute = v;
        }
        if let Some(v) = self.max_retries {
            settings.max_retries = v;
        }
        if let Some(v) = self.poll_interval_secs {
            settings.report_poll_interval = Duration::from_secs(v);
        }
        if let Some(v) = self.poll_max_attempts {
            settings.report_poll_max_attempts = v;
        }
        if self.dry_run {
            settings.dry_run = true;
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let args = Args::parse();
    logging::init(args.verbose);

    info!("==================================================");
    info!("违规目录对账工具 - 版本 {}", violation_reconciler::VERSION);
    info!("==================================================");

    if let Err(e) = run(args).await {
        error!(error = ?e, "对账运行中止");
    }
}

async fn run(args: Args) -> anyhow::Result<()> {
    let mut settings = ReconcileSettings::from_env().context("运行参数加载失败")?;
    args.apply_to(&mut settings);
    settings.validate()?;

    // 凭证与模式文件缺失均在发出任何请求之前失败
    let credential = ApiCredential::from_env()?;
    let patterns = PatternSet::load(&settings.patterns_path)?;

    info!(
        organization = %settings.organization,
        catalog = %settings.catalog_name,
        catalog_standard = %settings.catalog_standard,
        patterns = patterns.len(),
        concurrency = settings.concurrency_limit,
        rate_limit = settings.rate_limit_per_minute,
        dry_run = settings.dry_run,
        "运行参数就绪"
    );

    let api: Arc<dyn VendorApi> = Arc::new(HttpVendorClient::new(&settings, credential)?);
    let orchestrator = Orchestrator::new(api, patterns, &settings);
    let summary = orchestrator.run().await?;

    info!(
        total = summary.total_violations,
        dispatched = summary.dispatched(),
        dispatch_exhausted = summary.dispatch_exhausted(),
        unmatched = summary.unmatched(),
        skipped = summary.skipped_missing_fields(),
        report = %summary.report_path.display(),
        "运行汇总"
    );
    match serde_json::to_string_pretty(&summary) {
        Ok(json) => debug!("运行汇总明细:\n{}", json),
        Err(e) => debug!(error = %e, "运行汇总序列化失败"),
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Args::command().debug_assert();
        let help = Args::command().render_long_help().to_string();
        assert!(help.contains("包名模式文件"));
        assert!(help.contains("--dry-run"));
    }

    #[test]
    fn test_cli_overrides_settings() {
        let args = Args::try_parse_from([
            "violation-reconciler",
            "--org",
            "acme",
            "--catalog",
            "default",
            "--status",
            "denied",
            "--concurrency",
            "2",
            "--poll-max-attempts",
            "0",
            "--dry-run",
            "-vv",
        ])
        .unwrap();

        let mut settings = ReconcileSettings::default();
        args.apply_to(&mut settings);

        assert_eq!(settings.organization, "acme");
        assert_eq!(settings.catalog_name, "default");
        assert_eq!(settings.override_status, OverrideStatus::Denied);
        assert_eq!(settings.concurrency_limit, 2);
        assert_eq!(settings.poll_attempt_limit(), None);
        assert!(settings.dry_run);
        assert_eq!(args.verbose, 2);
        // 未指定的参数保留原值
        assert_eq!(settings.rate_limit_per_minute, 35);
    }
}
