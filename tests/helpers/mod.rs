// ==========================================
// 集成测试辅助模块
// ==========================================
// 职责: 脚本化供应商替身、测试数据构造、快速运行参数
// ==========================================

#![allow(dead_code)]

pub mod mock_vendor;
pub mod test_data_builder;

use std::path::Path;
use std::time::Duration;
use violation_reconciler::config::ReconcileSettings;

pub use mock_vendor::MockVendor;
pub use test_data_builder::{violation, ViolationBuilder};

/// 测试用运行参数: 高限流上限、短退避、输出写入指定目录
pub fn fast_settings(dir: &Path) -> ReconcileSettings {
    ReconcileSettings {
        organization: "acme".to_string(),
        catalog_name: "default".to_string(),
        patterns_path: dir.join("package_patterns.txt"),
        output_path: dir.join("unmatched_violations_report.csv"),
        concurrency_limit: 5,
        rate_limit_per_minute: 6000,
        max_retries: 3,
        retry_backoff_base: Duration::from_millis(10),
        report_poll_interval: Duration::from_millis(10),
        report_poll_max_attempts: 20,
        ..ReconcileSettings::default()
    }
}

/// 读取 CSV 报告的全部数据行（不含表头）
pub fn read_report_rows(path: &Path) -> Vec<Vec<String>> {
    let mut reader = csv::Reader::from_path(path).expect("打开报告失败");
    reader
        .records()
        .map(|r| r.expect("读取报告行失败").iter().map(String::from).collect())
        .collect()
}
