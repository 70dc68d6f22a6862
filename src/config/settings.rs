// ==========================================
// 违规目录对账工具 - 运行参数
// ==========================================
// 职责: 参数默认值、环境变量覆写、合法性校验
// 说明: 命令行覆写在 main.rs 中叠加（最高优先级）
// ==========================================

use crate::config::error::{ConfigError, ConfigResult};
use crate::domain::OverrideStatus;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

/// 供应商 API 默认地址
pub const DEFAULT_API_BASE_URL: &str = "https://api.tidelift.com/external-api/v1";

// ==========================================
// 配置键（环境变量名）
// ==========================================
pub mod config_keys {
    // 凭证
    pub const API_KEY: &str = "TIDELIFT_API_KEY";

    // 目标目录
    pub const API_BASE_URL: &str = "TIDELIFT_API_BASE_URL";
    pub const ORGANIZATION: &str = "TIDELIFT_ORGANIZATION";
    pub const CATALOG_NAME: &str = "TIDELIFT_CATALOG";
    pub const CATALOG_STANDARD: &str = "TIDELIFT_CATALOG_STANDARD";

    // 覆写内容
    pub const OVERRIDE_STATUS: &str = "RECONCILER_OVERRIDE_STATUS";
    pub const OVERRIDE_NOTE: &str = "RECONCILER_OVERRIDE_NOTE";

    // 本地文件
    pub const PATTERNS_PATH: &str = "RECONCILER_PATTERNS_PATH";
    pub const OUTPUT_PATH: &str = "RECONCILER_OUTPUT_PATH";

    // 限流与重试
    pub const CONCURRENCY_LIMIT: &str = "RECONCILER_CONCURRENCY";
    pub const RATE_LIMIT_PER_MINUTE: &str = "RECONCILER_RATE_LIMIT_PER_MINUTE";
    pub const MAX_RETRIES: &str = "RECONCILER_MAX_RETRIES";
    pub const RETRY_BACKOFF_BASE_SECS: &str = "RECONCILER_RETRY_BACKOFF_SECS";
    pub const REQUEST_TIMEOUT_SECS: &str = "RECONCILER_REQUEST_TIMEOUT_SECS";

    // 报表轮询
    pub const REPORT_POLL_INTERVAL_SECS: &str = "RECONCILER_POLL_INTERVAL_SECS";
    pub const REPORT_POLL_MAX_ATTEMPTS: &str = "RECONCILER_POLL_MAX_ATTEMPTS";

    // 演练模式
    pub const DRY_RUN: &str = "RECONCILER_DRY_RUN";
}

// ==========================================
// ReconcileSettings - 运行参数
// ==========================================
#[derive(Debug, Clone, PartialEq)]
pub struct ReconcileSettings {
    pub api_base_url: String,
    pub organization: String,
    pub catalog_name: String,
    pub catalog_standard: String,

    pub override_status: OverrideStatus,
    pub override_note: String,

    pub patterns_path: PathBuf,
    pub output_path: PathBuf,

    /// 同时在途请求上限 K
    pub concurrency_limit: usize,
    /// 每分钟请求上限，决定请求最小间隔 T = 60 / rate
    pub rate_limit_per_minute: u32,
    /// 单个覆写提交的最大尝试次数
    pub max_retries: u32,
    /// 退避基数: 第 n 次失败后等待 base * n
    pub retry_backoff_base: Duration,
    pub request_timeout: Duration,

    pub report_poll_interval: Duration,
    /// 0 表示不设上限（无限轮询）
    pub report_poll_max_attempts: u32,

    pub dry_run: bool,
}

impl Default for ReconcileSettings {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            organization: String::new(),
            catalog_name: String::new(),
            catalog_standard: "known_packages".to_string(),
            override_status: OverrideStatus::Approved,
            override_note: "Matched known regex pattern".to_string(),
            patterns_path: PathBuf::from("package_patterns.txt"),
            output_path: PathBuf::from("unmatched_violations_report.csv"),
            concurrency_limit: 5,
            rate_limit_per_minute: 35,
            max_retries: 3,
            retry_backoff_base: Duration::from_secs(2),
            request_timeout: Duration::from_secs(30),
            report_poll_interval: Duration::from_secs(10),
            report_poll_max_attempts: 360,
            dry_run: false,
        }
    }
}

impl ReconcileSettings {
    /// 从进程环境变量加载参数（未设置的键保留默认值）
    pub fn from_env() -> ConfigResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// 从任意键值来源加载参数
    ///
    /// # 参数
    /// - lookup: 按配置键返回原始字符串；空白值视为未设置
    pub fn from_lookup<F>(lookup: F) -> ConfigResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let mut settings = Self::default();

        if let Some(v) = get(config_keys::API_BASE_URL) {
            settings.api_base_url = v;
        }
        if let Some(v) = get(config_keys::ORGANIZATION) {
            settings.organization = v;
        }
        if let Some(v) = get(config_keys::CATALOG_NAME) {
            settings.catalog_name = v;
        }
        if let Some(v) = get(config_keys::CATALOG_STANDARD) {
            settings.catalog_standard = v;
        }
        if let Some(v) = get(config_keys::OVERRIDE_STATUS) {
            settings.override_status = parse_value(config_keys::OVERRIDE_STATUS, &v)?;
        }
        if let Some(v) = get(config_keys::OVERRIDE_NOTE) {
            settings.override_note = v;
        }
        if let Some(v) = get(config_keys::PATTERNS_PATH) {
            settings.patterns_path = PathBuf::from(v);
        }
        if let Some(v) = get(config_keys::OUTPUT_PATH) {
            settings.output_path = PathBuf::from(v);
        }
        if let Some(v) = get(config_keys::CONCURRENCY_LIMIT) {
            settings.concurrency_limit = parse_value(config_keys::CONCURRENCY_LIMIT, &v)?;
        }
        if let Some(v) = get(config_keys::RATE_LIMIT_PER_MINUTE) {
            settings.rate_limit_per_minute = parse_value(config_keys::RATE_LIMIT_PER_MINUTE, &v)?;
        }
        if let Some(v) = get(config_keys::MAX_RETRIES) {
            settings.max_retries = parse_value(config_keys::MAX_RETRIES, &v)?;
        }
        if let Some(v) = get(config_keys::RETRY_BACKOFF_BASE_SECS) {
            settings.retry_backoff_base =
                Duration::from_secs(parse_value(config_keys::RETRY_BACKOFF_BASE_SECS, &v)?);
        }
        if let Some(v) = get(config_keys::REQUEST_TIMEOUT_SECS) {
            settings.request_timeout =
                Duration::from_secs(parse_value(config_keys::REQUEST_TIMEOUT_SECS, &v)?);
        }
        if let Some(v) = get(config_keys::REPORT_POLL_INTERVAL_SECS) {
            settings.report_poll_interval =
                Duration::from_secs(parse_value(config_keys::REPORT_POLL_INTERVAL_SECS, &v)?);
        }
        if let Some(v) = get(config_keys::REPORT_POLL_MAX_ATTEMPTS) {
            settings.report_poll_max_attempts =
                parse_value(config_keys::REPORT_POLL_MAX_ATTEMPTS, &v)?;
        }
        if let Some(v) = get(config_keys::DRY_RUN) {
            settings.dry_run = is_true(&v);
        }

        Ok(settings)
    }

    /// 校验参数合法性（在任何网络请求之前调用）
    pub fn validate(&self) -> ConfigResult<()> {
        if self.organization.trim().is_empty() {
            return Err(ConfigError::Validation(format!(
                "组织名未设置（{} 或 --org）",
                config_keys::ORGANIZATION
            )));
        }
        if self.catalog_name.trim().is_empty() {
            return Err(ConfigError::Validation(format!(
                "目录名未设置（{} 或 --catalog）",
                config_keys::CATALOG_NAME
            )));
        }
        if self.concurrency_limit == 0 {
            return Err(ConfigError::Validation("并发上限必须大于 0".to_string()));
        }
        if self.rate_limit_per_minute == 0 {
            return Err(ConfigError::Validation("每分钟请求上限必须大于 0".to_string()));
        }
        if self.max_retries == 0 {
            return Err(ConfigError::Validation("最大尝试次数必须大于 0".to_string()));
        }
        Ok(())
    }

    /// 请求最小间隔 T = 60 / RATE_LIMIT_PER_MINUTE 秒
    pub fn request_interval(&self) -> Duration {
        Duration::from_secs_f64(60.0 / f64::from(self.rate_limit_per_minute.max(1)))
    }

    /// 轮询次数上限（None = 无限轮询）
    pub fn poll_attempt_limit(&self) -> Option<u32> {
        match self.report_poll_max_attempts {
            0 => None,
            n => Some(n),
        }
    }
}

// ==========================================
// ApiCredential - Bearer 凭证
// ==========================================
#[derive(Clone, PartialEq, Eq)]
pub struct ApiCredential(String);

impl ApiCredential {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// 从环境变量 TIDELIFT_API_KEY 读取；缺失或为空即为致命错误
    pub fn from_env() -> ConfigResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> ConfigResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        lookup(config_keys::API_KEY)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .map(Self)
            .ok_or_else(|| ConfigError::MissingCredential(config_keys::API_KEY.to_string()))
    }

    pub fn token(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiCredential(***)")
    }
}

fn parse_value<T>(key: &str, raw: &str) -> ConfigResult<T>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    raw.parse::<T>().map_err(|e| ConfigError::InvalidValue {
        key: key.to_string(),
        value: raw.to_string(),
        message: e.to_string(),
    })
}

fn is_true(v: &str) -> bool {
    matches!(
        v.trim().to_lowercase().as_str(),
        "1" | "true" | "yes" | "y" | "on"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_match_vendor_budget() {
        let settings = ReconcileSettings::default();
        assert_eq!(settings.concurrency_limit, 5);
        assert_eq!(settings.rate_limit_per_minute, 35);
        assert_eq!(settings.max_retries, 3);
        assert_eq!(settings.report_poll_interval, Duration::from_secs(10));
        assert_eq!(settings.catalog_standard, "known_packages");
        assert_eq!(settings.override_status, OverrideStatus::Approved);
        // 60 / 35 ≈ 1.714s
        let interval = settings.request_interval().as_secs_f64();
        assert!((interval - 60.0 / 35.0).abs() < 1e-9);
    }

    #[test]
    fn test_env_overrides_defaults() {
        let settings = ReconcileSettings::from_lookup(lookup_from(&[
            (config_keys::ORGANIZATION, "acme"),
            (config_keys::CATALOG_NAME, "default"),
            (config_keys::CONCURRENCY_LIMIT, "2"),
            (config_keys::RATE_LIMIT_PER_MINUTE, "60"),
            (config_keys::OVERRIDE_STATUS, "denied"),
            (config_keys::REPORT_POLL_MAX_ATTEMPTS, "0"),
            (config_keys::DRY_RUN, "yes"),
            (config_keys::OUTPUT_PATH, "   "),
        ]))
        .unwrap();

        assert_eq!(settings.organization, "acme");
        assert_eq!(settings.catalog_name, "default");
        assert_eq!(settings.concurrency_limit, 2);
        assert_eq!(settings.request_interval(), Duration::from_secs(1));
        assert_eq!(settings.override_status, OverrideStatus::Denied);
        assert_eq!(settings.poll_attempt_limit(), None);
        assert!(settings.dry_run);
        // 空白值视为未设置
        assert_eq!(
            settings.output_path,
            PathBuf::from("unmatched_violations_report.csv")
        );
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_invalid_number_is_reported_with_key() {
        let err = ReconcileSettings::from_lookup(lookup_from(&[(
            config_keys::MAX_RETRIES,
            "three",
        )]))
        .unwrap_err();

        match err {
            ConfigError::InvalidValue { key, value, .. } => {
                assert_eq!(key, config_keys::MAX_RETRIES);
                assert_eq!(value, "three");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_validate_rejects_missing_target_and_zero_budgets() {
        let mut settings = ReconcileSettings::default();
        assert!(settings.validate().is_err());

        settings.organization = "acme".to_string();
        settings.catalog_name = "default".to_string();
        assert!(settings.validate().is_ok());

        settings.rate_limit_per_minute = 0;
        assert!(settings.validate().is_err());
        settings.rate_limit_per_minute = 35;

        settings.concurrency_limit = 0;
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_credential_required_and_redacted() {
        let missing = ApiCredential::from_lookup(lookup_from(&[]));
        assert!(matches!(missing, Err(ConfigError::MissingCredential(_))));

        let blank = ApiCredential::from_lookup(lookup_from(&[(config_keys::API_KEY, "  ")]));
        assert!(blank.is_err());

        let credential =
            ApiCredential::from_lookup(lookup_from(&[(config_keys::API_KEY, "secret-token")]))
                .unwrap();
        assert_eq!(credential.token(), "secret-token");
        assert!(!format!("{credential:?}").contains("secret"));
    }
}
