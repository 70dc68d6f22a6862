// ==========================================
// 违规目录对账工具 - 覆写提交器
// ==========================================
// 每次尝试: Governor 准入（含限流等待）→ POST
// 成功: 状态 201,立即停止该单元
// 失败: 其他状态或传输层异常 → 退避 base * (attempt_index + 1) 后重试
// 耗尽: 记录失败后放弃,运行继续（不回填到未匹配报告）
// ==========================================

use crate::client::VendorApi;
use crate::domain::{DispatchResult, OverrideRequest};
use crate::engine::governor::Governor;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};

// ==========================================
// OverrideDispatcher
// ==========================================
pub struct OverrideDispatcher {
    api: Arc<dyn VendorApi>,
    governor: Arc<Governor>,
    max_retries: u32,
    backoff_base: Duration,
    dry_run: bool,
}

impl OverrideDispatcher {
    /// 创建覆写提交器
    ///
    /// # 参数
    /// - max_retries: 单元最大尝试次数（0 按 1 处理）
    /// - backoff_base: 退避基数,第 n 次失败后等待 base * n
    /// - dry_run: 演练模式,不发出任何请求
    pub fn new(
        api: Arc<dyn VendorApi>,
        governor: Arc<Governor>,
        max_retries: u32,
        backoff_base: Duration,
        dry_run: bool,
    ) -> Self {
        Self {
            api,
            governor,
            max_retries: max_retries.max(1),
            backoff_base,
            dry_run,
        }
    }

    /// 提交单个覆写单元（带重试）
    pub async fn post_override(&self, request: &OverrideRequest) -> DispatchResult {
        let violation_id = request.violation_id.as_str();
        let version = request.version.as_deref().unwrap_or("-");

        if self.dry_run {
            info!(
                violation_id,
                package = %request.package_name,
                version,
                status = %request.status,
                "[演练] 跳过覆写提交"
            );
            return DispatchResult {
                succeeded: true,
                attempts: 0,
                last_status: None,
            };
        }

        let mut last_status = None;
        for attempt in 0..self.max_retries {
            // 槽位仅覆盖请求本身,退避等待时已释放
            let outcome = self.governor.call(self.api.post_override(request)).await;

            match outcome {
                Ok(()) => {
                    info!(violation_id, version, attempt = attempt + 1, "覆写提交成功");
                    return DispatchResult {
                        succeeded: true,
                        attempts: attempt + 1,
                        last_status: Some(201),
                    };
                }
                Err(e) => {
                    last_status = e.status();
                    warn!(
                        violation_id,
                        version,
                        attempt = attempt + 1,
                        status = ?last_status,
                        error = %e,
                        "覆写提交失败"
                    );
                }
            }

            if attempt + 1 < self.max_retries {
                tokio::time::sleep(self.backoff_base * (attempt + 1)).await;
            }
        }

        error!(
            violation_id,
            version,
            attempts = self.max_retries,
            "覆写提交重试耗尽,已放弃"
        );
        DispatchResult {
            succeeded: false,
            attempts: self.max_retries,
            last_status,
        }
    }
}
