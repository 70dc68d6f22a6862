// ==========================================
// 违规目录对账工具 - 限流/并发闸门
// ==========================================
// 约束 (a): 同时在途请求不超过 K（信号量准入）
// 约束 (b): 相邻两次请求发起间隔不小于 T = 60 / 每分钟上限
// 说明: 两个约束相互独立,由调用方分别配置
// ==========================================

use crate::client::ClientResult;
use std::future::Future;
use std::time::Duration;
use tokio::sync::{Mutex, Semaphore, SemaphorePermit};
use tokio::time::{sleep_until, Instant};
use tracing::trace;

// ==========================================
// Governor - 由编排器显式构造并注入各组件
// ==========================================
#[derive(Debug)]
pub struct Governor {
    permits: Semaphore,
    concurrency: usize,
    interval: Duration,
    // 上一次放行的时间点; 持锁等待以保证放行串行
    last_launch: Mutex<Option<Instant>>,
}

/// 准入凭证: 持有期间占用一个并发槽位,drop 即释放
#[derive(Debug)]
pub struct GovernorPermit<'a> {
    _permit: SemaphorePermit<'a>,
}

impl Governor {
    /// 按每分钟请求上限创建
    ///
    /// # 参数
    /// - concurrency: 并发上限 K（0 按 1 处理）
    /// - rate_limit_per_minute: 每分钟请求上限（0 按 1 处理）
    pub fn new(concurrency: usize, rate_limit_per_minute: u32) -> Self {
        let interval = Duration::from_secs_f64(60.0 / f64::from(rate_limit_per_minute.max(1)));
        Self::with_interval(concurrency, interval)
    }

    /// 按固定间隔创建
    pub fn with_interval(concurrency: usize, interval: Duration) -> Self {
        let concurrency = concurrency.max(1);
        Self {
            permits: Semaphore::new(concurrency),
            concurrency,
            interval,
            last_launch: Mutex::new(None),
        }
    }

    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// 申请一次请求准入
    ///
    /// # 流程
    /// 1. 获取并发槽位（满则等待）
    /// 2. 等待距上次放行满 T 后放行
    pub async fn admit(&self) -> ClientResult<GovernorPermit<'_>> {
        let permit = self.permits.acquire().await?;

        let mut last = self.last_launch.lock().await;
        if let Some(prev) = *last {
            let next = prev + self.interval;
            if next > Instant::now() {
                trace!(wait_ms = (next - Instant::now()).as_millis() as u64, "限流等待");
                sleep_until(next).await;
            }
        }
        *last = Some(Instant::now());
        drop(last);

        Ok(GovernorPermit { _permit: permit })
    }

    /// 在准入保护下执行一次请求
    pub async fn call<F, T>(&self, request: F) -> ClientResult<T>
    where
        F: Future<Output = ClientResult<T>>,
    {
        let _permit = self.admit().await?;
        request.await
    }
}
