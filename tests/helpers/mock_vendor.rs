// ==========================================
// Mock 供应商实现 - 用于集成测试
// ==========================================
// 说明: 按脚本返回各接口结果,并记录调用顺序与在途峰值
// ==========================================

use async_trait::async_trait;
use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;
use violation_reconciler::client::{ClientError, ClientResult, VendorApi};
use violation_reconciler::domain::{
    OverrideRequest, ReportEntry, ReportJob, ReportStatus, Violation, ViolationPage,
};

/// 构造 HTTP 非预期状态错误
pub fn http_error(status: u16) -> ClientError {
    ClientError::UnexpectedStatus {
        status,
        expected: 200,
        url: "mock://vendor".to_string(),
    }
}

/// 构造传输层类错误（无状态码）
pub fn transport_error() -> ClientError {
    ClientError::Decode {
        url: "mock://vendor".to_string(),
        message: "connection reset".to_string(),
    }
}

/// 单次覆写提交的脚本结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostScript {
    Created,
    Status(u16),
    Transport,
}

/// Mock 供应商
#[derive(Default)]
pub struct MockVendor {
    pub total_pages: u32,
    pub pages: HashMap<u32, Vec<Violation>>,
    pub failing_pages: HashSet<u32>,
    pub fail_unpaged: bool,

    pub fail_generate: bool,
    /// 依次返回的状态查询结果; 耗尽后恒为 completed
    pub statuses: Mutex<VecDeque<Result<ReportStatus, u16>>>,
    pub report: Vec<ReportEntry>,
    pub fail_report_fetch: bool,

    /// 按 violation_id 脚本化的提交结果; 耗尽后恒为成功
    pub post_scripts: Mutex<HashMap<String, VecDeque<PostScript>>>,
    /// 每次提交模拟的耗时
    pub post_latency: Duration,

    pub page_calls: Mutex<Vec<Option<u32>>>,
    pub status_calls: AtomicUsize,
    pub report_fetches: AtomicUsize,
    pub posted: Mutex<Vec<OverrideRequest>>,
    in_flight: AtomicUsize,
    pub peak_in_flight: AtomicUsize,
}

impl MockVendor {
    /// 创建默认供应商: 无违规、报表立即完成
    pub fn new() -> Self {
        Self::default()
    }

    /// 单页违规列表
    pub fn with_violations(violations: Vec<Violation>) -> Self {
        let mut vendor = Self::new();
        vendor.total_pages = 1;
        vendor.pages.insert(1, violations);
        vendor
    }

    /// 添加一页违规
    pub fn page(mut self, page: u32, violations: Vec<Violation>) -> Self {
        self.total_pages = self.total_pages.max(page);
        self.pages.insert(page, violations);
        self
    }

    pub fn report_entries(mut self, entries: Vec<ReportEntry>) -> Self {
        self.report = entries;
        self
    }

    pub fn statuses(self, statuses: Vec<Result<ReportStatus, u16>>) -> Self {
        *self.statuses.lock().unwrap() = statuses.into();
        self
    }

    /// 为指定违规设置提交结果序列
    pub fn script_posts(self, violation_id: &str, script: Vec<PostScript>) -> Self {
        self.post_scripts
            .lock()
            .unwrap()
            .insert(violation_id.to_string(), script.into());
        self
    }

    pub fn posted(&self) -> Vec<OverrideRequest> {
        self.posted.lock().unwrap().clone()
    }

    pub fn posts_for(&self, violation_id: &str) -> usize {
        self.posted
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.violation_id == violation_id)
            .count()
    }

    pub fn page_calls(&self) -> Vec<Option<u32>> {
        self.page_calls.lock().unwrap().clone()
    }

    pub fn peak(&self) -> usize {
        self.peak_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl VendorApi for MockVendor {
    async fn fetch_violation_page(&self, page: Option<u32>) -> ClientResult<ViolationPage> {
        self.page_calls.lock().unwrap().push(page);
        match page {
            None if self.fail_unpaged => Err(http_error(500)),
            None => Ok(ViolationPage {
                total_pages: self.total_pages,
                results: self.pages.get(&1).cloned().unwrap_or_default(),
            }),
            Some(n) if self.failing_pages.contains(&n) => Err(http_error(502)),
            Some(n) => Ok(ViolationPage {
                total_pages: self.total_pages,
                results: self.pages.get(&n).cloned().unwrap_or_default(),
            }),
        }
    }

    async fn generate_report(&self) -> ClientResult<ReportJob> {
        if self.fail_generate {
            return Err(http_error(500));
        }
        Ok(ReportJob::new("r-1"))
    }

    async fn report_status(&self, _report_id: &str) -> ClientResult<ReportStatus> {
        self.status_calls.fetch_add(1, Ordering::SeqCst);
        match self.statuses.lock().unwrap().pop_front() {
            Some(Ok(status)) => Ok(status),
            Some(Err(code)) => Err(http_error(code)),
            None => Ok(ReportStatus::Completed),
        }
    }

    async fn fetch_report(&self, _report_id: &str) -> ClientResult<Vec<ReportEntry>> {
        self.report_fetches.fetch_add(1, Ordering::SeqCst);
        if self.fail_report_fetch {
            return Err(http_error(500));
        }
        Ok(self.report.clone())
    }

    async fn post_override(&self, request: &OverrideRequest) -> ClientResult<()> {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_in_flight.fetch_max(now, Ordering::SeqCst);

        if !self.post_latency.is_zero() {
            tokio::time::sleep(self.post_latency).await;
        }

        self.posted.lock().unwrap().push(request.clone());
        let script = self
            .post_scripts
            .lock()
            .unwrap()
            .get_mut(&request.violation_id)
            .and_then(|queue| queue.pop_front())
            .unwrap_or(PostScript::Created);

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        match script {
            PostScript::Created => Ok(()),
            PostScript::Status(code) => Err(ClientError::UnexpectedStatus {
                status: code,
                expected: 201,
                url: "mock://vendor/overrides".to_string(),
            }),
            PostScript::Transport => Err(transport_error()),
        }
    }
}
