// ==========================================
// 违规目录对账工具 - HTTP 客户端实现
// ==========================================
// 技术栈: reqwest（rustls）+ serde_json
// 鉴权: Authorization: Bearer <TIDELIFT_API_KEY>
// ==========================================

use crate::client::error::{ClientError, ClientResult};
use crate::client::vendor_api_trait::VendorApi;
use crate::config::{ApiCredential, ReconcileSettings};
use crate::domain::{
    OverrideRequest, ReportBody, ReportEntry, ReportJob, ReportStatus, ViolationPage,
};
use async_trait::async_trait;
use reqwest::{RequestBuilder, Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

/// 跨项目违规报表的资源名
const REPORT_RESOURCE: &str = "all_projects_violations";

// ==========================================
// 响应体（仅本模块使用）
// ==========================================
#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    report_id: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct StatusResponse {
    #[serde(default)]
    status: String,
}

// ==========================================
// HttpVendorClient - 供应商 REST 客户端
// ==========================================
pub struct HttpVendorClient {
    http: reqwest::Client,
    base_url: Url,
    organization: String,
    catalog_name: String,
    catalog_standard: String,
    credential: ApiCredential,
}

impl HttpVendorClient {
    /// 创建客户端（内部持有共享连接池）
    ///
    /// # 参数
    /// - settings: 运行参数（base url、组织、目录、超时）
    /// - credential: Bearer 凭证
    pub fn new(settings: &ReconcileSettings, credential: ApiCredential) -> ClientResult<Self> {
        let base_url = Url::parse(&settings.api_base_url)
            .map_err(|e| ClientError::InvalidUrl(format!("{}: {}", settings.api_base_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(ClientError::InvalidUrl(settings.api_base_url.clone()));
        }

        let http = reqwest::Client::builder()
            .timeout(settings.request_timeout)
            .build()?;

        Ok(Self {
            http,
            base_url,
            organization: settings.organization.clone(),
            catalog_name: settings.catalog_name.clone(),
            catalog_standard: settings.catalog_standard.clone(),
            credential,
        })
    }

    /// 在 base url 之后追加路径段（逐段百分号编码）
    fn endpoint(&self, segments: &[&str]) -> ClientResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ClientError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    pub(crate) fn violations_url(&self, page: Option<u32>) -> ClientResult<Url> {
        let mut url = self.endpoint(&[
            &self.organization,
            "catalogs",
            &self.catalog_name,
            "violations",
        ])?;
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("catalog_standards[]", &self.catalog_standard);
            if let Some(page) = page {
                query.append_pair("page", &page.to_string());
            }
        }
        Ok(url)
    }

    pub(crate) fn override_url(&self, violation_id: &str) -> ClientResult<Url> {
        self.endpoint(&[
            &self.organization,
            "catalogs",
            &self.catalog_name,
            "violations",
            violation_id,
            "overrides",
        ])
    }

    fn report_url(&self, action: Option<&str>, report_id: Option<&str>) -> ClientResult<Url> {
        let mut segments = vec![self.organization.as_str(), "reports", REPORT_RESOURCE];
        if let Some(action) = action {
            segments.push(action);
        }
        let mut url = self.endpoint(&segments)?;
        if let Some(id) = report_id {
            url.query_pairs_mut().append_pair("report_id", id);
        }
        Ok(url)
    }

    /// 发送请求并校验状态码
    async fn send(
        &self,
        request: RequestBuilder,
        url: &Url,
        expected: StatusCode,
    ) -> ClientResult<Response> {
        let response = request
            .bearer_auth(self.credential.token())
            .send()
            .await?;

        let status = response.status();
        debug!(url = %url, status = status.as_u16(), "供应商 API 响应");
        if status != expected {
            return Err(ClientError::UnexpectedStatus {
                status: status.as_u16(),
                expected: expected.as_u16(),
                url: url.to_string(),
            });
        }
        Ok(response)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> ClientResult<T> {
        let response = self
            .send(self.http.get(url.clone()), &url, StatusCode::OK)
            .await?;
        decode(response, &url).await
    }
}

async fn decode<T: DeserializeOwned>(response: Response, url: &Url) -> ClientResult<T> {
    let bytes = response.bytes().await?;
    serde_json::from_slice(&bytes).map_err(|e| ClientError::Decode {
        url: url.to_string(),
        message: e.to_string(),
    })
}

#[async_trait]
impl VendorApi for HttpVendorClient {
    async fn fetch_violation_page(&self, page: Option<u32>) -> ClientResult<ViolationPage> {
        let url = self.violations_url(page)?;
        self.get_json(url).await
    }

    async fn generate_report(&self) -> ClientResult<ReportJob> {
        let url = self.report_url(Some("generate"), None)?;
        let response = self
            .send(self.http.post(url.clone()), &url, StatusCode::OK)
            .await?;
        let body: GenerateResponse = decode(response, &url).await?;

        let report_id = match body.report_id {
            Some(Value::String(s)) if !s.is_empty() => s,
            Some(Value::Number(n)) => n.to_string(),
            _ => {
                return Err(ClientError::Decode {
                    url: url.to_string(),
                    message: "响应缺少 report_id".to_string(),
                })
            }
        };
        Ok(ReportJob::new(report_id))
    }

    async fn report_status(&self, report_id: &str) -> ClientResult<ReportStatus> {
        let url = self.report_url(Some("status"), Some(report_id))?;
        let body: StatusResponse = self.get_json(url).await?;
        Ok(ReportStatus::parse(&body.status))
    }

    async fn fetch_report(&self, report_id: &str) -> ClientResult<Vec<ReportEntry>> {
        let url = self.report_url(None, Some(report_id))?;
        let body: ReportBody = self.get_json(url).await?;
        Ok(body.into_entries())
    }

    async fn post_override(&self, request: &OverrideRequest) -> ClientResult<()> {
        let url = self.override_url(&request.violation_id)?;
        self.send(
            self.http.post(url.clone()).json(request),
            &url,
            StatusCode::CREATED,
        )
        .await?;
        Ok(())
    }
}
