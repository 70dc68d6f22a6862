// ==========================================
// 违规目录对账工具 - 供应商 API 层
// ==========================================
// 职责: 与供应商 REST API 通信（Bearer 鉴权）
// 共享: 单个 reqwest 连接池供全部组件使用
// ==========================================

pub mod error;
pub mod http_client;
pub mod vendor_api_trait;

pub use error::{ClientError, ClientResult};
pub use http_client::HttpVendorClient;
pub use vendor_api_trait::VendorApi;
