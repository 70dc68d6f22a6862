// ==========================================
// 违规目录对账工具 - 供应商 API 客户端错误类型
// ==========================================
// 工具: thiserror 派生宏
// ==========================================

use thiserror::Error;

/// 客户端错误类型
#[derive(Error, Debug)]
pub enum ClientError {
    // ===== 传输层错误 =====
    #[error("HTTP 请求失败: {0}")]
    Transport(#[from] reqwest::Error),

    // ===== 协议层错误 =====
    #[error("非预期的响应状态 {status}（期望 {expected}）: {url}")]
    UnexpectedStatus {
        status: u16,
        expected: u16,
        url: String,
    },

    #[error("响应解析失败 ({url}): {message}")]
    Decode { url: String, message: String },

    // ===== 本地错误 =====
    #[error("无效的 API 地址: {0}")]
    InvalidUrl(String),

    #[error("限流闸门已关闭")]
    GovernorClosed,
}

impl ClientError {
    /// 响应的 HTTP 状态码（非协议层错误时为 None）
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::UnexpectedStatus { status, .. } => Some(*status),
            ClientError::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

impl From<tokio::sync::AcquireError> for ClientError {
    fn from(_: tokio::sync::AcquireError) -> Self {
        ClientError::GovernorClosed
    }
}

/// Result 类型别名
pub type ClientResult<T> = Result<T, ClientError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_exposed_for_unexpected_status() {
        let err = ClientError::UnexpectedStatus {
            status: 503,
            expected: 201,
            url: "https://example.test/x".to_string(),
        };
        assert_eq!(err.status(), Some(503));
        assert!(err.to_string().contains("503"));

        let decode = ClientError::Decode {
            url: "u".to_string(),
            message: "m".to_string(),
        };
        assert_eq!(decode.status(), None);
    }
}
