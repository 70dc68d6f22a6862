// ==========================================
// 违规目录对账工具 - 覆写请求
// ==========================================
// 职责: 覆写决策及其提交载荷
// 规则: 每个违规一条; 已知多个违规版本时按版本扇出
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ==========================================
// 覆写决策
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OverrideStatus {
    Approved,
    Denied,
}

impl fmt::Display for OverrideStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OverrideStatus::Approved => write!(f, "approved"),
            OverrideStatus::Denied => write!(f, "denied"),
        }
    }
}

impl FromStr for OverrideStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "approved" => Ok(OverrideStatus::Approved),
            "denied" => Ok(OverrideStatus::Denied),
            other => Err(format!("未知覆写状态: {}（仅支持 approved/denied）", other)),
        }
    }
}

// ==========================================
// OverrideRequest - 单次覆写提交单元
// ==========================================
// violation_id 仅用于拼接 URL,不进入请求体
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OverrideRequest {
    #[serde(skip)]
    pub violation_id: String,
    pub status: OverrideStatus,
    pub note: String,
    pub platform: String,
    pub package_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

impl OverrideRequest {
    /// 按违规版本扇出覆写请求
    ///
    /// # 参数
    /// - versions: 报表查得的违规版本（可为空）
    ///
    /// # 返回
    /// - N 个版本 → N 个带版本的请求
    /// - 无版本 → 恰好 1 个不带版本的请求
    pub fn fan_out(
        violation_id: &str,
        package_name: &str,
        platform: &str,
        versions: &[String],
        status: OverrideStatus,
        note: &str,
    ) -> Vec<OverrideRequest> {
        let build = |version: Option<String>| OverrideRequest {
            violation_id: violation_id.to_string(),
            status,
            note: note.to_string(),
            platform: platform.to_string(),
            package_name: package_name.to_string(),
            version,
        };

        if versions.is_empty() {
            return vec![build(None)];
        }
        versions.iter().map(|v| build(Some(v.clone()))).collect()
    }
}
