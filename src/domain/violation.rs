// ==========================================
// 违规目录对账工具 - 违规记录
// ==========================================
// 职责: 供应商违规目录条目及分页包络
// 红线: 拉取后只读,本地不做任何修改
// ==========================================

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

// ==========================================
// Violation - 违规记录
// ==========================================
// 标识: violation_id（不透明字符串,拼入 URL 时需百分号编码）
// 线上字段均可能缺失,缺失与空串等价
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    #[serde(default, deserialize_with = "scalar_as_string")]
    pub catalog_standard: Option<String>,
    #[serde(default, deserialize_with = "scalar_as_string")]
    pub violation_id: Option<String>,
    #[serde(default, deserialize_with = "scalar_as_string")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "scalar_as_string")]
    pub package_name: Option<String>,
    #[serde(default, deserialize_with = "scalar_as_string")]
    pub package_platform: Option<String>,
    #[serde(default, deserialize_with = "scalar_as_string")]
    pub task_id: Option<String>,
}

impl Violation {
    /// 分类所需的必填字段 (violation_id, package_name)
    ///
    /// # 返回
    /// - Some: 两者均非空
    /// - None: 任一缺失或为空串（该记录将被跳过）
    pub fn required_fields(&self) -> Option<(&str, &str)> {
        let id = non_empty(self.violation_id.as_deref())?;
        let name = non_empty(self.package_name.as_deref())?;
        Some((id, name))
    }

    /// 包平台（缺失时为空串）
    pub fn platform(&self) -> &str {
        self.package_platform.as_deref().unwrap_or("")
    }
}

// ==========================================
// ViolationPage - 分页响应包络
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViolationPage {
    #[serde(default = "default_total_pages")]
    pub total_pages: u32,
    #[serde(default)]
    pub results: Vec<Violation>,
}

fn default_total_pages() -> u32 {
    1
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

/// 将任意 JSON 标量读为字符串（数字 task_id 等），null 读为 None
pub(crate) fn scalar_as_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        Some(Value::Bool(b)) => Some(b.to_string()),
        Some(other) => Some(other.to_string()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_page_defaults_when_fields_absent() {
        let page: ViolationPage = serde_json::from_value(json!({})).unwrap();
        assert_eq!(page.total_pages, 1);
        assert!(page.results.is_empty());
    }

    #[test]
    fn test_violation_tolerates_missing_and_numeric_fields() {
        let v: Violation = serde_json::from_value(json!({
            "violation_id": "abc/1",
            "package_name": "lodash",
            "task_id": 42,
            "title": null,
            "unknown_field": {"nested": true}
        }))
        .unwrap();

        assert_eq!(v.violation_id.as_deref(), Some("abc/1"));
        assert_eq!(v.task_id.as_deref(), Some("42"));
        assert_eq!(v.title, None);
        assert_eq!(v.catalog_standard, None);
        assert_eq!(v.platform(), "");
    }

    #[test]
    fn test_required_fields_treat_empty_as_missing() {
        let mut v = Violation {
            violation_id: Some("v1".into()),
            package_name: Some("lodash".into()),
            ..Default::default()
        };
        assert_eq!(v.required_fields(), Some(("v1", "lodash")));

        v.package_name = Some(String::new());
        assert_eq!(v.required_fields(), None);

        v.package_name = Some("lodash".into());
        v.violation_id = None;
        assert_eq!(v.required_fields(), None);
    }
}
