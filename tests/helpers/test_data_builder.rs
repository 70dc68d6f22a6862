// ==========================================
// 测试数据构造器
// ==========================================

use violation_reconciler::domain::Violation;

/// 常用构造: 带 id/包名/平台的违规记录
pub fn violation(id: &str, package_name: &str, platform: &str) -> Violation {
    ViolationBuilder::new(id, package_name).platform(platform).build()
}

/// 违规记录构造器
#[derive(Debug, Clone, Default)]
pub struct ViolationBuilder {
    inner: Violation,
}

impl ViolationBuilder {
    pub fn new(id: &str, package_name: &str) -> Self {
        Self {
            inner: Violation {
                catalog_standard: Some("known_packages".to_string()),
                violation_id: Some(id.to_string()),
                package_name: Some(package_name.to_string()),
                ..Violation::default()
            },
        }
    }

    /// 缺少必填字段的记录
    pub fn missing_id(package_name: &str) -> Self {
        let mut builder = Self::new("", package_name);
        builder.inner.violation_id = None;
        builder
    }

    pub fn platform(mut self, platform: &str) -> Self {
        self.inner.package_platform = Some(platform.to_string());
        self
    }

    pub fn title(mut self, title: &str) -> Self {
        self.inner.title = Some(title.to_string());
        self
    }

    pub fn task_id(mut self, task_id: &str) -> Self {
        self.inner.task_id = Some(task_id.to_string());
        self
    }

    pub fn build(self) -> Violation {
        self.inner
    }
}
