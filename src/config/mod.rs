// ==========================================
// 违规目录对账工具 - 配置层
// ==========================================
// 职责: 运行参数管理,支持多级覆写
// 来源: 默认值 → 环境变量 → 命令行参数
// ==========================================

pub mod error;
pub mod settings;

// 重导出核心配置类型
pub use error::{ConfigError, ConfigResult};
pub use settings::{config_keys, ApiCredential, ReconcileSettings};
