// ==========================================
// 违规目录对账工具 - 配置错误类型
// ==========================================
// 工具: thiserror 派生宏
// ==========================================

use thiserror::Error;

/// 配置层错误类型（均为启动期致命错误）
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("环境变量中未找到 API 密钥: {0}")]
    MissingCredential(String),

    #[error("配置值格式错误 (key: {key}, value: {value}): {message}")]
    InvalidValue {
        key: String,
        value: String,
        message: String,
    },

    #[error("配置校验失败: {0}")]
    Validation(String),

    #[error("模式文件读取失败 ({path}): {source}")]
    PatternFile {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Result 类型别名
pub type ConfigResult<T> = Result<T, ConfigError>;
