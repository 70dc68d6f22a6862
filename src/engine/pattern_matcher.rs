// ==========================================
// 违规目录对账工具 - 包名模式匹配器
// ==========================================
// 规则: 任一模式从字符串起始处命中即为匹配（前缀匹配,非全串匹配）
// 例: 模式 `foo` 命中 `foobar`
// 语法: 支持环视（`(?!..)`）与 `(?x)` 注释模式,模式原样编译不做包裹
// 加载: 启动时按文件顺序一次性加载,运行期间不重载
// ==========================================

use crate::config::{ConfigError, ConfigResult};
use fancy_regex::Regex;
use std::fs;
use std::path::Path;
use tracing::{debug, info, warn};

// ==========================================
// PatternSet - 有序模式集
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct PatternSet {
    patterns: Vec<Regex>,
}

impl PatternSet {
    /// 从模式文件加载（每行一个模式）
    ///
    /// # 说明
    /// - 行首尾空白去除,空行忽略
    /// - 不做预校验; 编译失败的行记录告警后跳过
    ///
    /// # 返回
    /// - Err: 文件不存在或不可读（启动期致命错误）
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::PatternFile {
            path: path.display().to_string(),
            source,
        })?;

        let set = Self::from_lines(content.lines());
        info!(path = %path.display(), patterns = set.len(), "包名模式加载完成");
        Ok(set)
    }

    /// 从文本行构建模式集
    pub fn from_lines<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut patterns = Vec::new();
        for (idx, line) in lines.into_iter().enumerate() {
            let raw = line.as_ref().trim();
            if raw.is_empty() {
                continue;
            }
            match Regex::new(raw) {
                Ok(re) => patterns.push(re),
                Err(e) => {
                    warn!(line = idx + 1, pattern = %raw, error = %e, "模式编译失败,已跳过");
                }
            }
        }
        Self { patterns }
    }

    /// 包名是否命中任一模式
    pub fn matches(&self, package_name: &str) -> bool {
        matches(package_name, &self.patterns)
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}

/// 包名是否被任一模式从起始处命中; 空模式集恒为 false
pub fn matches(package_name: &str, patterns: &[Regex]) -> bool {
    patterns.iter().any(|re| matches_prefix(re, package_name))
}

/// 最左匹配起点为 0 即为前缀命中
fn matches_prefix(re: &Regex, package_name: &str) -> bool {
    match re.find(package_name) {
        Ok(found) => found.is_some_and(|m| m.start() == 0),
        Err(e) => {
            debug!(pattern = %re.as_str(), package = %package_name, error = %e, "模式匹配执行失败,按未命中处理");
            false
        }
    }
}
