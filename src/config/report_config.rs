// ==========================================
// 模型记录报表导出 - 报表配置
// ==========================================
// 职责: 输出目录 / 文件名时间戳配置的加载与文件名解析
// 来源: JSON 配置文件 + 环境变量覆写
// ==========================================

use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

// ==========================================
// 配置键常量
// ==========================================
pub mod config_keys {
    /// 配置文件路径覆写
    pub const CONFIG_PATH_ENV: &str = "RECORD_REPORT_CONFIG";

    /// 输出目录
    pub const OUTPUT_DIR_ENV: &str = "RECORD_REPORT_OUTPUT_DIR";

    /// 文件名时间戳格式（strftime）
    pub const TIMESTAMP_FORMAT_ENV: &str = "RECORD_REPORT_TIMESTAMP_FORMAT";

    /// 默认配置目录名 / 文件名
    pub const CONFIG_DIR_NAME: &str = "record-report";
    pub const CONFIG_FILE_NAME: &str = "config.json";
}

/// 配置错误类型
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("配置文件读取失败 ({path}): {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("配置解析失败: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("配置值格式错误 (key: {key}, value: {value}): {message}")]
    InvalidValue {
        key: String,
        value: String,
        message: String,
    },
}

// ==========================================
// ReportConfig - 报表配置
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReportConfig {
    /// 相对文件名的解析目录（None 表示原样使用）
    pub output_dir: Option<PathBuf>,

    /// 文件名时间戳格式，设置后追加为 `<stem>_<stamp>.<ext>`
    pub timestamp_format: Option<String>,
}

impl ReportConfig {
    /// 从 JSON 字符串解析配置
    pub fn from_json_str(raw: &str) -> Result<Self, ConfigError> {
        let config: ReportConfig = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// 从 JSON 文件加载配置
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        debug!(path = %path.display(), "加载报表配置文件");
        Self::from_json_str(&raw)
    }

    /// 仅从环境变量构造配置
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = ReportConfig::default();
        config.apply_env_overrides()?;
        Ok(config)
    }

    /// 加载默认配置
    ///
    /// # 逻辑
    /// 1. 默认配置文件存在则加载，否则使用默认值
    /// 2. 环境变量覆写
    pub fn load_default() -> Result<Self, ConfigError> {
        let mut config = match default_config_path() {
            Some(path) if path.exists() => Self::load(&path)?,
            _ => ReportConfig::default(),
        };
        config.apply_env_overrides()?;
        Ok(config)
    }

    /// 用环境变量覆写已有配置（空值忽略）
    pub fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        if let Some(dir) = non_empty_env(config_keys::OUTPUT_DIR_ENV) {
            self.output_dir = Some(PathBuf::from(dir));
        }

        if let Some(format) = non_empty_env(config_keys::TIMESTAMP_FORMAT_ENV) {
            self.timestamp_format = Some(format);
        }

        self.validate()
    }

    /// 校验配置值
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(format) = &self.timestamp_format {
            let invalid = format.trim().is_empty()
                || StrftimeItems::new(format).any(|item| matches!(item, Item::Error));
            if invalid {
                return Err(ConfigError::InvalidValue {
                    key: "timestamp_format".to_string(),
                    value: format.clone(),
                    message: "不是合法的 strftime 格式".to_string(),
                });
            }
        }
        Ok(())
    }

    /// 解析最终输出路径（使用当前时间）
    pub fn resolve_filename(&self, filename: &Path) -> Result<PathBuf, ConfigError> {
        self.resolve_filename_at(filename, Utc::now())
    }

    /// 解析最终输出路径
    ///
    /// # 规则
    /// - 相对路径且配置了 output_dir → 拼接到 output_dir 下
    /// - 配置了 timestamp_format → 文件名主干追加 `_<stamp>`，扩展名保持不变
    /// - 默认配置下原样返回
    ///
    /// # 错误
    /// - timestamp_format 非法时返回 ConfigError::InvalidValue
    pub fn resolve_filename_at(
        &self,
        filename: &Path,
        now: DateTime<Utc>,
    ) -> Result<PathBuf, ConfigError> {
        self.validate()?;

        let mut path = match &self.output_dir {
            Some(dir) if filename.is_relative() => dir.join(filename),
            _ => filename.to_path_buf(),
        };

        if let Some(format) = &self.timestamp_format {
            let mut stamp = String::new();
            write!(stamp, "{}", now.format(format)).map_err(|_| ConfigError::InvalidValue {
                key: "timestamp_format".to_string(),
                value: format.clone(),
                message: "时间戳渲染失败".to_string(),
            })?;

            let stem = path
                .file_stem()
                .map(|s| s.to_string_lossy().to_string())
                .unwrap_or_default();
            let stamped = match path.extension() {
                Some(ext) => format!("{}_{}.{}", stem, stamp, ext.to_string_lossy()),
                None => format!("{}_{}", stem, stamp),
            };
            path.set_file_name(stamped);
        }

        Ok(path)
    }
}

/// 默认配置文件路径
///
/// 优先使用 `RECORD_REPORT_CONFIG`，否则为 `<用户配置目录>/record-report/config.json`
pub fn default_config_path() -> Option<PathBuf> {
    if let Some(path) = non_empty_env(config_keys::CONFIG_PATH_ENV) {
        return Some(PathBuf::from(path));
    }

    dirs::config_dir().map(|dir| {
        dir.join(config_keys::CONFIG_DIR_NAME)
            .join(config_keys::CONFIG_FILE_NAME)
    })
}

fn non_empty_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
