// ==========================================
// 模型记录报表导出 - 配置层
// ==========================================
// 职责: 报表输出配置加载，支持文件 + 环境变量覆写
// ==========================================

pub mod report_config;

// 重导出配置类型
pub use report_config::{config_keys, default_config_path, ConfigError, ReportConfig};
