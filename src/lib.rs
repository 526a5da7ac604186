// ==========================================
// 模型记录报表导出 - 核心库
// ==========================================
// 职责: 报表构建器 + 记录源 / 格式 / 迁移器协作接口
// 系统定位: 只负责配置与委托，读库、写文件、分批迁移均由外部协作方完成
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 记录类型 / 数据行 / 查询描述
pub mod domain;

// 迁移协作层 - 记录源 / 目标端 / 迁移器接口
pub mod migration;

// 报表层 - 构建器与错误类型
pub mod report;

// 配置层 - 输出配置
pub mod config;

// 日志系统
pub mod logging;

// ==========================================
// 重导出核心类型
// ==========================================

pub use config::{ConfigError, ReportConfig};
pub use domain::{DataRow, FieldMap, FieldValue, Model, Query, RecordType};
pub use migration::{
    Destination, MigrationJob, MigrationOptions, MigrationSummary, Migrator, RecordSource,
    RecordSourceProvider, ReportOutcome, SourceDescriptor,
};
pub use report::{
    BoxError, BuilderError, BuilderState, ReportBuilder, ReportFormat, ReportGenerationError,
    ReportGenerator, ReportResult,
};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "record-report";
