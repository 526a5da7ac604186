// ==========================================
// 模型记录报表导出 - 迁移协作层
// ==========================================
// 职责: 记录源 / 目标端 / 迁移器的接口与任务描述
// 支持: 任意外部 ORM 适配与迁移库实现
// ==========================================

pub mod job;
pub mod migration_trait;

// 重导出任务描述
pub use job::{MigrationJob, MigrationOptions, MigrationSummary, ReportOutcome, SourceDescriptor};

// 重导出 Trait 接口
pub use migration_trait::{Destination, Migrator, RecordSource, RecordSourceProvider, RowStream};
