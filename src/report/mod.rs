// ==========================================
// 模型记录报表导出 - 报表层
// ==========================================
// 职责: 报表构建器、格式策略接口、报表生成错误
// ==========================================

pub mod builder;
pub mod error;
pub mod format;
pub mod generator;

// 重导出核心类型
pub use builder::{BuilderState, ReportBuilder};
pub use error::{BoxError, BuilderError, ReportGenerationError, ReportResult};
pub use format::ReportFormat;
pub use generator::ReportGenerator;
