// ==========================================
// 模型记录报表导出 - 报表生成错误类型
// ==========================================
// 工具: thiserror 派生宏
// 红线: save 对外只暴露 ReportGenerationError，原始错误作为 source 保留
// ==========================================

use thiserror::Error;

/// 协作方错误的统一承载类型
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// 报表生成错误
///
/// 记录源构造、目标端构造、迁移执行中的任何失败都包装为此错误，
/// 原始错误可通过 [`ReportGenerationError::cause`] 或 `source()` 取回。
#[derive(Error, Debug)]
#[error("Error generating report.")]
pub struct ReportGenerationError {
    #[source]
    cause: BoxError,
}

impl ReportGenerationError {
    pub fn new(cause: impl Into<BoxError>) -> Self {
        Self {
            cause: cause.into(),
        }
    }

    /// 原始错误
    pub fn cause(&self) -> &(dyn std::error::Error + Send + Sync + 'static) {
        self.cause.as_ref()
    }

    /// 取出原始错误
    pub fn into_cause(self) -> BoxError {
        self.cause
    }

    /// 按具体类型查看原始错误
    pub fn downcast_cause<E: std::error::Error + 'static>(&self) -> Option<&E> {
        self.cause.downcast_ref::<E>()
    }
}

/// 构建器自身产生的错误（总是被包装进 ReportGenerationError）
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BuilderError {
    #[error("报表格式未设置: save 之前必须调用 set_format")]
    FormatNotSet,
}

/// Result 类型别名
pub type ReportResult<T> = Result<T, ReportGenerationError>;
