// ==========================================
// 模型记录报表导出 - 报表格式策略 Trait
// ==========================================
// 职责: 按文件名生成目标端（不包含任何格式实现）
// 实现者: 外部 CSV / Excel 等格式实现
// ==========================================

use crate::migration::Destination;
use crate::report::error::BoxError;
use std::path::Path;
use std::sync::Arc;

pub trait ReportFormat: Send + Sync {
    /// 格式名称（日志 / 结果记录用），如 "csv"
    fn name(&self) -> &str;

    /// 生成绑定到 filename 的目标端
    ///
    /// # 返回
    /// - Ok(Box<dyn Destination>): 目标端
    /// - Err: 文件无法创建等
    fn destination(&self, filename: &Path) -> Result<Box<dyn Destination>, BoxError>;
}

// 允许多个构建器共享同一格式实例
impl<F: ReportFormat + ?Sized> ReportFormat for Arc<F> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn destination(&self, filename: &Path) -> Result<Box<dyn Destination>, BoxError> {
        (**self).destination(filename)
    }
}

impl<F: ReportFormat + ?Sized> ReportFormat for Box<F> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn destination(&self, filename: &Path) -> Result<Box<dyn Destination>, BoxError> {
        (**self).destination(filename)
    }
}
