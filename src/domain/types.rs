// ==========================================
// 模型记录报表导出 - 领域类型定义
// ==========================================
// 职责: 记录类型标识、字段映射、回调签名
// ==========================================

use crate::domain::data_row::DataRow;
use crate::domain::query::Query;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

// ==========================================
// Model - 数据库模型标识
// ==========================================
/// 可导出的数据库模型
///
/// 实现者只需声明名称与存储表名，报表构建器据此生成 [`RecordType`]。
///
/// # 示例
/// ```
/// use record_report::domain::{Model, RecordType};
///
/// struct User;
///
/// impl Model for User {
///     const NAME: &'static str = "User";
///     const TABLE: &'static str = "users";
/// }
///
/// let record_type = RecordType::of::<User>();
/// assert_eq!(record_type.table(), "users");
/// ```
pub trait Model {
    /// 模型名称（日志/展示用）
    const NAME: &'static str;

    /// 存储表名（记录源据此定位数据）
    const TABLE: &'static str;
}

// ==========================================
// RecordType - 记录类型标识
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RecordType {
    name: String,
    table: String,
}

impl RecordType {
    pub fn new(name: impl Into<String>, table: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            table: table.into(),
        }
    }

    /// 从模型类型生成记录类型
    pub fn of<M: Model>() -> Self {
        Self::new(M::NAME, M::TABLE)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn table(&self) -> &str {
        &self.table
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

// ==========================================
// 回调与映射类型
// ==========================================

/// 字段重命名映射（源字段名 → 目标列名）
pub type FieldMap = HashMap<String, String>;

/// 查询细化回调: Query -> Query
pub type QueryRefinement = Arc<dyn Fn(Query) -> Query + Send + Sync>;

/// 行变换回调: DataRow -> DataRow
pub type RowTransformation = Arc<dyn Fn(DataRow) -> DataRow + Send + Sync>;
