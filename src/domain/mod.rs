// ==========================================
// 模型记录报表导出 - 领域模型层
// ==========================================
// 职责: 定义记录类型、数据行、查询描述
// 红线: 不含数据访问逻辑，不含文件格式逻辑
// ==========================================

pub mod data_row;
pub mod query;
pub mod types;

// 重导出核心类型
pub use data_row::{DataRow, FieldValue};
pub use query::{Direction, Filter, Operator, Query};
pub use types::{FieldMap, Model, QueryRefinement, RecordType, RowTransformation};
