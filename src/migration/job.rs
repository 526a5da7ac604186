// ==========================================
// 模型记录报表导出 - 迁移任务描述
// ==========================================
// 职责: 记录源描述、迁移任务、逐行整形约定、执行结果
// ==========================================

use crate::domain::{DataRow, FieldMap, Query, QueryRefinement, RecordType, RowTransformation};
use crate::migration::migration_trait::{Destination, RecordSource};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;
use std::path::PathBuf;
use uuid::Uuid;

// ==========================================
// SourceDescriptor - 记录源描述
// ==========================================
/// 记录类型 + 可选查询细化回调
#[derive(Clone)]
pub struct SourceDescriptor {
    record_type: RecordType,
    refinement: Option<QueryRefinement>,
}

impl SourceDescriptor {
    pub fn new(record_type: RecordType, refinement: Option<QueryRefinement>) -> Self {
        Self {
            record_type,
            refinement,
        }
    }

    pub fn record_type(&self) -> &RecordType {
        &self.record_type
    }

    pub fn refinement(&self) -> Option<&QueryRefinement> {
        self.refinement.as_ref()
    }

    /// 生成最终查询：记录类型对应表的全量查询，经细化回调（若有）调整
    pub fn query(&self) -> Query {
        let base = Query::table(self.record_type.table());
        match &self.refinement {
            Some(refine) => refine(base),
            None => base,
        }
    }
}

impl fmt::Debug for SourceDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SourceDescriptor")
            .field("record_type", &self.record_type)
            .field("refinement", &self.refinement.is_some())
            .finish()
    }
}

// ==========================================
// MigrationOptions - 可选迁移设置
// ==========================================
#[derive(Clone, Default)]
pub struct MigrationOptions {
    /// 字段白名单（有序）
    pub fields: Option<Vec<String>>,

    /// 字段重命名映射
    pub field_map: Option<FieldMap>,

    /// 逐行变换
    pub row_transformation: Option<RowTransformation>,
}

impl MigrationOptions {
    /// 是否未设置任何可选项
    pub fn is_empty(&self) -> bool {
        self.fields.is_none() && self.field_map.is_none() && self.row_transformation.is_none()
    }

    /// 逐行整形（迁移器写入前必须调用）
    ///
    /// # 顺序
    /// 1. 字段白名单裁剪（按白名单顺序输出）
    /// 2. 字段重命名
    /// 3. 逐行变换回调
    ///
    /// 未设置的步骤直接跳过，全部未设置时原样返回。
    pub fn shape_row(&self, mut row: DataRow) -> DataRow {
        if let Some(fields) = &self.fields {
            row.retain_fields(fields);
        }

        if let Some(field_map) = &self.field_map {
            row.apply_field_map(field_map);
        }

        match &self.row_transformation {
            Some(transform) => transform(row),
            None => row,
        }
    }
}

impl fmt::Debug for MigrationOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MigrationOptions")
            .field("fields", &self.fields)
            .field("field_map", &self.field_map)
            .field("row_transformation", &self.row_transformation.is_some())
            .finish()
    }
}

// ==========================================
// MigrationJob - 迁移任务
// ==========================================
/// 一次 save 调用生成的迁移任务，交由迁移器整体执行
pub struct MigrationJob {
    pub id: Uuid,
    pub source: Box<dyn RecordSource>,
    pub destination: Box<dyn Destination>,
    pub options: MigrationOptions,
}

impl fmt::Debug for MigrationJob {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MigrationJob")
            .field("id", &self.id)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

// ==========================================
// 执行结果
// ==========================================

/// 迁移器返回的统计
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MigrationSummary {
    pub rows_migrated: u64,
}

/// 一次成功 save 的结果记录
#[derive(Debug, Clone, Serialize)]
pub struct ReportOutcome {
    pub job_id: Uuid,
    pub record_type: RecordType,
    pub format: String,
    pub filename: PathBuf,
    pub rows_migrated: u64,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl ReportOutcome {
    pub fn elapsed_ms(&self) -> i64 {
        (self.finished_at - self.started_at).num_milliseconds()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::FieldValue;
    use std::collections::HashMap;
    use std::sync::Arc;

    fn user_row() -> DataRow {
        DataRow::new()
            .with("id", 1i64)
            .with("name", "Ada")
            .with("email", "ada@example.com")
    }

    #[test]
    fn test_descriptor_query_without_refinement() {
        let descriptor = SourceDescriptor::new(RecordType::new("User", "users"), None);

        let query = descriptor.query();
        assert_eq!(query.table_name(), "users");
        assert!(query.is_unrestricted());
    }

    #[test]
    fn test_descriptor_query_with_refinement() {
        let refine: QueryRefinement = Arc::new(|q: Query| q.where_eq("active", true));
        let descriptor = SourceDescriptor::new(RecordType::new("User", "users"), Some(refine));

        let query = descriptor.query();
        assert_eq!(query.filters().len(), 1);
        assert_eq!(query.filters()[0].field, "active");
    }

    #[test]
    fn test_shape_row_passthrough() {
        let options = MigrationOptions::default();

        assert!(options.is_empty());
        assert_eq!(options.shape_row(user_row()), user_row());
    }

    #[test]
    fn test_shape_row_order_fields_then_map_then_transform() {
        let mut field_map = HashMap::new();
        field_map.insert("email".to_string(), "Email".to_string());

        let options = MigrationOptions {
            fields: Some(vec!["email".to_string(), "id".to_string()]),
            field_map: Some(field_map),
            // 变换回调看到的是重命名后的字段
            row_transformation: Some(Arc::new(|mut row: DataRow| {
                if let Some(FieldValue::Text(email)) = row.get("Email").cloned() {
                    row.set("Email", email.to_uppercase());
                }
                row
            })),
        };

        let shaped = options.shape_row(user_row());

        assert_eq!(shaped.field_names(), vec!["Email", "id"]);
        assert_eq!(
            shaped.get("Email"),
            Some(&FieldValue::Text("ADA@EXAMPLE.COM".to_string()))
        );
    }

    #[test]
    fn test_options_debug_hides_closure() {
        let options = MigrationOptions {
            row_transformation: Some(Arc::new(|row: DataRow| row)),
            ..Default::default()
        };

        let debug = format!("{:?}", options);
        assert!(debug.contains("row_transformation: true"));
    }
}
