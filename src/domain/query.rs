// ==========================================
// 模型记录报表导出 - 查询描述
// ==========================================
// 职责: 描述记录筛选条件（过滤 / 排序 / 分页），供查询细化回调链式调整
// 红线: 本模块只描述查询，不执行查询；解释权归记录源提供者
// ==========================================

use crate::domain::data_row::FieldValue;
use std::fmt;

/// 过滤运算符
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Eq,
    NotEq,
    Lt,
    Lte,
    Gt,
    Gte,
    Like,
    IsNull,
    IsNotNull,
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbol = match self {
            Operator::Eq => "=",
            Operator::NotEq => "<>",
            Operator::Lt => "<",
            Operator::Lte => "<=",
            Operator::Gt => ">",
            Operator::Gte => ">=",
            Operator::Like => "LIKE",
            Operator::IsNull => "IS NULL",
            Operator::IsNotNull => "IS NOT NULL",
        };
        write!(f, "{}", symbol)
    }
}

/// 排序方向
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Asc,
    Desc,
}

/// 单个过滤条件
#[derive(Debug, Clone, PartialEq)]
pub struct Filter {
    pub field: String,
    pub operator: Operator,
    pub value: FieldValue,
}

impl Filter {
    pub fn new(field: impl Into<String>, operator: Operator, value: impl Into<FieldValue>) -> Self {
        Self {
            field: field.into(),
            operator,
            value: value.into(),
        }
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.operator {
            Operator::IsNull | Operator::IsNotNull => write!(f, "{} {}", self.field, self.operator),
            _ => match &self.value {
                FieldValue::Null => write!(f, "{} {} NULL", self.field, self.operator),
                FieldValue::Text(text) => {
                    write!(f, "{} {} '{}'", self.field, self.operator, text.replace('\'', "''"))
                }
                value => write!(f, "{} {} {}", self.field, self.operator, value),
            },
        }
    }
}

/// 查询描述（流式 API）
///
/// 查询细化回调的签名为 `Fn(Query) -> Query`，因此所有构建方法都按值消费并返回自身。
///
/// # 示例
/// ```
/// use record_report::domain::{Direction, Query};
///
/// let query = Query::table("users")
///     .where_eq("active", true)
///     .where_null("deleted_at")
///     .order_by("id", Direction::Asc)
///     .limit(100);
///
/// assert_eq!(query.filters().len(), 2);
/// assert_eq!(query.limit_value(), Some(100));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    table: String,
    filters: Vec<Filter>,
    order_by: Vec<(String, Direction)>,
    limit: Option<usize>,
    offset: Option<usize>,
}

impl Query {
    /// 创建面向某张表的全量查询
    pub fn table(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            filters: Vec::new(),
            order_by: Vec::new(),
            limit: None,
            offset: None,
        }
    }

    /// 添加过滤条件
    pub fn filter(
        mut self,
        field: impl Into<String>,
        operator: Operator,
        value: impl Into<FieldValue>,
    ) -> Self {
        self.filters.push(Filter::new(field, operator, value));
        self
    }

    pub fn where_eq(self, field: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.filter(field, Operator::Eq, value)
    }

    pub fn where_null(self, field: impl Into<String>) -> Self {
        self.filter(field, Operator::IsNull, FieldValue::Null)
    }

    pub fn where_not_null(self, field: impl Into<String>) -> Self {
        self.filter(field, Operator::IsNotNull, FieldValue::Null)
    }

    /// 条件添加过滤
    pub fn and_if(mut self, filter: Option<Filter>) -> Self {
        if let Some(filter) = filter {
            self.filters.push(filter);
        }
        self
    }

    /// 追加排序键（可多次调用，按调用顺序生效）
    pub fn order_by(mut self, field: impl Into<String>, direction: Direction) -> Self {
        self.order_by.push((field.into(), direction));
        self
    }

    pub fn limit(mut self, n: usize) -> Self {
        self.limit = Some(n);
        self
    }

    pub fn offset(mut self, n: usize) -> Self {
        self.offset = Some(n);
        self
    }

    pub fn table_name(&self) -> &str {
        &self.table
    }

    pub fn filters(&self) -> &[Filter] {
        &self.filters
    }

    pub fn ordering(&self) -> &[(String, Direction)] {
        &self.order_by
    }

    pub fn limit_value(&self) -> Option<usize> {
        self.limit
    }

    pub fn offset_value(&self) -> Option<usize> {
        self.offset
    }

    /// 是否为未加任何限制的全量查询
    pub fn is_unrestricted(&self) -> bool {
        self.filters.is_empty() && self.limit.is_none() && self.offset.is_none()
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.table)?;

        if !self.filters.is_empty() {
            let conditions: Vec<String> = self.filters.iter().map(|c| c.to_string()).collect();
            write!(f, " WHERE {}", conditions.join(" AND "))?;
        }

        if !self.order_by.is_empty() {
            let keys: Vec<String> = self
                .order_by
                .iter()
                .map(|(field, dir)| match dir {
                    Direction::Asc => format!("{} ASC", field),
                    Direction::Desc => format!("{} DESC", field),
                })
                .collect();
            write!(f, " ORDER BY {}", keys.join(", "))?;
        }

        if let Some(limit) = self.limit {
            write!(f, " LIMIT {}", limit)?;
        }

        if let Some(offset) = self.offset {
            write!(f, " OFFSET {}", offset)?;
        }

        Ok(())
    }
}
