// ==========================================
// 模型记录报表导出 - 数据行
// ==========================================
// 职责: 记录源产出、目标端写入之间流转的有序数据行
// 红线: 字段顺序即输出列顺序，任何操作不得打乱未涉及字段的位置
// ==========================================

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Serialize, Serializer};
use std::fmt;

// ==========================================
// FieldValue - 字段值
// ==========================================
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Null,
    Bool(bool),
    Integer(i64),
    Real(f64),
    Text(String),
    Date(NaiveDate),
    DateTime(DateTime<Utc>),
}

impl FieldValue {
    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            FieldValue::Integer(v) => Some(*v),
            _ => None,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Null => Ok(()),
            FieldValue::Bool(v) => write!(f, "{}", v),
            FieldValue::Integer(v) => write!(f, "{}", v),
            FieldValue::Real(v) => write!(f, "{}", v),
            FieldValue::Text(v) => write!(f, "{}", v),
            FieldValue::Date(v) => write!(f, "{}", v.format("%Y-%m-%d")),
            FieldValue::DateTime(v) => write!(f, "{}", v.to_rfc3339()),
        }
    }
}

// 目标端按自身格式序列化，这里只给出无标签的自然形态
impl Serialize for FieldValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            FieldValue::Null => serializer.serialize_none(),
            FieldValue::Bool(v) => serializer.serialize_bool(*v),
            FieldValue::Integer(v) => serializer.serialize_i64(*v),
            FieldValue::Real(v) => serializer.serialize_f64(*v),
            FieldValue::Text(v) => serializer.serialize_str(v),
            FieldValue::Date(v) => v.serialize(serializer),
            FieldValue::DateTime(v) => v.serialize(serializer),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Integer(value)
    }
}

impl From<i32> for FieldValue {
    fn from(value: i32) -> Self {
        FieldValue::Integer(value as i64)
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Real(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Bool(value)
    }
}

impl From<NaiveDate> for FieldValue {
    fn from(value: NaiveDate) -> Self {
        FieldValue::Date(value)
    }
}

impl From<DateTime<Utc>> for FieldValue {
    fn from(value: DateTime<Utc>) -> Self {
        FieldValue::DateTime(value)
    }
}

impl<T: Into<FieldValue>> From<Option<T>> for FieldValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(FieldValue::Null)
    }
}

// ==========================================
// DataRow - 有序数据行
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DataRow {
    fields: Vec<(String, FieldValue)>,
}

impl DataRow {
    pub fn new() -> Self {
        Self::default()
    }

    /// 链式追加字段（构造测试数据/记录源产出时使用）
    pub fn with(mut self, name: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.set(name, value);
        self
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields
            .iter()
            .find(|(field, _)| field == name)
            .map(|(_, value)| value)
    }

    /// 设置字段值：已存在则原位替换，否则追加到末尾
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<FieldValue>) {
        let name = name.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(field, _)| *field == name) {
            Some((_, slot)) => *slot = value,
            None => self.fields.push((name, value)),
        }
    }

    pub fn remove(&mut self, name: &str) -> Option<FieldValue> {
        let idx = self.fields.iter().position(|(field, _)| field == name)?;
        Some(self.fields.remove(idx).1)
    }

    /// 原位重命名字段，返回是否找到该字段
    pub fn rename(&mut self, from: &str, to: impl Into<String>) -> bool {
        match self.fields.iter_mut().find(|(field, _)| field == from) {
            Some((field, _)) => {
                *field = to.into();
                true
            }
            None => false,
        }
    }

    pub fn field_names(&self) -> Vec<&str> {
        self.fields.iter().map(|(field, _)| field.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.fields.iter().map(|(field, value)| (field.as_str(), value))
    }

    /// 仅保留白名单字段，顺序按白名单排列；行内缺失的字段直接跳过
    pub fn retain_fields(&mut self, allow_list: &[String]) {
        let mut retained = Vec::with_capacity(allow_list.len());
        for name in allow_list {
            if let Some(idx) = self.fields.iter().position(|(field, _)| field == name) {
                retained.push(self.fields.swap_remove(idx));
            }
        }
        self.fields = retained;
    }

    /// 按映射重命名字段，未映射字段保持原名与原位置
    ///
    /// # 冲突规则
    /// - 重命名后的列优先：与某个目标名同名的未映射列被丢弃
    /// - 多个列映射到同一目标名时，保留行内位置靠前的一列
    /// - 互换（a → b, b → a）不算冲突
    pub fn apply_field_map<'a, I>(&mut self, field_map: I)
    where
        I: IntoIterator<Item = (&'a String, &'a String)>,
    {
        let renames: Vec<(&String, &String)> = field_map.into_iter().collect();
        let fields = std::mem::take(&mut self.fields);

        let mut renamed = Vec::with_capacity(fields.len());
        for (field, value) in fields {
            match renames.iter().find(|(from, _)| from.as_str() == field.as_str()) {
                Some((_, to)) => renamed.push(((*to).clone(), value, true)),
                None => renamed.push((field, value, false)),
            }
        }

        let mut seen: Vec<String> = Vec::with_capacity(renamed.len());
        for (name, value, was_renamed) in renamed {
            if !was_renamed && renames.iter().any(|(_, to)| to.as_str() == name.as_str()) {
                continue;
            }
            if seen.contains(&name) {
                continue;
            }
            seen.push(name.clone());
            self.fields.push((name, value));
        }
    }
}

impl IntoIterator for DataRow {
    type Item = (String, FieldValue);
    type IntoIter = std::vec::IntoIter<(String, FieldValue)>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.into_iter()
    }
}

impl<K: Into<String>, V: Into<FieldValue>> FromIterator<(K, V)> for DataRow {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut row = DataRow::new();
        for (name, value) in iter {
            row.set(name, value);
        }
        row
    }
}
