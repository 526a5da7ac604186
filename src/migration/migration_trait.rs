// ==========================================
// 模型记录报表导出 - 迁移协作接口 Trait
// ==========================================
// 职责: 定义记录源 / 目标端 / 迁移器接口（不包含实现）
// 红线: ORM 查询、文件格式写入、分批迁移算法均由外部实现者负责
// ==========================================

use crate::domain::DataRow;
use crate::migration::job::{MigrationJob, MigrationSummary, SourceDescriptor};
use crate::report::error::BoxError;

/// 惰性行序列
pub type RowStream<'a> = Box<dyn Iterator<Item = Result<DataRow, BoxError>> + 'a>;

// ==========================================
// RecordSource Trait
// ==========================================
// 用途: 按查询描述产出记录
// 实现者: 外部 ORM 适配层
pub trait RecordSource: Send {
    /// 记录源可提供的全部字段名（按源定义顺序）
    fn field_names(&self) -> Result<Vec<String>, BoxError>;

    /// 产出惰性行序列
    ///
    /// # 参数
    /// - fields: 需要读取的字段（None 表示全部字段）
    ///
    /// # 返回
    /// - Ok(RowStream): 行序列，单行读取失败以 Err 项给出
    /// - Err: 查询无法开始
    fn rows(&mut self, fields: Option<&[String]>) -> Result<RowStream<'_>, BoxError>;
}

// ==========================================
// RecordSourceProvider Trait
// ==========================================
// 用途: 由 (记录类型, 查询细化回调) 构造记录源
// 实现者: 外部 ORM 适配层
pub trait RecordSourceProvider: Send + Sync {
    /// 打开记录源
    ///
    /// # 参数
    /// - descriptor: 记录类型 + 可选查询细化回调
    ///
    /// # 返回
    /// - Ok(Box<dyn RecordSource>): 已绑定查询的记录源
    /// - Err: 记录类型未知、连接失败等
    fn open(&self, descriptor: SourceDescriptor) -> Result<Box<dyn RecordSource>, BoxError>;
}

// ==========================================
// Destination Trait
// ==========================================
// 用途: 报表目标端（绑定具体文件与格式）
// 实现者: 外部格式实现（CSV / Excel 等）
// 资源释放: 实现者需在 Drop 中保证文件句柄释放（含迁移中途失败）
pub trait Destination: Send {
    /// 写入一批已整形的数据行
    fn put_rows(&mut self, rows: &[DataRow]) -> Result<(), BoxError>;

    /// 全部写入后收尾（刷新缓冲、写尾部等）
    fn finish(&mut self) -> Result<(), BoxError> {
        Ok(())
    }
}

// ==========================================
// Migrator Trait
// ==========================================
// 用途: 执行完整的抽取-变换-写入
// 实现者: 外部迁移库
pub trait Migrator: Send + Sync {
    /// 同步执行迁移任务
    ///
    /// # 约定
    /// - 每一行写入目标端前必须经过 `job.options.shape_row`
    /// - 任一步骤失败即返回 Err，不做部分成功语义
    fn migrate(&self, job: MigrationJob) -> Result<MigrationSummary, BoxError>;
}
