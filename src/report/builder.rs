// ==========================================
// 模型记录报表导出 - 报表构建器
// ==========================================
// 职责: 累积导出配置，save 时组装迁移任务并委托迁移器执行
// 流程: 记录源 → 目标端 → 迁移任务 → 迁移执行
// 红线: 不做 I/O、不解析、不序列化；任何失败统一包装为 ReportGenerationError
// ==========================================

use crate::config::{ConfigError, ReportConfig};
use crate::domain::{
    DataRow, FieldMap, Query, QueryRefinement, RecordType, RowTransformation,
};
use crate::migration::{
    MigrationJob, MigrationOptions, Migrator, RecordSourceProvider, ReportOutcome,
    SourceDescriptor,
};
use crate::report::error::{BoxError, BuilderError, ReportGenerationError, ReportResult};
use crate::report::format::ReportFormat;
use chrono::Utc;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, error, info, info_span};
use uuid::Uuid;

/// 构建器状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuilderState {
    /// 尚未执行 save
    Configuring,
    /// 最近一次 save 成功
    Executed,
    /// 最近一次 save 失败
    Failed,
}

// ==========================================
// ReportBuilder - 报表构建器
// ==========================================
/// 报表构建器
///
/// 所有 setter 返回 `&mut Self` 以便链式调用。`save` 可重复调用，
/// 每次都按调用时的配置重新导出，并生成新的任务 ID。
///
/// # 示例
/// ```ignore
/// generator
///     .report::<User>()
///     .set_format(CsvFormat)
///     .set_fields(["id", "email"])
///     .save("users.csv")?;
/// ```
pub struct ReportBuilder {
    record_type: RecordType,
    sources: Arc<dyn RecordSourceProvider>,
    migrator: Arc<dyn Migrator>,
    config: ReportConfig,

    format: Option<Box<dyn ReportFormat>>,
    query_refinement: Option<QueryRefinement>,
    row_transformation: Option<RowTransformation>,
    fields: Option<Vec<String>>,
    field_map: Option<FieldMap>,

    state: BuilderState,
    last_outcome: Option<ReportOutcome>,
}

impl ReportBuilder {
    /// 创建构建器
    ///
    /// # 参数
    /// - record_type: 导出的记录类型（构造后不可更改）
    /// - sources: 记录源提供者
    /// - migrator: 迁移器
    pub fn new(
        record_type: RecordType,
        sources: Arc<dyn RecordSourceProvider>,
        migrator: Arc<dyn Migrator>,
    ) -> Self {
        Self {
            record_type,
            sources,
            migrator,
            config: ReportConfig::default(),
            format: None,
            query_refinement: None,
            row_transformation: None,
            fields: None,
            field_map: None,
            state: BuilderState::Configuring,
            last_outcome: None,
        }
    }

    /// 替换输出配置（由 ReportGenerator 注入）
    pub fn with_config(mut self, config: ReportConfig) -> Self {
        self.config = config;
        self
    }

    // ==========================================
    // 配置 setter
    // ==========================================

    /// 设置报表格式策略（不做校验）
    pub fn set_format<F>(&mut self, format: F) -> &mut Self
    where
        F: ReportFormat + 'static,
    {
        self.format = Some(Box::new(format));
        self
    }

    /// 设置查询细化回调
    pub fn set_query_refinement<F>(&mut self, refinement: F) -> &mut Self
    where
        F: Fn(Query) -> Query + Send + Sync + 'static,
    {
        self.query_refinement = Some(Arc::new(refinement));
        self
    }

    /// 设置逐行变换回调
    pub fn set_row_transformation<F>(&mut self, transformation: F) -> &mut Self
    where
        F: Fn(DataRow) -> DataRow + Send + Sync + 'static,
    {
        self.row_transformation = Some(Arc::new(transformation));
        self
    }

    /// 设置字段白名单（有序）
    pub fn set_fields<I, S>(&mut self, fields: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fields = Some(fields.into_iter().map(Into::into).collect());
        self
    }

    /// 设置字段重命名映射
    pub fn set_field_map<I, K, V>(&mut self, field_map: I) -> &mut Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.field_map = Some(
            field_map
                .into_iter()
                .map(|(from, to)| (from.into(), to.into()))
                .collect(),
        );
        self
    }

    // ==========================================
    // 状态查询
    // ==========================================

    pub fn record_type(&self) -> &RecordType {
        &self.record_type
    }

    pub fn config(&self) -> &ReportConfig {
        &self.config
    }

    pub fn fields(&self) -> Option<&[String]> {
        self.fields.as_deref()
    }

    pub fn field_map(&self) -> Option<&FieldMap> {
        self.field_map.as_ref()
    }

    pub fn has_format(&self) -> bool {
        self.format.is_some()
    }

    pub fn has_query_refinement(&self) -> bool {
        self.query_refinement.is_some()
    }

    pub fn has_row_transformation(&self) -> bool {
        self.row_transformation.is_some()
    }

    pub fn state(&self) -> BuilderState {
        self.state
    }

    /// 最近一次成功 save 的结果
    pub fn last_outcome(&self) -> Option<&ReportOutcome> {
        self.last_outcome.as_ref()
    }

    // ==========================================
    // 执行
    // ==========================================

    /// 保存报表（触发导出）
    ///
    /// # 参数
    /// - filename: 目标文件名（经 ReportConfig 解析）
    ///
    /// # 返回
    /// - Ok(&mut Self): 构建器自身
    /// - Err(ReportGenerationError): 任一步骤失败，原始错误作为 cause
    pub fn save(&mut self, filename: impl AsRef<Path>) -> ReportResult<&mut Self> {
        let job_id = Uuid::new_v4();
        let filename = filename.as_ref();

        let span = info_span!(
            "report_save",
            job_id = %job_id,
            record_type = %self.record_type,
        );
        let _guard = span.enter();

        info!(filename = %filename.display(), "开始生成报表");

        match self.generate(job_id, filename) {
            Ok(outcome) => {
                info!(
                    rows_migrated = outcome.rows_migrated,
                    elapsed_ms = outcome.elapsed_ms(),
                    "报表生成完成"
                );
                self.state = BuilderState::Executed;
                self.last_outcome = Some(outcome);
                Ok(self)
            }
            Err(cause) => {
                error!(error = %cause, "报表生成失败");
                self.state = BuilderState::Failed;
                Err(ReportGenerationError::new(cause))
            }
        }
    }

    /// 组装迁移任务并交由迁移器执行
    fn generate(&self, job_id: Uuid, filename: &Path) -> Result<ReportOutcome, BoxError> {
        let started_at = Utc::now();

        let format = self.format.as_ref().ok_or(BuilderError::FormatNotSet)?;
        let filename = self.config.resolve_filename(filename)?;
        debug!(resolved = %filename.display(), "输出路径已解析");

        // === 步骤 1: 记录源 ===
        debug!("步骤 1: 打开记录源");
        let descriptor = SourceDescriptor::new(
            self.record_type.clone(),
            self.query_refinement.clone(),
        );
        let source = self.sources.open(descriptor)?;

        // === 步骤 2: 目标端 ===
        debug!(format = format.name(), "步骤 2: 创建目标端");
        let destination = format.destination(&filename)?;

        // === 步骤 3: 迁移任务 ===
        let options = self.migration_options();
        debug!(options = ?options, "步骤 3: 组装迁移任务");
        let job = MigrationJob {
            id: job_id,
            source,
            destination,
            options,
        };

        // === 步骤 4: 迁移执行 ===
        debug!("步骤 4: 执行迁移");
        let summary = self.migrator.migrate(job)?;

        Ok(ReportOutcome {
            job_id,
            record_type: self.record_type.clone(),
            format: format.name().to_string(),
            filename,
            rows_migrated: summary.rows_migrated,
            started_at,
            finished_at: Utc::now(),
        })
    }

    /// 可选项仅在非空时下发
    fn migration_options(&self) -> MigrationOptions {
        MigrationOptions {
            fields: self.fields.clone().filter(|f| !f.is_empty()),
            field_map: self.field_map.clone().filter(|m| !m.is_empty()),
            row_transformation: self.row_transformation.clone(),
        }
    }

    /// 解析后的输出路径（不触发导出）
    pub fn resolved_filename(&self, filename: impl AsRef<Path>) -> Result<PathBuf, ConfigError> {
        self.config.resolve_filename(filename.as_ref())
    }
}

impl fmt::Debug for ReportBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReportBuilder")
            .field("record_type", &self.record_type)
            .field("format", &self.format.as_ref().map(|format| format.name().to_string()))
            .field("query_refinement", &self.query_refinement.is_some())
            .field("row_transformation", &self.row_transformation.is_some())
            .field("fields", &self.fields)
            .field("field_map", &self.field_map)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::migration::{Destination, MigrationSummary, RecordSource, RowStream};
    use std::sync::Mutex;

    // ==========================================
    // 最小测试替身
    // ==========================================

    struct EmptySource;

    impl RecordSource for EmptySource {
        fn field_names(&self) -> Result<Vec<String>, BoxError> {
            Ok(Vec::new())
        }

        fn rows(&mut self, _fields: Option<&[String]>) -> Result<RowStream<'_>, BoxError> {
            Ok(Box::new(std::iter::empty()))
        }
    }

    #[derive(Default)]
    struct CountingProvider {
        opened: Mutex<Vec<String>>,
    }

    impl RecordSourceProvider for CountingProvider {
        fn open(&self, descriptor: SourceDescriptor) -> Result<Box<dyn RecordSource>, BoxError> {
            self.opened
                .lock()
                .unwrap()
                .push(descriptor.query().to_string());
            Ok(Box::new(EmptySource))
        }
    }

    struct NullDestination;

    impl Destination for NullDestination {
        fn put_rows(&mut self, _rows: &[DataRow]) -> Result<(), BoxError> {
            Ok(())
        }
    }

    struct NullFormat;

    impl ReportFormat for NullFormat {
        fn name(&self) -> &str {
            "null"
        }

        fn destination(&self, _filename: &Path) -> Result<Box<dyn Destination>, BoxError> {
            Ok(Box::new(NullDestination))
        }
    }

    #[derive(Default)]
    struct OptionsCapture {
        seen: Mutex<Vec<MigrationOptions>>,
    }

    impl Migrator for OptionsCapture {
        fn migrate(&self, job: MigrationJob) -> Result<MigrationSummary, BoxError> {
            self.seen.lock().unwrap().push(job.options);
            Ok(MigrationSummary { rows_migrated: 3 })
        }
    }

    fn builder() -> (ReportBuilder, Arc<CountingProvider>, Arc<OptionsCapture>) {
        let provider = Arc::new(CountingProvider::default());
        let migrator = Arc::new(OptionsCapture::default());
        let builder = ReportBuilder::new(
            RecordType::new("User", "users"),
            provider.clone(),
            migrator.clone(),
        );
        (builder, provider, migrator)
    }

    #[test]
    fn test_initial_state() {
        let (builder, _, _) = builder();

        assert_eq!(builder.state(), BuilderState::Configuring);
        assert!(!builder.has_format());
        assert!(builder.fields().is_none());
        assert!(builder.last_outcome().is_none());
    }

    #[test]
    fn test_missing_format_fails_before_opening_source() {
        let (mut builder, provider, _) = builder();

        let err = builder.save("users.csv").unwrap_err();

        assert_eq!(
            err.downcast_cause::<BuilderError>(),
            Some(&BuilderError::FormatNotSet)
        );
        assert!(provider.opened.lock().unwrap().is_empty());
        assert_eq!(builder.state(), BuilderState::Failed);
    }

    #[test]
    fn test_resolved_filename_follows_config() {
        let (builder, provider, _) = builder();
        let builder = builder.with_config(ReportConfig {
            output_dir: Some(PathBuf::from("/srv/reports")),
            timestamp_format: None,
        });

        assert_eq!(
            builder.resolved_filename("users.csv").unwrap(),
            PathBuf::from("/srv/reports/users.csv")
        );
        assert!(provider.opened.lock().unwrap().is_empty());
    }

    #[test]
    fn test_invalid_timestamp_format_wrapped_by_save() {
        let (builder, provider, migrator) = builder();
        let mut builder = builder.with_config(ReportConfig {
            output_dir: None,
            timestamp_format: Some("%Q".to_string()),
        });
        builder.set_format(NullFormat);

        assert!(builder.resolved_filename("users.csv").is_err());

        let err = builder.save("users.csv").unwrap_err();

        assert_eq!(err.to_string(), "Error generating report.");
        assert!(matches!(
            err.downcast_cause::<ConfigError>(),
            Some(ConfigError::InvalidValue { .. })
        ));
        assert!(provider.opened.lock().unwrap().is_empty());
        assert!(migrator.seen.lock().unwrap().is_empty());
        assert_eq!(builder.state(), BuilderState::Failed);
    }

    #[test]
    fn test_empty_fields_and_map_not_forwarded() {
        let (mut builder, _, migrator) = builder();

        builder
            .set_format(NullFormat)
            .set_fields(Vec::<String>::new())
            .set_field_map(Vec::<(String, String)>::new());
        builder.save("users.csv").unwrap();

        let seen = migrator.seen.lock().unwrap();
        assert!(seen[0].is_empty());
    }

    #[test]
    fn test_refinement_reaches_provider() {
        let (mut builder, provider, _) = builder();

        builder
            .set_format(NullFormat)
            .set_query_refinement(|q| q.where_eq("active", true).limit(10));
        builder.save("users.csv").unwrap();

        let opened = provider.opened.lock().unwrap();
        assert_eq!(opened[0], "users WHERE active = true LIMIT 10");
    }

    #[test]
    fn test_outcome_recorded() {
        let (mut builder, _, _) = builder();

        builder.set_format(NullFormat).save("users.csv").unwrap();

        let outcome = builder.last_outcome().unwrap();
        assert_eq!(outcome.rows_migrated, 3);
        assert_eq!(outcome.format, "null");
        assert_eq!(outcome.filename, PathBuf::from("users.csv"));
        assert!(outcome.finished_at >= outcome.started_at);
        assert_eq!(builder.state(), BuilderState::Executed);
    }

    #[test]
    fn test_debug_output() {
        let (mut builder, _, _) = builder();
        builder.set_format(NullFormat);

        let debug = format!("{:?}", builder);
        assert!(debug.contains("Some(\"null\")"));
        assert!(debug.contains("Configuring"));
    }
}
