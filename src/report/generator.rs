// ==========================================
// 模型记录报表导出 - 报表生成入口
// ==========================================
// 职责: 持有记录源提供者 / 迁移器 / 输出配置，按记录类型发放构建器
// ==========================================

use crate::config::ReportConfig;
use crate::domain::{Model, RecordType};
use crate::migration::{Migrator, RecordSourceProvider};
use crate::report::builder::ReportBuilder;
use std::sync::Arc;
use tracing::debug;

// ==========================================
// ReportGenerator - 报表生成入口
// ==========================================
#[derive(Clone)]
pub struct ReportGenerator {
    sources: Arc<dyn RecordSourceProvider>,
    migrator: Arc<dyn Migrator>,
    config: ReportConfig,
}

impl ReportGenerator {
    /// 创建报表生成入口（使用默认配置）
    ///
    /// # 参数
    /// - sources: 记录源提供者
    /// - migrator: 迁移器
    pub fn new(sources: Arc<dyn RecordSourceProvider>, migrator: Arc<dyn Migrator>) -> Self {
        Self {
            sources,
            migrator,
            config: ReportConfig::default(),
        }
    }

    /// 替换输出配置
    pub fn with_config(mut self, config: ReportConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &ReportConfig {
        &self.config
    }

    /// 为模型类型创建构建器
    pub fn report<M: Model>(&self) -> ReportBuilder {
        self.report_for(RecordType::of::<M>())
    }

    /// 为记录类型创建构建器
    pub fn report_for(&self, record_type: RecordType) -> ReportBuilder {
        debug!(record_type = %record_type, "创建报表构建器");
        ReportBuilder::new(record_type, self.sources.clone(), self.migrator.clone())
            .with_config(self.config.clone())
    }
}
