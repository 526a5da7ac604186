// ==========================================
// ReportGenerator 端到端测试
// ==========================================
// 测试目标: 入口发放构建器 → 配置解析文件名 → 迁移器整形写入
// ==========================================


use chrono::Utc;
use record_report::config::{ConfigError, ReportConfig};
use record_report::domain::{Direction, FieldValue, RecordType};
use record_report::logging;
use record_report::report::{BuilderState, ReportGenerator};
use std::path::PathBuf;
use std::sync::Arc;
use test_helpers::{InMemoryProvider, PassThroughMigrator, RecordingFormat, User};

fn setup_generator() -> (ReportGenerator, Arc<InMemoryProvider>, Arc<PassThroughMigrator>) {
    logging::init_test();

    let provider = Arc::new(InMemoryProvider::with_users());
    let migrator = Arc::new(PassThroughMigrator::with_batch_size(1));
    let generator = ReportGenerator::new(provider.clone(), migrator.clone());
    (generator, provider, migrator)
}

#[test]
fn test_generator_full_pipeline() {
    let (generator, provider, migrator) = setup_generator();
    let format = RecordingFormat::new();

    let mut builder = generator.report::<User>();
    builder
        .set_format(format.clone())
        .set_query_refinement(|q| q.where_eq("active", true).order_by("id", Direction::Desc))
        .set_fields(["email", "name"])
        .set_field_map([("email", "Email"), ("name", "Name")])
        .set_row_transformation(|mut row| {
            if let Some(FieldValue::Text(name)) = row.get("Name").cloned() {
                row.set("Name", name.to_uppercase());
            }
            row
        })
        .save("users.csv")
        .expect("保存失败");

    // 记录源收到细化后的查询
    let query = &provider.opened_queries()[0];
    assert_eq!(query.ordering(), &[("id".to_string(), Direction::Desc)]);

    // 迁移器收到全部可选项
    let job = &migrator.jobs()[0];
    assert_eq!(job.fields, Some(vec!["email".to_string(), "name".to_string()]));
    assert_eq!(job.field_map.as_ref().map(|m| m.len()), Some(2));
    assert!(job.has_row_transformation);

    // 白名单 → 重命名 → 变换
    let written = format.written_rows();
    assert_eq!(written.len(), 2);
    assert_eq!(written[0].field_names(), vec!["Email", "Name"]);
    assert_eq!(written[0].get("Name"), Some(&FieldValue::Text("ADA".to_string())));
    assert_eq!(written[1].get("Name"), Some(&FieldValue::Text("LINUS".to_string())));

    let outcome = builder.last_outcome().expect("缺少执行结果");
    assert_eq!(outcome.record_type, RecordType::of::<User>());
    assert_eq!(outcome.rows_migrated, 2);
    assert_eq!(outcome.format, "csv");
    assert_eq!(builder.state(), BuilderState::Executed);
}

#[test]
fn test_generator_applies_output_dir() {
    let (generator, _, _) = setup_generator();
    let generator = generator.with_config(ReportConfig {
        output_dir: Some(PathBuf::from("/srv/reports")),
        timestamp_format: None,
    });
    let format = RecordingFormat::new();

    generator
        .report::<User>()
        .set_format(format.clone())
        .save("users.csv")
        .expect("保存失败");

    assert_eq!(
        format.destination_paths(),
        vec![PathBuf::from("/srv/reports/users.csv")]
    );
}

#[test]
fn test_generator_applies_timestamp_suffix() {
    let (generator, _, _) = setup_generator();
    let generator = generator.with_config(ReportConfig {
        output_dir: None,
        timestamp_format: Some("%Y".to_string()),
    });
    let format = RecordingFormat::new();

    let mut builder = generator.report::<User>();
    builder.set_format(format.clone()).save("users.csv").expect("保存失败");

    let expected = format!("users_{}.csv", Utc::now().format("%Y"));
    assert_eq!(format.destination_paths(), vec![PathBuf::from(&expected)]);
    assert_eq!(builder.last_outcome().unwrap().filename, PathBuf::from(expected));
}

#[test]
fn test_generator_builders_are_independent() {
    let (generator, _, migrator) = setup_generator();

    let mut first = generator.report::<User>();
    let mut second = generator.report_for(RecordType::new("User", "users"));

    first.set_format(RecordingFormat::new()).set_fields(["id"]);
    second.set_format(RecordingFormat::new());

    first.save("first.csv").expect("保存失败");
    second.save("second.csv").expect("保存失败");

    let jobs = migrator.jobs();
    assert_eq!(jobs.len(), 2);
    assert_eq!(jobs[0].fields, Some(vec!["id".to_string()]));
    assert!(jobs[1].fields.is_none());
    assert_ne!(jobs[0].job_id, jobs[1].job_id);
}

#[test]
fn test_unknown_record_type_fails() {
    let (generator, _, migrator) = setup_generator();

    let result = generator
        .report_for(RecordType::new("Order", "orders"))
        .set_format(RecordingFormat::new())
        .save("orders.csv")
        .map(|_| ());

    assert!(result.is_err());
    assert!(migrator.jobs().is_empty());
}

#[test]
fn test_generator_invalid_timestamp_format_returns_error() {
    let (generator, provider, migrator) = setup_generator();
    let generator = generator.with_config(ReportConfig {
        output_dir: None,
        timestamp_format: Some("%Q".to_string()),
    });
    let format = RecordingFormat::new();

    let mut builder = generator.report::<User>();
    let err = builder
        .set_format(format.clone())
        .save("users.csv")
        .map(|_| ())
        .unwrap_err();

    assert_eq!(err.to_string(), "Error generating report.");
    assert!(err.downcast_cause::<ConfigError>().is_some());
    assert!(provider.opened_queries().is_empty());
    assert!(format.destination_paths().is_empty());
    assert!(migrator.jobs().is_empty());
    assert_eq!(builder.state(), BuilderState::Failed);
}
