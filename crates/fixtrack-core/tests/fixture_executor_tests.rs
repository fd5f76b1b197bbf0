mod common;

use common::RecordingSource;
use fixtrack_core::dialect::AnsiDialect;
use fixtrack_core::errors::ExErrorKind;
use fixtrack_core::executor::{execute, execute_with};
use fixtrack_core::generator::{DateUnit, ValueGenerator};
use fixtrack_core::operation::{compose, ColumnSpec, Operation};
use fixtrack_core::session::SessionSource;
use chrono::NaiveDate;

fn items_fixture() -> Operation {
    compose([
        Operation::delete_all("items"),
        Operation::insert(
            "items",
            3,
            [
                ("id", ColumnSpec::generated(ValueGenerator::constant_sequence(1, 1))),
                (
                    "code",
                    ColumnSpec::generated(ValueGenerator::padded_string_sequence("A", 1, 1, 4)),
                ),
                (
                    "purchase_date",
                    ColumnSpec::generated(ValueGenerator::date_sequence(
                        NaiveDate::from_ymd_opt(2024, 1, 31).unwrap(),
                        1,
                        DateUnit::Days,
                    )),
                ),
                ("name", ColumnSpec::default_value("widget")),
            ],
        )
        .unwrap(),
    ])
}

#[test]
fn test_execute_issues_statements_in_declaration_order() {
    let source = RecordingSource::new();
    let report = execute_with(&items_fixture(), &source).unwrap();

    assert_eq!(report.statements_executed, 4);
    assert_eq!(report.rows_affected, 4);
    assert_eq!(
        source.executed(),
        vec![
            "DELETE FROM \"items\"".to_string(),
            "INSERT INTO \"items\" (\"id\", \"code\", \"purchase_date\", \"name\") VALUES (1, 'A0001', DATE '2024-01-31', 'widget')".to_string(),
            "INSERT INTO \"items\" (\"id\", \"code\", \"purchase_date\", \"name\") VALUES (2, 'A0002', DATE '2024-02-01', 'widget')".to_string(),
            "INSERT INTO \"items\" (\"id\", \"code\", \"purchase_date\", \"name\") VALUES (3, 'A0003', DATE '2024-02-02', 'widget')".to_string(),
        ]
    );
}

#[test]
fn test_execute_twice_produces_identical_statements() {
    let source = RecordingSource::new();
    let op = items_fixture();
    execute_with(&op, &source).unwrap();
    let first = source.executed();
    execute_with(&op, &source).unwrap();
    let all = source.executed();
    assert_eq!(&all[..first.len()], &all[first.len()..]);
}

#[test]
fn test_failure_reports_statement_index_and_stops() {
    let source = RecordingSource::failing_on("'A0002'");
    let err = execute_with(&items_fixture(), &source).unwrap_err();

    assert_eq!(err.kind(), ExErrorKind::Fixture);
    assert_eq!(err.statement_index(), Some(2));
    assert_eq!(err.table(), Some("items"));
    assert!(err.statement().unwrap().contains("'A0002'"));
    assert_eq!(
        err.source_error().map(|e| e.kind()),
        Some(ExErrorKind::Persistence)
    );
    // delete and first insert ran; the third insert never did
    assert_eq!(source.executed_count(), 2);
}

#[test]
fn test_format_error_runs_nothing() {
    let source = RecordingSource::new();
    let op = compose([
        Operation::delete_all("items"),
        Operation::insert(
            "items",
            20,
            [(
                "code",
                ColumnSpec::generated(ValueGenerator::padded_string_sequence("X", 0, 1, 1)),
            )],
        )
        .unwrap(),
    ]);
    let err = execute_with(&op, &source).unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::Format);
    assert_eq!(source.executed_count(), 0);
}

#[test]
fn test_execute_on_open_session() {
    let source = RecordingSource::new();
    let mut session = source.open().unwrap();
    let report = execute(&Operation::raw("VACUUM"), &mut session, &AnsiDialect).unwrap();
    assert_eq!(report.statements_executed, 1);
    assert_eq!(source.executed(), vec!["VACUUM".to_string()]);
}

#[test]
fn test_each_execution_opens_its_own_session() {
    let source = RecordingSource::new();
    execute_with(&Operation::raw("SELECT 1"), &source).unwrap();
    let _ = execute_with(&Operation::raw("SELECT 1"), &RecordingSource::failing_on("x"));
    execute_with(&Operation::raw("SELECT 1"), &source).unwrap();
    assert_eq!(source.sessions_opened(), 2);
}
