// End-to-end harness runs against an on-disk SQLite database: seed with
// generated fixtures, record changes around test logic, assert on them.

mod common;

use chrono::NaiveDate;
use common::{count_rows, setup_test_db, tracked_tables};
use fixtrack_core::errors::ExErrorKind;
use fixtrack_core::generator::{DateUnit, ValueGenerator};
use fixtrack_core::operation::{compose, ColumnSpec, Operation};
use fixtrack_core::snapshot::{capture_with, SnapshotPoint};
use fixtrack_core::{assert_changes, execute_with, ChangeRecorder, FixtureCoordinator, LaunchOutcome, Value};

fn item_codes() -> ValueGenerator {
    ValueGenerator::padded_string_sequence("ITEM-", 1030, 1, 5)
}

fn seed_items(rows: usize) -> Operation {
    compose([
        Operation::delete_all_from(["items", "users"]),
        Operation::insert(
            "items",
            rows,
            [
                ("id", ColumnSpec::generated(ValueGenerator::constant_sequence(1, 1))),
                (
                    "code",
                    ColumnSpec::generated(item_codes()),
                ),
                ("name", ColumnSpec::default_value("widget")),
                ("price", ColumnSpec::default_value(100.0)),
                (
                    "purchase_date",
                    ColumnSpec::generated(ValueGenerator::date_sequence(
                        NaiveDate::from_ymd_opt(2024, 1, 30).unwrap(),
                        1,
                        DateUnit::Days,
                    )),
                ),
            ],
        )
        .unwrap(),
    ])
}

#[test]
fn test_generated_rows_round_trip() {
    let db = setup_test_db();

    let report = execute_with(&seed_items(5), &db.source).unwrap();
    assert_eq!(report.statements_executed, 7);

    let snap = capture_with(SnapshotPoint::Start, &db.source, &tracked_tables()).unwrap();
    let items = snap.table("items").unwrap();
    assert_eq!(items.rows().len(), 5);
    let codes: Vec<Value> = items
        .column_values("code")
        .unwrap()
        .into_iter()
        .cloned()
        .collect();
    let expected: Vec<Value> = item_codes().cursor().take(5).map(Result::unwrap).collect();
    assert_eq!(codes, expected);
    assert_eq!(codes[4], Value::from("ITEM-01034"));
    // Dates come back as the ISO text they were written as, across a month end
    let dates = items.column_values("purchase_date").unwrap();
    assert_eq!(dates[2], &Value::from("2024-02-01"));
    assert_eq!(snap.table("users").unwrap().rows().len(), 0);
}

#[test]
fn test_creation_is_tracked() {
    let db = setup_test_db();
    let recorder = ChangeRecorder::start(&db.source, tracked_tables()).unwrap();

    let insert = Operation::insert_rows(
        "items",
        ["id", "code", "name"],
        vec![vec![Value::from(1), Value::from("A0001"), Value::from("pen")]],
    )
    .unwrap();
    execute_with(&insert, &db.source).unwrap();

    let changes = recorder.finish().unwrap();
    assert_changes(&changes)
        .has_change_count(1)
        .unwrap()
        .on_table("items")
        .change_at(0)
        .unwrap()
        .is_creation()
        .unwrap()
        .column("code")
        .unwrap()
        .is_touched()
        .unwrap()
        .has_values(Value::Null, "A0001")
        .unwrap()
        .and()
        .column("price")
        .unwrap()
        .is_untouched()
        .unwrap();
}

#[test]
fn test_modification_touches_only_changed_columns() {
    let db = setup_test_db();
    execute_with(&seed_items(2), &db.source).unwrap();

    let recorder = ChangeRecorder::start(&db.source, tracked_tables()).unwrap();
    execute_with(&Operation::raw("UPDATE items SET price = 120.0 WHERE id = 1"), &db.source).unwrap();
    let changes = recorder.finish().unwrap();

    assert_changes(&changes)
        .has_change_count(1)
        .unwrap()
        .on_table("items")
        .change_with_pk(1)
        .unwrap()
        .is_modification()
        .unwrap()
        .has_touched_columns(&["price"])
        .unwrap()
        .column("price")
        .unwrap()
        .has_values(100.0, 120.0)
        .unwrap()
        .and()
        .column("name")
        .unwrap()
        .is_untouched()
        .unwrap();
}

#[test]
fn test_deletion_is_tracked() {
    let db = setup_test_db();
    execute_with(&seed_items(2), &db.source).unwrap();

    let recorder = ChangeRecorder::start(&db.source, tracked_tables()).unwrap();
    execute_with(&Operation::raw("DELETE FROM items WHERE id = 2"), &db.source).unwrap();
    let changes = recorder.finish().unwrap();

    assert_changes(&changes)
        .on_table("items")
        .has_change_count(1)
        .unwrap()
        .change_at(0)
        .unwrap()
        .is_deletion()
        .unwrap()
        .column("code")
        .unwrap()
        .has_values("ITEM-01031", Value::Null)
        .unwrap();
}

#[test]
fn test_failed_statement_reports_index_and_keeps_prior_effects() {
    let db = setup_test_db();
    let op = compose([
        Operation::raw("INSERT INTO users (id, login) VALUES (1, 'alice')"),
        Operation::raw("INSERT INTO users (id, login) VALUES (2, 'bob')"),
        Operation::raw("INSERT INTO missing_table (id) VALUES (1)"),
        Operation::raw("INSERT INTO users (id, login) VALUES (3, 'carol')"),
    ]);

    let err = execute_with(&op, &db.source).unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::Fixture);
    assert_eq!(err.statement_index(), Some(2));
    let cause = err.source_error().unwrap();
    assert!(cause.message().contains("no such table"));

    assert_eq!(count_rows(&db, "users"), 2);
}

#[test]
fn test_constraint_violation_is_fixture_error() {
    let db = setup_test_db();
    let op = Operation::insert(
        "users",
        2,
        [
            ("id", ColumnSpec::generated(ValueGenerator::repeating(7))),
            ("login", ColumnSpec::default_value("dup")),
        ],
    )
    .unwrap();

    let err = execute_with(&op, &db.source).unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::Fixture);
    assert_eq!(err.statement_index(), Some(1));
    assert_eq!(err.table(), Some("users"));
}

#[test]
fn test_launch_once_then_already_applied() {
    let db = setup_test_db();
    let mut coordinator = FixtureCoordinator::new();

    let first = coordinator.launch_if_necessary(&seed_items(4), &db.source).unwrap();
    assert!(first.executed());

    // Test logic dirties the store; a relaunch of the same fixture is skipped
    execute_with(&Operation::raw("DELETE FROM items WHERE id = 4"), &db.source).unwrap();
    let second = coordinator.launch_if_necessary(&seed_items(4), &db.source).unwrap();
    assert_eq!(second, LaunchOutcome::AlreadyApplied);
    assert_eq!(count_rows(&db, "items"), 3);

    // A different fixture runs and restores a clean state
    let third = coordinator.launch_if_necessary(&seed_items(2), &db.source).unwrap();
    assert!(third.executed());
    assert_eq!(count_rows(&db, "items"), 2);
}

#[test]
fn test_skip_next_launch_leaves_store_untouched() {
    let db = setup_test_db();
    let mut coordinator = FixtureCoordinator::new();
    coordinator.launch_if_necessary(&seed_items(1), &db.source).unwrap();

    coordinator.skip_next_launch();
    let outcome = coordinator.launch_if_necessary(&seed_items(5), &db.source).unwrap();
    assert_eq!(outcome, LaunchOutcome::Skipped);
    assert_eq!(count_rows(&db, "items"), 1);

    let outcome = coordinator.launch_if_necessary(&seed_items(5), &db.source).unwrap();
    assert!(outcome.executed());
    assert_eq!(count_rows(&db, "items"), 5);
}

#[test]
fn test_snapshot_of_missing_table_fails() {
    let db = setup_test_db();
    let tables = vec![fixtrack_core::TableSpec::new("ghosts", ["id"])];
    let err = capture_with(SnapshotPoint::Start, &db.source, &tables).unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::Persistence);
}
