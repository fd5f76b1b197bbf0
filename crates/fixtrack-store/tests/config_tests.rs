// Configuration files drive which database and tables a harness run uses.

use fixtrack_core::errors::ExErrorKind;
use fixtrack_core::session::{SessionSource, StoreSession};
use fixtrack_core::snapshot::{capture_with, SnapshotPoint};
use fixtrack_store::HarnessConfig;
use std::fs;
use tempfile::TempDir;

const CONFIG: &str = r#"
database = "harness.sqlite"
log_profile = "test"

[[tables]]
name = "items"
primary_key = ["id"]
"#;

#[test]
fn test_load_resolves_database_next_to_config() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("fixtrack.toml");
    fs::write(&path, CONFIG).unwrap();

    let config = HarnessConfig::load(&path).unwrap();
    assert_eq!(config.database, dir.path().join("harness.sqlite"));

    let source = config.source();
    let mut session = source.open().unwrap();
    session
        .execute("CREATE TABLE items (id INTEGER PRIMARY KEY, code TEXT)")
        .unwrap();
    session.execute("INSERT INTO items VALUES (1, 'A0001')").unwrap();
    drop(session);

    let snap = capture_with(SnapshotPoint::Start, &source, config.table_specs()).unwrap();
    assert_eq!(snap.row_count(), 1);
}

#[test]
fn test_load_missing_file_is_io_error() {
    let dir = TempDir::new().unwrap();
    let err = HarnessConfig::load(dir.path().join("absent.toml")).unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::Io);
}

#[test]
fn test_load_invalid_file_is_config_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("fixtrack.toml");
    fs::write(&path, "database = \"x.sqlite\"\nunknown_key = 1\n").unwrap();

    let err = HarnessConfig::load(&path).unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::Config);
}

#[test]
fn test_env_override_and_logging_setup() {
    let config = HarnessConfig::from_toml_str(CONFIG)
        .unwrap()
        .with_overrides_from(|_| Some("/tmp/override.sqlite".to_string()));
    assert_eq!(config.source().path(), std::path::Path::new("/tmp/override.sqlite"));
    config.init_logging();
}
