//! Canonical schema constants for structured logging and events
//!
//! These constants keep field names identical between the executor, the
//! launch coordinator, snapshot capture and the diff engine.

// Canonical field keys for structured logging
pub const FIELD_COMPONENT: &str = "component";
pub const FIELD_OP: &str = "op";
pub const FIELD_EVENT: &str = "event";
pub const FIELD_DURATION_MS: &str = "duration_ms";

// Fixture identifiers
pub const FIELD_OPERATION_DIGEST: &str = "operation_digest";
pub const FIELD_TABLE: &str = "table";
pub const FIELD_STATEMENT_INDEX: &str = "statement_index";

// Collection sizes
pub const FIELD_STATEMENT_COUNT: &str = "statement_count";
pub const FIELD_ROW_COUNT: &str = "row_count";
pub const FIELD_TABLE_COUNT: &str = "table_count";
pub const FIELD_CHANGE_COUNT: &str = "change_count";

// Error fields
pub const FIELD_ERR_KIND: &str = "err.kind";
pub const FIELD_ERR_CODE: &str = "err.code";

// Canonical event names
pub const EVENT_START: &str = "start";
pub const EVENT_END: &str = "end";
pub const EVENT_END_ERROR: &str = "end_error";

// Canonical operation names
pub const OP_FIXTURE_EXECUTE: &str = "fixture_execute";
pub const OP_FIXTURE_LAUNCH: &str = "fixture_launch";
pub const OP_SNAPSHOT_CAPTURE: &str = "snapshot_capture";
pub const OP_CHANGES_COMPUTE: &str = "changes_compute";
