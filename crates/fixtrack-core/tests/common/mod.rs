//! Shared test doubles: a session that records statements instead of
//! running them and serves canned table contents.

use fixtrack_core::dialect::{AnsiDialect, Dialect};
use fixtrack_core::errors::{ExError, ExErrorKind, Result};
use fixtrack_core::model::{TableSpec, Value};
use fixtrack_core::session::{QueryResult, SessionSource, StoreSession};
use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::rc::Rc;

/// Recorded statements and canned tables shared by every session of a source.
#[derive(Clone, Default)]
pub struct RecordingSource {
    executed: Rc<RefCell<Vec<String>>>,
    tables: Rc<RefCell<BTreeMap<String, QueryResult>>>,
    opened: Rc<Cell<usize>>,
    fail_containing: Option<String>,
}

#[allow(dead_code)]
impl RecordingSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Any statement containing `needle` fails with a persistence error.
    pub fn failing_on(needle: &str) -> Self {
        Self {
            fail_containing: Some(needle.to_string()),
            ..Self::default()
        }
    }

    pub fn executed(&self) -> Vec<String> {
        self.executed.borrow().clone()
    }

    pub fn executed_count(&self) -> usize {
        self.executed.borrow().len()
    }

    pub fn sessions_opened(&self) -> usize {
        self.opened.get()
    }

    pub fn set_table(&self, name: &str, columns: &[&str], rows: Vec<Vec<Value>>) {
        self.tables.borrow_mut().insert(
            name.to_string(),
            QueryResult {
                columns: columns.iter().map(|c| c.to_string()).collect(),
                rows,
            },
        );
    }
}

pub struct RecordingSession {
    source: RecordingSource,
}

impl StoreSession for RecordingSession {
    fn execute(&mut self, sql: &str) -> Result<usize> {
        if let Some(needle) = &self.source.fail_containing {
            if sql.contains(needle.as_str()) {
                return Err(ExError::new(ExErrorKind::Persistence)
                    .with_op("sqlite")
                    .with_message("simulated driver failure"));
            }
        }
        self.source.executed.borrow_mut().push(sql.to_string());
        Ok(1)
    }

    fn query(&mut self, _sql: &str) -> Result<QueryResult> {
        Ok(QueryResult::default())
    }

    fn read_table(&mut self, table: &TableSpec) -> Result<QueryResult> {
        self.source
            .tables
            .borrow()
            .get(&table.name)
            .cloned()
            .ok_or_else(|| {
                ExError::new(ExErrorKind::Persistence)
                    .with_op("sqlite")
                    .with_message(format!("no such table: {}", table.name))
            })
    }
}

impl SessionSource for RecordingSource {
    type Session = RecordingSession;

    fn open(&self) -> Result<RecordingSession> {
        self.opened.set(self.opened.get() + 1);
        Ok(RecordingSession {
            source: self.clone(),
        })
    }

    fn dialect(&self) -> &dyn Dialect {
        &AnsiDialect
    }
}
